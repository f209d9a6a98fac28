use std::{fs::File, io::BufReader, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::LapChartError;

/// One car telemetry sample along a lap.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Meters travelled since the start of the lap
    #[serde(alias = "Distance")]
    pub distance_m: f64,
    #[serde(alias = "Speed")]
    pub speed_kph: f64,
    /// 0 to 100
    #[serde(alias = "Throttle")]
    pub throttle_pct: f64,
    #[serde(alias = "Brake")]
    pub brake: bool,
    #[serde(alias = "nGear")]
    pub gear: u8,
    #[serde(alias = "RPM")]
    pub rpm: f64,
    /// Raw DRS state as sent by the car
    #[serde(alias = "DRS")]
    pub drs: u8,
}

/// Telemetry of a single lap of one driver, usually the fastest one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryTrace {
    pub driver: String,
    pub samples: Vec<TelemetrySample>,
}

impl TelemetryTrace {
    pub fn new(driver: &str, samples: Vec<TelemetrySample>) -> Self {
        Self {
            driver: driver.to_string(),
            samples,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Loads fastest-lap traces stored as a JSON array of [`TelemetryTrace`].
pub fn load_traces_json(source_file: &Path) -> Result<Vec<TelemetryTrace>, LapChartError> {
    let file =
        File::open(source_file).map_err(|e| LapChartError::TelemetryFileRead { source: e })?;
    let traces: Vec<TelemetryTrace> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| LapChartError::InvalidTelemetry { source: e })?;
    info!("Loaded {:?}, found {} telemetry traces", source_file, traces.len());
    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_traces_with_timing_names() {
        let mut trace_file = NamedTempFile::new().unwrap();
        write!(
            trace_file,
            r#"[{{"driver":"VER","samples":[{{"Distance":0.5,"Speed":281.0,"Throttle":99.0,"Brake":false,"nGear":7,"RPM":11210.0,"DRS":12}}]}},{{"driver":"LEC","samples":[]}}]"#
        )
        .unwrap();

        let traces = load_traces_json(trace_file.path()).unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].samples[0].gear, 7);
        assert_eq!(traces[0].samples[0].drs, 12);
        assert!(traces[1].is_empty());
    }

    #[test]
    fn test_load_traces_errors() {
        let missing = load_traces_json(Path::new("/nonexistent/traces.json"));
        assert!(matches!(missing, Err(LapChartError::TelemetryFileRead { .. })));

        let mut trace_file = NamedTempFile::new().unwrap();
        write!(trace_file, r#"{{"driver":"VER"}}"#).unwrap();
        let invalid = load_traces_json(trace_file.path());
        assert!(matches!(invalid, Err(LapChartError::InvalidTelemetry { .. })));
    }
}
