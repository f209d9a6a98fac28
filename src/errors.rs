// Error types for lapcharts

use snafu::Snafu;
use std::io;

use crate::laps::Column;

#[derive(Debug, Snafu)]
pub enum LapChartError {
    // Data shape errors
    #[snafu(display("Lap table is missing the {column} column"))]
    MissingColumn { column: Column },
    #[snafu(display("Invalid lap record on line {line}"))]
    InvalidLapRecord { line: usize, source: io::Error },

    // Errors for the lap file loader
    #[snafu(display("Error reading lap file"))]
    LapFileRead { source: io::Error },

    // Errors for the telemetry loader
    #[snafu(display("Error reading telemetry file"))]
    TelemetryFileRead { source: io::Error },
    #[snafu(display("Invalid telemetry traces"))]
    InvalidTelemetry { source: serde_json::Error },
}
