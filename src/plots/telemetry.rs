use egui::{Color32, Vec2};
use itertools::Itertools;
use log::debug;

use super::figure_size;
use crate::{
    LapChartError,
    chart::{
        Axes, Dash, LineMark, Surface,
        palette::{TRACE_COLORS, cycle_color},
    },
    telemetry::{TelemetrySample, TelemetryTrace},
};

const LINE_WIDTH: f32 = 1.2;

/// Stacked channels, top to bottom.
const CHANNELS: [(&str, fn(&TelemetrySample) -> f64); 6] = [
    ("Speed (km/h)", |s| s.speed_kph),
    ("Throttle (%)", |s| s.throttle_pct),
    ("Brake", |s| if s.brake { 1.0 } else { 0.0 }),
    ("Gear", |s| f64::from(s.gear)),
    ("RPM", |s| s.rpm),
    ("DRS", |s| f64::from(s.drs)),
];

#[derive(Clone, Debug)]
pub struct TelemetryOptions {
    pub title: Option<String>,
    /// Trace colours, cycled in trace order
    pub colors: Vec<Color32>,
    /// Size of the whole stack
    pub size: Vec2,
}

impl Default for TelemetryOptions {
    fn default() -> Self {
        Self {
            title: Some("Fastest Lap Telemetry".to_string()),
            colors: TRACE_COLORS.to_vec(),
            size: figure_size(12., 14.),
        }
    }
}

/// Speed, throttle, brake, gear, RPM and DRS of each trace against lap
/// distance, one panel per channel.
pub fn plot_fastest_lap_telemetry<S: Surface>(
    traces: &[TelemetryTrace],
    options: &TelemetryOptions,
    surface: &mut S,
) -> Result<(), LapChartError> {
    let drawn = traces
        .iter()
        .enumerate()
        .filter(|(_, trace)| {
            if trace.is_empty() {
                debug!("No telemetry samples for driver {}, skipping", trace.driver);
            }
            !trace.is_empty()
        })
        .collect_vec();

    let panel_size = Vec2::new(options.size.x, options.size.y / CHANNELS.len() as f32);
    let last = CHANNELS.len() - 1;
    for (index, (label, channel)) in CHANNELS.iter().enumerate() {
        let title = if index == 0 {
            options.title.as_deref()
        } else {
            None
        };
        let x_label = (index == last).then_some("Distance (m)");
        let mut axes = Axes::new(panel_size)
            .with_title(title)
            .with_labels(x_label, Some(*label));
        if !drawn.is_empty() {
            axes = axes.with_legend();
        }
        surface.begin_axes(axes);

        for (trace_index, trace) in &drawn {
            surface.line(LineMark {
                series: trace.driver.clone(),
                name: trace.driver.clone(),
                points: trace
                    .samples
                    .iter()
                    .map(|sample| [sample.distance_m, channel(sample)])
                    .collect_vec(),
                color: cycle_color(&options.colors, *trace_index),
                width: LINE_WIDTH,
                dash: Dash::Solid,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Figure, Mark};

    fn sample(distance_m: f64, speed_kph: f64, gear: u8) -> TelemetrySample {
        TelemetrySample {
            distance_m,
            speed_kph,
            throttle_pct: 100.0,
            brake: speed_kph < 150.0,
            gear,
            rpm: 11000.0,
            drs: 0,
        }
    }

    #[test]
    fn test_six_panels_one_line_per_trace() {
        let traces = vec![
            TelemetryTrace::new("VER", vec![sample(0.0, 280.0, 7), sample(10.0, 120.0, 3)]),
            TelemetryTrace::new("LEC", vec![]),
            TelemetryTrace::new("HAM", vec![sample(0.0, 275.0, 7)]),
        ];
        let mut figure = Figure::new();
        plot_fastest_lap_telemetry(&traces, &TelemetryOptions::default(), &mut figure).unwrap();

        let panels = figure.panels();
        assert_eq!(panels.len(), 6);
        assert_eq!(figure.series(), vec!["VER", "HAM"]);
        assert!(panels.iter().all(|panel| panel.marks.len() == 2));
        assert_eq!(panels[0].axes.title.as_deref(), Some("Fastest Lap Telemetry"));
        assert!(panels[1].axes.title.is_none());
        assert_eq!(panels[5].axes.x_label.as_deref(), Some("Distance (m)"));
        assert!(panels.iter().all(|panel| panel.axes.legend));

        match (&panels[2].marks[0], &panels[3].marks[1]) {
            (Mark::Line(brake), Mark::Line(gear)) => {
                assert_eq!(brake.points, vec![[0.0, 0.0], [10.0, 1.0]]);
                assert_eq!(brake.color, TRACE_COLORS[0]);
                assert_eq!(gear.points, vec![[0.0, 7.0]]);
                // colour follows the trace position, skipped traces included
                assert_eq!(gear.color, TRACE_COLORS[2]);
            }
            other => panic!("Expected lines, got {:?}", other),
        }
    }

    #[test]
    fn test_no_traces_draws_empty_panels() {
        let mut figure = Figure::new();
        plot_fastest_lap_telemetry(&[], &TelemetryOptions::default(), &mut figure).unwrap();
        assert_eq!(figure.panels().len(), 6);
        assert!(figure.is_empty());
        assert!(figure.panels().iter().all(|panel| !panel.axes.legend));
    }
}
