// Lap time and race strategy charts for motorsport timing data.
// Renderers aggregate a lap table and issue their marks on a `Surface`;
// `Figure` keeps them so they can be inspected or painted with egui_plot.

pub mod aggregate;
pub mod chart;
pub mod errors;
pub mod laps;
pub mod plots;
pub mod telemetry;

// Re-export commonly used types
pub use aggregate::stints::{Stint, StintRule};
pub use chart::{Figure, Surface, palette::ColorMap};
pub use errors::LapChartError;
pub use laps::{Column, Compound, LapRecord, LapTable, loader::load_laps_jsonl};
pub use plots::{
    BoxplotOptions, DistributionOptions, DriverLapsOptions, PositionOptions, RowOrder,
    TelemetryOptions, TyreStrategyOptions, plot_driver_laps, plot_driver_positions,
    plot_fastest_lap_telemetry, plot_lap_time_distributions, plot_laptimes_boxplot,
    plot_tyre_strategy,
};
pub use telemetry::{TelemetrySample, TelemetryTrace, load_traces_json};
