// One renderer per chart type. Each aggregates the laps it is given and
// issues its marks on a caller-supplied surface; nothing survives the call.

pub mod boxplot;
pub mod distributions;
pub mod driver_laps;
pub mod positions;
pub mod telemetry;
pub mod tyre_strategy;

pub use boxplot::{BoxplotOptions, plot_laptimes_boxplot};
pub use distributions::{DistributionOptions, plot_lap_time_distributions};
pub use driver_laps::{DriverLapsOptions, plot_driver_laps};
pub use positions::{PositionOptions, plot_driver_positions};
pub use telemetry::{TelemetryOptions, plot_fastest_lap_telemetry};
pub use tyre_strategy::{RowOrder, TyreStrategyOptions, plot_tyre_strategy};

/// Figure sizes are given in inches, drawn at this many points per inch
pub(crate) const POINTS_PER_INCH: f32 = 80.0;

pub(crate) const LAP_TIME_LABEL: &str = "Lap Time (s)";

pub(crate) fn figure_size(width_in: f32, height_in: f32) -> egui::Vec2 {
    egui::Vec2::new(width_in * POINTS_PER_INCH, height_in * POINTS_PER_INCH)
}
