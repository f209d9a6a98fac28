use egui::Vec2;
use itertools::Itertools;

use super::figure_size;
use crate::{
    LapChartError,
    aggregate::driver_groups,
    chart::{
        Axes, Dash, LineMark, Surface,
        palette::{ColorMap, PALETTE_BLACK},
    },
    laps::{Column, LapTable},
};

/// Full grid, the y axis always shows at least this many positions
const GRID_SIZE: u32 = 20;
/// Positions up to this are ticked every 5, larger ones widen the step
const TICKED_POSITIONS: u32 = 100;
const LINE_WIDTH: f32 = 1.5;

#[derive(Clone, Debug)]
pub struct PositionOptions {
    pub title: Option<String>,
    /// Drivers without a colour are drawn in black
    pub driver_colors: ColorMap,
    pub size: Vec2,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            title: Some("Race Position Changes".to_string()),
            driver_colors: ColorMap::new(),
            size: figure_size(8., 4.9),
        }
    }
}

/// Position of each driver lap by lap, leader at the top. Without a driver
/// list every driver of the table is drawn in order of first appearance.
pub fn plot_driver_positions<S: Surface>(
    laps: &LapTable,
    drivers: Option<&[&str]>,
    options: &PositionOptions,
    surface: &mut S,
) -> Result<(), LapChartError> {
    laps.require_column(Column::Position)?;

    let all_drivers = laps.drivers();
    let groups = driver_groups(laps, drivers.unwrap_or(&all_drivers));

    let series = groups
        .iter()
        .map(|group| {
            let points = group
                .laps
                .iter()
                .filter_map(|lap| lap.position.map(|p| [lap.lap_number as f64, p as f64]))
                .collect_vec();
            (group.driver, points)
        })
        .filter(|(_, points)| !points.is_empty())
        .collect_vec();

    let last_position = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|p| p[1] as u32))
        .max()
        .unwrap_or(0)
        .max(GRID_SIZE);
    let tick_step = 5 * last_position.div_ceil(TICKED_POSITIONS).max(1);
    let mut ticks = vec![1.0];
    ticks.extend(
        (tick_step..=last_position)
            .step_by(tick_step as usize)
            .map(f64::from),
    );

    let mut axes = Axes::new(options.size)
        .with_title(options.title.as_deref())
        .with_labels(Some("Lap"), Some("Position"))
        .inverted_y()
        .with_y_range(0.5, last_position as f64 + 0.5)
        .with_y_ticks(ticks);
    if !series.is_empty() {
        axes = axes.with_legend();
    }
    surface.begin_axes(axes);

    for (driver, points) in series {
        surface.line(LineMark {
            series: driver.to_string(),
            name: driver.to_string(),
            points,
            color: options.driver_colors.get_or(driver, PALETTE_BLACK),
            width: LINE_WIDTH,
            dash: Dash::Solid,
        });
    }
    Ok(())
}
