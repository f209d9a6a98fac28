use egui::Vec2;
use itertools::Itertools;
use log::debug;

use super::{LAP_TIME_LABEL, figure_size};
use crate::{
    LapChartError,
    aggregate::{
        driver_group, requested_drivers,
        stats::{Density, kernel_density, swarm_offsets},
    },
    chart::{
        Axes, Marker, ScatterMark, Surface, ViolinMark,
        palette::{ColorMap, PALETTE_GREY, TAB10, cycle_color},
    },
    laps::{Column, Compound, LapRecord, LapTable},
};

/// Widest point of a violin, in category units either side of its centre
const VIOLIN_HALF_WIDTH: f64 = 0.4;
/// Lap time range is split into this many swarm bins
const SWARM_BINS: f64 = 40.0;
const MIN_SWARM_SPACING_S: f64 = 0.05;

#[derive(Clone, Debug)]
pub struct DistributionOptions {
    pub title: Option<String>,
    pub driver_colors: ColorMap,
    /// Swarm marker colour per compound name
    pub compound_colors: ColorMap,
    /// Legend order of the compounds, other compounds follow
    pub compound_order: Vec<Compound>,
    pub marker_size: f32,
    pub size: Vec2,
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            title: None,
            driver_colors: ColorMap::new(),
            compound_colors: ColorMap::compounds(),
            compound_order: Compound::DRY.to_vec(),
            marker_size: 4.,
            size: figure_size(10., 5.),
        }
    }
}

/// Violin and swarm of every requested driver's lap times, drivers left to
/// right in the requested order. Drivers without timed laps keep their slot
/// but draw nothing.
pub fn plot_lap_time_distributions<S: Surface, D: AsRef<str>>(
    laps: &LapTable,
    drivers: &[D],
    options: &DistributionOptions,
    surface: &mut S,
) -> Result<(), LapChartError> {
    laps.require_column(Column::LapTime)?;

    let drivers = requested_drivers(drivers);
    let present = drivers
        .iter()
        .enumerate()
        .filter_map(|(slot, driver)| {
            let timed = driver_group(laps, driver)
                .map(|group| group.timed_laps().collect_vec())
                .unwrap_or_default();
            if timed.is_empty() {
                debug!("No timed laps for driver {}, skipping", driver);
                return None;
            }
            Some((slot, *driver, timed))
        })
        .collect_vec();

    let densities = present
        .iter()
        .map(|(_, _, timed)| kernel_density(&timed.iter().map(|(_, s)| *s).collect_vec()))
        .collect_vec();
    let max_density = densities
        .iter()
        .flatten()
        .map(|density| density.max_density)
        .fold(0.0, f64::max);

    surface.begin_axes(
        Axes::new(options.size)
            .with_title(options.title.as_deref())
            .with_labels(Some("Driver"), Some(LAP_TIME_LABEL))
            .with_x_categories(drivers.iter().map(|d| d.to_string()).collect_vec())
            .with_grid(false, true)
            .with_legend(),
    );

    for ((slot, driver, timed), density) in present.iter().zip(&densities) {
        let x = *slot as f64;
        let values = timed.iter().map(|(_, seconds)| *seconds).collect_vec();
        let color = options
            .driver_colors
            .get_or(driver, cycle_color(&TAB10, *slot));

        surface.violin(ViolinMark {
            series: driver.to_string(),
            x,
            outline: density
                .as_ref()
                .map(|density| violin_outline(density, x, max_density))
                .unwrap_or_default(),
            values: values.clone(),
            fill: color,
        });

        let (min, max) = values
            .iter()
            .copied()
            .minmax_by(f64::total_cmp)
            .into_option()
            .unwrap_or((0.0, 0.0));
        let spacing = ((max - min) / SWARM_BINS).max(MIN_SWARM_SPACING_S);
        let offsets = swarm_offsets(&values, spacing * 0.5, VIOLIN_HALF_WIDTH * 0.9);

        for compound in compounds_in_order(timed, &options.compound_order) {
            let points = timed
                .iter()
                .zip(&offsets)
                .filter(|((lap, _), _)| compound_of(lap) == compound)
                .map(|((_, seconds), offset)| [x + offset, *seconds])
                .collect_vec();
            surface.scatter(ScatterMark {
                series: driver.to_string(),
                name: compound.name().to_string(),
                points,
                color: options
                    .compound_colors
                    .get_or(compound.name(), PALETTE_GREY),
                radius: options.marker_size * 0.5,
                marker: Marker::Circle,
            });
        }
    }
    Ok(())
}

fn compound_of(lap: &LapRecord) -> Compound {
    lap.compound.unwrap_or(Compound::Unknown)
}

/// Compounds present in `timed`: those in `order` first, then the rest as
/// they appear
fn compounds_in_order(timed: &[(&LapRecord, f64)], order: &[Compound]) -> Vec<Compound> {
    let present = timed.iter().map(|(lap, _)| compound_of(lap)).unique().collect_vec();
    order
        .iter()
        .filter(|compound| present.contains(compound))
        .chain(present.iter().filter(|compound| !order.contains(compound)))
        .copied()
        .collect_vec()
}

/// Right edge bottom to top, then left edge top to bottom
fn violin_outline(density: &Density, x: f64, max_density: f64) -> Vec<[f64; 2]> {
    if max_density <= 0.0 {
        return Vec::new();
    }
    let half_width = |d: f64| d / max_density * VIOLIN_HALF_WIDTH;
    density
        .curve
        .iter()
        .map(|[value, d]| [x + half_width(*d), *value])
        .chain(
            density
                .curve
                .iter()
                .rev()
                .map(|[value, d]| [x - half_width(*d), *value]),
        )
        .collect_vec()
}
