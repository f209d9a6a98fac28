use egui::{Color32, Vec2};
use itertools::Itertools;
use log::debug;

use super::{LAP_TIME_LABEL, figure_size};
use crate::{
    LapChartError,
    aggregate::{
        DriverGroup, driver_groups,
        stints::{Stint, StintRule, derive_stints},
    },
    chart::{
        Axes, Dash, LineMark, Marker, ScatterMark, Surface,
        palette::{ColorMap, PALETTE_GREY, TAB10, cycle_color},
    },
    laps::{Column, Compound, LapRecord, LapTable},
};

const LINE_WIDTH: f32 = 1.5;
const MARKER_RADIUS: f32 = 3.;
const PIT_MARKER_RADIUS: f32 = 4.;

#[derive(Clone, Debug)]
pub struct DriverLapsOptions {
    pub title: Option<String>,
    /// Line colour per driver, drivers without one take a categorical colour
    pub driver_colors: ColorMap,
    pub compound_colors: ColorMap,
    pub stint_rule: StintRule,
    /// Draw a marker coloured by compound on every timed lap
    pub mark_compounds: bool,
    /// Draw in and out laps with their own marker shape
    pub mark_pit_laps: bool,
    pub size: Vec2,
}

impl Default for DriverLapsOptions {
    fn default() -> Self {
        Self {
            title: Some("Lap time comparison of each stint".to_string()),
            driver_colors: ColorMap::new(),
            compound_colors: ColorMap::compounds(),
            stint_rule: StintRule::default(),
            mark_compounds: true,
            mark_pit_laps: true,
            size: figure_size(14., 10.),
        }
    }
}

/// Lap times of each driver against lap number, one line per stint. Faster
/// laps are drawn higher up.
pub fn plot_driver_laps<S: Surface, D: AsRef<str>>(
    laps: &LapTable,
    drivers: &[D],
    options: &DriverLapsOptions,
    surface: &mut S,
) -> Result<(), LapChartError> {
    laps.require_column(Column::LapTime)?;

    surface.begin_axes(
        Axes::new(options.size)
            .with_title(options.title.as_deref())
            .with_labels(Some("Lap Number"), Some(LAP_TIME_LABEL))
            .inverted_y()
            .with_legend(),
    );

    for (index, group) in driver_groups(laps, drivers).iter().enumerate() {
        let color = options
            .driver_colors
            .get_or(group.driver, cycle_color(&TAB10, index));
        let timed = group.timed_laps().collect_vec();
        if timed.is_empty() {
            debug!("No timed laps for driver {}, skipping", group.driver);
            continue;
        }

        for (stint_index, stint) in derive_stints(group, options.stint_rule).iter().enumerate() {
            let points = stint_points(&timed, stint);
            if points.is_empty() {
                continue;
            }
            surface.line(LineMark {
                series: group.driver.to_string(),
                name: format!("{} stint {}", group.driver, stint.number),
                points,
                color,
                width: LINE_WIDTH,
                dash: Dash::cycle(stint_index),
            });
        }

        if options.mark_compounds {
            mark_compounds(group, &timed, options, surface);
        }
        if options.mark_pit_laps {
            mark_pit_laps(group, &timed, color, surface);
        }
    }
    Ok(())
}

fn stint_points(timed: &[(&LapRecord, f64)], stint: &Stint) -> Vec<[f64; 2]> {
    timed
        .iter()
        .filter(|(lap, _)| stint.contains_lap(lap.lap_number))
        .map(|(lap, seconds)| [f64::from(lap.lap_number), *seconds])
        .collect_vec()
}

fn mark_compounds<S: Surface>(
    group: &DriverGroup<'_>,
    timed: &[(&LapRecord, f64)],
    options: &DriverLapsOptions,
    surface: &mut S,
) {
    let by_compound = timed
        .iter()
        .map(|(lap, seconds)| {
            (
                lap.compound.unwrap_or(Compound::Unknown),
                [f64::from(lap.lap_number), *seconds],
            )
        })
        .into_group_map();

    // keep the order in which compounds were first run
    let compounds = timed
        .iter()
        .map(|(lap, _)| lap.compound.unwrap_or(Compound::Unknown))
        .unique()
        .collect_vec();
    for compound in compounds {
        let Some(points) = by_compound.get(&compound) else {
            continue;
        };
        surface.scatter(ScatterMark {
            series: group.driver.to_string(),
            name: compound.name().to_string(),
            points: points.clone(),
            color: options
                .compound_colors
                .get_or(compound.name(), PALETTE_GREY),
            radius: MARKER_RADIUS,
            marker: Marker::Circle,
        });
    }
}

fn mark_pit_laps<S: Surface>(
    group: &DriverGroup<'_>,
    timed: &[(&LapRecord, f64)],
    color: Color32,
    surface: &mut S,
) {
    let in_laps = pit_points(timed, |lap| lap.pit_in);
    let out_laps = pit_points(timed, |lap| lap.pit_out);
    for (name, marker, points) in [
        ("in lap", Marker::Square, in_laps),
        ("out lap", Marker::Diamond, out_laps),
    ] {
        if points.is_empty() {
            continue;
        }
        surface.scatter(ScatterMark {
            series: group.driver.to_string(),
            name: format!("{} {}", group.driver, name),
            points,
            color,
            radius: PIT_MARKER_RADIUS,
            marker,
        });
    }
}

fn pit_points(timed: &[(&LapRecord, f64)], is_pit: impl Fn(&LapRecord) -> bool) -> Vec<[f64; 2]> {
    timed
        .iter()
        .filter(|(lap, _)| is_pit(*lap))
        .map(|(lap, seconds)| [f64::from(lap.lap_number), *seconds])
        .collect_vec()
}
