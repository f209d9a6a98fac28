use egui::{Color32, Vec2};
use itertools::Itertools;
use log::debug;

use super::{LAP_TIME_LABEL, figure_size};
use crate::{
    LapChartError,
    aggregate::{TeamGroup, stats::BoxStats, team_groups},
    chart::{
        Axes, BoxMark, Dash, LineMark, Surface,
        palette::{ColorMap, PALETTE_GREY, PALETTE_WHITE, TAB10, cycle_color},
    },
    laps::{Column, LapTable},
};

const BOX_WIDTH: f64 = 0.6;
const MEDIAN_WIDTH: f32 = 1.5;

#[derive(Clone, Debug)]
pub struct BoxplotOptions {
    pub title: Option<String>,
    pub x_label: Option<String>,
    /// Box colour per team, teams without one take a categorical colour
    pub team_colors: ColorMap,
    /// Explicit team order, replaces the fastest-median-first order
    pub order: Option<Vec<String>>,
    /// Only draw laps flagged as accurate
    pub accurate_only: bool,
    pub edge_color: Color32,
    pub median_color: Color32,
    pub size: Vec2,
}

impl Default for BoxplotOptions {
    fn default() -> Self {
        Self {
            title: None,
            x_label: None,
            team_colors: ColorMap::new(),
            order: None,
            accurate_only: true,
            edge_color: PALETTE_WHITE,
            median_color: PALETTE_GREY,
            size: figure_size(15., 10.),
        }
    }
}

/// Box plot of lap times per team, fastest median on the left.
pub fn plot_laptimes_boxplot<S: Surface>(
    laps: &LapTable,
    options: &BoxplotOptions,
    surface: &mut S,
) -> Result<(), LapChartError> {
    laps.require_column(Column::Team)?;
    laps.require_column(Column::LapTime)?;

    let mut groups = team_groups(
        laps.iter()
            .filter(|lap| !options.accurate_only || lap.is_accurate),
    );
    if let Some(order) = &options.order {
        groups = in_order(groups, order);
    }

    surface.begin_axes(
        Axes::new(options.size)
            .with_title(options.title.as_deref())
            .with_labels(options.x_label.as_deref(), Some(LAP_TIME_LABEL))
            .with_x_categories(groups.iter().map(|g| g.team.clone()).collect_vec())
            .with_grid(false, false),
    );

    for (index, group) in groups.iter().enumerate() {
        let Some(stats) = BoxStats::from_values(&group.lap_times_s) else {
            continue;
        };
        let x = index as f64;
        let median = stats.median;
        surface.box_plot(BoxMark {
            series: group.team.clone(),
            x,
            stats,
            fill: options
                .team_colors
                .get_or(&group.team, cycle_color(&TAB10, index)),
            edge: options.edge_color,
            width: BOX_WIDTH,
        });
        // the box is stroked in one colour, the median is drawn over it
        surface.line(LineMark {
            series: group.team.clone(),
            name: group.team.clone(),
            points: vec![
                [x - BOX_WIDTH / 2.0, median],
                [x + BOX_WIDTH / 2.0, median],
            ],
            color: options.median_color,
            width: MEDIAN_WIDTH,
            dash: Dash::Solid,
        });
    }
    Ok(())
}

/// Keeps the teams named in `order`, in that order
fn in_order(groups: Vec<TeamGroup>, order: &[String]) -> Vec<TeamGroup> {
    let mut groups = groups.into_iter().map(Some).collect_vec();
    order
        .iter()
        .filter_map(|team| {
            let found = groups
                .iter_mut()
                .find(|slot| matches!(slot, Some(g) if &g.team == team))
                .and_then(Option::take);
            if found.is_none() {
                debug!("No timed laps for team {}, skipping", team);
            }
            found
        })
        .collect_vec()
}
