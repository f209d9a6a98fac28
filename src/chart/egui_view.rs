use egui::{RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, LineStyle, MarkerShape,
    Plot, PlotPoints, PlotUi, Points, Polygon,
};
use itertools::Itertools;

use super::{Dash, Figure, Mark, Marker, Panel};

/// Grid step reported for fixed ticks, controls how strongly lines are drawn
const FIXED_TICK_STEP: f64 = 5.0;
const OUTLIER_RADIUS: f32 = 2.5;

impl Figure {
    /// Paints every panel, top to bottom, into a caller-owned `Ui`.
    pub fn show(&self, ui: &mut Ui) {
        ui.vertical(|ui| {
            for (index, panel) in self.panels.iter().enumerate() {
                panel.show(ui, index);
            }
        });
    }
}

impl Panel {
    fn show(&self, ui: &mut Ui, index: usize) {
        let axes = &self.axes;
        if let Some(title) = &axes.title {
            ui.label(RichText::new(title).strong());
        }

        // egui_plot grows upwards, inverted axes are drawn mirrored and
        // relabelled
        let flip = if axes.invert_y { -1.0 } else { 1.0 };
        let x_categories = axes.x_categories.clone();
        let y_categories = axes.y_categories.clone();

        let mut plot = Plot::new(("lapcharts_panel", index))
            .width(axes.size.x)
            .height(axes.size.y)
            .show_background(false)
            .show_grid(axes.grid)
            .x_axis_formatter(move |mark, _range| tick_label(&x_categories, mark.value))
            .y_axis_formatter(move |mark, _range| tick_label(&y_categories, mark.value * flip));

        if let Some(x_label) = &axes.x_label {
            plot = plot.x_axis_label(x_label.clone());
        }
        if let Some(y_label) = &axes.y_label {
            plot = plot.y_axis_label(y_label.clone());
        }
        if let Some([min, max]) = axes.y_range {
            plot = plot.include_y(min * flip).include_y(max * flip);
        }
        if !axes.y_ticks.is_empty() {
            let ticks = axes.y_ticks.iter().map(|tick| tick * flip).collect_vec();
            plot = plot.y_grid_spacer(move |_input| {
                ticks
                    .iter()
                    .map(|value| GridMark {
                        value: *value,
                        step_size: FIXED_TICK_STEP,
                    })
                    .collect()
            });
        }
        if axes.legend {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            for mark in &self.marks {
                paint_mark(plot_ui, mark, flip);
            }
        });
    }
}

fn paint_mark(plot_ui: &mut PlotUi<'_>, mark: &Mark, flip: f64) {
    match mark {
        Mark::Box(mark) => {
            let stats = &mark.stats;
            let [low, q1, median, q3, high] = [
                stats.lower_whisker,
                stats.q1,
                stats.median,
                stats.q3,
                stats.upper_whisker,
            ]
            .map(|v| v * flip);
            let spread = if flip < 0.0 {
                BoxSpread::new(high, q3, median, q1, low)
            } else {
                BoxSpread::new(low, q1, median, q3, high)
            };
            let elem = BoxElem::new(mark.x, spread)
                .box_width(mark.width)
                .whisker_width(mark.width * 0.5)
                .fill(mark.fill)
                .stroke(Stroke::new(1.0, mark.edge));
            plot_ui.box_plot(BoxPlot::new(mark.series.clone(), vec![elem]));

            if !stats.outliers.is_empty() {
                let outliers = stats
                    .outliers
                    .iter()
                    .map(|v| [mark.x, v * flip])
                    .collect_vec();
                plot_ui.points(
                    Points::new(mark.series.clone(), PlotPoints::new(outliers))
                        .color(mark.edge)
                        .radius(OUTLIER_RADIUS),
                );
            }
        }
        Mark::Violin(mark) => {
            plot_ui.polygon(
                Polygon::new(mark.series.clone(), flipped(&mark.outline, flip))
                    .fill_color(mark.fill.gamma_multiply(0.5))
                    .stroke(Stroke::new(1.0, mark.fill)),
            );
        }
        Mark::Line(mark) => {
            plot_ui.line(
                Line::new(mark.name.clone(), flipped(&mark.points, flip))
                    .color(mark.color)
                    .width(mark.width)
                    .style(line_style(mark.dash)),
            );
        }
        Mark::Scatter(mark) => {
            plot_ui.points(
                Points::new(mark.name.clone(), flipped(&mark.points, flip))
                    .color(mark.color)
                    .radius(mark.radius)
                    .shape(marker_shape(mark.marker))
                    .filled(true),
            );
        }
        Mark::Bar(mark) => {
            let bar = Bar::new(mark.row * flip, mark.length)
                .base_offset(mark.left)
                .width(mark.thickness)
                .fill(mark.fill)
                .stroke(Stroke::new(1.0, mark.edge))
                .name(mark.name.clone());
            plot_ui.bar_chart(BarChart::new(mark.series.clone(), vec![bar]).horizontal());
        }
    }
}

fn flipped(points: &[[f64; 2]], flip: f64) -> PlotPoints<'static> {
    PlotPoints::new(points.iter().map(|[x, y]| [*x, y * flip]).collect_vec())
}

fn line_style(dash: Dash) -> LineStyle {
    match dash {
        Dash::Solid => LineStyle::Solid,
        Dash::Dashed => LineStyle::dashed_loose(),
        Dash::Dotted => LineStyle::dotted_loose(),
    }
}

fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Circle => MarkerShape::Circle,
        Marker::Diamond => MarkerShape::Diamond,
        Marker::Square => MarkerShape::Square,
    }
}

/// Category name for whole-number ticks, plain numbers without categories
fn tick_label(categories: &[String], value: f64) -> String {
    if categories.is_empty() {
        return format_tick(value);
    }
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

fn format_tick(value: f64) -> String {
    // avoid printing "-0" on mirrored axes
    let value = if value == 0.0 { 0.0 } else { value };
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').to_string()
    }
}
