// Drawing surface the renderers issue their marks on

pub mod palette;

mod egui_view;

use egui::{Color32, Vec2};
use itertools::Itertools;

use crate::aggregate::stats::BoxStats;

/// Layout of one set of axes: labels, categories, ranges and decorations.
#[derive(Clone, Debug, PartialEq)]
pub struct Axes {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub size: Vec2,
    /// Tick labels for x = 0, 1, 2, ...
    pub x_categories: Vec<String>,
    /// Tick labels for y = 0, 1, 2, ...
    pub y_categories: Vec<String>,
    /// Draw larger y values lower down
    pub invert_y: bool,
    /// Data range `[min, max]` that must stay visible on the y axis
    pub y_range: Option<[f64; 2]>,
    /// Fixed y tick positions, automatic when empty
    pub y_ticks: Vec<f64>,
    /// Grid lines along x and y
    pub grid: [bool; 2],
    pub legend: bool,
}

impl Axes {
    pub fn new(size: Vec2) -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            size,
            x_categories: Vec::new(),
            y_categories: Vec::new(),
            invert_y: false,
            y_range: None,
            y_ticks: Vec::new(),
            grid: [true, true],
            legend: false,
        }
    }

    pub fn with_title(mut self, title: Option<&str>) -> Self {
        self.title = title.map(str::to_string);
        self
    }

    pub fn with_labels(mut self, x_label: Option<&str>, y_label: Option<&str>) -> Self {
        self.x_label = x_label.map(str::to_string);
        self.y_label = y_label.map(str::to_string);
        self
    }

    pub fn with_x_categories(mut self, categories: Vec<String>) -> Self {
        self.x_categories = categories;
        self
    }

    pub fn with_y_categories(mut self, categories: Vec<String>) -> Self {
        self.y_categories = categories;
        self
    }

    pub fn inverted_y(mut self) -> Self {
        self.invert_y = true;
        self
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some([min, max]);
        self
    }

    pub fn with_y_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.y_ticks = ticks;
        self
    }

    pub fn with_grid(mut self, x: bool, y: bool) -> Self {
        self.grid = [x, y];
        self
    }

    pub fn with_legend(mut self) -> Self {
        self.legend = true;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl Dash {
    /// Solid, dashed, dotted, solid, ...
    pub fn cycle(index: usize) -> Self {
        match index % 3 {
            0 => Self::Solid,
            1 => Self::Dashed,
            _ => Self::Dotted,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Marker {
    #[default]
    Circle,
    Diamond,
    Square,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoxMark {
    pub series: String,
    pub x: f64,
    pub stats: BoxStats,
    pub fill: Color32,
    pub edge: Color32,
    pub width: f64,
}

/// Mirrored density outline around `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViolinMark {
    pub series: String,
    pub x: f64,
    /// Values the density was estimated from
    pub values: Vec<f64>,
    /// Closed polygon in data coordinates
    pub outline: Vec<[f64; 2]>,
    pub fill: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineMark {
    pub series: String,
    /// Legend entry
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub color: Color32,
    pub width: f32,
    pub dash: Dash,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterMark {
    pub series: String,
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub color: Color32,
    pub radius: f32,
    pub marker: Marker,
}

/// Horizontal bar segment from `left` to `left + length` on row `row`.
#[derive(Clone, Debug, PartialEq)]
pub struct BarMark {
    pub series: String,
    pub name: String,
    pub row: f64,
    pub left: f64,
    pub length: f64,
    pub thickness: f64,
    pub fill: Color32,
    pub edge: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
    Box(BoxMark),
    Violin(ViolinMark),
    Line(LineMark),
    Scatter(ScatterMark),
    Bar(BarMark),
}

impl Mark {
    /// Group (team or driver) the mark was drawn for
    pub fn series(&self) -> &str {
        match self {
            Self::Box(mark) => &mark.series,
            Self::Violin(mark) => &mark.series,
            Self::Line(mark) => &mark.series,
            Self::Scatter(mark) => &mark.series,
            Self::Bar(mark) => &mark.series,
        }
    }
}

/// A drawing target. Marks go to the axes most recently begun.
pub trait Surface {
    fn begin_axes(&mut self, axes: Axes);
    fn box_plot(&mut self, mark: BoxMark);
    fn violin(&mut self, mark: ViolinMark);
    fn line(&mut self, mark: LineMark);
    fn scatter(&mut self, mark: ScatterMark);
    fn bars(&mut self, mark: BarMark);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub axes: Axes,
    pub marks: Vec<Mark>,
}

impl Panel {
    /// Distinct series in draw order
    pub fn series(&self) -> Vec<&str> {
        self.marks.iter().map(Mark::series).unique().collect_vec()
    }
}

/// Retained surface: keeps every panel and mark so the chart can be
/// inspected or painted later with [`Figure::show`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Figure {
    panels: Vec<Panel>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.panels.iter().flat_map(|panel| panel.marks.iter())
    }

    /// Distinct series across all panels in draw order
    pub fn series(&self) -> Vec<&str> {
        self.marks().map(Mark::series).unique().collect_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.marks().next().is_none()
    }

    fn push(&mut self, mark: Mark) {
        if self.panels.is_empty() {
            self.begin_axes(Axes::new(Vec2::new(640., 480.)));
        }
        if let Some(panel) = self.panels.last_mut() {
            panel.marks.push(mark);
        }
    }
}

impl Surface for Figure {
    fn begin_axes(&mut self, axes: Axes) {
        self.panels.push(Panel {
            axes,
            marks: Vec::new(),
        });
    }

    fn box_plot(&mut self, mark: BoxMark) {
        self.push(Mark::Box(mark));
    }

    fn violin(&mut self, mark: ViolinMark) {
        self.push(Mark::Violin(mark));
    }

    fn line(&mut self, mark: LineMark) {
        self.push(Mark::Line(mark));
    }

    fn scatter(&mut self, mark: ScatterMark) {
        self.push(Mark::Scatter(mark));
    }

    fn bars(&mut self, mark: BarMark) {
        self.push(Mark::Bar(mark));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(series: &str) -> LineMark {
        LineMark {
            series: series.to_string(),
            name: series.to_string(),
            points: vec![[1.0, 2.0]],
            color: Color32::RED,
            width: 1.0,
            dash: Dash::Solid,
        }
    }

    #[test]
    fn test_figure_records_marks_per_panel() {
        let mut figure = Figure::new();
        figure.begin_axes(Axes::new(Vec2::new(100., 100.)).with_title(Some("first")));
        figure.line(line("A"));
        figure.line(line("B"));
        figure.line(line("A"));
        figure.begin_axes(Axes::new(Vec2::new(100., 100.)));
        figure.line(line("C"));

        assert_eq!(figure.panels().len(), 2);
        assert_eq!(figure.panels()[0].series(), vec!["A", "B"]);
        assert_eq!(figure.series(), vec!["A", "B", "C"]);
        assert_eq!(figure.marks().count(), 4);
    }

    #[test]
    fn test_marks_without_axes_open_a_default_panel() {
        let mut figure = Figure::new();
        assert!(figure.is_empty());
        figure.line(line("A"));
        assert_eq!(figure.panels().len(), 1);
        assert!(!figure.is_empty());
    }

    #[test]
    fn test_dash_cycle() {
        assert_eq!(Dash::cycle(0), Dash::Solid);
        assert_eq!(Dash::cycle(1), Dash::Dashed);
        assert_eq!(Dash::cycle(5), Dash::Dotted);
    }
}
