use egui::Vec2;
use itertools::Itertools;

use super::figure_size;
use crate::{
    LapChartError,
    aggregate::{
        DriverGroup, driver_groups,
        stints::{StintRule, derive_stints},
    },
    chart::{
        Axes, BarMark, Surface,
        palette::{ColorMap, PALETTE_BLACK, PALETTE_GREY},
    },
    laps::{Column, LapTable},
};

const BAR_THICKNESS: f64 = 0.8;

/// Top to bottom order of the driver rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowOrder {
    /// As the drivers were passed in
    #[default]
    Caller,
    /// By position on each driver's last classified lap, drivers without a
    /// position last
    FinishingPosition,
}

#[derive(Clone, Debug)]
pub struct TyreStrategyOptions {
    pub title: Option<String>,
    /// Bar colour per compound name, unknown compounds are grey
    pub compound_colors: ColorMap,
    pub row_order: RowOrder,
    pub stint_rule: StintRule,
    pub size: Vec2,
}

impl Default for TyreStrategyOptions {
    fn default() -> Self {
        Self {
            title: Some("Tyre Strategy".to_string()),
            compound_colors: ColorMap::compounds(),
            row_order: RowOrder::default(),
            stint_rule: StintRule::default(),
            size: figure_size(10., 5.),
        }
    }
}

/// One row per driver with a bar segment per stint, spanning the laps run
/// on that compound.
pub fn plot_tyre_strategy<S: Surface, D: AsRef<str>>(
    laps: &LapTable,
    drivers: &[D],
    options: &TyreStrategyOptions,
    surface: &mut S,
) -> Result<(), LapChartError> {
    laps.require_column(Column::Compound)?;

    let mut groups = driver_groups(laps, drivers);
    if options.row_order == RowOrder::FinishingPosition {
        groups = by_finishing_position(groups);
    }

    surface.begin_axes(
        Axes::new(options.size)
            .with_title(options.title.as_deref())
            .with_labels(Some("Lap Number"), None)
            .with_y_categories(groups.iter().map(|g| g.driver.to_string()).collect_vec())
            .inverted_y()
            .with_grid(true, false),
    );

    for (row, group) in groups.iter().enumerate() {
        for stint in derive_stints(group, options.stint_rule) {
            let compound = stint.compound.name();
            surface.bars(BarMark {
                series: stint.driver.clone(),
                name: compound.to_string(),
                row: row as f64,
                left: f64::from(stint.start_lap) - 1.0,
                length: f64::from(stint.lap_count),
                thickness: BAR_THICKNESS,
                fill: options.compound_colors.get_or(compound, PALETTE_GREY),
                edge: PALETTE_BLACK,
            });
        }
    }
    Ok(())
}

fn by_finishing_position(groups: Vec<DriverGroup<'_>>) -> Vec<DriverGroup<'_>> {
    groups
        .into_iter()
        .sorted_by_key(|group| group.final_position().unwrap_or(u32::MAX))
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::palette::{COMPOUND_MEDIUM, COMPOUND_SOFT};
    use crate::chart::{Figure, Mark};
    use crate::laps::{Compound, LapRecord};

    fn bars(figure: &Figure) -> Vec<&BarMark> {
        figure
            .marks()
            .filter_map(|mark| match mark {
                Mark::Bar(bar) => Some(bar),
                _ => None,
            })
            .collect_vec()
    }

    fn race_laps() -> LapTable {
        LapTable::new(vec![
            LapRecord::new("C", 1).with_compound(Compound::Soft).with_position(3),
            LapRecord::new("C", 2).with_compound(Compound::Soft).with_position(3),
            LapRecord::new("C", 3).with_compound(Compound::Medium).with_position(2),
            LapRecord::new("C", 4).with_compound(Compound::Medium).with_position(2),
            LapRecord::new("C", 5).with_compound(Compound::Medium).with_position(2),
            LapRecord::new("D", 1).with_compound(Compound::Hard).with_position(1),
            LapRecord::new("D", 2).with_compound(Compound::Hard).with_position(1),
            LapRecord::new("D", 3).with_position(1),
        ])
    }

    #[test]
    fn test_one_bar_per_stint() {
        let mut figure = Figure::new();
        plot_tyre_strategy(
            &race_laps(),
            &["C", "X", "D"],
            &TyreStrategyOptions::default(),
            &mut figure,
        )
        .unwrap();

        assert_eq!(figure.series(), vec!["C", "D"]);
        let bars = bars(&figure);
        assert_eq!(bars.len(), 4);
        assert_eq!((bars[0].left, bars[0].length), (0.0, 2.0));
        assert_eq!(bars[0].fill, COMPOUND_SOFT);
        assert_eq!((bars[1].left, bars[1].length), (2.0, 3.0));
        assert_eq!(bars[1].fill, COMPOUND_MEDIUM);
        assert_eq!(bars[1].edge, PALETTE_BLACK);
        // lap without a compound gets its own single-lap stint
        assert_eq!((bars[3].row, bars[3].left, bars[3].length), (1.0, 2.0, 1.0));
        assert_eq!(bars[3].name, "UNKNOWN");

        let axes = &figure.panels()[0].axes;
        assert_eq!(axes.y_categories, vec!["C", "D"]);
        assert!(axes.invert_y);
        assert_eq!(axes.grid, [true, false]);
        assert_eq!(axes.x_label.as_deref(), Some("Lap Number"));
    }

    #[test]
    fn test_repeated_driver_gets_one_row() {
        let mut figure = Figure::new();
        plot_tyre_strategy(
            &race_laps(),
            &["C", "C"],
            &TyreStrategyOptions::default(),
            &mut figure,
        )
        .unwrap();
        assert_eq!(figure.panels()[0].axes.y_categories, vec!["C"]);
        assert_eq!(bars(&figure).len(), 2);
    }

    #[test]
    fn test_rows_by_finishing_position() {
        let options = TyreStrategyOptions {
            row_order: RowOrder::FinishingPosition,
            ..Default::default()
        };
        let mut figure = Figure::new();
        plot_tyre_strategy(&race_laps(), &["C", "D"], &options, &mut figure).unwrap();
        assert_eq!(figure.panels()[0].axes.y_categories, vec!["D", "C"]);
        assert_eq!(bars(&figure)[0].series, "D");
        assert_eq!(bars(&figure)[0].row, 0.0);
    }

    #[test]
    fn test_recorded_stints_split_same_compound() {
        let laps = LapTable::new(vec![
            LapRecord::new("E", 1).with_compound(Compound::Hard).with_stint(1),
            LapRecord::new("E", 2).with_compound(Compound::Hard).with_stint(2),
        ]);
        let mut figure = Figure::new();
        plot_tyre_strategy(&laps, &["E"], &TyreStrategyOptions::default(), &mut figure).unwrap();
        assert_eq!(bars(&figure).len(), 1);

        let options = TyreStrategyOptions {
            stint_rule: StintRule::RecordedStint,
            ..Default::default()
        };
        let mut figure = Figure::new();
        plot_tyre_strategy(&laps, &["E"], &options, &mut figure).unwrap();
        assert_eq!(
            bars(&figure)
                .iter()
                .map(|bar| (bar.left, bar.length))
                .collect_vec(),
            vec![(0.0, 1.0), (1.0, 1.0)]
        );
    }

    #[test]
    fn test_missing_compound_column_fails() {
        let laps = LapTable::new(vec![LapRecord::new("C", 1)]);
        let result = plot_tyre_strategy(
            &laps,
            &["C"],
            &TyreStrategyOptions::default(),
            &mut Figure::new(),
        );
        assert!(matches!(
            result,
            Err(LapChartError::MissingColumn {
                column: Column::Compound
            })
        ));
    }
}
