// Stint derivation from per-lap compound data

use itertools::Itertools;

use super::{DriverGroup, driver_groups};
use crate::laps::{Compound, LapTable};

/// Where one stint ends and the next begins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StintRule {
    /// A new stint starts whenever the compound changes
    #[default]
    CompoundChange,
    /// A new stint also starts when the recorded stint number changes, so a
    /// pit stop onto the same compound opens a new stint
    RecordedStint,
}

/// A driver's contiguous run of laps on one compound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stint {
    pub driver: String,
    /// 1-based position of the stint in the driver's race
    pub number: u32,
    pub compound: Compound,
    pub start_lap: u32,
    pub end_lap: u32,
    pub lap_count: u32,
}

impl Stint {
    pub fn contains_lap(&self, lap_number: u32) -> bool {
        (self.start_lap..=self.end_lap).contains(&lap_number)
    }
}

/// Splits a driver's ordered laps into stints. Laps without a compound count
/// as [`Compound::Unknown`].
pub fn derive_stints(group: &DriverGroup<'_>, rule: StintRule) -> Vec<Stint> {
    let runs = group.laps.iter().chunk_by(|lap| {
        let compound = lap.compound.unwrap_or(Compound::Unknown);
        match rule {
            StintRule::CompoundChange => (compound, None),
            StintRule::RecordedStint => (compound, lap.stint),
        }
    });

    let mut stints = Vec::new();
    for ((compound, _), run) in &runs {
        let run = run.collect_vec();
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            continue;
        };
        stints.push(Stint {
            driver: group.driver.to_string(),
            number: stints.len() as u32 + 1,
            compound,
            start_lap: first.lap_number,
            end_lap: last.lap_number,
            lap_count: run.len() as u32,
        });
    }
    stints
}

/// Stints of every requested driver, drivers in the requested order.
pub fn derive_all_stints<S: AsRef<str>>(
    laps: &LapTable,
    drivers: &[S],
    rule: StintRule,
) -> Vec<Stint> {
    driver_groups(laps, drivers)
        .iter()
        .flat_map(|group| derive_stints(group, rule))
        .collect_vec()
}
