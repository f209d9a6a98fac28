// Grouping of lap records ahead of drawing

pub mod stats;
pub mod stints;

use itertools::Itertools;
use log::{debug, warn};

use crate::laps::{LapRecord, LapTable};

/// All laps of one driver ordered by lap number.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverGroup<'a> {
    pub driver: &'a str,
    pub laps: Vec<&'a LapRecord>,
}

impl<'a> DriverGroup<'a> {
    /// Laps carrying a lap time, as `[lap_number, seconds]`
    pub fn lap_time_points(&self) -> Vec<[f64; 2]> {
        self.timed_laps()
            .map(|(lap, seconds)| [lap.lap_number as f64, seconds])
            .collect_vec()
    }

    pub fn lap_times_s(&self) -> Vec<f64> {
        self.timed_laps().map(|(_, seconds)| seconds).collect_vec()
    }

    pub fn timed_laps(&self) -> impl Iterator<Item = (&'a LapRecord, f64)> + '_ {
        self.laps
            .iter()
            .filter_map(|lap| lap.lap_time_s().map(|seconds| (*lap, seconds)))
    }

    /// Position on the last lap that recorded one
    pub fn final_position(&self) -> Option<u32> {
        self.laps.iter().rev().find_map(|lap| lap.position)
    }
}

/// Collects the laps of `driver`, sorted by lap number. Repeated lap numbers
/// keep their first record. Returns `None` when the driver has no laps.
pub fn driver_group<'a>(laps: &'a LapTable, driver: &str) -> Option<DriverGroup<'a>> {
    let sorted = laps
        .iter()
        .filter(|lap| lap.driver == driver)
        .sorted_by_key(|lap| lap.lap_number)
        .collect_vec();
    let first = sorted.first()?;

    let unique_laps = sorted
        .iter()
        .copied()
        .dedup_by(|a, b| a.lap_number == b.lap_number)
        .collect_vec();
    if unique_laps.len() != sorted.len() {
        warn!(
            "Dropped {} duplicate laps for driver {}",
            sorted.len() - unique_laps.len(),
            driver
        );
    }

    Some(DriverGroup {
        driver: first.driver.as_str(),
        laps: unique_laps,
    })
}

/// Driver groups in the requested order. Drivers without laps are skipped,
/// a driver requested twice keeps its first place.
pub fn driver_groups<'a, S: AsRef<str>>(laps: &'a LapTable, drivers: &[S]) -> Vec<DriverGroup<'a>> {
    requested_drivers(drivers)
        .into_iter()
        .filter_map(|driver| {
            let group = driver_group(laps, driver);
            if group.is_none() {
                debug!("No laps for driver {}, skipping", driver);
            }
            group
        })
        .collect_vec()
}

/// Requested drivers without repeats, in order of first request
pub fn requested_drivers<S: AsRef<str>>(drivers: &[S]) -> Vec<&str> {
    drivers.iter().map(AsRef::as_ref).unique().collect_vec()
}

/// Lap times of one team.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamGroup {
    pub team: String,
    pub lap_times_s: Vec<f64>,
    pub median_s: f64,
}

/// Groups timed laps by team, fastest median first. Teams with equal
/// medians keep the order in which they first appear.
pub fn team_groups<'a>(laps: impl IntoIterator<Item = &'a LapRecord>) -> Vec<TeamGroup> {
    let mut teams: Vec<(String, Vec<f64>)> = Vec::new();
    for lap in laps {
        let (Some(team), Some(seconds)) = (lap.team.as_deref(), lap.lap_time_s()) else {
            continue;
        };
        match teams.iter_mut().find(|(name, _)| name == team) {
            Some((_, times)) => times.push(seconds),
            None => teams.push((team.to_string(), vec![seconds])),
        }
    }

    teams
        .into_iter()
        .filter_map(|(team, lap_times_s)| {
            let median_s = stats::median(&lap_times_s)?;
            Some(TeamGroup {
                team,
                lap_times_s,
                median_s,
            })
        })
        .sorted_by(|a, b| a.median_s.total_cmp(&b.median_s))
        .collect_vec()
}
