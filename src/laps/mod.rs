// Lap records and the lap table handed to every renderer

pub mod loader;

use std::{collections::HashMap, fmt, time::Duration};

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::{aggregate::stints::Stint, errors::LapChartError};

/// Tyre compound as reported by the timing feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    TestUnknown,
    #[serde(other)]
    Unknown,
}

impl Compound {
    pub const DRY: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Soft => "SOFT",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Intermediate => "INTERMEDIATE",
            Self::Wet => "WET",
            Self::TestUnknown => "TEST_UNKNOWN",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of timing data: a single driver's single lap.
///
/// Field names follow snake case, the column names used by the upstream
/// timing library (`Driver`, `LapNumber`, `LapTime (s)`, ...) are accepted
/// as aliases so exported data frames can be read as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    #[serde(alias = "Driver")]
    pub driver: String,
    #[serde(default, alias = "Team")]
    pub team: Option<String>,
    #[serde(alias = "LapNumber", deserialize_with = "whole_number")]
    pub lap_number: u32,
    /// Lap time, serialized as seconds
    #[serde(
        rename = "lap_time_s",
        alias = "LapTime (s)",
        alias = "LapTimeSeconds",
        default,
        with = "seconds"
    )]
    pub lap_time: Option<Duration>,
    #[serde(default, alias = "Compound")]
    pub compound: Option<Compound>,
    #[serde(default, alias = "Stint", deserialize_with = "optional_whole_number")]
    pub stint: Option<u32>,
    /// Track position at the end of the lap, 1 is the leader
    #[serde(default, alias = "Position", deserialize_with = "optional_whole_number")]
    pub position: Option<u32>,
    #[serde(default, alias = "PitIn")]
    pub pit_in: bool,
    #[serde(default, alias = "PitOut")]
    pub pit_out: bool,
    #[serde(default = "accurate_by_default", alias = "IsAccurate")]
    pub is_accurate: bool,
}

fn accurate_by_default() -> bool {
    true
}

impl LapRecord {
    pub fn new(driver: &str, lap_number: u32) -> Self {
        Self {
            driver: driver.to_string(),
            team: None,
            lap_number,
            lap_time: None,
            compound: None,
            stint: None,
            position: None,
            pit_in: false,
            pit_out: false,
            is_accurate: true,
        }
    }

    pub fn with_team(mut self, team: &str) -> Self {
        self.team = Some(team.to_string());
        self
    }

    pub fn with_lap_time_s(mut self, seconds: f64) -> Self {
        self.lap_time = Duration::try_from_secs_f64(seconds).ok();
        self
    }

    pub fn with_compound(mut self, compound: Compound) -> Self {
        self.compound = Some(compound);
        self
    }

    pub fn with_stint(mut self, stint: u32) -> Self {
        self.stint = Some(stint);
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_pit_in(mut self) -> Self {
        self.pit_in = true;
        self
    }

    pub fn with_pit_out(mut self) -> Self {
        self.pit_out = true;
        self
    }

    pub fn inaccurate(mut self) -> Self {
        self.is_accurate = false;
        self
    }

    pub fn lap_time_s(&self) -> Option<f64> {
        self.lap_time.map(|t| t.as_secs_f64())
    }

    /// In-laps and out-laps, the two laps touched by a pit stop
    pub fn is_pit_lap(&self) -> bool {
        self.pit_in || self.pit_out
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(lap_time) => serializer.serialize_some(&lap_time.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|s| {
                Duration::try_from_secs_f64(s)
                    .map_err(|_| D::Error::custom(format!("invalid lap time {s}s")))
            })
            .transpose()
    }
}

// Data frame exports write integer columns holding NaN as floats ("3.0")
fn as_whole_number(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value)).then_some(value as u32)
}

fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    as_whole_number(value).ok_or_else(|| D::Error::custom(format!("{value} is not a lap index")))
}

fn optional_whole_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    Option::<f64>::deserialize(deserializer)?
        .map(|value| {
            as_whole_number(value)
                .ok_or_else(|| D::Error::custom(format!("{value} is not a whole number")))
        })
        .transpose()
}

/// Columns a renderer may depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Team,
    LapTime,
    Compound,
    Stint,
    Position,
}

impl Column {
    fn is_set(&self, lap: &LapRecord) -> bool {
        match self {
            Self::Team => lap.team.is_some(),
            Self::LapTime => lap.lap_time.is_some(),
            Self::Compound => lap.compound.is_some(),
            Self::Stint => lap.stint.is_some(),
            Self::Position => lap.position.is_some(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Team => "Team",
            Self::LapTime => "LapTime",
            Self::Compound => "Compound",
            Self::Stint => "Stint",
            Self::Position => "Position",
        };
        f.write_str(name)
    }
}

/// Laps of one session, in the order they were supplied.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct LapTable {
    records: Vec<LapRecord>,
}

impl LapTable {
    pub fn new(records: Vec<LapRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LapRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LapRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct drivers in order of first appearance
    pub fn drivers(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|lap| lap.driver.as_str())
            .unique()
            .collect_vec()
    }

    /// Distinct teams in order of first appearance
    pub fn teams(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|lap| lap.team.as_deref())
            .unique()
            .collect_vec()
    }

    pub fn has_driver(&self, driver: &str) -> bool {
        self.records.iter().any(|lap| lap.driver == driver)
    }

    pub fn pick_drivers<S: AsRef<str>>(&self, drivers: &[S]) -> LapTable {
        self.filtered(|lap| drivers.iter().any(|d| d.as_ref() == lap.driver))
    }

    /// Timed laps flagged as accurate by the timing feed
    pub fn pick_accurate(&self) -> LapTable {
        self.filtered(|lap| lap.is_accurate && lap.lap_time.is_some())
    }

    /// Drops in-laps and out-laps
    pub fn pick_wo_box(&self) -> LapTable {
        self.filtered(|lap| !lap.is_pit_lap())
    }

    /// Timed laps no slower than `threshold` times the fastest lap of the table
    pub fn pick_quicklaps(&self, threshold: f64) -> LapTable {
        let Some(fastest) = self.iter().filter_map(LapRecord::lap_time_s).min_by(f64::total_cmp)
        else {
            return LapTable::default();
        };
        let cutoff = fastest * threshold;
        self.filtered(|lap| lap.lap_time_s().is_some_and(|t| t <= cutoff))
    }

    /// Fastest timed lap of a driver, the earliest one on ties
    pub fn pick_fastest(&self, driver: &str) -> Option<&LapRecord> {
        self.records
            .iter()
            .filter(|lap| lap.driver == driver)
            .filter_map(|lap| lap.lap_time.map(|t| (t, lap)))
            .min_by_key(|(lap_time, _)| *lap_time)
            .map(|(_, lap)| lap)
    }

    /// Fails when the table has laps but none of them carries `column`.
    pub fn require_column(&self, column: Column) -> Result<(), LapChartError> {
        if self.records.is_empty() || self.records.iter().any(|lap| column.is_set(lap)) {
            Ok(())
        } else {
            Err(LapChartError::MissingColumn { column })
        }
    }

    /// Copy of the table with each lap's stint number taken from `stints`.
    /// Laps outside every stint keep their recorded stint.
    pub fn with_stints(&self, stints: &[Stint]) -> LapTable {
        let by_driver: HashMap<&str, Vec<&Stint>> = stints
            .iter()
            .map(|stint| (stint.driver.as_str(), stint))
            .into_group_map();
        self.records
            .iter()
            .map(|lap| {
                let mut lap = lap.clone();
                if let Some(stint) = by_driver.get(lap.driver.as_str()).and_then(|driver_stints| {
                    driver_stints.iter().find(|s| s.contains_lap(lap.lap_number))
                }) {
                    lap.stint = Some(stint.number);
                }
                lap
            })
            .collect()
    }

    fn filtered(&self, keep: impl Fn(&LapRecord) -> bool) -> LapTable {
        self.records.iter().filter(|lap| keep(lap)).cloned().collect()
    }
}

impl FromIterator<LapRecord> for LapTable {
    fn from_iter<T: IntoIterator<Item = LapRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LapTable {
    type Item = &'a LapRecord;
    type IntoIter = std::slice::Iter<'a, LapRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
