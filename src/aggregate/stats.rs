// Summary statistics used by the distribution charts

use itertools::Itertools;

/// Reach of the whiskers in multiples of the inter-quartile range
const WHISKER_IQR: f64 = 1.5;
/// Number of evaluation points along a density curve
const DENSITY_GRID_POINTS: usize = 100;
/// Density curves extend this many bandwidths past the extreme values
const DENSITY_CUT: f64 = 2.0;

/// Quantile of already sorted values, linear interpolation between the two
/// closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = values.iter().copied().sorted_by(f64::total_cmp).collect_vec();
    quantile(&sorted, 0.5)
}

/// Five number summary of a box with its outliers.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Whiskers end at the most extreme values within 1.5 IQR of the box,
    /// everything beyond is an outlier.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .sorted_by(f64::total_cmp)
            .collect_vec();
        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let reach = (q3 - q1) * WHISKER_IQR;
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let inside = sorted
            .iter()
            .copied()
            .filter(|v| (low_fence..=high_fence).contains(v))
            .collect_vec();
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect_vec();

        Some(Self {
            lower_whisker: inside.first().copied().unwrap_or(q1),
            q1,
            median,
            q3,
            upper_whisker: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }
}

/// Gaussian kernel density estimate sampled on an even grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Density {
    /// `[value, density]` pairs in ascending value order
    pub curve: Vec<[f64; 2]>,
    pub max_density: f64,
}

/// Kernel density with Scott's rule bandwidth. Needs at least two distinct
/// values, a single value has no spread to estimate from.
pub fn kernel_density(values: &[f64]) -> Option<Density> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return None;
    }

    let (min, max) = values
        .iter()
        .copied()
        .minmax_by(f64::total_cmp)
        .into_option()?;
    let start = min - DENSITY_CUT * bandwidth;
    let step = (max - min + 2.0 * DENSITY_CUT * bandwidth) / (DENSITY_GRID_POINTS - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let curve = (0..DENSITY_GRID_POINTS)
        .map(|i| {
            let x = start + step * i as f64;
            let density = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density]
        })
        .collect_vec();
    let max_density = curve.iter().map(|p| p[1]).fold(0.0, f64::max);
    Some(Density { curve, max_density })
}

/// Horizontal offsets that keep close values from drawing on top of each
/// other. Values closer than `spacing` share a bin, points within a bin fan
/// out alternately to the right and left of the centre line, never past
/// `max_offset`.
pub fn swarm_offsets(values: &[f64], spacing: f64, max_offset: f64) -> Vec<f64> {
    let mut offsets = vec![0.0; values.len()];
    if spacing <= 0.0 {
        return offsets;
    }
    let order = (0..values.len())
        .sorted_by(|a, b| values[*a].total_cmp(&values[*b]))
        .collect_vec();

    let mut bin_start = f64::NEG_INFINITY;
    let mut slot = 0usize;
    for index in order {
        let value = values[index];
        if value - bin_start >= spacing {
            bin_start = value;
            slot = 0;
        }
        // slots 0, 1, 2, 3, 4 map to 0, +1, -1, +2, -2
        let step = slot.div_ceil(2) as f64;
        let side = if slot % 2 == 1 { 1.0 } else { -1.0 };
        offsets[index] = (side * step * spacing).clamp(-max_offset, max_offset);
        slot += 1;
    }
    offsets
}
