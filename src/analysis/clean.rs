//! Cleaning steps applied before any statistics are computed.

use crate::domain::Observation;

/// Drop observations whose value is not a finite number.
///
/// Returns the kept observations and how many were dropped.
pub fn drop_non_finite(observations: &[Observation]) -> (Vec<Observation>, usize) {
    let kept: Vec<Observation> = observations.iter().copied().filter(|o| o.value.is_finite()).collect();
    let dropped = observations.len() - kept.len();
    (kept, dropped)
}

/// Remove observations that break an otherwise regular date spacing.
///
/// Gaps (in days) between consecutive dates are only considered irregular when
/// their coefficient of variation exceeds 1. In that case every observation
/// whose preceding gap is more than one standard deviation away from the
/// median gap is dropped. Regular series come back unchanged.
pub fn regularize_spacing(observations: &[Observation]) -> (Vec<Observation>, usize) {
    if observations.len() < 3 {
        return (observations.to_vec(), 0);
    }

    let gaps: Vec<f64> = observations
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days() as f64)
        .collect();

    let n = gaps.len() as f64;
    let mean = gaps.iter().sum::<f64>() / n;
    let std = (gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();

    if !(mean > 0.0 && std / mean > 1.0) {
        return (observations.to_vec(), 0);
    }

    let median = median(&gaps);
    let mut kept = Vec::with_capacity(observations.len());
    kept.push(observations[0]);
    for (obs, gap) in observations[1..].iter().zip(&gaps) {
        if (gap - median).abs() <= std {
            kept.push(*obs);
        }
    }

    let dropped = observations.len() - kept.len();
    (kept, dropped)
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
