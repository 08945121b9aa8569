//! Kurtosis and how much of it a single observation explains.

use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KurtosisDecomposition {
    /// Fisher (excess) kurtosis, population moments.
    pub excess_kurtosis: f64,
    /// Share of `Σ (x - mean)^4` contributed by the largest term, in percent.
    pub max_share_pct: f64,
    /// Index of that term. Ties resolve to the last index.
    pub max_index: usize,
}

pub fn kurtosis_decomposition(values: &[f64]) -> Result<KurtosisDecomposition, AppError> {
    if values.len() < 2 {
        return Err(AppError::analysis("Kurtosis needs at least 2 observations."));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let fourth: Vec<f64> = values.iter().map(|v| (v - mean).powi(4)).collect();
    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let sum4: f64 = fourth.iter().sum();

    if !(m2 > 0.0) {
        return Err(AppError::analysis("Kurtosis is undefined for a constant series."));
    }

    let (max_index, max_term) = fourth
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, t)| if t >= best.1 { (i, t) } else { best });

    Ok(KurtosisDecomposition {
        excess_kurtosis: (sum4 / n) / (m2 * m2) - 3.0,
        max_share_pct: max_term / sum4 * 100.0,
        max_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_spike_dominates() {
        // mean = 2, deviations (-2, -2, -2, -2, 8)
        let k = kurtosis_decomposition(&[0.0, 0.0, 0.0, 0.0, 10.0]).unwrap();
        assert!((k.excess_kurtosis - 0.25).abs() < 1e-12);
        assert!((k.max_share_pct - 4096.0 / 4160.0 * 100.0).abs() < 1e-9);
        assert_eq!(k.max_index, 4);
    }

    #[test]
    fn ties_resolve_to_last_index() {
        let k = kurtosis_decomposition(&[-1.0, 1.0, -1.0, 1.0]).unwrap();
        assert_eq!(k.max_index, 3);
        assert!((k.max_share_pct - 25.0).abs() < 1e-12);
        // Two-point symmetric distribution has excess kurtosis -2.
        assert!((k.excess_kurtosis + 2.0).abs() < 1e-12);
    }

    #[test]
    fn constant_values_are_rejected() {
        assert!(kurtosis_decomposition(&[3.0, 3.0, 3.0]).is_err());
        assert!(kurtosis_decomposition(&[3.0]).is_err());
    }
}
