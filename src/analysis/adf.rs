//! Augmented Dickey–Fuller unit-root test (constant, no trend).
//!
//! The test regression is
//!
//! ```text
//! Δx_t = α + γ x_{t-1} + Σ_{i=1..p} δ_i Δx_{t-i} + ε_t
//! ```
//!
//! and the statistic is the t-value of `γ`. The lag count `p` is chosen by
//! AIC over `0..=maxlag`, with every candidate fitted on the same sample (the
//! rows available at `maxlag`) so the criteria are comparable. The winning
//! lag is then refitted on all rows it allows.
//!
//! p-values use MacKinnon's (1994) response-surface approximation and
//! critical values use MacKinnon's (2010) finite-sample surfaces, both for the
//! single-series, constant-only case.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::AppError;
use crate::math::{OlsFit, fit_ols};

/// Significance level used for `reject_null`.
pub const SIGNIFICANCE: f64 = 0.05;

// MacKinnon (1994), regression "c", N = 1.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALLP: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGEP: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010), regression "c", N = 1: rows are 1%, 5%, 10%.
const CRIT_SURFACE: [[f64; 4]; 3] = [
    [-3.43035, -6.5393, -16.786, -79.433],
    [-2.86154, -2.8903, -4.234, -40.040],
    [-2.56677, -1.5384, -2.809, 0.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdfResult {
    pub statistic: f64,
    pub p_value: f64,
    pub used_lag: usize,
    /// Rows in the final regression.
    pub nobs: usize,
    pub critical_values: CriticalValues,
    /// Best information criterion found during lag selection.
    pub ic_best: f64,
    /// `true` when `p_value < SIGNIFICANCE`, i.e. no unit root.
    pub reject_null: bool,
}

/// Run the ADF test on `x`.
pub fn adf_test(x: &[f64]) -> Result<AdfResult, AppError> {
    let n = x.len();
    let maxlag = max_lag(n)?;
    let diffs: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    // 1) Lag selection on a common sample.
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=maxlag {
        let fit = regress(x, &diffs, lag, maxlag)?;
        let aic = fit.aic();
        if !aic.is_finite() {
            return Err(AppError::analysis(
                "ADF regression has zero residual variance; the series is degenerate.",
            ));
        }
        if best.is_none_or(|(b, _)| aic < b) {
            best = Some((aic, lag));
        }
    }
    let (ic_best, used_lag) = best.ok_or_else(|| AppError::analysis("ADF lag selection produced no candidates."))?;

    // 2) Refit the chosen lag on every row it allows.
    let fit = regress(x, &diffs, used_lag, used_lag)?;
    let statistic = fit.t_value(1);
    if !statistic.is_finite() {
        return Err(AppError::analysis("ADF statistic is not finite."));
    }

    let p_value = mackinnon_p_value(statistic)?;
    Ok(AdfResult {
        statistic,
        p_value,
        used_lag,
        nobs: fit.nobs,
        critical_values: mackinnon_critical_values(fit.nobs),
        ic_best,
        reject_null: p_value < SIGNIFICANCE,
    })
}

/// `ceil(12 · (n/100)^{1/4})`, capped so the regression keeps enough rows.
fn max_lag(n: usize) -> Result<usize, AppError> {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as i64;
    // One trend term (the constant).
    let cap = (n / 2) as i64 - 2;
    if cap < 0 {
        return Err(AppError::analysis(format!(
            "ADF needs at least 4 observations; got {n}."
        )));
    }
    Ok(schwert.min(cap) as usize)
}

/// Fit `Δx_t ~ 1 + x_{t-1} + Δx_{t-1} + … + Δx_{t-lag}` on rows `t >= start`.
///
/// Column 1 is always the lagged level.
fn regress(x: &[f64], diffs: &[f64], lag: usize, start: usize) -> Result<OlsFit, AppError> {
    let rows: Vec<usize> = (start..diffs.len()).collect();
    let k = 2 + lag;
    if rows.len() <= k {
        return Err(AppError::analysis(format!(
            "Not enough observations for an ADF regression with {lag} lags."
        )));
    }

    let mut design = DMatrix::<f64>::zeros(rows.len(), k);
    let mut y = DVector::<f64>::zeros(rows.len());
    for (r, &t) in rows.iter().enumerate() {
        y[r] = diffs[t];
        design[(r, 0)] = 1.0;
        // diffs[t] = x[t + 1] - x[t], so the lagged level is x[t].
        design[(r, 1)] = x[t];
        for i in 1..=lag {
            design[(r, 1 + i)] = diffs[t - i];
        }
    }

    fit_ols(&design, &y).ok_or_else(|| {
        AppError::analysis(format!("ADF regression with {lag} lags is singular."))
    })
}

/// Approximate p-value for an ADF statistic (constant, one series).
pub fn mackinnon_p_value(stat: f64) -> Result<f64, AppError> {
    if stat > TAU_MAX {
        return Ok(1.0);
    }
    if stat < TAU_MIN {
        return Ok(0.0);
    }
    let z = if stat <= TAU_STAR {
        polyval(&TAU_SMALLP, stat)
    } else {
        polyval(&TAU_LARGEP, stat)
    };
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::analysis(format!("Failed to build standard normal: {e}")))?;
    Ok(normal.cdf(z))
}

/// Finite-sample 1%/5%/10% critical values for `nobs` regression rows.
pub fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    let crit = |row: &[f64; 4]| {
        let inv = 1.0 / nobs as f64;
        row[0] + row[1] * inv + row[2] * inv.powi(2) + row[3] * inv.powi(3)
    };
    CriticalValues {
        one_pct: crit(&CRIT_SURFACE[0]),
        five_pct: crit(&CRIT_SURFACE[1]),
        ten_pct: crit(&CRIT_SURFACE[2]),
    }
}

/// Evaluate `c[0] + c[1] x + c[2] x² + …`.
fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    use super::*;

    fn gaussian_steps(seed: u64, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    #[test]
    fn white_noise_rejects_unit_root() {
        let x = gaussian_steps(7, 250);
        let res = adf_test(&x).unwrap();
        assert!(res.reject_null, "expected rejection, got {res:?}");
        assert!(res.p_value < 0.01);
        assert!(res.statistic < res.critical_values.one_pct);
    }

    #[test]
    fn drifting_random_walk_keeps_unit_root() {
        let mut level = 100.0;
        let x: Vec<f64> = gaussian_steps(11, 300)
            .into_iter()
            .map(|e| {
                level += 1.0 + e;
                level
            })
            .collect();
        let res = adf_test(&x).unwrap();
        assert!(!res.reject_null, "expected no rejection, got {res:?}");
    }

    #[test]
    fn lag_and_nobs_are_consistent() {
        let x = gaussian_steps(3, 120);
        let res = adf_test(&x).unwrap();
        // maxlag for n = 120 is ceil(12 * 1.2^0.25) = 13.
        assert!(res.used_lag <= 13);
        assert_eq!(res.nobs, 120 - 1 - res.used_lag);
    }

    #[test]
    fn p_value_matches_asymptotic_critical_values() {
        assert!((mackinnon_p_value(-2.86154).unwrap() - 0.05).abs() < 0.002);
        assert!((mackinnon_p_value(-3.43035).unwrap() - 0.01).abs() < 0.002);
        assert_eq!(mackinnon_p_value(3.0).unwrap(), 1.0);
        assert_eq!(mackinnon_p_value(-25.0).unwrap(), 0.0);
    }

    #[test]
    fn p_value_at_branch_point_is_standard_normal_of_surface() {
        // z(τ*) = 2.1659 + 1.4412·(-1.61) + 0.038269·(-1.61)² ≈ -0.05523
        // Φ(-0.05523) ≈ 0.47798
        let p = mackinnon_p_value(TAU_STAR).unwrap();
        assert!((p - 0.47798).abs() < 1e-4, "p = {p}");
    }

    #[test]
    fn p_value_is_continuous_across_the_branch_point() {
        let z_small = polyval(&TAU_SMALLP, TAU_STAR);
        let z_large = polyval(&TAU_LARGEP, TAU_STAR);
        assert!((z_small - z_large).abs() < 0.005);

        // Slope near τ* is about 0.54 per unit, so a ±0.01 step moves p by ~0.011.
        let below = mackinnon_p_value(TAU_STAR - 0.01).unwrap();
        let above = mackinnon_p_value(TAU_STAR + 0.01).unwrap();
        assert!(below < above);
        assert!((above - below) < 0.02);
    }

    #[test]
    fn critical_values_approach_asymptotic_limits() {
        let cv = mackinnon_critical_values(100_000);
        assert!((cv.one_pct + 3.43035).abs() < 1e-3);
        assert!((cv.five_pct + 2.86154).abs() < 1e-3);
        assert!((cv.ten_pct + 2.56677).abs() < 1e-3);

        let small = mackinnon_critical_values(50);
        assert!(small.one_pct < cv.one_pct);
    }

    #[test]
    fn too_short_series_is_an_error() {
        assert!(adf_test(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn constant_series_is_degenerate() {
        assert!(adf_test(&[5.0; 40]).is_err());
    }
}
