//! Ordinary least squares with the diagnostics the ADF test needs.
//!
//! We repeatedly fit small regressions of the form:
//!
//! ```text
//! y = X β + ε
//! ```
//!
//! once per candidate lag during AIC lag selection, then once more for the
//! chosen lag to read off a t-statistic.
//!
//! Implementation choices:
//! - β is solved with SVD so tall, slightly collinear designs still solve.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Standard errors come from `σ² (XᵀX)⁻¹` with `σ² = SSR / (n - k)`.
//! - AIC uses the Gaussian log-likelihood, matching the usual econometrics
//!   convention `AIC = -2 ln L + 2k`.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A fitted regression.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: DVector<f64>,
    pub std_errors: DVector<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    pub nobs: usize,
    /// Number of regressors, including the constant column if present.
    pub k: usize,
}

impl OlsFit {
    pub fn t_value(&self, idx: usize) -> f64 {
        self.beta[idx] / self.std_errors[idx]
    }

    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.k as f64
    }
}

/// Fit `y ~ X` and compute coefficient standard errors.
///
/// Returns `None` when there are no residual degrees of freedom or `XᵀX` is
/// singular.
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsFit> {
    let nobs = x.nrows();
    let k = x.ncols();
    if nobs <= k || y.len() != nobs {
        return None;
    }

    let beta = solve_least_squares(x, y)?;
    let residuals = y - x * &beta;
    let ssr = residuals.dot(&residuals);

    let sigma2 = ssr / (nobs - k) as f64;
    let xtx_inv = (x.transpose() * x).try_inverse()?;
    let std_errors = DVector::from_iterator(k, (0..k).map(|i| (sigma2 * xtx_inv[(i, i)]).max(0.0).sqrt()));

    if !std_errors.iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(OlsFit {
        beta,
        std_errors,
        ssr,
        nobs,
        k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn standard_errors_match_closed_form() {
        // x = [-1, 0, 1], y = [0, 2, 1].
        // β = (1, 0.5), residuals = (-0.5, 1, -0.5), SSR = 1.5, σ² = 1.5 / 1.
        // (XᵀX)⁻¹ = diag(1/3, 1/2) -> se = (sqrt(0.5), sqrt(0.75)).
        let x = DMatrix::from_row_slice(3, 2, &[1.0, -1.0, 1.0, 0.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[0.0, 2.0, 1.0]);

        let fit = fit_ols(&x, &y).unwrap();
        assert!((fit.beta[0] - 1.0).abs() < 1e-10);
        assert!((fit.beta[1] - 0.5).abs() < 1e-10);
        assert!((fit.ssr - 1.5).abs() < 1e-10);
        assert!((fit.std_errors[0] - 0.5_f64.sqrt()).abs() < 1e-10);
        assert!((fit.std_errors[1] - 0.75_f64.sqrt()).abs() < 1e-10);
        assert!((fit.t_value(1) - 0.5 / 0.75_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn no_degrees_of_freedom_returns_none() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(fit_ols(&x, &y).is_none());
    }
}
