//! Least-squares polynomial fitting for the complexity annotation.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("cannot fit a polynomial to zero points")]
    Empty,

    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("no candidate degrees to choose from")]
    NoCandidates,

    #[error("least-squares solve failed: {0}")]
    Solve(&'static str),
}

/// A fitted polynomial together with its residual on the fitted points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyFit {
    pub degree: usize,
    /// Coefficients in ascending powers: `c[0] + c[1]·x + … + c[d]·x^d`.
    pub coefficients: Vec<f64>,
    /// Sum of squared residuals at the points the fit was computed from.
    pub residual: f64,
}

impl PolyFit {
    /// Evaluate the polynomial at `x` (Horner's rule).
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// `O(n^d)` label for this fit's degree.
    pub fn complexity_label(&self) -> String {
        complexity_label(self.degree)
    }

    /// `samples` evenly spaced points of the curve over `[lo, hi]`.
    pub fn curve(&self, lo: f64, hi: f64, samples: usize) -> Vec<(f64, f64)> {
        linspace(lo, hi, samples)
            .into_iter()
            .map(|x| (x, self.eval(x)))
            .collect()
    }
}

pub fn complexity_label(degree: usize) -> String {
    format!("O(n^{degree})")
}

/// Fit a polynomial of `degree` to `(x, y)` by linear least squares.
///
/// Columns of the Vandermonde matrix are scaled to unit norm before the
/// SVD solve, and singular values below `len(x) · ε · σ_max` are treated as
/// zero. With fewer points than coefficients the minimum-norm solution is
/// returned.
pub fn fit_polynomial(x: &[f64], y: &[f64], degree: usize) -> Result<PolyFit, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.is_empty() {
        return Err(FitError::Empty);
    }

    let rows = x.len();
    let cols = degree + 1;
    let mut vander = DMatrix::from_fn(rows, cols, |i, j| x[i].powi(j as i32));

    let scale: Vec<f64> = (0..cols)
        .map(|j| match vander.column(j).norm() {
            n if n > 0.0 => n,
            _ => 1.0,
        })
        .collect();
    for (j, &s) in scale.iter().enumerate() {
        vander.column_mut(j).unscale_mut(s);
    }

    let rhs = DVector::from_column_slice(y);
    let svd = vander.svd(true, true);
    let cutoff = rows as f64 * f64::EPSILON * svd.singular_values.max();
    let solution = svd.solve(&rhs, cutoff).map_err(FitError::Solve)?;

    let coefficients: Vec<f64> = solution.iter().zip(&scale).map(|(c, s)| c / s).collect();
    let mut fit = PolyFit {
        degree,
        coefficients,
        residual: 0.0,
    };
    fit.residual = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| (yi - fit.eval(xi)).powi(2))
        .sum();
    Ok(fit)
}

/// Fit every candidate degree and keep the one with the smallest residual.
///
/// Candidates are tried in the given order and a later degree only wins
/// with a strictly smaller residual, so ties go to the earlier one.
pub fn best_fit(x: &[f64], y: &[f64], degrees: &[usize]) -> Result<PolyFit, FitError> {
    if degrees.is_empty() {
        return Err(FitError::NoCandidates);
    }

    let mut fits = degrees
        .iter()
        .map(|&d| fit_polynomial(x, y, d))
        .collect::<Result<Vec<_>, _>>()?;
    for fit in &fits {
        log::debug!("degree {}: residual {:e}", fit.degree, fit.residual);
    }

    let residuals: Vec<f64> = fits.iter().map(|f| f.residual).collect();
    Ok(fits.swap_remove(select_index(&residuals)))
}

/// Index of the first strictly smallest residual; 0 if none beats +inf.
fn select_index(residuals: &[f64]) -> usize {
    let mut best = 0;
    let mut min_residual = f64::INFINITY;
    for (i, &r) in residuals.iter().enumerate() {
        if r < min_residual {
            min_residual = r;
            best = i;
        }
    }
    best
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}
