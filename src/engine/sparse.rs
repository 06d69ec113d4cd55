//! L1-regularized linear models used for descriptor selection.
//!
//! Both solvers expect standardized features (zero-mean columns) and fit an
//! unpenalized intercept.
//!
//! - [`Lasso`] minimizes `(1 / 2n)·‖y − b − Xw‖² + α·‖w‖₁` by cyclic
//!   coordinate descent.
//! - [`L1Logistic`] minimizes `‖w‖₁ + C·Σ log(1 + exp(−yᵢ(xᵢ·w + b)))` by
//!   accelerated proximal gradient descent, one-vs-rest for more than two
//!   classes.

use super::{EngineError, Response, SparseLinearModel};
use nalgebra::{DMatrix, DVector};

#[inline]
fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Coordinate-descent solver for the lasso.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lasso {
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for Lasso {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            tol: 1e-4,
        }
    }
}

impl Lasso {
    /// Fits the lasso with penalty `alpha`, returning one coefficient per column.
    pub fn fit(&self, x: &DMatrix<f64>, y: &[f64], alpha: f64) -> Result<DVector<f64>, EngineError> {
        let (n, p) = x.shape();
        if n == 0 || n != y.len() {
            return Err(EngineError::new(format!(
                "lasso needs one response per row ({} rows, {} responses)",
                n,
                y.len()
            )));
        }
        let nf = n as f64;
        let y_mean = y.iter().sum::<f64>() / nf;
        let mut residual = DVector::from_iterator(n, y.iter().map(|v| v - y_mean));
        let col_sq: Vec<f64> = (0..p).map(|j| x.column(j).norm_squared() / nf).collect();
        let y_scale = residual.amax().max(1.0);

        let mut w = DVector::<f64>::zeros(p);
        for _ in 0..self.max_iter {
            let mut max_step: f64 = 0.0;
            for j in 0..p {
                if col_sq[j] == 0.0 {
                    continue;
                }
                let old = w[j];
                let rho = x.column(j).dot(&residual) / nf + col_sq[j] * old;
                let new = soft_threshold(rho, alpha) / col_sq[j];
                let delta = new - old;
                if delta != 0.0 {
                    residual.axpy(-delta, &x.column(j), 1.0);
                    w[j] = new;
                    max_step = max_step.max(delta.abs());
                }
            }
            if max_step <= self.tol * y_scale {
                break;
            }
        }
        Ok(w)
    }
}

/// Proximal-gradient solver for L1-penalized logistic regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct L1Logistic {
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for L1Logistic {
    fn default() -> Self {
        Self {
            max_iter: 5_000,
            tol: 1e-6,
        }
    }
}

impl L1Logistic {
    /// Fits a binary model where `positive[i]` marks the positive class.
    ///
    /// `c` is the inverse regularization strength.
    pub fn fit_binary(
        &self,
        x: &DMatrix<f64>,
        positive: &[bool],
        c: f64,
    ) -> Result<DVector<f64>, EngineError> {
        let (n, p) = x.shape();
        if n == 0 || n != positive.len() {
            return Err(EngineError::new(format!(
                "logistic model needs one label per row ({} rows, {} labels)",
                n,
                positive.len()
            )));
        }
        if c <= 0.0 {
            return Err(EngineError::new("inverse regularization C must be positive"));
        }
        let signs: Vec<f64> = positive.iter().map(|&b| if b { 1.0 } else { -1.0 }).collect();

        let lipschitz = 0.25 * c * largest_gram_eigenvalue(x);
        let step = 1.0 / lipschitz.max(f64::EPSILON);

        let mut w = DVector::<f64>::zeros(p);
        let mut b = 0.0;
        let mut w_prev = w.clone();
        let mut b_prev = b;
        let mut momentum: f64 = 1.0;

        for _ in 0..self.max_iter {
            let next_momentum = (1.0 + (1.0 + 4.0 * momentum * momentum).sqrt()) / 2.0;
            let beta = (momentum - 1.0) / next_momentum;
            let w_look = &w + (&w - &w_prev) * beta;
            let b_look = b + (b - b_prev) * beta;

            let margins = x * &w_look;
            let mut coeffs = DVector::zeros(n);
            for i in 0..n {
                let z = signs[i] * (margins[i] + b_look);
                coeffs[i] = -c * signs[i] * sigmoid(-z);
            }
            let grad_w = x.transpose() * &coeffs;
            let grad_b = coeffs.sum();

            w_prev = w.clone();
            b_prev = b;
            w = (&w_look - grad_w * step).map(|v| soft_threshold(v, step));
            b = b_look - step * grad_b;
            momentum = next_momentum;

            let change = (&w - &w_prev).amax().max((b - b_prev).abs());
            if change <= self.tol {
                break;
            }
        }
        Ok(w)
    }
}

/// Largest eigenvalue of `[X 1]ᵀ[X 1]`, estimated by power iteration.
fn largest_gram_eigenvalue(x: &DMatrix<f64>) -> f64 {
    let (n, p) = x.shape();
    let mut v = DVector::from_element(p + 1, 1.0 / ((p + 1) as f64).sqrt());
    let mut eigenvalue = 0.0;
    for _ in 0..50 {
        let xv = x * v.rows(0, p) + DVector::from_element(n, v[p]);
        let mut next = DVector::zeros(p + 1);
        next.rows_mut(0, p).copy_from(&(x.transpose() * &xv));
        next[p] = xv.sum();
        let norm = next.norm();
        if norm == 0.0 {
            return 0.0;
        }
        eigenvalue = norm;
        v = next / norm;
    }
    eigenvalue
}

/// Lasso for continuous responses, L1 logistic (one-vs-rest) for classes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DefaultSparseModel {
    pub lasso: Lasso,
    pub logistic: L1Logistic,
}

impl SparseLinearModel for DefaultSparseModel {
    fn fit(
        &self,
        features: &DMatrix<f64>,
        response: Response<'_>,
        strength: f64,
    ) -> Result<DMatrix<f64>, EngineError> {
        match response {
            Response::Continuous(y) => {
                let w = self.lasso.fit(features, y, strength)?;
                Ok(DMatrix::from_row_slice(1, w.len(), w.as_slice()))
            }
            Response::Classes { labels, n_classes } => {
                if n_classes < 2 {
                    return Err(EngineError::new(
                        "classification needs at least two distinct classes",
                    ));
                }
                let p = features.ncols();
                let targets: Vec<usize> = if n_classes == 2 { vec![1] } else { (0..n_classes).collect() };
                let mut coefficients = DMatrix::zeros(targets.len(), p);
                for (row, &class) in targets.iter().enumerate() {
                    let positive: Vec<bool> = labels.iter().map(|&l| l == class).collect();
                    let w = self.logistic.fit_binary(features, &positive, strength)?;
                    coefficients.set_row(row, &w.transpose());
                }
                Ok(coefficients)
            }
        }
    }
}
