//! Principal component projection.
//!
//! Columns are mean-centered and the centered matrix is decomposed with a
//! thin SVD. Scores are `X_c · v_i` for the leading right singular vectors,
//! with each component's sign fixed so its largest-magnitude score is
//! positive. The projection is fully deterministic.

use super::EngineError;
use nalgebra::DMatrix;

/// Result of projecting a data matrix onto its leading principal axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// `n_rows × n_components` scores.
    pub scores: DMatrix<f64>,
    /// Fraction of the total variance carried by each returned component.
    pub explained_variance_ratio: Vec<f64>,
}

impl Projection {
    /// Sum of the explained variance ratios of the returned components.
    pub fn cumulative_ratio(&self) -> f64 {
        self.explained_variance_ratio.iter().sum()
    }

    /// First two score columns as coordinate pairs; missing columns read as 0.
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        let k = self.scores.ncols();
        (0..self.scores.nrows())
            .map(|i| {
                let x = if k > 0 { self.scores[(i, 0)] } else { 0.0 };
                let y = if k > 1 { self.scores[(i, 1)] } else { 0.0 };
                [x, y]
            })
            .collect()
    }
}

/// Projects `data` onto at most `n_components` principal axes.
///
/// The number of returned components is capped at `min(n_rows, n_columns)`.
///
/// # Errors
///
/// Returns [`EngineError`] for an empty matrix or if the SVD fails to converge.
pub fn project(data: &DMatrix<f64>, n_components: usize) -> Result<Projection, EngineError> {
    let (n, p) = data.shape();
    if n == 0 || p == 0 {
        return Err(EngineError::new("PCA requires a non-empty data matrix"));
    }
    let k = n_components.min(n).min(p);

    let mut centered = data.clone();
    for j in 0..p {
        let mean = centered.column(j).mean();
        centered.column_mut(j).add_scalar_mut(-mean);
    }

    let svd = centered
        .clone()
        .try_svd(false, true, f64::EPSILON, 0)
        .ok_or_else(|| EngineError::new("singular value decomposition did not converge"))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| EngineError::new("singular value decomposition returned no V^T"))?;

    let singular = svd.singular_values;
    let mut order: Vec<usize> = (0..singular.len()).collect();
    order.sort_by(|&a, &b| singular[b].total_cmp(&singular[a]));

    let total: f64 = singular.iter().map(|s| s * s).sum();

    let mut scores = DMatrix::zeros(n, k);
    let mut explained_variance_ratio = Vec::with_capacity(k);

    for (c, &idx) in order.iter().take(k).enumerate() {
        let axis = v_t.row(idx).transpose();
        let mut column = &centered * axis;

        let pivot = column
            .iter()
            .copied()
            .max_by(|a, b| a.abs().total_cmp(&b.abs()))
            .unwrap_or(0.0);
        if pivot < 0.0 {
            column.neg_mut();
        }
        scores.set_column(c, &column);

        let s = singular[idx];
        explained_variance_ratio.push(if total > 0.0 { s * s / total } else { 0.0 });
    }

    Ok(Projection {
        scores,
        explained_variance_ratio,
    })
}
