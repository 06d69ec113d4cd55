use crate::model::table::FeatureTable;
use nalgebra::DMatrix;

/// Column-wise standardization to zero mean and unit variance.
///
/// Uses the population standard deviation; a constant column is only
/// centered.
pub fn standardize(table: &FeatureTable) -> DMatrix<f64> {
    let mut m = table.to_matrix();
    let n = m.nrows() as f64;
    if n == 0.0 {
        return m;
    }
    for mut column in m.column_iter_mut() {
        let mean = column.sum() / n;
        let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let sd = if var > 0.0 { var.sqrt() } else { 1.0 };
        column.apply(|v| *v = (*v - mean) / sd);
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FeatureTable {
        FeatureTable::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0], vec![6.0, 5.0]],
        )
        .unwrap()
    }

    #[test]
    fn columns_have_zero_mean_and_unit_variance() {
        let m = standardize(&table());
        let col = m.column(0);
        let n = col.len() as f64;
        assert!(col.mean().abs() < 1e-12);
        let var = col.iter().map(|v| v * v).sum::<f64>() / n;
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_becomes_zero() {
        let m = standardize(&table());
        assert!(m.column(1).iter().all(|&v| v == 0.0));
    }
}
