use nalgebra::DMatrix;
use thiserror::Error;

/// Shape or content violation when assembling a [`FeatureTable`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("row {row} has {actual} values but the table has {expected} columns")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}, column '{column}' holds a non-finite value")]
    NonFinite { row: usize, column: String },
}

/// Dense, row-major numeric feature table.
///
/// Rows follow the order of the surviving molecules; column order is fixed at
/// construction. Every value is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    columns: Vec<String>,
    values: Vec<f64>,
    n_rows: usize,
}

impl FeatureTable {
    /// Builds a table from named columns and per-row values.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RowLength`] if a row does not match the column
    /// count, or [`TableError::NonFinite`] if any value is NaN or infinite.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let n_cols = columns.len();
        let n_rows = rows.len();
        let mut values = Vec::with_capacity(n_rows * n_cols);

        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(TableError::RowLength {
                    row: r,
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            if let Some(c) = row.iter().position(|v| !v.is_finite()) {
                return Err(TableError::NonFinite {
                    row: r,
                    column: columns[c].clone(),
                });
            }
            values.extend(row);
        }

        Ok(Self {
            columns,
            values,
            n_rows,
        })
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.n_columns();
        &self.values[i * w..(i + 1) * w]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    #[inline]
    pub fn value(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.n_columns() + column]
    }

    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.n_rows).map(move |i| self.value(i, j))
    }

    /// Whether column `j` holds the same value in every row.
    pub fn is_constant_column(&self, j: usize) -> bool {
        let mut it = self.column(j);
        match it.next() {
            Some(first) => it.all(|v| v == first),
            None => true,
        }
    }

    /// Unbiased (n - 1) sample variance of column `j`; `0.0` below two rows.
    pub fn column_variance(&self, j: usize) -> f64 {
        if self.n_rows < 2 {
            return 0.0;
        }
        let n = self.n_rows as f64;
        let mean = self.column(j).sum::<f64>() / n;
        self.column(j).map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    }

    /// New table keeping only `indices`, in the given order.
    pub fn select_columns(&self, indices: &[usize]) -> FeatureTable {
        let columns = indices.iter().map(|&j| self.columns[j].clone()).collect();
        let mut values = Vec::with_capacity(self.n_rows * indices.len());
        for i in 0..self.n_rows {
            values.extend(indices.iter().map(|&j| self.value(i, j)));
        }
        FeatureTable {
            columns,
            values,
            n_rows: self.n_rows,
        }
    }

    /// Copies the table into an `n_rows × n_columns` matrix.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.n_rows, self.n_columns(), &self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    fn sample() -> FeatureTable {
        FeatureTable::from_rows(
            names(3),
            vec![vec![1.0, 0.0, 5.0], vec![2.0, 0.0, 5.0], vec![3.0, 1.0, 5.0]],
        )
        .unwrap()
    }

    #[test]
    fn from_rows_records_shape() {
        let t = sample();
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.n_columns(), 3);
        assert_eq!(t.row(1), &[2.0, 0.0, 5.0]);
        assert_eq!(t.value(2, 1), 1.0);
        assert!(!t.is_empty());
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = FeatureTable::from_rows(names(2), vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            TableError::RowLength {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn from_rows_rejects_non_finite_values() {
        let err =
            FeatureTable::from_rows(names(2), vec![vec![1.0, f64::INFINITY]]).unwrap_err();
        assert!(matches!(err, TableError::NonFinite { row: 0, ref column } if column == "f1"));
    }

    #[test]
    fn detects_constant_columns() {
        let t = sample();
        assert!(!t.is_constant_column(0));
        assert!(!t.is_constant_column(1));
        assert!(t.is_constant_column(2));
    }

    #[test]
    fn column_variance_uses_sample_denominator() {
        let t = sample();
        assert!((t.column_variance(0) - 1.0).abs() < 1e-12);
        assert_eq!(t.column_variance(2), 0.0);
    }

    #[test]
    fn select_columns_preserves_requested_order() {
        let t = sample().select_columns(&[2, 0]);
        assert_eq!(t.columns(), &["f2".to_string(), "f0".to_string()]);
        assert_eq!(t.row(2), &[5.0, 3.0]);
    }

    #[test]
    fn to_matrix_is_row_major() {
        let m = sample().to_matrix();
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m[(1, 0)], 2.0);
        assert_eq!(m[(2, 1)], 1.0);
    }
}
