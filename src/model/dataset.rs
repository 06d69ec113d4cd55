use super::table::FeatureTable;
use super::target::TargetValue;
use thiserror::Error;

/// Row counts of the three dataset components did not agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "misaligned dataset: {features} feature rows, {targets} targets, {structures} structures, {encodings} encodings"
)]
pub struct MisalignedError {
    pub features: usize,
    pub targets: usize,
    pub structures: usize,
    pub encodings: usize,
}

/// Features, optional target and parsed structures with matching rows.
///
/// Row `i` of the feature table, entry `i` of the target (when present) and
/// structure `i` all describe the same molecule. The dataset is only built
/// through [`AlignedDataset::new`], which checks that invariant, and exposes
/// no mutable access afterwards.
#[derive(Debug, Clone)]
pub struct AlignedDataset<S> {
    features: FeatureTable,
    target: Vec<TargetValue>,
    structures: Vec<S>,
    encodings: Vec<String>,
}

impl<S> AlignedDataset<S> {
    /// Assembles a dataset, rejecting any row-count mismatch.
    ///
    /// An empty `target` means "no target". `encodings` holds the source
    /// strings of the surviving molecules and must match `structures`.
    pub fn new(
        features: FeatureTable,
        target: Vec<TargetValue>,
        structures: Vec<S>,
        encodings: Vec<String>,
    ) -> Result<Self, MisalignedError> {
        let n = features.n_rows();
        let target_ok = target.is_empty() || target.len() == n;
        if !target_ok || structures.len() != n || encodings.len() != n {
            return Err(MisalignedError {
                features: n,
                targets: target.len(),
                structures: structures.len(),
                encodings: encodings.len(),
            });
        }
        Ok(Self {
            features,
            target,
            structures,
            encodings,
        })
    }

    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn target(&self) -> &[TargetValue] {
        &self.target
    }

    #[inline]
    pub fn has_target(&self) -> bool {
        !self.target.is_empty()
    }

    pub fn structures(&self) -> &[S] {
        &self.structures
    }

    pub fn encodings(&self) -> &[String] {
        &self.encodings
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.n_rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the feature table, keeping target and structures.
    ///
    /// Used when supervised selection narrows the columns; the new table must
    /// keep every row.
    pub fn with_features(self, features: FeatureTable) -> Result<Self, MisalignedError> {
        Self::new(features, self.target, self.structures, self.encodings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: usize) -> FeatureTable {
        FeatureTable::from_rows(
            vec!["a".into(), "b".into()],
            (0..rows).map(|i| vec![i as f64, 1.0]).collect(),
        )
        .unwrap()
    }

    fn encodings(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("M{i}")).collect()
    }

    #[test]
    fn accepts_matching_rows_without_target() {
        let ds = AlignedDataset::new(table(3), vec![], vec!['x'; 3], encodings(3)).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(!ds.has_target());
        assert_eq!(ds.structures().len(), 3);
    }

    #[test]
    fn accepts_matching_rows_with_target() {
        let target = vec![TargetValue::from(1.0); 3];
        let ds = AlignedDataset::new(table(3), target, vec!['x'; 3], encodings(3)).unwrap();
        assert!(ds.has_target());
        assert_eq!(ds.target().len(), ds.features().n_rows());
    }

    #[test]
    fn rejects_target_length_mismatch() {
        let target = vec![TargetValue::from(1.0); 2];
        let err = AlignedDataset::new(table(3), target, vec!['x'; 3], encodings(3)).unwrap_err();
        assert_eq!(err.targets, 2);
        assert_eq!(err.features, 3);
    }

    #[test]
    fn rejects_structure_length_mismatch() {
        let result = AlignedDataset::new(table(3), vec![], vec!['x'; 4], encodings(3));
        assert!(result.is_err());
    }

    #[test]
    fn narrowing_features_keeps_alignment() {
        let target = vec![TargetValue::from(1.0); 3];
        let ds = AlignedDataset::new(table(3), target, vec!['x'; 3], encodings(3)).unwrap();
        let narrowed = ds.features().select_columns(&[0]);
        let ds = ds.with_features(narrowed).unwrap();
        assert_eq!(ds.features().n_columns(), 1);
        assert_eq!(ds.target().len(), 3);

        let err = ds.with_features(table(2)).unwrap_err();
        assert_eq!(err.features, 2);
    }
}
