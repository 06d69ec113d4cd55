use super::config::SelectionConfig;
use super::error::Error;
use super::scale::standardize;
use crate::engine::{EngineError, Response, SparseLinearModel};
use crate::model::diagnostic::Diagnostic;
use crate::model::table::FeatureTable;
use crate::model::target::{self, TargetValue};
use crate::model::types::TargetKind;

/// Coefficient magnitude at or below which a descriptor counts as unused.
pub const COEFFICIENT_THRESHOLD: f64 = 1e-5;

/// Supervised pruning of a descriptor table.
///
/// Columns are standardized, a sparse linear model is fitted against the
/// target, and the original columns with a non-negligible coefficient are
/// kept. Of those, columns without variance are dropped. An empty selection
/// falls back to the full table.
pub struct FeatureSelector<'a, M: SparseLinearModel + ?Sized> {
    model: &'a M,
    config: SelectionConfig,
}

impl<'a, M: SparseLinearModel + ?Sized> FeatureSelector<'a, M> {
    pub fn new(model: &'a M, config: SelectionConfig) -> Self {
        Self { model, config }
    }

    pub fn select(
        &self,
        table: &FeatureTable,
        values: &[TargetValue],
        kind: TargetKind,
    ) -> Result<(FeatureTable, Vec<Diagnostic>), Error> {
        let x = standardize(table);

        let coefficients = match kind {
            TargetKind::Regression => {
                let y = values
                    .iter()
                    .map(TargetValue::as_f64)
                    .collect::<Option<Vec<f64>>>()
                    .ok_or(Error::NonNumericRegressionTarget)?;
                self.model.fit(
                    &x,
                    Response::Continuous(&y),
                    self.config.regression_alpha,
                )
            }
            TargetKind::Classification => {
                let classes: Vec<&TargetValue> = target::distinct(values).into_iter().collect();
                let labels: Vec<usize> = values
                    .iter()
                    .map(|v| classes.binary_search(&v).unwrap_or_default())
                    .collect();
                self.model.fit(
                    &x,
                    Response::Classes {
                        labels: &labels,
                        n_classes: classes.len(),
                    },
                    self.config.classification_c,
                )
            }
        }
        .map_err(Error::ModelFit)?;

        if coefficients.ncols() != table.n_columns() {
            return Err(Error::ModelFit(EngineError::new(format!(
                "model returned {} coefficients for {} descriptors",
                coefficients.ncols(),
                table.n_columns()
            ))));
        }

        let selected: Vec<usize> = (0..table.n_columns())
            .filter(|&j| coefficients.column(j).abs().sum() > COEFFICIENT_THRESHOLD)
            .filter(|&j| table.column_variance(j) != 0.0)
            .collect();

        if selected.is_empty() {
            let fallback = Diagnostic::SelectionFallback {
                descriptors: table.n_columns(),
            };
            return Ok((table.clone(), vec![fallback]));
        }

        log::debug!(
            "kept {} of {} descriptors for a {} target",
            selected.len(),
            table.n_columns(),
            kind
        );
        Ok((table.select_columns(&selected), Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DefaultSparseModel;
    use nalgebra::DMatrix;

    struct FixedCoefficients(Vec<f64>);

    impl SparseLinearModel for FixedCoefficients {
        fn fit(
            &self,
            _features: &DMatrix<f64>,
            _response: Response<'_>,
            _strength: f64,
        ) -> Result<DMatrix<f64>, EngineError> {
            Ok(DMatrix::from_row_slice(1, self.0.len(), &self.0))
        }
    }

    fn table() -> FeatureTable {
        let rows = (0..12)
            .map(|i| {
                let i = f64::from(i);
                vec![i, (i * 3.0) % 4.0, 7.0, (i * 5.0) % 3.0]
            })
            .collect();
        FeatureTable::from_rows(
            vec!["signal".into(), "noise".into(), "constant".into(), "other".into()],
            rows,
        )
        .unwrap()
    }

    fn target_from_signal() -> Vec<TargetValue> {
        (0..12).map(|i| TargetValue::from(2.0 * f64::from(i) + 1.0)).collect()
    }

    #[test]
    fn keeps_columns_with_nonzero_coefficients() {
        let model = FixedCoefficients(vec![0.8, 0.0, 0.0, -0.3]);
        let selector = FeatureSelector::new(&model, SelectionConfig::default());
        let (selected, diags) = selector
            .select(&table(), &target_from_signal(), TargetKind::Regression)
            .unwrap();
        assert_eq!(selected.columns(), ["signal", "other"]);
        assert_eq!(selected.value(3, 0), 3.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn tiny_coefficients_count_as_zero() {
        let model = FixedCoefficients(vec![1e-6, 0.5, 0.0, 0.0]);
        let selector = FeatureSelector::new(&model, SelectionConfig::default());
        let (selected, _) = selector
            .select(&table(), &target_from_signal(), TargetKind::Regression)
            .unwrap();
        assert_eq!(selected.columns(), ["noise"]);
    }

    #[test]
    fn zero_variance_selection_is_dropped() {
        let model = FixedCoefficients(vec![0.5, 0.0, 0.9, 0.0]);
        let selector = FeatureSelector::new(&model, SelectionConfig::default());
        let (selected, _) = selector
            .select(&table(), &target_from_signal(), TargetKind::Regression)
            .unwrap();
        assert_eq!(selected.columns(), ["signal"]);
    }

    #[test]
    fn empty_selection_falls_back_to_all_descriptors() {
        let model = FixedCoefficients(vec![0.0; 4]);
        let selector = FeatureSelector::new(&model, SelectionConfig::default());
        let (selected, diags) = selector
            .select(&table(), &target_from_signal(), TargetKind::Regression)
            .unwrap();
        assert_eq!(selected, table());
        assert_eq!(diags, vec![Diagnostic::SelectionFallback { descriptors: 4 }]);
    }

    #[test]
    fn lasso_selects_the_informative_descriptor() {
        let model = DefaultSparseModel::default();
        let selector = FeatureSelector::new(&model, SelectionConfig::default());
        let (selected, _) = selector
            .select(&table(), &target_from_signal(), TargetKind::Regression)
            .unwrap();
        assert!(selected.columns().iter().any(|c| c == "signal"));
        assert!(selected.columns().iter().all(|c| c != "constant"));
    }

    #[test]
    fn label_targets_are_encoded_as_classes() {
        let model = DefaultSparseModel::default();
        let selector = FeatureSelector::new(
            &model,
            SelectionConfig {
                classification_c: 1.0,
                ..SelectionConfig::default()
            },
        );
        let labels: Vec<TargetValue> = (0..12)
            .map(|i| if i < 6 { "inactive" } else { "active" }.into())
            .collect();
        let (selected, _) = selector
            .select(&table(), &labels, TargetKind::Classification)
            .unwrap();
        assert!(selected.columns().iter().any(|c| c == "signal"));
    }

    #[test]
    fn label_regression_target_is_rejected() {
        let model = DefaultSparseModel::default();
        let selector = FeatureSelector::new(&model, SelectionConfig::default());
        let labels: Vec<TargetValue> = (0..12).map(|i| format!("m{i}").into()).collect();
        let err = selector
            .select(&table(), &labels, TargetKind::Regression)
            .unwrap_err();
        assert!(matches!(err, Error::NonNumericRegressionTarget));
    }

    #[test]
    fn coefficient_shape_is_checked() {
        let model = FixedCoefficients(vec![1.0, 1.0]);
        let selector = FeatureSelector::new(&model, SelectionConfig::default());
        let err = selector
            .select(&table(), &target_from_signal(), TargetKind::Regression)
            .unwrap_err();
        assert!(matches!(err, Error::ModelFit(_)));
    }
}
