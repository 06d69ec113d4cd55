//! Reduction hyperparameters predicted from the dataset size.
//!
//! Perplexity and n_neighbors follow a log-linear fit `link(a + b·ln n)`
//! floored to an integer of at least 2; min_dist is a constant. Every value
//! is looked up by parameter, similarity mode and whether the features were
//! first projected onto principal components. The bundled table lives in
//! `resources/heuristics.toml` and may be replaced through
//! [`SpaceConfig::heuristics`](super::SpaceConfig::heuristics).

use super::error::Error;
use crate::model::diagnostic::{Diagnostic, ParameterName};
use crate::model::types::SimilarityMode;
use serde::Deserialize;
use std::sync::OnceLock;

const DEFAULT_HEURISTICS_TOML: &str = include_str!("../../resources/heuristics.toml");

static DEFAULT_HEURISTICS: OnceLock<HeuristicTable> = OnceLock::new();

pub const PERPLEXITY_RANGE: (f64, f64) = (5.0, 50.0);
pub const MIN_DIST_RANGE: (f64, f64) = (0.0, 0.99);
pub const MIN_N_NEIGHBORS: usize = 2;

/// Transform applied to the linear predictor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    #[default]
    Identity,
    Square,
    Exp,
}

impl Link {
    fn apply(self, x: f64) -> f64 {
        match self {
            Link::Identity => x,
            Link::Square => x * x,
            Link::Exp => x.exp(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FittedEntry {
    pub mode: SimilarityMode,
    #[serde(default)]
    pub preprocessed: bool,
    pub intercept: f64,
    pub slope: f64,
    #[serde(default)]
    pub link: Link,
}

impl FittedEntry {
    /// Raw prediction for `n` samples, before flooring.
    pub fn predict(&self, n: usize) -> f64 {
        self.link.apply(predictor(self.intercept, self.slope, n))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstantEntry {
    pub mode: SimilarityMode,
    #[serde(default)]
    pub preprocessed: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeuristicTable {
    #[serde(default)]
    pub perplexity: Vec<FittedEntry>,
    #[serde(default)]
    pub n_neighbors: Vec<FittedEntry>,
    #[serde(default)]
    pub min_dist: Vec<ConstantEntry>,
}

/// `intercept + slope · ln(n)`.
pub fn predictor(intercept: f64, slope: f64, n: usize) -> f64 {
    intercept + slope * (n as f64).ln()
}

/// Floors a prediction and lifts it to at least 2.
pub fn validator(x: f64) -> usize {
    // f64::max ignores NaN, so an undefined prediction also lands on 2.
    x.floor().max(2.0) as usize
}

impl HeuristicTable {
    fn fitted(
        entries: &[FittedEntry],
        parameter: ParameterName,
        mode: SimilarityMode,
        preprocessed: bool,
    ) -> Result<&FittedEntry, Error> {
        entries
            .iter()
            .find(|e| e.mode == mode && e.preprocessed == preprocessed)
            .ok_or(Error::IncompleteHeuristics {
                parameter,
                mode,
                preprocessed,
            })
    }

    pub fn perplexity(
        &self,
        mode: SimilarityMode,
        preprocessed: bool,
        n: usize,
    ) -> Result<f64, Error> {
        let entry = Self::fitted(&self.perplexity, ParameterName::Perplexity, mode, preprocessed)?;
        Ok(validator(entry.predict(n)) as f64)
    }

    pub fn n_neighbors(
        &self,
        mode: SimilarityMode,
        preprocessed: bool,
        n: usize,
    ) -> Result<usize, Error> {
        let entry = Self::fitted(&self.n_neighbors, ParameterName::NNeighbors, mode, preprocessed)?;
        Ok(validator(entry.predict(n)))
    }

    pub fn min_dist(&self, mode: SimilarityMode, preprocessed: bool) -> Result<f64, Error> {
        self.min_dist
            .iter()
            .find(|e| e.mode == mode && e.preprocessed == preprocessed)
            .map(|e| e.value)
            .ok_or(Error::IncompleteHeuristics {
                parameter: ParameterName::MinDist,
                mode,
                preprocessed,
            })
    }
}

pub fn load_heuristics(custom_toml: Option<&str>) -> Result<HeuristicTable, Error> {
    match custom_toml {
        Some(toml) => {
            let table: HeuristicTable = toml::from_str(toml)?;
            Ok(table)
        }
        None => Ok(get_default_heuristics().clone()),
    }
}

pub fn get_default_heuristics() -> &'static HeuristicTable {
    DEFAULT_HEURISTICS.get_or_init(|| {
        toml::from_str(DEFAULT_HEURISTICS_TOML)
            .expect("Failed to parse embedded heuristics table. This is a library bug.")
    })
}

fn out_of_range(parameter: ParameterName, value: f64, min: f64, max: f64) -> Option<Diagnostic> {
    (value < min || value > max).then_some(Diagnostic::ParameterOutOfRange {
        parameter,
        value,
        min,
        max,
    })
}

pub fn check_perplexity(value: f64) -> Option<Diagnostic> {
    let (min, max) = PERPLEXITY_RANGE;
    out_of_range(ParameterName::Perplexity, value, min, max)
}

/// The upper bound is a quarter of the sample count.
pub fn check_n_neighbors(value: usize, n: usize) -> Option<Diagnostic> {
    out_of_range(
        ParameterName::NNeighbors,
        value as f64,
        MIN_N_NEIGHBORS as f64,
        n as f64 / 4.0,
    )
}

pub fn check_min_dist(value: f64) -> Option<Diagnostic> {
    let (min, max) = MIN_DIST_RANGE;
    out_of_range(ParameterName::MinDist, value, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: SimilarityMode = SimilarityMode::Structural;
    const T: SimilarityMode = SimilarityMode::Tailored;

    #[test]
    fn embedded_table_parses_with_all_entries() {
        let table = get_default_heuristics();
        assert_eq!(table.perplexity.len(), 3);
        assert_eq!(table.n_neighbors.len(), 3);
        assert_eq!(table.min_dist.len(), 3);
    }

    #[test]
    fn structural_perplexity_for_twenty_samples() {
        let expected = validator(-37.360438135651975 + 8.578963490544542 * 20f64.ln());
        let perplexity = get_default_heuristics().perplexity(S, false, 20).unwrap();
        assert_eq!(perplexity, expected as f64);
        assert_eq!(perplexity, 2.0);
    }

    #[test]
    fn structural_perplexity_grows_with_sample_count() {
        let n = 10_000;
        let expected = (-37.360438135651975 + 8.578963490544542 * (n as f64).ln()).floor();
        let perplexity = get_default_heuristics().perplexity(S, false, n).unwrap();
        assert_eq!(perplexity, expected);
        assert_eq!(perplexity, 41.0);
    }

    #[test]
    fn tailored_perplexity_is_squared() {
        let n = 500;
        let raw = -2.1210847692307038 + 0.9442229439797486 * (n as f64).ln();
        let perplexity = get_default_heuristics().perplexity(T, false, n).unwrap();
        assert_eq!(perplexity, (raw * raw).floor());
    }

    #[test]
    fn structural_n_neighbors_uses_exponential_link() {
        let n = 1_000;
        let raw = (-2.050415832404518 + 0.617757208655686 * (n as f64).ln()).exp();
        let k = get_default_heuristics().n_neighbors(S, false, n).unwrap();
        assert_eq!(k, raw.floor() as usize);
    }

    #[test]
    fn tailored_n_neighbors_is_floored_at_two() {
        let k = get_default_heuristics().n_neighbors(T, false, 10).unwrap();
        assert_eq!(k, 2);
    }

    #[test]
    fn min_dist_constants() {
        let table = get_default_heuristics();
        assert_eq!(table.min_dist(S, false).unwrap(), 0.485);
        assert_eq!(table.min_dist(T, false).unwrap(), 0.47);
        assert_eq!(table.min_dist(S, true).unwrap(), 0.36);
    }

    #[test]
    fn validator_handles_degenerate_predictions() {
        assert_eq!(validator(-5.0), 2);
        assert_eq!(validator(f64::NAN), 2);
        assert_eq!(validator(7.9), 7);
    }

    #[test]
    fn missing_custom_entry_is_reported() {
        let custom = r#"
            [[perplexity]]
            mode = "tailored"
            intercept = 10.0
            slope = 0.0
        "#;
        let table = load_heuristics(Some(custom)).unwrap();
        assert_eq!(table.perplexity(T, false, 100).unwrap(), 10.0);
        let err = table.perplexity(S, false, 100).unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteHeuristics {
                parameter: ParameterName::Perplexity,
                ..
            }
        ));
        assert!(table.min_dist(T, false).is_err());
    }

    #[test]
    fn malformed_custom_table_is_a_parse_error() {
        let err = load_heuristics(Some("[[perplexity]]\nmode = 3")).unwrap_err();
        assert!(matches!(err, Error::HeuristicsParse(_)));
    }

    #[test]
    fn range_checks() {
        assert!(check_perplexity(30.0).is_none());
        assert!(check_perplexity(4.0).is_some());
        assert!(check_perplexity(51.0).is_some());
        assert!(check_n_neighbors(5, 20).is_none());
        assert!(check_n_neighbors(6, 20).is_some());
        assert!(check_n_neighbors(1, 20).is_some());
        assert!(check_min_dist(0.99).is_none());
        assert!(check_min_dist(1.2).is_some());
        assert!(check_min_dist(-0.1).is_some());
    }

    #[test]
    fn out_of_range_diagnostic_carries_bounds() {
        let d = check_n_neighbors(40, 100).unwrap();
        assert_eq!(
            d,
            Diagnostic::ParameterOutOfRange {
                parameter: ParameterName::NNeighbors,
                value: 40.0,
                min: 2.0,
                max: 25.0,
            }
        );
    }
}
