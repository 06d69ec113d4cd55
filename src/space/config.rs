use serde::{Deserialize, Serialize};

/// Settings fixed for the lifetime of a chemical space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    pub fingerprint: FingerprintConfig,
    pub selection: SelectionConfig,
    /// Custom hyperparameter heuristics in TOML; `None` uses the bundled table.
    pub heuristics: Option<String>,
}

/// Morgan fingerprint shape used in structural mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    pub radius: u32,
    pub n_bits: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            n_bits: 2048,
        }
    }
}

/// Regularization strengths of the descriptor selection models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Lasso penalty for regression targets.
    pub regression_alpha: f64,
    /// Inverse penalty of the L1 logistic model for classification targets.
    pub classification_c: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            regression_alpha: 0.05,
            classification_c: 0.05,
        }
    }
}

/// Options of a t-SNE reduction.
///
/// `perplexity: None` derives the value from the dataset size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TsneParams {
    pub perplexity: Option<f64>,
    /// Project structural fingerprints onto 10 principal components first.
    pub preprocess: bool,
    pub seed: Option<u64>,
}

/// Options of a UMAP reduction.
///
/// Unset parameters are derived from the dataset size and mode.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UmapParams {
    pub n_neighbors: Option<usize>,
    pub min_dist: Option<f64>,
    /// Project structural fingerprints onto 10 principal components first.
    pub preprocess: bool,
    pub seed: Option<u64>,
}

/// Options of a clustering pass over the current embedding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    pub n_clusters: usize,
    pub seed: Option<u64>,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            n_clusters: 5,
            seed: None,
        }
    }
}

/// Whether a rendered table is coloured by cluster, and which clusters it highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClusterSelection {
    /// Colour by target when there is one.
    #[default]
    Off,
    All,
    /// Highlight these cluster ids; every other point is grouped as "Other".
    Only(Vec<usize>),
}

/// Options for [`ChemicalSpace::render_table`](super::ChemicalSpace::render_table).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Drop points beyond three standard deviations on either axis.
    pub remove_outliers: bool,
    pub clusters: ClusterSelection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SpaceConfig::default();
        assert_eq!(config.fingerprint.radius, 2);
        assert_eq!(config.fingerprint.n_bits, 2048);
        assert_eq!(config.selection.regression_alpha, 0.05);
        assert_eq!(config.selection.classification_c, 0.05);
        assert!(config.heuristics.is_none());
        assert_eq!(ClusterParams::default().n_clusters, 5);
    }

    #[test]
    fn config_fills_missing_fields_from_defaults() {
        let config: SpaceConfig = toml::from_str("[fingerprint]\nn_bits = 1024\n").unwrap();
        assert_eq!(config.fingerprint.n_bits, 1024);
        assert_eq!(config.fingerprint.radius, 2);
        assert_eq!(config.selection, SelectionConfig::default());
    }
}
