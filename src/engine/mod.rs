//! Collaborator contracts consumed by the chemical space pipeline.
//!
//! Chemistry (parsing, fingerprints, descriptors) and the stochastic
//! neighbor-embedding algorithms are supplied by the caller through the
//! traits below. The crate bundles deterministic numeric defaults for the
//! rest:
//!
//! - [`pca`]: principal component projection via singular value decomposition
//! - [`sparse`]: L1-regularized regression and classification
//! - [`kmeans`]: k-means++ seeded Lloyd clustering

pub mod kmeans;
pub mod pca;
pub mod sparse;

use crate::model::types::EncodingFormat;
use nalgebra::DMatrix;
use thiserror::Error;

pub use kmeans::KMeans;
pub use sparse::{DefaultSparseModel, L1Logistic, Lasso};

/// Failure reported by a collaborator engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Cheminformatics toolkit: parsing plus feature computation.
///
/// Implementations must be deterministic: the same structure always yields
/// the same fingerprint and descriptor vector.
pub trait Chemistry {
    /// Parsed molecule handle.
    type Structure: Clone;

    /// Whether encodings in `format` can be parsed at all.
    fn supports(&self, format: EncodingFormat) -> bool {
        let _ = format;
        true
    }

    /// Parses one encoding, returning `None` when it is not a valid molecule.
    fn parse(&self, format: EncodingFormat, encoding: &str) -> Option<Self::Structure>;

    /// Substructure-presence bit vector of exactly `n_bits` entries.
    fn fingerprint(&self, structure: &Self::Structure, radius: u32, n_bits: usize) -> Vec<bool>;

    /// Names of the descriptor set, in the order [`descriptors`](Self::descriptors) reports values.
    fn descriptor_names(&self) -> Vec<String>;

    /// One value per descriptor name; non-finite values mark a failed computation.
    fn descriptors(&self, structure: &Self::Structure) -> Vec<f64>;
}

/// Response variable for a sparse linear model fit.
#[derive(Debug, Clone, Copy)]
pub enum Response<'a> {
    /// Continuous values.
    Continuous(&'a [f64]),
    /// Class indices in `0..n_classes`.
    Classes { labels: &'a [usize], n_classes: usize },
}

impl Response<'_> {
    pub fn len(&self) -> usize {
        match self {
            Response::Continuous(y) => y.len(),
            Response::Classes { labels, .. } => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fits an L1-regularized linear model on standardized features.
pub trait SparseLinearModel {
    /// Returns coefficients shaped `n_outputs × n_features`.
    ///
    /// `strength` is the regularization constant: the penalty weight for a
    /// continuous response and the inverse penalty for class labels.
    fn fit(
        &self,
        features: &DMatrix<f64>,
        response: Response<'_>,
        strength: f64,
    ) -> Result<DMatrix<f64>, EngineError>;
}

/// Hyperparameters handed to a neighbor-embedding engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeighborParams {
    Tsne { perplexity: f64 },
    Umap { n_neighbors: usize, min_dist: f64 },
}

/// Stochastic 2D embedding (t-SNE, UMAP, ...).
///
/// Results must be reproducible when `seed` is `Some`.
pub trait NeighborEmbedding {
    fn embed(
        &self,
        data: &DMatrix<f64>,
        params: NeighborParams,
        seed: Option<u64>,
    ) -> Result<Vec<[f64; 2]>, EngineError>;
}

/// Partitions 2D points into `k` groups.
pub trait Clusterer {
    fn cluster(
        &self,
        points: &[[f64; 2]],
        k: usize,
        seed: Option<u64>,
    ) -> Result<Vec<usize>, EngineError>;
}
