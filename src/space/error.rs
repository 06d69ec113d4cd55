//! Error types for building and using a chemical space.
//!
//! Errors fall into two families: configuration problems detected before any
//! feature is computed, and data problems detected while building or reducing
//! the dataset. Recoverable conditions are not errors; they surface as
//! [`Diagnostic`](crate::Diagnostic) values instead.

use crate::engine::EngineError;
use crate::model::dataset::MisalignedError;
use crate::model::diagnostic::ParameterName;
use crate::model::table::TableError;
use crate::model::types::{EncodingFormat, SimilarityMode};
use thiserror::Error;

/// Errors that abort a chemical space operation.
#[derive(Debug, Error)]
pub enum Error {
    /// A mode that needs a target was requested without one.
    #[error("target values missing: '{mode}' similarity requires a non-empty target")]
    MissingTarget {
        /// The requested mode.
        mode: SimilarityMode,
    },

    /// The target does not have one value per encoding.
    #[error("target has {targets} values but {molecules} molecules were given")]
    TargetLengthMismatch {
        /// Number of target values.
        targets: usize,
        /// Number of molecule encodings.
        molecules: usize,
    },

    /// A regression target contains class labels.
    #[error("regression target must be numeric for descriptor selection")]
    NonNumericRegressionTarget,

    /// The chemistry toolkit cannot parse this encoding format.
    #[error("the chemistry toolkit does not support {0} encodings")]
    UnsupportedFormat(EncodingFormat),

    /// Failed to parse a custom heuristics table.
    #[error("failed to parse heuristics table: {0}")]
    HeuristicsParse(#[from] toml::de::Error),

    /// The heuristics table has no entry for a requested combination.
    #[error(
        "heuristics table has no {parameter} entry for '{mode}' mode (preprocessed: {preprocessed})"
    )]
    IncompleteHeuristics {
        /// The parameter being predicted.
        parameter: ParameterName,
        /// Similarity mode of the request.
        mode: SimilarityMode,
        /// Whether the preprocessed variant was requested.
        preprocessed: bool,
    },

    /// Too few molecules or features survived cleaning.
    ///
    /// At least two rows and two feature columns are needed for a layout.
    #[error(
        "insufficient data after cleaning: {rows} molecules and {columns} features remain (need at least 2 of each)"
    )]
    InsufficientData {
        /// Surviving molecules.
        rows: usize,
        /// Surviving feature columns.
        columns: usize,
    },

    /// The toolkit returned a fingerprint of the wrong length.
    #[error("fingerprint for '{encoding}' has {actual} bits, expected {expected}")]
    FingerprintLength {
        /// Source encoding of the molecule.
        encoding: String,
        /// Configured fingerprint length.
        expected: usize,
        /// Length returned by the toolkit.
        actual: usize,
    },

    /// The toolkit returned a descriptor vector that disagrees with its names.
    #[error("descriptor vector for '{encoding}' has {actual} values, expected {expected}")]
    DescriptorContract {
        /// Source encoding of the molecule.
        encoding: String,
        /// Number of descriptor names.
        expected: usize,
        /// Number of values returned.
        actual: usize,
    },

    /// No engine was registered for a stochastic reduction.
    #[error("no {0} engine registered; supply one when building the chemical space")]
    MissingEngine(&'static str),

    /// Cluster count must be positive.
    #[error("number of clusters must be at least 1 (got {0})")]
    InvalidClusterCount(usize),

    /// A dimensionality reduction engine failed.
    #[error("{algorithm} reduction failed: {source}")]
    Reduction {
        /// Algorithm name.
        algorithm: &'static str,
        /// Engine failure.
        source: EngineError,
    },

    /// The engine returned a layout with the wrong number of points.
    #[error("{algorithm} returned {actual} points for {expected} molecules")]
    LayoutLength {
        /// Algorithm name.
        algorithm: &'static str,
        /// Dataset rows.
        expected: usize,
        /// Points returned.
        actual: usize,
    },

    /// The sparse linear model used for descriptor selection failed.
    #[error("descriptor selection model failed: {0}")]
    ModelFit(EngineError),

    /// The clustering engine failed.
    #[error("clustering failed: {0}")]
    Clustering(EngineError),

    /// Internal row-alignment failure.
    #[error(transparent)]
    Misaligned(#[from] MisalignedError),

    /// Internal feature table failure.
    #[error("feature table construction failed: {0}")]
    Table(#[from] TableError),
}

impl Error {
    /// Creates a [`Reduction`](Error::Reduction) error.
    pub fn reduction(algorithm: &'static str, source: EngineError) -> Self {
        Self::Reduction { algorithm, source }
    }

    /// Creates an [`InsufficientData`](Error::InsufficientData) error.
    pub fn insufficient(rows: usize, columns: usize) -> Self {
        Self::InsufficientData { rows, columns }
    }

    /// Whether the error stems from invalid construction arguments or settings.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingTarget { .. }
                | Error::TargetLengthMismatch { .. }
                | Error::NonNumericRegressionTarget
                | Error::UnsupportedFormat(_)
                | Error::HeuristicsParse(_)
                | Error::IncompleteHeuristics { .. }
                | Error::MissingEngine(_)
                | Error::InvalidClusterCount(_)
        )
    }

    /// Whether the error means too little usable data survived cleaning.
    pub fn is_data_insufficient(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}
