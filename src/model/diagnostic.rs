//! Structured diagnostics for recoverable conditions.
//!
//! Nothing in the pipeline prints. Conditions that do not abort a call are
//! recorded as [`Diagnostic`] values; the chemical space keeps those of the
//! most recent call and forwards each one to the `log` facade.

use super::types::{EncodingFormat, SimilarityMode, TargetKind};
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
}

/// A reduction hyperparameter with a recommended range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterName {
    Perplexity,
    NNeighbors,
    MinDist,
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterName::Perplexity => write!(f, "perplexity"),
            ParameterName::NNeighbors => write!(f, "n_neighbors"),
            ParameterName::MinDist => write!(f, "min_dist"),
        }
    }
}

/// A recoverable event raised while building or using a chemical space.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// No mode was requested; one was chosen from the presence of a target.
    ModeAutoSelected { mode: SimilarityMode, has_target: bool },

    /// No target kind was declared; one was inferred.
    TargetKindInferred { kind: TargetKind, unique_ratio: f64 },

    /// Regression was declared for a target that looks categorical.
    TargetKindContradiction {
        declared: TargetKind,
        unique_ratio: f64,
        numeric: bool,
    },

    /// A classification target had a single class and was discarded.
    SingleClassTarget { requested_mode: SimilarityMode },

    /// Encodings that could not be parsed; their rows were dropped.
    UnparseableEncodings {
        format: EncodingFormat,
        encodings: Vec<String>,
    },

    /// Encodings with at least one non-finite descriptor; their rows were dropped.
    IncomputableDescriptors {
        format: EncodingFormat,
        encodings: Vec<String>,
    },

    /// The sparse model kept no descriptor; the full table is used instead.
    SelectionFallback { descriptors: usize },

    /// A user-supplied hyperparameter lies outside its recommended range.
    ParameterOutOfRange {
        parameter: ParameterName,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An operation needs a layout but none has been computed.
    EmbeddingMissing { operation: &'static str },

    /// Cluster colouring was requested but no clusters have been computed.
    ClustersMissing,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::ModeAutoSelected { .. } | Diagnostic::TargetKindInferred { .. } => {
                Severity::Info
            }
            _ => Severity::Warning,
        }
    }

    /// Sends the diagnostic to the `log` facade at a level matching its severity.
    pub fn emit(&self) {
        match self.severity() {
            Severity::Info => log::info!("{self}"),
            Severity::Warning => log::warn!("{self}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ModeAutoSelected { mode, has_target } => write!(
                f,
                "similarity mode '{mode}' selected because {} target was provided",
                if *has_target { "a" } else { "no" }
            ),
            Diagnostic::TargetKindInferred { kind, unique_ratio } => write!(
                f,
                "target kind '{kind}' inferred (distinct/total ratio {unique_ratio:.3})"
            ),
            Diagnostic::TargetKindContradiction {
                declared,
                unique_ratio,
                numeric,
            } => write!(
                f,
                "target declared as '{declared}' but looks categorical (ratio {unique_ratio:.3}, numeric: {numeric})"
            ),
            Diagnostic::SingleClassTarget { requested_mode } => write!(
                f,
                "only one class found in the target; target dropped and mode '{requested_mode}' replaced by 'structural'"
            ),
            Diagnostic::UnparseableEncodings { format, encodings } => write!(
                f,
                "{} erroneous {format} removed from the data: {}",
                encodings.len(),
                encodings.join(", ")
            ),
            Diagnostic::IncomputableDescriptors { format, encodings } => write!(
                f,
                "not all descriptors could be computed for {} {format}, removed from the data: {}",
                encodings.len(),
                encodings.join(", ")
            ),
            Diagnostic::SelectionFallback { descriptors } => write!(
                f,
                "feature selection kept no descriptor; using all {descriptors} descriptors"
            ),
            Diagnostic::ParameterOutOfRange {
                parameter,
                value,
                min,
                max,
            } => write!(
                f,
                "{parameter} = {value} is outside the recommended range [{min}, {max}]; value used as given"
            ),
            Diagnostic::EmbeddingMissing { operation } => write!(
                f,
                "reduce the dimensions of the molecules before calling {operation}"
            ),
            Diagnostic::ClustersMissing => {
                write!(f, "cluster colouring requested before clusters were computed")
            }
        }
    }
}
