use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid similarity mode: '{0}' (expected 'structural' or 'tailored')")]
pub struct ParseSimilarityModeError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid target kind: '{0}' (expected 'R'/'regression' or 'C'/'classification')")]
pub struct ParseTargetKindError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown molecule encoding format: '{0}'")]
pub struct ParseEncodingFormatError(String);

/// Feature representation used to build the chemical space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMode {
    /// Substructure-presence fingerprints; no target needed.
    Structural,
    /// Physicochemical descriptors pruned by a sparse model fitted on the target.
    Tailored,
}

impl SimilarityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMode::Structural => "structural",
            SimilarityMode::Tailored => "tailored",
        }
    }

    /// Whether features must be standardized before any reduction.
    #[inline]
    pub fn needs_scaling(&self) -> bool {
        matches!(self, SimilarityMode::Tailored)
    }
}

impl fmt::Display for SimilarityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMode {
    type Err = ParseSimilarityModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(SimilarityMode::Structural),
            "tailored" => Ok(SimilarityMode::Tailored),
            _ => Err(ParseSimilarityModeError(s.to_string())),
        }
    }
}

/// Nature of the target values attached to the molecules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// Continuous property.
    Regression,
    /// Class labels.
    Classification,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Regression => write!(f, "regression"),
            TargetKind::Classification => write!(f, "classification"),
        }
    }
}

impl FromStr for TargetKind {
    type Err = ParseTargetKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "regression" => Ok(TargetKind::Regression),
            "c" | "classification" => Ok(TargetKind::Classification),
            _ => Err(ParseTargetKindError(s.to_string())),
        }
    }
}

/// Text encoding in which molecules are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingFormat {
    Smiles,
    Inchi,
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingFormat::Smiles => write!(f, "SMILES"),
            EncodingFormat::Inchi => write!(f, "InChI"),
        }
    }
}

impl FromStr for EncodingFormat {
    type Err = ParseEncodingFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smiles" | "smi" => Ok(EncodingFormat::Smiles),
            "inchi" => Ok(EncodingFormat::Inchi),
            _ => Err(ParseEncodingFormatError(s.to_string())),
        }
    }
}
