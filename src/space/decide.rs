//! Construction-time decisions.
//!
//! Each function only inspects its inputs and returns the decision together
//! with the diagnostics it raised; the caller applies both.

use crate::model::diagnostic::Diagnostic;
use crate::model::target::{self, TargetValue};
use crate::model::types::{SimilarityMode, TargetKind};

/// Targets whose distinct/total ratio falls below this look categorical.
pub const CATEGORICAL_RATIO: f64 = 0.05;

/// Uses the requested mode, or picks Tailored when a target is present.
pub fn choose_mode(
    requested: Option<SimilarityMode>,
    has_target: bool,
) -> (SimilarityMode, Vec<Diagnostic>) {
    match requested {
        Some(mode) => (mode, Vec::new()),
        None => {
            let mode = if has_target {
                SimilarityMode::Tailored
            } else {
                SimilarityMode::Structural
            };
            (mode, vec![Diagnostic::ModeAutoSelected { mode, has_target }])
        }
    }
}

/// Infers the target kind, or validates a declared one.
///
/// A declared kind is always honored. Declaring Regression for a target that
/// looks categorical or holds labels raises a contradiction warning.
pub fn resolve_kind(
    values: &[TargetValue],
    declared: Option<TargetKind>,
) -> (TargetKind, Vec<Diagnostic>) {
    let unique_ratio = target::unique_ratio(values);
    let numeric = target::all_numeric(values);
    let categorical = unique_ratio < CATEGORICAL_RATIO || !numeric;

    match declared {
        Some(kind) => {
            let mut diagnostics = Vec::new();
            if kind == TargetKind::Regression && categorical {
                diagnostics.push(Diagnostic::TargetKindContradiction {
                    declared: kind,
                    unique_ratio,
                    numeric,
                });
            }
            (kind, diagnostics)
        }
        None => {
            let kind = if categorical {
                TargetKind::Classification
            } else {
                TargetKind::Regression
            };
            (
                kind,
                vec![Diagnostic::TargetKindInferred { kind, unique_ratio }],
            )
        }
    }
}

/// Whether a classification target carries a single class.
pub fn is_single_class(values: &[TargetValue], kind: TargetKind) -> bool {
    kind == TargetKind::Classification && target::distinct(values).len() == 1
}
