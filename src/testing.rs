//! Deterministic collaborators shared by the unit tests.

use crate::engine::{Chemistry, EngineError, NeighborEmbedding, NeighborParams};
use crate::model::target::TargetValue;
use crate::model::types::EncodingFormat;
use nalgebra::DMatrix;
use std::cell::RefCell;
use std::rc::Rc;

pub fn encodings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn numeric_target(values: &[f64]) -> Vec<TargetValue> {
    values.iter().copied().map(TargetValue::from).collect()
}

fn fnv1a(chars: &[char]) -> u64 {
    chars.iter().fold(0xcbf2_9ce4_8422_2325, |h, &c| {
        (h ^ u64::from(c)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Toolkit over plain strings.
///
/// - An encoding starting with `!` (or an empty one) does not parse.
/// - The fingerprint hashes every substring of up to `radius + 1` characters.
/// - Descriptors are character counts; a `?` makes the last one NaN.
#[derive(Debug, Clone, Default)]
pub struct FakeChemistry {
    /// Truncates fingerprints to this length to break the output contract.
    pub fingerprint_len: Option<usize>,
    /// Truncates descriptor vectors to this length to break the output contract.
    pub descriptor_len: Option<usize>,
    pub smiles_only: bool,
}

impl Chemistry for FakeChemistry {
    type Structure = String;

    fn supports(&self, format: EncodingFormat) -> bool {
        !self.smiles_only || format == EncodingFormat::Smiles
    }

    fn parse(&self, _format: EncodingFormat, encoding: &str) -> Option<String> {
        (!encoding.is_empty() && !encoding.starts_with('!')).then(|| encoding.to_string())
    }

    fn fingerprint(&self, structure: &String, radius: u32, n_bits: usize) -> Vec<bool> {
        let chars: Vec<char> = structure.chars().collect();
        let mut bits = vec![false; n_bits];
        for width in 1..=(radius as usize + 1) {
            for window in chars.windows(width) {
                bits[(fnv1a(window) % n_bits as u64) as usize] = true;
            }
        }
        if let Some(len) = self.fingerprint_len {
            bits.truncate(len);
        }
        bits
    }

    fn descriptor_names(&self) -> Vec<String> {
        ["length", "carbons", "heteroatoms", "ring_closures", "branches"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn descriptors(&self, structure: &String) -> Vec<f64> {
        let count = |pred: fn(char) -> bool| structure.chars().filter(|&c| pred(c)).count() as f64;
        let mut values = vec![
            structure.chars().count() as f64,
            count(|c| c == 'C' || c == 'c'),
            count(|c| matches!(c, 'N' | 'O' | 'S' | 'n' | 'o' | 's')),
            count(|c| c.is_ascii_digit()),
            count(|c| c == '('),
        ];
        if structure.contains('?') {
            values[4] = f64::NAN;
        }
        if let Some(len) = self.descriptor_len {
            values.truncate(len);
        }
        values
    }
}

/// One recorded call to a [`FakeEmbedding`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedCall {
    pub params: NeighborParams,
    pub seed: Option<u64>,
    pub rows: usize,
    pub columns: usize,
}

/// Embedding that places row `i` at `(row sum, i + seed)` and records each call.
#[derive(Debug, Clone, Default)]
pub struct FakeEmbedding {
    pub calls: Rc<RefCell<Vec<EmbedCall>>>,
    pub fail: bool,
    /// Drops the last point to break the output contract.
    pub short: bool,
}

impl FakeEmbedding {
    pub fn last_call(&self) -> Option<EmbedCall> {
        self.calls.borrow().last().cloned()
    }
}

impl NeighborEmbedding for FakeEmbedding {
    fn embed(
        &self,
        data: &DMatrix<f64>,
        params: NeighborParams,
        seed: Option<u64>,
    ) -> Result<Vec<[f64; 2]>, EngineError> {
        self.calls.borrow_mut().push(EmbedCall {
            params,
            seed,
            rows: data.nrows(),
            columns: data.ncols(),
        });
        if self.fail {
            return Err(EngineError::new("embedding diverged"));
        }
        let offset = seed.unwrap_or(0) as f64;
        let mut points: Vec<[f64; 2]> = data
            .row_iter()
            .enumerate()
            .map(|(i, row)| [row.sum(), i as f64 + offset])
            .collect();
        if self.short {
            points.pop();
        }
        Ok(points)
    }
}
