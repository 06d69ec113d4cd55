use super::config::FingerprintConfig;
use super::error::Error;
use crate::engine::Chemistry;
use crate::model::dataset::AlignedDataset;
use crate::model::diagnostic::Diagnostic;
use crate::model::table::FeatureTable;
use crate::model::target::TargetValue;
use crate::model::types::{EncodingFormat, SimilarityMode};

/// Molecules that survived parsing and feature computation.
struct Survivors<S> {
    indices: Vec<usize>,
    structures: Vec<S>,
    rows: Vec<Vec<f64>>,
}

impl<S> Survivors<S> {
    fn with_capacity(n: usize) -> Self {
        Self {
            indices: Vec::with_capacity(n),
            structures: Vec::with_capacity(n),
            rows: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, index: usize, structure: S, row: Vec<f64>) {
        self.indices.push(index);
        self.structures.push(structure);
        self.rows.push(row);
    }
}

/// Turns encodings into an aligned feature table.
///
/// Unparseable encodings and molecules with a non-finite descriptor are
/// dropped together with their target entries; each kind of failure is
/// reported once as a single diagnostic listing every affected encoding.
pub struct FeatureExtractor<'a, C: Chemistry> {
    chemistry: &'a C,
    format: EncodingFormat,
    fingerprint: FingerprintConfig,
}

impl<'a, C: Chemistry> FeatureExtractor<'a, C> {
    pub fn new(chemistry: &'a C, format: EncodingFormat, fingerprint: FingerprintConfig) -> Self {
        Self {
            chemistry,
            format,
            fingerprint,
        }
    }

    /// Builds the dataset for `mode`.
    ///
    /// `target` is either empty or one value per encoding.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedFormat`] if the toolkit rejects the format.
    /// - [`Error::FingerprintLength`] / [`Error::DescriptorContract`] if the
    ///   toolkit breaks its output contract.
    /// - [`Error::InsufficientData`] if fewer than two molecules or two
    ///   feature columns remain.
    pub fn extract(
        &self,
        encodings: &[String],
        target: &[TargetValue],
        mode: SimilarityMode,
    ) -> Result<(AlignedDataset<C::Structure>, Vec<Diagnostic>), Error> {
        if !self.chemistry.supports(self.format) {
            return Err(Error::UnsupportedFormat(self.format));
        }

        let mut diagnostics = Vec::new();
        let mut unparseable = Vec::new();
        let parsed: Vec<(usize, C::Structure)> = encodings
            .iter()
            .enumerate()
            .filter_map(|(i, encoding)| match self.chemistry.parse(self.format, encoding) {
                Some(structure) => Some((i, structure)),
                None => {
                    unparseable.push(encoding.clone());
                    None
                }
            })
            .collect();

        if !unparseable.is_empty() {
            diagnostics.push(Diagnostic::UnparseableEncodings {
                format: self.format,
                encodings: unparseable,
            });
        }

        let (survivors, columns) = match mode {
            SimilarityMode::Structural => self.fingerprints(encodings, parsed)?,
            SimilarityMode::Tailored => {
                let (survivors, incomputable) = self.descriptors(encodings, parsed)?;
                if !incomputable.is_empty() {
                    diagnostics.push(Diagnostic::IncomputableDescriptors {
                        format: self.format,
                        encodings: incomputable,
                    });
                }
                (survivors, self.chemistry.descriptor_names())
            }
        };

        let table = FeatureTable::from_rows(columns, survivors.rows)?;
        if table.n_rows() < 2 || table.n_columns() < 2 {
            return Err(Error::insufficient(table.n_rows(), table.n_columns()));
        }

        let kept_target = if target.is_empty() {
            Vec::new()
        } else {
            survivors.indices.iter().map(|&i| target[i].clone()).collect()
        };
        let kept_encodings = survivors
            .indices
            .iter()
            .map(|&i| encodings[i].clone())
            .collect();

        log::debug!(
            "extracted {} x {} {} feature table from {} encodings",
            table.n_rows(),
            table.n_columns(),
            mode,
            encodings.len()
        );

        let dataset =
            AlignedDataset::new(table, kept_target, survivors.structures, kept_encodings)?;
        Ok((dataset, diagnostics))
    }

    fn fingerprints(
        &self,
        encodings: &[String],
        parsed: Vec<(usize, C::Structure)>,
    ) -> Result<(Survivors<C::Structure>, Vec<String>), Error> {
        let FingerprintConfig { radius, n_bits } = self.fingerprint;
        let mut survivors = Survivors::with_capacity(parsed.len());

        for (i, structure) in parsed {
            let bits = self.chemistry.fingerprint(&structure, radius, n_bits);
            if bits.len() != n_bits {
                return Err(Error::FingerprintLength {
                    encoding: encodings[i].clone(),
                    expected: n_bits,
                    actual: bits.len(),
                });
            }
            let row = bits.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect();
            survivors.push(i, structure, row);
        }

        // Bits set (or unset) for every molecule cannot separate any two of them.
        let informative: Vec<usize> = (0..n_bits)
            .filter(|&j| {
                survivors
                    .rows
                    .first()
                    .is_some_and(|first| survivors.rows.iter().any(|r| r[j] != first[j]))
            })
            .collect();

        survivors.rows = survivors
            .rows
            .iter()
            .map(|row| informative.iter().map(|&j| row[j]).collect())
            .collect();
        let columns = informative.iter().map(|j| format!("bit-{j}")).collect();
        Ok((survivors, columns))
    }

    fn descriptors(
        &self,
        encodings: &[String],
        parsed: Vec<(usize, C::Structure)>,
    ) -> Result<(Survivors<C::Structure>, Vec<String>), Error> {
        let names = self.chemistry.descriptor_names();
        let mut survivors = Survivors::with_capacity(parsed.len());
        let mut incomputable = Vec::new();

        for (i, structure) in parsed {
            let values = self.chemistry.descriptors(&structure);
            if values.len() != names.len() {
                return Err(Error::DescriptorContract {
                    encoding: encodings[i].clone(),
                    expected: names.len(),
                    actual: values.len(),
                });
            }
            if values.iter().all(|v| v.is_finite()) {
                survivors.push(i, structure, values);
            } else {
                incomputable.push(encodings[i].clone());
            }
        }
        Ok((survivors, incomputable))
    }
}
