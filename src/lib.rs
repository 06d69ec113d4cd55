//! Two-dimensional chemical space layouts for collections of molecules.
//!
//! Molecules given as SMILES or InChI are turned into either structural
//! fingerprints or a supervised selection of physicochemical descriptors,
//! then reduced to two dimensions by PCA, t-SNE or UMAP. Reduction
//! hyperparameters left unset are predicted from the dataset size by fitted
//! heuristics, so layouts need no per-dataset tuning.
//!
//! # Features
//!
//! - **Structural similarity**: fixed-length substructure fingerprints with
//!   uninformative bits removed
//! - **Tailored similarity**: descriptors pruned by an L1-regularized model
//!   fitted against a regression or classification target
//! - **Size-aware heuristics**: perplexity, n_neighbors and min_dist looked up
//!   by mode and preprocessing from an embedded TOML table
//! - **Clustering and render preparation**: k-means labels, cluster shares,
//!   and z-score outlier filtering for external plotting
//!
//! Parsing, fingerprints and descriptors come from a caller-supplied
//! [`Chemistry`] toolkit, and t-SNE / UMAP from [`NeighborEmbedding`]
//! engines. PCA, the sparse selection models and k-means are bundled.
//!
//! # Quick Start
//!
//! ```
//! use chemspace::{ChemicalSpace, Chemistry, ClusterParams, EncodingFormat, RenderOptions, SpaceError};
//!
//! // A toy toolkit: every printable encoding parses, bits are set per character.
//! struct Letters;
//!
//! impl Chemistry for Letters {
//!     type Structure = String;
//!
//!     fn parse(&self, _format: EncodingFormat, encoding: &str) -> Option<String> {
//!         (!encoding.is_empty()).then(|| encoding.to_string())
//!     }
//!
//!     fn fingerprint(&self, s: &String, _radius: u32, n_bits: usize) -> Vec<bool> {
//!         let mut bits = vec![false; n_bits];
//!         for b in s.bytes() {
//!             bits[b as usize % n_bits] = true;
//!         }
//!         bits
//!     }
//!
//!     fn descriptor_names(&self) -> Vec<String> {
//!         vec!["length".into(), "carbons".into()]
//!     }
//!
//!     fn descriptors(&self, s: &String) -> Vec<f64> {
//!         vec![s.len() as f64, s.matches('C').count() as f64]
//!     }
//! }
//!
//! let mut space = ChemicalSpace::builder(Letters)
//!     .from_smiles(["CCO", "c1ccccc1", "CC(=O)O", "CN", "O=C=O", "C#N"])?;
//! assert_eq!(space.dataset().len(), 6);
//!
//! let layout = space.pca()?;
//! assert_eq!(layout.title, "PCA plot");
//! assert_eq!(layout.coordinates.len(), 6);
//!
//! let clustered = space
//!     .cluster(ClusterParams { n_clusters: 2, seed: Some(7) })?
//!     .expect("a layout is cached");
//! assert!(clustered.is_clustered());
//!
//! let table = space
//!     .render_table(&RenderOptions::default())
//!     .expect("a layout is cached");
//! assert_eq!(table.len(), 6);
//! # Ok::<(), SpaceError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`engine`]: collaborator traits and the bundled numeric engines
//! - [`ChemicalSpace`]: dataset construction, reductions, clustering
//! - [`SpaceConfig`]: fingerprint shape, selection strengths, heuristics table
//!
//! # Data Types
//!
//! - [`AlignedDataset`]: feature table, target and structures with matching rows
//! - [`FeatureTable`]: named numeric columns, all values finite
//! - [`EmbeddingResult`]: cached 2D layout with optional target and clusters
//! - [`RenderTable`]: render-ready rows and legend for an external plotter
//! - [`Diagnostic`]: recoverable events raised by the most recent call

mod model;
mod space;

pub mod engine;

#[cfg(test)]
mod testing;

pub use model::dataset::{AlignedDataset, MisalignedError};
pub use model::diagnostic::{Diagnostic, ParameterName, Severity};
pub use model::embedding::{CLUSTER_COLUMN, EmbeddingResult, SpaceState, TARGET_COLUMN};
pub use model::render::{Colouring, RenderRow, RenderTable};
pub use model::table::{FeatureTable, TableError};
pub use model::target::TargetValue;
pub use model::types::{
    EncodingFormat, ParseEncodingFormatError, ParseSimilarityModeError, ParseTargetKindError,
    SimilarityMode, TargetKind,
};

pub use engine::{
    Chemistry, Clusterer, DefaultSparseModel, EngineError, KMeans, NeighborEmbedding,
    NeighborParams, Response, SparseLinearModel,
};

pub use space::{
    ChemicalSpace, ClusterParams, ClusterSelection, ConstantEntry, FittedEntry,
    FingerprintConfig, HeuristicTable, Link, RenderOptions, SelectionConfig, SpaceBuilder,
    SpaceConfig, TsneParams, UmapParams, get_default_heuristics, load_heuristics,
};

pub use space::Error as SpaceError;

pub use nalgebra;
