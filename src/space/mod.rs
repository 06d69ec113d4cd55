mod config;
mod decide;
mod error;
mod extract;
mod heuristic;
mod legend;
mod outlier;
mod scale;
mod select;

pub use config::{
    ClusterParams, ClusterSelection, FingerprintConfig, RenderOptions, SelectionConfig,
    SpaceConfig, TsneParams, UmapParams,
};
pub use error::Error;
pub use heuristic::{
    ConstantEntry, FittedEntry, HeuristicTable, Link, get_default_heuristics, load_heuristics,
};

use crate::engine::{
    Chemistry, Clusterer, DefaultSparseModel, EngineError, KMeans, NeighborEmbedding,
    NeighborParams, SparseLinearModel, pca,
};
use crate::model::dataset::AlignedDataset;
use crate::model::diagnostic::Diagnostic;
use crate::model::embedding::{EmbeddingResult, SpaceState};
use crate::model::render::{Colouring, RenderRow, RenderTable};
use crate::model::target::{self, TargetValue};
use crate::model::types::{EncodingFormat, SimilarityMode, TargetKind};
use extract::FeatureExtractor;
use nalgebra::DMatrix;
use select::FeatureSelector;

/// Components kept by the intermediate projection applied before t-SNE or
/// UMAP when preprocessing is requested.
pub const PREPROCESS_COMPONENTS: usize = 10;

/// Diagnostics of the most recent call, each forwarded to `log` as it is raised.
#[derive(Debug, Default)]
struct DiagnosticLog(Vec<Diagnostic>);

impl DiagnosticLog {
    fn reset(&mut self) {
        self.0.clear();
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.0.push(diagnostic);
    }

    fn report_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for d in diagnostics {
            self.report(d);
        }
    }

    fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.0.contains(diagnostic)
    }
}

/// Feature matrix handed to a reduction, with the projection it went through.
struct ReductionInput {
    data: DMatrix<f64>,
    preprocessed: bool,
    cumulative_variance: Option<f64>,
}

impl ReductionInput {
    fn title(&self, algorithm: &str) -> String {
        match self.cumulative_variance {
            Some(ratio) => format!(
                "{algorithm} plot from components with cumulative variance explained {}",
                legend::percent_label(ratio)
            ),
            None => format!("{algorithm} plot"),
        }
    }
}

/// Builder for a [`ChemicalSpace`].
///
/// Created by [`ChemicalSpace::builder`]; finished by
/// [`from_smiles`](Self::from_smiles), [`from_inchi`](Self::from_inchi) or
/// [`build`](Self::build).
pub struct SpaceBuilder<C: Chemistry> {
    chemistry: C,
    target: Vec<TargetValue>,
    target_kind: Option<TargetKind>,
    mode: Option<SimilarityMode>,
    config: SpaceConfig,
    sparse_model: Box<dyn SparseLinearModel>,
    tsne: Option<Box<dyn NeighborEmbedding>>,
    umap: Option<Box<dyn NeighborEmbedding>>,
    clusterer: Box<dyn Clusterer>,
}

impl<C: Chemistry> SpaceBuilder<C> {
    fn new(chemistry: C) -> Self {
        Self {
            chemistry,
            target: Vec::new(),
            target_kind: None,
            mode: None,
            config: SpaceConfig::default(),
            sparse_model: Box::new(DefaultSparseModel::default()),
            tsne: None,
            umap: None,
            clusterer: Box::new(KMeans::default()),
        }
    }

    /// One target value per encoding. An empty sequence means no target.
    pub fn target<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TargetValue>,
    {
        self.target = values.into_iter().map(Into::into).collect();
        self
    }

    /// Declares the target kind instead of inferring it.
    pub fn target_kind(mut self, kind: TargetKind) -> Self {
        self.target_kind = Some(kind);
        self
    }

    /// Requests a similarity mode instead of choosing one from the target.
    pub fn mode(mut self, mode: SimilarityMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn config(mut self, config: SpaceConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the model used for descriptor selection.
    pub fn sparse_model(mut self, model: impl SparseLinearModel + 'static) -> Self {
        self.sparse_model = Box::new(model);
        self
    }

    pub fn tsne_engine(mut self, engine: impl NeighborEmbedding + 'static) -> Self {
        self.tsne = Some(Box::new(engine));
        self
    }

    pub fn umap_engine(mut self, engine: impl NeighborEmbedding + 'static) -> Self {
        self.umap = Some(Box::new(engine));
        self
    }

    /// Replaces the bundled k-means clusterer.
    pub fn clusterer(mut self, clusterer: impl Clusterer + 'static) -> Self {
        self.clusterer = Box::new(clusterer);
        self
    }

    pub fn from_smiles<I, E>(self, encodings: I) -> Result<ChemicalSpace<C::Structure>, Error>
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.build(EncodingFormat::Smiles, encodings)
    }

    pub fn from_inchi<I, E>(self, encodings: I) -> Result<ChemicalSpace<C::Structure>, Error>
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.build(EncodingFormat::Inchi, encodings)
    }

    /// Validates the inputs and builds the aligned dataset.
    ///
    /// # Errors
    ///
    /// Configuration errors ([`Error::MissingTarget`],
    /// [`Error::TargetLengthMismatch`], [`Error::NonNumericRegressionTarget`],
    /// [`Error::UnsupportedFormat`], [`Error::HeuristicsParse`]) are raised
    /// before any feature is computed. [`Error::InsufficientData`] is raised
    /// when fewer than two molecules or two features survive extraction or
    /// selection.
    ///
    /// A classification target left with a single class, either as given or
    /// after unusable molecules are dropped, is discarded and the space falls
    /// back to structural mode.
    pub fn build<I, E>(
        self,
        format: EncodingFormat,
        encodings: I,
    ) -> Result<ChemicalSpace<C::Structure>, Error>
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        let encodings: Vec<String> = encodings.into_iter().map(Into::into).collect();
        let mut target = self.target;
        let mut events = DiagnosticLog::default();

        let (mut mode, diagnostics) = decide::choose_mode(self.mode, !target.is_empty());
        events.report_all(diagnostics);

        if mode == SimilarityMode::Tailored && target.is_empty() {
            return Err(Error::MissingTarget { mode });
        }
        if !target.is_empty() && target.len() != encodings.len() {
            return Err(Error::TargetLengthMismatch {
                targets: target.len(),
                molecules: encodings.len(),
            });
        }

        let heuristics = load_heuristics(self.config.heuristics.as_deref())?;

        let mut target_kind = None;
        if !target.is_empty() {
            let (kind, diagnostics) = decide::resolve_kind(&target, self.target_kind);
            events.report_all(diagnostics);
            target_kind = Some(kind);

            if decide::is_single_class(&target, kind) {
                events.report(Diagnostic::SingleClassTarget {
                    requested_mode: mode,
                });
                target.clear();
                target_kind = None;
                mode = SimilarityMode::Structural;
            }
        }

        if mode == SimilarityMode::Tailored
            && target_kind == Some(TargetKind::Regression)
            && !target::all_numeric(&target)
        {
            return Err(Error::NonNumericRegressionTarget);
        }

        let extractor = FeatureExtractor::new(&self.chemistry, format, self.config.fingerprint);
        let (mut dataset, diagnostics) = extractor.extract(&encodings, &target, mode)?;
        events.report_all(diagnostics);

        // Dropped rows can take a whole class with them.
        if mode == SimilarityMode::Tailored
            && target_kind.is_some_and(|kind| decide::is_single_class(dataset.target(), kind))
        {
            events.report(Diagnostic::SingleClassTarget {
                requested_mode: mode,
            });
            target.clear();
            target_kind = None;
            mode = SimilarityMode::Structural;
            let (structural, diagnostics) = extractor.extract(&encodings, &target, mode)?;
            let fresh: Vec<Diagnostic> = diagnostics
                .into_iter()
                .filter(|d| !events.contains(d))
                .collect();
            events.report_all(fresh);
            dataset = structural;
        }

        if let (SimilarityMode::Tailored, Some(kind)) = (mode, target_kind) {
            let selector = FeatureSelector::new(self.sparse_model.as_ref(), self.config.selection);
            let (features, diagnostics) =
                selector.select(dataset.features(), dataset.target(), kind)?;
            events.report_all(diagnostics);
            if features.n_rows() < 2 || features.n_columns() < 2 {
                return Err(Error::insufficient(features.n_rows(), features.n_columns()));
            }
            dataset = dataset.with_features(features)?;
        }

        log::info!(
            "chemical space built: {} of {} molecules, {} features, mode '{}'",
            dataset.len(),
            encodings.len(),
            dataset.features().n_columns(),
            mode
        );

        Ok(ChemicalSpace {
            mode,
            target_kind,
            format,
            dataset,
            heuristics,
            tsne: self.tsne,
            umap: self.umap,
            clusterer: self.clusterer,
            embedding: None,
            diagnostics: events,
        })
    }
}

/// Two-dimensional chemical space over a fixed set of molecules.
///
/// The aligned dataset is built once and never changes. Each reduction
/// ([`pca`](Self::pca), [`tsne`](Self::tsne), [`umap`](Self::umap)) replaces
/// the cached layout and drops any cluster labels; [`cluster`](Self::cluster)
/// labels the cached layout in place. Callers always receive copies.
///
/// Every public call starts a fresh diagnostic buffer, readable through
/// [`diagnostics`](Self::diagnostics) until the next call.
pub struct ChemicalSpace<S> {
    mode: SimilarityMode,
    target_kind: Option<TargetKind>,
    format: EncodingFormat,
    dataset: AlignedDataset<S>,
    heuristics: HeuristicTable,
    tsne: Option<Box<dyn NeighborEmbedding>>,
    umap: Option<Box<dyn NeighborEmbedding>>,
    clusterer: Box<dyn Clusterer>,
    embedding: Option<EmbeddingResult>,
    diagnostics: DiagnosticLog,
}

impl<S> ChemicalSpace<S> {
    pub fn builder<C: Chemistry<Structure = S>>(chemistry: C) -> SpaceBuilder<C> {
        SpaceBuilder::new(chemistry)
    }

    /// Projects onto the two leading principal axes.
    ///
    /// Descriptor features are standardized first; fingerprint bits are used
    /// as they are. The result is deterministic.
    pub fn pca(&mut self) -> Result<EmbeddingResult, Error> {
        self.diagnostics.reset();
        let projection =
            pca::project(&self.feature_matrix(), 2).map_err(|e| Error::reduction("PCA", e))?;

        let ratio = |c: usize| {
            projection
                .explained_variance_ratio
                .get(c)
                .copied()
                .unwrap_or(0.0)
        };
        let axes = [
            format!("PC-1 ({})", legend::percent_label(ratio(0))),
            format!("PC-2 ({})", legend::percent_label(ratio(1))),
        ];
        let result = self.layout("PCA", projection.coordinates(), axes, "PCA plot".into())?;
        Ok(self.store(result))
    }

    /// Embeds with the registered t-SNE engine.
    ///
    /// An unset perplexity is predicted from the number of molecules. A
    /// supplied one is used as given, with a warning outside `[5, 50]`.
    pub fn tsne(&mut self, params: TsneParams) -> Result<EmbeddingResult, Error> {
        self.diagnostics.reset();
        let engine = self.tsne.as_deref().ok_or(Error::MissingEngine("t-SNE"))?;
        let input = self.reduction_input(params.preprocess)?;
        let n = self.dataset.len();

        let perplexity = match params.perplexity {
            Some(p) => {
                if let Some(d) = heuristic::check_perplexity(p) {
                    self.diagnostics.report(d);
                }
                p
            }
            None => self.heuristics.perplexity(self.mode, input.preprocessed, n)?,
        };
        log::debug!("t-SNE on {n} molecules with perplexity {perplexity}");

        let coordinates = engine
            .embed(&input.data, NeighborParams::Tsne { perplexity }, params.seed)
            .map_err(|e| Error::reduction("t-SNE", e))?;
        let axes = ["t-SNE-1".to_string(), "t-SNE-2".to_string()];
        let result = self.layout("t-SNE", coordinates, axes, input.title("t-SNE"))?;
        Ok(self.store(result))
    }

    /// Embeds with the registered UMAP engine.
    ///
    /// n_neighbors and min_dist are resolved independently: unset values come
    /// from the heuristics table, supplied ones are used as given with a
    /// warning outside `[2, n/4]` and `[0, 0.99]` respectively.
    pub fn umap(&mut self, params: UmapParams) -> Result<EmbeddingResult, Error> {
        self.diagnostics.reset();
        let engine = self.umap.as_deref().ok_or(Error::MissingEngine("UMAP"))?;
        let input = self.reduction_input(params.preprocess)?;
        let n = self.dataset.len();

        let n_neighbors = match params.n_neighbors {
            Some(k) => {
                if let Some(d) = heuristic::check_n_neighbors(k, n) {
                    self.diagnostics.report(d);
                }
                k
            }
            None => self.heuristics.n_neighbors(self.mode, input.preprocessed, n)?,
        };
        let min_dist = match params.min_dist {
            Some(d) => {
                if let Some(diagnostic) = heuristic::check_min_dist(d) {
                    self.diagnostics.report(diagnostic);
                }
                d
            }
            None => self.heuristics.min_dist(self.mode, input.preprocessed)?,
        };
        log::debug!("UMAP on {n} molecules with n_neighbors {n_neighbors}, min_dist {min_dist}");

        let coordinates = engine
            .embed(
                &input.data,
                NeighborParams::Umap {
                    n_neighbors,
                    min_dist,
                },
                params.seed,
            )
            .map_err(|e| Error::reduction("UMAP", e))?;
        let axes = ["UMAP-1".to_string(), "UMAP-2".to_string()];
        let result = self.layout("UMAP", coordinates, axes, input.title("UMAP"))?;
        Ok(self.store(result))
    }

    /// Labels the cached layout with `n_clusters` groups.
    ///
    /// Without a cached layout this reports
    /// [`Diagnostic::EmbeddingMissing`] and returns `Ok(None)`, leaving the
    /// state untouched.
    pub fn cluster(&mut self, params: ClusterParams) -> Result<Option<EmbeddingResult>, Error> {
        self.diagnostics.reset();
        let Some(embedding) = self.embedding.as_mut() else {
            self.diagnostics.report(Diagnostic::EmbeddingMissing {
                operation: "cluster",
            });
            return Ok(None);
        };
        if params.n_clusters == 0 {
            return Err(Error::InvalidClusterCount(params.n_clusters));
        }

        let labels = self
            .clusterer
            .cluster(&embedding.coordinates, params.n_clusters, params.seed)
            .map_err(Error::Clustering)?;
        if labels.len() != embedding.len() {
            return Err(Error::Clustering(EngineError::new(format!(
                "clusterer returned {} labels for {} points",
                labels.len(),
                embedding.len()
            ))));
        }

        embedding.clusters = Some(labels);
        Ok(Some(embedding.clone()))
    }

    /// Prepares the cached layout for an external renderer.
    ///
    /// Returns `None` with [`Diagnostic::EmbeddingMissing`] when nothing has
    /// been embedded. Cluster colouring requested before
    /// [`cluster`](Self::cluster) reports [`Diagnostic::ClustersMissing`] and
    /// falls back to target colouring. Legend shares are computed before
    /// outliers are removed.
    pub fn render_table(&mut self, options: &RenderOptions) -> Option<RenderTable> {
        self.diagnostics.reset();
        let Some(embedding) = self.embedding.as_ref() else {
            self.diagnostics.report(Diagnostic::EmbeddingMissing {
                operation: "render_table",
            });
            return None;
        };

        let labels = match (&options.clusters, &embedding.clusters) {
            (ClusterSelection::Off, _) => None,
            (_, Some(labels)) => Some(labels),
            (_, None) => {
                self.diagnostics.report(Diagnostic::ClustersMissing);
                None
            }
        };

        let (colouring, groups, legend): (Colouring, Vec<Option<String>>, Vec<String>) =
            match (labels, &options.clusters) {
                (Some(labels), ClusterSelection::Only(selected)) => {
                    let (hit, miss) = legend::selection_labels(labels, selected);
                    let groups = labels
                        .iter()
                        .map(|c| {
                            let group = if selected.contains(c) { &hit } else { &miss };
                            Some(group.clone())
                        })
                        .collect();
                    (Colouring::Clusters, groups, vec![hit, miss])
                }
                (Some(labels), _) => {
                    let names = legend::cluster_labels(labels);
                    let groups = labels.iter().map(|c| names.get(c).cloned()).collect();
                    (Colouring::Clusters, groups, names.into_values().collect())
                }
                (None, _) => {
                    let colouring = match (&embedding.target, self.target_kind) {
                        (Some(_), Some(kind)) => Colouring::Target(kind),
                        _ => Colouring::Uniform,
                    };
                    (colouring, vec![None; embedding.len()], Vec::new())
                }
            };

        let keep = if options.remove_outliers {
            outlier::inliers(&embedding.coordinates)
        } else {
            vec![true; embedding.len()]
        };

        let rows = embedding
            .coordinates
            .iter()
            .zip(groups)
            .enumerate()
            .filter(|(i, _)| keep[*i])
            .map(|(i, (point, group))| RenderRow {
                index: i,
                encoding: self.dataset.encodings()[i].clone(),
                x: point[0],
                y: point[1],
                target: embedding.target.as_ref().map(|t| t[i].clone()),
                cluster: embedding.clusters.as_ref().map(|c| c[i]),
                group,
            })
            .collect();

        Some(RenderTable {
            title: embedding.title.clone(),
            axes: embedding.axes.clone(),
            colouring,
            rows,
            legend,
        })
    }

    /// Target values of the surviving molecules; empty when there is none.
    pub fn target(&self) -> &[TargetValue] {
        self.dataset.target()
    }

    pub fn target_kind(&self) -> Option<TargetKind> {
        self.target_kind
    }

    pub fn mode(&self) -> SimilarityMode {
        self.mode
    }

    pub fn format(&self) -> EncodingFormat {
        self.format
    }

    pub fn dataset(&self) -> &AlignedDataset<S> {
        &self.dataset
    }

    /// Copy of the cached layout.
    pub fn embedding(&self) -> Option<EmbeddingResult> {
        self.embedding.clone()
    }

    pub fn state(&self) -> SpaceState {
        match &self.embedding {
            None => SpaceState::Constructed,
            Some(e) if e.is_clustered() => SpaceState::Clustered,
            Some(_) => SpaceState::Embedded,
        }
    }

    /// Diagnostics raised by the most recent call.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics.0
    }

    fn feature_matrix(&self) -> DMatrix<f64> {
        let features = self.dataset.features();
        if self.mode.needs_scaling() {
            scale::standardize(features)
        } else {
            features.to_matrix()
        }
    }

    fn reduction_input(&self, preprocess: bool) -> Result<ReductionInput, Error> {
        let data = self.feature_matrix();
        if !(preprocess && self.mode == SimilarityMode::Structural) {
            return Ok(ReductionInput {
                data,
                preprocessed: false,
                cumulative_variance: None,
            });
        }

        let projection = pca::project(&data, PREPROCESS_COMPONENTS)
            .map_err(|e| Error::reduction("PCA", e))?;
        Ok(ReductionInput {
            cumulative_variance: Some(projection.cumulative_ratio()),
            data: projection.scores,
            preprocessed: true,
        })
    }

    fn layout(
        &self,
        algorithm: &'static str,
        coordinates: Vec<[f64; 2]>,
        axes: [String; 2],
        title: String,
    ) -> Result<EmbeddingResult, Error> {
        if coordinates.len() != self.dataset.len() {
            return Err(Error::LayoutLength {
                algorithm,
                expected: self.dataset.len(),
                actual: coordinates.len(),
            });
        }
        Ok(EmbeddingResult::new(axes, coordinates, title).with_target(self.dataset.target()))
    }

    fn store(&mut self, result: EmbeddingResult) -> EmbeddingResult {
        self.embedding = Some(result.clone());
        result
    }
}
