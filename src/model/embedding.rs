use super::target::TargetValue;
use serde::Serialize;

/// Column name used for the cluster-label column.
pub const CLUSTER_COLUMN: &str = "clusters";
/// Column name used for the target column.
pub const TARGET_COLUMN: &str = "target";

/// Two-dimensional layout produced by one reduction call.
///
/// Holds the two coordinate columns, the target column when the dataset has a
/// target, and cluster labels once clustering has run on this layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingResult {
    /// Axis labels, e.g. `["PC-1 (42%)", "PC-2 (17%)"]`.
    pub axes: [String; 2],
    /// One `[x, y]` pair per molecule, in dataset order.
    pub coordinates: Vec<[f64; 2]>,
    pub target: Option<Vec<TargetValue>>,
    pub clusters: Option<Vec<usize>>,
    /// Plot title describing how the layout was produced.
    pub title: String,
}

impl EmbeddingResult {
    pub fn new(axes: [String; 2], coordinates: Vec<[f64; 2]>, title: impl Into<String>) -> Self {
        Self {
            axes,
            coordinates,
            target: None,
            clusters: None,
            title: title.into(),
        }
    }

    /// Attaches the target column; an empty target leaves the layout unchanged.
    pub fn with_target(mut self, target: &[TargetValue]) -> Self {
        self.target = (!target.is_empty()).then(|| target.to_vec());
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    #[inline]
    pub fn is_clustered(&self) -> bool {
        self.clusters.is_some()
    }

    /// Names of the table columns in order.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names = vec![self.axes[0].as_str(), self.axes[1].as_str()];
        if self.target.is_some() {
            names.push(TARGET_COLUMN);
        }
        if self.clusters.is_some() {
            names.push(CLUSTER_COLUMN);
        }
        names
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        2 + usize::from(self.target.is_some()) + usize::from(self.clusters.is_some())
    }

    pub fn x(&self) -> impl Iterator<Item = f64> + '_ {
        self.coordinates.iter().map(|p| p[0])
    }

    pub fn y(&self) -> impl Iterator<Item = f64> + '_ {
        self.coordinates.iter().map(|p| p[1])
    }
}

/// Lifecycle state of a chemical space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceState {
    /// Dataset built, no layout yet.
    Constructed,
    /// A layout is cached.
    Embedded,
    /// The cached layout carries cluster labels.
    Clustered,
}
