use super::target::TargetValue;
use super::types::TargetKind;
use serde::Serialize;

/// What the renderer should colour points by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Colouring {
    Uniform,
    Target(TargetKind),
    Clusters,
}

/// One plotted molecule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRow {
    /// Row of the molecule in the aligned dataset.
    pub index: usize,
    pub encoding: String,
    pub x: f64,
    pub y: f64,
    pub target: Option<TargetValue>,
    pub cluster: Option<usize>,
    /// Legend group of the row when colouring by clusters.
    pub group: Option<String>,
}

/// Render-ready copy of the cached layout handed to an external renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTable {
    pub title: String,
    pub axes: [String; 2],
    pub colouring: Colouring,
    pub rows: Vec<RenderRow>,
    /// Legend labels in display order.
    pub legend: Vec<String>,
}

impl RenderTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
