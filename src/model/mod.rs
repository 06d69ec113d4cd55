//! Plain data flowing through `chemspace`.
//!
//! - [`types`] – Similarity modes, target kinds and molecule encoding formats.
//! - [`target`] – Numeric or categorical target values.
//! - [`table`] – Dense numeric feature tables.
//! - [`dataset`] – The immutable, row-aligned features/target/structures triple.
//! - [`embedding`] – Two-dimensional layouts and the space lifecycle state.
//! - [`diagnostic`] – Structured events for recoverable conditions.
//! - [`render`] – Render-ready tables for external plotting.

pub mod dataset;
pub mod diagnostic;
pub mod embedding;
pub mod render;
pub mod table;
pub mod target;
pub mod types;
