//! Data models for the packmeter engine.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`Edition`] / [`EditionSelector`]: platform targets and the `all` expansion
//! - [`PackReference`] / [`RepoCoordinates`]: catalog pack definitions with
//!   per-edition repository coordinates
//! - [`FilterConfig`] / [`FilterSet`]: enumeration exclusion rules
//! - [`EditionReport`] / [`TaskOutcome`]: per-edition computation results
//!
//! # Architecture Note
//!
//! Catalog data is fetched fresh per invocation and never mutated afterwards,
//! so concurrent edition computations can share it freely. Filter data is
//! loaded once from static configuration and passed down explicitly rather
//! than read as ambient state.

pub mod filter;
pub mod pack;
pub mod report;

pub use filter::{FilterConfig, FilterSet};
pub use pack::{
    BASELINE_PACK, BEDROCK_LATEST, Edition, EditionSelector, PackReference, PackSet,
    RepoCoordinates, resolve_version,
};
pub use report::{EditionReport, TaskOutcome, completion_percentage, render_completion};
