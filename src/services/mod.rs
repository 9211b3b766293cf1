//! Services module - the synchronization-and-diff engine.
//!
//! Everything here is framework-agnostic business logic with no knowledge of
//! the front-end that invokes it. The components compose leaf-first:
//!
//! - [`catalog`]: read-only client for the pack catalog service (packs,
//!   editions, versions, progress-channel mapping)
//! - [`repo_sync`]: idempotent clone-or-update of one git repository to a
//!   target version, driven through a [`CommandRunner`] subprocess seam
//! - [`tree_walk`]: filtered recursive enumeration of a synchronized tree
//! - [`diff`]: pure set-difference computation and report formatting
//! - [`missing`]: the orchestrator, fanning a request out across editions and
//!   isolating each edition's failure into its own outcome
//! - [`reconcile`]: best-effort propagation of a completion score into the
//!   mapped progress channel name
//!
//! # Design Philosophy
//!
//! - **Injected capabilities**: the catalog, subprocess runner, and display
//!   surface are traits; tests substitute mocks and in-memory fakes
//! - **Async**: all I/O goes through tokio; nothing blocks the runtime
//! - **Failure isolation**: one edition's error never aborts the batch, and
//!   display reconciliation can never affect the primary result

pub mod catalog;
pub mod diff;
pub mod missing;
pub mod reconcile;
pub mod repo_sync;
pub mod tree_walk;

pub use catalog::{CatalogApi, CatalogError, HttpCatalog, ProgressChannelMap};
pub use diff::{CONTENT_ROOTS, DiffOutcome, diff_textures, format_report};
pub use missing::{MissingError, MissingService};
pub use reconcile::{
    ChannelKind, DisplayApi, DisplayChannel, DisplayError, ProgressChannelReconciler,
    ReconcileOutcome,
};
pub use repo_sync::{CommandRunner, GitSync, ProcessRunner, RepoSynchronizer, SyncError};
pub use tree_walk::{WalkError, collect_files};
