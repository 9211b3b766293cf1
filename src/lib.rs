// packmeter - Completion tracking engine for derivative Minecraft resource packs
//
// This is the library crate containing the core business logic and data structures.
// The binary crate (main.rs) provides the command-line entry point.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod progress;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, Settings};
pub use models::{Edition, EditionReport, EditionSelector, FilterConfig, TaskOutcome};
pub use progress::{ProgressEvent, ProgressTracker};
pub use services::{MissingService, ProgressChannelReconciler};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
