//! Nweat - a terminal media triage library
//!
//! This crate provides the core functionality for the Nweat application:
//! going through the photos and videos of a directory one at a time and
//! archiving, keeping, or moving each of them into a sub-folder.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod thumbnail;
pub mod tui;

// Re-export primary types for convenience
pub use config::{ConfigFile, UserConfig};
pub use domain::{
    BatchOutcome, Folder, FolderId, Item, ItemId, ItemStatus, MediaKind, RootStore, TriageConfig,
    TriageEngine, TriageStatistics,
};
pub use error::{NweatError, Result};
