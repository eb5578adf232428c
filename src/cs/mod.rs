//! CS Documentation sync module
//!
//! This module keeps the `///` documentation of C# source files in sync with a
//! structured XML representation of it.
//!
//! It handles two directions:
//! 1. Extraction: list documentable types, then describe a type's API surface
//!    together with its existing comments
//! 2. Injection: write edited comments back to the exact declarations they
//!    came from, touching nothing else

pub mod catalog;
pub mod config;
pub mod constants;
pub mod doc_record;
pub mod doc_xml;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod injector;
pub mod manager;
pub mod preprocessor;
pub mod priority;
pub mod source_finder;
pub mod symbols;
pub mod type_names;
pub mod xml_text;

// Re-export the main manager
pub use config::SyncConfig;
pub use error::{DocSyncError, SyncResult};
pub use manager::DocsSyncManager;
