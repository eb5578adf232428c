//! C# Documentation Sync Library
//!
//! This library extracts the `///` documentation of C# source files into a
//! versioned XML document and writes edited documentation back into the
//! source, preserving everything else.

pub mod cs;
#[cfg(test)]
pub mod test_utils;

pub use cs::{DocSyncError, DocsSyncManager, SyncConfig, SyncResult};
