//! Backends module - File system operations
//!
//! Provides:
//! - scan: Matched-file traversal with walkdir

pub mod scan;
