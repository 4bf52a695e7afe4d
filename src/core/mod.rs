//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Bundle jobs, filters and reports
//! - Job configuration loading
//! - Error types
//! - Rendering of reports and listings
//! - Path normalization utilities
//! - Text reading with an explicit encoding policy

pub mod config;
pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
