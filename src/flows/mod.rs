//! Flows module - Operations that combine scanning, reading and writing
//!
//! Provides:
//! - bundle: Concatenate matched files into bundle files

pub mod bundle;
