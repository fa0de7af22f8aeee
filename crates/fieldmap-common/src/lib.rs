//! Fieldmap Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling, logging, and hashing for the fieldmap workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all fieldmap
//! workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Tracing subscriber setup with console/file output
//! - **Hashing**: Deterministic record-key digests
//!
//! # Example
//!
//! ```
//! use fieldmap_common::hash::sha256_hex;
//!
//! let key = sha256_hex(&["Arcadia", "A-1001"]);
//! assert_eq!(key.len(), 64);
//! ```

pub mod error;
pub mod hash;
pub mod logging;

// Re-export commonly used types
pub use error::{FieldmapError, Result};
