//! I/O module
//!
//! Handles the pipe-delimited store files.
//!
//! # Components
//!
//! - `record_format` - Row layouts and row <-> domain conversions
//! - `record_store` - Load, atomic rewrite and append primitives
//! - `seed` - Explicit initialization of missing store files

pub mod record_format;
pub mod record_store;
pub mod seed;

pub use record_format::{ensure_field, ensure_non_empty_field, parse_decimal, Record};
pub use record_store::WriteLock;
pub use seed::{initialize_store, SeedReport};
