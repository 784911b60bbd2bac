//! Shared utilities for the SIH crates.
//!
//! Raw SIH/SUS cells arrive as text; these helpers centralize the numeric
//! parsing and formatting rules used across ingestion and normalization.

pub mod text;

pub use text::{format_numeric, is_blank, parse_f64, parse_i64, strip_digits};
