//! Utility functions for string formatting.

pub mod format;

pub use format::{format_date, format_label, format_percent, truncate_string};
