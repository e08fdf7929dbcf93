//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`tree`] - Text rendering of grown trees
//!
//! # Design
//!
//! All command output goes through this module so quiet mode and JSON mode
//! behave the same way everywhere.

pub mod output;
pub mod tree;
