//! core
//!
//! Core domain types, the record format, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Address, ThingType
//! - [`thing`] - The polymorphic Thing record and its wire codec
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at construction time
//! - Records are self-describing and immutable once decoded
//! - Decoding is pure and deterministic

pub mod config;
pub mod thing;
pub mod types;
