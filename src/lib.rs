//! Seedtree - resolve graphs of addressable records into provenance trees
//!
//! A Thing is a self-describing record: a container of references to other
//! Things, or a leaf carrying text, a number or image bytes. References name
//! their target by address, so a graph of Things is never embedded in one
//! document. Seedtree walks those references through a pluggable resolver
//! and assembles a tree rooted at an origin record.
//!
//! # Architecture
//!
//! - [`core`] - Record model, wire format, configuration
//! - [`resolver`] - Address to Thing lookup (file, http, cache, mock)
//! - [`tree`] - Branch/Seed construction and traversal
//! - [`ui`] - Output formatting and tree rendering
//! - [`cli`] - Command-line interface for the `seed` binary
//!
//! # Guarantees
//!
//! 1. Leaf records never grow children
//! 2. Children keep the declared order of their references
//! 3. One unresolvable reference never fails its parent
//! 4. Expansion depth is bounded, so cyclic graphs terminate
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use seedtree::core::thing::{Common, Thing};
//! use seedtree::core::types::Address;
//! use seedtree::resolver::mock::MockResolver;
//! use seedtree::tree::new_seed;
//!
//! # tokio_test::block_on(async {
//! let leaf = Thing::text(Common::at(Address::new("leaf1").unwrap()), "hello");
//! let origin = Thing::decode(
//!     br#"{"address":"root","type":0,"features":[{"order":0,"address":"leaf1","type":1}]}"#,
//! )
//! .unwrap();
//!
//! let seed = new_seed(Arc::new(origin), Arc::new(MockResolver::with_things(vec![leaf])))
//!     .await
//!     .unwrap();
//! assert_eq!(seed.tree().children[0].thing().data_string(), "hello");
//! # });
//! ```

pub mod cli;
pub mod core;
pub mod resolver;
pub mod tree;
pub mod ui;
