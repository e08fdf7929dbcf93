//! tree
//!
//! Materializing a graph of Things into a provenance tree.
//!
//! # Architecture
//!
//! A [`Seed`] pairs an origin Thing with the [`Branch`] grown from it. The
//! [`BranchBuilder`] walks container references depth-first, resolving each
//! through an injected [`Resolver`](crate::resolver::Resolver) and recursing
//! into whatever comes back.
//!
//! # Invariants
//!
//! - Leaf Things never grow children
//! - Children follow the declared `order` of their references (ties keep
//!   declaration order), whether or not siblings are expanded concurrently
//! - A reference that fails to resolve is dropped from `children` and
//!   recorded in the parent's `failures`; siblings are unaffected
//! - Depth is bounded by [`GrowOptions::max_depth`], clamped to
//!   [`MAX_DEPTH_CEILING`], so cyclic address graphs always terminate with
//!   an error rather than exhausting the stack
//! - The root Branch holds the origin itself, never a re-fetched copy

mod branch;
mod seed;
mod walk;

use thiserror::Error;

use crate::core::types::Address;

pub use branch::{Branch, BranchBuilder, BranchFailure, FailureReason};
pub use seed::{new_seed, Seed};
pub use walk::Walk;

/// Default bound on expansion depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest accepted `max_depth`.
///
/// Each level of expansion polls one more nested future, so stack use grows
/// with depth. Larger bounds are rejected by configuration and the CLI, and
/// clamped by [`GrowOptions::depth_limit`].
pub const MAX_DEPTH_CEILING: usize = 128;

/// Raised when expansion would go deeper than the configured bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("recursion limit exceeded: '{address}' would be at depth {depth} (limit {limit})")]
pub struct RecursionLimitError {
    /// Reference that would have been expanded
    pub address: Address,
    /// Depth it would have occupied
    pub depth: usize,
    /// Configured bound
    pub limit: usize,
}

/// What to do when a reference would exceed the depth bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitPolicy {
    /// Abort the whole grow with [`RecursionLimitError`].
    #[default]
    Fail,
    /// Drop the offending subtree and record it on its parent.
    Prune,
}

impl LimitPolicy {
    /// Parse a policy name ("fail" or "prune").
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fail" => Some(LimitPolicy::Fail),
            "prune" => Some(LimitPolicy::Prune),
            _ => None,
        }
    }

    /// Get the policy name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            LimitPolicy::Fail => "fail",
            LimitPolicy::Prune => "prune",
        }
    }
}

impl std::fmt::Display for LimitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Options controlling a grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowOptions {
    /// Deepest level a child may occupy (root is 0)
    pub max_depth: usize,
    /// Behavior when `max_depth` would be exceeded
    pub on_limit: LimitPolicy,
    /// Expand sibling references concurrently
    pub fan_out: bool,
}

impl GrowOptions {
    /// Effective depth bound: `max_depth` clamped to [`MAX_DEPTH_CEILING`].
    pub fn depth_limit(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_CEILING)
    }
}

impl Default for GrowOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            on_limit: LimitPolicy::Fail,
            fan_out: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = GrowOptions::default();
        assert_eq!(options.max_depth, 32);
        assert_eq!(options.on_limit, LimitPolicy::Fail);
        assert!(!options.fan_out);
    }

    #[test]
    fn depth_limit_is_clamped() {
        let mut options = GrowOptions::default();
        assert_eq!(options.depth_limit(), DEFAULT_MAX_DEPTH);

        options.max_depth = MAX_DEPTH_CEILING;
        assert_eq!(options.depth_limit(), MAX_DEPTH_CEILING);

        options.max_depth = 20_000;
        assert_eq!(options.depth_limit(), MAX_DEPTH_CEILING);
    }

    #[test]
    fn limit_policy_parse() {
        assert_eq!(LimitPolicy::parse("fail"), Some(LimitPolicy::Fail));
        assert_eq!(LimitPolicy::parse("Prune"), Some(LimitPolicy::Prune));
        assert_eq!(LimitPolicy::parse("ignore"), None);
        assert_eq!(LimitPolicy::Prune.to_string(), "prune");
    }

    #[test]
    fn recursion_limit_display() {
        let err = RecursionLimitError {
            address: Address::new("a").unwrap(),
            depth: 3,
            limit: 2,
        };
        assert_eq!(
            err.to_string(),
            "recursion limit exceeded: 'a' would be at depth 3 (limit 2)"
        );
    }
}
