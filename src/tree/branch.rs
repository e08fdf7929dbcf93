//! tree::branch
//!
//! Branch nodes and the recursive builder that grows them.
//!
//! # Algorithm
//!
//! Depth-first, pre-order:
//! 1. Wrap the Thing in a Branch with no children.
//! 2. If it is not a container, return it as a leaf.
//! 3. Otherwise take its references in declared order. For each one,
//!    resolve it; on success grow a child Branch from the result, on
//!    failure record a [`BranchFailure`] and move on.
//! 4. Return the Branch.
//!
//! With `fan_out` set, step 3 starts every sibling at once and fans the
//! results back in by position, so completion order never leaks into the
//! tree.

use std::sync::Arc;

use futures_util::future::{join_all, BoxFuture, FutureExt};
use thiserror::Error;

use super::{GrowOptions, LimitPolicy, RecursionLimitError};
use crate::core::thing::{Feature, Thing};
use crate::resolver::{ResolutionError, Resolver};

/// A node of the provenance tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// The Thing at this node
    pub thing: Arc<Thing>,
    /// Expanded references, in declared order
    pub children: Vec<Branch>,
    /// References of this node that produced no child
    pub failures: Vec<BranchFailure>,
}

/// A reference that was dropped while growing its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchFailure {
    pub feature: Feature,
    pub reason: FailureReason,
}

/// Why a reference was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FailureReason {
    #[error(transparent)]
    Unresolved(#[from] ResolutionError),

    #[error(transparent)]
    RecursionLimit(#[from] RecursionLimitError),
}

impl Branch {
    /// A Branch with no children.
    pub fn leaf(thing: Arc<Thing>) -> Self {
        Self {
            thing,
            children: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Get the Thing at this node.
    pub fn thing(&self) -> &Thing {
        &self.thing
    }

    pub fn children(&self) -> &[Branch] {
        &self.children
    }

    pub fn failures(&self) -> &[BranchFailure] {
        &self.failures
    }

    /// Whether this node has no children.
    ///
    /// A container whose references all failed is a leaf too; check
    /// `failures` to tell the two apart.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// JSON view of the tree: each node's record plus its children and
    /// dropped references.
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        let children = self
            .children
            .iter()
            .map(Branch::to_json_value)
            .collect::<Result<Vec<_>, _>>()?;

        let failures: Vec<serde_json::Value> = self
            .failures
            .iter()
            .map(|f| {
                serde_json::json!({
                    "address": f.feature.address,
                    "type": f.feature.thing_type,
                    "order": f.feature.order,
                    "reason": f.reason.to_string(),
                })
            })
            .collect();

        Ok(serde_json::json!({
            "thing": self.thing.to_json_value()?,
            "children": children,
            "failures": failures,
        }))
    }
}

/// Result of expanding one reference.
enum Expansion {
    Child(Branch),
    Dropped(BranchFailure),
}

/// Grows Branches by resolving references through a [`Resolver`].
///
/// # Example
///
/// ```ignore
/// use seedtree::tree::{BranchBuilder, GrowOptions};
///
/// let builder = BranchBuilder::new(resolver, GrowOptions::default());
/// let branch = builder.grow(Arc::new(origin)).await?;
/// for (depth, node) in branch.walk() {
///     println!("{}{}", "  ".repeat(depth), node.thing());
/// }
/// ```
#[derive(Clone)]
pub struct BranchBuilder {
    resolver: Arc<dyn Resolver>,
    options: GrowOptions,
}

impl std::fmt::Debug for BranchBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchBuilder")
            .field("resolver", &self.resolver.name())
            .field("options", &self.options)
            .finish()
    }
}

impl BranchBuilder {
    pub fn new(resolver: Arc<dyn Resolver>, options: GrowOptions) -> Self {
        Self { resolver, options }
    }

    /// Builder with [`GrowOptions::default`].
    pub fn with_defaults(resolver: Arc<dyn Resolver>) -> Self {
        Self::new(resolver, GrowOptions::default())
    }

    pub fn options(&self) -> &GrowOptions {
        &self.options
    }

    /// Grow a Branch rooted at `thing` (depth 0).
    ///
    /// # Errors
    ///
    /// Returns [`RecursionLimitError`] only under [`LimitPolicy::Fail`].
    /// Resolution failures never fail the grow.
    pub async fn grow(&self, thing: Arc<Thing>) -> Result<Branch, RecursionLimitError> {
        self.grow_at(thing, 0).await
    }

    fn grow_at(
        &self,
        thing: Arc<Thing>,
        depth: usize,
    ) -> BoxFuture<'_, Result<Branch, RecursionLimitError>> {
        async move {
            let mut branch = Branch::leaf(Arc::clone(&thing));
            let Some(container) = thing.as_container() else {
                return Ok(branch);
            };

            let features = container.features_in_order();
            tracing::debug!(
                address = %thing.address(),
                depth,
                references = features.len(),
                "growing branch"
            );

            let child_depth = depth + 1;
            let expansions = if self.options.fan_out {
                join_all(
                    features
                        .into_iter()
                        .map(|feature| self.expand(feature, child_depth)),
                )
                .await
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?
            } else {
                let mut expansions = Vec::with_capacity(features.len());
                for feature in features {
                    expansions.push(self.expand(feature, child_depth).await?);
                }
                expansions
            };

            for expansion in expansions {
                match expansion {
                    Expansion::Child(child) => branch.children.push(child),
                    Expansion::Dropped(failure) => branch.failures.push(failure),
                }
            }

            Ok(branch)
        }
        .boxed()
    }

    async fn expand(
        &self,
        feature: &Feature,
        depth: usize,
    ) -> Result<Expansion, RecursionLimitError> {
        let limit = self.options.depth_limit();
        if depth > limit {
            let err = RecursionLimitError {
                address: feature.address.clone(),
                depth,
                limit,
            };
            return match self.options.on_limit {
                LimitPolicy::Fail => Err(err),
                LimitPolicy::Prune => {
                    tracing::warn!(address = %feature.address, depth, "pruning reference: {}", err);
                    Ok(Expansion::Dropped(BranchFailure {
                        feature: feature.clone(),
                        reason: err.into(),
                    }))
                }
            };
        }

        match self
            .resolver
            .resolve(&feature.address, feature.thing_type)
            .await
        {
            Ok(thing) => {
                let child = self.grow_at(Arc::new(thing), depth).await?;
                Ok(Expansion::Child(child))
            }
            Err(err) => {
                tracing::warn!(address = %feature.address, "dropping reference: {}", err);
                Ok(Expansion::Dropped(BranchFailure {
                    feature: feature.clone(),
                    reason: err.into(),
                }))
            }
        }
    }
}
