//! tree::walk
//!
//! Depth-first traversal over a grown tree.
//!
//! Every helper here visits a node before its children and children in
//! their stored order. Nothing is reordered or filtered.

use super::branch::Branch;
use crate::core::thing::Thing;
use crate::core::types::Address;

/// Pre-order iterator over a Branch and its descendants.
///
/// Yields `(depth, branch)` with the starting Branch at depth 0.
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Branch)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Branch);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, branch) = self.stack.pop()?;
        // Reverse so the first child is popped next
        self.stack
            .extend(branch.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, branch))
    }
}

impl Branch {
    /// Walk this Branch depth-first, pre-order.
    ///
    /// # Example
    ///
    /// ```ignore
    /// for (depth, node) in seed.tree().walk() {
    ///     println!("{}{}", "  ".repeat(depth), node.thing().data_string());
    /// }
    /// ```
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Every Thing in the tree, pre-order.
    pub fn flatten(&self) -> Vec<&Thing> {
        self.walk().map(|(_, b)| b.thing()).collect()
    }

    /// Every address in the tree, pre-order. Repeats are kept.
    pub fn addresses(&self) -> Vec<&Address> {
        self.walk().map(|(_, b)| b.thing().address()).collect()
    }

    /// Number of nodes, this one included.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Dropped references across the whole tree.
    pub fn total_failures(&self) -> usize {
        self.walk().map(|(_, b)| b.failures.len()).sum()
    }

    /// Deepest level reached, 0 for a lone node.
    pub fn depth(&self) -> usize {
        self.walk().map(|(d, _)| d).max().unwrap_or(0)
    }
}
