//! tree::seed
//!
//! The traversal entry point.

use std::sync::Arc;

use super::branch::{Branch, BranchBuilder};
use super::RecursionLimitError;
use crate::core::thing::Thing;
use crate::resolver::Resolver;

/// An origin Thing paired with the tree grown from it.
///
/// The root Branch holds the same allocation as `origin`; the origin is
/// never fetched again.
#[derive(Debug, Clone)]
pub struct Seed {
    origin: Arc<Thing>,
    tree: Branch,
}

impl Seed {
    /// Grow a Seed from `origin` with the given builder.
    pub async fn grow(
        origin: Arc<Thing>,
        builder: &BranchBuilder,
    ) -> Result<Self, RecursionLimitError> {
        tracing::debug!(origin = %origin.address(), "growing seed");
        let tree = builder.grow(Arc::clone(&origin)).await?;
        Ok(Self { origin, tree })
    }

    pub fn origin(&self) -> &Arc<Thing> {
        &self.origin
    }

    pub fn tree(&self) -> &Branch {
        &self.tree
    }

    /// Consume the Seed, keeping the tree.
    pub fn into_tree(self) -> Branch {
        self.tree
    }
}

/// Grow a Seed with default options.
pub async fn new_seed(
    origin: Arc<Thing>,
    resolver: Arc<dyn Resolver>,
) -> Result<Seed, RecursionLimitError> {
    Seed::grow(origin, &BranchBuilder::with_defaults(resolver)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::thing::{Common, Feature};
    use crate::core::types::{Address, ThingType};
    use crate::resolver::mock::MockResolver;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    #[tokio::test]
    async fn root_is_the_origin() {
        let mock = MockResolver::new();
        let origin = Arc::new(Thing::container(
            Common::at(addr("root")),
            vec![Feature::new(0, addr("missing"))],
        ));

        let seed = new_seed(Arc::clone(&origin), Arc::new(mock.clone()))
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&origin, seed.origin()));
        assert!(Arc::ptr_eq(&origin, &seed.tree().thing));
        // only the reference was looked up, never the root
        assert_eq!(mock.call_count(&addr("root")), 0);
    }

    #[tokio::test]
    async fn leaf_origin() {
        let origin = Arc::new(Thing::number(Common::at(addr("n")), 1.5));
        let seed = new_seed(origin, Arc::new(MockResolver::new())).await.unwrap();

        assert!(seed.tree().is_leaf());
        assert_eq!(seed.into_tree().thing().data_string(), "1.500000");
    }

    #[tokio::test]
    async fn one_text_child() {
        let mock = MockResolver::new().with_thing(Thing::text(Common::at(addr("leaf1")), "hello"));
        let origin = Thing::decode(
            br#"{"address":"root","type":0,"features":[{"order":0,"address":"leaf1","type":1}]}"#,
        )
        .unwrap();

        let seed = new_seed(Arc::new(origin), Arc::new(mock)).await.unwrap();

        assert_eq!(seed.tree().children.len(), 1);
        let child = &seed.tree().children[0];
        assert_eq!(child.thing().thing_type(), ThingType::Text);
        assert_eq!(child.thing().data_string(), "hello");
    }
}
