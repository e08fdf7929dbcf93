//! grow command - Grow a provenance tree from an origin record

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{load_config, resolver_settings, runtime};
use crate::cli::args::ResolverArgs;
use crate::cli::Context;
use crate::core::thing::Thing;
use crate::resolver::create_resolver;
use crate::tree::{Branch, BranchBuilder, LimitPolicy, Seed};
use crate::ui::output::{self, plural};
use crate::ui::tree::render_tree;

/// Arguments for the grow command.
#[derive(Debug, Clone)]
pub struct GrowArgs {
    pub origin: PathBuf,
    pub resolver: ResolverArgs,
    pub max_depth: Option<usize>,
    pub prune: bool,
    pub fan_out: bool,
    pub json: bool,
}

/// Grow a tree from the origin file and print it.
pub fn grow(ctx: &Context, args: GrowArgs) -> Result<()> {
    let verbosity = ctx.verbosity();
    let cwd = ctx.working_dir()?;
    let config = load_config(ctx)?;

    let origin_path = cwd.join(&args.origin);
    let bytes = std::fs::read(&origin_path)
        .with_context(|| format!("Failed to read origin '{}'", origin_path.display()))?;
    let origin = Thing::decode(&bytes)
        .with_context(|| format!("Failed to decode origin '{}'", origin_path.display()))?;

    let settings = resolver_settings(&config, &args.resolver, &cwd)?;
    let resolver = create_resolver(&settings).context("Failed to create resolver")?;

    let mut options = config.grow_options();
    if let Some(depth) = args.max_depth {
        options.max_depth = depth;
    }
    if args.prune {
        options.on_limit = LimitPolicy::Prune;
    }
    if args.fan_out {
        options.fan_out = true;
    }

    tracing::debug!(
        origin = %origin.address(),
        resolver = %settings.kind,
        max_depth = options.max_depth,
        on_limit = %options.on_limit,
        fan_out = options.fan_out,
        "starting grow"
    );

    let builder = BranchBuilder::new(resolver, options);
    let seed = runtime()?
        .block_on(Seed::grow(Arc::new(origin), &builder))
        .context("Tree expansion aborted")?;

    let tree = seed.tree();
    if args.json {
        let value = tree.to_json_value().context("Failed to encode tree")?;
        output::emit(serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    output::print(render_tree(tree).trim_end(), verbosity);
    output::print(summary(tree), verbosity);
    Ok(())
}

fn summary(tree: &Branch) -> String {
    let failures = tree.total_failures();
    if failures == 0 {
        format!("{}, depth {}", plural(tree.node_count(), "node"), tree.depth())
    } else {
        format!(
            "{}, depth {}, {} dropped",
            plural(tree.node_count(), "node"),
            tree.depth(),
            plural(failures, "reference")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::thing::{Common, Feature};
    use crate::core::types::Address;
    use crate::resolver::ResolutionError;
    use crate::tree::{BranchFailure, FailureReason};

    #[test]
    fn summary_mentions_failures_only_when_present() {
        let a = Address::new("root").unwrap();
        let mut tree = Branch::leaf(Arc::new(Thing::container(Common::at(a.clone()), vec![])));
        assert_eq!(summary(&tree), "1 node, depth 0");

        tree.failures.push(BranchFailure {
            feature: Feature::new(0, a.clone()),
            reason: FailureReason::Unresolved(ResolutionError::NotFound(a)),
        });
        assert_eq!(summary(&tree), "1 node, depth 0, 1 reference dropped");
    }
}
