//! resolve command - Resolve one address through the configured backend

use anyhow::{Context as _, Result};

use super::show::print_thing;
use super::{load_config, parse_type, resolver_settings, runtime};
use crate::cli::args::ResolverArgs;
use crate::cli::Context;
use crate::core::types::Address;
use crate::resolver::create_resolver;

/// Resolve `address` as `thing_type` and print the record.
pub fn resolve(
    ctx: &Context,
    address: &str,
    thing_type: &str,
    resolver_args: &ResolverArgs,
    json: bool,
) -> Result<()> {
    let address = Address::new(address).context("Invalid address")?;
    let expected = parse_type(thing_type)?;

    let cwd = ctx.working_dir()?;
    let config = load_config(ctx)?;
    let settings = resolver_settings(&config, resolver_args, &cwd)?;
    let resolver = create_resolver(&settings).context("Failed to create resolver")?;

    let thing = runtime()?
        .block_on(resolver.resolve(&address, expected))
        .with_context(|| format!("Failed to resolve '{}'", address))?;

    print_thing(&thing, json, ctx)
}
