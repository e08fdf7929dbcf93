//! show command - Decode and print a single record file

use std::path::Path;

use anyhow::{Context as _, Result};

use super::parse_type;
use crate::cli::Context;
use crate::core::thing::Thing;
use crate::ui::output;

/// Decode a record file and print it.
///
/// With `thing_type`, the record must decode as that variant.
pub fn show(ctx: &Context, file: &Path, thing_type: Option<&str>, json: bool) -> Result<()> {
    let path = ctx.working_dir()?.join(file);
    let bytes =
        std::fs::read(&path).with_context(|| format!("Failed to read '{}'", path.display()))?;

    let thing = match thing_type {
        Some(t) => Thing::decode_as(parse_type(t)?, &bytes),
        None => Thing::decode(&bytes),
    }
    .with_context(|| format!("Failed to decode '{}'", path.display()))?;

    print_thing(&thing, json, ctx)
}

/// Print a record as a one-line summary plus references, or as JSON.
pub(crate) fn print_thing(thing: &Thing, json: bool, ctx: &Context) -> Result<()> {
    if json {
        output::emit(thing.to_json_pretty().context("Failed to encode record")?);
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    output::print(thing, verbosity);

    if let Some(container) = thing.as_container() {
        let lines: Vec<String> = container
            .features_in_order()
            .into_iter()
            .map(|f| match &f.title {
                Some(title) => format!("[{}] {} ({}) \"{}\"", f.order, f.address, f.thing_type, title),
                None => format!("[{}] {} ({})", f.order, f.address, f.thing_type),
            })
            .collect();
        if !lines.is_empty() {
            output::print(output::format_list(&lines, "  "), verbosity);
        }
    }

    Ok(())
}
