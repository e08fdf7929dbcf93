//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration for the working directory
//! 2. Applies command-line overrides on top of it
//! 3. Runs the library operation
//! 4. Formats and displays output
//!
//! # Async Commands
//!
//! Resolution is async because backends may do network I/O. Handlers that
//! resolve build a Tokio runtime and `block_on` the async part, so the
//! dispatch layer itself stays synchronous.

mod completion;
mod config_cmd;
mod grow;
mod resolve;
mod show;

pub use completion::completion;
pub use config_cmd::config;
pub use grow::{grow, GrowArgs};
pub use resolve::resolve;
pub use show::show;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context as _, Result};

use super::args::{Command, ResolverArgs};
use super::Context;
use crate::core::config::Config;
use crate::core::types::ThingType;
use crate::resolver::{ResolverKind, ResolverSettings};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Grow {
            origin,
            resolver,
            max_depth,
            prune,
            fan_out,
            json,
        } => grow::grow(
            ctx,
            GrowArgs {
                origin,
                resolver,
                max_depth,
                prune,
                fan_out,
                json,
            },
        ),
        Command::Show {
            file,
            thing_type,
            json,
        } => show::show(ctx, &file, thing_type.as_deref(), json),
        Command::Resolve {
            address,
            thing_type,
            resolver,
            json,
        } => resolve::resolve(ctx, &address, &thing_type, &resolver, json),
        Command::Config => config_cmd::config(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load configuration for the context's working directory.
pub(crate) fn load_config(ctx: &Context) -> Result<Config> {
    let cwd = ctx.working_dir()?;
    Config::load(Some(&cwd)).context("Failed to load configuration")
}

/// Configured resolver settings with command-line overrides applied.
///
/// `--store` selects the file backend and `--endpoint` the http backend,
/// whatever the configuration says. A relative `--store` is taken relative
/// to `cwd`, like the origin file.
pub(crate) fn resolver_settings(
    config: &Config,
    args: &ResolverArgs,
    cwd: &Path,
) -> Result<ResolverSettings> {
    let mut settings = config
        .resolver_settings()
        .context("Invalid resolver configuration")?;

    if let Some(store) = &args.store {
        settings.kind = ResolverKind::File;
        settings.store_dir = cwd.join(store);
    }
    if let Some(endpoint) = &args.endpoint {
        reqwest::Url::parse(endpoint)
            .with_context(|| format!("Invalid endpoint '{}'", endpoint))?;
        settings.kind = ResolverKind::Http;
        settings.endpoint = endpoint.clone();
    }
    if let Some(secs) = args.timeout {
        anyhow::ensure!(secs > 0, "--timeout must be greater than zero");
        settings.timeout = Duration::from_secs(secs);
    }
    if args.no_cache {
        settings.cache = false;
    }

    Ok(settings)
}

/// Parse a `--type` value.
pub(crate) fn parse_type(value: &str) -> Result<ThingType> {
    ThingType::parse(value).with_context(|| format!("Invalid type '{}'", value))
}

/// Runtime for the async part of a command.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
