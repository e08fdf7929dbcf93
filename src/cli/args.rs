//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tree::MAX_DEPTH_CEILING;

/// Seed - resolve graphs of addressable records into provenance trees
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if seed was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Resolver overrides shared by commands that resolve addresses.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ResolverArgs {
    /// Resolve from this record directory (file backend)
    #[arg(long, value_name = "DIR", conflicts_with = "endpoint")]
    pub store: Option<PathBuf>,

    /// Resolve from this endpoint (http backend)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds (http backend)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not memoize lookups, even if configured
    #[arg(long)]
    pub no_cache: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grow a tree from an origin record
    #[command(
        name = "grow",
        long_about = "Grow a provenance tree from an origin record.\n\n\
            Reads the origin record from a file, then resolves every reference of \
            every container depth-first. References that cannot be resolved are \
            dropped from the tree and listed after it.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Grow from a local record store
    seed grow origin.json --store records

    # Grow against a remote endpoint, siblings in parallel
    seed grow origin.json --endpoint http://localhost:3000/api/thing --fan-out

    # Keep going past cycles instead of failing
    seed grow origin.json --max-depth 8 --prune

    # Machine-readable output
    seed grow origin.json --json"
    )]
    Grow {
        /// Origin record file
        origin: PathBuf,

        #[command(flatten)]
        resolver: ResolverArgs,

        /// Deepest level a reference may be expanded to (1 to 128)
        #[arg(long, value_name = "N", value_parser = parse_max_depth)]
        max_depth: Option<usize>,

        /// Drop subtrees past the depth limit instead of failing
        #[arg(long)]
        prune: bool,

        /// Expand sibling references concurrently
        #[arg(long)]
        fan_out: bool,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode and print a single record file
    #[command(name = "show")]
    Show {
        /// Record file
        file: PathBuf,

        /// Decode as this type (name or code)
        #[arg(long = "type", value_name = "TYPE")]
        thing_type: Option<String>,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve one address and print the record
    #[command(name = "resolve")]
    Resolve {
        /// Address to resolve
        address: String,

        /// Expected type (name or code)
        #[arg(long = "type", value_name = "TYPE", default_value = "container")]
        thing_type: String,

        #[command(flatten)]
        resolver: ResolverArgs,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    #[command(
        name = "config",
        long_about = "Show the effective configuration.\n\n\
            Prints every setting after applying defaults, the global config file \
            and the project config file (.seed/config.toml), and names the files \
            that were loaded."
    )]
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    seed completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    seed completion zsh >> ~/.zshrc

    # Fish
    seed completion fish > ~/.config/fish/completions/seed.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

fn parse_max_depth(value: &str) -> Result<usize, String> {
    let depth: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if depth == 0 || depth > MAX_DEPTH_CEILING {
        return Err(format!("must be between 1 and {}", MAX_DEPTH_CEILING));
    }
    Ok(depth)
}
