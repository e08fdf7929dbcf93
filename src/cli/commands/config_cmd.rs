//! config command - Show the effective configuration

use anyhow::Result;

use super::load_config;
use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::output;

/// Print every setting after precedence, then the files it came from.
pub fn config(ctx: &Context) -> Result<()> {
    let config = load_config(ctx)?;
    output::emit(render(&config));
    Ok(())
}

fn render(config: &Config) -> String {
    let source = |path: Option<&std::path::Path>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };

    let lines = [
        format!("resolver.kind = {}", config.resolver_kind()),
        format!("resolver.store_dir = {}", config.store_dir().display()),
        format!("resolver.endpoint = {}", config.endpoint()),
        format!("resolver.timeout_secs = {}", config.timeout().as_secs()),
        format!("resolver.cache = {}", config.cache()),
        format!("tree.max_depth = {}", config.max_depth()),
        format!("tree.on_limit = {}", config.on_limit()),
        format!("tree.fan_out = {}", config.fan_out()),
        String::new(),
        format!("global config: {}", source(config.global_config_loaded_from())),
        format!("project config: {}", source(config.project_config_loaded_from())),
    ];
    lines.join("\n")
}
