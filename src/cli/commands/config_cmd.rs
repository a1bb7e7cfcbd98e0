//! Configuration commands.

use console::style;

use crate::config::Config;
use crate::llm::API_KEY_VARS;

/// Print the effective configuration. The API key is only reported as set or unset.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());

    eprintln!("{} Source: {}", style("→").dim(), source);
    let key = if config.llm.resolve_api_key().is_some() {
        style("set".to_string()).green()
    } else {
        style(format!("unset (export {})", API_KEY_VARS[0])).yellow()
    };
    eprintln!("{} API key: {}", style("→").dim(), key);

    print!("{}", config.to_toml());
    Ok(())
}
