//! Configuration commands.

use crate::cli::icons::{dim_arrow, warn};
use crate::config::Config;

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<bool> {
    match &config.source_path {
        Some(path) => eprintln!("{} Loaded from {}", dim_arrow(), path.display()),
        None => eprintln!("{} No config file found, using defaults", warn()),
    }
    print!("{}", config.to_toml()?);
    Ok(true)
}
