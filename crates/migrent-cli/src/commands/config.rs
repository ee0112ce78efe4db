//! `migrent config` subcommands.

use anyhow::Result;
use migrent_core::MigrentConfig;

const REDACTED: &str = "<redacted>";

/// Report whether the configuration loaded and validated.
pub fn validate(loaded: Result<MigrentConfig>) -> Result<()> {
    let config = loaded?;
    println!("✔ Configuration is valid");
    println!("  Data source: {}", config.data_source.as_str());
    println!("  Dashboard:   http://{}{}", config.dashboard.bind_addr(), config.dashboard.base_path);
    println!("  Gate role:   {}", config.access.required_role);
    Ok(())
}

/// Print the effective configuration as YAML, secrets redacted.
pub fn show(config: &MigrentConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &MigrentConfig) -> Result<String> {
    let mut shown = config.clone();
    if shown.backend.anon_key.is_some() {
        shown.backend.anon_key = Some(REDACTED.to_string());
    }
    Ok(serde_yaml::to_string(&shown)?)
}
