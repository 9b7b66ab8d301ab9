//! Configuration commands.

use crate::config::{APIKEY_SETTING, CredentialStore, Settings};

/// Store the Apiseeds API key
pub fn cmd_set_key(settings: &Settings, key: &str) -> anyhow::Result<()> {
    if key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    settings.set(APIKEY_SETTING, key.trim())?;
    match settings.path() {
        Some(path) => println!("✓ API key saved to {}", path.display()),
        None => println!("⚠ No config directory available; key not saved"),
    }
    Ok(())
}

/// Show the effective configuration
pub fn cmd_config_show(settings: &Settings, key_overridden: bool) -> anyhow::Result<()> {
    let config = settings.config();

    match settings.path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none)"),
    }
    println!();

    let key_status = match (settings.get(APIKEY_SETTING).is_some(), key_overridden) {
        (_, true) => "overridden for this run",
        (true, false) => "set",
        (false, false) => "not set",
    };
    println!("API key:      {}", key_status);
    println!("Host:         {}", config.service.host);
    println!("Port:         {}", config.service.port);
    println!(
        "Rate limit:   {} requests/minute ({} ms spacing)",
        config.service.requests_per_minute,
        config.service.min_delay().as_millis()
    );
    Ok(())
}

/// Print the config file location
pub fn cmd_config_path(settings: &Settings) -> anyhow::Result<()> {
    let path = settings
        .path()
        .ok_or(crate::config::ConfigError::NoConfigDir)?;
    println!("{}", path.display());
    Ok(())
}
