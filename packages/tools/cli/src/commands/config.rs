//! 설정 명령어

use serde_json::json;

use crate::commands::print_json;
use crate::config::CliConfig;
use crate::OutputFormat;

pub fn set(bridge_url: Option<String>, issuer_key: Option<String>) -> anyhow::Result<()> {
    let mut config = CliConfig::load().unwrap_or_default();

    if let Some(url) = bridge_url {
        config.bridge_url = Some(url);
    }
    if let Some(key) = issuer_key {
        config.issuer_key = Some(key);
    }

    config.save()?;
    println!("Config updated.");
    show(OutputFormat::Text)
}

pub fn show(format: OutputFormat) -> anyhow::Result<()> {
    let config = CliConfig::load().unwrap_or_default();
    let issuer_key = if config.issuer_key.is_some() { "(set)" } else { "(not set)" };

    match format {
        OutputFormat::Json => print_json(&json!({
            "bridge_url": config.bridge_url,
            "issuer_key_set": config.issuer_key.is_some(),
        })),
        OutputFormat::Text => {
            println!("Current config (~/.hwp/config.json):");
            println!("  bridge_url: {}", config.bridge_url.as_deref().unwrap_or("(not set)"));
            println!("  issuer_key: {}", issuer_key);
            Ok(())
        }
    }
}

pub fn clear() -> anyhow::Result<()> {
    CliConfig::clear()?;
    println!("Config cleared.");
    Ok(())
}
