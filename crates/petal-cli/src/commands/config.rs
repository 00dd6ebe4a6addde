//! Print a flower configuration

use anyhow::{bail, Context, Result};
use petal_flowers::{FlowerConfig, Preset};

/// Load a configuration file, or the defaults when no path is given
pub fn load(path: Option<&str>) -> Result<FlowerConfig> {
    match path {
        Some(path) => FlowerConfig::load(path)
            .with_context(|| format!("Failed to load configuration from '{}'", path)),
        None => Ok(FlowerConfig::default()),
    }
}

pub fn run(file: Option<String>, preset: Option<String>, param: Option<String>) -> Result<()> {
    let mut config = load(file.as_deref())?;
    if let Some(name) = preset {
        let preset: Preset = name.parse().context("Invalid preset")?;
        config.apply_preset(preset);
    }

    if let Some(name) = param {
        let Some(value) = config.get(&name) else {
            bail!("Unknown parameter '{}'", name);
        };
        println!("{}", value);
        return Ok(());
    }

    let toml = config
        .to_toml_string()
        .context("Failed to serialize configuration")?;
    print!("{}", toml);
    Ok(())
}
