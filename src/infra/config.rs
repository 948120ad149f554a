use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    cli::{AppContext, InitArgs},
    core::{
        emit::EmitKind,
        extract::ConstantPlacement,
        patterns::Keywords,
    },
};

/// Default input ceiling: 8 MiB
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Inputs larger than this fail with `InputTooLarge`
    pub max_input_bytes: u64,

    /// Emission kinds used when no --kind flag is given
    pub kinds: Vec<EmitKind>,

    /// Constant lines before or after declaration output
    pub constants: ConstantPlacement,

    /// Linkage keywords that open a prototype line
    pub linkage: Vec<String>,

    /// Calling-convention keywords between return type and name
    pub calling_conventions: Vec<String>,
}

impl Default for Config
{
    fn default() -> Self
    {
        let keywords = Keywords::default();

        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            kinds: vec![EmitKind::Declaration, EmitKind::Method, EmitKind::Constant],
            constants: ConstantPlacement::Before,
            linkage: keywords.linkage,
            calling_conventions: keywords.calling_conventions,
        }
    }
}

impl Config
{
    pub fn keywords(&self) -> Keywords
    {
        Keywords {
            linkage: self
                .linkage
                .clone(),
            calling_conventions: self
                .calling_conventions
                .clone(),
        }
    }
}

pub fn load_config() -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["glextract.toml", "glextract.yaml", "glextract.json", ".glextract.toml"];

    for path in &config_paths
    {
        if Path::new(path).exists()
        {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // GLEXTRACT_MAX_INPUT_BYTES=... maps to `max_input_bytes`
    builder = builder.add_source(
        config::Environment::with_prefix("GLEXTRACT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("glextract.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml()
    {
        let text = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(text.contains("max_input_bytes = 8388608"));
        assert!(text.contains(r#"constants = "before""#));

        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults()
    {
        let cfg: Config = toml::from_str("kinds = [\"constant\"]\nlinkage = [\"EGLAPI\"]\n").unwrap();

        assert_eq!(cfg.kinds, vec![EmitKind::Constant]);
        assert_eq!(cfg.keywords().linkage, vec!["EGLAPI".to_string()]);
        assert_eq!(cfg.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }
}
