//! Configuration resolution
//!
//! Priority order, highest wins: command-line argument, environment
//! variable (via clap's env support), TOML config file, compiled default.
//! A missing or unreadable default config file never stops startup; an
//! explicitly named one does.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use oar_core::rubric::RubricSchema;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::presets;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_RUBRIC: &str = "quality";
/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_PATH: &str = "oar.toml";

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "oar-ui")]
#[command(about = "Single-operator annotation review UI")]
#[command(version)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "OAR_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "OAR_PORT")]
    pub port: Option<u16>,

    /// Built-in rubric preset: quality, graded, or pairwise
    #[arg(long, env = "OAR_RUBRIC")]
    pub rubric: Option<String>,

    /// TOML file describing a custom rubric (takes precedence over --rubric)
    #[arg(long, env = "OAR_RUBRIC_FILE")]
    pub rubric_file: Option<PathBuf>,

    /// TOML config file (default: ./oar.toml when present)
    #[arg(long, env = "OAR_CONFIG")]
    pub config: Option<PathBuf>,
}

/// On-disk config file shape; every field optional
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rubric: Option<String>,
    pub rubric_file: Option<PathBuf>,
}

impl TomlConfig {
    /// Load an explicitly named config file. Errors are fatal here since
    /// the operator asked for this exact file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load the default config file when present. Missing file is normal;
    /// an unreadable or invalid one degrades to defaults with a warning.
    pub fn load_default() -> Self {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            debug!("no {} in working directory, using defaults", DEFAULT_CONFIG_PATH);
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("ignoring {}: {:#}", DEFAULT_CONFIG_PATH, e);
                Self::default()
            }
        }
    }
}

/// Where the session's rubric schema comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubricSource {
    Preset(String),
    File(PathBuf),
}

impl RubricSource {
    /// Materialize and validate the schema.
    pub fn load(&self) -> Result<RubricSchema> {
        let schema = match self {
            RubricSource::Preset(name) => presets::by_name(name).ok_or_else(|| {
                anyhow!(
                    "unknown rubric preset '{}' (available: {})",
                    name,
                    presets::PRESET_NAMES.join(", ")
                )
            })?,
            RubricSource::File(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read rubric file {}", path.display()))?;
                toml::from_str::<RubricSchema>(&text)
                    .with_context(|| format!("failed to parse rubric file {}", path.display()))?
            }
        };
        schema.validate().context("rubric schema rejected")?;
        Ok(schema)
    }
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rubric: RubricSource,
}

impl Config {
    /// Merge the resolution tiers. Within one tier a rubric file beats a
    /// preset name; across tiers the arguments (CLI or env) beat the TOML
    /// file, which beats the compiled defaults.
    pub fn resolve(args: &Args) -> Result<Self> {
        let file_cfg = match &args.config {
            Some(path) => TomlConfig::load(path)?,
            None => TomlConfig::load_default(),
        };

        let host = args
            .host
            .clone()
            .or(file_cfg.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = args.port.or(file_cfg.port).unwrap_or(DEFAULT_PORT);

        let rubric = if let Some(path) = &args.rubric_file {
            RubricSource::File(path.clone())
        } else if let Some(name) = &args.rubric {
            RubricSource::Preset(name.clone())
        } else if let Some(path) = file_cfg.rubric_file {
            RubricSource::File(path)
        } else if let Some(name) = file_cfg.rubric {
            RubricSource::Preset(name)
        } else {
            RubricSource::Preset(DEFAULT_RUBRIC.to_string())
        };

        Ok(Config { host, port, rubric })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
