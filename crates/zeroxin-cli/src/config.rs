use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zeroxin_gemini::{GeminiConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_API_BASE, DEFAULT_IMAGE_MODEL};

/// Optional `config.toml` contents. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    api_base: Option<String>,
    analysis_model: Option<String>,
    image_model: Option<String>,
    output_dir: Option<PathBuf>,
}

/// CLI configuration: config file first, `ZEROXIN_*` environment on top.
#[derive(Debug, Serialize)]
pub struct Config {
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Generative Language API base URL.
    pub api_base: String,
    /// Model for structured face analysis.
    pub analysis_model: String,
    /// Model for hairstyle image edits.
    pub image_model: String,
    /// Where `save` writes the result image.
    pub output_dir: PathBuf,
    /// Config file that was read, if any.
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Load the config file (if present) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let path = config_path(env);

        let file = match &path {
            Some(p) if p.exists() => read_file(p)?,
            _ => FileConfig::default(),
        };
        let source = path.filter(|p| p.exists());
        Ok(Self::resolve(file, source, env))
    }

    fn resolve(
        file: FileConfig,
        config_file: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_key = env("ZEROXIN_API_KEY")
            .or_else(|| env("GEMINI_API_KEY"))
            .or_else(|| env("API_KEY"))
            .or(file.api_key);

        Self {
            api_key,
            api_base: env("ZEROXIN_API_BASE")
                .or(file.api_base)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            analysis_model: env("ZEROXIN_ANALYSIS_MODEL")
                .or(file.analysis_model)
                .unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.to_string()),
            image_model: env("ZEROXIN_IMAGE_MODEL")
                .or(file.image_model)
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            output_dir: env("ZEROXIN_OUTPUT_DIR")
                .map(PathBuf::from)
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            config_file,
        }
    }

    /// Backend settings. Fails when no API key is configured.
    pub fn gemini(&self) -> Result<GeminiConfig> {
        let api_key = self
            .api_key
            .clone()
            .context("no API key: set GEMINI_API_KEY or api_key in config.toml")?;
        Ok(GeminiConfig {
            api_key,
            api_base: self.api_base.clone(),
            analysis_model: self.analysis_model.clone(),
            image_model: self.image_model.clone(),
        })
    }
}

/// `$ZEROXIN_CONFIG`, else `$XDG_CONFIG_HOME/zeroxin/config.toml`,
/// else `~/.config/zeroxin/config.toml`.
fn config_path(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(path) = env("ZEROXIN_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let config_home = env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("zeroxin").join("config.toml"))
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
