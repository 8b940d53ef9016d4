use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILENAME: &str = "lingo-backfill.toml";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub translator: TranslatorSection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CatalogSection {
    /// Canonical language code; the origin of truth for all keys.
    #[serde(default = "default_source_lang")]
    pub source_lang: String,

    /// Key excluded from all coverage accounting.
    #[serde(default = "default_reserved_key")]
    pub reserved_key: String,

    /// Catalog JSON path; relative paths resolve against the config dir.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Language directory JSON path.
    #[serde(default = "default_languages_path")]
    pub languages_path: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TranslatorSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key. The key
    /// itself never lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_source_lang() -> String {
    "ru".to_string()
}

fn default_reserved_key() -> String {
    "welcome".to_string()
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

fn default_languages_path() -> PathBuf {
    PathBuf::from("languages.json")
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            reserved_key: default_reserved_key(),
            catalog_path: default_catalog_path(),
            languages_path: default_languages_path(),
        }
    }
}

impl Default for TranslatorSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TranslatorSection {
    pub fn api_key(&self) -> anyhow::Result<String> {
        std::env::var(&self.api_key_env)
            .map_err(|_| anyhow!("{} not set in the environment", self.api_key_env))
    }
}

pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

pub fn find_default_config() -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, DEFAULT_CONFIG_FILENAME, 8) {
            return Some(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, DEFAULT_CONFIG_FILENAME, 8) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text).context("parse config toml")?;
    Ok(cfg)
}

/// Resolve a config-relative path against the config file's directory.
#[must_use]
pub fn resolve_path(config_path: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(p)
    }
}

const DEFAULT_CONFIG_TEXT: &str = r#"[catalog]
source_lang = "ru"
reserved_key = "welcome"
catalog_path = "catalog.json"
languages_path = "languages.json"

[translator]
endpoint = "https://api.openai.com/v1/chat/completions"
model = "gpt-4o"
api_key_env = "OPENAI_API_KEY"
temperature = 0.2
timeout_secs = 120
"#;

/// Write a starter config file into `dir`, refusing to clobber an existing
/// one unless `force` is set.
pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILENAME);
    if path.exists() && !force {
        return Err(anyhow!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        ));
    }
    std::fs::write(&path, DEFAULT_CONFIG_TEXT)
        .with_context(|| format!("write config: {}", path.display()))?;
    Ok(path)
}
