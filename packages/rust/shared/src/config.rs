//! Application configuration for postfeed.
//!
//! User config lives at `~/.postfeed/postfeed.toml`.
//! Environment variables override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PostfeedError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "postfeed.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".postfeed";

/// Env var overriding `notion.parent_page_id`.
pub const PARENT_PAGE_ID_ENV: &str = "PARENT_PAGE_ID";

/// Env var overriding `notion.database_id`.
pub const DATABASE_ID_ENV: &str = "DATABASE_ID";

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// Default `Notion-Version` header value.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

// ---------------------------------------------------------------------------
// Config structs (matching postfeed.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Document service connection settings.
    #[serde(default)]
    pub notion: NotionConfig,

    /// Fetch behaviour.
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// `[notion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Name of the env var holding the integration token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Page whose title is the site title.
    #[serde(default)]
    pub parent_page_id: String,

    /// Database holding the post rows.
    #[serde(default)]
    pub database_id: String,

    /// API root, including the version path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent in the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    /// Request timeout. Unset leaves the transport default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            parent_page_id: String::new(),
            database_id: String::new(),
            base_url: default_base_url(),
            notion_version: default_notion_version(),
            timeout_secs: None,
        }
    }
}

fn default_token_env() -> String {
    "NOTION_TOKEN".into()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_notion_version() -> String {
    DEFAULT_NOTION_VERSION.into()
}

/// `[fetch]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Follow `next_cursor` on paginated list endpoints.
    #[serde(default)]
    pub follow_cursors: bool,

    /// What to do with a database row that fails extraction.
    #[serde(default)]
    pub row_policy: RowPolicy,
}

/// Handling of database rows that fail extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Fail the whole query.
    #[default]
    Abort,
    /// Log and drop the row.
    Skip,
}

impl AppConfig {
    /// Apply `PARENT_PAGE_ID` / `DATABASE_ID` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to resolve variable names.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(PARENT_PAGE_ID_ENV) {
            self.notion.parent_page_id = id;
        }
        if let Some(id) = lookup(DATABASE_ID_ENV) {
            self.notion.database_id = id;
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.postfeed/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PostfeedError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.postfeed/postfeed.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PostfeedError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PostfeedError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PostfeedError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PostfeedError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PostfeedError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the integration token from the env var named in the config.
pub fn resolve_token(config: &AppConfig) -> Result<String> {
    let var_name = &config.notion.token_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(PostfeedError::config(format!(
            "Notion token not found. Set the {var_name} environment variable.\n\
             Create an integration at https://www.notion.so/my-integrations"
        ))),
    }
}
