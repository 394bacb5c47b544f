//! # Configuration
//!
//! TOML-backed settings for the registry and router, with serde defaults so
//! an empty file (or no file at all) yields a working setup. Adapters embed
//! these sections in their own configuration or load them standalone via
//! [`Config::load`].
//!
//! ```toml
//! [registry]
//! data_key = "covalence"
//!
//! [commands]
//! chat_prefix = "/"
//! console_id = "server_console"
//! console_name = "Server Console"
//!
//! [storage]
//! data_dir = "./data"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration. Every section falls back to its defaults when
/// absent from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Player registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Namespace key the record set is persisted under. One per adapter
    /// instance; two adapters sharing a store must use distinct keys.
    #[serde(default = "default_data_key")]
    pub data_key: String,
}

/// Command router settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Character that marks a chat message as a command.
    #[serde(default = "default_chat_prefix")]
    pub chat_prefix: char,
    /// Id of the console sentinel identity.
    #[serde(default = "default_console_id")]
    pub console_id: String,
    /// Display name of the console sentinel identity.
    #[serde(default = "default_console_name")]
    pub console_name: String,
}

/// Settings for the bundled sled record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_key() -> String {
    "covalence".to_string()
}

fn default_chat_prefix() -> char {
    '/'
}

fn default_console_id() -> String {
    "server_console".to_string()
}

fn default_console_name() -> String {
    "Server Console".to_string()
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_key: default_data_key(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            chat_prefix: default_chat_prefix(),
            console_id: default_console_id(),
            console_name: default_console_name(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Write a config file populated with the defaults.
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(&Config::default())?;
        std::fs::write(path, contents)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }
}
