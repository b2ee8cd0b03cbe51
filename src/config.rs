use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Name of the config file expected next to the executable
pub const CONFIG_FILE_NAME: &str = "config.txt";

/// Factor used for the dimmed description colour
pub const DIM_FACTOR: f64 = 0.7;

const KEY_API_KEY: &str = "APIKEY";
const KEY_STEAM_ID: &str = "STEAMID";
const KEY_PATH: &str = "PATH";
const KEY_PRIMARY_COLOR: &str = "PRIMARYCOLOR";
const KEY_SECONDARY_COLOR: &str = "SECONDARYCOLOR";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Steam Web API key
    pub api_key: String,

    /// 64-bit Steam account id
    pub steam_id: String,

    /// Library folder holding the `appmanifest_*.acf` files
    pub library_path: PathBuf,

    /// Colour used for titles, e.g. "#FF2A6D"
    pub primary_color: Option<String>,

    /// Colour used for descriptions
    pub secondary_color: Option<String>,
}

impl Config {
    /// Get the configuration file path (beside the running executable)
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let exe = std::env::current_exe().map_err(|source| ConfigError::Io {
            path: PathBuf::from(CONFIG_FILE_NAME),
            source,
        })?;

        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the file beside the executable
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        let config = Self::load_from(&config_path)?;

        info!("Configuration loaded from {}", config_path.display());
        Ok(config)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let entries = read_cfg(path)?;
        Self::from_entries(entries)
    }

    /// Build the typed configuration from raw key/value pairs
    pub fn from_entries(mut entries: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut required = |key: &'static str| {
            entries.remove(key).ok_or(ConfigError::MissingKey(key))
        };

        let api_key = required(KEY_API_KEY)?;
        let steam_id = required(KEY_STEAM_ID)?;
        let library_path = PathBuf::from(required(KEY_PATH)?);

        Ok(Self {
            api_key,
            steam_id,
            library_path,
            primary_color: entries.remove(KEY_PRIMARY_COLOR),
            secondary_color: entries.remove(KEY_SECONDARY_COLOR),
        })
    }

    /// The secondary colour scaled down for unselected descriptions
    pub fn dim_secondary(&self) -> Option<String> {
        self.secondary_color
            .as_deref()
            .and_then(|hex| dim_color(hex, DIM_FACTOR))
    }
}

/// Read `key=value` lines into a map keyed by upper-case names.
///
/// Blank lines and lines starting with `#` are skipped. Keys and values are
/// trimmed; only the first `=` separates them.
pub fn read_cfg(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_cfg(&content)
}

fn parse_cfg(content: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut config = HashMap::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = trimmed.split_once('=').ok_or_else(|| ConfigError::Format {
            line: index + 1,
            content: line.to_string(),
        })?;

        config.insert(key.trim().to_uppercase(), value.trim().to_string());
    }

    Ok(config)
}

/// Scale each channel of a `#RRGGBB` colour by `factor`.
///
/// Returns `None` when `factor` is outside `[0, 1]` or `hex` is not six hex
/// digits (the leading `#` is optional).
pub fn dim_color(hex: &str, factor: f64) -> Option<String> {
    if !(0.0..=1.0).contains(&factor) {
        return None;
    }

    let [r, g, b] = parse_hex_rgb(hex)?;
    let scale = |channel: u8| (f64::from(channel) * factor).floor() as u8;

    Some(format!("#{:02X}{:02X}{:02X}", scale(r), scale(g), scale(b)))
}

/// Parse `#RRGGBB` / `RRGGBB` into its three channels
pub fn parse_hex_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
