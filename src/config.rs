use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::workflows::matchers::CustomPattern;

/// Name of the custom pattern file.
pub const PATTERNS_FILE_NAME: &str = "jp_scanner.json";

/// Directory holding `jp_scanner.json` when set.
pub const PATTERNS_DIR_ENV: &str = "JP_SCANNER_PATH";

const CONFIG_DIR_NAME: &str = "jp-scanner";

fn default_extensions() -> Vec<String> {
    vec!["mp4".to_string(), "mkv".to_string()]
}

/// Optional `config.toml` with defaults for the command line tool.
#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    pub patterns_file: Option<PathBuf>,
    #[serde(default)]
    pub standard_patterns: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            patterns_file: None,
            standard_patterns: false,
        }
    }
}

impl Settings {
    /// Loads `config.toml` from the config directory; absent means defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::io(path, e)),
        };

        toml::from_str(&content).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Picks the custom pattern file.
///
/// An explicit path (command line, then settings) is returned as-is. Otherwise
/// `$JP_SCANNER_PATH/jp_scanner.json` and then the config directory are
/// tried, and only an existing file is returned.
pub fn get_patterns_path(explicit: Option<&Path>, settings: &Settings) -> Option<PathBuf> {
    if let Some(path) = explicit.or(settings.patterns_file.as_deref()) {
        return Some(path.to_path_buf());
    }

    env::var_os(PATTERNS_DIR_ENV)
        .map(|dir| PathBuf::from(dir).join(PATTERNS_FILE_NAME))
        .into_iter()
        .chain(std::iter::once(get_config_dir_path().join(PATTERNS_FILE_NAME)))
        .find(|candidate| candidate.is_file())
}

/// Reads a JSON array of regex strings.
///
/// A missing file yields no patterns. Entries that are not strings, are
/// empty, fail to compile or lack the `title`/`episode` groups are skipped
/// individually.
pub fn load_custom_patterns(path: &Path) -> Result<Vec<CustomPattern>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no custom pattern file");
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    let entries: Vec<Value> = serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let patterns: Vec<&str> = entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(pattern) => Some(pattern.as_str()),
            other => {
                warn!("Skipping non-string custom pattern entry {other} in {}", path.display());
                None
            }
        })
        .collect();

    let compiled = CustomPattern::compile_all(patterns);
    debug!(path = %path.display(), count = compiled.len(), "loaded custom patterns");
    Ok(compiled)
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join(CONFIG_DIR_NAME))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_settings_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
