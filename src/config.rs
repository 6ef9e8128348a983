//! Loading and first-run creation of the YAML configuration file.
//!
//! The configuration is read once at startup and then passed by reference to
//! every step of a run. A missing file is created with [`Config::default`]; a
//! file that lacks some keys is completed with the default values, while a file
//! that is not valid YAML is reported as an error and left untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Settings that drive a single report run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Name printed in the report's author line.
    pub author: String,
    /// Short label used as the PDF document title.
    pub emoji: String,
    /// Template selector, `"my"` for Burmese and `"en"` for English.
    pub language: String,
    /// Whether to chime once the report is written.
    pub sound: bool,
    /// Whether to open the produced file once the run completes.
    pub auto_open_pdf: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: "U Ingar SOE + Grok".to_string(),
            emoji: "Counter Report".to_string(),
            language: "my".to_string(),
            sound: true,
            auto_open_pdf: true,
        }
    }
}

/// Where the configuration used for a run came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// An existing file was read.
    Loaded,
    /// No file existed, so the defaults were written.
    Created,
}

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize configuration")]
    Serialize(#[source] serde_yaml::Error),
    #[error("failed to write config file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Config {
    /// Loads the configuration at `path`, writing the defaults there first if it does not exist.
    pub fn load_or_init(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        if path.exists() {
            let config = Self::load(path)?;
            return Ok((config, ConfigSource::Loaded));
        }

        let config = Self::default();
        config.save(path)?;
        info!("Created default config at {}", path.display());
        Ok((config, ConfigSource::Created))
    }

    /// Reads and parses the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration text, filling absent keys with their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        Ok(raw.into_config())
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::Serialize)
    }

    /// Writes the configuration to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_yaml()?;
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, content).map_err(write_error)
    }
}

/// On-disk shape of the configuration where every key is optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    author: Option<String>,
    emoji: Option<String>,
    language: Option<String>,
    sound: Option<FlagValue>,
    auto_open_pdf: Option<FlagValue>,
}

impl RawConfig {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            author: or_default("author", self.author, defaults.author),
            emoji: or_default("emoji", self.emoji, defaults.emoji),
            language: or_default("language", self.language, defaults.language),
            sound: or_default(
                "sound",
                self.sound.map(FlagValue::enabled),
                defaults.sound,
            ),
            auto_open_pdf: or_default(
                "auto_open_pdf",
                self.auto_open_pdf.map(FlagValue::enabled),
                defaults.auto_open_pdf,
            ),
        }
    }
}

fn or_default<T>(field: &str, value: Option<T>, default: T) -> T {
    value.unwrap_or_else(|| {
        warn!("Config field `{field}` missing; using default value");
        default
    })
}

/// A boolean written either as a YAML boolean or as text such as `"true"` or `yes`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    fn enabled(self) -> bool {
        match self {
            FlagValue::Bool(value) => value,
            FlagValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                "false" | "no" | "off" | "0" | "" => false,
                other => {
                    warn!("Unrecognised flag value `{other}`; treating it as enabled");
                    true
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");

        let (created, source) = Config::load_or_init(&path).expect("init config");
        assert_eq!(source, ConfigSource::Created);
        assert!(path.is_file());

        let (loaded, source) = Config::load_or_init(&path).expect("reload config");
        assert_eq!(source, ConfigSource::Loaded);
        assert_eq!(loaded, created);
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn existing_file_is_used_as_is() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "author: Someone\nemoji: Label\nlanguage: en\nsound: false\nauto_open_pdf: false\n",
        )
        .expect("write config");

        let (config, _) = Config::load_or_init(&path).expect("load config");
        assert_eq!(config.author, "Someone");
        assert_eq!(config.emoji, "Label");
        assert_eq!(config.language, "en");
        assert!(!config.sound);
        assert!(!config.auto_open_pdf);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = Config::from_yaml("author: Only Author\n").expect("parse");
        assert_eq!(config.author, "Only Author");
        assert_eq!(config.language, "my");
        assert!(config.sound);
        assert!(config.auto_open_pdf);
    }

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(Config::from_yaml("  \n").expect("parse"), Config::default());
    }

    #[test]
    fn auto_open_accepts_boolean_like_strings() {
        let on = Config::from_yaml("auto_open_pdf: \"true\"\n").expect("parse");
        assert!(on.auto_open_pdf);

        let off = Config::from_yaml("auto_open_pdf: \"False\"\n").expect("parse");
        assert!(!off.auto_open_pdf);

        let unquoted = Config::from_yaml("auto_open_pdf: no\n").expect("parse");
        assert!(!unquoted.auto_open_pdf);

        let odd = Config::from_yaml("auto_open_pdf: sometimes\n").expect("parse");
        assert!(odd.auto_open_pdf);
    }

    #[test]
    fn sound_accepts_boolean_like_strings() {
        let yes = Config::from_yaml("sound: yes\n").expect("parse");
        assert!(yes.sound);

        let quoted_off = Config::from_yaml("sound: \"false\"\n").expect("parse");
        assert!(!quoted_off.sound);

        let quoted_on = Config::from_yaml("sound: \"true\"\n").expect("parse");
        assert!(quoted_on.sound);

        let plain = Config::from_yaml("sound: false\n").expect("parse");
        assert!(!plain.sound);
    }

    #[test]
    fn malformed_file_is_an_error_and_left_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        let garbage = "author: [unterminated\n";
        fs::write(&path, garbage).expect("write config");

        let err = Config::load_or_init(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read back"), garbage);
    }

    #[test]
    fn wrong_field_type_is_an_error() {
        assert!(Config::from_yaml("sound: [1, 2]\n").is_err());
    }
}
