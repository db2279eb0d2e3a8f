//! Project settings loaded from `.entrypoint.toml`, plus format-preserving edits.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::template::FILENAME_TOKEN;

/// Name of the settings file at the project root.
pub const CONFIG_FILE: &str = ".entrypoint.toml";

/// Setting names accepted by `config set`, in display order.
pub const SETTING_KEYS: [&str; 3] = [
    "executable_name",
    "runtime_output_directory",
    "skip_overwrite_confirmation",
];

/// Per-invocation values from the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces `executable_name` when set.
    pub executable_name: Option<String>,
    /// Replaces `runtime_output_directory` when set.
    pub runtime_output_directory: Option<String>,
    /// Forces `skip_overwrite_confirmation` on when true.
    pub skip_overwrite_confirmation: bool,
}

/// How new declarations are named and where their binaries go.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Template for the target name; `%FILENAME%` is the source base name.
    pub executable_name: String,
    /// Template for `RUNTIME_OUTPUT_DIRECTORY`; empty omits the properties line.
    pub runtime_output_directory: String,
    /// Overwrite conflicting declarations without asking.
    pub skip_overwrite_confirmation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        return Self {
            executable_name: FILENAME_TOKEN.to_string(),
            runtime_output_directory: String::new(),
            skip_overwrite_confirmation: false,
        };
    }
}

impl Settings {
    /// Apply command-line overrides on top of the loaded settings.
    #[must_use]
    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(name) = &overrides.executable_name {
            self.executable_name.clone_from(name);
        }
        if let Some(dir) = &overrides.runtime_output_directory {
            self.runtime_output_directory.clone_from(dir);
        }
        if overrides.skip_overwrite_confirmation {
            self.skip_overwrite_confirmation = true;
        }
        return self;
    }

    /// Load settings from `.entrypoint.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed, never silently falling back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        let settings: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        return Ok(settings);
    }

    /// Render the effective settings as TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlSer` if serialization fails.
    pub fn to_toml(&self) -> Result<String, Error> {
        return Ok(toml::to_string_pretty(self)?);
    }
}

/// Parse `.entrypoint.toml` into a format-preserving document.
/// Returns an empty document if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::ConfigParse` on parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, toml_edit::DocumentMut), Error> {
    let config_path = root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::Io(e)),
        Ok(c) => c,
    };

    let doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        return Error::ConfigParse {
            file: config_path.clone(),
            reason: e.to_string(),
        };
    })?;

    return Ok((config_path, doc));
}

/// Set one setting in `.entrypoint.toml`, keeping comments and layout intact.
/// Creates the file if it doesn't exist.
///
/// # Errors
///
/// Returns `Error::UnknownSetting` for an unrecognized key,
/// `Error::InvalidSettingValue` for a value of the wrong shape,
/// `Error::ConfigParse` if the file can't be parsed, or `Error::Io` if writing fails.
pub fn set(root: &Path, key: &str, value: &str) -> Result<(), Error> {
    let item = setting_value(key, value)?;
    let (config_path, mut doc) = read_config_doc(root)?;

    doc[key] = item;

    std::fs::write(&config_path, doc.to_string())?;
    tracing::info!(key, value, path = %config_path.display(), "updated setting");
    return Ok(());
}

/// Validate a raw command-line value and convert it to a TOML item.
///
/// # Errors
///
/// Returns `Error::UnknownSetting` or `Error::InvalidSettingValue`.
fn setting_value(key: &str, value: &str) -> Result<toml_edit::Item, Error> {
    let invalid = |reason: &str| {
        return Error::InvalidSettingValue {
            key: key.to_string(),
            reason: reason.to_string(),
            value: value.to_string(),
        };
    };

    return match key {
        "executable_name" => {
            if value.trim().is_empty() {
                return Err(invalid("executable name template must not be empty"));
            }
            Ok(toml_edit::value(value))
        },
        "runtime_output_directory" => Ok(toml_edit::value(value)),
        "skip_overwrite_confirmation" => match value {
            "false" => Ok(toml_edit::value(false)),
            "true" => Ok(toml_edit::value(true)),
            _ => Err(invalid("expected `true` or `false`")),
        },
        _ => Err(Error::UnknownSetting { key: key.to_string() }),
    };
}
