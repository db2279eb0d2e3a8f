/// Crate-level error types for entrypoint diagnostics.
use std::path::PathBuf;

/// All errors in entrypoint carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, setting, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `.entrypoint.toml` exists but cannot be parsed as an editable document.
    #[error("config parse failed: {}: {reason}", file.display())]
    ConfigParse {
        /// Config file that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// No build-description file was found for the source file.
    #[error("no CMakeLists.txt found (searched: {})", searched.iter().map(|p| return p.display().to_string()).collect::<Vec<_>>().join(", "))]
    ConfigurationMissing {
        /// Every candidate path that was checked, in search order.
        searched: Vec<PathBuf>,
    },

    /// The base directory is not an ancestor of the source file, so no
    /// relative path without parent traversal exists.
    #[error("{} is not inside base directory {}", source_file.display(), base.display())]
    InvalidBasePath {
        /// Directory paths were to be computed against.
        base: PathBuf,
        /// Source file that lies outside `base`.
        source_file: PathBuf,
    },

    /// A setting was given a value of the wrong shape.
    #[error("invalid value `{value}` for setting `{key}`: {reason}")]
    InvalidSettingValue {
        /// Setting name.
        key: String,
        /// Why the value was rejected.
        reason: String,
        /// Raw value supplied by the user.
        value: String,
    },

    /// The source path has no file name component.
    #[error("not a source file: {}", path.display())]
    InvalidSourcePath {
        /// Offending path.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of a report failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// TOML serialization failed.
    #[error("toml serialize: {0}")]
    TomlSer(
        /// The wrapped TOML serialization error.
        #[from]
        toml::ser::Error,
    ),

    /// `config set` was called with a key entrypoint does not know.
    #[error("unknown setting: `{key}`")]
    UnknownSetting {
        /// Setting name that was not recognized.
        key: String,
    },
}
