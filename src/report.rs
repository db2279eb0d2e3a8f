//! User-facing rendering of a synchronization result.

use std::io::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Error;
use crate::request::SyncRequest;
use crate::sync::SyncOutcome;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// A single JSON object on stdout.
    Json,
    /// One human-readable line.
    #[default]
    Text,
}

/// The result of one `add` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Build file that was read (and possibly written).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_file: Option<PathBuf>,
    /// Error message when `outcome` is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// What happened.
    pub outcome: SyncOutcome,
    /// Source path as written into the build file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Executable target name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl SyncReport {
    /// Report for a synchronization that stopped on `error`.
    pub fn failed(error: &Error) -> Self {
        return Self {
            build_file: None,
            error: Some(error.to_string()),
            outcome: SyncOutcome::Failed,
            source: None,
            target: None,
        };
    }

    /// Report for a completed synchronization.
    pub fn new(outcome: SyncOutcome, request: &SyncRequest, build_file: PathBuf) -> Self {
        return Self {
            build_file: Some(build_file),
            error: None,
            outcome,
            source: Some(request.relative_path.clone()),
            target: Some(request.target_name.clone()),
        };
    }

    /// Print the report to stdout in the requested format.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if JSON serialization fails, or `Error::Io` if
    /// stdout cannot be written.
    pub fn print(&self, format: Format) -> Result<(), Error> {
        let line = match format {
            Format::Json => serde_json::to_string(self)?,
            Format::Text => self.message(),
        };
        writeln!(std::io::stdout().lock(), "{line}")?;
        return Ok(());
    }

    /// One-line human-readable summary.
    pub fn message(&self) -> String {
        let target = self.target.as_deref().unwrap_or("?");
        let source = self.source.as_deref().unwrap_or("?");
        return match self.outcome {
            SyncOutcome::AlreadyPresent => format!("add_executable for {source} already exists ({target})."),
            SyncOutcome::Declined => format!("add_executable for {target} left unchanged (overwrite declined)."),
            SyncOutcome::Failed => format!("failed: {}", self.error.as_deref().unwrap_or("unknown error")),
            SyncOutcome::Inserted => format!("add_executable added for {source} ({target})."),
            SyncOutcome::Overwritten => format!("add_executable for {target} overwritten with {source}."),
        };
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::Settings;

    fn report(outcome: SyncOutcome) -> SyncReport {
        let request = SyncRequest::new(Path::new("/p/src/app.cpp"), Path::new("/p"), &Settings::default()).unwrap();
        return SyncReport::new(outcome, &request, PathBuf::from("/p/CMakeLists.txt"));
    }

    #[test]
    fn text_messages_name_target_and_source() {
        assert_eq!(report(SyncOutcome::Inserted).message(), "add_executable added for src/app.cpp (app).");
        assert_eq!(
            report(SyncOutcome::Overwritten).message(),
            "add_executable for app overwritten with src/app.cpp."
        );
    }

    #[test]
    fn json_uses_kebab_case_outcomes() {
        let json = serde_json::to_value(report(SyncOutcome::AlreadyPresent)).unwrap();
        assert_eq!(json["outcome"], "already-present");
        assert_eq!(json["target"], "app");
        assert_eq!(json["source"], "src/app.cpp");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failed_report_carries_error() {
        let err = Error::UnknownSetting { key: "x".to_string() };
        let json = serde_json::to_value(SyncReport::failed(&err)).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["error"], "unknown setting: `x`");
        assert!(json.get("target").is_none());
    }
}
