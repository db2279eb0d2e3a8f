//! The immutable description of one synchronization, computed once up front.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::Error;
use crate::paths::{self, SourceReference};
use crate::template::TemplateContext;

/// Everything the matcher and synthesizer need, resolved from the source
/// path, the base directory, and the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Directory the source path is relative to (holds the build file).
    pub base_dir: PathBuf,
    /// Resolved `RUNTIME_OUTPUT_DIRECTORY`, or `None` to omit the properties line.
    pub output_dir: Option<String>,
    /// Source path relative to `base_dir`, forward slashes.
    pub relative_path: String,
    /// The source file itself.
    pub source: SourceReference,
    /// Resolved executable target name.
    pub target_name: String,
}

impl SyncRequest {
    /// Resolve paths and templates for `source_file` against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSourcePath` if the path names no file,
    /// `Error::InvalidBasePath` if `base_dir` is not an ancestor of it,
    /// or `Error::InvalidSettingValue` if the name template resolves to
    /// something that cannot be a CMake target name.
    pub fn new(source_file: &Path, base_dir: &Path, settings: &Settings) -> Result<Self, Error> {
        let source = SourceReference::new(source_file)?;
        let relative_path = paths::relative_source_path(base_dir, &source.path)?;
        let relative_dir = paths::relative_source_dir(base_dir, &source.path)?;
        let context = TemplateContext::new(&source.base_name, &relative_dir);

        let target_name = context.resolve(&settings.executable_name);
        validate_target_name(&settings.executable_name, &target_name)?;

        let output_dir = Some(context.resolve(&settings.runtime_output_directory))
            .filter(|dir| return !dir.is_empty());

        tracing::debug!(
            file_name = %source.file_name,
            %target_name,
            %relative_path,
            output_dir = output_dir.as_deref().unwrap_or(""),
            "resolved request"
        );

        return Ok(Self {
            base_dir: base_dir.to_path_buf(),
            output_dir,
            relative_path,
            source,
            target_name,
        });
    }
}

/// A target name must be one non-empty CMake argument without quoting.
///
/// # Errors
///
/// Returns `Error::InvalidSettingValue` naming the template that produced `name`.
fn validate_target_name(template: &str, name: &str) -> Result<(), Error> {
    let reason = if name.is_empty() {
        "resolves to an empty target name"
    } else if name.contains(|c: char| return c.is_whitespace() || matches!(c, '(' | ')' | '"')) {
        "target name may not contain whitespace, parentheses, or quotes"
    } else {
        return Ok(());
    };

    return Err(Error::InvalidSettingValue {
        key: "executable_name".to_string(),
        reason: reason.to_string(),
        value: template.to_string(),
    });
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    fn settings(name: &str, output: &str) -> Settings {
        return Settings {
            executable_name: name.to_string(),
            runtime_output_directory: output.to_string(),
            skip_overwrite_confirmation: false,
        };
    }

    #[test]
    fn default_settings_use_base_name() {
        let req = SyncRequest::new(Path::new("/proj/src/app.cpp"), Path::new("/proj"), &Settings::default()).unwrap();
        assert_eq!(req.target_name, "app");
        assert_eq!(req.relative_path, "src/app.cpp");
        assert_eq!(req.output_dir, None);
        assert_eq!(req.source.file_name, "app.cpp");
    }

    #[test]
    fn templates_are_resolved() {
        let req = SyncRequest::new(
            Path::new("/proj/tools/gen.cc"),
            Path::new("/proj"),
            &settings("%FILENAME%_tool", "%FILE_DIR%/bin"),
        )
        .unwrap();
        assert_eq!(req.target_name, "gen_tool");
        assert_eq!(req.output_dir.as_deref(), Some("${CMAKE_CURRENT_SOURCE_DIR}/tools/bin"));
    }

    #[test]
    fn project_dir_template() {
        let req =
            SyncRequest::new(Path::new("/proj/a.c"), Path::new("/proj"), &settings("%FILENAME%", "%PROJECT_DIR%/out"))
                .unwrap();
        assert_eq!(req.output_dir.as_deref(), Some("${PROJECT_SOURCE_DIR}/out"));
    }

    #[test]
    fn outside_base_is_rejected() {
        let err = SyncRequest::new(Path::new("/other/a.c"), Path::new("/proj"), &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidBasePath { .. }));
    }

    #[test]
    fn unusable_target_names_are_rejected() {
        let err = SyncRequest::new(Path::new("/proj/my app.c"), Path::new("/proj"), &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidSettingValue { .. }));
        let err = SyncRequest::new(Path::new("/proj/.hidden"), Path::new("/proj"), &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidSettingValue { .. }));
    }
}
