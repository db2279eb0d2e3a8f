//! CLI commands for entrypoint: add, check, config show, config set.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{self, Overrides, Settings};
use crate::confirm::{ConfirmationPort, FixedAnswer, PromptConfirmation};
use crate::diagnostics;
use crate::error;
use crate::locate;
use crate::matcher::{self, MatchOutcome};
use crate::paths::SourceReference;
use crate::report::{Format, SyncReport};
use crate::request::SyncRequest;
use crate::store::{FileStore, TextStore as _};
use crate::sync::{self, SyncOutcome};

/// Where a command looks for the source, its build file, and the settings.
#[derive(Debug, Clone)]
pub struct Target {
    /// Command-line setting overrides.
    pub overrides: Overrides,
    /// Project root holding `.entrypoint.toml` and the fallback build file.
    pub project_root: PathBuf,
    /// Source file to declare.
    pub source: PathBuf,
}

/// A located build file and the request resolved against it.
struct Resolved {
    /// Path of the build file.
    build_file: PathBuf,
    /// The request for this invocation.
    request: SyncRequest,
    /// Effective settings after overrides.
    settings: Settings,
}

/// Declare the source as an executable in its build file, asking before
/// overwriting a conflicting declaration unless `no_input` or the settings
/// say otherwise.
///
/// A synchronization that stops on an error is reported as `failed`: the
/// diagnostic goes to stderr, and in JSON mode a failed report goes to stdout.
///
/// # Errors
///
/// Returns `Error::Io` or `Error::Json` if the report cannot be written.
pub fn add(target: &Target, no_input: bool, format: Format) -> Result<ExitCode, error::Error> {
    let report = match synchronize(target, no_input) {
        Ok(report) => report,
        Err(e) => {
            diagnostics::print_error(&e);
            SyncReport::failed(&e)
        },
    };

    if report.outcome != SyncOutcome::Failed || format == Format::Json {
        report.print(format)?;
    }

    return Ok(match report.outcome {
        SyncOutcome::Declined => ExitCode::from(1),
        SyncOutcome::Failed => ExitCode::from(2),
        SyncOutcome::AlreadyPresent | SyncOutcome::Inserted | SyncOutcome::Overwritten => ExitCode::SUCCESS,
    });
}

/// Report whether the source is declared, without writing anything.
/// Exits 0 when declared with this source, 1 when absent, 3 on a conflict.
///
/// # Errors
///
/// Returns errors from settings loading, build-file lookup, path resolution,
/// or reading the build file.
pub fn check(target: &Target) -> Result<ExitCode, error::Error> {
    let resolved = resolve(target)?;
    let text = std::fs::read_to_string(&resolved.build_file)?;
    let request = &resolved.request;
    let classification = matcher::classify(&text, &request.target_name, &request.relative_path);
    let line = classification.line.map_or(0, |l| return l.saturating_add(1));
    let build_file = resolved.build_file.display();

    return Ok(match classification.outcome {
        MatchOutcome::Absent => {
            println!("absent    {} ({})", request.target_name, request.relative_path);
            ExitCode::from(1)
        },
        MatchOutcome::PresentDifferentSource => {
            println!("conflict  {} ({build_file}:{line})", request.target_name);
            ExitCode::from(3)
        },
        MatchOutcome::PresentSameSource => {
            println!("present   {} ({build_file}:{line})", request.target_name);
            ExitCode::SUCCESS
        },
    });
}

/// Set one setting in `.entrypoint.toml` under the project root.
///
/// # Errors
///
/// Returns errors from validating the setting or editing the file.
pub fn config_set(project_root: &Path, key: &str, value: &str) -> Result<(), error::Error> {
    config::set(project_root, key, value)?;
    eprintln!("Set {key} = {value:?} in {}", config::CONFIG_FILE);
    return Ok(());
}

/// Print the effective settings for the project root.
///
/// # Errors
///
/// Returns errors from loading or serializing the settings.
pub fn config_show(project_root: &Path) -> Result<(), error::Error> {
    let settings = Settings::load(project_root)?;
    print!("{}", settings.to_toml()?);
    return Ok(());
}

/// Load settings, locate the build file, and build the request.
///
/// # Errors
///
/// Returns errors from any of those steps.
fn resolve(target: &Target) -> Result<Resolved, error::Error> {
    let project_root = std::path::absolute(&target.project_root)?;
    let source_path = std::path::absolute(&target.source)?;

    let settings = Settings::load(&project_root)?.apply(&target.overrides);
    let source = SourceReference::new(&source_path)?;
    let build_file = locate::nearest_build_file(&source, &project_root)?;
    let base_dir = build_file.parent().unwrap_or(project_root.as_path());
    let request = SyncRequest::new(&source.path, base_dir, &settings)?;

    return Ok(Resolved {
        build_file,
        request,
        settings,
    });
}

/// Run one synchronization against the target's build file.
///
/// # Errors
///
/// Returns errors from settings loading, build-file lookup, path resolution,
/// or build-file I/O.
fn synchronize(target: &Target, no_input: bool) -> Result<SyncReport, error::Error> {
    let resolved = resolve(target)?;
    let mut store = FileStore::new(resolved.build_file.clone());

    let mut stdin_prompt;
    let mut declined = FixedAnswer(false);
    let port: &mut dyn ConfirmationPort = if no_input {
        &mut declined
    } else {
        stdin_prompt = PromptConfirmation::stdio();
        &mut stdin_prompt
    };

    let outcome = sync::run(
        &mut store,
        port,
        &resolved.request,
        resolved.settings.skip_overwrite_confirmation,
    )?;

    return Ok(SyncReport::new(outcome, &resolved.request, store.location().to_path_buf()));
}
