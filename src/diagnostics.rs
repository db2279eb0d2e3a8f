use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_FILE, SETTING_KEYS};
use crate::error::Error;
use crate::locate::BUILD_FILE_NAME;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::ConfigurationMissing { searched } => render_configuration_missing(searched),
        Error::InvalidBasePath { base, source_file } => render_invalid_base_path(base, source_file),
        Error::InvalidSettingValue { key, value, reason } => render_invalid_setting_value(key, value, reason),
        Error::UnknownSetting { key } => render_unknown_setting(key),
        _ => render_generic(e),
    }
}

fn render_configuration_missing(searched: &[PathBuf]) -> String {
    let mut out = format!("\
# Error: No Build File

No `{BUILD_FILE_NAME}` was found for this source file.

## Searched

");
    for path in searched {
        let _ = writeln!(out, "- `{}`", path.display());
    }

    out.push_str("\
\n## Fix

Create a build file next to the source or at the project root, or pass
`--project-root` pointing at the directory that has one.
");
    out
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::ConfigParse { file, reason } => format!("\
# Error: Config Parse Failed

Could not parse `{}`: {reason}
", file.display()),

        Error::InvalidSourcePath { path } => format!("\
# Error: Not A Source File

`{}` does not name a file.
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid Settings

{e}

## Fix

Check `{CONFIG_FILE}`. Known settings: {}.
", SETTING_KEYS.join(", ")),

        Error::TomlSer(e) => format!("\
# Error: TOML Serialization

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_invalid_base_path(base: &Path, source_file: &Path) -> String {
    format!("\
# Error: Source Outside Base Directory

`{}` is not inside `{}`, so it cannot be referenced without `..` segments.

## Fix

Run from the project that contains the source, or pass `--project-root`.
", source_file.display(), base.display())
}

fn render_invalid_setting_value(key: &str, value: &str, reason: &str) -> String {
    format!("\
# Error: Invalid Setting

`{key}` = `{value}`: {reason}

## Fix

    entrypoint config set {key} <value>
")
}

fn render_unknown_setting(key: &str) -> String {
    let mut out = format!("\
# Error: Unknown Setting

`{key}` is not a setting.

## Known settings

");
    for known in SETTING_KEYS {
        let _ = writeln!(out, "- `{known}`");
    }
    out
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn missing_build_file_lists_searched_paths() {
        let e = Error::ConfigurationMissing {
            searched: vec![PathBuf::from("/p/src/CMakeLists.txt"), PathBuf::from("/p/CMakeLists.txt")],
        };
        let md = render_error(&e);
        assert!(md.starts_with("# Error: No Build File"));
        assert!(md.contains("- `/p/src/CMakeLists.txt`"));
        assert!(md.contains("- `/p/CMakeLists.txt`"));
    }

    #[test]
    fn unknown_setting_lists_known_keys() {
        let md = render_error(&Error::UnknownSetting { key: "colour".to_string() });
        for key in SETTING_KEYS {
            assert!(md.contains(key), "missing {key}");
        }
    }
}
