//! Producing updated build-file text from a classification.

use std::borrow::Cow;

use crate::matcher::{MatchOutcome, StanzaKind, StanzaPattern, split_lines};

/// Append a new declaration at the end of the text.
fn append_declaration(text: &str, target_name: &str, relative_path: &str, output_dir: Option<&str>) -> String {
    let mut updated = String::with_capacity(text.len().saturating_add(128));
    updated.push_str(text);
    updated.push('\n');
    updated.push_str(&executable_line(target_name, relative_path));
    if let Some(dir) = output_dir {
        updated.push('\n');
        updated.push_str(&properties_line(target_name, dir));
    }
    return updated;
}

/// `add_executable(<name> <source>)` with the source quoted when needed.
pub fn executable_line(target_name: &str, relative_path: &str) -> String {
    return format!(
        "{}({target_name} {})",
        StanzaKind::Executable.keyword(),
        quote_argument(relative_path)
    );
}

/// `set_target_properties(<name> PROPERTIES RUNTIME_OUTPUT_DIRECTORY <dir>)`
/// with the directory quoted when needed.
pub fn properties_line(target_name: &str, output_dir: &str) -> String {
    return format!(
        "{}({target_name} PROPERTIES RUNTIME_OUTPUT_DIRECTORY {})",
        StanzaKind::Properties.keyword(),
        quote_argument(output_dir)
    );
}

/// Wrap a value in double quotes if it contains a space or a parenthesis.
///
/// Embedded quotes and backslashes are not escaped.
pub fn quote_argument(value: &str) -> Cow<'_, str> {
    if value.contains([' ', '(', ')']) {
        return Cow::Owned(format!("\"{value}\""));
    }
    return Cow::Borrowed(value);
}

/// Rewrite the whole text: the first `add_executable` line for the target is
/// replaced, every output-directory `set_target_properties` line for the
/// target is dropped, and a fresh properties line follows the replacement
/// when an output directory is configured. Other lines keep their content and terminator;
/// an unterminated last line gains a `\n`.
fn rewrite_declaration(text: &str, target_name: &str, relative_path: &str, output_dir: Option<&str>) -> String {
    let executable = StanzaPattern::new(StanzaKind::Executable, target_name);
    let properties = StanzaPattern::new(StanzaKind::Properties, target_name);
    let mut updated = String::with_capacity(text.len().saturating_add(128));
    let mut replaced = false;

    for (line, ending) in split_lines(text) {
        let ending = if ending.is_empty() { "\n" } else { ending };

        if properties.is_match(line) {
            tracing::debug!(target_name, "dropping stale properties line");
            continue;
        }

        if !replaced && executable.is_match(line) {
            replaced = true;
            updated.push_str(&executable_line(target_name, relative_path));
            updated.push_str(ending);
            if let Some(dir) = output_dir {
                updated.push_str(&properties_line(target_name, dir));
                updated.push_str(ending);
            }
            continue;
        }

        updated.push_str(line);
        updated.push_str(ending);
    }

    return updated;
}

/// Produce the new build-file text for a classified target.
///
/// - `Absent` appends the declaration (and properties line) on new lines.
/// - `PresentSameSource` returns the text unchanged.
/// - `PresentDifferentSource` rewrites the declaration; callers must obtain
///   confirmation before persisting the result.
///
/// An empty `output_dir` is the same as none.
pub fn synthesize(
    text: &str,
    outcome: MatchOutcome,
    target_name: &str,
    relative_path: &str,
    output_dir: Option<&str>,
) -> String {
    let output_dir = output_dir.filter(|dir| return !dir.is_empty());
    return match outcome {
        MatchOutcome::Absent => append_declaration(text, target_name, relative_path, output_dir),
        MatchOutcome::PresentDifferentSource => rewrite_declaration(text, target_name, relative_path, output_dir),
        MatchOutcome::PresentSameSource => text.to_string(),
    };
}
