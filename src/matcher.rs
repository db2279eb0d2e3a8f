//! Line-anchored recognition of `add_executable` and `set_target_properties`
//! statements in a CMake script.
//!
//! This is a textual scan, not a CMake parser. A statement is recognized only
//! when it occupies exactly one line and starts at column zero. Statements
//! spanning several lines, commented-out statements, and anything inside
//! conditionals are treated as ordinary text.

use regex::Regex;

/// Result of looking for an executable declaration in a build file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No `add_executable` line declares the target.
    Absent,
    /// The target is declared, but its arguments do not mention the source path.
    PresentDifferentSource,
    /// The target is declared and its arguments mention the source path.
    PresentSameSource,
}

/// Outcome of `classify`, with the zero-based index of the matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Line holding the first matching declaration, if any.
    pub line: Option<usize>,
    /// Which of the three states the build file is in.
    pub outcome: MatchOutcome,
}

/// One recognized statement on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationStanza<'a> {
    /// Everything after the target name, up to the closing parenthesis.
    pub arguments: &'a str,
    /// Statement keyword.
    pub kind: StanzaKind,
    /// First argument of the statement.
    pub name: &'a str,
}

/// The two statements the synchronizer manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanzaKind {
    /// `add_executable(<name> <source>...)`
    Executable,
    /// `set_target_properties(<name> PROPERTIES RUNTIME_OUTPUT_DIRECTORY <dir>)`
    Properties,
}

impl StanzaKind {
    /// Regex for the argument list after the target name, captured whole.
    /// Properties lines setting anything besides the output directory are not
    /// recognized.
    const fn arguments_pattern(self) -> &'static str {
        return match self {
            StanzaKind::Executable => r"\S+(?:\s+\S+)*",
            StanzaKind::Properties => r#"PROPERTIES\s+RUNTIME_OUTPUT_DIRECTORY\s+(?:"[^"]*"|\S+)"#,
        };
    }

    /// CMake command name for this statement.
    pub const fn keyword(self) -> &'static str {
        return match self {
            StanzaKind::Executable => "add_executable",
            StanzaKind::Properties => "set_target_properties",
        };
    }
}

/// Compiled pattern for one statement kind and one target name.
#[derive(Debug, Clone)]
pub struct StanzaPattern<'n> {
    /// Statement kind this pattern recognizes.
    kind: StanzaKind,
    /// Target name the first argument must equal.
    name: &'n str,
    /// Anchored single-line pattern with the argument list in group 1.
    regex: Regex,
}

impl<'n> StanzaPattern<'n> {
    /// Compile the pattern for `kind` statements whose first argument is exactly `name`.
    /// The name is matched literally and case-sensitively.
    ///
    /// # Panics
    ///
    /// Panics if the generated regex is invalid, which cannot happen because
    /// the name is escaped.
    #[allow(clippy::expect_used, reason = "pattern is built from an escaped literal")]
    pub fn new(kind: StanzaKind, name: &'n str) -> Self {
        let source = format!(
            r"^{}\s*\(\s*{}\s+({})\s*\)\s*$",
            kind.keyword(),
            regex::escape(name),
            kind.arguments_pattern(),
        );
        let regex = Regex::new(&source).expect("valid regex");
        return Self { kind, name, regex };
    }

    /// Recognize a statement on one line (without its line terminator).
    pub fn capture<'l>(&self, line: &'l str) -> Option<DeclarationStanza<'l>>
    where
        'n: 'l,
    {
        let caps = self.regex.captures(line)?;
        let arguments = caps.get(1)?.as_str();
        return Some(DeclarationStanza {
            arguments,
            kind: self.kind,
            name: self.name,
        });
    }

    /// Whether the line is a statement of this kind for this target.
    pub fn is_match(&self, line: &str) -> bool {
        return self.regex.is_match(line);
    }
}

/// Decide whether `text` already declares `target_name` as an executable
/// built from `relative_path`.
///
/// Scanning stops at the first matching line: later declarations of the same
/// name are never consulted. "Same source" is a substring test on the captured
/// argument list, so extra arguments after the source are tolerated.
pub fn classify(text: &str, target_name: &str, relative_path: &str) -> Classification {
    let pattern = StanzaPattern::new(StanzaKind::Executable, target_name);

    for (index, (line, _ending)) in split_lines(text).enumerate() {
        let Some(stanza) = pattern.capture(line) else {
            continue;
        };
        let outcome = if stanza.arguments.contains(relative_path) {
            MatchOutcome::PresentSameSource
        } else {
            MatchOutcome::PresentDifferentSource
        };
        tracing::debug!(name = stanza.name, kind = ?stanza.kind, line = index, ?outcome, "found existing declaration");
        return Classification { line: Some(index), outcome };
    }

    tracing::debug!(target_name, "no existing declaration");
    return Classification { line: None, outcome: MatchOutcome::Absent };
}

/// Split text into lines, separating each line's content from its terminator
/// (`"\n"`, `"\r\n"`, or `""` for a final unterminated line).
pub fn split_lines(text: &str) -> impl Iterator<Item = (&str, &str)> {
    return text.split_inclusive('\n').map(|segment| {
        if let Some(content) = segment.strip_suffix("\r\n") {
            return (content, "\r\n");
        }
        if let Some(content) = segment.strip_suffix('\n') {
            return (content, "\n");
        }
        return (segment, "");
    });
}
