//! Classify, synthesize, confirm, and write: one synchronization end to end.

use crate::confirm::{ConfirmationPort, OverwritePrompt};
use crate::error::Error;
use crate::matcher::{self, MatchOutcome};
use crate::request::SyncRequest;
use crate::store::TextStore;
use crate::synthesizer;

/// What a synchronization did, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncOutcome {
    /// The declaration already pointed at this source; nothing was written.
    AlreadyPresent,
    /// A conflicting declaration exists and the overwrite was refused.
    Declined,
    /// The synchronization stopped on an error.
    Failed,
    /// A new declaration was appended.
    Inserted,
    /// A conflicting declaration was replaced.
    Overwritten,
}

/// The change a request implies for a given text, computed without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing to do.
    AlreadyPresent,
    /// Append a declaration; `text` is the complete new content.
    Insert {
        /// Complete new build-file text.
        text: String,
    },
    /// Replace a conflicting declaration once confirmed; `text` is the complete new content.
    Overwrite {
        /// Complete new build-file text.
        text: String,
    },
}

/// Decide what `request` requires of `text`. Pure: the text is classified
/// afresh on every call.
pub fn plan(request: &SyncRequest, text: &str) -> Plan {
    let classification = matcher::classify(text, &request.target_name, &request.relative_path);
    let synthesize = || {
        return synthesizer::synthesize(
            text,
            classification.outcome,
            &request.target_name,
            &request.relative_path,
            request.output_dir.as_deref(),
        );
    };

    return match classification.outcome {
        MatchOutcome::Absent => Plan::Insert { text: synthesize() },
        MatchOutcome::PresentDifferentSource => Plan::Overwrite { text: synthesize() },
        MatchOutcome::PresentSameSource => Plan::AlreadyPresent,
    };
}

/// Run a request against a build file: read it, plan, ask for confirmation
/// when a conflicting declaration would be replaced, and write the result
/// as a single whole-content replacement.
///
/// The port is only consulted for conflicts, and not at all when
/// `skip_confirmation` is set. Nothing is written unless the full new text
/// was produced.
///
/// # Errors
///
/// Returns `Error::ConfigurationMissing` if the build file does not exist,
/// or `Error::Io` if it cannot be read or written.
pub fn run(
    store: &mut dyn TextStore,
    confirm: &mut dyn ConfirmationPort,
    request: &SyncRequest,
    skip_confirmation: bool,
) -> Result<SyncOutcome, Error> {
    let Some(text) = store.read()? else {
        return Err(Error::ConfigurationMissing {
            searched: vec![store.location().to_path_buf()],
        });
    };

    let outcome = match plan(request, &text) {
        Plan::AlreadyPresent => SyncOutcome::AlreadyPresent,
        Plan::Insert { text } => {
            store.replace(&text)?;
            SyncOutcome::Inserted
        },
        Plan::Overwrite { text } => {
            let prompt = OverwritePrompt {
                relative_path: &request.relative_path,
                target_name: &request.target_name,
            };
            if skip_confirmation || confirm.confirm(&prompt) {
                store.replace(&text)?;
                SyncOutcome::Overwritten
            } else {
                SyncOutcome::Declined
            }
        },
    };

    tracing::info!(
        target_name = %request.target_name,
        build_file = %store.location().display(),
        base_dir = %request.base_dir.display(),
        ?outcome,
        "synchronized"
    );
    return Ok(outcome);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::confirm::FixedAnswer;
    use crate::config::Settings;
    use crate::store::MemoryStore;

    /// Counts prompts and answers with a fixed decision.
    struct CountingAnswer {
        /// Decision returned for every prompt.
        answer: bool,
        /// Prompts seen so far.
        asked: usize,
    }

    impl ConfirmationPort for CountingAnswer {
        fn confirm(&mut self, _prompt: &OverwritePrompt<'_>) -> bool {
            self.asked += 1;
            return self.answer;
        }
    }

    fn request(source: &str, output: &str) -> SyncRequest {
        let settings = Settings {
            runtime_output_directory: output.to_string(),
            ..Settings::default()
        };
        return SyncRequest::new(Path::new(source), Path::new("/proj"), &settings).unwrap();
    }

    #[test]
    fn inserts_into_empty_file() {
        let mut store = MemoryStore::new(Some(""));
        let outcome = run(&mut store, &mut FixedAnswer(false), &request("/proj/src/app.cpp", ""), false).unwrap();
        assert_eq!(outcome, SyncOutcome::Inserted);
        assert_eq!(store.text(), Some("\nadd_executable(app src/app.cpp)"));
    }

    #[test]
    fn second_run_is_already_present_and_writes_nothing() {
        let req = request("/proj/src/app.cpp", "%PROJECT_DIR%/bin");
        let mut store = MemoryStore::new(Some("project(x)\n"));
        run(&mut store, &mut FixedAnswer(false), &req, false).unwrap();
        let after_first = store.text().map(str::to_string);

        let outcome = run(&mut store, &mut FixedAnswer(false), &req, false).unwrap();
        assert_eq!(outcome, SyncOutcome::AlreadyPresent);
        assert_eq!(store.text().map(str::to_string), after_first);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn conflict_asks_and_overwrites_when_confirmed() {
        let mut store = MemoryStore::new(Some("add_executable(app src/old.cpp)\n"));
        let mut port = CountingAnswer { answer: true, asked: 0 };
        let outcome = run(&mut store, &mut port, &request("/proj/src/app.cpp", ""), false).unwrap();
        assert_eq!(outcome, SyncOutcome::Overwritten);
        assert_eq!(port.asked, 1);
        assert_eq!(store.text(), Some("add_executable(app src/app.cpp)\n"));
    }

    #[test]
    fn declined_conflict_leaves_text_unchanged() {
        let original = "add_executable(app src/old.cpp)\n";
        let mut store = MemoryStore::new(Some(original));
        let mut port = CountingAnswer { answer: false, asked: 0 };
        let outcome = run(&mut store, &mut port, &request("/proj/src/app.cpp", ""), false).unwrap();
        assert_eq!(outcome, SyncOutcome::Declined);
        assert_eq!(store.text(), Some(original));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn skip_confirmation_never_asks() {
        let mut store = MemoryStore::new(Some("add_executable(app src/old.cpp)\n"));
        let mut port = CountingAnswer { answer: false, asked: 0 };
        let outcome = run(&mut store, &mut port, &request("/proj/src/app.cpp", ""), true).unwrap();
        assert_eq!(outcome, SyncOutcome::Overwritten);
        assert_eq!(port.asked, 0);
    }

    #[test]
    fn same_source_never_asks() {
        let mut store = MemoryStore::new(Some("add_executable(app src/app.cpp)"));
        let mut port = CountingAnswer { answer: true, asked: 0 };
        let outcome = run(&mut store, &mut port, &request("/proj/src/app.cpp", ""), false).unwrap();
        assert_eq!(outcome, SyncOutcome::AlreadyPresent);
        assert_eq!(port.asked, 0);
    }

    #[test]
    fn missing_build_file_is_an_error() {
        let mut store = MemoryStore::new(None);
        let err = run(&mut store, &mut FixedAnswer(true), &request("/proj/app.cpp", ""), false).unwrap_err();
        assert!(matches!(err, Error::ConfigurationMissing { .. }));
    }

    #[test]
    fn plan_is_pure() {
        let req = request("/proj/app.cpp", "");
        let text = "add_executable(app other.cpp)";
        assert_eq!(plan(&req, text), plan(&req, text));
        assert!(matches!(plan(&req, text), Plan::Overwrite { .. }));
        assert_eq!(plan(&req, "add_executable(app app.cpp)"), Plan::AlreadyPresent);
    }
}
