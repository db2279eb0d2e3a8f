//! Placeholder substitution for executable names and output directories.

/// CMake variable holding the directory of the build file being processed.
pub const CURRENT_SOURCE_DIR_VAR: &str = "${CMAKE_CURRENT_SOURCE_DIR}";

/// Placeholder for the directory of the source file.
pub const FILE_DIR_TOKEN: &str = "%FILE_DIR%";

/// Placeholder for the source file name without its extension.
pub const FILENAME_TOKEN: &str = "%FILENAME%";

/// Placeholder for the project root directory.
pub const PROJECT_DIR_TOKEN: &str = "%PROJECT_DIR%";

/// CMake variable holding the top-level project source directory.
pub const PROJECT_SOURCE_DIR_VAR: &str = "${PROJECT_SOURCE_DIR}";

/// Replacement values for the three recognized placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    /// Value for `%FILE_DIR%`.
    file_dir: String,
    /// Value for `%FILENAME%`.
    file_name: String,
    /// Value for `%PROJECT_DIR%`.
    project_dir: String,
}

impl TemplateContext {
    /// Context for a source file with the given base name, located in
    /// `relative_dir` (forward slashes, empty for the build file's own directory).
    pub fn new(base_name: &str, relative_dir: &str) -> Self {
        let file_dir = if relative_dir.is_empty() {
            CURRENT_SOURCE_DIR_VAR.to_string()
        } else {
            format!("{CURRENT_SOURCE_DIR_VAR}/{relative_dir}")
        };

        return Self {
            file_dir,
            file_name: base_name.to_string(),
            project_dir: PROJECT_SOURCE_DIR_VAR.to_string(),
        };
    }

    /// Token at the start of `text` and its replacement, if any.
    fn leading_token(&self, text: &str) -> Option<(usize, &str)> {
        let tokens = [
            (FILENAME_TOKEN, self.file_name.as_str()),
            (PROJECT_DIR_TOKEN, self.project_dir.as_str()),
            (FILE_DIR_TOKEN, self.file_dir.as_str()),
        ];
        return tokens
            .into_iter()
            .find(|(token, _)| return text.starts_with(token))
            .map(|(token, value)| return (token.len(), value));
    }

    /// Substitute placeholders in a single left-to-right pass.
    ///
    /// Replacement values are copied verbatim and never rescanned, and a `%`
    /// that does not start a recognized token is kept as-is.
    pub fn resolve(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(pos) = rest.find('%') {
            let (literal, tail) = rest.split_at(pos);
            out.push_str(literal);
            match self.leading_token(tail) {
                Some((len, value)) => {
                    out.push_str(value);
                    rest = tail.get(len..).unwrap_or_default();
                },
                None => {
                    out.push('%');
                    rest = tail.get(1..).unwrap_or_default();
                },
            }
        }
        out.push_str(rest);

        return out;
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn filename_suffix_template() {
        let ctx = TemplateContext::new("main", "");
        assert_eq!(ctx.resolve("%FILENAME%_test"), "main_test");
    }

    #[test]
    fn default_name_template_is_base_name() {
        let ctx = TemplateContext::new("solver", "src");
        assert_eq!(ctx.resolve(FILENAME_TOKEN), "solver");
    }

    #[test]
    fn directory_tokens_without_relative_dir_are_bare() {
        let ctx = TemplateContext::new("main", "");
        assert_eq!(ctx.resolve("%FILE_DIR%"), "${CMAKE_CURRENT_SOURCE_DIR}");
        assert_eq!(ctx.resolve("%PROJECT_DIR%"), "${PROJECT_SOURCE_DIR}");
    }

    #[test]
    fn file_dir_joins_relative_dir() {
        let ctx = TemplateContext::new("main", "apps/cli");
        assert_eq!(ctx.resolve("%FILE_DIR%/bin"), "${CMAKE_CURRENT_SOURCE_DIR}/apps/cli/bin");
    }

    #[test]
    fn replacement_values_are_not_rescanned() {
        let ctx = TemplateContext::new("%PROJECT_DIR%", "");
        assert_eq!(ctx.resolve("out/%FILENAME%"), "out/%PROJECT_DIR%");
    }

    #[test]
    fn unknown_percent_sequences_pass_through() {
        let ctx = TemplateContext::new("main", "");
        assert_eq!(ctx.resolve("100%_%OTHER%_%FILENAME%%"), "100%_%OTHER%_main%");
    }
}
