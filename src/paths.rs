//! Source file references and base-relative path computation.

use std::path::{Component, Path, PathBuf};

use crate::error::Error;

/// A source file the user wants to build as an executable.
/// Created once per invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    /// File name with exactly the last extension stripped.
    pub base_name: String,
    /// File name including its extension.
    pub file_name: String,
    /// Directory containing the file.
    pub parent: PathBuf,
    /// Normalized path of the file.
    pub path: PathBuf,
}

impl SourceReference {
    /// Build a reference from a source path. The path is normalized lexically,
    /// the filesystem is not consulted.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSourcePath` if the path has no file name.
    pub fn new(path: &Path) -> Result<Self, Error> {
        let path = normalize_path(path);
        let Some(file_name) = path.file_name().map(|n| return n.to_string_lossy().into_owned()) else {
            return Err(Error::InvalidSourcePath { path });
        };
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let base_name = base_executable_name(&file_name).to_string();

        return Ok(Self {
            base_name,
            file_name,
            parent,
            path,
        });
    }
}

/// Strip the text after the final `.` of a file name, including the dot.
/// A name without a dot is returned unchanged.
pub fn base_executable_name(file_name: &str) -> &str {
    return file_name.rsplit_once('.').map_or(file_name, |(stem, _)| return stem);
}

/// Join the normal components of a relative path with `/`, regardless of
/// the host separator.
fn join_with_forward_slashes(path: &Path) -> String {
    return path
        .components()
        .map(|c| return c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
/// `..` pops a preceding normal component, is absorbed by a root, and is kept otherwise.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => match components.last() {
            Some(Component::Normal(_)) => {
                components.pop();
            },
            Some(Component::RootDir | Component::Prefix(_)) => {},
            _ => components.push(component),
        },
        other => components.push(other),
    }
    return;
}

/// Path of the directory containing `source_file`, relative to `base_dir`,
/// with forward slashes. Empty when the file sits directly in `base_dir`.
///
/// # Errors
///
/// Returns `Error::InvalidBasePath` if `base_dir` is not an ancestor of the file.
pub fn relative_source_dir(base_dir: &Path, source_file: &Path) -> Result<String, Error> {
    let relative = relative_source_path(base_dir, source_file)?;
    let dir = relative.rsplit_once('/').map_or("", |(dir, _)| return dir);
    return Ok(dir.to_string());
}

/// Path of `source_file` relative to `base_dir`, with forward slashes.
///
/// Refuses to produce `..` segments: the base must be an ancestor of the file.
///
/// # Errors
///
/// Returns `Error::InvalidBasePath` if `base_dir` is not a strict ancestor of the file.
pub fn relative_source_path(base_dir: &Path, source_file: &Path) -> Result<String, Error> {
    let base = normalize_path(base_dir);
    let source = normalize_path(source_file);

    let invalid = || {
        return Error::InvalidBasePath {
            base: base_dir.to_path_buf(),
            source_file: source_file.to_path_buf(),
        };
    };

    let remainder = source.strip_prefix(&base).map_err(|_err| return invalid())?;
    let escapes = remainder.components().any(|c| return !matches!(c, Component::Normal(_)));
    if remainder.as_os_str().is_empty() || escapes {
        return Err(invalid());
    }

    let relative = join_with_forward_slashes(remainder);
    tracing::trace!(base = %base.display(), %relative, "relativized source path");
    return Ok(relative);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn file_directly_in_base_has_no_directory() {
        let rel = relative_source_path(Path::new("/proj"), Path::new("/proj/main.cpp")).unwrap();
        assert_eq!(rel, "main.cpp");
        let dir = relative_source_dir(Path::new("/proj"), Path::new("/proj/main.cpp")).unwrap();
        assert_eq!(dir, "");
    }

    #[test]
    fn nested_file_uses_forward_slashes() {
        let rel = relative_source_path(Path::new("/proj"), Path::new("/proj/src/tools/gen.cc")).unwrap();
        assert_eq!(rel, "src/tools/gen.cc");
        let dir = relative_source_dir(Path::new("/proj"), Path::new("/proj/src/tools/gen.cc")).unwrap();
        assert_eq!(dir, "src/tools");
    }

    #[test]
    fn dot_segments_are_collapsed_before_relativizing() {
        let rel = relative_source_path(Path::new("/proj/./build/.."), Path::new("/proj/src/../app.cpp")).unwrap();
        assert_eq!(rel, "app.cpp");
    }

    #[test]
    fn rejects_base_that_is_not_an_ancestor() {
        let err = relative_source_path(Path::new("/proj/lib"), Path::new("/proj/src/app.cpp")).unwrap_err();
        assert!(matches!(err, Error::InvalidBasePath { .. }));
    }

    #[test]
    fn rejects_sibling_with_shared_name_prefix() {
        let err = relative_source_path(Path::new("/proj"), Path::new("/project/app.cpp")).unwrap_err();
        assert!(matches!(err, Error::InvalidBasePath { .. }));
    }

    #[test]
    fn rejects_source_equal_to_base() {
        let err = relative_source_path(Path::new("/proj"), Path::new("/proj")).unwrap_err();
        assert!(matches!(err, Error::InvalidBasePath { .. }));
    }

    #[test]
    fn strips_only_last_extension() {
        assert_eq!(base_executable_name("main.cpp"), "main");
        assert_eq!(base_executable_name("parser.test.cc"), "parser.test");
        assert_eq!(base_executable_name("Makefile"), "Makefile");
    }

    #[test]
    fn source_reference_splits_path() {
        let source = SourceReference::new(Path::new("/proj/src/./demo.c")).unwrap();
        assert_eq!(source.file_name, "demo.c");
        assert_eq!(source.base_name, "demo");
        assert_eq!(source.parent, PathBuf::from("/proj/src"));
        assert_eq!(source.path, PathBuf::from("/proj/src/demo.c"));
    }

    #[test]
    fn root_has_no_file_name() {
        let err = SourceReference::new(Path::new("/")).unwrap_err();
        assert!(matches!(err, Error::InvalidSourcePath { .. }));
    }
}
