//! Finding the build file a source file belongs to.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::paths::SourceReference;

/// File name of a CMake build description.
pub const BUILD_FILE_NAME: &str = "CMakeLists.txt";

/// The build file next to the source, falling back to the one at the project root.
///
/// # Errors
///
/// Returns `Error::ConfigurationMissing` listing the searched paths if neither exists.
pub fn nearest_build_file(source: &SourceReference, project_root: &Path) -> Result<PathBuf, Error> {
    let mut searched: Vec<PathBuf> = Vec::new();
    for dir in [source.parent.as_path(), project_root] {
        let candidate = dir.join(BUILD_FILE_NAME);
        if searched.contains(&candidate) {
            continue;
        }
        if candidate.is_file() {
            tracing::debug!(build_file = %candidate.display(), "located build file");
            return Ok(candidate);
        }
        searched.push(candidate);
    }

    return Err(Error::ConfigurationMissing { searched });
}
