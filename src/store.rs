//! Whole-content access to a build file.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Read and replace the entire text of one build file.
///
/// Writers take `&mut self`, so a store has a single writer at a time, and
/// `replace` swaps the whole content in one step: readers see the old text
/// or the new text, never a mix.
pub trait TextStore {
    /// Where the text lives, for diagnostics.
    fn location(&self) -> &Path;

    /// Current text, or `None` if the build file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the content cannot be read.
    fn read(&self) -> Result<Option<String>, Error>;

    /// Replace the entire text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the content cannot be written.
    fn replace(&mut self, text: &str) -> Result<(), Error>;
}

/// A build file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Path of the build file.
    path: PathBuf,
}

impl FileStore {
    /// Store backed by the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        return Self { path };
    }

    /// The file a write must land in: the end of any symlink chain, or the
    /// path itself when it does not exist yet.
    fn write_target(&self) -> Result<PathBuf, Error> {
        return match std::fs::canonicalize(&self.path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(self.path.clone()),
            Err(e) => Err(Error::Io(e)),
            Ok(p) => Ok(p),
        };
    }
}

impl TextStore for FileStore {
    fn location(&self) -> &Path {
        return &self.path;
    }

    fn read(&self) -> Result<Option<String>, Error> {
        return match std::fs::read_to_string(&self.path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
            Ok(c) => Ok(Some(c)),
        };
    }

    fn replace(&mut self, text: &str) -> Result<(), Error> {
        let target = self.write_target()?;
        let dir = target
            .parent()
            .filter(|p| return !p.as_os_str().is_empty())
            .unwrap_or_else(|| return Path::new("."));

        // Staged under a unique name in the same directory so the rename stays atomic.
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(text.as_bytes())?;
        staged.as_file().sync_all()?;
        match std::fs::metadata(&target) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => return Err(Error::Io(e)),
            Ok(meta) => staged.as_file().set_permissions(meta.permissions())?,
        }
        staged.persist(&target).map_err(|e| return Error::Io(e.error))?;

        tracing::debug!(path = %target.display(), bytes = text.len(), "replaced build file");
        return Ok(());
    }
}

/// An in-memory build file.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Path reported in diagnostics.
    path: PathBuf,
    /// Current text; `None` models a missing file.
    text: Option<String>,
    /// Number of `replace` calls so far.
    writes: usize,
}

#[cfg(test)]
impl MemoryStore {
    /// A store holding `text`, reported as `CMakeLists.txt`.
    pub fn new(text: Option<&str>) -> Self {
        return Self {
            path: PathBuf::from("CMakeLists.txt"),
            text: text.map(str::to_string),
            writes: 0,
        };
    }

    /// Current text.
    pub fn text(&self) -> Option<&str> {
        return self.text.as_deref();
    }

    /// How many times the text was replaced.
    pub const fn writes(&self) -> usize {
        return self.writes;
    }
}

#[cfg(test)]
impl TextStore for MemoryStore {
    fn location(&self) -> &Path {
        return &self.path;
    }

    fn read(&self) -> Result<Option<String>, Error> {
        return Ok(self.text.clone());
    }

    fn replace(&mut self, text: &str) -> Result<(), Error> {
        self.text = Some(text.to_string());
        self.writes = self.writes.saturating_add(1);
        return Ok(());
    }
}
