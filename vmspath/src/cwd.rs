//! Current directory providers.
//!
//! Relative filespecs are anchored on the canonical current directory. The
//! translator asks a [`CurrentDir`] for it once per call, so tests and
//! embedders can pin it instead of depending on process state.

use std::io;
use std::path::{Path, PathBuf};

/// Source of the canonical (absolute, symlink-free) current directory.
pub trait CurrentDir {
    fn canonical_path(&self) -> io::Result<PathBuf>;
}

/// The process working directory, canonicalized on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCurrentDir;

impl CurrentDir for ProcessCurrentDir {
    fn canonical_path(&self) -> io::Result<PathBuf> {
        std::env::current_dir()?.canonicalize()
    }
}

/// A fixed directory supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCurrentDir {
    path: PathBuf,
}

impl FixedCurrentDir {
    /// Use `path` as given. It should already be absolute and canonical.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Canonicalize `path` now, failing if it does not exist.
    pub fn canonicalize(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            path: path.as_ref().canonicalize()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CurrentDir for FixedCurrentDir {
    fn canonical_path(&self) -> io::Result<PathBuf> {
        Ok(self.path.clone())
    }
}

impl<T: CurrentDir + ?Sized> CurrentDir for &T {
    fn canonical_path(&self) -> io::Result<PathBuf> {
        (**self).canonical_path()
    }
}
