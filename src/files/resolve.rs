//! Mapping request targets onto the root directory and classifying what is there.

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use tokio::fs::File;

/// File served for targets that end with `/`.
pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// The target contains a `..` segment
    EscapesRoot,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::EscapesRoot => f.write_str("request target escapes the root directory"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// A request target joined onto the root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Last component of the path, used for content type lookup.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    }
}

/// Resolves `target` below `root`.
///
/// A trailing `/` selects [`INDEX_FILE`]. Leading separators are stripped,
/// empty and `.` segments are dropped and `/` becomes the host separator.
///
/// # Example
///
/// ```
/// # use std::path::Path;
/// # use webroot::files::resolve::resolve;
/// let resolved = resolve(Path::new("/srv/www"), "//docs/").unwrap();
/// assert_eq!(resolved.as_path(), Path::new("/srv/www/docs/index.html"));
/// ```
pub fn resolve(root: &Path, target: &str) -> Result<ResolvedPath, ResolveError> {
    let mut path_to_file = target.to_string();
    if path_to_file.ends_with('/') {
        path_to_file.push_str(INDEX_FILE);
    }

    let relative = path_to_file.trim_start_matches(['/', MAIN_SEPARATOR]);

    let mut path = root.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(ResolveError::EscapesRoot),
            _ => path.push(segment),
        }
    }

    Ok(ResolvedPath { path })
}

/// What the filesystem holds at a resolved path.
#[derive(Debug)]
pub enum FileState {
    Directory,
    /// Opened for reading; `len` is the size reported by its metadata
    ReadableFile { file: File, len: u64 },
    UnreadableFile,
    Missing,
}

/// Queries the filesystem for `path`.
///
/// Errors other than not-found and permission-denied are returned as-is.
pub async fn classify(path: &Path) -> io::Result<FileState> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FileState::Missing),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        return Ok(FileState::Directory);
    }

    match File::open(path).await {
        Ok(file) => {
            let len = file.metadata().await?.len();
            Ok(FileState::ReadableFile { file, len })
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Ok(FileState::UnreadableFile),
        // Removed between the two queries
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileState::Missing),
        Err(e) => Err(e),
    }
}
