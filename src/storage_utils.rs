// storage_utils.rs
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Joins a base path and a child segment with a forward slash.
///
/// Paths in this library are plain `/`-separated strings so the same helpers
/// work against bucket-style paths (`gs://bucket/data`) and local
/// directories alike. A trailing slash on `base` is collapsed.
///
/// ```
/// use kagglekit::storage_utils::join_path;
///
/// assert_eq!(join_path("gs://bucket/data", "dogs"), "gs://bucket/data/dogs");
/// assert_eq!(join_path("gs://bucket/data/", "dogs"), "gs://bucket/data/dogs");
/// assert_eq!(join_path("", "dogs"), "dogs");
/// ```
pub fn join_path(base: &str, child: &str) -> String {
    if base.is_empty() {
        return child.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), child)
}

/// Converts a `*`/`?` wildcard pattern into an anchored regular expression.
/// `*` matches any run of characters within one path segment, `?` matches a
/// single character.
fn wildcard_to_regex(pattern: &str) -> Result<Regex, io::Error> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str("[^/]*"),
            '?' => expr.push_str("[^/]"),
            _ => expr.push_str(&regex::escape(&c.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
}

/// Read/write access to a file tree.
///
/// Every helper in this library that touches files goes through this trait,
/// so a notebook can point the same discovery and bookkeeping code at the
/// local filesystem (`LocalFileStore`) or at an adapter over a remote object
/// store. Paths are plain strings with `/` separators; `list_dir` returns
/// entry names, not full paths, and makes no ordering guarantee.
pub trait FileStore {
    /// Whether `path` exists (as a file or a directory).
    fn exists(&self, path: &str) -> bool;

    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &str) -> bool;

    /// Lists the names of the entries directly under `path`.
    fn list_dir(&self, path: &str) -> Result<Vec<String>, io::Error>;

    /// Creates `path` and any missing parent directories.
    fn create_dir_all(&self, path: &str) -> Result<(), io::Error>;

    /// Deletes `path` and everything under it.
    fn remove_dir_all(&self, path: &str) -> Result<(), io::Error>;

    /// Moves `from` to `to`.
    fn rename(&self, from: &str, to: &str) -> Result<(), io::Error>;

    /// Copies the file at `from` to `to`, overwriting `to` if present.
    fn copy(&self, from: &str, to: &str) -> Result<(), io::Error>;

    /// Size of the file at `path`, in bytes.
    fn size(&self, path: &str) -> Result<u64, io::Error>;

    /// Last-modified time of the file at `path`.
    fn modified(&self, path: &str) -> Result<SystemTime, io::Error>;

    /// Lists the full paths of the entries directly under `dir` whose names
    /// match the `*`/`?` wildcard `pattern` (e.g. `*.jpg`), in the order
    /// `list_dir` returns them.
    fn glob(&self, dir: &str, pattern: &str) -> Result<Vec<String>, io::Error> {
        let matcher = wildcard_to_regex(pattern)?;
        Ok(self
            .list_dir(dir)?
            .into_iter()
            .filter(|name| matcher.is_match(name))
            .map(|name| join_path(dir, &name))
            .collect())
    }
}

/// A `FileStore` backed by the local filesystem.
///
/// Directory entries are returned in name order so repeated discovery runs
/// over the same tree produce identical results; the `FileStore` contract
/// itself leaves ordering unspecified.
///
/// ```
/// use kagglekit::storage_utils::{FileStore, LocalFileStore};
/// use std::fs;
///
/// let tmp = tempfile::tempdir().unwrap();
/// fs::write(tmp.path().join("b.jpg"), b"x").unwrap();
/// fs::write(tmp.path().join("a.jpg"), b"x").unwrap();
/// fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
///
/// let store = LocalFileStore::new();
/// let dir = tmp.path().to_str().unwrap();
/// let names = store.list_dir(dir).unwrap();
/// assert_eq!(names, vec!["a.jpg", "b.jpg", "notes.txt"]);
///
/// let jpgs = store.glob(dir, "*.jpg").unwrap();
/// assert_eq!(jpgs.len(), 2);
/// assert!(jpgs[0].ends_with("a.jpg"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        LocalFileStore
    }
}

impl FileStore for LocalFileStore {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn is_dir(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>, io::Error> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    fn create_dir_all(&self, path: &str) -> Result<(), io::Error> {
        fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &str) -> Result<(), io::Error> {
        fs::remove_dir_all(path)
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), io::Error> {
        fs::rename(from, to)
    }

    fn copy(&self, from: &str, to: &str) -> Result<(), io::Error> {
        fs::copy(from, to).map(|_| ())
    }

    fn size(&self, path: &str) -> Result<u64, io::Error> {
        Ok(fs::metadata(path)?.len())
    }

    fn modified(&self, path: &str) -> Result<SystemTime, io::Error> {
        fs::metadata(path)?.modified()
    }
}
