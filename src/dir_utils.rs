// dir_utils.rs
use crate::storage_utils::{join_path, FileStore};
use anyhow::Result as AnyhowResult;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::UNIX_EPOCH;

/// Extensions treated as dataset files by `data_file_inventory`.
const DATA_FILE_EXTENSIONS: [&str; 5] = ["csv", "json", "jpg", "png", "zip"];

/// Creates the directory at `path`. If it already exists, all its files and
/// subdirectories are deleted first.
///
/// ```
/// use kagglekit::dir_utils::create_clean_dir;
/// use kagglekit::storage_utils::{FileStore, LocalFileStore};
/// use std::fs;
///
/// let tmp = tempfile::tempdir().unwrap();
/// let work = tmp.path().join("work");
/// fs::create_dir_all(&work).unwrap();
/// fs::write(work.join("stale.txt"), b"x").unwrap();
///
/// let store = LocalFileStore::new();
/// create_clean_dir(&store, work.to_str().unwrap()).unwrap();
/// assert!(store.list_dir(work.to_str().unwrap()).unwrap().is_empty());
/// ```
pub fn create_clean_dir<S: FileStore>(store: &S, path: &str) -> AnyhowResult<()> {
    if store.exists(path) {
        store.remove_dir_all(path)?;
    }
    store.create_dir_all(path)?;
    Ok(())
}

/// Lists the names of the immediate subdirectories of `data_dir`, except
/// those named in `exclude`.
pub fn sub_dirs<S: FileStore>(
    store: &S,
    data_dir: &str,
    exclude: &[&str],
) -> AnyhowResult<Vec<String>> {
    let mut dirs = Vec::new();
    for name in store.list_dir(data_dir)? {
        if store.is_dir(&join_path(data_dir, &name)) && !exclude.contains(&name.as_str()) {
            dirs.push(name);
        }
    }
    Ok(dirs)
}

/// Moves the files of every directory in `source_dirs` into a freshly
/// created `dest_dir`. Nothing is done when `dest_dir` already exists.
pub fn merge_dirs<S: FileStore>(
    store: &S,
    source_dirs: &[&str],
    dest_dir: &str,
) -> AnyhowResult<()> {
    if store.exists(dest_dir) {
        return Ok(());
    }
    store.create_dir_all(dest_dir)?;
    for dir in source_dirs {
        for name in store.list_dir(dir)? {
            store.rename(&join_path(dir, &name), &join_path(dest_dir, &name))?;
        }
    }
    Ok(())
}

/// Copies `source_path` to `dest_path` unless the destination already
/// exists. Returns `true` when a copy was made.
///
/// The store decides what a copy means, so with an object-store backed
/// `FileStore` this is the classic "upload once" helper for pushing local
/// artifacts to a bucket.
pub fn upload_if_absent<S: FileStore>(
    store: &S,
    source_path: &str,
    dest_path: &str,
) -> AnyhowResult<bool> {
    if store.exists(dest_path) {
        println!("Output file already exists. Skipping.");
        return Ok(false);
    }
    store.copy(source_path, dest_path)?;
    Ok(true)
}

/// Metadata for one data file found by `data_file_inventory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFileInfo {
    pub file_name: String,
    pub last_modified: String,
    pub mb_size: String,
}

/// Scans `dir` for dataset files (csv, json, jpg, png, zip) and returns
/// their names with last-modified timestamps and sizes in megabytes, for
/// quick what-is-in-this-bucket checks from a notebook.
///
/// ```
/// use kagglekit::dir_utils::data_file_inventory;
/// use kagglekit::storage_utils::LocalFileStore;
/// use std::fs;
///
/// let tmp = tempfile::tempdir().unwrap();
/// fs::write(tmp.path().join("train.csv"), b"id,label\n").unwrap();
/// fs::write(tmp.path().join("notes.txt"), b"ignored").unwrap();
///
/// let store = LocalFileStore::new();
/// let inventory = data_file_inventory(&store, tmp.path().to_str().unwrap()).unwrap();
/// assert_eq!(inventory.len(), 1);
/// assert_eq!(inventory[0].file_name, "train.csv");
/// assert_eq!(inventory[0].mb_size, "0.00");
/// ```
pub fn data_file_inventory<S: FileStore>(store: &S, dir: &str) -> AnyhowResult<Vec<DataFileInfo>> {
    let mut files = Vec::new();
    for name in store.list_dir(dir)? {
        let path = join_path(dir, &name);
        if store.is_dir(&path) {
            continue;
        }
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => continue,
        };
        if !DATA_FILE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        let size = store.size(&path)?;
        let modified = store.modified(&path)?;
        let secs = modified.duration_since(UNIX_EPOCH)?.as_secs() as i64;
        let datetime: DateTime<Utc> = Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("modified time out of range: {}", path))?;

        files.push(DataFileInfo {
            file_name: name,
            last_modified: datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            mb_size: format!("{:.2}", size as f64 / (1024.0 * 1024.0)),
        });
    }
    Ok(files)
}

/// Storage-bucket layout for a project's workspace.
///
/// An explicit value handed to whichever helper needs bucket paths, instead
/// of a module-level global: construct one per notebook session and pass it
/// around. The layout convention is `<bucket>/model/<model>` for pre-trained
/// parameters, `<bucket>/data/<project>` for datasets and
/// `<bucket>/work/<project>` for intermediate training files.
///
/// ```
/// use kagglekit::dir_utils::BucketWorkspace;
///
/// let workspace = BucketWorkspace::new("gs://my-bucket");
/// assert_eq!(workspace.model_dir("resnet50"), "gs://my-bucket/model/resnet50");
/// assert_eq!(workspace.data_dir("whales"), "gs://my-bucket/data/whales");
/// assert_eq!(workspace.work_dir("whales"), "gs://my-bucket/work/whales");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketWorkspace {
    pub bucket: String,
}

impl BucketWorkspace {
    pub fn new(bucket: &str) -> Self {
        BucketWorkspace {
            bucket: bucket.to_string(),
        }
    }

    /// Recommended directory for storing parameters of a pre-trained model.
    pub fn model_dir(&self, model: &str) -> String {
        join_path(&join_path(&self.bucket, "model"), model)
    }

    /// Recommended directory for storing a project's datasets.
    pub fn data_dir(&self, project: &str) -> String {
        join_path(&join_path(&self.bucket, "data"), project)
    }

    /// Recommended directory for intermediate files generated during
    /// training.
    pub fn work_dir(&self, project: &str) -> String {
        join_path(&join_path(&self.bucket, "work"), project)
    }
}
