// dataset_utils.rs
use crate::storage_utils::{join_path, FileStore};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use thiserror::Error;

/// Errors surfaced by dataset discovery. Operations are all-or-nothing: no
/// partial result is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The requested data directory does not exist.
    #[error("data directory not found: {0}")]
    NotFound(String),
    /// A manifest row's label value has no entry in the supplied label set.
    #[error("label '{0}' not present in the label set")]
    MissingLabel(String),
    /// The manifest lacks a required column.
    #[error("manifest column '{0}' not found")]
    MalformedManifest(String),
    /// The same label name was supplied twice.
    #[error("duplicate label name '{0}'")]
    DuplicateLabel(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// An ordered, duplicate-free sequence of label names. The position of a
/// name within the set is its integer label index, the numeric target
/// representation used throughout discovery results.
///
/// ```
/// use kagglekit::dataset_utils::LabelSet;
///
/// let labels = LabelSet::new(vec!["cat".to_string(), "dog".to_string()]).unwrap();
/// assert_eq!(labels.index_of("dog"), Some(1));
/// assert_eq!(labels.get(0), Some("cat"));
///
/// // Observed values are deduplicated and sorted lexicographically, so the
/// // index assignment is deterministic across runs.
/// let derived = LabelSet::from_observed(vec![
///     "dog".to_string(),
///     "cat".to_string(),
///     "cat".to_string(),
/// ]);
/// assert_eq!(derived.names(), &["cat".to_string(), "dog".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    names: Vec<String>,
}

impl LabelSet {
    /// Builds a label set from an explicit ordering. Position defines the
    /// label index. Fails with `DuplicateLabel` if a name repeats.
    pub fn new(names: Vec<String>) -> Result<Self, DiscoveryError> {
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.clone()) {
                return Err(DiscoveryError::DuplicateLabel(name.clone()));
            }
        }
        Ok(LabelSet { names })
    }

    /// Builds a label set from observed label values: distinct values sorted
    /// lexicographically. This is the canonical index-assignment rule for
    /// manifests without an explicit label set.
    pub fn from_observed(values: Vec<String>) -> Self {
        let distinct: BTreeSet<String> = values.into_iter().collect();
        LabelSet {
            names: distinct.into_iter().collect(),
        }
    }

    /// The label names, in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of `name`, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Name at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A discovered file path paired with its integer label index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub label_index: usize,
}

/// The outcome of a labeled discovery run: parallel `paths` and
/// `label_indices` vectors plus the label set that assigned the indices.
/// The two vectors always have the same length and stay pointwise paired
/// through shuffling. A result is plain data handed to the caller's data
/// loading pipeline; this library never caches or mutates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub paths: Vec<String>,
    pub label_indices: Vec<usize>,
    pub labels: LabelSet,
}

impl DiscoveryResult {
    /// Number of discovered files.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The paths and indices re-zipped into records.
    pub fn records(&self) -> Vec<FileRecord> {
        self.paths
            .iter()
            .zip(&self.label_indices)
            .map(|(path, index)| FileRecord {
                path: path.clone(),
                label_index: *index,
            })
            .collect()
    }
}

/// Options for directory-tree and unlabeled discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Only files with this extension are discovered. Default: "jpg".
    pub file_ext: String,
    /// Whether to shuffle the result. Default: false.
    pub shuffle: bool,
    /// Seed for a reproducible shuffle; `None` draws from OS entropy.
    pub shuffle_seed: Option<u64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            file_ext: "jpg".to_string(),
            shuffle: false,
            shuffle_seed: None,
        }
    }
}

/// Options for manifest discovery.
#[derive(Debug, Clone)]
pub struct ManifestConfig {
    /// Manifest column holding the item identifier. Default: "id".
    pub id_column: String,
    /// Manifest column holding the label value. Default: "label".
    pub label_column: String,
    /// Extension appended to each identifier. Default: "jpg".
    pub file_ext: String,
    /// Whether to shuffle the result. Default: false.
    pub shuffle: bool,
    /// Seed for a reproducible shuffle; `None` draws from OS entropy.
    pub shuffle_seed: Option<u64>,
    /// Predetermined label set. When `None`, the set is derived from the
    /// manifest's distinct label values, sorted lexicographically.
    pub explicit_labels: Option<LabelSet>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            id_column: "id".to_string(),
            label_column: "label".to_string(),
            file_ext: "jpg".to_string(),
            shuffle: false,
            shuffle_seed: None,
            explicit_labels: None,
        }
    }
}

/// Applies one uniform random permutation to `paths` and `labels` together,
/// preserving the pointwise pairing between the two sequences. This is the
/// only way labeled results are ever reordered.
pub fn shuffle_paths_labels(
    paths: Vec<String>,
    labels: Vec<usize>,
    rng: &mut impl Rng,
) -> (Vec<String>, Vec<usize>) {
    let mut zipped: Vec<(String, usize)> = paths.into_iter().zip(labels).collect();
    zipped.shuffle(rng);
    zipped.into_iter().unzip()
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Maps a dataset directory layout or a label manifest into parallel lists
/// of file paths and integer label indices. Each operation is a single-shot,
/// read-only transformation; no state persists across calls.
pub struct DatasetIndexer;

impl DatasetIndexer {
    /// Finds all files with the configured extension in the label-named
    /// subdirectories of `data_dir`, assigning each file the index of its
    /// label in `label_names`.
    ///
    /// Paths come out in label order, sub-ordered however the store lists
    /// them. A label subdirectory that does not exist contributes zero
    /// files rather than an error; a missing `data_dir` fails with
    /// `NotFound`.
    ///
    /// ```
    /// use kagglekit::dataset_utils::{DatasetIndexer, DiscoveryConfig};
    /// use kagglekit::storage_utils::LocalFileStore;
    /// use std::fs;
    ///
    /// let tmp = tempfile::tempdir().unwrap();
    /// fs::create_dir_all(tmp.path().join("cat")).unwrap();
    /// fs::create_dir_all(tmp.path().join("dog")).unwrap();
    /// fs::write(tmp.path().join("cat/a.jpg"), b"x").unwrap();
    /// fs::write(tmp.path().join("cat/b.jpg"), b"x").unwrap();
    /// fs::write(tmp.path().join("dog/c.jpg"), b"x").unwrap();
    ///
    /// let store = LocalFileStore::new();
    /// let result = DatasetIndexer::find_files(
    ///     &store,
    ///     tmp.path().to_str().unwrap(),
    ///     vec!["cat", "dog"],
    ///     &DiscoveryConfig::default(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(result.label_indices, vec![0, 0, 1]);
    /// assert!(result.paths[0].ends_with("cat/a.jpg"));
    /// assert!(result.paths[2].ends_with("dog/c.jpg"));
    /// ```
    pub fn find_files<S: FileStore>(
        store: &S,
        data_dir: &str,
        label_names: Vec<&str>,
        config: &DiscoveryConfig,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        if !store.exists(data_dir) {
            return Err(DiscoveryError::NotFound(data_dir.to_string()));
        }

        let labels = LabelSet::new(label_names.iter().map(|s| s.to_string()).collect())?;
        let pattern = format!("*.{}", config.file_ext);

        let mut paths = Vec::new();
        let mut label_indices = Vec::new();
        for (index, name) in labels.names().iter().enumerate() {
            let label_dir = join_path(data_dir, name);
            // Missing label subdirectory contributes zero files.
            if !store.is_dir(&label_dir) {
                continue;
            }
            let matching = store.glob(&label_dir, &pattern)?;
            label_indices.extend(std::iter::repeat(index).take(matching.len()));
            paths.extend(matching);
        }

        if config.shuffle {
            let mut rng = rng_for(config.shuffle_seed);
            let (p, l) = shuffle_paths_labels(paths, label_indices, &mut rng);
            paths = p;
            label_indices = l;
        }

        Ok(DiscoveryResult {
            paths,
            label_indices,
            labels,
        })
    }

    /// Finds files through a CSV manifest that maps item identifiers to
    /// label values, Kaggle `train_labels.csv` style.
    ///
    /// Each row becomes the path `data_dir/<id>.<file_ext>` in manifest row
    /// order. The label set is either `config.explicit_labels` or the
    /// manifest's distinct label values sorted lexicographically, and is
    /// returned on the result so the caller can map indices back to names.
    /// A row whose label value is absent from an explicitly supplied set
    /// fails with `MissingLabel`; a missing id or label column fails with
    /// `MalformedManifest`. Constructed paths are never checked for
    /// existence.
    ///
    /// ```
    /// use kagglekit::dataset_utils::{DatasetIndexer, ManifestConfig};
    /// use std::fs;
    ///
    /// let tmp = tempfile::tempdir().unwrap();
    /// let manifest = tmp.path().join("train_labels.csv");
    /// fs::write(&manifest, "id,label\n1,dog\n2,cat\n3,cat\n").unwrap();
    ///
    /// let result = DatasetIndexer::find_files_with_manifest(
    ///     "root",
    ///     manifest.to_str().unwrap(),
    ///     &ManifestConfig::default(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(result.labels.names(), &["cat".to_string(), "dog".to_string()]);
    /// assert_eq!(result.paths, vec!["root/1.jpg", "root/2.jpg", "root/3.jpg"]);
    /// assert_eq!(result.label_indices, vec![1, 0, 0]);
    /// ```
    pub fn find_files_with_manifest(
        data_dir: &str,
        manifest_path: &str,
        config: &ManifestConfig,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        let file = File::open(manifest_path)?;
        let mut rdr = csv::Reader::from_reader(file);

        let headers = rdr.headers()?.clone();
        let id_idx = headers
            .iter()
            .position(|h| h == config.id_column)
            .ok_or_else(|| DiscoveryError::MalformedManifest(config.id_column.clone()))?;
        let label_idx = headers
            .iter()
            .position(|h| h == config.label_column)
            .ok_or_else(|| DiscoveryError::MalformedManifest(config.label_column.clone()))?;

        let mut ids = Vec::new();
        let mut label_values = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let id = record
                .get(id_idx)
                .ok_or_else(|| DiscoveryError::MalformedManifest(config.id_column.clone()))?;
            let value = record
                .get(label_idx)
                .ok_or_else(|| DiscoveryError::MalformedManifest(config.label_column.clone()))?;
            ids.push(id.to_string());
            label_values.push(value.to_string());
        }

        let labels = match &config.explicit_labels {
            Some(set) => set.clone(),
            None => LabelSet::from_observed(label_values.clone()),
        };
        let index_by_name: HashMap<&str, usize> = labels
            .names()
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();

        let mut paths = Vec::with_capacity(ids.len());
        let mut label_indices = Vec::with_capacity(ids.len());
        for (id, value) in ids.iter().zip(&label_values) {
            let index = *index_by_name
                .get(value.as_str())
                .ok_or_else(|| DiscoveryError::MissingLabel(value.clone()))?;
            paths.push(join_path(data_dir, &format!("{}.{}", id, config.file_ext)));
            label_indices.push(index);
        }

        if config.shuffle {
            let mut rng = rng_for(config.shuffle_seed);
            let (p, l) = shuffle_paths_labels(paths, label_indices, &mut rng);
            paths = p;
            label_indices = l;
        }

        Ok(DiscoveryResult {
            paths,
            label_indices,
            labels,
        })
    }

    /// Finds files with the configured extension directly under `data_dir`,
    /// with no label assignment. Optionally shuffled.
    pub fn find_files_no_label<S: FileStore>(
        store: &S,
        data_dir: &str,
        config: &DiscoveryConfig,
    ) -> Result<Vec<String>, DiscoveryError> {
        if !store.exists(data_dir) {
            return Err(DiscoveryError::NotFound(data_dir.to_string()));
        }
        let mut paths = store.glob(data_dir, &format!("*.{}", config.file_ext))?;
        if config.shuffle {
            paths.shuffle(&mut rng_for(config.shuffle_seed));
        }
        Ok(paths)
    }
}
