// lib.rs
//! # KAGGLEKIT
//!
//! Convenience helpers for machine-learning experimentation notebooks 🧪 ...
//! the boring glue between "I downloaded a dataset" and "my training loop
//! has paths and labels", kept small, synchronous and notebook-friendly. 🚀
//!
//! ## `dataset_utils`
//!
//! - **Purpose**: Turn a labeled directory tree or a Kaggle-style `id,label`
//!   CSV manifest into parallel lists of file paths and integer label
//!   indices for a training pipeline.
//! - **Features**:
//!   - **DatasetIndexer**: Discover files by label-named subdirectories
//!     (`find_files`), by CSV manifest (`find_files_with_manifest`), or
//!     without labels (`find_files_no_label`).
//!   - **LabelSet**: Ordered, duplicate-free label names; position defines
//!     the integer label index. Derived sets are deduplicated and sorted
//!     lexicographically so index assignment is deterministic across runs.
//!   - **Consistent shuffling**: One uniform random permutation applied to
//!     paths and labels together so the pairing never breaks, with an
//!     optional seed for reproducible epochs.
//!   - **Typed errors**: `NotFound`, `MissingLabel`, `MalformedManifest`
//!     and friends, surfaced immediately with no partial results.
//!
//! ## `storage_utils`
//!
//! - **Purpose**: The file-tree seam everything else goes through.
//! - **Features**:
//!   - **FileStore**: A small trait (exists / list / glob / copy / rename /
//!     size / modified and friends) so discovery and bookkeeping run
//!     unchanged against a local filesystem or an adapter over a remote
//!     object store.
//!   - **LocalFileStore**: The local-filesystem implementation, with
//!     name-ordered listings for reproducible runs.
//!
//! ## `dir_utils`
//!
//! - **Purpose**: Directory bookkeeping chores around dataset wrangling.
//! - **Features**:
//!   - `create_clean_dir`, `sub_dirs`, `merge_dirs` for shaping dataset
//!     directories.
//!   - `upload_if_absent` for push-once artifact copies.
//!   - `data_file_inventory` for a quick listing of dataset files with
//!     timestamps and sizes.
//!   - **BucketWorkspace**: The `model/` / `data/<project>` /
//!     `work/<project>` bucket layout as an explicit value you pass around,
//!     not a global.
//!
//! ## License
//!
//! This project is licensed under the MIT License.

pub mod dataset_utils;
pub mod dir_utils;
pub mod storage_utils;
