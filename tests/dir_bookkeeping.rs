//! Integration tests for directory bookkeeping and the file-store seam.

use kagglekit::dir_utils::{
    create_clean_dir, data_file_inventory, merge_dirs, sub_dirs, upload_if_absent, BucketWorkspace,
};
use kagglekit::storage_utils::{FileStore, LocalFileStore};
use std::fs;
use std::path::Path;

fn touch(path: &Path) {
    fs::write(path, b"x").unwrap();
}

#[test]
fn create_clean_dir_empties_an_existing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let work = tmp.path().join("work");
    fs::create_dir_all(work.join("nested")).unwrap();
    touch(&work.join("stale.csv"));
    touch(&work.join("nested/also_stale.csv"));

    let store = LocalFileStore::new();
    create_clean_dir(&store, work.to_str().unwrap()).unwrap();

    assert!(store.is_dir(work.to_str().unwrap()));
    assert!(store.list_dir(work.to_str().unwrap()).unwrap().is_empty());
}

#[test]
fn create_clean_dir_creates_a_missing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let work = tmp.path().join("brand/new/dir");

    let store = LocalFileStore::new();
    create_clean_dir(&store, work.to_str().unwrap()).unwrap();
    assert!(store.is_dir(work.to_str().unwrap()));
}

#[test]
fn sub_dirs_skips_files_and_excluded_names() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("train")).unwrap();
    fs::create_dir_all(tmp.path().join("test")).unwrap();
    fs::create_dir_all(tmp.path().join("scratch")).unwrap();
    touch(&tmp.path().join("labels.csv"));

    let store = LocalFileStore::new();
    let dirs = sub_dirs(&store, tmp.path().to_str().unwrap(), &["scratch"]).unwrap();
    assert_eq!(dirs, vec!["test".to_string(), "train".to_string()]);
}

#[test]
fn merge_dirs_moves_sources_into_a_new_destination() {
    let tmp = tempfile::tempdir().unwrap();
    let part1 = tmp.path().join("part1");
    let part2 = tmp.path().join("part2");
    fs::create_dir_all(&part1).unwrap();
    fs::create_dir_all(&part2).unwrap();
    touch(&part1.join("a.jpg"));
    touch(&part2.join("b.jpg"));
    let dest = tmp.path().join("merged");

    let store = LocalFileStore::new();
    merge_dirs(
        &store,
        &[part1.to_str().unwrap(), part2.to_str().unwrap()],
        dest.to_str().unwrap(),
    )
    .unwrap();

    let merged = store.list_dir(dest.to_str().unwrap()).unwrap();
    assert_eq!(merged, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
    assert!(store.list_dir(part1.to_str().unwrap()).unwrap().is_empty());
}

#[test]
fn merge_dirs_is_a_no_op_when_destination_exists() {
    let tmp = tempfile::tempdir().unwrap();
    let part1 = tmp.path().join("part1");
    fs::create_dir_all(&part1).unwrap();
    touch(&part1.join("a.jpg"));
    let dest = tmp.path().join("merged");
    fs::create_dir_all(&dest).unwrap();

    let store = LocalFileStore::new();
    merge_dirs(&store, &[part1.to_str().unwrap()], dest.to_str().unwrap()).unwrap();

    // Source untouched, destination still empty.
    assert_eq!(
        store.list_dir(part1.to_str().unwrap()).unwrap(),
        vec!["a.jpg".to_string()]
    );
    assert!(store.list_dir(dest.to_str().unwrap()).unwrap().is_empty());
}

#[test]
fn upload_if_absent_copies_once() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("weights.zip");
    fs::write(&source, b"v1").unwrap();
    let dest = tmp.path().join("uploaded.zip");

    let store = LocalFileStore::new();
    let copied =
        upload_if_absent(&store, source.to_str().unwrap(), dest.to_str().unwrap()).unwrap();
    assert!(copied);
    assert_eq!(fs::read(&dest).unwrap(), b"v1");

    // Second call leaves the existing destination alone.
    fs::write(&source, b"v2").unwrap();
    let copied =
        upload_if_absent(&store, source.to_str().unwrap(), dest.to_str().unwrap()).unwrap();
    assert!(!copied);
    assert_eq!(fs::read(&dest).unwrap(), b"v1");
}

#[test]
fn data_file_inventory_reports_dataset_files() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("train.csv"), vec![b'x'; 2048]).unwrap();
    touch(&tmp.path().join("img.jpg"));
    touch(&tmp.path().join("notes.txt"));
    fs::create_dir_all(tmp.path().join("archive.zip")).unwrap(); // directory, skipped

    let store = LocalFileStore::new();
    let inventory = data_file_inventory(&store, tmp.path().to_str().unwrap()).unwrap();

    let names: Vec<&str> = inventory.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["img.jpg", "train.csv"]);

    for info in &inventory {
        assert_eq!(info.mb_size, "0.00");
        // "%Y-%m-%d %H:%M:%S"
        assert_eq!(info.last_modified.len(), 19);
    }
}

#[test]
fn bucket_workspace_layout() {
    let workspace = BucketWorkspace::new("gs://my-bucket");
    assert_eq!(workspace.model_dir("resnet50"), "gs://my-bucket/model/resnet50");
    assert_eq!(workspace.data_dir("whales"), "gs://my-bucket/data/whales");
    assert_eq!(workspace.work_dir("whales"), "gs://my-bucket/work/whales");

    // Trailing slash on the bucket collapses.
    let workspace = BucketWorkspace::new("gs://my-bucket/");
    assert_eq!(workspace.data_dir("whales"), "gs://my-bucket/data/whales");
}

#[test]
fn glob_matches_wildcards_within_one_segment() {
    let tmp = tempfile::tempdir().unwrap();
    touch(&tmp.path().join("a.jpg"));
    touch(&tmp.path().join("ab.jpg"));
    touch(&tmp.path().join("a.jpeg"));
    touch(&tmp.path().join("axjpg"));
    touch(&tmp.path().join("b.png"));
    let root = tmp.path().to_str().unwrap().to_string();

    let store = LocalFileStore::new();
    let jpgs = store.glob(&root, "*.jpg").unwrap();
    assert_eq!(
        jpgs,
        vec![format!("{}/a.jpg", root), format!("{}/ab.jpg", root)]
    );

    let single = store.glob(&root, "?.jpg").unwrap();
    assert_eq!(single, vec![format!("{}/a.jpg", root)]);

    // The dot in the pattern is literal, so "axjpg" does not match "a.jpg".
    let exact = store.glob(&root, "a.jpg").unwrap();
    assert_eq!(exact, vec![format!("{}/a.jpg", root)]);
}
