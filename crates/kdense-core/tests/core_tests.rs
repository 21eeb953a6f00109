use std::fs;
use std::io::Write;
use tempfile::TempDir;

use kdense_core::error::DocumentStoreError;
use kdense_core::snapshot::SnapshotHandle;
use kdense_core::store::{ChunkingConfig, DocumentStore, LoadOptions};

#[test]
fn load_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let mut f = fs::File::create(dir.join("a.txt")).unwrap();
    writeln!(f, "Short text").unwrap();

    let store = DocumentStore::load(dir, &LoadOptions::default()).expect("load");

    assert_eq!(store.documents().len(), 1);
    assert_eq!(store.chunks().len(), 1, "one small file becomes one chunk");
    assert_eq!(store.chunks()[0].text, "Short text");
    assert_eq!(store.chunks()[0].doc_id, store.documents()[0].id);
}

#[test]
fn reads_txt_and_md_and_ignores_other_files() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.md"), "# Review\ncharlie delta").unwrap();
    fs::write(dir.join("c.csv"), "x,y").unwrap();
    fs::write(dir.join("d.pdf"), [0x25, 0x50, 0x44, 0x46]).unwrap();

    let store = DocumentStore::load(dir, &LoadOptions::default()).expect("load");

    let titles: Vec<&str> = store.documents().iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "Review"]);
}

#[test]
fn empty_and_whitespace_files_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("empty.txt"), "").unwrap();
    fs::write(dir.join("blank.md"), "  \n\n\t ").unwrap();
    fs::write(dir.join("ok.txt"), "EGFR").unwrap();

    let store = DocumentStore::load(dir, &LoadOptions::default()).expect("load");
    assert_eq!(store.documents().len(), 1);
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bin.txt"), [b'K', b'R', b'A', b'S', 0xff, b'!']).unwrap();

    let store = DocumentStore::load(tmp.path(), &LoadOptions::default()).expect("load");
    assert_eq!(store.documents().len(), 1);
    assert!(store.documents()[0].text.starts_with("KRAS"));
}

#[test]
fn subdirectories_only_read_when_recursive() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir(dir.join("nested")).unwrap();
    fs::write(dir.join("top.txt"), "top level").unwrap();
    fs::write(dir.join("nested").join("deep.txt"), "nested level").unwrap();

    let flat = DocumentStore::load(dir, &LoadOptions::default()).expect("flat");
    assert_eq!(flat.documents().len(), 1);

    let opts = LoadOptions { recursive: true, ..LoadOptions::default() };
    let deep = DocumentStore::load(dir, &opts).expect("recursive");
    assert_eq!(deep.documents().len(), 2);
}

#[test]
fn missing_directory_is_an_empty_store() {
    let tmp = TempDir::new().unwrap();
    let store = DocumentStore::load(&tmp.path().join("nope"), &LoadOptions::default()).expect("load");
    assert!(store.is_empty());
    assert!(store.chunks().is_empty());
}

#[test]
fn file_path_is_not_a_directory() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("a.txt");
    fs::write(&file, "x").unwrap();

    let err = DocumentStore::load(&file, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, DocumentStoreError::NotADirectory { .. }));
}

#[test]
fn ids_are_stable_across_loads() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "x ".repeat(400)).unwrap();
    let opts = LoadOptions { chunking: ChunkingConfig::new(200, 50).unwrap(), recursive: false };

    let first = DocumentStore::load(tmp.path(), &opts).unwrap();
    let second = DocumentStore::load(tmp.path(), &opts).unwrap();

    assert!(first.chunks().len() > 1);
    assert_eq!(first.chunks(), second.chunks());
    assert_eq!(first.documents()[0].id, second.documents()[0].id);
}

#[test]
fn snapshot_reload_swaps_without_touching_held_snapshots() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "first").unwrap();

    let handle = SnapshotHandle::new(DocumentStore::load(dir, &LoadOptions::default()).unwrap());
    let held = handle.snapshot();

    fs::write(dir.join("b.txt"), "second").unwrap();
    let n = handle.reload(dir, &LoadOptions::default()).expect("reload");

    assert_eq!(n, 2);
    assert_eq!(held.documents().len(), 1, "an in-flight snapshot never changes");
    assert_eq!(handle.snapshot().documents().len(), 2);
}

#[test]
fn failed_reload_keeps_previous_snapshot() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "first").unwrap();
    let handle = SnapshotHandle::new(DocumentStore::load(tmp.path(), &LoadOptions::default()).unwrap());

    assert!(handle.reload(&tmp.path().join("a.txt"), &LoadOptions::default()).is_err());
    assert_eq!(handle.snapshot().documents().len(), 1);
}
