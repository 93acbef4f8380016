//! Client-level listing and mutation scenarios against the in-memory gateway.

mod common;

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use common::{tdd_memory_fs, TDD_DIRECTORIES, TDD_FILES};
use ftpclient_core::files::{ListingEntry, MemoryFs, Metadata, RemoteFs};
use ftpclient_core::{ErrorKind, FileClient, FileError};

fn tdd_client() -> FileClient<MemoryFs> {
    let mut client = FileClient::new(tdd_memory_fs("/TDD"));
    client
        .set_working_directory("/TDD", false)
        .expect("sample tree root should exist");
    client
}

#[test]
fn working_directory_is_reported_with_trailing_slash() {
    let client = tdd_client();
    assert_eq!(client.get_working_directory().unwrap(), "/TDD/");
}

#[test]
fn non_recursive_listing_of_working_directory() {
    let client = tdd_client();
    let result = client.get_files_and_directories("", false).unwrap();
    assert_eq!(result.files, vec!["1-1.txt", "1-2.txt"]);
    assert_eq!(result.directories, vec!["1-1/", "1-2/"]);
}

#[test]
fn recursive_listing_matches_expected_order() {
    let client = tdd_client();
    let result = client.get_files_and_directories("", true).unwrap();
    assert_eq!(result.files, TDD_FILES);
    assert_eq!(result.directories, TDD_DIRECTORIES);
}

#[test]
fn every_root_spelling_gives_the_same_result() {
    let client = tdd_client();
    let reference = client.get_files_and_directories("", true).unwrap();
    for root in [".", "./", "/TDD", "/TDD/"] {
        assert_eq!(
            client.get_files_and_directories(root, true).unwrap(),
            reference,
            "root {root:?}"
        );
    }
}

#[test]
fn selective_listings_agree_with_combined_listing() {
    let client = tdd_client();
    let combined = client.get_files_and_directories(".", true).unwrap();
    assert_eq!(client.get_files(".", true).unwrap(), combined.files);
    assert_eq!(client.get_directories(".", true).unwrap(), combined.directories);

    let mut contents = combined.files.clone();
    contents.extend(combined.directories.clone());
    assert_eq!(client.get_contents(".", true).unwrap(), contents);
}

#[test]
fn listing_is_a_partition_with_slash_invariant() {
    let client = tdd_client();
    let result = client.get_files_and_directories("/TDD", true).unwrap();

    let mut seen = HashSet::new();
    for entry in result.files.iter().chain(&result.directories) {
        assert!(seen.insert(entry.clone()), "duplicate entry {entry}");
    }
    assert!(result.directories.iter().all(|d| d.ends_with('/') && !d.ends_with("//")));
    assert!(result.files.iter().all(|f| !f.ends_with('/')));
}

#[test]
fn subdirectory_listing_is_relative_to_its_root() {
    let client = tdd_client();
    let result = client.get_files_and_directories("1-1/2-1", true).unwrap();
    assert_eq!(result.files, vec!["3-1.txt", "3-1/0-1.txt"]);
    assert_eq!(result.directories, vec!["3-1/", "3-1/0-1/"]);
}

#[test]
fn listing_a_file_or_missing_path_fails() {
    let client = tdd_client();
    assert_eq!(
        client.get_files("1-1.txt", false).unwrap_err().kind(),
        ErrorKind::WrongType
    );
    assert_eq!(
        client.get_directories("missing", true).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn create_directory_chain_then_collision_at_leaf() {
    let mut client = FileClient::new(MemoryFs::new());
    client.create_directory("A/B/C", false).unwrap();
    assert_eq!(
        client.get_directories("", true).unwrap(),
        vec!["A/", "A/B/", "A/B/C/"]
    );

    match client.create_directory("A/B/C", false) {
        Err(FileError::AlreadyExists(path)) => assert_eq!(path, "A/B/C"),
        other => panic!("expected AlreadyExists at the leaf, got {other:?}"),
    }
    client.create_directory("A/B/C", true).unwrap();
    client.create_directory("A/B/C", true).unwrap();
}

#[test]
fn delete_non_empty_and_missing_paths_fail() {
    let mut client = FileClient::new(MemoryFs::new());
    client.create_directory("A/B/C", true).unwrap();
    client.create_directory("A/B/C/D", true).unwrap();

    let err = client.delete("A/B/C").unwrap_err();
    assert!(matches!(err, FileError::OperationFailed(_)), "got {err:?}");
    assert!(matches!(client.delete("A/X"), Err(FileError::NotFound(_))));

    client.delete("A/B/C/D").unwrap();
    client.delete("A/B/C").unwrap();
    assert_eq!(client.get_directories("A", true).unwrap(), vec!["B/"]);
}

/// Gateway wrapper recording `mkdir` and `close` calls, observable after the
/// client is gone.
struct Recording {
    inner: MemoryFs,
    mkdirs: Rc<RefCell<Vec<String>>>,
    closes: Rc<Cell<usize>>,
}

impl RemoteFs for Recording {
    fn list_children(&self, path: &str) -> Result<Vec<ListingEntry>, FileError> {
        self.inner.list_children(path)
    }
    fn stat(&self, path: &str) -> Result<Metadata, FileError> {
        self.inner.stat(path)
    }
    fn mkdir(&mut self, path: &str) -> Result<(), FileError> {
        self.mkdirs.borrow_mut().push(path.to_string());
        self.inner.mkdir(path)
    }
    fn remove_file(&mut self, path: &str) -> Result<(), FileError> {
        self.inner.remove_file(path)
    }
    fn remove_dir(&mut self, path: &str) -> Result<(), FileError> {
        self.inner.remove_dir(path)
    }
    fn read_file(&self, path: &str) -> Result<Vec<u8>, FileError> {
        self.inner.read_file(path)
    }
    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), FileError> {
        self.inner.write_file(path, data)
    }
    fn current_dir(&self) -> Result<String, FileError> {
        self.inner.current_dir()
    }
    fn change_dir(&mut self, path: &str) -> Result<(), FileError> {
        self.inner.change_dir(path)
    }
    fn reconnect(&mut self) -> Result<(), FileError> {
        self.inner.reconnect()
    }
    fn close(&mut self) -> Result<(), FileError> {
        self.closes.set(self.closes.get() + 1);
        self.inner.close()
    }
}

fn recording_client() -> (FileClient<Recording>, Rc<RefCell<Vec<String>>>, Rc<Cell<usize>>) {
    let mkdirs = Rc::new(RefCell::new(Vec::new()));
    let closes = Rc::new(Cell::new(0));
    let gateway = Recording {
        inner: MemoryFs::new(),
        mkdirs: Rc::clone(&mkdirs),
        closes: Rc::clone(&closes),
    };
    (FileClient::new(gateway), mkdirs, closes)
}

fn counting_client() -> (FileClient<Recording>, Rc<Cell<usize>>) {
    let (client, _, closes) = recording_client();
    (client, closes)
}

#[test]
fn create_directory_makes_components_top_down() {
    let (mut client, mkdirs, _) = recording_client();
    client.create_directory("A/B/C", false).unwrap();
    assert_eq!(*mkdirs.borrow(), vec!["A", "A/B", "A/B/C"]);

    assert!(matches!(
        client.create_directory("A/B/C", false),
        Err(FileError::AlreadyExists(ref p)) if p == "A/B/C"
    ));
    client.create_directory("A/B/C/D", true).unwrap();
    assert_eq!(*mkdirs.borrow(), vec!["A", "A/B", "A/B/C", "A/B/C/D"]);
}

#[test]
fn dropping_an_open_client_closes_the_session() {
    let (client, closes) = counting_client();
    drop(client);
    assert_eq!(closes.get(), 1);
}

#[test]
fn explicit_close_is_not_repeated_on_drop() {
    let (client, closes) = counting_client();
    client.close().unwrap();
    assert_eq!(closes.get(), 1);
}

#[test]
fn session_is_closed_on_early_error_return() {
    fn failing_job(closes: &mut Option<Rc<Cell<usize>>>) -> Result<(), FileError> {
        let (mut client, counter) = counting_client();
        *closes = Some(counter);
        client.create_directory("work", true)?;
        client.delete("does-not-exist")?;
        client.close()
    }

    let mut closes = None;
    assert!(failing_job(&mut closes).is_err());
    assert_eq!(closes.unwrap().get(), 1);
}
