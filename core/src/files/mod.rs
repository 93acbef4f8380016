//! Remote filesystem abstraction.
//!
//! [`RemoteFs`] is the capability contract a gateway (SFTP, in-memory)
//! provides. Everything above it, from the tree walker to the client, is
//! written against this trait only.

pub mod browser;
pub mod memory;
pub mod path;
pub mod walker;

use serde::{Deserialize, Serialize};

use crate::errors::FileError;

pub use browser::{FileBrowser, SharedClient};
pub use memory::MemoryFs;
pub use walker::{EntryTypes, TraversalResult, TreeWalker};

const S_IFMT: u32 = 0o170_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFREG: u32 = 0o100_000;
const S_IFLNK: u32 = 0o120_000;

/// Type of a remote object, decoded from its mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileType {
    File,
    Directory,
    Symlink,
    /// Devices, sockets, FIFOs and anything else.
    Other,
}

impl FileType {
    /// Decode the `S_IFMT` bits of a POSIX mode.
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFDIR => Self::Directory,
            S_IFREG => Self::File,
            S_IFLNK => Self::Symlink,
            _ => Self::Other,
        }
    }
}

/// Metadata of a single remote object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub file_type: FileType,
    pub size: u64,
    /// Permission bits (`0o7777` mask), when the server reports them.
    pub permissions: Option<u32>,
    /// Modification time in seconds since the Unix epoch.
    pub modified: Option<u64>,
}

impl Metadata {
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }
}

/// One immediate child of a directory, as reported by a single listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// Taken from the entry's metadata, never from its name.
    pub is_directory: bool,
}

impl ListingEntry {
    pub fn new(name: impl Into<String>, mode: u32) -> Self {
        Self {
            name: name.into(),
            is_directory: FileType::from_mode(mode) == FileType::Directory,
        }
    }
}

/// Blocking access to a remote filesystem session.
///
/// Relative paths are resolved by the gateway against its own working
/// directory. Read-only operations take `&self`; anything that mutates the
/// remote tree or the session takes `&mut self`.
pub trait RemoteFs {
    /// List the immediate children of a directory in server order.
    ///
    /// `.` and `..` are never returned. Fails when `path` is missing or is
    /// not a directory.
    fn list_children(&self, path: &str) -> Result<Vec<ListingEntry>, FileError>;

    /// Metadata for `path`. Symlinks are not followed.
    fn stat(&self, path: &str) -> Result<Metadata, FileError>;

    /// Create a single directory. The parent must already exist.
    fn mkdir(&mut self, path: &str) -> Result<(), FileError>;

    fn remove_file(&mut self, path: &str) -> Result<(), FileError>;

    /// Remove an empty directory.
    fn remove_dir(&mut self, path: &str) -> Result<(), FileError>;

    fn read_file(&self, path: &str) -> Result<Vec<u8>, FileError>;

    /// Create or truncate `path` and write `data` to it.
    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), FileError>;

    /// Absolute path of the session's working directory.
    fn current_dir(&self) -> Result<String, FileError>;

    fn change_dir(&mut self, path: &str) -> Result<(), FileError>;

    /// Replace the session with a fresh one. The old session is fully closed
    /// before the new one is opened.
    fn reconnect(&mut self) -> Result<(), FileError>;

    /// Close the session. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), FileError>;
}
