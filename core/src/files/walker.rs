//! Directory tree enumeration over a [`RemoteFs`].
//!
//! A walk lists the traversal root with one gateway call, classifies each
//! child by its metadata and, when recursive, descends into every directory
//! with one further listing per directory. All reported paths are relative
//! to the root the caller supplied; directories carry a trailing `/`.
//!
//! # Ordering
//!
//! Each level emits its own entries before any descendant entry:
//!
//! - files: the level's own files, then the complete file output of each
//!   child directory in listing order;
//! - directories: the level's own directories, then the complete directory
//!   output of each child directory in listing order.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::path;
use super::RemoteFs;
use crate::errors::FileError;

/// Which kinds of entries a walk collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTypes {
    pub files: bool,
    pub directories: bool,
}

impl EntryTypes {
    pub fn files_only() -> Self {
        Self {
            files: true,
            directories: false,
        }
    }

    pub fn directories_only() -> Self {
        Self {
            files: false,
            directories: true,
        }
    }

    pub fn all() -> Self {
        Self {
            files: true,
            directories: true,
        }
    }
}

impl Default for EntryTypes {
    fn default() -> Self {
        Self::all()
    }
}

/// Files and directories found by a walk, relative to the traversal root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalResult {
    pub files: Vec<String>,
    /// Every entry ends with exactly one `/`.
    pub directories: Vec<String>,
}

impl TraversalResult {
    /// Files followed by directories, as a single sequence.
    pub fn into_contents(self) -> Vec<String> {
        let mut contents = self.files;
        contents.extend(self.directories);
        contents
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

/// Walks a remote directory tree through a [`RemoteFs`].
///
/// ```
/// use ftpclient_core::files::{EntryTypes, MemoryFs, TreeWalker};
///
/// let mut fs = MemoryFs::new();
/// fs.add_file("/data/a.txt", b"a").add_file("/data/sub/b.txt", b"b");
///
/// let result = TreeWalker::new(&fs)
///     .recursive(true)
///     .entry_types(EntryTypes::all())
///     .walk("/data")
///     .unwrap();
/// assert_eq!(result.files, vec!["a.txt", "sub/b.txt"]);
/// assert_eq!(result.directories, vec!["sub/"]);
/// ```
pub struct TreeWalker<'a, G: RemoteFs + ?Sized> {
    fs: &'a G,
    recursive: bool,
    entry_types: EntryTypes,
}

impl<'a, G: RemoteFs + ?Sized> TreeWalker<'a, G> {
    /// Non-recursive walker collecting both files and directories.
    pub fn new(fs: &'a G) -> Self {
        Self {
            fs,
            recursive: false,
            entry_types: EntryTypes::all(),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn entry_types(mut self, entry_types: EntryTypes) -> Self {
        self.entry_types = entry_types;
        self
    }

    /// Enumerate `root`. A failed listing anywhere aborts the whole walk.
    pub fn walk(&self, root: &str) -> Result<TraversalResult, FileError> {
        debug!(
            root,
            recursive = self.recursive,
            files = self.entry_types.files,
            directories = self.entry_types.directories,
            "Walking remote tree"
        );
        let result = self.walk_level(root, "")?;
        debug!(
            root,
            files = result.files.len(),
            directories = result.directories.len(),
            "Walk finished"
        );
        Ok(result)
    }

    /// List one directory, `prefix` below `root`, and its subtree.
    fn walk_level(&self, root: &str, prefix: &str) -> Result<TraversalResult, FileError> {
        let target = path::listing_target(root, prefix);
        let children = self.fs.list_children(&target)?;
        debug!(target = %target, count = children.len(), "Listed directory");

        let mut files = Vec::new();
        // Own directories are always gathered: recursion needs them even
        // when the caller only wants files.
        let mut directories = Vec::new();
        for child in children {
            trace!(name = %child.name, is_directory = child.is_directory, "Entry");
            if child.is_directory {
                directories.push(path::join(prefix, &path::as_directory(&child.name)));
            } else if self.entry_types.files {
                files.push(path::join(prefix, &child.name));
            }
        }

        let mut descendants = Vec::new();
        if self.recursive {
            for directory in &directories {
                let subtree = self.walk_level(root, directory)?;
                files.extend(subtree.files);
                if self.entry_types.directories {
                    descendants.extend(subtree.directories);
                }
            }
        }

        if self.entry_types.directories {
            directories.extend(descendants);
        } else {
            directories.clear();
        }

        Ok(TraversalResult { files, directories })
    }
}
