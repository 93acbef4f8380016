//! In-memory [`RemoteFs`] for tests and offline use.
//!
//! Directories keep their children in insertion order, which stands in for
//! the server's listing order.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use super::path;
use super::{FileType, ListingEntry, Metadata, RemoteFs};
use crate::errors::{FileError, SessionError};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Directory(Vec<String>),
    Symlink(String),
}

impl Node {
    fn metadata(&self) -> Metadata {
        let (file_type, size, permissions) = match self {
            Node::File(data) => (FileType::File, data.len() as u64, 0o644),
            Node::Directory(_) => (FileType::Directory, 4096, 0o755),
            Node::Symlink(target) => (FileType::Symlink, target.len() as u64, 0o777),
        };
        Metadata {
            file_type,
            size,
            permissions: Some(permissions),
            modified: None,
        }
    }
}

/// A remote filesystem held entirely in memory.
///
/// Starts with an empty root directory and `/` as working directory.
#[derive(Debug)]
pub struct MemoryFs {
    nodes: HashMap<String, Node>,
    cwd: String,
    denied: HashSet<String>,
    listing_calls: Cell<usize>,
    reconnects: usize,
    closed: bool,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert("/".to_string(), Node::Directory(Vec::new()));
        Self {
            nodes,
            cwd: "/".to_string(),
            denied: HashSet::new(),
            listing_calls: Cell::new(0),
            reconnects: 0,
            closed: false,
        }
    }

    /// Add a directory, creating missing parents.
    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        let abs = path::resolve(&self.cwd, path);
        self.ensure_dir_chain(&abs);
        self
    }

    /// Add or replace a file, creating missing parent directories.
    pub fn add_file(&mut self, path: &str, data: &[u8]) -> &mut Self {
        let abs = path::resolve(&self.cwd, path);
        self.insert_node(&abs, Node::File(data.to_vec()));
        self
    }

    /// Add a symlink, creating missing parent directories. The target is not
    /// checked and is never followed.
    pub fn add_symlink(&mut self, path: &str, target: &str) -> &mut Self {
        let abs = path::resolve(&self.cwd, path);
        self.insert_node(&abs, Node::Symlink(target.to_string()));
        self
    }

    /// Make every operation on `path` itself fail with `PermissionDenied`.
    pub fn deny(&mut self, path: &str) -> &mut Self {
        let abs = path::resolve(&self.cwd, path);
        self.denied.insert(abs);
        self
    }

    /// Number of `list_children` calls served so far.
    pub fn listing_calls(&self) -> usize {
        self.listing_calls.get()
    }

    pub fn reconnects(&self) -> usize {
        self.reconnects
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Contents of a file, if `path` names one.
    pub fn file_contents(&self, path: &str) -> Option<&[u8]> {
        match self.nodes.get(&path::resolve(&self.cwd, path)) {
            Some(Node::File(data)) => Some(data),
            _ => None,
        }
    }

    fn ensure_dir_chain(&mut self, abs: &str) {
        for prefix in path::ancestors(abs) {
            if !matches!(self.nodes.get(&prefix), Some(Node::Directory(_))) {
                self.insert_node(&prefix, Node::Directory(Vec::new()));
            }
        }
    }

    fn insert_node(&mut self, abs: &str, node: Node) {
        if abs == "/" {
            return;
        }
        let parent = path::parent(abs).unwrap_or("/").to_string();
        self.ensure_dir_chain(&parent);
        let name = path::file_name(abs).to_string();
        if let Some(Node::Directory(children)) = self.nodes.get_mut(&parent) {
            if !children.contains(&name) {
                children.push(name);
            }
        }
        self.nodes.insert(abs.to_string(), node);
    }

    fn remove_node(&mut self, abs: &str) {
        self.nodes.remove(abs);
        let parent = path::parent(abs).unwrap_or("/");
        let name = path::file_name(abs);
        if let Some(Node::Directory(children)) = self.nodes.get_mut(parent) {
            children.retain(|child| child != name);
        }
    }

    /// Resolve `path` for an operation, enforcing session state and denials.
    fn checked(&self, path: &str) -> Result<String, FileError> {
        if self.closed {
            return Err(SessionError::Closed.into());
        }
        let abs = path::resolve(&self.cwd, path);
        if self.denied.contains(&abs) {
            return Err(FileError::PermissionDenied(abs));
        }
        Ok(abs)
    }
}

impl RemoteFs for MemoryFs {
    fn list_children(&self, path: &str) -> Result<Vec<ListingEntry>, FileError> {
        let abs = self.checked(path)?;
        self.listing_calls.set(self.listing_calls.get() + 1);
        match self.nodes.get(&abs) {
            Some(Node::Directory(children)) => Ok(children
                .iter()
                .map(|name| {
                    let child = path::join(&abs, name);
                    ListingEntry {
                        name: name.clone(),
                        is_directory: matches!(self.nodes.get(&child), Some(Node::Directory(_))),
                    }
                })
                .collect()),
            Some(_) => Err(FileError::NotADirectory(abs)),
            None => Err(FileError::DirectoryNotExist(abs)),
        }
    }

    fn stat(&self, path: &str) -> Result<Metadata, FileError> {
        let abs = self.checked(path)?;
        self.nodes
            .get(&abs)
            .map(Node::metadata)
            .ok_or(FileError::NotFound(abs))
    }

    fn mkdir(&mut self, path: &str) -> Result<(), FileError> {
        let abs = self.checked(path)?;
        if self.nodes.contains_key(&abs) {
            return Err(FileError::AlreadyExists(abs));
        }
        let parent = path::parent(&abs).unwrap_or("/");
        match self.nodes.get(parent) {
            Some(Node::Directory(_)) => {}
            Some(_) => return Err(FileError::NotADirectory(parent.to_string())),
            None => return Err(FileError::DirectoryNotExist(parent.to_string())),
        }
        self.insert_node(&abs, Node::Directory(Vec::new()));
        Ok(())
    }

    fn remove_file(&mut self, path: &str) -> Result<(), FileError> {
        let abs = self.checked(path)?;
        match self.nodes.get(&abs) {
            Some(Node::Directory(_)) => Err(FileError::NotAFile(abs)),
            Some(_) => {
                self.remove_node(&abs);
                Ok(())
            }
            None => Err(FileError::FileNotExist(abs)),
        }
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), FileError> {
        let abs = self.checked(path)?;
        match self.nodes.get(&abs) {
            Some(Node::Directory(children)) if !children.is_empty() => Err(
                FileError::OperationFailed(format!("{abs}: directory not empty")),
            ),
            Some(Node::Directory(_)) if abs == "/" => Err(FileError::OperationFailed(
                "/: cannot remove root directory".to_string(),
            )),
            Some(Node::Directory(_)) => {
                self.remove_node(&abs);
                Ok(())
            }
            Some(_) => Err(FileError::NotADirectory(abs)),
            None => Err(FileError::DirectoryNotExist(abs)),
        }
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, FileError> {
        let abs = self.checked(path)?;
        match self.nodes.get(&abs) {
            Some(Node::File(data)) => Ok(data.clone()),
            Some(_) => Err(FileError::NotAFile(abs)),
            None => Err(FileError::FileNotExist(abs)),
        }
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), FileError> {
        let abs = self.checked(path)?;
        let parent = path::parent(&abs).unwrap_or("/");
        match self.nodes.get(parent) {
            Some(Node::Directory(_)) => {}
            Some(_) => return Err(FileError::NotADirectory(parent.to_string())),
            None => return Err(FileError::DirectoryNotExist(parent.to_string())),
        }
        if matches!(self.nodes.get(&abs), Some(Node::Directory(_))) {
            return Err(FileError::NotAFile(abs));
        }
        self.insert_node(&abs, Node::File(data.to_vec()));
        Ok(())
    }

    fn current_dir(&self) -> Result<String, FileError> {
        if self.closed {
            return Err(SessionError::Closed.into());
        }
        Ok(self.cwd.clone())
    }

    fn change_dir(&mut self, path: &str) -> Result<(), FileError> {
        let abs = self.checked(path)?;
        match self.nodes.get(&abs) {
            Some(Node::Directory(_)) => {
                self.cwd = abs;
                Ok(())
            }
            Some(_) => Err(FileError::NotADirectory(abs)),
            None => Err(FileError::DirectoryNotExist(abs)),
        }
    }

    fn reconnect(&mut self) -> Result<(), FileError> {
        self.closed = false;
        self.cwd = "/".to_string();
        self.reconnects += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), FileError> {
        self.closed = true;
        Ok(())
    }
}
