//! Remote file client built on a [`RemoteFs`] gateway.
//!
//! [`FileClient`] owns exactly one gateway session and issues one remote call
//! at a time. It is released with [`FileClient::close()`]; a client dropped
//! without being closed closes its session during drop.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::FileError;
use crate::files::path;
use crate::files::{EntryTypes, FileType, Metadata, RemoteFs, TraversalResult, TreeWalker};

/// Client for a remote filesystem session.
pub struct FileClient<G: RemoteFs> {
    gateway: G,
    /// Last directory passed to `set_working_directory`, restored on reconnect.
    working_dir: Option<String>,
    closed: bool,
}

impl<G: RemoteFs> FileClient<G> {
    /// Wrap an already connected gateway.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            working_dir: None,
            closed: false,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // --- Working directory ---

    /// Change the working directory, creating it first when
    /// `create_directory` is set.
    pub fn set_working_directory(
        &mut self,
        remote_path: &str,
        create_directory: bool,
    ) -> Result<(), FileError> {
        if create_directory {
            self.create_directory(remote_path, true)?;
        }
        self.gateway.change_dir(remote_path)?;
        let cwd = self.gateway.current_dir()?;
        debug!(cwd = %cwd, "Working directory changed");
        self.working_dir = Some(cwd);
        Ok(())
    }

    /// Absolute working directory, always ending in `/`.
    pub fn get_working_directory(&self) -> Result<String, FileError> {
        Ok(path::as_directory(&self.gateway.current_dir()?))
    }

    // --- Existence and type queries ---

    pub fn stat(&self, remote_path: &str) -> Result<Metadata, FileError> {
        self.gateway.stat(remote_path)
    }

    /// `true` if something exists at the path. Only a not-found condition
    /// maps to `false`; any other failure is returned.
    pub fn exists(&self, remote_path: &str) -> Result<bool, FileError> {
        match self.gateway.stat(remote_path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fails with `DirectoryNotExist` when nothing exists at the path.
    pub fn is_directory(&self, remote_path: &str) -> Result<bool, FileError> {
        match self.gateway.stat(remote_path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.is_not_found() => {
                Err(FileError::DirectoryNotExist(remote_path.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Fails with `FileNotExist` when nothing exists at the path.
    pub fn is_file(&self, remote_path: &str) -> Result<bool, FileError> {
        match self.gateway.stat(remote_path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.is_not_found() => Err(FileError::FileNotExist(remote_path.to_string())),
            Err(e) => Err(e),
        }
    }

    // --- Mutations ---

    /// Create `remote_path` and any missing parents, top-down.
    ///
    /// An existing directory at the full path is an error only when
    /// `exist_ok` is false; existing intermediate directories never are.
    /// Each component is checked and then created, so a concurrent remote
    /// change between the two calls surfaces as a gateway error.
    pub fn create_directory(&mut self, remote_path: &str, exist_ok: bool) -> Result<(), FileError> {
        let prefixes = path::ancestors(remote_path);
        let Some(leaf) = prefixes.last().cloned() else {
            // The working directory or `/`: it always exists.
            return if exist_ok {
                Ok(())
            } else {
                Err(FileError::AlreadyExists(remote_path.to_string()))
            };
        };

        for prefix in &prefixes {
            match self.gateway.stat(prefix) {
                Ok(meta) if meta.is_dir() => {
                    if *prefix == leaf && !exist_ok {
                        return Err(FileError::AlreadyExists(prefix.clone()));
                    }
                }
                Ok(_) => return Err(FileError::NotADirectory(prefix.clone())),
                Err(e) if e.is_not_found() => {
                    debug!(path = %prefix, "Creating remote directory");
                    self.gateway.mkdir(prefix)?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Remove a regular file or an empty directory.
    pub fn delete(&mut self, remote_path: &str) -> Result<(), FileError> {
        let meta = match self.gateway.stat(remote_path) {
            Ok(meta) => meta,
            Err(e) if e.is_not_found() => {
                return Err(FileError::NotFound(remote_path.to_string()))
            }
            Err(e) => return Err(e),
        };

        debug!(path = remote_path, file_type = ?meta.file_type, "Deleting remote path");
        match meta.file_type {
            FileType::File => self.gateway.remove_file(remote_path),
            FileType::Directory => self.gateway.remove_dir(remote_path),
            FileType::Symlink | FileType::Other => {
                Err(FileError::UnsupportedType(remote_path.to_string()))
            }
        }
    }

    // --- Listing ---

    /// Walk `remote_path`, collecting the requested entry types.
    pub fn list_entries(
        &self,
        remote_path: &str,
        is_recursive: bool,
        entry_types: EntryTypes,
    ) -> Result<TraversalResult, FileError> {
        TreeWalker::new(&self.gateway)
            .recursive(is_recursive)
            .entry_types(entry_types)
            .walk(remote_path)
    }

    /// Files followed by directories.
    pub fn get_contents(
        &self,
        remote_path: &str,
        is_recursive: bool,
    ) -> Result<Vec<String>, FileError> {
        Ok(self
            .list_entries(remote_path, is_recursive, EntryTypes::all())?
            .into_contents())
    }

    pub fn get_files(&self, remote_path: &str, is_recursive: bool) -> Result<Vec<String>, FileError> {
        Ok(self
            .list_entries(remote_path, is_recursive, EntryTypes::files_only())?
            .files)
    }

    pub fn get_directories(
        &self,
        remote_path: &str,
        is_recursive: bool,
    ) -> Result<Vec<String>, FileError> {
        Ok(self
            .list_entries(remote_path, is_recursive, EntryTypes::directories_only())?
            .directories)
    }

    pub fn get_files_and_directories(
        &self,
        remote_path: &str,
        is_recursive: bool,
    ) -> Result<TraversalResult, FileError> {
        self.list_entries(remote_path, is_recursive, EntryTypes::all())
    }

    // --- Transfer ---

    /// Copy a local file to `remote_path`, creating the remote parent
    /// directories first when `create_directory` is set.
    pub fn upload_file(
        &mut self,
        local_path: &Path,
        remote_path: &str,
        create_directory: bool,
    ) -> Result<(), FileError> {
        let data = std::fs::read(local_path)?;
        if create_directory {
            if let Some(parent) = path::parent(remote_path) {
                self.create_directory(parent, true)?;
            }
        }
        debug!(local = %local_path.display(), remote = remote_path, bytes = data.len(), "Uploading file");
        self.gateway.write_file(remote_path, &data)
    }

    /// Copy `remote_path` to a local file, replacing it if present.
    pub fn download_file(&self, remote_path: &str, local_path: &Path) -> Result<(), FileError> {
        self.require_file(remote_path)?;
        let data = self.gateway.read_file(remote_path)?;
        debug!(remote = remote_path, local = %local_path.display(), bytes = data.len(), "Downloading file");
        std::fs::write(local_path, data)?;
        Ok(())
    }

    /// Size of a remote regular file in bytes.
    pub fn get_file_size(&self, remote_path: &str) -> Result<u64, FileError> {
        Ok(self.require_file(remote_path)?.size)
    }

    fn require_file(&self, remote_path: &str) -> Result<Metadata, FileError> {
        match self.gateway.stat(remote_path) {
            Ok(meta) if meta.is_file() => Ok(meta),
            Ok(_) => Err(FileError::NotAFile(remote_path.to_string())),
            Err(e) if e.is_not_found() => Err(FileError::FileNotExist(remote_path.to_string())),
            Err(e) => Err(e),
        }
    }

    // --- Session lifecycle ---

    /// Replace the session and restore the working directory.
    pub fn reconnect(&mut self) -> Result<(), FileError> {
        info!("Reconnecting remote session");
        self.gateway.reconnect()?;
        if let Some(dir) = self.working_dir.clone() {
            self.gateway.change_dir(&dir)?;
        }
        Ok(())
    }

    /// Close the session, reporting any failure to do so.
    pub fn close(mut self) -> Result<(), FileError> {
        self.closed = true;
        self.gateway.close()
    }
}

impl<G: RemoteFs> Drop for FileClient<G> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.gateway.close() {
            warn!("Failed to close remote session: {e}");
        }
    }
}
