//! Async file browsing over a blocking [`FileClient`].
//!
//! Each call runs on tokio's blocking pool via `spawn_blocking`. The client
//! sits behind a mutex, so calls are still serialized on its one session.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::FileClient;
use crate::errors::FileError;
use crate::files::{EntryTypes, Metadata, RemoteFs, TraversalResult};

/// Async listing and query operations on a remote filesystem.
#[async_trait::async_trait]
pub trait FileBrowser: Send + Sync {
    /// Walk `path`, collecting the requested entry types.
    async fn list_entries(
        &self,
        path: &str,
        recursive: bool,
        entry_types: EntryTypes,
    ) -> Result<TraversalResult, FileError>;

    async fn stat(&self, path: &str) -> Result<Metadata, FileError>;

    async fn exists(&self, path: &str) -> Result<bool, FileError>;

    async fn create_directory(&self, path: &str, exist_ok: bool) -> Result<(), FileError>;

    /// Delete a regular file or an empty directory.
    async fn delete(&self, path: &str) -> Result<(), FileError>;

    async fn get_file_size(&self, path: &str) -> Result<u64, FileError>;

    async fn get_working_directory(&self) -> Result<String, FileError>;

    async fn set_working_directory(&self, path: &str, create: bool) -> Result<(), FileError>;
}

/// A [`FileClient`] shared between tasks.
pub struct SharedClient<G: RemoteFs> {
    client: Arc<Mutex<FileClient<G>>>,
}

impl<G: RemoteFs> Clone for SharedClient<G> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<G> SharedClient<G>
where
    G: RemoteFs + Send + 'static,
{
    pub fn new(client: FileClient<G>) -> Self {
        Self {
            client: Arc::new(Mutex::new(client)),
        }
    }

    fn lock(client: &Mutex<FileClient<G>>) -> Result<MutexGuard<'_, FileClient<G>>, FileError> {
        client
            .lock()
            .map_err(|e| FileError::OperationFailed(format!("Failed to lock client: {e}")))
    }

    /// Run `op` against the client on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T, FileError>
    where
        T: Send + 'static,
        F: FnOnce(&mut FileClient<G>) -> Result<T, FileError> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let mut guard = Self::lock(&client)?;
            op(&mut *guard)
        })
        .await
        .map_err(|e| FileError::OperationFailed(format!("Task join failed: {e}")))?
    }
}

#[async_trait::async_trait]
impl<G> FileBrowser for SharedClient<G>
where
    G: RemoteFs + Send + 'static,
{
    async fn list_entries(
        &self,
        path: &str,
        recursive: bool,
        entry_types: EntryTypes,
    ) -> Result<TraversalResult, FileError> {
        let path = path.to_string();
        self.run(move |c| c.list_entries(&path, recursive, entry_types))
            .await
    }

    async fn stat(&self, path: &str) -> Result<Metadata, FileError> {
        let path = path.to_string();
        self.run(move |c| c.stat(&path)).await
    }

    async fn exists(&self, path: &str) -> Result<bool, FileError> {
        let path = path.to_string();
        self.run(move |c| c.exists(&path)).await
    }

    async fn create_directory(&self, path: &str, exist_ok: bool) -> Result<(), FileError> {
        let path = path.to_string();
        self.run(move |c| c.create_directory(&path, exist_ok)).await
    }

    async fn delete(&self, path: &str) -> Result<(), FileError> {
        let path = path.to_string();
        self.run(move |c| c.delete(&path)).await
    }

    async fn get_file_size(&self, path: &str) -> Result<u64, FileError> {
        let path = path.to_string();
        self.run(move |c| c.get_file_size(&path)).await
    }

    async fn get_working_directory(&self) -> Result<String, FileError> {
        self.run(|c| c.get_working_directory()).await
    }

    async fn set_working_directory(&self, path: &str, create: bool) -> Result<(), FileError> {
        let path = path.to_string();
        self.run(move |c| c.set_working_directory(&path, create))
            .await
    }
}
