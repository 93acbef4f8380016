//! SSH backend: an SFTP [`RemoteFs`](crate::files::RemoteFs) gateway.
//!
//! # Lifecycle
//!
//! 1. Build an [`SshConfig`] (directly or via [`SshConfig::from_json()`]).
//! 2. Call [`SftpClient::connect()`] to open the session.
//! 3. List, query and mutate through the [`FileClient`] methods.
//! 4. Call [`FileClient::close()`], or let the client drop.

pub mod auth;
mod sftp;

use crate::client::FileClient;
use crate::config::SshConfig;
use crate::errors::SessionError;

pub use self::sftp::SftpGateway;

/// A [`FileClient`] over an SFTP session.
pub type SftpClient = FileClient<SftpGateway>;

impl FileClient<SftpGateway> {
    /// Connect to the server described by `config`.
    pub fn connect(config: SshConfig) -> Result<Self, SessionError> {
        Ok(Self::new(SftpGateway::connect(config)?))
    }
}
