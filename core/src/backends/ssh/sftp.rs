//! SFTP gateway implementing [`RemoteFs`] over `ssh2`.
//!
//! SFTP has no notion of a working directory, so the gateway keeps one
//! itself and resolves every relative path against it before each call.

use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::SshConfig;
use crate::errors::{FileError, SessionError};
use crate::files::path;
use crate::files::{FileType, ListingEntry, Metadata, RemoteFs};

use super::auth::connect_and_authenticate;

// SFTP status codes (draft-ietf-secsh-filexfer-02 and later).
const SFTP_NO_SUCH_FILE: i32 = 2;
const SFTP_PERMISSION_DENIED: i32 = 3;
const SFTP_NO_SUCH_PATH: i32 = 10;
const SFTP_FILE_ALREADY_EXISTS: i32 = 11;
// LIBSSH2_ERROR_TIMEOUT
const SESSION_TIMEOUT: i32 = -9;

const NEW_DIR_MODE: i32 = 0o755;

struct SftpConnection {
    session: ssh2::Session,
    sftp: ssh2::Sftp,
}

/// A live SFTP session.
pub struct SftpGateway {
    config: SshConfig,
    /// `None` once closed.
    connection: Option<SftpConnection>,
    cwd: String,
}

impl SftpGateway {
    /// Validate `config`, connect, authenticate and open the SFTP subsystem.
    ///
    /// The working directory starts at the login directory reported by the
    /// server.
    pub fn connect(config: SshConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let connection = open_connection(&config)?;
        let cwd = login_dir(&connection.sftp)?;
        info!(address = %config.address(), cwd = %cwd, "SFTP session opened");
        Ok(Self {
            config,
            connection: Some(connection),
            cwd,
        })
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    fn sftp(&self) -> Result<&ssh2::Sftp, FileError> {
        self.connection
            .as_ref()
            .map(|c| &c.sftp)
            .ok_or(FileError::Transport(SessionError::Closed))
    }

    fn remote(&self, path: &str) -> String {
        path::resolve(&self.cwd, path)
    }
}

fn open_connection(config: &SshConfig) -> Result<SftpConnection, SessionError> {
    let session = connect_and_authenticate(config)?;
    let sftp = session
        .sftp()
        .map_err(|e| SessionError::Connect(format!("SFTP init failed: {e}")))?;
    Ok(SftpConnection { session, sftp })
}

fn login_dir(sftp: &ssh2::Sftp) -> Result<String, SessionError> {
    sftp.realpath(Path::new("."))
        .map(|p| p.to_string_lossy().into_owned())
        .map_err(|e| SessionError::Protocol(format!("Cannot resolve login directory: {e}")))
}

fn to_metadata(stat: &ssh2::FileStat) -> Metadata {
    let mode = stat.perm.unwrap_or(0);
    Metadata {
        file_type: FileType::from_mode(mode),
        size: stat.size.unwrap_or(0),
        permissions: stat.perm.map(|p| p & 0o7777),
        modified: stat.mtime,
    }
}

/// Map an `ssh2` error to a [`FileError`] for `path`.
fn map_sftp_error(e: ssh2::Error, path: &str) -> FileError {
    match e.code() {
        ssh2::ErrorCode::SFTP(SFTP_NO_SUCH_FILE | SFTP_NO_SUCH_PATH) => {
            FileError::NotFound(path.to_string())
        }
        ssh2::ErrorCode::SFTP(SFTP_PERMISSION_DENIED) => {
            FileError::PermissionDenied(path.to_string())
        }
        ssh2::ErrorCode::SFTP(SFTP_FILE_ALREADY_EXISTS) => {
            FileError::AlreadyExists(path.to_string())
        }
        ssh2::ErrorCode::SFTP(_) => FileError::OperationFailed(format!("{path}: {}", e.message())),
        ssh2::ErrorCode::Session(SESSION_TIMEOUT) => {
            SessionError::Timeout(format!("{path}: {}", e.message())).into()
        }
        _ => SessionError::Protocol(format!("{path}: {}", e.message())).into(),
    }
}

impl RemoteFs for SftpGateway {
    fn list_children(&self, path: &str) -> Result<Vec<ListingEntry>, FileError> {
        let remote = self.remote(path);
        debug!(path = %remote, "readdir");
        let entries = self
            .sftp()?
            .readdir(Path::new(&remote))
            .map_err(|e| map_sftp_error(e, &remote))?;

        Ok(entries
            .into_iter()
            .filter_map(|(child, stat)| {
                let name = child.file_name()?.to_string_lossy().into_owned();
                if name == "." || name == ".." {
                    return None;
                }
                Some(ListingEntry::new(name, stat.perm.unwrap_or(0)))
            })
            .collect())
    }

    fn stat(&self, path: &str) -> Result<Metadata, FileError> {
        let remote = self.remote(path);
        let stat = self
            .sftp()?
            .lstat(Path::new(&remote))
            .map_err(|e| map_sftp_error(e, &remote))?;
        Ok(to_metadata(&stat))
    }

    fn mkdir(&mut self, path: &str) -> Result<(), FileError> {
        let remote = self.remote(path);
        debug!(path = %remote, "mkdir");
        self.sftp()?
            .mkdir(Path::new(&remote), NEW_DIR_MODE)
            .map_err(|e| map_sftp_error(e, &remote))
    }

    fn remove_file(&mut self, path: &str) -> Result<(), FileError> {
        let remote = self.remote(path);
        debug!(path = %remote, "unlink");
        self.sftp()?
            .unlink(Path::new(&remote))
            .map_err(|e| map_sftp_error(e, &remote))
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), FileError> {
        let remote = self.remote(path);
        debug!(path = %remote, "rmdir");
        self.sftp()?
            .rmdir(Path::new(&remote))
            .map_err(|e| map_sftp_error(e, &remote))
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, FileError> {
        let remote = self.remote(path);
        let mut file = self
            .sftp()?
            .open(Path::new(&remote))
            .map_err(|e| map_sftp_error(e, &remote))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| FileError::OperationFailed(format!("{remote}: read failed: {e}")))?;
        Ok(data)
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), FileError> {
        let remote = self.remote(path);
        let mut file = self
            .sftp()?
            .create(Path::new(&remote))
            .map_err(|e| map_sftp_error(e, &remote))?;
        file.write_all(data)
            .map_err(|e| FileError::OperationFailed(format!("{remote}: write failed: {e}")))
    }

    fn current_dir(&self) -> Result<String, FileError> {
        self.sftp()?;
        Ok(self.cwd.clone())
    }

    fn change_dir(&mut self, path: &str) -> Result<(), FileError> {
        let remote = self.remote(path);
        let sftp = self.sftp()?;
        // Follows symlinks, so a link to a directory is a valid target.
        let stat = sftp.stat(Path::new(&remote)).map_err(|e| match map_sftp_error(e, &remote) {
            FileError::NotFound(p) => FileError::DirectoryNotExist(p),
            other => other,
        })?;
        if !stat.is_dir() {
            return Err(FileError::NotADirectory(remote));
        }
        let resolved = sftp
            .realpath(Path::new(&remote))
            .map_err(|e| map_sftp_error(e, &remote))?;
        self.cwd = resolved.to_string_lossy().into_owned();
        Ok(())
    }

    fn reconnect(&mut self) -> Result<(), FileError> {
        if let Err(e) = self.close() {
            warn!("Ignoring failure while closing stale session: {e}");
        }
        let connection = open_connection(&self.config)?;
        self.cwd = login_dir(&connection.sftp)?;
        self.connection = Some(connection);
        info!(address = %self.config.address(), "SFTP session reestablished");
        Ok(())
    }

    fn close(&mut self) -> Result<(), FileError> {
        let Some(SftpConnection { session, sftp }) = self.connection.take() else {
            return Ok(());
        };
        drop(sftp);
        session
            .disconnect(None, "client closed", None)
            .map_err(|e| SessionError::Protocol(format!("Disconnect failed: {e}")))?;
        info!(address = %self.config.address(), "SFTP session closed");
        Ok(())
    }
}
