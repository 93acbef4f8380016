//! Error types for the ftpclient core crate.
//!
//! [`SessionError`] covers the transport (connect, handshake, authentication)
//! and is passed through opaquely. [`FileError`] covers filesystem
//! operations; every path-related variant carries the offending remote path.

use thiserror::Error;

/// Errors raised while establishing or using the underlying SSH session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// TCP connection or SFTP subsystem setup failed.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The SSH handshake failed.
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// The server rejected the supplied credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A blocking call exceeded the configured timeout.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The session reported a protocol-level failure.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The connection configuration is invalid.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The session has already been closed.
    #[error("Session closed")]
    Closed,

    /// A low-level I/O error on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`FileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    /// The path exists but has the wrong type for the operation.
    WrongType,
    PermissionDenied,
    Transport,
    Other,
}

/// Errors related to remote file and directory operations.
#[derive(Error, Debug)]
pub enum FileError {
    /// A file was expected at the path but nothing exists there.
    #[error("File does not exist: {0}")]
    FileNotExist(String),

    /// A directory was expected at the path but nothing exists there.
    #[error("Directory does not exist: {0}")]
    DirectoryNotExist(String),

    /// Nothing exists at the path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Directory creation collided with an existing directory.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    /// The remote object is neither a regular file nor a directory.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A remote operation failed for another reason. The message includes
    /// the path.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// The transport failed underneath the operation.
    #[error("Transport error: {0}")]
    Transport(#[from] SessionError),

    /// Local file I/O failed (upload source, download target).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FileError {
    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotExist(_) | Self::DirectoryNotExist(_) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotADirectory(_) | Self::NotAFile(_) | Self::UnsupportedType(_) => {
                ErrorKind::WrongType
            }
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::Transport(_) => ErrorKind::Transport,
            Self::OperationFailed(_) | Self::Io(_) => ErrorKind::Other,
        }
    }

    /// Returns the remote path the error refers to, if it carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FileNotExist(p)
            | Self::DirectoryNotExist(p)
            | Self::NotFound(p)
            | Self::AlreadyExists(p)
            | Self::NotADirectory(p)
            | Self::NotAFile(p)
            | Self::UnsupportedType(p)
            | Self::PermissionDenied(p) => Some(p),
            Self::OperationFailed(_) | Self::Transport(_) | Self::Io(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
