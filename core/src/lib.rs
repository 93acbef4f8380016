//! Remote filesystem client over SFTP.
//!
//! The [`files`] module defines the [`RemoteFs`](files::RemoteFs) gateway
//! contract and the tree walker built on it, [`client`] provides the
//! caller-facing [`FileClient`], and [`backends`] holds the SSH gateway
//! (cargo feature `ssh`).

pub mod backends;
pub mod client;
pub mod config;
pub mod errors;
pub mod files;

pub use client::FileClient;
pub use errors::{ErrorKind, FileError, SessionError};
