//! Concrete [`RemoteFs`](crate::files::RemoteFs) gateways.
//!
//! Gateways that pull in native libraries are gated behind cargo features
//! so that consumers who only need the in-memory gateway avoid them.

#[cfg(feature = "ssh")]
pub mod ssh;
