//! Shared test utilities for ftpclient core integration tests.
//!
//! Provides the `TDD` sample tree, SSH configuration builders and the Docker
//! container availability check used by the SFTP tests.

// Each integration test is compiled as its own crate, so not every test file
// uses every function from this shared module. Suppress dead_code warnings.
#![allow(dead_code)]

use std::net::TcpStream;
use std::time::Duration;

use ftpclient_core::config::SshConfig;
use ftpclient_core::files::MemoryFs;

/// Port of the `sftp` container in `tests/docker/docker-compose.yml`.
pub const PORT_SFTP: u16 = 2201;

/// Writable directory inside the `sftp` container's chroot.
pub const SFTP_UPLOAD_DIR: &str = "/upload";

/// Check if a TCP port is reachable on the given host.
///
/// Returns `true` if a TCP connection can be established within 2 seconds.
pub fn is_port_reachable(host: &str, port: u16) -> bool {
    let addr = format!("{host}:{port}");
    if let Ok(addr) = addr.parse() {
        TcpStream::connect_timeout(&addr, Duration::from_secs(2)).is_ok()
    } else {
        false
    }
}

/// Skip the current test if a Docker container is not reachable on the given port.
macro_rules! require_docker {
    ($port:expr) => {
        if !common::is_port_reachable("127.0.0.1", $port) {
            eprintln!(
                "SKIPPED: Docker container not reachable on port {} \
                 (start with: cd tests/docker && docker compose up -d)",
                $port
            );
            return;
        }
    };
}
pub(crate) use require_docker;

/// Password login for the `sftp` container.
pub fn sftp_password_config(port: u16) -> SshConfig {
    SshConfig {
        host: "127.0.0.1".to_string(),
        port,
        username: "testuser".to_string(),
        auth_method: "password".to_string(),
        password: Some("testpass".to_string()),
        timeout_secs: 10,
        ..Default::default()
    }
}

/// Relative paths of the sample tree, in creation order. Entries ending in
/// `/` are directories.
pub const TDD_TREE: &[&str] = &[
    "1-1.txt",
    "1-2.txt",
    "1-1/2-1.txt",
    "1-1/2-1/3-1.txt",
    "1-1/2-1/3-1/0-1.txt",
    "1-1/2-1/3-1/0-1/",
    "1-2/2-2.txt",
    "1-2/2-2/3-2.txt",
    "1-2/2-2/3-2/0-2.txt",
    "1-2/2-2/3-2/0-2/",
];

/// Recursive file listing of the sample tree.
pub const TDD_FILES: &[&str] = &[
    "1-1.txt",
    "1-2.txt",
    "1-1/2-1.txt",
    "1-1/2-1/3-1.txt",
    "1-1/2-1/3-1/0-1.txt",
    "1-2/2-2.txt",
    "1-2/2-2/3-2.txt",
    "1-2/2-2/3-2/0-2.txt",
];

/// Recursive directory listing of the sample tree.
pub const TDD_DIRECTORIES: &[&str] = &[
    "1-1/",
    "1-2/",
    "1-1/2-1/",
    "1-1/2-1/3-1/",
    "1-1/2-1/3-1/0-1/",
    "1-2/2-2/",
    "1-2/2-2/3-2/",
    "1-2/2-2/3-2/0-2/",
];

/// In-memory filesystem holding the sample tree below `root`.
pub fn tdd_memory_fs(root: &str) -> MemoryFs {
    let mut fs = MemoryFs::new();
    fs.add_dir(root);
    for entry in TDD_TREE {
        let full = format!("{root}/{entry}");
        if entry.ends_with('/') {
            fs.add_dir(&full);
        } else {
            fs.add_file(&full, entry.as_bytes());
        }
    }
    fs
}

pub fn sorted(mut entries: Vec<String>) -> Vec<String> {
    entries.sort();
    entries
}

pub fn sorted_expected(entries: &[&str]) -> Vec<String> {
    sorted(entries.iter().map(|s| s.to_string()).collect())
}
