pub mod expand;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::SessionError;

/// Connection timeout in seconds applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Authentication methods understood by the SSH gateway.
const AUTH_METHODS: &[&str] = &["password", "key", "agent"];

/// Connection settings for an SFTP session.
///
/// - `port`: defaults to 22.
/// - `auth_method`: `"password"` (default), `"key"` or `"agent"`. For key
///   authentication `password` is used as the key passphrase.
/// - `timeout_secs`: applies to connection establishment only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshConfig {
    pub host: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    pub username: String,
    #[serde(default = "default_auth_method")]
    pub auth_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_ssh_port(),
            username: String::new(),
            auth_method: default_auth_method(),
            password: None,
            key_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SshConfig {
    /// Parse a JSON settings document and expand its placeholders.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SessionError::InvalidConfig(format!("Invalid SSH settings: {e}")))?;
        Ok(config.expand())
    }

    /// Return a copy with all `${env:...}` placeholders and `~` expanded.
    pub fn expand(mut self) -> Self {
        self.host = expand::expand_env_placeholders(&self.host);
        self.username = expand::expand_env_placeholders(&self.username);
        self.password = self
            .password
            .map(|s| expand::expand_env_placeholders(&s));
        self.key_path = self.key_path.map(|s| {
            let unquoted = s.trim().trim_matches('"').trim_matches('\'');
            expand::expand_tilde(&expand::expand_env_placeholders(unquoted))
        });
        self
    }

    /// Check that the settings are complete enough to attempt a connection.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.host.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "SSH host must not be empty".to_string(),
            ));
        }

        if self.username.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "SSH username must not be empty".to_string(),
            ));
        }

        if !AUTH_METHODS.contains(&self.auth_method.as_str()) {
            return Err(SessionError::InvalidConfig(format!(
                "Unknown SSH auth method: {}",
                self.auth_method
            )));
        }

        if self.auth_method == "key"
            && self
                .key_path
                .as_deref()
                .map_or(true, |p| p.trim().is_empty())
        {
            return Err(SessionError::InvalidConfig(
                "SSH key path is required when auth method is \"key\"".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(SessionError::InvalidConfig(
                "Connection timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `host:port` form used for the TCP connection and log messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_ssh_port() -> u16 {
    22
}

fn default_auth_method() -> String {
    "password".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
