use crate::config::{config_dir, ApiConfig};
use crate::error::{ChirpError, Result};

/// Bearer credential attached to every API request. It is never refreshed:
/// a rejected token surfaces as a transport error like any other.
#[derive(Clone)]
pub struct AuthContext {
    token: String,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext").finish_non_exhaustive()
    }
}

impl AuthContext {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn bearer(&self) -> &str {
        &self.token
    }
}

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        non_empty(&String::from_utf8_lossy(&output.stdout))
    } else {
        None
    }
}

/// Stored token path: ~/.config/chirp/token
fn token_path() -> Option<std::path::PathBuf> {
    Some(config_dir()?.join("token"))
}

fn load_stored_token() -> Option<String> {
    let path = token_path()?;
    let token = std::fs::read_to_string(path).ok()?;
    non_empty(&token)
}

fn non_empty(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve the bearer token, trying in order:
/// 1. Explicit token (from the command line)
/// 2. Env var named in config
/// 3. Stored token from ~/.config/chirp/token
/// 4. Token command from config
pub fn load_token(explicit: Option<&str>, api: &ApiConfig) -> Result<AuthContext> {
    if let Some(token) = explicit.and_then(non_empty) {
        return Ok(AuthContext::new(token));
    }

    if let Some(env_var) = &api.token_env {
        if let Some(token) = std::env::var(env_var).ok().as_deref().and_then(non_empty) {
            return Ok(AuthContext::new(token));
        }
    }

    if let Some(token) = load_stored_token() {
        return Ok(AuthContext::new(token));
    }

    if let Some(cmd) = &api.token_command {
        if let Some(token) = try_cli_token(cmd) {
            return Ok(AuthContext::new(token));
        }
    }

    Err(ChirpError::Auth(format!(
        "No API token found. Pass --token, set {} or configure a token_command.",
        api.token_env.as_deref().unwrap_or("a token env var")
    )))
}
