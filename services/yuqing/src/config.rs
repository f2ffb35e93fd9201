use crate::constants::*;
use std::fmt::{Debug, Formatter};
use yqsign_core::utils::Redact;
use yqsign_core::Context;

/// Config for the yuqing API.
///
/// There is no implicit secret location: secrets are only read from what is
/// set here, either directly or through [`Config::from_env`].
#[derive(Clone)]
pub struct Config {
    /// Root url every dispatcher uri is appended to.
    pub api_root: String,
    /// Path to a JSON file holding the secret mapping, `~` is expanded.
    pub secrets_path: Option<String>,
    /// Inline JSON secret mapping, takes precedence over `secrets_path`.
    pub secrets_content: Option<String>,
    /// Version tag embedded in authorization values.
    pub auth_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            secrets_path: None,
            secrets_content: None,
            auth_version: AUTH_VERSION.to_string(),
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_root", &self.api_root)
            .field("secrets_path", &self.secrets_path)
            .field("secrets_content", &Redact::from(&self.secrets_content))
            .field("auth_version", &self.auth_version)
            .finish()
    }
}

impl Config {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the api root.
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    /// Set the secret file path.
    pub fn with_secrets_path(mut self, path: impl Into<String>) -> Self {
        self.secrets_path = Some(path.into());
        self
    }

    /// Set the inline secret content.
    pub fn with_secrets_content(mut self, content: impl Into<String>) -> Self {
        self.secrets_content = Some(content.into());
        self
    }

    /// Set the authorization version tag.
    pub fn with_auth_version(mut self, version: impl Into<String>) -> Self {
        self.auth_version = version.into();
        self
    }

    /// Override config values with environment variables that are set.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(YQSIGN_API_ROOT) {
            self.api_root = v;
        }
        if let Some(v) = ctx.env_var(YQSIGN_SECRETS_FILE) {
            self.secrets_path = Some(v);
        }
        if let Some(v) = ctx.env_var(YQSIGN_SECRETS) {
            self.secrets_content = Some(v);
        }
        if let Some(v) = ctx.env_var(YQSIGN_AUTH_VERSION) {
            self.auth_version = v;
        }
        self
    }
}
