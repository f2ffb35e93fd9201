use crate::config::Config;
use crate::credential::SecretBundle;
use async_trait::async_trait;
use log::debug;
use yqsign_core::{Context, Error, ProvideCredential, Result};

/// ConfigCredentialProvider loads the secret bundle from a [`Config`].
///
/// `secrets_content` is tried first, then `secrets_path`. Returns `None` when
/// neither is set. Anything set but unreadable or malformed is an error.
#[derive(Debug, Clone)]
pub struct ConfigCredentialProvider {
    config: Config,
}

impl ConfigCredentialProvider {
    /// Create a new ConfigCredentialProvider.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn load_from_path(&self, ctx: &Context, path: &str) -> Result<SecretBundle> {
        let path = ctx.expand_home_dir(path).ok_or_else(|| {
            Error::config_invalid(format!(
                "secrets path {path} refers to home dir but home dir is unknown"
            ))
        })?;

        let content = ctx.file_read(&path).await.map_err(|err| {
            debug!("load secrets from path {path} failed: {err:?}");
            err
        })?;

        SecretBundle::from_slice(&content).map_err(|err| {
            debug!("parse secrets from path {path} failed: {err:?}");
            err
        })
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = SecretBundle;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if let Some(content) = &self.config.secrets_content {
            return SecretBundle::from_slice(content.as_bytes()).map(Some);
        }

        match &self.config.secrets_path {
            Some(path) => self.load_from_path(ctx, path).await.map(Some),
            None => Ok(None),
        }
    }
}
