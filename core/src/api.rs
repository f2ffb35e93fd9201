use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait implemented by secrets a signer can use.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is usable for signing.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential is the trait used to load credentials from a secret source.
///
/// Returning `Ok(None)` means the source has nothing configured. A source that
/// is configured but unreadable or malformed must return an error instead.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load the credential from its source.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
