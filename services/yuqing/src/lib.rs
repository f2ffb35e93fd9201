//! Baidu Yuqing open api signer and dispatcher
//!
//! Every yuqing call carries two credentials:
//!
//! - an `Authorization` header signed with the account's access key and
//!   secret key over method, path and host;
//! - `user_key`, `token` and `timestamp` form fields, where `token` is a
//!   session token derived from the account's api key and api secret.
//!
//! [`Authenticator`] owns the secrets and produces both. [`Dispatcher`] binds
//! one endpoint, caches what the authenticator produced for it and sends
//! form encoded POST requests through the [`yqsign_core::HttpSend`] of the
//! authenticator's context.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use yqsign_core::{Context, OsEnv};
//! use yqsign_file_read_tokio::TokioFileRead;
//! use yqsign_http_send_reqwest::ReqwestHttpSend;
//! use yqsign_yuqing::{Authenticator, Config, ConfigCredentialProvider, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> yqsign_core::Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!     let config = Config::new().from_env(&ctx);
//!
//!     let auth = Authenticator::new(ctx, ConfigCredentialProvider::new(config.clone()))
//!         .await?
//!         .with_version(&config.auth_version);
//!     let mut dispatcher = Dispatcher::new(Arc::new(auth), &config.api_root, "/openapi/gettasklist")?;
//!
//!     let payload = json!({"page": 1});
//!     let resp = dispatcher.call(payload.as_object().unwrap(), true).await?;
//!     println!("{:?}", resp.json()?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod constants;
pub use constants::DEFAULT_API_ROOT;

mod config;
pub use config::Config;

mod credential;
pub use credential::SecretBundle;
pub use credential::SessionToken;

mod sign_request;
pub use sign_request::build_authorization;
pub use sign_request::derive_signature;
pub use sign_request::derive_signing_key;
pub use sign_request::parse_host_path;
pub use sign_request::SigningContext;

mod provide_credential;
pub use provide_credential::*;

mod authenticator;
pub use authenticator::Authenticator;

mod payload;
pub use payload::encode_form;
pub use payload::Payload;
pub use payload::PayloadTemplate;

mod dispatcher;
pub use dispatcher::Dispatcher;
pub use dispatcher::Response;
