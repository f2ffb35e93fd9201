use std::env;
use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use yqsign_core::{Context, OsEnv};
use yqsign_file_read_tokio::TokioFileRead;
use yqsign_http_send_reqwest::ReqwestHttpSend;
use yqsign_yuqing::{Authenticator, Config, ConfigCredentialProvider, Dispatcher};

/// Fetch the task list of the account whose secrets are named by
/// `YQSIGN_SECRETS_FILE` or `YQSIGN_SECRETS`.
///
/// An optional argument is parsed as a JSON mapping and sent as payload.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::new().from_env(&ctx);

    let auth = Authenticator::new(ctx, ConfigCredentialProvider::new(config.clone()))
        .await?
        .with_version(&config.auth_version);
    let mut dispatcher = Dispatcher::new(Arc::new(auth), &config.api_root, "/openapi/gettasklist")?;

    let payload: Value = match env::args().nth(1) {
        Some(arg) => serde_json::from_str(&arg)?,
        None => json!({}),
    };
    let Value::Object(payload) = payload else {
        anyhow::bail!("payload must be a JSON mapping");
    };

    let resp = dispatcher.call(&payload, true).await?;
    println!("status: {}", resp.status());
    println!("{}", serde_json::to_string_pretty(&resp.json()?)?);

    Ok(())
}
