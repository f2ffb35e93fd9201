use crate::constants::*;
use crate::credential::{SecretBundle, SessionToken};
use crate::payload::PayloadTemplate;
use crate::sign_request::{build_authorization, parse_host_path};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderValue, Method};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};
use yqsign_core::time::{format_iso8601, now, DateTime};
use yqsign_core::{Context, Error, ProvideCredential, Result, SigningCredential};

/// Authenticator owns the account secrets and turns them into request credentials.
///
/// It produces two independent artifacts:
///
/// - an Authorization header value, signed over method, path and host with a
///   timestamp in ISO 8601 form;
/// - a session token for the request body, bound to a timestamp in Unix epoch
///   seconds.
///
/// The two timestamp formats are part of the protocol and must stay distinct.
///
/// One authenticator is usually shared by many dispatchers through an `Arc`.
pub struct Authenticator {
    ctx: Context,
    loader: Box<dyn ProvideCredential<Credential = SecretBundle>>,
    version: String,
    secrets: Mutex<Arc<SecretBundle>>,
}

impl Debug for Authenticator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("loader", &self.loader)
            .field("version", &self.version)
            .field("secrets", &self.secrets())
            .finish()
    }
}

impl Authenticator {
    /// Create an authenticator, loading secrets immediately.
    ///
    /// Fails with a config error if the loader fails or finds nothing.
    pub async fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = SecretBundle>,
    ) -> Result<Self> {
        let secrets = load(&ctx, &loader).await?;

        Ok(Self {
            ctx,
            loader: Box::new(loader),
            version: AUTH_VERSION.to_string(),
            secrets: Mutex::new(Arc::new(secrets)),
        })
    }

    /// Set the version tag embedded in authorization values.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The context requests are sent through.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Snapshot of the currently held secrets.
    pub fn secrets(&self) -> Arc<SecretBundle> {
        self.secrets.lock().expect("lock poisoned").clone()
    }

    /// Load secrets again from the loader.
    ///
    /// The held secrets are replaced only if loading succeeds; on error the
    /// previous secrets stay in use.
    pub async fn reload(&self) -> Result<()> {
        let secrets = load(&self.ctx, self.loader.as_ref()).await?;
        *self.secrets.lock().expect("lock poisoned") = Arc::new(secrets);

        debug!("yuqing secrets reloaded");
        Ok(())
    }

    /// Current time in the form authorization values embed: "2020-01-01T00:00:00Z"
    pub fn signing_timestamp(&self) -> String {
        format_iso8601(now())
    }

    /// A fresh session token bound to the current time.
    pub fn session_token(&self) -> SessionToken {
        self.secrets().session_token(now())
    }

    /// Authorization value for calling `method` on `url`, signed now.
    pub fn authorization_for(&self, url: &str, method: &Method) -> Result<String> {
        self.authorization_at(url, method, now())
    }

    /// Authorization value for calling `method` on `url`, signed at `time`.
    pub fn authorization_at(&self, url: &str, method: &Method, time: DateTime) -> Result<String> {
        let secrets = self.secrets();

        build_authorization(
            &secrets.access_key,
            &secrets.secret_key,
            &format_iso8601(time),
            EXPIRE_TIME,
            url,
            method.as_str(),
            &self.version,
        )
    }

    /// Body fields every request carries, with a fresh session token.
    pub fn payload_template(&self) -> PayloadTemplate {
        let secrets = self.secrets();
        PayloadTemplate::new(&secrets.api_key, secrets.session_token(now()))
    }

    /// Request headers for calling `method` on `url`, signed now.
    pub fn headers_for(&self, url: &str, method: &Method) -> Result<HeaderMap> {
        self.headers_at(url, method, now())
    }

    /// Request headers for calling `method` on `url`, signed at `time`.
    pub fn headers_at(&self, url: &str, method: &Method, time: DateTime) -> Result<HeaderMap> {
        let (host, _) = parse_host_path(url)?;
        let authorization = self.authorization_at(url, method, time)?;

        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(HOST, host.parse()?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(AUTHORIZATION, {
            let mut value: HeaderValue = authorization.parse()?;
            value.set_sensitive(true);

            value
        });
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));

        Ok(headers)
    }
}

async fn load(
    ctx: &Context,
    loader: &dyn ProvideCredential<Credential = SecretBundle>,
) -> Result<SecretBundle> {
    match loader.provide_credential(ctx).await? {
        Some(secrets) if secrets.is_valid() => {
            debug!("yuqing secrets loaded: {secrets:?}");
            Ok(secrets)
        }
        _ => Err(Error::config_invalid(format!(
            "no valid yuqing secrets found by {loader:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::provide_credential::{ConfigCredentialProvider, StaticCredentialProvider};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use yqsign_core::ErrorKind;
    use yqsign_file_read_tokio::TokioFileRead;

    const URL: &str = "http://example.com/openapi/gettasklist";

    async fn authenticator() -> Authenticator {
        Authenticator::new(
            Context::new(),
            StaticCredentialProvider::new("AK1", "SK1", "APIK", "APIS"),
        )
        .await
        .expect("authenticator must be created")
    }

    fn fixed_time() -> DateTime {
        chrono::Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_authorization_at() {
        let auth = authenticator().await;
        assert_eq!(
            auth.authorization_at(URL, &Method::POST, fixed_time()).unwrap(),
            "v1/AK1/2020-01-01T00:00:00Z/1800/host/4a4454dda4c36003bd31e90dc986b0c978ccbfcb4a2cf442d6b0f1e22bdf2493"
        );
    }

    #[tokio::test]
    async fn test_authorization_with_version() {
        let auth = authenticator().await.with_version("bce-auth-v1");
        assert!(auth
            .authorization_at(URL, &Method::POST, fixed_time())
            .unwrap()
            .starts_with("bce-auth-v1/AK1/2020-01-01T00:00:00Z/1800/host/"));
    }

    #[tokio::test]
    async fn test_authorization_for_uses_current_time() {
        let auth = authenticator().await;
        let before = now().timestamp();
        let v = auth.authorization_for(URL, &Method::POST).unwrap();
        let after = now().timestamp();

        let parts: Vec<&str> = v.split('/').collect();
        assert_eq!(parts.len(), 6);
        assert_eq!(parts[4], "host");
        let signed_at = yqsign_core::time::parse_iso8601(parts[2]).unwrap().timestamp();
        assert!(before <= signed_at && signed_at <= after);
    }

    #[tokio::test]
    async fn test_signing_timestamp_format() {
        let auth = authenticator().await;
        let ts = auth.signing_timestamp();
        assert_eq!(ts.len(), "2020-01-01T00:00:00Z".len());
        assert!(ts.ends_with('Z'));
        assert!(yqsign_core::time::parse_iso8601(&ts).is_ok());
    }

    #[tokio::test]
    async fn test_session_token_is_non_decreasing() {
        let auth = authenticator().await;

        let first = auth.session_token();
        let second = auth.session_token();
        let a: u64 = first.timestamp.parse().expect("must be an integer");
        let b: u64 = second.timestamp.parse().expect("must be an integer");
        assert!(a <= b);
        assert_eq!(first.token.len(), 40);
    }

    #[tokio::test]
    async fn test_payload_template() {
        let auth = authenticator().await;
        let template = auth.payload_template();

        assert_eq!(template.user_key, "APIK");
        let expected = SessionToken::generate(
            "APIK",
            "APIS",
            chrono::DateTime::from_timestamp(template.timestamp.parse().unwrap(), 0).unwrap(),
        );
        assert_eq!(template.token, expected.token);
    }

    #[tokio::test]
    async fn test_headers_at() {
        let auth = authenticator().await;
        let headers = auth
            .headers_at(
                "http://example.com:8080/openapi/gettasklist",
                &Method::POST,
                fixed_time(),
            )
            .unwrap();

        assert_eq!(headers.len(), 4);
        assert_eq!(headers[HOST], "example.com:8080");
        assert_eq!(headers[CONTENT_TYPE], "application/x-www-form-urlencoded");
        assert_eq!(headers[ACCEPT], "*/*");
        assert_eq!(
            headers[AUTHORIZATION],
            "v1/AK1/2020-01-01T00:00:00Z/1800/host/5fa6e907031ac52b643c511852c5387955471c9ca89bdd5428868149f96b807c"
        );
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[tokio::test]
    async fn test_new_without_secrets() {
        let err = Authenticator::new(
            Context::new(),
            ConfigCredentialProvider::new(Config::new()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_reload() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            br#"{"access_key": "AK1", "secret_key": "SK1", "api_key": "APIK", "api_secret": "APIS"}"#,
        )
        .unwrap();
        let path = f.path().to_string_lossy().to_string();

        let auth = Authenticator::new(
            Context::new().with_file_read(TokioFileRead),
            ConfigCredentialProvider::new(Config::new().with_secrets_path(&path)),
        )
        .await
        .unwrap();
        assert_eq!(auth.secrets().access_key, "AK1");

        std::fs::write(
            &path,
            r#"{"access_key": "AK2", "secret_key": "SK2", "api_key": "APIK2", "api_secret": "APIS2"}"#,
        )
        .unwrap();
        auth.reload().await.expect("reload must succeed");
        assert_eq!(*auth.secrets(), SecretBundle::new("AK2", "SK2", "APIK2", "APIS2"));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_secrets() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            br#"{"access_key": "AK1", "secret_key": "SK1", "api_key": "APIK", "api_secret": "APIS"}"#,
        )
        .unwrap();
        let path = f.path().to_string_lossy().to_string();

        let auth = Authenticator::new(
            Context::new().with_file_read(TokioFileRead),
            ConfigCredentialProvider::new(Config::new().with_secrets_path(&path)),
        )
        .await
        .unwrap();

        std::fs::write(&path, r#"{"access_key": "AK2"}"#).unwrap();
        let err = auth.reload().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(auth.secrets().access_key, "AK1");
    }
}
