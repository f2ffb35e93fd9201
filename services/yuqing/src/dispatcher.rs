use crate::authenticator::Authenticator;
use crate::constants::*;
use crate::payload::{encode_form, Payload, PayloadTemplate};
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use yqsign_core::time::{now, DateTime};
use yqsign_core::{Error, Result};

/// Dispatcher binds one yuqing endpoint and sends signed calls to it.
///
/// Headers and the payload template are computed at construction and cached.
/// Before every call the headers are re-signed if their validity window is
/// about to elapse, and the payload template gets a fresh session token
/// unless the caller opts out.
///
/// ```no_run
/// use std::sync::Arc;
/// use serde_json::json;
/// use yqsign_core::Context;
/// use yqsign_file_read_tokio::TokioFileRead;
/// use yqsign_http_send_reqwest::ReqwestHttpSend;
/// use yqsign_yuqing::{Authenticator, Config, ConfigCredentialProvider, Dispatcher};
///
/// # async fn example() -> yqsign_core::Result<()> {
/// let ctx = Context::new()
///     .with_file_read(TokioFileRead)
///     .with_http_send(ReqwestHttpSend::default());
/// let config = Config::new().with_secrets_path("secrets.json");
///
/// let auth = Arc::new(
///     Authenticator::new(ctx, ConfigCredentialProvider::new(config.clone())).await?,
/// );
/// let mut tasks = Dispatcher::new(auth, &config.api_root, "/openapi/gettasklist")?;
///
/// let resp = tasks.call(json!({}).as_object().unwrap(), true).await?;
/// println!("{}: {:?}", resp.status_code(), resp.json()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    auth: Arc<Authenticator>,
    uri: String,
    url: String,
    method: Method,

    headers: HeaderMap,
    headers_signed_at: DateTime,
    payload_template: PayloadTemplate,
    last_response: Option<Response>,
}

impl Dispatcher {
    /// Create a dispatcher that POSTs to `api_root` + `uri`.
    pub fn new(auth: Arc<Authenticator>, api_root: &str, uri: &str) -> Result<Self> {
        Self::with_method(auth, api_root, uri, Method::POST)
    }

    /// Create a dispatcher for an explicit method.
    ///
    /// Only POST can be called, other methods are signed but fail at [`Dispatcher::call`].
    pub fn with_method(
        auth: Arc<Authenticator>,
        api_root: &str,
        uri: &str,
        method: Method,
    ) -> Result<Self> {
        let url = format!("{api_root}{uri}");
        let signed_at = now();
        let headers = auth.headers_at(&url, &method, signed_at)?;
        let payload_template = auth.payload_template();

        Ok(Self {
            auth,
            uri: uri.to_string(),
            url,
            method,
            headers,
            headers_signed_at: signed_at,
            payload_template,
            last_response: None,
        })
    }

    /// The endpoint uri this dispatcher was created for.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The full url requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The configured method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Currently cached headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Currently cached payload template.
    pub fn payload_template(&self) -> &PayloadTemplate {
        &self.payload_template
    }

    /// Re-sign the cached headers.
    pub fn regen_headers(&mut self) -> Result<()> {
        let signed_at = now();
        self.headers = self.auth.headers_at(&self.url, &self.method, signed_at)?;
        self.headers_signed_at = signed_at;

        debug!("headers for {} regenerated", self.url);
        Ok(())
    }

    /// Refresh the cached payload template with a new session token.
    pub fn regen_payload_template(&mut self) {
        self.payload_template = self.auth.payload_template();
        debug!("payload template for {} regenerated", self.url);
    }

    fn headers_expiring(&self, at: DateTime) -> bool {
        (at - self.headers_signed_at).num_seconds() >= EXPIRE_SECONDS - EXPIRE_BUFFER_SECONDS
    }

    /// Send `payload` merged into the payload template.
    ///
    /// With `regen`, the template gets a fresh session token first. Template
    /// fields win over payload fields of the same name. Transport errors are
    /// returned as the transport reported them.
    pub async fn call(&mut self, payload: &Payload, regen: bool) -> Result<Response> {
        if self.method != Method::POST {
            return Err(Error::method_unsupported(format!(
                "calling {} with method {} is not supported, only POST is",
                self.url, self.method
            )));
        }

        if self.headers_expiring(now()) {
            self.regen_headers()?;
        }
        if regen {
            self.regen_payload_template();
        }

        let body = encode_form(&self.payload_template.merge(payload)?);

        let mut req = http::Request::post(&self.url).body(Bytes::from(body))?;
        *req.headers_mut() = self.headers.clone();

        debug!("sending request to {}", self.url);
        let resp = self.auth.context().http_send(req).await?;
        let resp = Response::from(resp);
        debug!("got response from {}: {}", self.url, resp.status());

        self.last_response = Some(resp.clone());
        Ok(resp)
    }

    /// The response of the last successful call, if any.
    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }

    /// Parsed JSON body of the last response, `None` before the first call.
    pub fn json(&self) -> Result<Option<Value>> {
        self.last_response.as_ref().map(Response::json).transpose()
    }
}

/// Response of a yuqing call.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl From<http::Response<Bytes>> for Response {
    fn from(resp: http::Response<Bytes>) -> Self {
        let (parts, body) = resp.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

impl Response {
    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// HTTP status as an integer.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        self.json_as()
    }

    /// Parse the body as JSON into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::unexpected("response body is not valid json").with_source(e))
    }
}
