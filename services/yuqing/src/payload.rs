use crate::constants::*;
use crate::credential::SessionToken;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};
use std::io;
use yqsign_core::utils::Redact;
use yqsign_core::{Error, Result};

/// Caller supplied request fields.
pub type Payload = Map<String, Value>;

/// PayloadTemplate carries the fields every request body must hold.
#[derive(Clone, PartialEq, Eq)]
pub struct PayloadTemplate {
    /// The account's api key.
    pub user_key: String,
    /// Session token bound to `timestamp`.
    pub token: String,
    /// Unix epoch seconds of the session token.
    pub timestamp: String,
}

impl Debug for PayloadTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadTemplate")
            .field("user_key", &self.user_key)
            .field("token", &Redact::from(&self.token))
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl PayloadTemplate {
    /// Build a template for `api_key` from a session token.
    pub fn new(api_key: &str, session: SessionToken) -> Self {
        Self {
            user_key: api_key.to_string(),
            token: session.token,
            timestamp: session.timestamp,
        }
    }

    /// Merge caller fields into the template, producing the form pairs to send.
    ///
    /// Template fields always win: a caller entry named `user_key`, `token` or
    /// `timestamp` is dropped. Lists and mappings are sent as JSON text, `null`
    /// entries are not sent at all.
    pub fn merge(&self, payload: &Payload) -> Result<Vec<(String, String)>> {
        let mut pairs = vec![
            (USER_KEY.to_string(), self.user_key.clone()),
            (TOKEN.to_string(), self.token.clone()),
            (TIMESTAMP.to_string(), self.timestamp.clone()),
        ];

        for (k, v) in payload {
            if [USER_KEY, TOKEN, TIMESTAMP].contains(&k.as_str()) {
                debug!("payload field {k} collides with template, ignored");
                continue;
            }

            let v = match v {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                // Booleans go out as JSON text (`true`), never capitalized (`True`).
                Value::Bool(_) | Value::Number(_) => v.to_string(),
                Value::Array(_) | Value::Object(_) => to_json_text(v)?,
            };
            pairs.push((k.clone(), v));
        }

        Ok(pairs)
    }
}

/// Encode form pairs as `application/x-www-form-urlencoded`.
pub fn encode_form(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Serialize a value with `", "` and `": "` separators, matching what the
/// yuqing server has always received for structured fields.
fn to_json_text(v: &Value) -> Result<String> {
    let mut ser = serde_json::Serializer::with_formatter(Vec::new(), SpacedFormatter);
    v.serialize(&mut ser)
        .map_err(|e| Error::unexpected("serialize payload value failed").with_source(e))?;

    String::from_utf8(ser.into_inner())
        .map_err(|e| Error::unexpected("payload value is not utf-8").with_source(e))
}

struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
