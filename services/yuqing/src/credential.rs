// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::*;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use yqsign_core::hash::hex_hmac_sha1;
use yqsign_core::time::{format_unix_seconds, DateTime};
use yqsign_core::utils::Redact;
use yqsign_core::{Error, Result, SigningCredential};

/// SecretBundle holds the four long-lived secrets of a yuqing account.
///
/// `access_key`/`secret_key` sign the Authorization header, `api_key`/`api_secret`
/// produce the session token carried in every request body.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBundle {
    /// Access key, sent in clear inside the authorization value.
    pub access_key: String,
    /// Secret key, keys the signing key derivation.
    pub secret_key: String,
    /// Api key, sent as `user_key`.
    pub api_key: String,
    /// Api secret, keys the session token.
    pub api_secret: String,
}

impl Debug for SecretBundle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBundle")
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("api_key", &Redact::from(&self.api_key))
            .field("api_secret", &Redact::from(&self.api_secret))
            .finish()
    }
}

impl SigningCredential for SecretBundle {
    fn is_valid(&self) -> bool {
        !(self.access_key.is_empty()
            || self.secret_key.is_empty()
            || self.api_key.is_empty()
            || self.api_secret.is_empty())
    }
}

impl SecretBundle {
    /// Build a bundle from its four values.
    pub fn new(access_key: &str, secret_key: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }

    /// Parse a bundle from JSON text.
    pub fn from_slice(v: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(v)
            .map_err(|e| Error::config_invalid("secrets are not valid json").with_source(e))?;
        Self::from_value(value)
    }

    /// Build a bundle from a key-value mapping.
    ///
    /// The mapping must hold exactly `access_key`, `secret_key`, `api_key` and
    /// `api_secret` as non-empty strings. Missing and extra keys both fail.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::config_invalid("secrets should be a mapping"));
        };

        let expected: BTreeSet<&str> = SECRET_NAMES.into_iter().collect();
        let actual: BTreeSet<&str> = map.keys().map(String::as_str).collect();
        if expected != actual {
            let missing: Vec<&str> = expected.difference(&actual).copied().collect();
            let extra: Vec<&str> = actual.difference(&expected).copied().collect();
            return Err(Error::config_invalid(format!(
                "secrets must have exactly the keys {SECRET_NAMES:?}, missing: {missing:?}, extra: {extra:?}"
            )));
        }

        let field = |name: &str| -> Result<String> {
            match map.get(name) {
                Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
                Some(Value::String(_)) => {
                    Err(Error::config_invalid(format!("secret {name} is empty")))
                }
                _ => Err(Error::config_invalid(format!(
                    "secret {name} should be a string"
                ))),
            }
        };

        Ok(Self {
            access_key: field(ACCESS_KEY)?,
            secret_key: field(SECRET_KEY)?,
            api_key: field(API_KEY)?,
            api_secret: field(API_SECRET)?,
        })
    }

    /// Derive the session token for the given time.
    pub fn session_token(&self, now: DateTime) -> SessionToken {
        SessionToken::generate(&self.api_key, &self.api_secret, now)
    }
}

/// SessionToken is the short-lived token embedded in request bodies.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Unix epoch seconds the token is bound to.
    pub timestamp: String,
    /// Hex HMAC-SHA1 of `api_key + timestamp` keyed by `api_secret`.
    pub token: String,
}

impl Debug for SessionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("timestamp", &self.timestamp)
            .field("token", &Redact::from(&self.token))
            .finish()
    }
}

impl SessionToken {
    /// Generate a token at `now`.
    ///
    /// The timestamp is epoch seconds, not the ISO 8601 form used by
    /// authorization values. The server checks both, in their own formats.
    pub fn generate(api_key: &str, api_secret: &str, now: DateTime) -> Self {
        let timestamp = format_unix_seconds(now);
        let token = hex_hmac_sha1(
            api_secret.as_bytes(),
            format!("{api_key}{timestamp}").as_bytes(),
        );

        Self { timestamp, token }
    }
}
