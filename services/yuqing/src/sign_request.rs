//! Signer for yuqing authorization values.
//!
//! A restricted subset of the BCE auth scheme: POST-style requests, host-only
//! canonical headers and no query parameters. Everything here is pure.
//!
//! ```text
//! signing_key   = HEX(HMAC-SHA256(secret_key, version/access_key/timestamp/expiry))
//! string_to_sign = METHOD + "\n" + PATH + "\n" + "" + "\n" + "host:" + HOST
//! signature      = HEX(HMAC-SHA256(signing_key, string_to_sign))
//! authorization  = version/access_key/timestamp/expiry/host/signature
//! ```

use http::Uri;
use log::debug;
use yqsign_core::hash::hex_hmac_sha256;
use yqsign_core::{Error, Result};

/// Parameters of a single signature computation.
///
/// Built fresh for every signature since `timestamp` must be the signing time.
#[derive(Debug, Clone)]
pub struct SigningContext<'a> {
    /// Access key embedded in the authorization value.
    pub access_key: &'a str,
    /// Secret key the signing key is derived from.
    pub secret_key: &'a str,
    /// ISO 8601 UTC timestamp with second precision: "2020-01-01T00:00:00Z"
    pub timestamp: &'a str,
    /// Validity window in seconds, string encoded.
    pub expiry: &'a str,
    /// Version tag like `v1`.
    pub version: &'a str,
    /// HTTP method, used as given.
    pub method: &'a str,
    /// Target host, including the port when the url carries one.
    pub host: &'a str,
    /// Target path without query.
    pub path: &'a str,
}

impl SigningContext<'_> {
    /// Compute the authorization value.
    pub fn authorization(&self) -> String {
        let key = derive_signing_key(
            self.access_key,
            self.secret_key,
            self.timestamp,
            self.expiry,
            self.version,
        );
        let signature = derive_signature(&key, self.method, self.path, self.host);

        // The literal `host` names the signed header list, not the host value.
        [
            self.version,
            self.access_key,
            self.timestamp,
            self.expiry,
            "host",
            signature.as_str(),
        ]
        .join("/")
    }
}

/// Derive the signing key from the long-lived secret and the validity window.
pub fn derive_signing_key(
    access_key: &str,
    secret_key: &str,
    timestamp: &str,
    expiry: &str,
    version: &str,
) -> String {
    let auth_prefix = [version, access_key, timestamp, expiry].join("/");
    hex_hmac_sha256(secret_key.as_bytes(), auth_prefix.as_bytes())
}

/// Derive the signature of a request under a signing key.
///
/// The third line stays empty: only POST bodies are signed, never query strings.
pub fn derive_signature(key: &str, method: &str, path: &str, host: &str) -> String {
    let string_to_sign = string_to_sign(method, path, host);
    debug!("string to sign: {:?}", string_to_sign);

    hex_hmac_sha256(key.as_bytes(), string_to_sign.as_bytes())
}

fn string_to_sign(method: &str, path: &str, host: &str) -> String {
    [method, path, "", format!("host:{host}").as_str()].join("\n")
}

/// Build the authorization value for calling `method` on `url`.
pub fn build_authorization(
    access_key: &str,
    secret_key: &str,
    timestamp: &str,
    expiry: &str,
    url: &str,
    method: &str,
    version: &str,
) -> Result<String> {
    let (host, path) = parse_host_path(url)?;

    Ok(SigningContext {
        access_key,
        secret_key,
        timestamp,
        expiry,
        version,
        method,
        host: &host,
        path: &path,
    }
    .authorization())
}

/// Split a url into its authority and path.
///
/// Query and fragment are excluded. The path is kept as written, trailing
/// slashes included; a url without a path yields an empty path, not `/`.
pub fn parse_host_path(url: &str) -> Result<(String, String)> {
    let uri: Uri = url.parse()?;
    let host = uri
        .authority()
        .ok_or_else(|| Error::request_invalid(format!("url {url} has no host")))?
        .as_str();

    // `Uri::path` reports `/` when the url has no path at all.
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let after_host = rest.strip_prefix(host).unwrap_or(rest);
    let path = if after_host.starts_with('/') {
        uri.path()
    } else {
        ""
    };

    Ok((host.to_string(), path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;
    use yqsign_core::ErrorKind;

    const TIMESTAMP: &str = "2020-01-01T00:00:00Z";
    const URL: &str = "http://example.com/openapi/gettasklist";

    fn authorization(url: &str, method: &str) -> String {
        build_authorization("AK1", "SK1", TIMESTAMP, "1800", url, method, "v1")
            .expect("sign must succeed")
    }

    #[test]
    fn test_derive_signing_key() {
        assert_eq!(
            derive_signing_key("AK1", "SK1", TIMESTAMP, "1800", "v1"),
            "f28dff9db92144fb9bac21b1e2a156619af78f5eb681bde33f53aaf1e7754016"
        );
    }

    #[test]
    fn test_derive_signature() {
        assert_eq!(
            derive_signature(
                "f28dff9db92144fb9bac21b1e2a156619af78f5eb681bde33f53aaf1e7754016",
                "POST",
                "/openapi/gettasklist",
                "example.com"
            ),
            "4a4454dda4c36003bd31e90dc986b0c978ccbfcb4a2cf442d6b0f1e22bdf2493"
        );
    }

    #[test]
    fn test_string_to_sign() {
        assert_eq!(
            string_to_sign("POST", "/openapi/gettasklist", "example.com"),
            "POST\n/openapi/gettasklist\n\nhost:example.com"
        );
    }

    #[test]
    fn test_build_authorization() {
        assert_eq!(
            authorization(URL, "POST"),
            "v1/AK1/2020-01-01T00:00:00Z/1800/host/4a4454dda4c36003bd31e90dc986b0c978ccbfcb4a2cf442d6b0f1e22bdf2493"
        );
    }

    #[test]
    fn test_build_authorization_with_bce_version() {
        let v = build_authorization("AK1", "SK1", TIMESTAMP, "1800", URL, "POST", "bce-auth-v1")
            .unwrap();
        assert_eq!(
            v,
            "bce-auth-v1/AK1/2020-01-01T00:00:00Z/1800/host/ee3717a74e8018abed7d2751813364628f190ff8bc6ee9f297db40f3d2f05e8f"
        );
    }

    #[test]
    fn test_build_authorization_is_deterministic() {
        assert_eq!(authorization(URL, "POST"), authorization(URL, "POST"));
    }

    #[test]
    fn test_query_is_not_signed() {
        assert_eq!(
            authorization(URL, "POST"),
            authorization(&format!("{URL}?page=1"), "POST")
        );
    }

    #[test]
    fn test_authorization_with_port() {
        assert_eq!(
            authorization("http://example.com:8080/openapi/gettasklist", "POST"),
            "v1/AK1/2020-01-01T00:00:00Z/1800/host/5fa6e907031ac52b643c511852c5387955471c9ca89bdd5428868149f96b807c"
        );
    }

    #[test]
    fn test_authorization_with_empty_path() {
        let expected = "v1/AK1/2020-01-01T00:00:00Z/1800/host/665bec8aa40379ec61ed2f69bd9efde26084294fb1c1fa509ee7c57de6dbc29a";
        assert_eq!(authorization("http://example.com", "POST"), expected);
        assert_eq!(authorization("http://example.com?x=1", "POST"), expected);
    }

    #[test]
    fn test_authorization_with_root_path() {
        assert_eq!(
            authorization("http://example.com/", "POST"),
            "v1/AK1/2020-01-01T00:00:00Z/1800/host/00c06094cf14f9d929bb0b5c20f13d4867b73db3604b32b3f32f6bb7ce290fbf"
        );
    }

    #[test_case("http://example.com/openapi/gettasklist", "GET" ; "method")]
    #[test_case("http://example.com/openapi/gettasklist", "post" ; "method case")]
    #[test_case("http://example.com/openapi/gettasklisT", "POST" ; "path")]
    #[test_case("http://example.com/openapi/gettasklist/", "POST" ; "trailing slash")]
    #[test_case("http://example.org/openapi/gettasklist", "POST" ; "host")]
    fn test_signature_changes(url: &str, method: &str) {
        assert_ne!(authorization(URL, "POST"), authorization(url, method));
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let a = build_authorization("AK1", "SK1", TIMESTAMP, "1800", URL, "POST", "v1").unwrap();
        let b = build_authorization("AK1", "SK2", TIMESTAMP, "1800", URL, "POST", "v1").unwrap();
        assert_ne!(a, b);
    }

    #[test_case("http://example.com/openapi/gettasklist", "example.com", "/openapi/gettasklist" ; "plain")]
    #[test_case("https://example.com:8443/a/b/?x=1", "example.com:8443", "/a/b/" ; "port and query")]
    #[test_case("http://example.com", "example.com", "" ; "no path")]
    #[test_case("http://example.com?x=1", "example.com", "" ; "no path with query")]
    #[test_case("http://example.com#top", "example.com", "" ; "no path with fragment")]
    #[test_case("http://example.com/", "example.com", "/" ; "root path")]
    #[test_case("http://host:80/h", "host:80", "/h" ; "host repeated in path")]
    fn test_parse_host_path(url: &str, host: &str, path: &str) {
        let (h, p) = parse_host_path(url).expect("url must be valid");
        assert_eq!(h, host);
        assert_eq!(p, path);
    }

    #[test]
    fn test_parse_host_path_without_host() {
        let err = parse_host_path("/openapi/gettasklist").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }
}
