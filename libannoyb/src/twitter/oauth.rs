//! OAuth 1.0a request signing
//!
//! Twitter's v1.1 user-context endpoints and the PIN-based token exchange
//! both require HMAC-SHA1 signed `Authorization` headers.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use sha1::Sha1;

use crate::error::ApiError;

/// Everything except RFC 3986 unreserved characters
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Signs requests for one consumer, optionally on behalf of a token
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
    token: Option<String>,
    token_secret: String,
}

impl OAuthSigner {
    pub fn new(consumer_key: &str, consumer_secret: &str) -> Self {
        Self {
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
            token: None,
            token_secret: String::new(),
        }
    }

    /// Sign on behalf of a request or access token
    pub fn with_token(mut self, token: &str, token_secret: &str) -> Self {
        self.token = Some(token.to_string());
        self.token_secret = token_secret.to_string();
        self
    }

    /// Build the `Authorization` header value
    ///
    /// * `url` - Request URL without query string
    /// * `params` - Query and form body parameters, which are part of the signature
    /// * `extra_oauth` - Additional protocol parameters such as `oauth_callback`
    ///   or `oauth_verifier`
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        extra_oauth: &[(String, String)],
    ) -> Result<String, ApiError> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| ApiError::OAuth(format!("Failed to get timestamp: {e}")))?
            .as_secs()
            .to_string();

        self.header_with(method, url, params, extra_oauth, &timestamp, &generate_nonce())
    }

    fn header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        extra_oauth: &[(String, String)],
        timestamp: &str,
        nonce: &str,
    ) -> Result<String, ApiError> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        if let Some(token) = &self.token {
            oauth_params.push(("oauth_token".to_string(), token.clone()));
        }
        oauth_params.extend(extra_oauth.iter().cloned());

        let signature = self.signature(method, url, &oauth_params, params)?;
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {header}"))
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        oauth_params: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<String, ApiError> {
        // Sort on the encoded pairs
        let mut encoded: Vec<(String, String)> = oauth_params
            .iter()
            .chain(params.iter())
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(url),
            percent_encode(&param_string)
        );

        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.token_secret)
        );

        hmac_sha1(&signing_key, &base_string)
    }
}

/// Percent-encode according to RFC 3986
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hmac_sha1(key: &str, data: &str) -> Result<String, ApiError> {
    type HmacSha1 = Hmac<Sha1>;

    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| ApiError::OAuth(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
