//! Twitter REST API client over reqwest

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{AnnoybError, ApiError, Result};
use crate::twitter::oauth::OAuthSigner;
use crate::twitter::types::{
    AccessToken, Relationship, RelationshipEnvelope, RequestToken, Status, User,
};
use crate::twitter::TwitterApi;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Signed client for the v1.1 API and the OAuth endpoints
#[derive(Debug)]
pub struct TwitterClient {
    client: Client,
    base_url: String,
    signer: OAuthSigner,
    consumer: OAuthSigner,
}

impl TwitterClient {
    /// Create a client from configuration
    ///
    /// Access tokens may be empty; only the token exchange endpoints work
    /// until they are set.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("annoyb/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Http)?;

        let consumer =
            OAuthSigner::new(&config.twitter_consumer_key, &config.twitter_consumer_secret);
        let signer = if config.has_access_token() {
            consumer.clone().with_token(
                &config.twitter_access_token,
                &config.twitter_access_token_secret,
            )
        } else {
            consumer.clone()
        };

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            signer,
            consumer,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let response = self
            .send(&self.signer, method, endpoint, params, &[])
            .await?;
        let bytes = response.bytes().await.map_err(ApiError::Http)?;
        Ok(serde_json::from_slice(&bytes).map_err(ApiError::Json)?)
    }

    async fn send(
        &self,
        signer: &OAuthSigner,
        method: Method,
        endpoint: &str,
        params: &[(String, String)],
        extra_oauth: &[(String, String)],
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(method = %method, endpoint, "Making Twitter API request");

        let auth_header =
            signer.authorization_header(method.as_str(), &url, params, extra_oauth)?;

        let mut req = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", auth_header);

        req = if method == Method::GET {
            req.query(params)
        } else {
            req.form(params)
        };

        let response = req.send().await.map_err(ApiError::Http)?;
        check_status(response).await
    }

    async fn token_form(
        &self,
        signer: &OAuthSigner,
        endpoint: &str,
        extra_oauth: &[(String, String)],
    ) -> Result<HashMap<String, String>> {
        let response = self
            .send(signer, Method::POST, endpoint, &[], extra_oauth)
            .await
            .map_err(|e| AnnoybError::Authentication(format!("{endpoint}: {e}")))?;
        let body = response
            .text()
            .await
            .map_err(|e| AnnoybError::Authentication(format!("{endpoint}: {e}")))?;
        Ok(parse_form(&body))
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        errors: Vec<ErrorEntry>,
    }

    #[derive(serde::Deserialize)]
    struct ErrorEntry {
        #[serde(default)]
        code: Option<i64>,
        message: String,
    }

    let bytes = response.bytes().await.map_err(ApiError::Http)?;
    let message = match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(body) if !body.errors.is_empty() => body
            .errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} (code {})", e.message, code),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::from_utf8_lossy(&bytes).trim().to_string(),
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    }
    .into())
}

/// Decode an `application/x-www-form-urlencoded` body
fn parse_form(body: &str) -> HashMap<String, String> {
    let decode = |s: &str| {
        let s = s.replace('+', " ");
        percent_decode_str(&s).decode_utf8_lossy().into_owned()
    };

    body.trim()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode(k), decode(v)),
            None => (decode(pair), String::new()),
        })
        .collect()
}

fn take_field(form: &mut HashMap<String, String>, field: &str) -> Result<String> {
    form.remove(field)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AnnoybError::Authentication(format!("response is missing {field}")))
}

fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[async_trait]
impl TwitterApi for TwitterClient {
    #[instrument(skip(self))]
    async fn request_token(&self) -> Result<RequestToken> {
        let mut form = self
            .token_form(
                &self.consumer,
                "/oauth/request_token",
                &[param("oauth_callback", "oob")],
            )
            .await?;

        let token = take_field(&mut form, "oauth_token")?;
        let secret = take_field(&mut form, "oauth_token_secret")?;
        let authorize_url = format!(
            "{}/oauth/authorize?oauth_token={}",
            self.base_url,
            crate::twitter::oauth::percent_encode(&token)
        );

        Ok(RequestToken {
            token,
            secret,
            authorize_url,
        })
    }

    #[instrument(skip(self, request, verifier))]
    async fn access_token(&self, request: &RequestToken, verifier: &str) -> Result<AccessToken> {
        let signer = self.consumer.clone().with_token(&request.token, &request.secret);
        let mut form = self
            .token_form(
                &signer,
                "/oauth/access_token",
                &[param("oauth_verifier", verifier)],
            )
            .await?;

        Ok(AccessToken {
            token: take_field(&mut form, "oauth_token")?,
            secret: take_field(&mut form, "oauth_token_secret")?,
        })
    }

    #[instrument(skip(self))]
    async fn verify_credentials(&self) -> Result<User> {
        self.call(Method::GET, "/1.1/account/verify_credentials.json", &[])
            .await
    }

    #[instrument(skip(self))]
    async fn rate_limit_status(&self) -> Result<Map<String, Value>> {
        let value: Value = self
            .call(Method::GET, "/1.1/application/rate_limit_status.json", &[])
            .await?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ApiError::Unexpected(format!(
                "rate limit status is not an object: {other}"
            ))
            .into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_user(&self, screen_name: &str) -> Result<User> {
        self.call(
            Method::GET,
            "/1.1/users/show.json",
            &[param("screen_name", screen_name)],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn show_friendship(&self, source_id: u64, target_id: u64) -> Result<Relationship> {
        let envelope: RelationshipEnvelope = self
            .call(
                Method::GET,
                "/1.1/friendships/show.json",
                &[param("source_id", source_id), param("target_id", target_id)],
            )
            .await?;
        Ok(envelope.relationship)
    }

    #[instrument(skip(self))]
    async fn update_status(&self, text: &str) -> Result<Status> {
        self.call(
            Method::POST,
            "/1.1/statuses/update.json",
            &[param("status", text)],
        )
        .await
    }
}
