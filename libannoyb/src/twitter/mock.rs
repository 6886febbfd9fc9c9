//! In-memory Twitter for tests
//!
//! `MockTwitter` answers every [`TwitterApi`] call from canned data and
//! records what was posted, so the run flow can be exercised without
//! credentials or network access.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{AnnoybError, ApiError, Result};
use crate::twitter::types::{
    AccessToken, Relationship, RelationshipSide, RequestToken, Status, User,
};
use crate::twitter::TwitterApi;

/// Relationship flags between the mock account and one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub following: bool,
    pub followed_by: bool,
    pub blocking: bool,
    pub blocked_by: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            following: true,
            followed_by: true,
            blocking: false,
            blocked_by: false,
        }
    }
}

/// Mock Twitter API
pub struct MockTwitter {
    me: User,
    users: HashMap<String, User>,
    flags: HashMap<u64, Flags>,
    rate_limits: Map<String, Value>,
    auth_error: Option<String>,
    access_token: AccessToken,
    next_id: u64,
    posted: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTwitter {
    /// A mock authenticated as `screen_name` with no targets and empty rate limits
    pub fn new(screen_name: &str) -> Self {
        Self {
            me: User {
                id: 1,
                screen_name: screen_name.to_string(),
            },
            users: HashMap::new(),
            flags: HashMap::new(),
            rate_limits: Map::new(),
            auth_error: None,
            access_token: AccessToken {
                token: "mock-token".to_string(),
                secret: "mock-secret".to_string(),
            },
            next_id: 1000,
            posted: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a target account with the given relationship flags
    pub fn with_target(mut self, screen_name: &str, flags: Flags) -> Self {
        let id = self.next_id;
        self.next_id += 1;
        self.users.insert(
            screen_name.to_string(),
            User {
                id,
                screen_name: screen_name.to_string(),
            },
        );
        self.flags.insert(id, flags);
        self
    }

    /// Serve this tree from `rate_limit_status`
    ///
    /// Non-object values are served as an empty tree.
    pub fn with_rate_limits(mut self, tree: Value) -> Self {
        self.rate_limits = match tree {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Make `verify_credentials` fail with a 401
    pub fn with_auth_failure(mut self, message: &str) -> Self {
        self.auth_error = Some(message.to_string());
        self
    }

    /// Texts passed to `update_status`
    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }

    /// Names of the API calls made, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn not_found(what: String) -> AnnoybError {
        ApiError::Status {
            status: 404,
            message: what,
        }
        .into()
    }
}

#[async_trait]
impl TwitterApi for MockTwitter {
    async fn request_token(&self) -> Result<RequestToken> {
        self.record("request_token");
        Ok(RequestToken {
            token: "mock-request".to_string(),
            secret: "mock-request-secret".to_string(),
            authorize_url: "https://api.twitter.com/oauth/authorize?oauth_token=mock-request"
                .to_string(),
        })
    }

    async fn access_token(&self, request: &RequestToken, verifier: &str) -> Result<AccessToken> {
        self.record("access_token");
        if request.token != "mock-request" || verifier.is_empty() {
            return Err(AnnoybError::Authentication(
                "Invalid request token or verifier".to_string(),
            ));
        }
        Ok(self.access_token.clone())
    }

    async fn verify_credentials(&self) -> Result<User> {
        self.record("verify_credentials");
        match &self.auth_error {
            Some(message) => Err(ApiError::Status {
                status: 401,
                message: message.clone(),
            }
            .into()),
            None => Ok(self.me.clone()),
        }
    }

    async fn rate_limit_status(&self) -> Result<Map<String, Value>> {
        self.record("rate_limit_status");
        Ok(self.rate_limits.clone())
    }

    async fn get_user(&self, screen_name: &str) -> Result<User> {
        self.record("get_user");
        self.users
            .get(screen_name)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("User not found: {screen_name}")))
    }

    async fn show_friendship(&self, source_id: u64, target_id: u64) -> Result<Relationship> {
        self.record("show_friendship");
        let flags = self
            .flags
            .get(&target_id)
            .copied()
            .ok_or_else(|| Self::not_found(format!("No relationship for {target_id}")))?;
        let target = self
            .users
            .values()
            .find(|u| u.id == target_id)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("User not found: {target_id}")))?;

        Ok(Relationship {
            source: RelationshipSide {
                id: source_id,
                screen_name: self.me.screen_name.clone(),
                following: flags.following,
                followed_by: flags.followed_by,
                blocking: Some(flags.blocking),
                blocked_by: Some(flags.blocked_by),
            },
            target: RelationshipSide {
                id: target.id,
                screen_name: target.screen_name,
                following: flags.followed_by,
                followed_by: flags.following,
                blocking: None,
                blocked_by: None,
            },
        })
    }

    async fn update_status(&self, text: &str) -> Result<Status> {
        self.record("update_status");
        let mut posted = self.posted.lock().unwrap();
        posted.push(text.to_string());
        Ok(Status {
            id: 5000 + posted.len() as u64,
            text: text.to_string(),
        })
    }
}
