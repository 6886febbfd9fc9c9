//! Twitter API collaborator
//!
//! The run flow only talks to Twitter through [`TwitterApi`], so the real
//! HTTP client can be swapped for [`mock::MockTwitter`] in tests.
//!
//! # Examples
//!
//! ```no_run
//! use libannoyb::config::Config;
//! use libannoyb::twitter::{client::TwitterClient, TwitterApi};
//!
//! # async fn example(config: &Config) -> libannoyb::Result<()> {
//! let api = TwitterClient::new(config)?;
//! let me = api.verify_credentials().await?;
//! println!("Authenticated as {} (id: {})", me.screen_name, me.id);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

pub mod client;
pub mod mock;
pub mod oauth;
pub mod types;

pub use types::{AccessToken, Relationship, RelationshipSide, RequestToken, Status, User};

/// Operations annoyb needs from the platform
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Start the PIN flow and return the temporary token with its authorization URL
    async fn request_token(&self) -> Result<RequestToken>;

    /// Exchange an authorized request token and PIN for an access token
    async fn access_token(&self, request: &RequestToken, verifier: &str) -> Result<AccessToken>;

    /// Return the authenticated account
    ///
    /// # Errors
    ///
    /// Fails with a 401 `ApiError::Status` when the access token is rejected.
    async fn verify_credentials(&self) -> Result<User>;

    /// Raw rate-limit status tree
    async fn rate_limit_status(&self) -> Result<Map<String, Value>>;

    async fn get_user(&self, screen_name: &str) -> Result<User>;

    async fn show_friendship(&self, source_id: u64, target_id: u64) -> Result<Relationship>;

    /// Post a status and return it as created
    async fn update_status(&self, text: &str) -> Result<Status>;
}
