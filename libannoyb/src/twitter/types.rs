//! Twitter API v1.1 wire types
//!
//! Only the fields annoyb reads are modelled; everything else in the
//! responses is ignored by serde.

use serde::{Deserialize, Serialize};

/// A Twitter account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub screen_name: String,
}

/// One side of a friendship lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSide {
    pub id: u64,
    pub screen_name: String,
    #[serde(default)]
    pub following: bool,
    #[serde(default)]
    pub followed_by: bool,
    /// Only reported for the authenticated side
    #[serde(default)]
    pub blocking: Option<bool>,
    #[serde(default)]
    pub blocked_by: Option<bool>,
}

/// Result of `friendships/show`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: RelationshipSide,
    pub target: RelationshipSide,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RelationshipEnvelope {
    pub relationship: Relationship,
}

/// A posted status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    pub text: String,
}

/// Temporary credentials from `oauth/request_token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
    /// Where the operator authorizes the app and receives the PIN
    pub authorize_url: String,
}

/// Long-lived user credentials from `oauth/access_token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub secret: String,
}
