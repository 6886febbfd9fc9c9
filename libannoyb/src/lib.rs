//! annoyb - a slightly annoying Twitter thing
//!
//! Checks rate-limit and follow/block state between an account and a list
//! of targets, then optionally posts a templated message addressed to them.

pub mod auth;
pub mod compose;
pub mod config;
pub mod error;
pub mod logging;
pub mod rate_limit;
pub mod relationship;
pub mod runner;
pub mod tree;
pub mod twitter;

// Re-export commonly used types
pub use config::Config;
pub use error::{AnnoybError, Result};
pub use runner::{run, RunOptions, RunSummary};
pub use twitter::{client::TwitterClient, TwitterApi};
