//! The check-then-post flow
//!
//! One run verifies the credentials, reports rate limits, checks every
//! target's relationship with the account and, when a message is given,
//! composes and posts it. Any block between the account and a target aborts
//! the run before anything is posted.

use tracing::info;

use crate::compose::compose;
use crate::config::Config;
use crate::error::Result;
use crate::rate_limit::{self, RateLimitReport, MARKER_FIELD};
use crate::relationship::{self, RelationshipWarning};
use crate::tree::{collect_leaves, flatten_branches};
use crate::twitter::{Status, TwitterApi, User};

/// Options for a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Message to compose and post after the checks
    pub message: Option<String>,
    /// Compose but do not post
    pub dry_run: bool,
    /// Report every endpoint instead of one record per top-level branch
    pub all_endpoints: bool,
}

/// What a run found and did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub user: User,
    pub rate_limits: RateLimitReport,
    pub warnings: Vec<RelationshipWarning>,
    /// The composed text, if a message was given
    pub composed: Option<String>,
    /// The posted status, unless this was a dry run
    pub posted: Option<Status>,
}

pub async fn run(config: &Config, api: &dyn TwitterApi, options: &RunOptions) -> Result<RunSummary> {
    let user = api.verify_credentials().await?;
    info!(user_id = user.id, "Authenticated as {} (id: {})", user.screen_name, user.id);

    let status = api.rate_limit_status().await?;
    let limits = if options.all_endpoints {
        collect_leaves(&status, MARKER_FIELD)
    } else {
        flatten_branches(&status, MARKER_FIELD)
    };
    let rate_limits = rate_limit::report(&limits);

    let warnings = relationship::check_targets(api, &user, &config.tweet.target).await?;

    let mut summary = RunSummary {
        user,
        rate_limits,
        warnings,
        composed: None,
        posted: None,
    };

    let Some(message) = &options.message else {
        info!("No message given, checks only");
        return Ok(summary);
    };

    let tweet = compose(&config.tweet, message)?;
    summary.composed = Some(tweet.clone());

    if options.dry_run {
        info!("Dry run, not posting: {}", tweet);
        return Ok(summary);
    }

    let posted = api.update_status(&tweet).await?;
    info!(status_id = posted.id, "Tweet sent: {}", posted.text);
    summary.posted = Some(posted);

    Ok(summary)
}
