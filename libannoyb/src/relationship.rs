//! Follow/block checks between the account and its targets

use tracing::{error, info, warn};

use crate::error::{RelationshipError, Result};
use crate::twitter::{Relationship, TwitterApi, User};

/// A one-directional follow gap; worth logging, not fatal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipWarning {
    /// The account does not follow the target
    NotFollowing { source: String, target: String },
    /// The target does not follow the account
    NotFollowedBy { source: String, target: String },
}

/// Classify one friendship record
///
/// Blocks in either direction are errors. Otherwise the follow gaps are
/// returned as warnings.
pub fn evaluate(
    relationship: &Relationship,
) -> std::result::Result<Vec<RelationshipWarning>, RelationshipError> {
    let source = &relationship.source;
    let target = &relationship.target;

    if source.blocking == Some(true) {
        return Err(RelationshipError::Blocking {
            source_name: source.screen_name.clone(),
            target_name: target.screen_name.clone(),
        });
    }

    if source.blocked_by == Some(true) {
        return Err(RelationshipError::BlockedBy {
            source_name: source.screen_name.clone(),
            target_name: target.screen_name.clone(),
        });
    }

    let mut warnings = Vec::new();
    if !source.following {
        warnings.push(RelationshipWarning::NotFollowing {
            source: source.screen_name.clone(),
            target: target.screen_name.clone(),
        });
    }
    if !target.following {
        warnings.push(RelationshipWarning::NotFollowedBy {
            source: source.screen_name.clone(),
            target: target.screen_name.clone(),
        });
    }

    Ok(warnings)
}

/// Look up every target and check its relationship with `me`
///
/// Stops at the first block.
pub async fn check_targets(
    api: &dyn TwitterApi,
    me: &User,
    targets: &[String],
) -> Result<Vec<RelationshipWarning>> {
    let mut all_warnings = Vec::new();

    for handle in targets {
        let target = api.get_user(handle).await?;
        info!(target_id = target.id, "Target {} (id: {})", target.screen_name, target.id);

        let relationship = api.show_friendship(me.id, target.id).await?;
        let warnings = evaluate(&relationship).map_err(|e| {
            error!("{}", e);
            e
        })?;

        for warning in &warnings {
            match warning {
                RelationshipWarning::NotFollowing { source, target } => {
                    warn!("User {} not following {}", source, target)
                }
                RelationshipWarning::NotFollowedBy { source, target } => {
                    warn!("User {} not followed by {}", source, target)
                }
            }
        }
        all_warnings.extend(warnings);
    }

    Ok(all_warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::mock::{Flags, MockTwitter};
    use crate::twitter::RelationshipSide;
    use crate::AnnoybError;

    fn side(name: &str, following: bool, blocking: Option<bool>, blocked_by: Option<bool>) -> RelationshipSide {
        RelationshipSide {
            id: 1,
            screen_name: name.to_string(),
            following,
            followed_by: false,
            blocking,
            blocked_by,
        }
    }

    #[test]
    fn test_evaluate_mutual_follow() {
        let rel = Relationship {
            source: side("me", true, Some(false), Some(false)),
            target: side("you", true, None, None),
        };
        assert_eq!(evaluate(&rel), Ok(vec![]));
    }

    #[test]
    fn test_evaluate_blocking() {
        let rel = Relationship {
            source: side("me", true, Some(true), Some(false)),
            target: side("you", true, None, None),
        };
        assert_eq!(
            evaluate(&rel),
            Err(RelationshipError::Blocking {
                source_name: "me".to_string(),
                target_name: "you".to_string()
            })
        );
    }

    #[test]
    fn test_evaluate_blocked_by() {
        let rel = Relationship {
            source: side("me", false, Some(false), Some(true)),
            target: side("you", false, None, None),
        };
        assert!(matches!(evaluate(&rel), Err(RelationshipError::BlockedBy { .. })));
    }

    #[test]
    fn test_evaluate_one_directional_follow() {
        let rel = Relationship {
            source: side("me", false, Some(false), Some(false)),
            target: side("you", true, None, None),
        };
        assert_eq!(
            evaluate(&rel),
            Ok(vec![RelationshipWarning::NotFollowing {
                source: "me".to_string(),
                target: "you".to_string()
            }])
        );

        let rel = Relationship {
            source: side("me", true, None, None),
            target: side("you", false, None, None),
        };
        assert_eq!(
            evaluate(&rel),
            Ok(vec![RelationshipWarning::NotFollowedBy {
                source: "me".to_string(),
                target: "you".to_string()
            }])
        );
    }

    #[tokio::test]
    async fn test_check_targets_stops_at_block() {
        let api = MockTwitter::new("me")
            .with_target("alice", Flags::default())
            .with_target(
                "bob",
                Flags {
                    blocked_by: true,
                    ..Default::default()
                },
            )
            .with_target("carol", Flags::default());
        let me = api.verify_credentials().await.unwrap();
        let targets: Vec<String> = ["alice", "bob", "carol"].iter().map(|s| s.to_string()).collect();

        let err = check_targets(&api, &me, &targets).await.unwrap_err();

        assert!(matches!(
            err,
            AnnoybError::Relationship(RelationshipError::BlockedBy { .. })
        ));
        let lookups = api.calls().iter().filter(|c| *c == "get_user").count();
        assert_eq!(lookups, 2);
    }

    #[tokio::test]
    async fn test_check_targets_collects_warnings() {
        let api = MockTwitter::new("me")
            .with_target(
                "alice",
                Flags {
                    followed_by: false,
                    ..Default::default()
                },
            )
            .with_target("bob", Flags::default());
        let me = api.verify_credentials().await.unwrap();
        let targets = vec!["alice".to_string(), "bob".to_string()];

        let warnings = check_targets(&api, &me, &targets).await.unwrap();
        assert_eq!(
            warnings,
            vec![RelationshipWarning::NotFollowedBy {
                source: "me".to_string(),
                target: "alice".to_string()
            }]
        );
    }
}
