//! Tweet composition
//!
//! Renders the configured template into the final status text. The target
//! list becomes `@handle` entries joined with the configured delimiter, and
//! `message`, `hashtag` and any extra `tweet` fields fill the remaining
//! `{name}` placeholders. `{{` and `}}` produce literal braces.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::TweetConfig;
use crate::error::ComposeError;

/// Maximum status length in characters
pub const TWEET_LIMIT: usize = 140;

/// Expand handles into `@a<delim>@b`
pub fn expand_targets(targets: &[String], delimiter: &str) -> String {
    targets
        .iter()
        .map(|handle| format!("@{}", handle))
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// Render the tweet for `message`
///
/// The config is only borrowed, so the same settings can be composed again.
/// Fails with [`ComposeError::LengthExceeded`] when the result is longer than
/// [`TWEET_LIMIT`].
pub fn compose(config: &TweetConfig, message: &str) -> Result<String, ComposeError> {
    let fields = template_fields(config, message)?;
    let tweet = render(&config.format, &fields)?;

    let length = tweet.chars().count();
    if length > TWEET_LIMIT {
        return Err(ComposeError::LengthExceeded {
            length,
            limit: TWEET_LIMIT,
        });
    }

    Ok(tweet)
}

fn template_fields(
    config: &TweetConfig,
    message: &str,
) -> Result<BTreeMap<String, String>, ComposeError> {
    let mut fields = BTreeMap::new();

    for (name, value) in &config.extra {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return Err(ComposeError::UnsupportedField(name.clone())),
        };
        fields.insert(name.clone(), text);
    }

    fields.insert(
        "target".to_string(),
        expand_targets(&config.target, &config.target_delimiter),
    );
    fields.insert("message".to_string(), message.to_string());
    fields.insert("hashtag".to_string(), config.hashtag.clone());

    Ok(fields)
}

/// Substitute `{name}` placeholders from `fields`
///
/// Names are matched exactly, so `{ message }` looks up `" message "`.
pub fn render(template: &str, fields: &BTreeMap<String, String>) -> Result<String, ComposeError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => {
                            return Err(ComposeError::Template(format!(
                                "unexpected '{{' inside placeholder '{}'",
                                name
                            )))
                        }
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(ComposeError::Template(format!(
                                "unclosed placeholder '{{{}'",
                                name
                            )))
                        }
                    }
                }

                let value = fields
                    .get(&name)
                    .ok_or_else(|| ComposeError::MissingField(name.clone()))?;
                out.push_str(value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(ComposeError::Template(
                    "single '}' encountered in template".to_string(),
                ))
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
