//! First-run authorization
//!
//! Without an access token the operator has to authorize the app once: open
//! the printed URL, approve, and type the PIN back in. The resulting token
//! pair is printed as a config snippet to paste into the configuration file.

use std::io::{BufRead, Write};
use tracing::warn;

use crate::error::{AnnoybError, Result};
use crate::twitter::{AccessToken, TwitterApi};

/// Run the PIN flow against `api`, prompting on `output` and reading from `input`
pub async fn bootstrap<R: BufRead, W: Write>(
    api: &dyn TwitterApi,
    input: &mut R,
    output: &mut W,
) -> Result<AccessToken> {
    warn!("Attempting to get access token");

    let request = api.request_token().await.map_err(auth_error)?;

    writeln!(output, "Access Twitter OAuth URL: {}", request.authorize_url)?;
    write!(output, "Enter request token: ")?;
    output.flush()?;

    let mut verifier = String::new();
    input.read_line(&mut verifier)?;
    let verifier = verifier.trim();
    if verifier.is_empty() {
        return Err(AnnoybError::Authentication(
            "No verifier entered".to_string(),
        ));
    }

    let access = api
        .access_token(&request, verifier)
        .await
        .map_err(auth_error)?;

    writeln!(output, "Access token config: {}", token_snippet(&access))?;
    warn!("Save authentication token in configuration");

    Ok(access)
}

/// Pretty JSON with the two config fields to persist
pub fn token_snippet(access: &AccessToken) -> String {
    let snippet = serde_json::json!({
        "twitter_access_token": access.token,
        "twitter_access_token_secret": access.secret,
    });
    // Serializing a json! value cannot fail
    serde_json::to_string_pretty(&snippet).unwrap_or_default()
}

fn auth_error(err: AnnoybError) -> AnnoybError {
    match err {
        AnnoybError::Authentication(_) => err,
        other => AnnoybError::Authentication(format!(
            "Failed to get Twitter request or access token: {other}"
        )),
    }
}
