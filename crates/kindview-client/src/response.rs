//! Interpreting store service responses

use kindview_core::{KindviewError, Record, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Deserialize)]
#[serde(untagged)]
enum Answer<T> {
    Ok(T),
    Failure { error: String },
}

/// Map a non-success response to the error taxonomy.
///
/// A 403 with a login URL asks for re-authentication; without one it is an
/// ordinary remote failure like any other status.
pub fn classify_failure(status: u16, login_url: Option<String>, body: String) -> KindviewError {
    match (status, login_url) {
        (403, Some(redirect_url)) if !redirect_url.trim().is_empty() => {
            KindviewError::AuthRequired { redirect_url }
        }
        (status, _) => KindviewError::Remote { status, body },
    }
}

/// Parse a success body that is either the payload or `{"error": "..."}`
pub fn parse_answer<T: DeserializeOwned>(body: &str) -> Result<T> {
    match serde_json::from_str::<Answer<T>>(body) {
        Ok(Answer::Ok(value)) => Ok(value),
        Ok(Answer::Failure { error }) => Err(KindviewError::LogicalQuery(error)),
        Err(err) => Err(KindviewError::InvalidResponse(format!(
            "{}: {}",
            err,
            truncate(body, 200)
        ))),
    }
}

pub fn parse_records(body: &str) -> Result<Vec<Record>> {
    parse_answer(body)
}

pub fn parse_count(body: &str) -> Result<u64> {
    parse_answer(body)
}

pub fn parse_kinds(body: &str) -> Result<Vec<String>> {
    parse_answer(body)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
