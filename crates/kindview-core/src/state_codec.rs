//! Encoded query state
//!
//! A [`Query`] is persisted and shared as a small JSON document:
//!
//! ```json
//! {"kind":"User","ancestor":"Org(7)","filters":["age > Long(5)"],"limit":"100"}
//! ```
//!
//! Only effective filters (named and active) are written. Decoded filters are
//! always active, so the `active` flag does not survive a round trip. The
//! transient `count` flag is never written.
//!
//! For links the document travels in the URL fragment, base64url encoded so
//! it survives bookmarking without further escaping. Raw JSON fragments are
//! accepted as well, percent-encoded or not, since browsers escape quotes
//! and spaces when a link is pasted.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::filter_codec::{decode_filter, encode_filter};
use crate::types::non_empty;
use crate::{KindviewError, Limit, Query, Result};

#[derive(Debug, Serialize, Deserialize)]
struct QueryDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ancestor: Option<String>,
    #[serde(default)]
    filters: Vec<String>,
    #[serde(default)]
    limit: Limit,
}

/// Serialize a query to its encoded-state document
pub fn encode_state(query: &Query) -> String {
    let document = QueryDocument {
        kind: query.kind.clone(),
        ancestor: query.ancestor.clone(),
        filters: query.effective_filters().map(encode_filter).collect(),
        limit: query.limit.clone(),
    };
    // A struct of strings always serializes.
    serde_json::to_string(&document).unwrap_or_default()
}

/// Parse an encoded-state document back into a query.
///
/// Fails with [`KindviewError::Decode`] when the document is unreadable and
/// with [`KindviewError::Parse`] on the first malformed filter; no partially
/// decoded query is returned.
pub fn decode_state(text: &str) -> Result<Query> {
    let document: QueryDocument =
        serde_json::from_str(text).map_err(|e| KindviewError::Decode(e.to_string()))?;

    let filters = document
        .filters
        .iter()
        .map(String::as_str)
        .map(decode_filter)
        .collect::<Result<Vec<_>>>()?;

    Ok(Query {
        kind: document.kind.and_then(non_empty),
        ancestor: document.ancestor.and_then(non_empty),
        filters,
        limit: document.limit,
        count: false,
    })
}

/// Wrap an encoded state for use as a URL fragment
pub fn to_fragment(encoded: &str) -> String {
    URL_SAFE_NO_PAD.encode(encoded.as_bytes())
}

/// Recover the encoded state from a URL fragment.
///
/// Accepts the base64url form produced by [`to_fragment`] as well as a bare
/// JSON document, percent-encoded or not.
pub fn from_fragment(fragment: &str) -> Result<String> {
    let fragment = fragment.trim().trim_start_matches('#');
    // Base64url has no '%', so decoding leaves encoded state untouched
    let fragment = percent_decode_str(fragment)
        .decode_utf8()
        .map_err(|e| KindviewError::Decode(format!("invalid fragment: {}", e)))?;
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return Err(KindviewError::Decode("empty fragment".to_string()));
    }
    if fragment.starts_with('{') {
        return Ok(fragment.to_string());
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(fragment.trim_end_matches('='))
        .map_err(|e| KindviewError::Decode(format!("invalid fragment: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| KindviewError::Decode(e.to_string()))
}

/// Build a bookmarkable link for `query` on top of `base`
pub fn share_link(base: &Url, query: &Query) -> Url {
    let mut link = base.clone();
    link.set_fragment(Some(&to_fragment(&encode_state(query))));
    link
}

/// Extract the encoded state carried by a shared link
pub fn state_from_link(link: &str) -> Result<String> {
    let url =
        Url::parse(link).map_err(|e| KindviewError::Decode(format!("invalid link: {}", e)))?;
    let fragment = url
        .fragment()
        .ok_or_else(|| KindviewError::Decode(format!("link has no query state: {}", link)))?;
    from_fragment(fragment)
}
