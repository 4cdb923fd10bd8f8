//! Query-string encoding of a [`Query`]
//!
//! The entity listing reads repeated `filters=` parameters, while count and
//! delete use the bracketed `filters[]=` form. Delete always carries its
//! parameters on the URL, never in a body.
//!
//! Servers that bind a singular `filter` parameter see none of these names.
//! Count then covers the whole kind and a filtered delete empties it.

use kindview_core::{Query, encode_filter};

/// How filter parameters are named on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterParamStyle {
    /// `filters=a&filters=b`
    Repeated,
    /// `filters[]=a&filters[]=b`
    Bracketed,
}

impl FilterParamStyle {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Repeated => "filters",
            Self::Bracketed => "filters[]",
        }
    }
}

/// Parameters for `query`, in the order kind, ancestor, filters, limit, count.
///
/// Absent kind/ancestor and an empty limit are left out so the server
/// defaults apply.
pub fn query_params(query: &Query, style: FilterParamStyle) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(query.filters.len() + 4);
    if let Some(kind) = &query.kind {
        params.push(("kind", kind.clone()));
    }
    if let Some(ancestor) = &query.ancestor {
        params.push(("ancestor", ancestor.clone()));
    }
    for filter in query.effective_filters() {
        params.push((style.key(), encode_filter(filter)));
    }
    if !query.limit.is_empty() {
        params.push(("limit", query.limit.as_str().to_string()));
    }
    if query.count {
        params.push(("count", "true".to_string()));
    }
    params
}
