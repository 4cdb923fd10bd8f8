//! Filter text codec
//!
//! Converts a [`FilterSpec`] to and from its canonical text form
//! `name OP TYPE(value)`, for example `age > Long(5)`.
//!
//! The value is not escaped. A value containing `)` encodes fine but cannot
//! be decoded again, and the server rejects it with the same grammar.

use regex::Regex;
use std::sync::LazyLock;

use crate::{FilterOperator, FilterSpec, KindviewError, Result, ValueType};

static FILTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([^<>=!]+) ([<>=!]+) (String|Long|Key|Boolean|Email|Null)\(([^)]*)\)$")
        .expect("valid regex")
});

/// Encode a filter as `name OP TYPE(value)`.
///
/// The `active` flag is not part of the text.
pub fn encode_filter(filter: &FilterSpec) -> String {
    format!(
        "{} {} {}({})",
        filter.name,
        filter.operator.symbol(),
        filter.value_type.as_str(),
        filter.value
    )
}

/// Decode filter text into an active [`FilterSpec`].
///
/// The type token is matched case-insensitively. Operators outside
/// `< <= = >= > !=` are rejected.
pub fn decode_filter(text: &str) -> Result<FilterSpec> {
    let parse_error = || KindviewError::Parse {
        input: text.to_string(),
    };

    let captures = FILTER_REGEX.captures(text).ok_or_else(parse_error)?;

    let operator = FilterOperator::from_symbol(&captures[2]).ok_or_else(parse_error)?;
    let value_type = ValueType::from_token(&captures[3]).ok_or_else(parse_error)?;

    Ok(FilterSpec::new(
        &captures[1],
        operator,
        value_type,
        &captures[4],
    ))
}
