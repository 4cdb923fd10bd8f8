//! Core types for kindview

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value-type tag carried by a filter, telling the server how to read the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    #[default]
    String,
    Long,
    Key,
    Boolean,
    Email,
    Null,
}

impl ValueType {
    /// Canonical token as it appears in filter text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Long => "Long",
            Self::Key => "Key",
            Self::Boolean => "Boolean",
            Self::Email => "Email",
            Self::Null => "Null",
        }
    }

    /// Parse a type token, ignoring ASCII case
    pub fn from_token(token: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
    }

    pub fn all() -> &'static [ValueType] {
        &[
            Self::String,
            Self::Long,
            Self::Key,
            Self::Boolean,
            Self::Email,
            Self::Null,
        ]
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterOperator {
    LessThan,
    LessThanOrEqual,
    #[default]
    Equal,
    GreaterThanOrEqual,
    GreaterThan,
    NotEqual,
}

impl FilterOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Equal => "=",
            Self::GreaterThanOrEqual => ">=",
            Self::GreaterThan => ">",
            Self::NotEqual => "!=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.symbol() == symbol)
    }

    /// All operators in display order
    pub fn all() -> &'static [FilterOperator] {
        &[
            Self::LessThan,
            Self::LessThanOrEqual,
            Self::Equal,
            Self::GreaterThanOrEqual,
            Self::GreaterThan,
            Self::NotEqual,
        ]
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single attribute predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Attribute name
    pub name: String,
    pub operator: FilterOperator,
    pub value_type: ValueType,
    /// Raw textual payload, empty is allowed
    pub value: String,
    /// UI toggle, inactive filters never reach the encoded state
    pub active: bool,
}

impl FilterSpec {
    /// Create an active filter
    pub fn new(
        name: impl Into<String>,
        operator: FilterOperator,
        value_type: ValueType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operator,
            value_type,
            value: value.into(),
            active: true,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether this filter contributes to a query: named and switched on
    pub fn is_effective(&self) -> bool {
        self.active && !self.name.is_empty()
    }
}

/// Requested record cap, kept verbatim as the user typed it.
///
/// Empty or `0` means the server default applies. The server alone validates
/// the text; [`Limit::cap`] only reads it for the at-limit annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Limit(String);

impl Limit {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Numeric cap, if the text is a positive integer
    pub fn cap(&self) -> Option<u64> {
        match self.0.trim().parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(n) => Some(n),
        }
    }

    /// True when `returned` equals the cap, meaning more data may exist
    pub fn is_reached_by(&self, returned: u64) -> bool {
        self.cap() == Some(returned)
    }
}

impl From<u64> for Limit {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for Limit {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older shared states carry the limit as a JSON number.
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw {
            serde_json::Value::Null => Limit::none(),
            serde_json::Value::String(s) => Limit(s),
            serde_json::Value::Number(n) => Limit(n.to_string()),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "limit must be a string or a number, got {}",
                    other
                )));
            }
        })
    }
}

/// One query against the store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub kind: Option<String>,
    /// Opaque key restricting results to descendants
    pub ancestor: Option<String>,
    /// Insertion order, duplicates allowed
    pub filters: Vec<FilterSpec>,
    pub limit: Limit,
    /// Count-only request, never persisted
    pub count: bool,
}

impl Query {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: non_empty(kind.into()),
            ..Self::default()
        }
    }

    pub fn with_ancestor(mut self, ancestor: impl Into<String>) -> Self {
        self.ancestor = non_empty(ancestor.into());
        self
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = limit.into();
        self
    }

    /// A copy flagged as a count-only request
    pub fn as_count(&self) -> Self {
        Self {
            count: true,
            ..self.clone()
        }
    }

    /// A query needs a kind or an ancestor before it can be sent
    pub fn is_runnable(&self) -> bool {
        self.kind.is_some() || self.ancestor.is_some()
    }

    /// Filters that take part in encoding and in requests, in order
    pub fn effective_filters(&self) -> impl Iterator<Item = &FilterSpec> {
        self.filters.iter().filter(|f| f.is_effective())
    }

    /// `"<ancestor> <kind>"`, used as the page/table caption
    pub fn title(&self) -> String {
        format!(
            "{} {}",
            self.ancestor.as_deref().unwrap_or(""),
            self.kind.as_deref().unwrap_or("")
        )
    }
}

pub(crate) fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// A typed cell value as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(deserialize_with = "deserialize_cell_value")]
    pub value: String,
    /// Server value-type tag (`INTEGER`, `STRING`, `KEY`, ...), absent when unknown
    #[serde(rename = "type", default)]
    pub value_type: Option<String>,
}

impl Cell {
    pub fn new(value: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            value_type: Some(value_type.into()),
        }
    }

    pub fn untyped(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            value_type: None,
        }
    }
}

fn deserialize_cell_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// One schemaless result row. Attribute order is the server's.
pub type Record = IndexMap<String, Cell>;
