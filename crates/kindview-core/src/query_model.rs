//! Query capture and restore
//!
//! The form the user edits is modelled as a [`FormSnapshot`] value. Capturing
//! turns a snapshot into a [`Query`]; restoring turns a query (or an encoded
//! state) back into form fields. Neither mutates its input.

use crate::state_codec::{decode_state, encode_state};
use crate::{FilterOperator, FilterSpec, Limit, Query, Result, StateStore, ValueType};

/// One editable filter row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRow {
    pub name: String,
    pub operator: FilterOperator,
    pub value_type: ValueType,
    pub value: String,
    pub active: bool,
}

impl Default for FilterRow {
    fn default() -> Self {
        Self {
            name: String::new(),
            operator: FilterOperator::Equal,
            value_type: ValueType::String,
            value: String::new(),
            active: true,
        }
    }
}

impl FilterRow {
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

    fn contributes(&self) -> bool {
        self.active && !self.name.is_empty()
    }

    fn to_filter(&self) -> FilterSpec {
        FilterSpec::new(
            self.name.clone(),
            self.operator,
            self.value_type,
            self.value.clone(),
        )
        .with_active(self.active)
    }

    fn set_from(&mut self, filter: &FilterSpec) {
        self.name = filter.name.clone();
        self.operator = filter.operator;
        self.value_type = filter.value_type;
        self.value = filter.value.clone();
    }
}

impl From<&FilterSpec> for FilterRow {
    fn from(filter: &FilterSpec) -> Self {
        Self {
            name: filter.name.clone(),
            operator: filter.operator,
            value_type: filter.value_type,
            value: filter.value.clone(),
            active: filter.active,
        }
    }
}

/// Snapshot of the query form fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSnapshot {
    pub kind: String,
    pub ancestor: String,
    /// Rows in display order
    pub filters: Vec<FilterRow>,
    /// Kept as typed, never coerced
    pub limit: String,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_ancestor(mut self, ancestor: impl Into<String>) -> Self {
        self.ancestor = ancestor.into();
        self
    }

    pub fn with_filter_row(mut self, row: FilterRow) -> Self {
        self.filters.push(row);
        self
    }

    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = limit.into();
        self
    }

    /// Row to receive the next restored filter: the last row when its name is
    /// still empty, otherwise a freshly appended one.
    fn next_filter_row(&mut self) -> &mut FilterRow {
        let reuse_last = self.filters.last().is_some_and(|row| row.name.is_empty());
        if !reuse_last {
            self.filters.push(FilterRow::default());
        }
        let last = self.filters.len() - 1;
        &mut self.filters[last]
    }
}

/// Outcome of capturing the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
    /// Nothing to run: empty kind and ancestor and no usable persisted state.
    /// The pending operation must be abandoned without a request.
    Absent,
    /// Built from the form fields; its encoded state has been persisted.
    FromForm(Query),
    /// Recovered from persisted state, together with the form it restores.
    Restored { query: Query, form: FormSnapshot },
}

impl Captured {
    pub fn query(&self) -> Option<&Query> {
        match self {
            Captured::Absent => None,
            Captured::FromForm(query) | Captured::Restored { query, .. } => Some(query),
        }
    }

    pub fn into_query(self) -> Option<Query> {
        match self {
            Captured::Absent => None,
            Captured::FromForm(query) | Captured::Restored { query, .. } => Some(query),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Captured::Absent)
    }
}

/// Build the current query from a form snapshot.
///
/// With both kind and ancestor empty the persisted state is decoded instead;
/// a decoding failure is returned as is. With no persisted state the result is
/// [`Captured::Absent`]. A query built from the fields is written back to
/// `state` as its encoded form; a failing write is logged and does not stop
/// the capture.
pub fn capture_from_form(form: &FormSnapshot, state: &dyn StateStore) -> Result<Captured> {
    if form.kind.is_empty() && form.ancestor.is_empty() {
        let Some(encoded) = state.load_state()? else {
            tracing::debug!("no kind, ancestor or persisted state; nothing to run");
            return Ok(Captured::Absent);
        };
        let query = decode_state(&encoded)?;
        if !query.is_runnable() {
            tracing::debug!("persisted state names neither kind nor ancestor");
            return Ok(Captured::Absent);
        }
        let form = restore_to_form(&query, form);
        return Ok(Captured::Restored { query, form });
    }

    let query = Query {
        kind: (!form.kind.is_empty()).then(|| form.kind.clone()),
        ancestor: (!form.ancestor.is_empty()).then(|| form.ancestor.clone()),
        filters: form
            .filters
            .iter()
            .filter(|row| row.contributes())
            .map(FilterRow::to_filter)
            .collect(),
        limit: Limit::new(form.limit.clone()),
        count: false,
    };

    let encoded = encode_state(&query);
    if let Err(err) = state.save_state(&encoded) {
        tracing::warn!(error = %err, "failed to persist query state");
    }
    tracing::debug!(state = %encoded, "captured query from form");

    Ok(Captured::FromForm(query))
}

/// Populate form fields from a query.
///
/// Kind, ancestor and limit always replace the form's values, so a query
/// without a kind clears the kind field. Each filter goes into its own row.
pub fn restore_to_form(query: &Query, base: &FormSnapshot) -> FormSnapshot {
    let mut form = base.clone();
    form.kind = query.kind.clone().unwrap_or_default();
    form.ancestor = query.ancestor.clone().unwrap_or_default();
    form.limit = query.limit.as_str().to_string();
    for filter in &query.filters {
        let row = form.next_filter_row();
        row.set_from(filter);
        row.active = true;
    }
    form
}

/// Decode an encoded state and populate the form from it.
///
/// Every filter is decoded before any field is touched, so a malformed
/// filter leaves `base` as it was and surfaces the parse error.
pub fn restore_state_to_form(encoded: &str, base: &FormSnapshot) -> Result<FormSnapshot> {
    let query = decode_state(encoded)?;
    Ok(restore_to_form(&query, base))
}
