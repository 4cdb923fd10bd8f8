//! Glue between the form, the store service and local storage
//!
//! Every operation captures the query first. When nothing can be captured
//! (no kind, no ancestor, no persisted state) it returns `Ok(None)` without
//! touching the network.

use std::sync::Arc;

use kindview_core::{
    Captured, FormSnapshot, KindCache, KindviewError, Query, Result, ResultTable, StateStore,
    StoreClient, build_table, capture_from_form, count_label, decode_state, share_link,
};
use url::Url;

/// A rendered query result
#[derive(Debug, Clone)]
pub struct Refreshed {
    pub query: Query,
    /// `"<ancestor> <kind>"`
    pub title: String,
    pub table: ResultTable,
    /// Row count with the at-limit `+` annotation
    pub count: String,
    /// Set when the query came from persisted state rather than the fields
    pub restored_form: Option<FormSnapshot>,
}

#[derive(Debug, Clone)]
pub struct Counted {
    pub query: Query,
    pub count: u64,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Deleted {
    pub query: Query,
    pub deleted: u64,
    /// The follow-up refresh; `None` when it failed
    pub refreshed: Option<Refreshed>,
}

impl Deleted {
    pub fn message(&self) -> String {
        format!("Deleted {} entities.", self.deleted)
    }
}

#[derive(Debug, Clone)]
pub struct KindList {
    pub kinds: Vec<String>,
    /// The form with the kind defaulted to the first name when it was empty
    pub form: FormSnapshot,
}

pub struct Controller {
    store: Arc<dyn StoreClient>,
    state: Arc<dyn StateStore>,
    kind_cache: Arc<dyn KindCache>,
}

impl Controller {
    pub fn new(
        store: Arc<dyn StoreClient>,
        state: Arc<dyn StateStore>,
        kind_cache: Arc<dyn KindCache>,
    ) -> Self {
        Self {
            store,
            state,
            kind_cache,
        }
    }

    /// Make `encoded` the current state, as if the user had opened a link to it.
    /// The document is checked before anything is stored.
    pub fn adopt_state(&self, encoded: &str) -> Result<()> {
        decode_state(encoded)?;
        self.state.save_state(encoded)
    }

    fn capture(&self, form: &FormSnapshot) -> Result<Option<(Query, Option<FormSnapshot>)>> {
        Ok(match capture_from_form(form, self.state.as_ref())? {
            Captured::Absent => None,
            Captured::FromForm(query) => Some((query, None)),
            Captured::Restored { query, form } => Some((query, Some(form))),
        })
    }

    /// Run the current query and build its table
    pub async fn refresh(&self, form: &FormSnapshot) -> Result<Option<Refreshed>> {
        let Some((query, restored_form)) = self.capture(form)? else {
            return Ok(None);
        };

        let records = self.store.query(&query).await?;
        let table = build_table(&records);
        let count = table.count_label(&query.limit);
        let title = query.title();
        tracing::info!(title = %title, count = %count, "refreshed");

        Ok(Some(Refreshed {
            query,
            title,
            table,
            count,
            restored_form,
        }))
    }

    pub async fn count(&self, form: &FormSnapshot) -> Result<Option<Counted>> {
        let Some((query, _)) = self.capture(form)? else {
            return Ok(None);
        };

        let count = self.store.count(&query).await?;
        let label = count_label(count, &query.limit);
        Ok(Some(Counted {
            query,
            count,
            label,
        }))
    }

    /// Delete the matching entities, then refresh
    pub async fn delete(&self, form: &FormSnapshot) -> Result<Option<Deleted>> {
        let Some((query, _)) = self.capture(form)? else {
            return Ok(None);
        };

        let deleted = self.store.delete(&query).await?;

        let refreshed = match self.refresh(form).await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                tracing::warn!(error = %err, "refresh after delete failed");
                None
            }
        };

        Ok(Some(Deleted {
            query,
            deleted,
            refreshed,
        }))
    }

    /// Fetch the kind names, cache them and default an empty kind field
    pub async fn refresh_kinds(&self, form: &FormSnapshot) -> Result<KindList> {
        let kinds = self.store.list_kinds().await?;
        if let Err(err) = self.kind_cache.store_kinds(&kinds) {
            tracing::warn!(error = %err, "failed to cache kind names");
        }

        let mut form = form.clone();
        if form.kind.is_empty() {
            form.kind = kinds.first().cloned().unwrap_or_default();
        }
        Ok(KindList { kinds, form })
    }

    /// Kind names from the last successful fetch; empty when never fetched
    pub fn cached_kinds(&self) -> Result<Vec<String>> {
        Ok(self.kind_cache.load_kinds()?.unwrap_or_default())
    }

    /// The persisted query as a link on `base`
    pub fn share(&self, base: &Url) -> Result<Option<Url>> {
        let Some(encoded) = self.state.load_state()? else {
            return Ok(None);
        };
        let query = decode_state(&encoded)?;
        Ok(Some(share_link(base, &query)))
    }
}

/// The login page to send the user to, when the failure was an expired session
pub fn login_redirect(err: &KindviewError) -> Option<&str> {
    match err {
        KindviewError::AuthRequired { redirect_url } => Some(redirect_url.as_str()),
        _ => None,
    }
}

/// The one-line message shown for a failed operation
pub fn failure_message(err: &KindviewError) -> String {
    match err {
        KindviewError::LogicalQuery(message) => message.clone(),
        KindviewError::AuthRequired { redirect_url } => {
            format!("Authentication required. Log in at {}", redirect_url)
        }
        err if err.is_request_failure() => format!("Request failed: {}", err),
        err if err.is_codec_error() => format!("Invalid query: {}", err),
        err => err.to_string(),
    }
}
