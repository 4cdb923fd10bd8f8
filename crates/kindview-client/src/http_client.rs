//! reqwest implementation of [`StoreClient`]

use async_trait::async_trait;
use kindview_core::{KindviewError, Query, Record, Result, StoreClient};
use reqwest::{Client, RequestBuilder, Response};

use crate::config::{ClientConfig, LOGIN_URL_HEADER, RETURN_URL_HEADER};
use crate::params::{FilterParamStyle, query_params};
use crate::response::{classify_failure, parse_count, parse_kinds, parse_records};

/// Store client speaking JSON over HTTP
pub struct HttpStoreClient {
    config: ClientConfig,
    client: Client,
}

impl HttpStoreClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KindviewError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        tracing::debug!(root = %config.root(), timeout_secs = config.timeout.as_secs(), "created store client");
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and return the body of a success response
    async fn send(&self, request: RequestBuilder, operation: &'static str) -> Result<String> {
        let request = match &self.config.return_url {
            Some(return_url) => request.header(RETURN_URL_HEADER, return_url),
            None => request,
        };

        let response = request.send().await.map_err(|e| transport_error(e, operation))?;
        let status = response.status();
        tracing::debug!(operation, status = status.as_u16(), "store response");

        if !status.is_success() {
            let login_url = login_url(&response);
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status.as_u16(), login_url, body);
            tracing::warn!(operation, error = %err, "store request failed");
            return Err(err);
        }

        response
            .text()
            .await
            .map_err(|e| transport_error(e, operation))
    }
}

fn login_url(response: &Response) -> Option<String> {
    response
        .headers()
        .get(LOGIN_URL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn transport_error(err: reqwest::Error, operation: &str) -> KindviewError {
    if err.is_timeout() {
        KindviewError::Timeout(format!("{} timed out: {}", operation, err))
    } else {
        KindviewError::Transport(format!("{} failed: {}", operation, err))
    }
}

#[async_trait]
impl StoreClient for HttpStoreClient {
    async fn list_kinds(&self) -> Result<Vec<String>> {
        let request = self.client.get(self.config.endpoint("kind"));
        let body = self.send(request, "list kinds").await?;
        let kinds = parse_kinds(&body)?;
        tracing::info!(kinds = kinds.len(), "fetched kind names");
        Ok(kinds)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Record>> {
        tracing::info!(
            kind = ?query.kind,
            ancestor = ?query.ancestor,
            filters = query.effective_filters().count(),
            limit = %query.limit,
            "querying entities"
        );
        let request = self
            .client
            .get(self.config.endpoint("entity"))
            .query(&query_params(query, FilterParamStyle::Repeated));
        let body = self.send(request, "query").await?;
        let records = parse_records(&body)?;
        tracing::info!(records = records.len(), "query completed");
        Ok(records)
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        let query = query.as_count();
        tracing::info!(kind = ?query.kind, ancestor = ?query.ancestor, "counting entities");
        let request = self
            .client
            .get(self.config.endpoint("entity/count"))
            .query(&query_params(&query, FilterParamStyle::Bracketed));
        let body = self.send(request, "count").await?;
        parse_count(&body)
    }

    /// Filters go out as `filters[]=`. A server that only binds `filter`
    /// ignores them and deletes the whole kind.
    async fn delete(&self, query: &Query) -> Result<u64> {
        tracing::info!(kind = ?query.kind, ancestor = ?query.ancestor, "deleting entities");
        let request = self
            .client
            .delete(self.config.endpoint("entity"))
            .query(&query_params(query, FilterParamStyle::Bracketed));
        let body = self.send(request, "delete").await?;
        let deleted = parse_count(&body)?;
        tracing::info!(deleted, "delete completed");
        Ok(deleted)
    }
}
