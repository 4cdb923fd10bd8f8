//! HTTP client for the kindview store service
//!
//! Endpoints, relative to the configured root:
//!
//! - `GET kind` - JSON array of kind names
//! - `GET entity?kind=&ancestor=&filters=&limit=` - JSON array of records
//! - `GET entity/count?...&count=true` - JSON integer
//! - `DELETE entity?...` - JSON integer, parameters on the URL

pub mod config;
mod http_client;
pub mod params;
#[cfg(test)]
mod params_tests;
pub mod response;
#[cfg(test)]
mod response_tests;

pub use config::{ClientConfig, DEFAULT_ROOT, DEFAULT_TIMEOUT, LOGIN_URL_HEADER, RETURN_URL_HEADER};
pub use http_client::HttpStoreClient;
