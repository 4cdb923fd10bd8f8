//! kindview core - query model, codecs and result tables
//!
//! This crate holds everything about a datastore query that does not touch
//! the network:
//!
//! - `filter_codec` - `name OP TYPE(value)` filter text
//! - `state_codec` - the shareable encoded-state document and link fragments
//! - `query_model` - capturing a query from form fields and restoring it
//! - `table` - column discovery over schemaless records, HTML rendering
//! - `StoreClient`, `StateStore`, `KindCache` - the seams implemented by the
//!   client and storage crates

mod error;
pub mod filter_codec;
pub mod query_model;
pub mod state_codec;
#[cfg(test)]
mod state_codec_tests;
mod store;
pub mod table;
mod types;

pub use error::*;
pub use filter_codec::{decode_filter, encode_filter};
pub use query_model::{
    Captured, FilterRow, FormSnapshot, capture_from_form, restore_state_to_form, restore_to_form,
};
pub use state_codec::{decode_state, encode_state, share_link, state_from_link};
pub use store::*;
pub use table::{NO_RECORDS_COLUMN, ResultTable, ResultTableBuilder, build_table, count_label, escape_html};
pub use types::*;
