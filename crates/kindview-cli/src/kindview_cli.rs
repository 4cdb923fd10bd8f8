//! kindview command-line application
//!
//! The binary in `cli.rs` wires these modules together: settings and flags
//! pick the service and the local database, the controller runs operations
//! against any `StoreClient`, and `render` formats the result.

pub mod args;
pub mod controller;
pub mod logging;
pub mod render;
pub mod settings;

pub use args::{Cli, Command, OutputFormat, QueryArgs};
pub use controller::{
    Controller, Counted, Deleted, KindList, Refreshed, failure_message, login_redirect,
};
