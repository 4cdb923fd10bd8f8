//! Command-line surface

use clap::{Args, Parser, Subcommand, ValueEnum};
use kindview_core::{FilterRow, FormSnapshot, Result, decode_filter, state_from_link};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kindview", version)]
#[command(about = "Browse, count and delete datastore entities by kind, ancestor and filters")]
pub struct Cli {
    /// Root URL of the store service
    #[arg(long, global = true, env = "KINDVIEW_ROOT")]
    pub root: Option<String>,

    /// Seconds to wait for any single request
    #[arg(long, global = true, env = "KINDVIEW_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Page the service should send you back to after logging in
    #[arg(long, global = true, env = "KINDVIEW_RETURN_URL")]
    pub return_url: Option<String>,

    /// Local database for the kind cache and last query
    #[arg(long, global = true, env = "KINDVIEW_STORAGE")]
    pub storage: Option<PathBuf>,

    /// Settings file to read instead of the default location
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List kind names known to the store
    Kinds {
        /// Read the local cache instead of asking the service
        #[arg(long)]
        cached: bool,
    },

    /// Run a query and print the matching entities
    Query {
        #[command(flatten)]
        query: QueryArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Count matching entities without fetching them
    Count {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Delete every matching entity, then show what is left
    Delete {
        #[command(flatten)]
        query: QueryArgs,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Print the last query as a shareable link
    Share {
        /// Page the link points at; defaults to the return URL, then the root
        #[arg(long)]
        base: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Entity kind
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Ancestor key
    #[arg(short, long)]
    pub ancestor: Option<String>,

    /// Filter as `name OP TYPE(value)`, e.g. `age >= Long(18)`; repeatable
    #[arg(short, long = "filter", value_name = "FILTER")]
    pub filters: Vec<String>,

    /// Maximum number of entities, sent as typed
    #[arg(short, long)]
    pub limit: Option<String>,

    /// Encoded query state to restore when no kind or ancestor is given
    #[arg(long, conflicts_with = "link")]
    pub state: Option<String>,

    /// Shared link to restore when no kind or ancestor is given
    #[arg(long)]
    pub link: Option<String>,
}

impl QueryArgs {
    /// True when neither kind nor ancestor was given
    pub fn names_nothing(&self) -> bool {
        self.kind.as_deref().unwrap_or("").is_empty()
            && self.ancestor.as_deref().unwrap_or("").is_empty()
    }

    /// Form fields as given on the command line. Every filter must parse.
    pub fn to_form(&self, default_limit: &str) -> Result<FormSnapshot> {
        let mut form = FormSnapshot::new()
            .with_kind(self.kind.clone().unwrap_or_default())
            .with_ancestor(self.ancestor.clone().unwrap_or_default())
            .with_limit(self.limit.clone().unwrap_or_else(|| default_limit.to_string()));
        for text in &self.filters {
            let filter = decode_filter(text)?;
            form = form.with_filter_row(FilterRow::from(&filter));
        }
        Ok(form)
    }

    /// Encoded state handed over through `--state` or `--link`
    pub fn supplied_state(&self) -> Result<Option<String>> {
        if let Some(state) = &self.state {
            return Ok(Some(state.clone()));
        }
        self.link.as_deref().map(state_from_link).transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terminal table
    Text,
    /// Escaped HTML table
    Html,
    /// `{title, columns, rows, count}`
    Json,
}
