//! kindview - browse datastore entities from the terminal

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use kindview_cli::settings::{self, Settings};
use kindview_cli::{
    Cli, Command, Controller, QueryArgs, failure_message, logging, login_redirect, render,
};
use kindview_client::{ClientConfig, HttpStoreClient};
use kindview_core::{FormSnapshot, KindviewError};
use kindview_storage::LocalStorage;
use url::Url;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    logging::init(
        logging::default_config()
            .with_verbose(cli.verbose)
            .with_json_logs(settings.logging.json_logs),
    )?;

    let root = cli.root.clone().unwrap_or_else(|| settings.server.root.clone());
    let timeout = Duration::from_secs(cli.timeout_secs.unwrap_or(settings.server.timeout_secs));
    let return_url = cli
        .return_url
        .clone()
        .or_else(|| settings.server.return_url.clone());

    let mut config = ClientConfig::new(&root)?.with_timeout(timeout);
    if let Some(return_url) = &return_url {
        config = config.with_return_url(return_url.clone());
    }
    let store = Arc::new(HttpStoreClient::new(config)?);

    let storage_path = match &cli.storage {
        Some(path) => path.clone(),
        None => settings::storage_file()?,
    };
    let storage = Arc::new(
        LocalStorage::open(&storage_path)
            .with_context(|| format!("Failed to open local storage at {:?}", storage_path))?,
    );

    let controller = Controller::new(store, storage.clone(), storage);
    let default_limit = settings.query.default_limit.as_str();

    let outcome = match cli.command {
        Command::Kinds { cached } => kinds(&controller, cached).await,
        Command::Query { query, format } => {
            let form = prepare(&controller, &query, default_limit)?;
            match controller.refresh(&form).await {
                Ok(Some(refreshed)) => {
                    print!("{}", render::render(&refreshed, format)?);
                    Ok(true)
                }
                Ok(None) => no_query(),
                Err(err) => Err(err),
            }
        }
        Command::Count { query } => {
            let form = prepare(&controller, &query, default_limit)?;
            match controller.count(&form).await {
                Ok(Some(counted)) => {
                    println!("{}", counted.label);
                    Ok(true)
                }
                Ok(None) => no_query(),
                Err(err) => Err(err),
            }
        }
        Command::Delete { query, yes } => {
            if !yes {
                eprintln!("Refusing to delete without --yes");
                return Ok(ExitCode::FAILURE);
            }
            let form = prepare(&controller, &query, default_limit)?;
            match controller.delete(&form).await {
                Ok(Some(deleted)) => {
                    if let Some(refreshed) = &deleted.refreshed {
                        print!("{}", render::render_text(refreshed));
                    }
                    println!("{}", deleted.message());
                    Ok(true)
                }
                Ok(None) => no_query(),
                Err(err) => Err(err),
            }
        }
        Command::Share { base } => {
            let base = base.or(return_url).unwrap_or(root);
            let base = Url::parse(&base).with_context(|| format!("Invalid base URL {}", base))?;
            match controller.share(&base) {
                Ok(Some(link)) => {
                    println!("{}", link);
                    Ok(true)
                }
                Ok(None) => no_query(),
                Err(err) => Err(err),
            }
        }
    };

    match outcome {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(err) => {
            report_failure(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Form from the flags; with no kind or ancestor a supplied state becomes current
fn prepare(controller: &Controller, args: &QueryArgs, default_limit: &str) -> Result<FormSnapshot> {
    let supplied = if args.names_nothing() {
        args.supplied_state()?
    } else {
        None
    };
    if let Some(encoded) = supplied {
        controller.adopt_state(&encoded)?;
    }
    Ok(args.to_form(default_limit)?)
}

async fn kinds(controller: &Controller, cached: bool) -> kindview_core::Result<bool> {
    let kinds = if cached {
        controller.cached_kinds()?
    } else {
        controller.refresh_kinds(&FormSnapshot::new()).await?.kinds
    };
    for kind in kinds {
        println!("{}", kind);
    }
    Ok(true)
}

fn no_query() -> kindview_core::Result<bool> {
    eprintln!("No query: give --kind or --ancestor, or run one first");
    Ok(false)
}

fn report_failure(err: &KindviewError) {
    tracing::error!(error = %err, "operation failed");
    eprintln!("{}", failure_message(err));

    if let Some(redirect_url) = login_redirect(err) {
        tracing::info!(url = %redirect_url, "opening login page");
        if let Err(open_err) = open::that(redirect_url) {
            tracing::warn!(error = %open_err, "could not open browser for login");
        }
    }
}
