mod command;
mod logging;
mod render;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use reelist_api::firebase::FirebaseClient;
use reelist_api::tmdb::TmdbClient;
use reelist_api::traits::{MovieCatalog, MovieStore};
use reelist_core::config::{AppConfig, Backend};
use reelist_core::error::ReelistError;
use reelist_core::events::{DomEvent, Target};
use reelist_core::models::ListKind;
use reelist_runtime::{App, DbHandle, Session, SessionError};

use command::Command;

#[derive(Debug, Parser)]
#[command(name = "reelist", version, about = "Keep a watchlist of movies from TMDB")]
struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Write the effective config to its path and exit.
    #[arg(long)]
    init_config: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ReelistError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("firebase: {0}")]
    Firebase(String),
    #[error("persistence.firebase_url must be set for the firebase backend")]
    MissingFirebaseUrl,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("reelist: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)?;

    if cli.init_config {
        config.save_to(&config_path)?;
        println!("wrote {}", config_path.display());
        return Ok(());
    }

    let _guard = logging::init(&AppConfig::data_dir(), cli.verbose)?;
    tracing::info!(config = %config_path.display(), backend = ?config.persistence.backend, "starting");

    if config.catalog.api_key.is_empty() {
        eprintln!("warning: catalog.api_key is empty, catalog requests will be rejected");
    }

    let catalog = TmdbClient::new(
        config.catalog.api_key.clone(),
        config.catalog.base_url.clone(),
        config.catalog.image_base_url.clone(),
    );
    let image_base = catalog.image_base_url().to_string();
    let session = Session::from_config(&config.session)?;

    match config.persistence.backend {
        Backend::Sqlite => {
            let store = DbHandle::open(&AppConfig::ensure_db_path()?)?;
            interact(App::new(catalog, store, session, image_base)).await
        }
        Backend::Firebase => {
            let persistence = &config.persistence;
            if persistence.firebase_url.is_empty() {
                return Err(CliError::MissingFirebaseUrl);
            }
            let store = FirebaseClient::new(
                &persistence.firebase_url,
                persistence.collection.clone(),
                persistence.auth_token.clone(),
            )
            .map_err(|e| CliError::Firebase(e.to_string()))?;
            interact(App::new(catalog, store, session, image_base)).await
        }
    }
}

/// Read commands until EOF or `quit`, redrawing the page after each one.
async fn interact<C: MovieCatalog, S: MovieStore>(app: App<C, S>) -> Result<(), CliError> {
    if let Err(e) = app.mount() {
        tracing::error!("mount failed: {e}");
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(command::HELP.as_bytes()).await?;
    stdout.write_all(b"\n\n").await?;
    stdout
        .write_all(render::page(&app.state().await).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                stdout.write_all(format!("{msg}\n").as_bytes()).await?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                stdout.write_all(command::HELP.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                continue;
            }
            other => execute(&app, other).await,
        }

        stdout
            .write_all(render::page(&app.state().await).as_bytes())
            .await?;
    }

    app.unmount();
    tracing::info!("exiting");
    Ok(())
}

/// Failures are already on the page as a notice, so results are only logged.
async fn execute<C: MovieCatalog, S: MovieStore>(app: &App<C, S>, command: Command) {
    let result = match command {
        Command::Page(event) => app.handle_event(&event).await.map(|_| ()),
        Command::Find(query) => {
            let target = match app.state().await.view.list() {
                Some(ListKind::Watched) => Target::WatchedInput,
                Some(ListKind::Unwatched) => Target::UnwatchedInput,
                None => Target::CatalogInput,
            };
            app.handle_event(&DomEvent::enter(target.element_id(), query))
                .await
                .map(|_| ())
        }
        Command::Watch { key, watched } => app.mark_watched(&key, watched).await.map(|_| ()),
        Command::Rate { key, rating } => app.set_rating(&key, rating).await.map(|_| ()),
        Command::Favorite { key, favorite } => app.set_favorite(&key, favorite).await.map(|_| ()),
        Command::Dismiss => {
            app.dismiss_notice().await;
            Ok(())
        }
        Command::Help | Command::Quit => Ok(()),
    };
    if let Err(e) = result {
        tracing::debug!("command failed: {e}");
    }
}
