mod config;
mod database;
mod entities;
mod logging;
mod ports;
mod services;
mod spotify_rs;
#[cfg(test)]
mod test_utils;
mod track_identity;
mod youtube_rs;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};

use crate::{
    config::Config,
    database::Database,
    logging::init_tracing,
    ports::track_cache::TrackCache,
    services::{
        spotify::{SpotifyApiCredentials, SpotifyCatalog},
        track_cache::DatabaseTrackCache,
        transfer::{CacheOutcome, PlaylistTransferEngine, TransferReport},
        youtube::{YoutubePlaylists, YoutubeSearchResolver},
    },
    youtube_rs::client::YoutubeClient,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "SPOTTUBE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `spottube=debug`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// OTLP gRPC endpoint to export traces to
    #[arg(long, global = true, env = "OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    /// Overrides `spotify.client_id` from the config
    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true, global = true)]
    spotify_client_id: Option<String>,

    /// Overrides `spotify.client_secret` from the config
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true, global = true)]
    spotify_client_secret: Option<String>,

    /// Overrides `youtube.access_token` from the config
    #[arg(long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true, global = true)]
    youtube_access_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy a Spotify playlist into a new YouTube playlist
    Transfer {
        /// The Spotify playlist id
        playlist_id: String,
    },
    #[command(subcommand)]
    Cache(CacheCommands),
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum CacheCommands {
    /// Print every cached track
    List,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .wrap_err("Failed to load spottube config")?;

    if let Some(client_id) = &args.spotify_client_id {
        config.spotify.client_id = client_id.clone();
    }
    if let Some(client_secret) = &args.spotify_client_secret {
        config.spotify.client_secret = client_secret.clone();
    }
    if let Some(access_token) = &args.youtube_access_token {
        config.youtube.access_token = access_token.clone();
    }
    Ok(config)
}

fn print_report(report: &TransferReport) {
    for track in &report.transferred {
        let outcome = match track.outcome {
            CacheOutcome::Reused => "cached",
            CacheOutcome::Cached => "searched",
        };
        println!(
            "{:>4}. {} -> https://youtu.be/{} ({})",
            track.position, track.track, track.youtube_id, outcome
        );
    }
    let headline = if report.is_completed() {
        "Transferred"
    } else {
        "Stopped"
    };
    println!(
        "{}: {}/{} tracks from '{}' added to YouTube playlist {}",
        headline,
        report.transferred.len(),
        report.total_tracks,
        report.playlist_name.as_deref().unwrap_or(&report.source_playlist_id),
        report.remote_playlist_id.as_deref().unwrap_or("-"),
    );
}

async fn transfer(config: &Config, database: Arc<Database>, playlist_id: &str) -> Result<()> {
    if config.spotify.client_id.is_empty() || config.spotify.client_secret.is_empty() {
        return Err(eyre!(
            "Spotify client id and secret are required. Set them in the config or via SPOTIFY_CLIENT_ID/SPOTIFY_CLIENT_SECRET"
        ));
    }
    if config.youtube.access_token.is_empty() {
        return Err(eyre!(
            "A YouTube access token is required. Set it in the config or via YOUTUBE_ACCESS_TOKEN"
        ));
    }

    let http = reqwest::Client::builder()
        .user_agent(concat!("spottube/", env!("CARGO_PKG_VERSION")))
        .build()
        .wrap_err("Failed to build http client")?;

    let engine = PlaylistTransferEngine::new(
        SpotifyCatalog::new(
            SpotifyApiCredentials::new(
                config.spotify.client_id.clone(),
                config.spotify.client_secret.clone(),
            ),
            http.clone(),
            config.spotify.request_timeout(),
        ),
        YoutubePlaylists::new(
            YoutubeClient::new(
                config.youtube.access_token.clone(),
                http.clone(),
                config.youtube.request_timeout(),
            ),
            config.youtube.privacy_status,
        ),
        YoutubeSearchResolver::new(http, config.youtube.search_timeout()),
        DatabaseTrackCache::new(database),
    );

    let report = engine.transfer(playlist_id).await;
    print_report(&report);
    if let Err(error) = report.into_result() {
        if let Some(position) = error.position() {
            tracing::error!("Transfer stopped at track #{}", position);
        }
        return Err(error.into());
    }
    Ok(())
}

async fn list_cache(database: Arc<Database>) -> Result<()> {
    let cache = DatabaseTrackCache::new(database);
    let entries = cache.entries().await?;
    if entries.is_empty() {
        println!("The track cache is empty");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:>5}  {}  {}  uploads: {}",
            entry.id,
            entry.youtube_id,
            entry.identity(),
            entry.upload_count
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing(
        "spottube",
        args.otlp_endpoint.as_deref(),
        &args.log_level,
    )?;

    let result = run(&args).await;

    if let Some(tracer_provider) = tracer_provider {
        tracer_provider
            .shutdown()
            .wrap_err("Failed to shut down tracer provider")?;
    }

    result
}

async fn run(args: &Args) -> Result<()> {
    if let Commands::Config(config_commands) = &args.command {
        match config_commands {
            ConfigCommands::CreateDefault => {
                tracing::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        }
        return Ok(());
    }

    tracing::debug!("Loading configuration");
    let config = load_config(args)?;
    let database = Arc::new(Database::open(&config.database_path()).await?);

    match &args.command {
        Commands::Transfer { playlist_id } => transfer(&config, database, playlist_id).await,
        Commands::Cache(CacheCommands::List) => list_cache(database).await,
        Commands::Config(_) => Ok(()),
    }
}
