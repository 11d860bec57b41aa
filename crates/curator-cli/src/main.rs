use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result, WrapErr};
use curator_core::config::DEFAULT_CONFIG_FILE;
use curator_core::llm::Provider;
use curator_core::youtube::{Authenticator, ClientSecrets, YouTubeClient};
use curator_core::{Config, Curator, FileStorage, RunOutcome, RunState, Storage, TrackStatus};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "curator")]
#[command(about = "Cluster YouTube music into AI-themed playlists", long_about = None)]
struct Cli {
    /// Path to the config file (default: ./curator.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect, plan and build playlists, or resume a previous run
    Run,
    /// Show progress of the saved run
    Status,
    /// Write a template config file
    Init,
    /// Delete the saved run state and video cache
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = color_eyre::install() {
        eprintln!("Failed to install error reporter: {}", e);
    }

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(cli.config.as_deref()).await,
        Commands::Status => status(cli.config.as_deref()),
        Commands::Init => init(cli.config.as_deref()),
        Commands::Reset { yes } => reset(cli.config.as_deref(), yes),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .wrap_err("Failed to load configuration")?;

    config.validate().wrap_err("Invalid configuration")?;
    Ok(config)
}

async fn run(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let storage = FileStorage::with_config(config.storage.clone());

    let secrets = ClientSecrets::from_file(&config.youtube.client_secrets_file)
        .wrap_err("Failed to load YouTube client secrets")?;
    let authenticator =
        Authenticator::new(secrets, config.storage.data_path(&config.youtube.token_file));
    authenticator
        .authorize()
        .await
        .wrap_err("YouTube authorization failed")?;
    let platform = YouTubeClient::with_config(authenticator, &config.youtube);

    let llm = Provider::from_config(&config.llm)
        .and_then(Provider::build)
        .wrap_err("Failed to set up the LLM provider")?;

    let curator = Curator::new(platform, llm, storage, config.curation.clone())
        .with_batch_size(config.youtube.batch_size);
    let mode = curator.detect_mode();

    match curator.run(mode).await? {
        RunOutcome::Completed(summary) => {
            println!();
            println!("All playlists processed.");
            println!("  {}", summary);
        }
        RunOutcome::QuotaPaused(summary) => {
            println!();
            println!("==============================================================");
            println!(" YouTube API quota reached. Progress has been saved.");
            println!(" Run `curator` again after the quota resets to continue.");
            println!("==============================================================");
            println!("  {}", summary);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn status(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let storage = FileStorage::with_config(config.storage);

    let Some(state) = storage.load_run_state()? else {
        println!("No saved run. Use `curator run` to start one.");
        return Ok(ExitCode::SUCCESS);
    };

    print_state(&state);
    Ok(ExitCode::SUCCESS)
}

fn print_state(state: &RunState) {
    println!("Run started {}", state.created_at.format("%Y-%m-%d %H:%M"));
    println!("Last saved  {}", state.updated_at.format("%Y-%m-%d %H:%M"));
    println!();

    for (i, playlist) in state.playlists.iter().enumerate() {
        let marker = if playlist.is_completed() { "x" } else { " " };
        println!(
            "[{}] {}. {} ({}/{} added{})",
            marker,
            i + 1,
            playlist.title,
            playlist.count(TrackStatus::Completed),
            playlist.tracks.len(),
            playlist
                .remote_id
                .as_deref()
                .map(|id| format!(", {}", id))
                .unwrap_or_default()
        );

        let failed = playlist.count(TrackStatus::Failed);
        let skipped = playlist.count(TrackStatus::Skipped);
        if failed + skipped > 0 {
            println!("      {} failed, {} skipped", failed, skipped);
        }
    }

    println!();
    println!("{}", state.summary());
}

fn init(config_path: Option<&Path>) -> Result<ExitCode> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if path.exists() {
        bail!("{} already exists; not overwriting", path.display());
    }

    std::fs::write(path, Config::default_config_string())
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    println!("Add your source playlist ids and the path to your OAuth client secrets.");
    Ok(ExitCode::SUCCESS)
}

fn reset(config_path: Option<&Path>, yes: bool) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let storage = FileStorage::with_config(config.storage);

    if !yes {
        println!(
            "This deletes {} and {}. Re-run with --yes to confirm.",
            storage.run_state_location().display(),
            storage.video_cache_location().display()
        );
        return Ok(ExitCode::FAILURE);
    }

    storage.clear()?;
    info!("Removed saved run state and video cache");
    Ok(ExitCode::SUCCESS)
}
