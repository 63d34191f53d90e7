use clap::{ArgAction, Parser, Subcommand};
use commands::{config, list};
use followed_shows_config::{Config, PathManager};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "followed-shows")]
#[command(about = "Keep a \"Following\" list of TV shows on Trakt")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file (rotated daily) instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the "Following" list, creating it if it does not exist
    Resolve,
    /// Show every followed show
    List,
    /// Add a show to the "Following" list
    #[command(long_about = "Add a show to the \"Following\" list. At least one of --trakt, --imdb or --tmdb is required; the list is created first if it does not exist.")]
    Follow {
        #[command(flatten)]
        show: ShowArgs,
    },
    /// Remove a show from the "Following" list
    Unfollow {
        #[command(flatten)]
        show: ShowArgs,
    },
    /// Inspect or change configuration and credentials
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(clap::Args)]
pub struct ShowArgs {
    /// Trakt show id
    #[arg(long)]
    trakt: Option<u64>,

    /// IMDB id (e.g. tt0903747)
    #[arg(long)]
    imdb: Option<String>,

    /// TMDB show id
    #[arg(long)]
    tmdb: Option<u32>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    Show {
        /// Show full configuration including masked secrets
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Configure the Trakt client id, access token and user
    #[command(long_about = "Configure Trakt API access. You'll need an API application from https://trakt.tv/oauth/applications and an access token for your account. Missing values are prompted for.")]
    Trakt {
        /// Trakt Client ID (if not provided, will prompt)
        #[arg(long)]
        client_id: Option<String>,

        /// Trakt access token (if not provided, will prompt)
        #[arg(long)]
        access_token: Option<String>,

        /// Trakt username whose lists are managed (defaults to the token owner)
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli.log_file.clone().or_else(configured_log_file);
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Resolve => list::run_resolve(&output).await,
        Commands::List => list::run_list(&output).await,
        Commands::Follow { show } => list::run_follow(show, &output).await,
        Commands::Unfollow { show } => list::run_unfollow(show, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }
    result
}

fn configured_log_file() -> Option<PathBuf> {
    let config_file = PathManager::default().config_file();
    Config::load_or_default(&config_file)
        .ok()
        .and_then(|config| config.logging)
        .and_then(|logging| logging.file)
}
