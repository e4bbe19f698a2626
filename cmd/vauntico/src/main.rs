//! Vauntico CLI - query the Trust Score API from the terminal.
//!
//! Commands:
//! - `vauntico score` - Get a user's trust score
//! - `vauntico calculate` - Trigger a trust score calculation
//! - `vauntico trends` - Get trust score history
//! - `vauntico features` - List sacred features for a user
//! - `vauntico me` / `vauntico user` - Fetch user profiles
//! - `vauntico health` - Check API health

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{Connection, OutputFormat};
use tracing::error;
use tracing_subscriber::EnvFilter;
use vauntico_sdk::types::{FeatureCategory, FeatureStatus, Granularity, ScoreFactor, Timeframe};

mod commands;

#[derive(Parser)]
#[command(name = "vauntico")]
#[command(about = "Query the Vauntico Trust Score API")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API base URL
    #[arg(long, global = true, env = "VAUNTICO_BASE_URL", default_value = vauntico_sdk::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// API key, sent as X-API-Key
    #[arg(long, global = true, env = "VAUNTICO_API_KEY", hide_env_values = true, conflicts_with = "access_token")]
    api_key: Option<String>,

    /// Access token, sent as a bearer token
    #[arg(long, global = true, env = "VAUNTICO_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "VAUNTICO_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Attempts per request for transport failures
    #[arg(long, global = true, env = "VAUNTICO_RETRIES", default_value_t = 3)]
    retries: u32,

    /// Extra header as NAME=VALUE (repeatable)
    #[arg(long = "header", global = true, value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a user's trust score
    Score {
        /// User id
        user_id: String,

        /// Omit the factor breakdown
        #[arg(long)]
        no_factors: bool,

        /// Bypass the server-side cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Trigger a trust score calculation
    Calculate {
        /// User id
        user_id: String,

        /// Recalculate even if a fresh score is cached
        #[arg(long)]
        force: bool,

        /// Restrict to a factor (repeatable)
        #[arg(long = "factor")]
        factors: Vec<ScoreFactor>,
    },

    /// Get trust score history
    Trends {
        /// User id
        user_id: String,

        /// Window: 7d, 30d, 90d or 1y
        #[arg(long, default_value_t = Timeframe::default())]
        timeframe: Timeframe,

        /// Bucket size: daily, weekly or monthly
        #[arg(long, default_value_t = Granularity::default())]
        granularity: Granularity,

        /// Omit the benchmark series
        #[arg(long)]
        no_benchmark: bool,
    },

    /// List sacred features for a user
    Features {
        /// User id
        user_id: String,

        /// Only this category
        #[arg(long)]
        category: Option<FeatureCategory>,

        /// Only this status
        #[arg(long)]
        status: Option<FeatureStatus>,

        /// Hide announced features
        #[arg(long)]
        no_coming_soon: bool,
    },

    /// Show the authenticated user
    Me,

    /// Show a user by id
    User {
        /// User id
        id: String,

        /// Include private profile fields
        #[arg(long)]
        include_private: bool,
    },

    /// Check API health
    Health,
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl Cli {
    fn connection(&self) -> Connection {
        Connection {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            access_token: self.access_token.clone(),
            timeout_secs: self.timeout,
            retries: self.retries,
            headers: self.headers.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let connection = cli.connection();
    let format = cli.format;

    let result = match cli.command {
        Commands::Score {
            user_id,
            no_factors,
            no_cache,
        } => commands::score::run(&connection, format, &user_id, !no_factors, !no_cache).await,
        Commands::Calculate {
            user_id,
            force,
            factors,
        } => commands::score::calculate(&connection, format, &user_id, force, factors).await,
        Commands::Trends {
            user_id,
            timeframe,
            granularity,
            no_benchmark,
        } => {
            commands::trends::run(
                &connection,
                format,
                &user_id,
                timeframe,
                granularity,
                !no_benchmark,
            )
            .await
        }
        Commands::Features {
            user_id,
            category,
            status,
            no_coming_soon,
        } => {
            commands::features::run(
                &connection,
                format,
                &user_id,
                category,
                status,
                !no_coming_soon,
            )
            .await
        }
        Commands::Me => commands::users::current(&connection, format).await,
        Commands::User {
            id,
            include_private,
        } => commands::users::by_id(&connection, format, &id, include_private).await,
        Commands::Health => commands::health::run(&connection, format).await,
    };

    if let Err(err) = &result {
        if let Some(api_error) = err.downcast_ref::<vauntico_sdk::Error>() {
            error!(
                code = api_error.code(),
                status = ?api_error.status(),
                correlation_id = api_error.correlation_id().unwrap_or("-"),
                "{}",
                api_error
            );
        }
    }
    result
}
