use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use arecords::{
    commands,
    config::{resolve_log_level, usage_error, CommandKind, FileConfig, Overrides, ProcessEnv, Settings},
    dns::{create_provider, DnsProvider},
    reconcile::MatchStrategy,
    validate::DomainSyntax,
};

#[derive(Parser)]
#[command(name = "arecords")]
#[command(about = "Manage Cloudflare DNS A records - list, upsert and delete by name")]
#[command(version)]
struct Cli {
    /// TOML file with defaults for zone, token, matching and logging
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g. info, debug)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Cloudflare API base URL
    #[arg(long, global = true, hide = true)]
    api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ZoneArgs {
    /// Zone id (falls back to CF_ZONE_ID)
    #[arg(long)]
    zone: Option<String>,

    /// API token (falls back to CF_API_TOKEN)
    #[arg(long)]
    token: Option<String>,
}

#[derive(Args)]
struct MatchArgs {
    /// How record names are matched against the given names
    #[arg(long = "match", value_enum)]
    match_strategy: Option<MatchStrategy>,

    /// Domain name grammar used to validate the given names
    #[arg(long, value_enum)]
    syntax: Option<DomainSyntax>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every A record in the zone
    List {
        #[command(flatten)]
        zone: ZoneArgs,
    },

    /// Create or update A records so each name points at one IPv4 address
    Upsert {
        #[command(flatten)]
        zone: ZoneArgs,

        /// Comma-separated record names
        #[arg(long)]
        names: Option<String>,

        /// IPv4 address every name should resolve to
        #[arg(long)]
        value: Option<String>,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Delete every A record matching the given names
    Delete {
        #[command(flatten)]
        zone: ZoneArgs,

        /// Comma-separated record names (falls back to A_RECORD_NAMES)
        #[arg(long)]
        names: Option<String>,

        #[command(flatten)]
        matching: MatchArgs,
    },
}

impl Commands {
    fn into_overrides(self) -> (CommandKind, Overrides) {
        match self {
            Commands::List { zone } => (
                CommandKind::List,
                Overrides {
                    zone_id: zone.zone,
                    api_token: zone.token,
                    ..Default::default()
                },
            ),
            Commands::Upsert {
                zone,
                names,
                value,
                matching,
            } => (
                CommandKind::Upsert,
                Overrides {
                    zone_id: zone.zone,
                    api_token: zone.token,
                    names,
                    value,
                    match_strategy: matching.match_strategy,
                    syntax: matching.syntax,
                    ..Default::default()
                },
            ),
            Commands::Delete {
                zone,
                names,
                matching,
            } => (
                CommandKind::Delete,
                Overrides {
                    zone_id: zone.zone,
                    api_token: zone.token,
                    names,
                    match_strategy: matching.match_strategy,
                    syntax: matching.syntax,
                    ..Default::default()
                },
            ),
        }
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Clap's error text followed by the usage line of the subcommand being
/// invoked, when one can be found on the command line.
fn parse_failure_message(err: &clap::Error, args: &[String]) -> String {
    let rendered = err.to_string();
    match CommandKind::from_args(args) {
        Some(kind) => format!("{}\n{}", rendered.trim_end(), kind.usage()),
        None => rendered.trim_end().to_string(),
    }
}

/// Parse the command line. Help and version output keep clap's behavior;
/// every other parse failure exits with status 1.
fn parse_cli() -> Cli {
    let args: Vec<String> = std::env::args().collect();
    match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{}", parse_failure_message(&e, &args));
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli();

    // Values already in the process environment win over .env
    dotenvy::dotenv().ok();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    init_logging(&resolve_log_level(cli.log_level.as_deref(), &file));

    let (kind, mut overrides) = cli.command.into_overrides();
    overrides.api_base = cli.api_base;
    overrides.timeout_seconds = cli.timeout;

    let settings = Settings::resolve(kind, overrides, &ProcessEnv, &file)
        .map_err(|e| usage_error(kind, e))?;

    let provider = create_provider(&settings)?;
    info!(
        command = %kind,
        provider = provider.provider_name(),
        zone = %settings.zone_id,
        "Starting"
    );

    tokio::select! {
        result = execute(&settings, provider.as_ref()) => result,
        _ = wait_for_shutdown() => {
            warn!("Shutdown signal received, aborting {}", kind);
            Err(anyhow!("Interrupted"))
        }
    }
}

async fn execute(settings: &Settings, provider: &dyn DnsProvider) -> Result<()> {
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();

    match settings.command {
        CommandKind::List => commands::list(provider, &mut out).await?,
        CommandKind::Upsert => {
            commands::upsert(provider, settings, &mut out, &mut err).await?;
        }
        CommandKind::Delete => {
            commands::delete(provider, settings, &mut out, &mut err).await?;
        }
    }

    Ok(())
}

/// Resolves on SIGINT/SIGTERM (Ctrl+C on Windows). Never resolves if the
/// handlers cannot be installed.
async fn wait_for_shutdown() {
    if let Err(e) = shutdown_signal().await {
        error!("Error waiting for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
