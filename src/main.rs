// src/main.rs
// vct-bdd - run transparency log feature files against a live log

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use vct_bdd::client::RestConnector;
use vct_bdd::config::{ConfigLayer, HarnessConfig};
use vct_bdd::fixtures::FixtureRegistry;
use vct_bdd::http::create_shared_client;
use vct_bdd::runner::{RunOptions, Runner, StepKind};
use vct_bdd::steps::HarnessContext;

#[derive(Parser)]
#[command(name = "vct-bdd")]
#[command(about = "Behaviour-driven checks for verifiable credential transparency logs")]
#[command(version)]
struct Cli {
    /// Config file (default: ./vct-bdd.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run feature files (directories are searched recursively)
    Run(RunArgs),

    /// Print the step vocabulary
    Steps,

    /// List available credential fixtures
    Fixtures {
        /// Directory overlaid on the built-in fixtures
        #[arg(long)]
        fixtures_dir: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Feature files or directories
    #[arg(default_value = "features")]
    paths: Vec<PathBuf>,

    /// Only run scenarios with any of these tags
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Only run scenarios whose name contains this text
    #[arg(long)]
    name: Option<String>,

    /// Log endpoint used instead of the one quoted in connect steps
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory overlaid on the built-in fixtures
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,

    /// Wait between polling attempts
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Polling attempts before a step fails
    #[arg(long)]
    poll_attempts: Option<u32>,

    /// Per-request timeout
    #[arg(long)]
    request_timeout_secs: Option<u64>,
}

impl RunArgs {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            endpoint: self.endpoint.clone(),
            poll_interval_ms: self.poll_interval_ms,
            poll_attempts: self.poll_attempts,
            request_timeout_secs: self.request_timeout_secs,
            fixtures_dir: self.fixtures_dir.clone(),
            log_filter: None,
        }
    }
}

fn load_config(cli_layer: ConfigLayer, config_path: Option<&PathBuf>) -> Result<HarnessConfig> {
    let file_layer = ConfigLayer::from_file(config_path.map(PathBuf::as_path))?;
    let layer = cli_layer.or(ConfigLayer::from_env()).or(file_layer);

    // Logging needs the resolved filter, so set it up before validation warnings
    let filter = layer
        .log_filter
        .clone()
        .unwrap_or_else(|| vct_bdd::config::DEFAULT_LOG_FILTER.to_string());
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    Ok(layer.resolve()?)
}

fn load_fixtures(config: &HarnessConfig) -> Result<FixtureRegistry> {
    match &config.fixtures_dir {
        Some(dir) => FixtureRegistry::with_overlay_dir(dir)
            .with_context(|| format!("loading fixtures from {}", dir.display())),
        None => Ok(FixtureRegistry::embedded().clone()),
    }
}

async fn run(args: RunArgs, config: HarnessConfig) -> Result<bool> {
    let fixtures = load_fixtures(&config)?;
    let http = create_shared_client(config.request_timeout)?;

    info!(
        fixtures = fixtures.len(),
        poll_interval = ?config.poll.interval,
        poll_attempts = config.poll.max_attempts,
        "Starting run"
    );

    let ctx = HarnessContext::new(Arc::new(RestConnector::new(http)), Arc::new(fixtures))
        .with_policy(config.poll)
        .with_endpoint_override(config.endpoint.clone());
    let options = RunOptions {
        tags: args.tags,
        name_filter: args.name,
    };

    let report = Runner::new(ctx, options).run_paths(&args.paths).await?;
    println!("{}", report);
    Ok(report.is_success())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = load_config(args.layer(), cli.config.as_ref())?;
            if !run(args, config).await? {
                std::process::exit(1);
            }
        }
        Commands::Steps => {
            for kind in StepKind::ALL {
                println!("{:<12} {}", format!("{:?}", kind), kind.pattern());
                println!("{:<12} {}", "", kind.describe());
            }
        }
        Commands::Fixtures { fixtures_dir } => {
            let layer = ConfigLayer {
                fixtures_dir,
                ..Default::default()
            };
            let config = load_config(layer, cli.config.as_ref())?;
            let fixtures = load_fixtures(&config)?;
            for name in fixtures.names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
