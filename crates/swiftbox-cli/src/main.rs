//! Swiftbox - object storage from the command line

mod commands;
mod config;
mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use commands::CommandContext;
use config::Overrides;
use std::path::PathBuf;
use std::process::ExitCode;
use swiftbox_core::config::{BackendKind, LoggingConfig};
use swiftbox_core::EmptinessCheck;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "swiftbox")]
#[command(author = "Swiftbox Team")]
#[command(version = swiftbox_core::VERSION)]
#[command(about = "Manage containers and objects in object storage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (default: ~/.swiftbox/config.toml)
    #[arg(short, long, global = true, env = "SWIFTBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Storage backend (s3, local)
    #[arg(long, global = true, value_parser = parse_backend)]
    backend: Option<BackendKind>,

    /// Data directory for the local backend
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// S3 region
    #[arg(long, global = true)]
    region: Option<String>,

    /// Read credentials from this TOML file instead of the environment
    #[arg(long, global = true)]
    secrets_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List containers
    Ls {
        /// Only list containers whose name starts with this
        prefix: Option<String>,
    },

    /// Make a container
    Mb { container: String },

    /// Remove an empty container
    Rb {
        container: String,

        /// Judge emptiness by listing containers that share the name as a prefix
        #[arg(long)]
        prefix_check: bool,
    },

    /// Upload a local file; the object is named after the file
    Put { container: String, file: PathBuf },

    /// Download an object to a local file
    Get {
        container: String,
        object: String,
        dest: PathBuf,
    },

    /// Delete an object
    Rm { container: String, object: String },

    /// List objects in a container
    Objects {
        container: String,

        /// Show size and modification time
        #[arg(short, long)]
        long: bool,

        /// Human readable sizes
        #[arg(short = 'H', long)]
        human_readable: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn parse_backend(s: &str) -> Result<BackendKind, String> {
    BackendKind::parse(s).ok_or_else(|| format!("unknown backend '{}' (expected s3 or local)", s))
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout stays parseable
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Stable code for a failure, taken from the classified error when there is one
fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<swiftbox::Error>() {
        Some(e) => e.code(),
        None => "ErrCli",
    }
}

fn report_error(err: &anyhow::Error, output: OutputFormat) {
    let code = error_code(err);
    match output {
        OutputFormat::Json => {
            let body = serde_json::json!({ "error": code, "message": format!("{:#}", err) });
            eprintln!("{}", body);
        }
        OutputFormat::Text => {
            eprintln!("{}: {:#}", code.red().bold(), err);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = config::load(cli.config.as_deref())?;

    let emptiness_check = match &cli.command {
        Commands::Rb { prefix_check: true, .. } => Some(EmptinessCheck::ContainerPrefix),
        _ => None,
    };
    Overrides {
        backend: cli.backend,
        data_dir: cli.data_dir,
        region: cli.region,
        secrets_file: cli.secrets_file,
        log_level: cli.log_level,
        emptiness_check,
    }
    .apply(&mut config);

    init_logging(&config.logging, cli.verbose);
    tracing::debug!(
        backend = config.backend.kind.as_str(),
        emptiness_check = config.client.emptiness_check.as_str(),
        "Configuration loaded"
    );

    let client = swiftbox::connect_from_config(&config).await?;
    let ctx = CommandContext {
        client,
        output_format: cli.output,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Ls { prefix } => commands::ls::execute(&ctx, prefix.as_deref()).await,
        Commands::Mb { container } => commands::mb::execute(&ctx, &container).await,
        Commands::Rb { container, .. } => commands::rb::execute(&ctx, &container).await,
        Commands::Put { container, file } => commands::put::execute(&ctx, &container, &file).await,
        Commands::Get {
            container,
            object,
            dest,
        } => commands::get::execute(&ctx, &container, &object, &dest).await,
        Commands::Rm { container, object } => {
            commands::rm::execute(&ctx, &container, &object).await
        }
        Commands::Objects {
            container,
            long,
            human_readable,
        } => commands::objects::execute(&ctx, &container, long, human_readable).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let output = cli.output;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, output);
            ExitCode::FAILURE
        }
    }
}
