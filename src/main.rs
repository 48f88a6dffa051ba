mod commands;
mod config;
mod context;
mod datasource;
mod output;
mod secrets;
mod traits;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use commands::{DecodeCommand, OutputFormat, ReadCommand, SchemaCommand};
use config::{ConfigOverrides, ProviderConfig};
use context::Context;
use secrets::VaultClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "vault-data")]
#[command(about = "Read-only Vault secret data source for Infrastructure as Code tooling", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Vault server address
    #[arg(long, env = "VAULT_ADDR", global = true)]
    address: Option<String>,

    /// Vault token
    #[arg(long, env = "VAULT_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Vault Enterprise namespace
    #[arg(long, env = "VAULT_NAMESPACE", global = true)]
    namespace: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Path to a config file (defaults to ~/.vault-data/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the secret stored at a path
    Read {
        /// Secret path (leading slashes are ignored)
        path: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Print only the decoded value of this field
        #[arg(long)]
        field: Option<String>,
    },

    /// Show how a raw field value is exposed after decoding
    Decode {
        /// Raw field value, e.g. base64:aGVsbG8=
        value: String,
    },

    /// Describe the data source attributes
    Schema {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() {
    let cli = Cli::parse();
    initialise_logging(cli.verbose);

    let ctx = Context::new();

    if let Err(err) = run(&ctx, cli) {
        ctx.output.error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(ctx: &Context, cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Read {
            path,
            format,
            field,
        } => {
            let config = load_config(ctx, &cli.connection)?;
            let store = VaultClient::new(&config).context("Failed to create Vault client")?;
            ReadCommand::execute(ctx, Arc::new(store), &path, format, field.as_deref())?;
        }
        Commands::Decode { value } => {
            DecodeCommand::execute(ctx, &value)?;
        }
        Commands::Schema { format } => {
            SchemaCommand::execute(ctx, format)?;
        }
    }

    Ok(())
}

fn load_config(ctx: &Context, args: &ConnectionArgs) -> Result<ProviderConfig> {
    let overrides = ConfigOverrides {
        address: args.address.clone(),
        token: args.token.clone(),
        namespace: args.namespace.clone(),
        timeout_secs: args.timeout,
    };

    ProviderConfig::load(ctx.fs.as_ref(), args.config.as_deref(), &overrides)
        .context("Failed to load configuration")
}

fn initialise_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Subscriber already installed; keep it
    }
}
