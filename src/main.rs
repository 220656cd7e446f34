//! pgs3 - S3-style object storage on PostgreSQL
//!
//! One-shot CLI over the object gateway, plus a `serve` command that
//! runs the HTTP API.

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pgs3::api::HttpServer;
use pgs3::config::{DatabaseConfig, DEFAULT_HTTP_PORT};
use pgs3::error::{Error, Result};
use pgs3::gateway::{Gateway, GatewayResult, BUCKET};
use pgs3::mime;
use pgs3::store::PgStore;

/// pgs3 - S3-style object storage on PostgreSQL
///
/// Connection parameters come from PGHOST, PGPORT, PGDATABASE, PGUSER,
/// and PGPASSWORD (or a full DATABASE_URL), with libpq-style defaults.
#[derive(Parser)]
#[command(name = "pgs3")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PostgreSQL connection URL (overrides the PG* environment variables)
    #[arg(short, long)]
    db: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List objects in the public bucket, optionally filtered by prefix
    Ls {
        /// Only list keys starting with this prefix
        prefix: Option<String>,
    },

    /// Get an object from the public bucket and write it to stdout
    Get {
        /// Object key
        key: String,
    },

    /// Put an object into the public bucket, reading content from stdin
    Put {
        /// Object key; the content type is derived from its extension
        key: String,
    },

    /// Delete an object from the public bucket
    Delete {
        /// Object key
        key: String,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(default_value_t = DEFAULT_HTTP_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let mut config = DatabaseConfig::from_env()?;
    if let Some(url) = cli.db {
        config.url = Some(url);
    }
    config.validate()?;

    let store = match PgStore::connect(&config).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Failed to connect to PostgreSQL: {e}");
            return Err(e);
        }
    };
    let gateway = Gateway::new(store);

    match cli.command {
        Commands::Ls { prefix } => run_ls(gateway, prefix).await,
        Commands::Get { key } => run_get(gateway, key).await,
        Commands::Put { key } => run_put(gateway, key).await,
        Commands::Delete { key } => run_delete(gateway, key).await,
        Commands::Serve { port } => run_serve(gateway, port).await,
    }
}

/// Initialize logging
///
/// Logs go to stderr so `get` output can be piped cleanly.
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Unwrap a gateway result into its payload bytes, or report the error
/// on stderr and fail.
fn expect_success(result: GatewayResult) -> Result<Vec<u8>> {
    if result.is_success() {
        Ok(result.payload.map(|p| p.data).unwrap_or_default())
    } else {
        let message = result
            .error_message
            .unwrap_or_else(|| "Unknown error".to_string());
        eprintln!("Error: {message}");
        Err(Error::Operation(message))
    }
}

/// List objects in the public bucket
async fn run_ls(gateway: Gateway, prefix: Option<String>) -> Result<()> {
    let result = gateway.list_objects(BUCKET, prefix.as_deref()).await;
    let data = expect_success(result)?;
    println!("{}", String::from_utf8_lossy(&data));
    Ok(())
}

/// Fetch an object and write its raw bytes to stdout
async fn run_get(gateway: Gateway, key: String) -> Result<()> {
    let result = gateway.get_object(BUCKET, &key).await;
    let data = expect_success(result)?;
    std::io::stdout().write_all(&data)?;
    Ok(())
}

/// Store stdin as an object
async fn run_put(gateway: Gateway, key: String) -> Result<()> {
    let mut content = Vec::new();
    tokio::io::stdin().read_to_end(&mut content).await?;

    let content_type = mime::content_type_for_key(&key);
    let result = gateway
        .put_object(BUCKET, &key, &content, Some(content_type))
        .await;
    let data = expect_success(result)?;
    println!("{}", String::from_utf8_lossy(&data));
    Ok(())
}

/// Delete an object
async fn run_delete(gateway: Gateway, key: String) -> Result<()> {
    let result = gateway.delete_object(BUCKET, &key).await;
    expect_success(result)?;
    println!("Object deleted successfully");
    Ok(())
}

/// Run the HTTP API server until shutdown
async fn run_serve(gateway: Gateway, port: u16) -> Result<()> {
    println!("Starting S3 API server on port {port}");
    println!("Serving bucket '{BUCKET}'");
    println!("Press Ctrl+C to stop");

    let server = HttpServer::new(port, gateway);

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
            Ok(())
        }
    }
}
