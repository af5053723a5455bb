//! Duplicate Content Resolver REST API Server
//!
//! HTTP server exposing the duplicate admin listing, bulk removal, and
//! per-view canonical-link resolution over an in-memory content store.

use clap::Parser;
use dcr_api::create_router_with_config;
use dcr_manager::ManagerConfig;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Duplicate Content Resolver REST API Server
#[derive(Parser, Debug)]
#[command(
    name = "dcr-server",
    about = "REST API server for the duplicate content resolver",
    version
)]
struct Args {
    /// Server host address
    #[arg(
        short = 'H',
        long,
        default_value = "0.0.0.0",
        env = "DCR_HOST",
        help = "Host address to bind the server to"
    )]
    host: String,

    /// Server port
    #[arg(
        short,
        long,
        default_value = "3000",
        env = "DCR_PORT",
        help = "Port number to bind the server to"
    )]
    port: u16,

    /// Logging level
    #[arg(
        short,
        long,
        default_value = "info",
        env = "RUST_LOG",
        help = "Logging level (trace, debug, info, warn, error)"
    )]
    log_level: String,

    /// Enable JSON formatted logs
    #[arg(
        long,
        default_value = "false",
        env = "DCR_JSON_LOGS",
        help = "Output logs in JSON format"
    )]
    json_logs: bool,

    /// Emit a self-referential canonical link for non-duplicate records
    #[arg(
        long,
        default_value = "false",
        env = "DCR_EMIT_DEFAULT_CANONICAL",
        help = "Emit the record's own permalink as canonical when it is not a duplicate"
    )]
    emit_default_canonical: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(&args);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid host or port: {}", e))?;

    let config =
        ManagerConfig::default().with_emit_default_canonical(args.emit_default_canonical);
    let app = create_router_with_config(config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    print_banner(&addr);

    info!("Server starting on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

/// Initialize tracing subscriber with appropriate configuration
fn init_tracing(args: &Args) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        // JSON formatted logs for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable logs for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Print startup banner with server information
fn print_banner(addr: &SocketAddr) {
    println!("\n  Duplicate Content Resolver - REST API Server\n");
    println!("  Server Address:  http://{}", addr);
    println!("  Health Check:    http://{}/health", addr);
    println!();
    println!("  Available Endpoints:");
    println!();
    println!("    Content:");
    println!("      POST   /content                 - Seed a content record");
    println!("      GET    /content/:id             - Fetch a record");
    println!("      DELETE /content/:id             - Delete a record");
    println!("      GET    /content/:id/canonical   - Canonical link for a view");
    println!();
    println!("    Duplicate Administration:");
    println!("      GET    /duplicates?page=N       - Paginated duplicate groups");
    println!("      POST   /duplicates/delete       - Bulk-delete selected records");
    println!();
    println!("    System:");
    println!("      GET    /health                  - Health check");
    println!("      GET    /system/stats            - System statistics");
    println!();
}
