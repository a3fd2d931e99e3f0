//! MCP server for Redash.
//!
//! Run with `REDASH_URL=... REDASH_API_KEY=... redash-mcp`, or pass the same
//! values as `--url` / `--api-key`.

use std::time::Duration;

use clap::Parser;
use redash_mcp::{Config, HttpTransport, McpServer, PollSettings, RedashClient};
use tracing_subscriber::EnvFilter;

/// MCP server for Redash.
///
/// Exposes Redash queries, dashboards, widgets and visualizations as MCP tools
/// for AI agents. Communicates via JSON-RPC 2.0 over stdin/stdout.
#[derive(Parser)]
#[command(name = "redash-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the Redash instance.
    #[arg(long, env = "REDASH_URL", value_name = "URL")]
    url: String,

    /// Redash user API key.
    #[arg(long, env = "REDASH_API_KEY", value_name = "KEY", hide_env_values = true)]
    api_key: String,

    /// HTTP request timeout in seconds.
    #[arg(long, env = "REDASH_TIMEOUT", value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Seconds to sleep between job status checks when running a query.
    #[arg(long, env = "REDASH_POLL_INTERVAL", value_name = "SECS", default_value_t = 1.0)]
    poll_interval: f64,

    /// Default number of job status checks before a run gives up.
    #[arg(long, env = "REDASH_MAX_POLLS", value_name = "N", default_value_t = 60)]
    max_polls: u64,

    /// Enable debug logging to stderr.
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("redash_mcp=debug".parse().unwrap()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let poll_interval = match Duration::try_from_secs_f64(args.poll_interval) {
        Ok(interval) => interval,
        Err(e) => {
            eprintln!("Error: invalid --poll-interval '{}': {}", args.poll_interval, e);
            std::process::exit(1);
        }
    };

    let config = match Config::new(&args.url, &args.api_key) {
        Ok(config) => config
            .with_timeout(Duration::from_secs(args.timeout))
            .with_poll(PollSettings {
                interval: poll_interval,
                max_polls: args.max_polls,
            }),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let transport = match HttpTransport::new(&config) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Error: Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(base_url = config.base_url(), "starting redash-mcp");

    // Create client and server
    let client = RedashClient::new(transport, config.poll());
    let mut server = McpServer::new(client);

    // Run the server
    if let Err(e) = server.run_sync() {
        eprintln!("Error: Server error: {}", e);
        std::process::exit(1);
    }
}
