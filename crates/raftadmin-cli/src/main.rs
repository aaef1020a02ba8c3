//! # RaftAdmin CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # Ask a node who the leader is
//! raftadmin 127.0.0.1:50051 leader
//!
//! # Add a voter through whichever node is currently leader
//! raftadmin --leader multi:///127.0.0.1:50051,127.0.0.1:50052,127.0.0.1:50053 \
//!     add_voter serverD 127.0.0.1:50054 0
//!
//! # Finish an operation a previous run left behind
//! raftadmin 127.0.0.1:50051 await <operation_token>
//! ```
//!
//! Progress is logged to stderr; the final response is printed to stdout as
//! JSON. Any error exits with status 1.

use anyhow::Result;
use raftadmin_cli::{render_error, run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // Set default log level to INFO, but allow RUST_LOG env var to override
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let invocation = match run(&cli).await {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            std::process::exit(1);
        }
    };

    // Output raw JSON to stdout
    println!("{}", serde_json::to_string(&invocation.response)?);

    Ok(())
}
