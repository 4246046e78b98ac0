//! MeshKV Server Binary
//!
//! Starts one cluster node.

use std::sync::Arc;

use clap::Parser;
use meshkv::network::Server;
use meshkv::{Config, NodeAddr, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// MeshKV Server
#[derive(Parser, Debug)]
#[command(name = "meshkv-server")]
#[command(about = "Distributed in-memory key-value cache node")]
#[command(version)]
struct Args {
    /// Listen address (host:port), must appear in --nodes
    #[arg(short, long, default_value = "127.0.0.1:9000")]
    listen: String,

    /// Comma-separated cluster node list (host:port,...), identical on every node
    #[arg(short, long, default_value = "127.0.0.1:9000")]
    nodes: String,

    /// Number of store lock shards
    #[arg(long, default_value = "16")]
    shards: usize,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Connection write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meshkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("MeshKV Server v{}", meshkv::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Cluster nodes: {}", args.nodes);

    let listen: NodeAddr = match args.listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid listen address: {}", e);
            std::process::exit(1);
        }
    };

    let nodes: Vec<NodeAddr> = match args
        .nodes
        .split(',')
        .map(|s| s.trim().parse())
        .collect::<Result<_, _>>()
    {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::error!("Invalid node list: {}", e);
            std::process::exit(1);
        }
    };

    // Build config from args
    let config = Config::builder()
        .listen_addr(listen)
        .nodes(nodes)
        .shard_count(args.shards)
        .max_connections(args.max_connections)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let store = Arc::new(Store::with_shards(config.shard_count));

    // Bind and serve
    let server = match Server::new(config, store) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
