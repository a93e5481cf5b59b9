//! Demo REST server exposing a JSON echo service under `/echo`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use http::Method;
use restwire::{config, observability, RestServer, Service};
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "serve", about = "Run a demo REST server with an echo service")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address override.
    #[arg(long)]
    bind: Option<String>,
}

struct EchoService;

impl Service for EchoService {
    fn handle(&self, method: &Method, content: &[u8], captures: &[String]) -> String {
        json!({
            "method": method.as_str(),
            "tail": captures.first().cloned().unwrap_or_default(),
            "content": String::from_utf8_lossy(content),
        })
        .to_string()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::Config::default(),
    };
    let bind_address = args.bind.unwrap_or(config.server.bind_address);

    let mut server = RestServer::new();
    if !server.register_service(Arc::new(EchoService), "/echo(?:/(.*))?") {
        return Err("echo pattern failed to compile".into());
    }

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %bind_address, "serving echo service under /echo");

    tokio::select! {
        result = server.run(listener) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutdown signal received"),
    }
    Ok(())
}
