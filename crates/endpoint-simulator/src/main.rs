use clap::Parser;
use endpoint_simulator::{SimulatorConfig, SimulatorServer};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// HTTP endpoint simulator for API-client testing
#[derive(Parser, Debug)]
#[command(name = "endpoint-simulator")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "SIM_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides the config file)
    #[arg(long, env = "SIM_HOST")]
    host: Option<IpAddr>,

    /// YAML configuration file
    #[arg(short, long, env = "SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Default log level; RUST_LOG directives refine it
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(args.log_level.into()))
        .init();

    let mut config = match args.config {
        Some(ref path) => SimulatorConfig::from_file(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(port) = args.port {
        config.listen.port = port;
    }
    if let Some(host) = args.host {
        config.listen.host = host;
    }

    SimulatorServer::new(config).run().await
}
