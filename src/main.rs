use anyhow::Result;
use clap::Parser;
use motivational_quotes::app::App;
use motivational_quotes::models::Config;
use motivational_quotes::server::{self, ServerState};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "motivational-quotes")]
#[command(about = "Serve AI-generated motivational quotes over HTTP")]
struct CliArgs {
    /// Port to listen on. Overrides the PORT environment variable.
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motivational_quotes=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let port = args.port.unwrap_or(config.port);
    let app = App::from_config(&config);
    let state = Arc::new(ServerState {
        app,
        expose_error_details: config.environment.exposes_error_details(),
    });

    let listener = match server::bind(SocketAddr::new(args.bind, port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind port {}: {}", port, e);
            std::process::exit(1);
        }
    };

    info!("Server running on http://localhost:{}", port);
    info!("Environment: {}", config.environment);
    info!("API key configured: yes");

    server::serve(listener, state).await?;
    info!("Server stopped");
    Ok(())
}
