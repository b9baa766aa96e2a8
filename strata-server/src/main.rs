mod app;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strata::annotations::AnnotationQueryBuilder;
use strata::search::HttpTransport;
use strata::strategy::{RollupStrategy, StrategyRegistry};

#[derive(Parser, Debug)]
#[command(name = "strata-server")]
#[command(about = "Annotation query service over resolved search strategies")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "strata.toml")]
    config: String,

    /// Bind address, overriding the config file when set
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = strata::Config::load_or_create(std::path::Path::new(&args.config))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("{},strata=debug", config.logging.level)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Config file: {}", args.config);
    tracing::info!("Backend: {}", config.elasticsearch.url);

    let transport = Arc::new(HttpTransport::new(&config.elasticsearch)?);

    let registry = Arc::new(StrategyRegistry::new(transport.clone()));
    if config.rollup.enabled {
        tracing::info!("Rollup search strategy enabled");
        registry.register(Arc::new(RollupStrategy::new(transport)));
    }

    let state = app::AppState {
        builder: Arc::new(AnnotationQueryBuilder::new(registry)),
    };

    let addr = args.bind.unwrap_or(config.server.bind_addr);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app::router(state)).await?;

    Ok(())
}
