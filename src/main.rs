//! HeightSense server binary.
//!
//! Serves the measurement WebSocket plus banner/health endpoints. Runs with
//! a synthetic landmark source so the full pipeline can be exercised without
//! a camera or pose model attached.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use heightsense::api::{create_router, AppState};
use heightsense::session::SessionConfig;
use heightsense::source::SyntheticSource;

#[derive(Debug, Parser)]
#[command(name = "heightsense", version, about = "Real-time height measurement server")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Frame width reported by the synthetic landmark source.
    #[arg(long, default_value_t = 640)]
    frame_width: u32,

    /// Frame height reported by the synthetic landmark source.
    #[arg(long, default_value_t = 480)]
    frame_height: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heightsense=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let frame_width = args.frame_width;
    let frame_height = args.frame_height;
    let state = AppState::new(
        Arc::new(move || Box::new(SyntheticSource::new(frame_width, frame_height))),
        SessionConfig::default(),
    );

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(%addr, version = heightsense::VERSION, "starting height measurement server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
