//! Preview server for the generated pages

use anyhow::Result;
use axum::{handler::HandlerWithoutStateExt, http::StatusCode, response::IntoResponse, Router};
use std::net::SocketAddr;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Website;

/// Router serving the public directory; `/docs/agent` maps to `docs/agent/index.html`
pub fn router(public_dir: &Path) -> Router {
    let files = ServeDir::new(public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Serve the public directory until interrupted
pub async fn start(site: &Website, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(&site.public_dir)).await?;

    Ok(())
}
