mod builder;
mod config;
mod error;
mod index;
mod model;
mod search;
mod server;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use codex_common::store::CatalogStore;
use config::Config;
use model::CommandCatalog;
use server::CommandCodexServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting command-codex MCP server");

    let config = Config::from_env()?;
    info!(
        catalog = %config.catalog,
        max_bytes = config.limits.max_bytes,
        timeout_secs = config.limits.timeout.as_secs(),
        "configuration loaded"
    );

    // Tools answer with a loading status until the fetch settles.
    let store: CatalogStore<CommandCatalog> = CatalogStore::new(config.catalog, config.limits);
    store.spawn_initial_load();

    let server = CommandCodexServer::new(store);

    if let Some(addr) = config.tcp_listen_addr {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let session = server.new_session();
            tokio::spawn(async move {
                info!(peer = %peer, "MCP client connected");
                let service = session.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
