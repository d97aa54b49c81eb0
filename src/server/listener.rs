//! TCP listener and guard server

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::guard::QueryGuard;
use crate::server::routes::build_router;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server wrapping a query guard
pub struct GuardServer {
    addr: SocketAddr,
    guard: Arc<QueryGuard>,
}

impl GuardServer {
    /// Create a new server
    pub fn new(addr: SocketAddr, guard: Arc<QueryGuard>) -> Self {
        Self { addr, guard }
    }

    /// Get the listen address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run until Ctrl-C
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr).await?;
        serve(listener, build_router(self.guard), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await
    }

    /// Run until the shutdown channel fires
    pub async fn run_with_shutdown(
        self,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr).await?;
        serve(listener, build_router(self.guard), async move {
            let _ = shutdown_rx.await;
        })
        .await
    }
}

async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "fieldguard server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("fieldguard server shutting down");
    Ok(())
}

/// Server handle for testing
pub struct ServerHandle {
    pub addr: SocketAddr,
    pub shutdown_tx: oneshot::Sender<()>,
}

impl ServerHandle {
    /// Shutdown the server
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Start a server in the background for testing
///
/// Binding to port 0 picks a free port; the handle carries the real address.
pub async fn start_test_server(
    addr: SocketAddr,
    guard: Arc<QueryGuard>,
) -> Result<ServerHandle, ServerError> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tokio::spawn(async move {
        let shutdown = async move {
            let _ = shutdown_rx.await;
        };
        if let Err(e) = serve(listener, build_router(guard), shutdown).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok(ServerHandle {
        addr: actual_addr,
        shutdown_tx,
    })
}
