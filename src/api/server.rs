//! API Server
//!
//! Binds the router, stacks the middleware and shuts down gracefully.

use super::{
    handlers::AppState,
    middleware::{create_cors_layer, request_id_middleware},
    routes::create_router,
};
use crate::{config::ApiConfig, errors::ConfigurationError, services::GameService};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

pub struct ApiServer {
    config: ApiConfig,
    service: Arc<GameService>,
}

impl ApiServer {
    pub fn new(config: ApiConfig, service: Arc<GameService>) -> Self {
        Self { config, service }
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.socket_addr()?;
        let app = create_app(Arc::clone(&self.service), &self.config);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🎲 Guess duel server listening on http://{}", addr);
        self.log_server_info();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("🛑 Server stopped gracefully");
        Ok(())
    }

    fn socket_addr(&self) -> Result<SocketAddr, ConfigurationError> {
        let ip = self.config.host.parse::<std::net::IpAddr>().map_err(|e| {
            ConfigurationError::InvalidValue {
                field: "api.host".to_string(),
                value: self.config.host.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(SocketAddr::from((ip, self.config.port)))
    }

    fn log_server_info(&self) {
        info!("   CORS: {:?}", self.config.allowed_origins);
        info!("   Request timeout: {}s", self.config.request_timeout_secs);
        info!("📊 Available endpoints:");
        info!("   POST   /api/game/start");
        info!("   POST   /api/game/guess");
        info!("   GET    /api/game/status");
        info!("   POST   /api/game/reset");
        info!("   GET    /api/game/history  (alias /api/history)");
        info!("   DELETE /api/game/history");
        info!("   GET    /api/mensaje");
        info!("   GET    /health");
    }
}

/// Router plus the middleware stack, without binding a socket
pub fn create_app(service: Arc<GameService>, config: &ApiConfig) -> axum::Router {
    let state = Arc::new(AppState { service });

    create_router(state)
        // Request ID first so handlers and errors can see it
        .layer(axum::middleware::from_fn(request_id_middleware))
        // CORS before timeout to answer preflight
        .layer(create_cors_layer(&config.allowed_origins))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
