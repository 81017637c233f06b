use std::sync::Arc;

use jyotish_common::Result;
use jyotish_config::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

pub struct GatewayServer {
    state: Arc<AppState>,
}

impl GatewayServer {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// Bind and serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.gateway.bind_addr();
        let listener = TcpListener::bind(&addr).await?;
        info!(
            "jyotish gateway listening on http://{} (model={})",
            listener.local_addr()?,
            self.state.chat.model()
        );

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("gateway stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
