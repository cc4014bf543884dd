use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionSettings};
use crate::router::Router;
use crate::server::build_router;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    let router = Arc::new(build_router(cfg));
    let settings = Arc::new(ConnectionSettings::from_config(cfg));

    serve(listener, router, settings).await
}

/// Accepts connections forever, one task per connection.
///
/// A failing connection only ends its own task; accept errors are logged and
/// the loop keeps going.
pub async fn serve(
    listener: TcpListener,
    router: Arc<Router>,
    settings: Arc<ConnectionSettings>,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        let settings = Arc::clone(&settings);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, peer.to_string(), router, settings);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
