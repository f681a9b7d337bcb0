use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;

use backend::rooms::Registry;
use backend::ws::{self, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenv::dotenv().ok();

    let host = std::env::var("HOST").unwrap_or_else(|_| "localhost".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3000);

    let state = AppState {
        registry: Arc::new(Mutex::new(Registry::new())),
    };
    let app = ws::router(state);

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .expect("failed to bind relay address");
    let addr = listener.local_addr().expect("listener has no address");
    tracing::info!("relay listening on {addr}");

    axum::serve(listener, app).await.expect("relay server error");
}
