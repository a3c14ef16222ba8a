//! Server loop module
//!
//! Listener setup and the accept loop dispatching connections to tasks.

mod conn;
mod listener;

pub use listener::create_reusable_listener;

use crate::config::AppState;
use crate::logger;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accept connections until the process exits
///
/// Accept errors are logged and the loop keeps going; a failing peer must
/// not stop the server from serving everyone else.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                conn::accept_connection(stream, peer_addr, &state, &active_connections);
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
