//! LiveReload protocol hub
//!
//! Speaks the official-7 LiveReload protocol over WebSocket: answers the
//! client hello with the protocol advertisement, then pushes reload
//! commands as debounced file changes arrive.

use crate::livereload::ReloadEvent;
use crate::logger;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Serialize)]
struct HelloReply {
    command: &'static str,
    protocols: Vec<&'static str>,
    #[serde(rename = "serverName")]
    server_name: &'static str,
}

#[derive(Serialize)]
struct ReloadCommand<'a> {
    command: &'static str,
    path: &'a str,
    #[serde(rename = "liveCSS")]
    live_css: bool,
}

#[derive(Deserialize)]
struct ClientCommand {
    command: String,
}

/// Accept LiveReload clients until the process exits
pub async fn serve(port: u16, tx: broadcast::Sender<ReloadEvent>) -> Result<(), BoxError> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    logger::log_livereload_start(port);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let rx = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, rx).await {
                logger::log_warning(&format!("[LiveReload] Client {peer_addr}: {e}"));
            }
        });
    }
}

/// Serve a single client: handshake, then forward reload events
async fn handle_client(
    stream: TcpStream,
    mut rx: broadcast::Receiver<ReloadEvent>,
) -> Result<(), BoxError> {
    let peer_addr = stream.peer_addr()?;
    let ws = tokio_tungstenite::accept_async(stream).await?;
    logger::log_livereload_client(&peer_addr);
    let (mut sink, mut source) = ws.split();

    loop {
        tokio::select! {
            message = source.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    if is_hello(&text) {
                        sink.send(Message::Text(hello_reply()?)).await?;
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            event = rx.recv() => match event {
                Ok(event) => sink.send(Message::Text(reload_command(&event.path)?)).await?,
                // A lagged receiver only costs an extra missed reload
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            },
        }
    }
}

fn is_hello(text: &str) -> bool {
    serde_json::from_str::<ClientCommand>(text)
        .map(|c| c.command == "hello")
        .unwrap_or(false)
}

fn hello_reply() -> Result<String, BoxError> {
    Ok(serde_json::to_string(&HelloReply {
        command: "hello",
        protocols: vec!["http://livereload.com/protocols/official-7"],
        server_name: "spaserve",
    })?)
}

fn reload_command(path: &str) -> Result<String, BoxError> {
    Ok(serde_json::to_string(&ReloadCommand {
        command: "reload",
        path,
        live_css: true,
    })?)
}
