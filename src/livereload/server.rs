// src/livereload/server.rs

use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::Result;

use super::{LiveReloadHub, ReloadEvent};

/// Running live-reload listener. Dropping it does not stop the server;
/// call [`LiveReloadServer::shutdown`].
#[derive(Debug)]
pub struct LiveReloadServer {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl LiveReloadServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

/// Bind `host:port` and stream every hub event to each client as one JSON
/// line. Port 0 picks a free port.
pub async fn spawn_server(host: &str, port: u16, hub: LiveReloadHub) -> Result<LiveReloadServer> {
    let listener = TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "live-reload server listening");

    let task = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    debug!(%peer, "live-reload client connected");
                    tokio::spawn(serve_client(stream, hub.subscribe()));
                }
                Err(err) => warn!(error = %err, "live-reload accept failed"),
            }
        }
    });

    Ok(LiveReloadServer { addr, task })
}

async fn serve_client(mut stream: TcpStream, mut events: broadcast::Receiver<ReloadEvent>) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "live-reload client lagging");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let mut line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "could not encode reload event");
                continue;
            }
        };
        line.push('\n');

        if let Err(err) = stream.write_all(line.as_bytes()).await {
            debug!(error = %err, "live-reload client went away");
            break;
        }
    }
}
