//! Sine streaming server.
//!
//! Runs two listeners on one current-thread tokio runtime:
//!
//! - a static HTTP responder that answers `GET` with a hello-world page;
//! - a WebSocket endpoint (default `/ws/audio`) that answers every request
//!   with a freshly generated sine waveform.
//!
//! ## Protocol
//!
//! Requests are JSON objects with an optional `frequency` in Hz:
//!
//! ```json
//! {"frequency": 880}
//! ```
//!
//! A missing or non-numeric frequency falls back to 440 Hz. Responses carry
//! the samples:
//!
//! ```json
//! {"waveform": [0.0, 0.0626, 0.1243, ...]}
//! ```
//!
//! Frames that are not JSON objects get an error object instead and the
//! connection stays open:
//!
//! ```json
//! {"error": {"code": "WS_001", "message": "Invalid request JSON: ..."}}
//! ```

mod handler;
pub mod http;
mod session;
mod types;


use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse as HandshakeRejection, Request, Response,
};
use tokio_tungstenite::tungstenite::http::StatusCode;

use crate::config::ServeConfig;
use crate::playback::{self, AudioSink};

pub use handler::{handle_request, process_message, Reply};
pub use session::{run_session, SessionEnd, SessionSummary};
pub use types::{error_codes, ErrorBody, ErrorResponse, FrequencyRequest, WaveformResponse};

/// Run the server until Ctrl+C.
///
/// # Returns
/// Exit code: 0 on clean shutdown
pub fn run(config: ServeConfig) -> Result<ExitCode> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move {
        let sink = playback::sink_for(config.stream.playback);
        let server = Server::bind(config, sink).await?;

        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        let ctrl_c_tx = shutdown_tx.clone();
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                log::info!("Shutting down...");
                let _ = ctrl_c_tx.send(());
            }
        });

        server.serve(shutdown_tx).await?;
        log::info!("Server shutdown complete");
        Ok(ExitCode::SUCCESS)
    })
}

/// Bound listeners ready to serve.
pub struct Server {
    config: Arc<ServeConfig>,
    sink: Arc<dyn AudioSink>,
    http: Option<TcpListener>,
    ws: Option<TcpListener>,
}

impl Server {
    /// Binds the enabled listeners. Fails if none is enabled.
    pub async fn bind(config: ServeConfig, sink: Arc<dyn AudioSink>) -> Result<Self> {
        if !config.http.enabled && !config.ws.enabled {
            anyhow::bail!("Both the HTTP responder and the streaming endpoint are disabled");
        }

        let http = if config.http.enabled {
            Some(bind_listener(config.http_addr()).await?)
        } else {
            None
        };
        let ws = if config.ws.enabled {
            Some(bind_listener(config.ws_addr()).await?)
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            sink,
            http,
            ws,
        })
    }

    /// Local address of the HTTP responder, if enabled.
    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Local address of the streaming endpoint, if enabled.
    pub fn ws_addr(&self) -> Option<SocketAddr> {
        self.ws.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Serves until a message is broadcast on `shutdown_tx`.
    pub async fn serve(self, shutdown_tx: broadcast::Sender<()>) -> Result<()> {
        if let Some(addr) = self.http_addr() {
            log::info!("HTTP responder listening on http://{}", addr);
        }
        if let Some(addr) = self.ws_addr() {
            log::info!(
                "Streaming endpoint listening on ws://{}{}",
                addr,
                self.config.ws.path
            );
        }

        let http_task = self
            .http
            .map(|listener| tokio::spawn(http::serve(listener, shutdown_tx.subscribe())));
        let ws_task = self.ws.map(|listener| {
            tokio::spawn(accept_streams(
                listener,
                Arc::clone(&self.config),
                Arc::clone(&self.sink),
                shutdown_tx.clone(),
            ))
        });

        if let Some(task) = http_task {
            task.await.context("HTTP responder task failed")?;
        }
        if let Some(task) = ws_task {
            task.await.context("Streaming endpoint task failed")?;
        }
        Ok(())
    }
}

async fn bind_listener(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))
}

/// Accepts streaming connections until shutdown.
async fn accept_streams(
    listener: TcpListener,
    config: Arc<ServeConfig>,
    sink: Arc<dyn AudioSink>,
    shutdown_tx: broadcast::Sender<()>,
) {
    let mut shutdown_rx = shutdown_tx.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        log::info!("New connection from {}", peer_addr);
                        tokio::spawn(handle_connection(
                            stream,
                            peer_addr,
                            Arc::clone(&config),
                            Arc::clone(&sink),
                            shutdown_tx.subscribe(),
                        ));
                    }
                    Err(e) => {
                        log::warn!("Accept error: {}", e);
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                log::debug!("Streaming endpoint stopped");
                break;
            }
        }
    }
}

/// Performs the handshake on one connection and runs its session.
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServeConfig>,
    sink: Arc<dyn AudioSink>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let expected_path = config.ws.path.clone();
    let check_path = move |request: &Request, response: Response| {
        if request.uri().path() == expected_path {
            Ok(response)
        } else {
            let mut rejection = HandshakeRejection::new(Some(format!(
                "No streaming endpoint at {}",
                request.uri().path()
            )));
            *rejection.status_mut() = StatusCode::NOT_FOUND;
            Err(rejection)
        }
    };

    let ws_stream = match tokio_tungstenite::accept_hdr_async(stream, check_path).await {
        Ok(ws) => ws,
        Err(e) => {
            log::warn!("WebSocket handshake failed for {}: {}", peer_addr, e);
            return;
        }
    };

    let summary = run_session(
        ws_stream,
        peer_addr,
        &config.stream,
        sink.as_ref(),
        &mut shutdown_rx,
    )
    .await;

    log::debug!(
        "Connection closed: {} ({} replies)",
        peer_addr,
        summary.replies
    );
}
