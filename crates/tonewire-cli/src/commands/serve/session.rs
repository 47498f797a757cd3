//! Per-connection delivery loop.
//!
//! A session waits for a request, generates the waveform, sends it, and
//! optionally plays and paces it before waiting again. Requests on one
//! connection never overlap. The loop ends when the client goes away, the
//! transport fails, or the server shuts down.

use std::io;
use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::config::StreamConfig;
use crate::playback::AudioSink;

use super::handler;

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client closed the connection or dropped it.
    ClientClosed,
    /// The server is shutting down.
    Shutdown,
    /// Any other transport failure.
    TransportError(String),
}

/// Outcome of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Replies sent, errors included.
    pub replies: usize,
    /// Why the loop stopped.
    pub end: SessionEnd,
}

/// Runs the delivery loop on an accepted WebSocket until it ends.
pub async fn run_session<S>(
    ws_stream: WebSocketStream<S>,
    peer_addr: SocketAddr,
    config: &StreamConfig,
    sink: &dyn AudioSink,
    shutdown_rx: &mut broadcast::Receiver<()>,
) -> SessionSummary
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut write, mut read) = ws_stream.split();
    let mut replies = 0;

    let end = loop {
        let msg = tokio::select! {
            msg_opt = read.next() => msg_opt,
            _ = shutdown_rx.recv() => {
                let _ = write.send(Message::Close(None)).await;
                break SessionEnd::Shutdown;
            }
        };

        let msg = match msg {
            None | Some(Ok(Message::Close(_))) => break SessionEnd::ClientClosed,
            Some(Ok(msg)) => msg,
            Some(Err(e)) => break classify_error(e),
        };

        let Some(reply) = handler::process_message(msg, config) else {
            continue;
        };
        let (text, waveform) = reply.into_parts();

        if let Err(e) = write.send(Message::Text(text)).await {
            break classify_error(e);
        }
        replies += 1;

        let Some(waveform) = waveform else {
            continue;
        };

        if config.playback {
            // The next waveform replaces this one; the handle is not awaited.
            if let Err(e) = sink.play(&waveform) {
                log::warn!("Playback failed for {}: {}", peer_addr, e);
            }
        }

        if config.pace {
            tokio::time::sleep(config.pace_interval()).await;
        }
    };

    match &end {
        SessionEnd::ClientClosed => log::info!("Client disconnected: {}", peer_addr),
        SessionEnd::Shutdown => log::debug!("Closed {} for shutdown", peer_addr),
        SessionEnd::TransportError(e) => log::warn!("Connection error for {}: {}", peer_addr, e),
    }

    SessionSummary { replies, end }
}

/// Maps a transport error to a session end. Resets and abrupt EOFs count as
/// the client going away.
fn classify_error(error: WsError) -> SessionEnd {
    match &error {
        WsError::ConnectionClosed
        | WsError::AlreadyClosed
        | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => SessionEnd::ClientClosed,
        WsError::Io(io_err)
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ) =>
        {
            SessionEnd::ClientClosed
        }
        _ => SessionEnd::TransportError(error.to_string()),
    }
}
