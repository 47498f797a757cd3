//! In-process server harness for end-to-end tests.

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use tonewire_cli::commands::serve::Server;
use tonewire_cli::config::ServeConfig;
use tonewire_cli::playback::{AudioSink, NullSink};

/// Upper bound on any single wait in the harness.
pub const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Client side of a streaming connection.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A running server bound to ephemeral loopback ports.
pub struct TestServer {
    pub http_addr: Option<SocketAddr>,
    pub ws_addr: Option<SocketAddr>,
    pub ws_path: String,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Starts a server with default settings and no audio output.
    pub async fn start() -> Self {
        Self::start_with(ServeConfig::default()).await
    }

    /// Starts a server from `config` with its ports replaced by ephemeral ones.
    pub async fn start_with(config: ServeConfig) -> Self {
        Self::start_with_sink(config, Arc::new(NullSink)).await
    }

    /// Starts a server that hands waveforms to `sink`.
    pub async fn start_with_sink(mut config: ServeConfig, sink: Arc<dyn AudioSink>) -> Self {
        config.host = Ipv4Addr::LOCALHOST.into();
        config.http.port = 0;
        config.ws.port = 0;
        let ws_path = config.ws.path.clone();

        let server = Server::bind(config, sink)
            .await
            .expect("Failed to bind test server");
        let http_addr = server.http_addr();
        let ws_addr = server.ws_addr();

        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        let task = tokio::spawn(server.serve(shutdown_tx.clone()));

        Self {
            http_addr,
            ws_addr,
            ws_path,
            shutdown_tx,
            task,
        }
    }

    /// URL of the streaming endpoint at `path`.
    pub fn ws_url(&self, path: &str) -> String {
        let addr = self.ws_addr.expect("streaming endpoint is disabled");
        format!("ws://{}{}", addr, path)
    }

    /// Opens a streaming connection on the configured path.
    pub async fn connect(&self) -> WsClient {
        let url = self.ws_url(&self.ws_path);
        let (client, _) = timeout(IO_TIMEOUT, connect_async(url))
            .await
            .expect("Timed out connecting")
            .expect("Failed to connect");
        client
    }

    /// Sends `raw` to the HTTP responder and returns everything it sends back.
    pub async fn http_exchange(&self, raw: &[u8]) -> String {
        let addr = self.http_addr.expect("HTTP responder is disabled");
        let mut stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to HTTP responder");
        stream.write_all(raw).await.expect("Failed to send request");

        let mut response = Vec::new();
        timeout(IO_TIMEOUT, stream.read_to_end(&mut response))
            .await
            .expect("Timed out reading response")
            .expect("Failed to read response");
        String::from_utf8(response).expect("Response is not UTF-8")
    }

    /// Broadcasts shutdown and waits for the server to stop.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        timeout(IO_TIMEOUT, self.task)
            .await
            .expect("Timed out waiting for shutdown")
            .expect("Server task panicked")
            .expect("Server returned an error");
    }
}

/// Sends a text frame and returns the next data reply parsed as JSON.
pub async fn request(client: &mut WsClient, text: &str) -> Value {
    client
        .send(Message::Text(text.to_string()))
        .await
        .expect("Failed to send request");
    next_json(client).await
}

/// Waits for the next text frame and parses it.
pub async fn next_json(client: &mut WsClient) -> Value {
    loop {
        let msg = timeout(IO_TIMEOUT, client.next())
            .await
            .expect("Timed out waiting for reply")
            .expect("Connection closed before reply")
            .expect("Transport error");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(&text).expect("Reply is not JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Unexpected frame: {:?}", other),
        }
    }
}

/// Extracts the `waveform` array of a reply.
pub fn waveform_of(reply: &Value) -> Vec<f64> {
    reply["waveform"]
        .as_array()
        .unwrap_or_else(|| panic!("Reply has no waveform: {}", reply))
        .iter()
        .map(|v| v.as_f64().expect("Sample is not a number"))
        .collect()
}
