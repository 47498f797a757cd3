//! Server configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "host": "0.0.0.0",
//!   "http": { "port": 8080 },
//!   "stream": { "duration_secs": 0.25, "pace": true }
//! }
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tonewire_synth::{DEFAULT_FREQUENCY, DEFAULT_SAMPLE_RATE};

/// Default port of the static HTTP responder.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default port of the streaming endpoint.
pub const DEFAULT_WS_PORT: u16 = 8000;

/// Default path of the streaming endpoint.
pub const DEFAULT_WS_PATH: &str = "/ws/audio";

/// Default length of each streamed waveform, in seconds.
pub const DEFAULT_CHUNK_SECS: f64 = 0.1;

/// Top-level configuration for `tonewire serve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Address both listeners bind to.
    pub host: IpAddr,
    /// Static HTTP responder.
    pub http: HttpConfig,
    /// Streaming endpoint.
    pub ws: WsConfig,
    /// Per-connection streaming behaviour.
    pub stream: StreamConfig,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            http: HttpConfig::default(),
            ws: WsConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl ServeConfig {
    /// Parse a configuration from a JSON file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Socket address of the HTTP responder.
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.http.port)
    }

    /// Socket address of the streaming endpoint.
    pub fn ws_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.ws.port)
    }
}

/// Static HTTP responder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Whether to start the responder.
    pub enabled: bool,
    /// Listening port. Zero picks a free port.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Streaming endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WsConfig {
    /// Whether to start the endpoint.
    pub enabled: bool,
    /// Listening port. Zero picks a free port.
    pub port: u16,
    /// Request path accepted during the handshake.
    pub path: String,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: DEFAULT_WS_PORT,
            path: DEFAULT_WS_PATH.to_string(),
        }
    }
}

/// Parameters of the per-connection delivery loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    /// Length of each generated waveform in seconds.
    pub duration_secs: f64,
    /// Sample rate of generated waveforms.
    pub sample_rate: u32,
    /// Frequency used when a request has no usable `frequency` field.
    pub default_frequency: f64,
    /// Hand each waveform to the local audio sink.
    pub playback: bool,
    /// Wait for the waveform's duration before reading the next request.
    pub pace: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_CHUNK_SECS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            default_frequency: DEFAULT_FREQUENCY,
            playback: false,
            pace: false,
        }
    }
}

impl StreamConfig {
    /// Delay applied between requests when pacing is on.
    pub fn pace_interval(&self) -> Duration {
        if self.duration_secs.is_finite() && self.duration_secs > 0.0 {
            Duration::from_secs_f64(self.duration_secs)
        } else {
            Duration::ZERO
        }
    }
}
