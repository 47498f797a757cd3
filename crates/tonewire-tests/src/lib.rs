//! tonewire end-to-end test infrastructure
//!
//! This crate drives the real server over TCP sockets and checks the
//! generated audio:
//!
//! - Streaming: WebSocket requests and waveform replies
//! - Static HTTP: the hello-world responder
//! - Audio: signal metrics over generated and written samples
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tonewire-tests
//! ```

pub mod audio_analysis;
pub mod harness;

pub use harness::{TestServer, WsClient};
