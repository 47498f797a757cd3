//! Request handling for the streaming endpoint.

use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;
use tonewire_synth::{generate, FrequencyBand, Waveform, WaveformRequest};

use crate::config::StreamConfig;

use super::types::{error_codes, ErrorResponse, FrequencyRequest, WaveformResponse};

/// What to send back for one inbound frame.
#[derive(Debug)]
pub enum Reply {
    /// A generated waveform and its serialized response.
    Waveform { text: String, waveform: Waveform },
    /// A serialized error response.
    Error(String),
}

impl Reply {
    /// The JSON text to send.
    pub fn text(&self) -> &str {
        match self {
            Reply::Waveform { text, .. } => text,
            Reply::Error(text) => text,
        }
    }

    /// Splits into the text to send and the waveform, if one was generated.
    pub fn into_parts(self) -> (String, Option<Waveform>) {
        match self {
            Reply::Waveform { text, waveform } => (text, Some(waveform)),
            Reply::Error(text) => (text, None),
        }
    }
}

/// Turns one inbound frame into a reply. Control frames produce none.
pub fn process_message(msg: Message, config: &StreamConfig) -> Option<Reply> {
    match msg {
        Message::Text(text) => Some(handle_request(&text, config)),
        Message::Binary(data) => match String::from_utf8(data) {
            Ok(text) => Some(handle_request(&text, config)),
            Err(_) => Some(Reply::Error(
                ErrorResponse::new(
                    error_codes::BINARY_NOT_UTF8,
                    "Binary message must be valid UTF-8 JSON",
                )
                .to_json(),
            )),
        },
        // Ping/pong are answered by tungstenite; close is handled by the session.
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}

/// Parses a JSON request, generates the waveform and serializes the reply.
pub fn handle_request(json_text: &str, config: &StreamConfig) -> Reply {
    let value: Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(e) => {
            return Reply::Error(
                ErrorResponse::new(error_codes::INVALID_JSON, format!("Invalid request JSON: {}", e))
                    .to_json(),
            );
        }
    };

    if !value.is_object() {
        return Reply::Error(
            ErrorResponse::new(error_codes::NOT_AN_OBJECT, "Request must be a JSON object")
                .to_json(),
        );
    }

    // An object always fits FrequencyRequest; every field is optional.
    let request: FrequencyRequest = serde_json::from_value(value).unwrap_or_default();
    let frequency = request.frequency_or(config.default_frequency);

    log::debug!(
        "Generating {} Hz ({}) for {} s",
        frequency,
        FrequencyBand::classify(frequency).label(),
        config.duration_secs
    );

    let waveform = generate(&WaveformRequest::new(
        frequency,
        config.duration_secs,
        config.sample_rate,
    ));

    match serde_json::to_string(&WaveformResponse {
        waveform: waveform.samples(),
    }) {
        Ok(text) => Reply::Waveform { text, waveform },
        Err(e) => Reply::Error(
            ErrorResponse::new(
                error_codes::JSON_SERIALIZE,
                format!("Failed to serialize response: {}", e),
            )
            .to_json(),
        ),
    }
}
