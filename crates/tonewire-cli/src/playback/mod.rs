//! Local audio output.
//!
//! The streaming loop and the `tone` command render audio through the
//! [`AudioSink`] trait so that the device can be swapped out, disabled or
//! recorded in tests. A real device is available when the crate is built
//! with the `playback` feature.

#[cfg(feature = "playback")]
mod cpal_sink;
#[cfg_attr(not(feature = "playback"), allow(dead_code))]
mod worker;

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use thiserror::Error;
use tonewire_synth::Waveform;

#[cfg(feature = "playback")]
pub use cpal_sink::CpalSink;

/// Errors raised while starting playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No default output device.
    #[error("no audio output device available")]
    NoDevice,

    /// The device rejected the requested format.
    #[error("unsupported output configuration: {0}")]
    Unsupported(String),

    /// The output stream could not be built or started.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// The playback thread could not be spawned.
    #[error("failed to spawn playback thread: {0}")]
    Thread(#[from] std::io::Error),

    /// The playback thread exited before reporting a result.
    #[error("playback worker stopped")]
    WorkerStopped,

    /// Too many waveforms are queued for playback.
    #[error("playback queue is full")]
    Busy,

    /// The binary was built without an audio backend.
    #[error(
        "built without audio playback support (rebuild with `--features playback`, \
         or write the tone with `--out <FILE> --no-play`)"
    )]
    NotCompiled,
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Something that can render a waveform audibly.
///
/// `play` starts rendering and returns without waiting; the returned handle
/// can be used to wait for the waveform to finish.
pub trait AudioSink: Send + Sync {
    /// Starts rendering `waveform`.
    fn play(&self, waveform: &Waveform) -> Result<PlaybackHandle, PlaybackError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Tracks one in-flight playback.
///
/// The playback worker reports how the waveform ended through the handle;
/// [`wait`](Self::wait) returns that outcome. A waveform cut short by a newer
/// one counts as finished.
#[derive(Debug)]
pub struct PlaybackHandle {
    outcome: Outcome,
}

#[derive(Debug)]
enum Outcome {
    Ready(PlaybackResult<()>),
    Pending(Receiver<PlaybackResult<()>>),
}

impl PlaybackHandle {
    /// A handle for playback that has already completed.
    pub fn finished() -> Self {
        Self::resolved(Ok(()))
    }

    /// A handle that already carries its outcome.
    pub fn resolved(result: PlaybackResult<()>) -> Self {
        Self {
            outcome: Outcome::Ready(result),
        }
    }

    /// A handle completed by whoever holds the sending half of `done`.
    pub fn pending(done: Receiver<PlaybackResult<()>>) -> Self {
        Self {
            outcome: Outcome::Pending(done),
        }
    }

    /// Blocks until playback completes and returns how it ended.
    pub fn wait(self) -> PlaybackResult<()> {
        match self.outcome {
            Outcome::Ready(result) => result,
            Outcome::Pending(done) => done.recv().unwrap_or(Err(PlaybackError::WorkerStopped)),
        }
    }
}

/// A sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, _waveform: &Waveform) -> Result<PlaybackHandle, PlaybackError> {
        Ok(PlaybackHandle::finished())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Opens the default output device.
#[cfg(feature = "playback")]
pub fn default_sink() -> Result<Arc<dyn AudioSink>, PlaybackError> {
    let sink = CpalSink::default_output()?;
    log::debug!("Output device: {}", sink.device_name());
    Ok(Arc::new(sink))
}

/// Opens the default output device.
#[cfg(not(feature = "playback"))]
pub fn default_sink() -> Result<Arc<dyn AudioSink>, PlaybackError> {
    Err(PlaybackError::NotCompiled)
}

/// Returns the device sink when `enabled`, falling back to [`NullSink`]
/// with a warning if no device can be opened.
pub fn sink_for(enabled: bool) -> Arc<dyn AudioSink> {
    if !enabled {
        return Arc::new(NullSink);
    }
    match default_sink() {
        Ok(sink) => {
            log::info!("Local playback enabled ({} sink)", sink.name());
            sink
        }
        Err(e) => {
            log::warn!("Local playback disabled: {}", e);
            Arc::new(NullSink)
        }
    }
}
