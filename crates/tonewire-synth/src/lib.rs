//! tonewire synthesis backend
//!
//! This crate produces the audio that the rest of tonewire serves, plays and
//! renders.
//!
//! # Overview
//!
//! - **Waveform generation** - A pure sine generator that maps
//!   (frequency, duration, sample rate) to a sequence of amplitude samples.
//! - **Fades** - Linear fade-in/out envelopes that remove clicks at the
//!   start and end of a rendered tone.
//! - **Bands** - Classification of a frequency into the usual listening
//!   ranges, with hearing warnings.
//! - **Rendering** - Validated full-scale tones with fades, for offline output.
//! - **WAV** - 16-bit PCM conversion, WAV writing and PCM hashing.
//!
//! # Determinism
//!
//! Generation is pure. The same request always yields the same samples, and
//! therefore the same PCM bytes and the same BLAKE3 PCM hash.
//!
//! # Example
//!
//! ```
//! use tonewire_synth::{generate, WaveformRequest};
//!
//! let waveform = generate(&WaveformRequest::new(440.0, 1.0, 44100));
//! assert_eq!(waveform.len(), 44100);
//! assert_eq!(waveform.samples()[0], 0.0);
//! ```

pub mod band;
pub mod error;
pub mod fade;
pub mod render;
pub mod waveform;
pub mod wav;

pub use band::FrequencyBand;
pub use error::{SynthError, SynthResult};
pub use render::render_tone;
pub use waveform::{
    generate, generate_sine, Waveform, WaveformRequest, DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY,
    DEFAULT_SAMPLE_RATE,
};
