//! Encoded waveform.

use std::io::{self, Write};

use crate::waveform::Waveform;

use super::format::WavFormat;
use super::pcm::pcm_hash;
use super::writer::{samples_to_pcm16, write_wav, write_wav_to_vec};

/// A waveform encoded as 16-bit mono PCM.
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    /// Little-endian signed 16-bit samples.
    pub pcm_data: Vec<u8>,
    /// BLAKE3 hash of `pcm_data`.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl EncodedAudio {
    /// Encodes a waveform.
    pub fn from_waveform(waveform: &Waveform) -> Self {
        let pcm_data = samples_to_pcm16(waveform.samples());
        let pcm_hash = pcm_hash(&pcm_data);
        Self {
            pcm_data,
            pcm_hash,
            sample_rate: waveform.sample_rate(),
            num_samples: waveform.len(),
        }
    }

    /// WAV format of this encoding.
    pub fn format(&self) -> WavFormat {
        WavFormat::mono(self.sample_rate)
    }

    /// Complete WAV file bytes.
    pub fn to_wav(&self) -> Vec<u8> {
        write_wav_to_vec(&self.format(), &self.pcm_data)
    }

    /// Writes a complete WAV file to `writer`.
    pub fn write_wav<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_wav(writer, &self.format(), &self.pcm_data)
    }

    /// Writes the bare PCM payload to `writer`.
    pub fn write_raw<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.pcm_data)
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples as f64 / self.sample_rate as f64
    }
}
