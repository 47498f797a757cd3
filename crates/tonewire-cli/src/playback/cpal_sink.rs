//! Default-device output through cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SupportedStreamConfigRange};
use tonewire_synth::Waveform;

use super::worker::{OutputDevice, PlaybackWorker};
use super::{AudioSink, PlaybackError, PlaybackHandle, PlaybackResult};

/// Plays waveforms on the host's default output device.
///
/// cpal streams are not `Send` on every backend, so the device and its
/// stream live on one playback thread for the sink's lifetime. A new
/// waveform replaces the one currently playing.
#[derive(Debug)]
pub struct CpalSink {
    device_name: String,
    worker: PlaybackWorker,
}

impl CpalSink {
    /// Opens the default output device on a playback thread.
    pub fn default_output() -> PlaybackResult<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or(PlaybackError::NoDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let worker = PlaybackWorker::spawn("tonewire-playback", CpalDevice::open_default)?;
        Ok(Self {
            device_name,
            worker,
        })
    }

    /// Name of the output device found at construction.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl AudioSink for CpalSink {
    fn play(&self, waveform: &Waveform) -> PlaybackResult<PlaybackHandle> {
        self.worker.submit(waveform)
    }

    fn name(&self) -> &'static str {
        "cpal"
    }
}

struct CpalDevice {
    device: cpal::Device,
    configs: Vec<SupportedStreamConfigRange>,
}

impl CpalDevice {
    fn open_default() -> PlaybackResult<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or(PlaybackError::NoDevice)?;
        let configs = device
            .supported_output_configs()
            .map_err(|e| PlaybackError::Unsupported(e.to_string()))?
            .collect();
        Ok(Self { device, configs })
    }

    /// Picks an f32 configuration that accepts `sample_rate`.
    fn config_for(&self, sample_rate: u32) -> PlaybackResult<cpal::StreamConfig> {
        let rate = cpal::SampleRate(sample_rate);
        self.configs
            .iter()
            .filter(|range| range.sample_format() == SampleFormat::F32)
            .find(|range| range.min_sample_rate() <= rate && rate <= range.max_sample_rate())
            .map(|range| range.clone().with_sample_rate(rate).config())
            .ok_or_else(|| {
                PlaybackError::Unsupported(format!(
                    "device has no f32 output at {} Hz",
                    sample_rate
                ))
            })
    }
}

impl OutputDevice for CpalDevice {
    type Stream = cpal::Stream;

    fn start(&mut self, samples: Vec<f32>, sample_rate: u32) -> PlaybackResult<cpal::Stream> {
        let config = self.config_for(sample_rate)?;
        let channels = config.channels as usize;
        let mut position = 0usize;

        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // Mono source duplicated across every device channel.
                    for frame in data.chunks_mut(channels) {
                        let value = samples.get(position).copied().unwrap_or(0.0);
                        position = position.saturating_add(1);
                        frame.fill(value);
                    }
                },
                |err| log::warn!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;
        Ok(stream)
    }
}
