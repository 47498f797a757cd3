//! Standalone tone command.
//!
//! Generates one half-scale sine waveform, plays it on the default output
//! device and waits for it to finish. `--out` also writes it as a WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use tonewire_synth::band::hearing_warning;
use tonewire_synth::wav::EncodedAudio;
use tonewire_synth::{generate, FrequencyBand, WaveformRequest};

use crate::playback::{self, AudioSink};

/// Default tone length in seconds.
pub const DEFAULT_TONE_SECS: f64 = 2.0;

/// Options for the tone command.
#[derive(Debug, Clone)]
pub struct ToneOptions {
    pub frequency: f64,
    pub duration: f64,
    pub sample_rate: u32,
    /// Write a WAV file here.
    pub out: Option<String>,
    /// Play on the default output device.
    pub play: bool,
}

/// Run the tone command against the default output device.
pub fn run(options: &ToneOptions) -> Result<ExitCode> {
    let sink = if options.play {
        Some(playback::default_sink().context("Cannot play tone")?)
    } else {
        None
    };
    run_with_sink(options, sink)
}

/// Run the tone command with an explicit sink.
///
/// # Returns
/// Exit code: 0 on success
pub fn run_with_sink(options: &ToneOptions, sink: Option<Arc<dyn AudioSink>>) -> Result<ExitCode> {
    if options.out.is_none() && sink.is_none() {
        anyhow::bail!("Nothing to do: playback is off and no --out file was given");
    }

    let request = WaveformRequest::new(options.frequency, options.duration, options.sample_rate);
    let waveform = generate(&request);

    print_summary(&request, waveform.len());

    if let Some(out) = &options.out {
        let encoded = EncodedAudio::from_waveform(&waveform);
        let path = Path::new(out);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, encoded.to_wav())
            .with_context(|| format!("Failed to write WAV file: {}", path.display()))?;
        eprintln!("  {} wrote {}", "->".green(), path.display());
        eprintln!("  {} pcm {}", "->".green(), encoded.pcm_hash.dimmed());
    }

    if let Some(sink) = sink {
        eprintln!("  {} playing on {} output", "->".green(), sink.name());
        sink.play(&waveform)
            .and_then(|handle| handle.wait())
            .context("Playback failed")?;
    }

    Ok(ExitCode::SUCCESS)
}

fn print_summary(request: &WaveformRequest, num_samples: usize) {
    let band = FrequencyBand::classify(request.frequency);
    eprintln!(
        "{} {} Hz ({}), {} s at {} Hz, {} samples",
        "Tone".cyan().bold(),
        request.frequency,
        band.label(),
        request.duration,
        request.sample_rate,
        num_samples
    );
    if let Some(warning) = hearing_warning(request.frequency) {
        eprintln!("  {} {}", "!".yellow(), warning.yellow());
    }
}
