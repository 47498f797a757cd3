//! Render command: a full-scale, faded tone as raw PCM or WAV.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use tonewire_synth::band::hearing_warning;
use tonewire_synth::render::render_tone;
use tonewire_synth::wav::EncodedAudio;
use tonewire_synth::WaveformRequest;

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    /// Signed 16-bit little-endian mono PCM with no header.
    Raw,
    /// RIFF/WAVE file.
    Wav,
}

impl std::str::FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(RenderFormat::Raw),
            "wav" => Ok(RenderFormat::Wav),
            other => Err(format!("unknown format '{}': expected raw or wav", other)),
        }
    }
}

/// Run the render command.
///
/// # Arguments
/// * `request` - Tone to render; validated before anything is written
/// * `format` - Output container
/// * `out` - Output path (default: stdout)
///
/// # Returns
/// Exit code: 0 on success
pub fn run(request: &WaveformRequest, format: RenderFormat, out: Option<&str>) -> Result<ExitCode> {
    let waveform = render_tone(request)?;
    let encoded = EncodedAudio::from_waveform(&waveform);

    match out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to create file: {}", path))?;
            let mut writer = BufWriter::new(file);
            write_encoded(&mut writer, &encoded, format)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_encoded(&mut writer, &encoded, format).context("Failed to write to stdout")?;
        }
    }

    eprintln!(
        "{} {} Hz for {} s, {} samples, pcm {}",
        "Rendered".green().bold(),
        request.frequency,
        request.duration,
        encoded.num_samples,
        encoded.pcm_hash.dimmed()
    );
    if let Some(warning) = hearing_warning(request.frequency) {
        eprintln!("  {} {}", "!".yellow(), warning.yellow());
    }

    Ok(ExitCode::SUCCESS)
}

/// Writes `encoded` to `writer` in `format` and flushes.
pub fn write_encoded<W: Write>(
    writer: &mut W,
    encoded: &EncodedAudio,
    format: RenderFormat,
) -> io::Result<()> {
    match format {
        RenderFormat::Raw => encoded.write_raw(writer)?,
        RenderFormat::Wav => encoded.write_wav(writer)?,
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonewire_synth::SynthError;

    #[test]
    fn test_format_parse() {
        assert_eq!("raw".parse::<RenderFormat>().unwrap(), RenderFormat::Raw);
        assert_eq!("wav".parse::<RenderFormat>().unwrap(), RenderFormat::Wav);
        assert!("mp3".parse::<RenderFormat>().is_err());
    }

    #[test]
    fn test_render_raw_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("tone.pcm");
        let request = WaveformRequest::new(1000.0, 0.5, 44100);

        run(&request, RenderFormat::Raw, Some(out.to_str().unwrap())).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(bytes.len(), 22050 * 2);
        // Faded in from silence.
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 0);
    }

    #[test]
    fn test_render_wav_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("tone.wav");
        let request = WaveformRequest::new(440.0, 1.0, 22050);

        run(&request, RenderFormat::Wav, Some(out.to_str().unwrap())).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(bytes.len(), 44 + 22050 * 2);
    }

    #[test]
    fn test_render_rejects_invalid_frequency() {
        let request = WaveformRequest::new(30000.0, 1.0, 44100);
        let err = run(&request, RenderFormat::Raw, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SynthError>(),
            Some(SynthError::InvalidFrequency { .. })
        ));
    }
}
