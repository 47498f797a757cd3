//! Validated full-scale tone rendering.
//!
//! Unlike [`crate::generate`], rendering checks its parameters, uses the full
//! 16-bit range and fades both ends so the tone starts and stops without a
//! click.

use crate::error::{SynthError, SynthResult};
use crate::fade::{apply_linear_fade, fade_samples, DEFAULT_FADE_SECS};
use crate::waveform::{generate_with_amplitude, Waveform, WaveformRequest};

/// Default render length in seconds.
pub const DEFAULT_RENDER_SECS: f64 = 3.0;

/// Peak amplitude of rendered tones.
pub const FULL_SCALE: f64 = 1.0;

/// Checks that a request can be rendered: a non-zero sample rate, a positive
/// finite duration and a frequency in `(0, sample_rate / 2]`.
pub fn validate(request: &WaveformRequest) -> SynthResult<()> {
    if request.sample_rate == 0 {
        return Err(SynthError::InvalidSampleRate {
            rate: request.sample_rate,
        });
    }
    let nyquist = request.sample_rate as f64 / 2.0;
    if !(request.frequency > 0.0 && request.frequency <= nyquist) {
        return Err(SynthError::InvalidFrequency {
            freq: request.frequency,
            nyquist,
        });
    }
    if !(request.duration.is_finite() && request.duration > 0.0) {
        return Err(SynthError::InvalidDuration {
            duration: request.duration,
        });
    }
    Ok(())
}

/// Renders a full-scale tone with a 10 ms linear fade at each end.
pub fn render_tone(request: &WaveformRequest) -> SynthResult<Waveform> {
    validate(request)?;

    let mut samples = generate_with_amplitude(request, FULL_SCALE).into_samples();
    let fade = fade_samples(DEFAULT_FADE_SECS, request.sample_rate);
    apply_linear_fade(&mut samples, fade);

    Ok(Waveform::from_samples(samples, request.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_length_and_edges() {
        let wave = render_tone(&WaveformRequest::new(440.0, 3.0, 44100)).unwrap();
        assert_eq!(wave.len(), 132300);
        assert_eq!(wave.samples()[0], 0.0);
        assert_eq!(*wave.samples().last().unwrap(), 0.0);
    }

    #[test]
    fn test_render_reaches_full_scale() {
        let wave = render_tone(&WaveformRequest::new(441.0, 1.0, 44100)).unwrap();
        let peak = wave.samples().iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
        assert!(peak > 0.999, "peak was {}", peak);
        assert!(peak <= 1.0);
    }

    #[test]
    fn test_rejects_frequency_above_nyquist() {
        let err = render_tone(&WaveformRequest::new(22051.0, 1.0, 44100)).unwrap_err();
        assert!(matches!(err, SynthError::InvalidFrequency { .. }));
        assert!(render_tone(&WaveformRequest::new(22050.0, 1.0, 44100)).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_frequency() {
        for freq in [0.0, -1.0, f64::NAN] {
            let err = validate(&WaveformRequest::new(freq, 1.0, 44100)).unwrap_err();
            assert_eq!(err.code(), "SYNTH_001");
        }
    }

    #[test]
    fn test_rejects_bad_duration() {
        for duration in [0.0, -2.0, f64::INFINITY] {
            let err = validate(&WaveformRequest::new(440.0, duration, 44100)).unwrap_err();
            assert_eq!(err.code(), "SYNTH_002");
        }
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let err = validate(&WaveformRequest::new(440.0, 1.0, 0)).unwrap_err();
        assert_eq!(err.code(), "SYNTH_003");
    }
}
