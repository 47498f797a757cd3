//! Property-based tests for the waveform generator using proptest.
//!
//! These tests check the generator's invariants over arbitrary inputs,
//! including degenerate ones that must never panic.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tonewire-tests --test proptest_waveform
//! ```

use proptest::prelude::*;

use tonewire_synth::render::{render_tone, validate};
use tonewire_synth::wav::EncodedAudio;
use tonewire_synth::{generate, FrequencyBand, WaveformRequest};

// ============================================================================
// 1. Generator invariants
// ============================================================================

fn audible_frequency() -> impl Strategy<Value = f64> {
    0.0f64..22050.0
}

fn short_duration() -> impl Strategy<Value = f64> {
    0.0001f64..0.5
}

fn sample_rate() -> impl Strategy<Value = u32> {
    prop_oneof![Just(8000u32), Just(22050), Just(44100), Just(48000), 1000u32..96000]
}

proptest! {
    /// Length is always floor(duration × sample_rate).
    #[test]
    fn length_is_floor_of_duration_times_rate(
        f in audible_frequency(),
        d in short_duration(),
        r in sample_rate(),
    ) {
        let waveform = generate(&WaveformRequest::new(f, d, r));
        let expected = (d * r as f64).floor() as usize;
        prop_assert_eq!(waveform.len(), expected);
        prop_assert_eq!(waveform.sample_rate(), r);
    }

    /// Every sample stays within half scale, for any frequency sign.
    #[test]
    fn samples_stay_within_half_scale(
        f in -30000.0f64..30000.0,
        d in short_duration(),
        r in sample_rate(),
    ) {
        let waveform = generate(&WaveformRequest::new(f, d, r));
        for &s in waveform.samples() {
            prop_assert!((-0.5..=0.5).contains(&s), "sample {} out of range", s);
        }
    }

    /// Samples are finite and bounded for any finite frequency, however large.
    #[test]
    fn samples_are_finite_for_any_frequency(
        f in proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
        d in 0.0001f64..0.05,
        r in sample_rate(),
    ) {
        let waveform = generate(&WaveformRequest::new(f, d, r));
        for &s in waveform.samples() {
            prop_assert!(s.is_finite(), "{} Hz produced {}", f, s);
            prop_assert!((-0.5..=0.5).contains(&s), "sample {} out of range", s);
        }
    }

    /// Identical requests give identical samples.
    #[test]
    fn generation_is_deterministic(
        f in audible_frequency(),
        d in short_duration(),
        r in sample_rate(),
    ) {
        let request = WaveformRequest::new(f, d, r);
        prop_assert_eq!(generate(&request), generate(&request));
    }

    /// The first sample of a non-empty waveform is always zero.
    #[test]
    fn first_sample_is_zero(
        f in audible_frequency(),
        d in short_duration(),
        r in sample_rate(),
    ) {
        let waveform = generate(&WaveformRequest::new(f, d, r));
        if let Some(&first) = waveform.samples().first() {
            prop_assert_eq!(first, 0.0);
        }
    }

    /// Negative frequencies mirror positive ones.
    #[test]
    fn negative_frequency_inverts(
        f in 1.0f64..10000.0,
        d in short_duration(),
    ) {
        let up = generate(&WaveformRequest::new(f, d, 44100));
        let down = generate(&WaveformRequest::new(-f, d, 44100));
        for (a, b) in up.samples().iter().zip(down.samples()) {
            prop_assert!((a + b).abs() < 1e-12);
        }
    }

    /// Non-positive or non-finite durations yield an empty waveform.
    #[test]
    fn degenerate_durations_are_empty(
        f in audible_frequency(),
        d in prop_oneof![
            -10.0f64..=0.0,
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
        ],
        r in sample_rate(),
    ) {
        prop_assert!(generate(&WaveformRequest::new(f, d, r)).is_empty());
    }

    /// Any frequency classifies into some band without panicking.
    #[test]
    fn band_classification_never_panics(f in proptest::num::f64::ANY) {
        let _ = FrequencyBand::classify(f).label();
    }
}

// ============================================================================
// 2. Rendering
// ============================================================================

proptest! {
    /// Rendering accepts exactly the frequencies in (0, nyquist].
    #[test]
    fn render_validation_matches_nyquist(
        f in -1000.0f64..30000.0,
        r in sample_rate(),
    ) {
        let request = WaveformRequest::new(f, 0.05, r);
        let valid = f > 0.0 && f <= r as f64 / 2.0;
        prop_assert_eq!(validate(&request).is_ok(), valid);
    }

    /// Rendered tones start and end silent and never exceed full scale.
    #[test]
    fn rendered_tones_fade_at_both_ends(
        f in 20.0f64..4000.0,
        d in 0.05f64..0.5,
    ) {
        let waveform = render_tone(&WaveformRequest::new(f, d, 8000)).unwrap();
        let samples = waveform.samples();
        prop_assert_eq!(samples[0], 0.0);
        prop_assert_eq!(samples[samples.len() - 1], 0.0);
        for &s in samples {
            prop_assert!(s.abs() <= 1.0);
        }
    }

    /// PCM encoding keeps one 16-bit sample per input sample.
    #[test]
    fn pcm_has_two_bytes_per_sample(
        f in audible_frequency(),
        d in short_duration(),
    ) {
        let waveform = generate(&WaveformRequest::new(f, d, 44100));
        let encoded = EncodedAudio::from_waveform(&waveform);
        prop_assert_eq!(encoded.pcm_data.len(), waveform.len() * 2);
        prop_assert_eq!(encoded.num_samples, waveform.len());
    }
}
