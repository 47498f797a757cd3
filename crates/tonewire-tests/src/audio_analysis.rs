//! Signal metrics for checking generated waveforms.
//!
//! All functions take samples as `f64` in the generator's native range and
//! return 0 for empty input.

/// Root mean square of the samples.
///
/// # Example
///
/// ```rust
/// use tonewire_tests::audio_analysis::calculate_rms;
///
/// assert_eq!(calculate_rms(&[0.0; 100]), 0.0);
/// assert_eq!(calculate_rms(&[0.5; 100]), 0.5);
/// ```
pub fn calculate_rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_of_squares: f64 = samples.iter().map(|&s| s * s).sum();
    (sum_of_squares / samples.len() as f64).sqrt()
}

/// Maximum absolute sample value.
pub fn peak_amplitude(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0, f64::max)
}

/// Number of sign changes between adjacent samples.
///
/// Samples that are exactly zero count as non-negative, so a sine starting
/// at 0 does not register a crossing on its first sample.
pub fn zero_crossings(samples: &[f64]) -> usize {
    samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count()
}

/// Frequency estimate from the zero-crossing count.
///
/// A sine crosses zero twice per cycle.
pub fn estimate_frequency(samples: &[f64], sample_rate: u32) -> f64 {
    if samples.len() < 2 || sample_rate == 0 {
        return 0.0;
    }
    let seconds = samples.len() as f64 / sample_rate as f64;
    zero_crossings(samples) as f64 / 2.0 / seconds
}

/// Decodes signed 16-bit samples into `[-1.0, 1.0]`.
pub fn pcm16_to_f64(samples: &[i16]) -> Vec<f64> {
    samples.iter().map(|&s| s as f64 / 32767.0).collect()
}
