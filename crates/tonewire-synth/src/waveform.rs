//! Sine waveform generation.
//!
//! The generator samples `amplitude * sin(2π·f·t)` at `n = floor(d·r)` evenly
//! spaced instants `t_i = i·d/n`, `i ∈ [0, n)`. Degenerate parameters
//! (non-positive or non-finite `d·r`) produce an empty waveform rather than
//! an error. Samples are always finite: when `2π·f·t` overflows, the phase is
//! taken from the fractional cycle count of `f·t`, and a sample whose phase
//! cannot be represented at all is 0.

use std::f64::consts::PI;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Frequency used when a request carries none (A4).
pub const DEFAULT_FREQUENCY: f64 = 440.0;

/// Peak amplitude of generated waveforms. Half scale leaves headroom.
pub const DEFAULT_AMPLITUDE: f64 = 0.5;

/// Parameters for a single waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformRequest {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Samples per second.
    pub sample_rate: u32,
}

impl WaveformRequest {
    /// Creates a request.
    pub fn new(frequency: f64, duration: f64, sample_rate: u32) -> Self {
        Self {
            frequency,
            duration,
            sample_rate,
        }
    }

    /// Number of samples this request produces: `floor(duration × sample_rate)`,
    /// or zero when that product is not a positive finite number.
    pub fn sample_count(&self) -> usize {
        let n = self.duration * self.sample_rate as f64;
        if n.is_finite() && n > 0.0 {
            n.floor() as usize
        } else {
            0
        }
    }
}

/// An immutable sequence of mono samples at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Waveform {
    /// Wraps already generated samples.
    pub fn from_samples(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// The samples, in time order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the waveform holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Consumes the waveform and returns its samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Generates a half-scale sine waveform for `request`.
pub fn generate(request: &WaveformRequest) -> Waveform {
    generate_with_amplitude(request, DEFAULT_AMPLITUDE)
}

/// Generates a sine waveform with the given peak amplitude.
pub fn generate_with_amplitude(request: &WaveformRequest, amplitude: f64) -> Waveform {
    let n = request.sample_count();
    let mut samples = Vec::with_capacity(n);

    if n > 0 {
        let step = request.duration / n as f64;
        for i in 0..n {
            let t = i as f64 * step;
            samples.push(amplitude * unit_sine(request.frequency, t));
        }
    }

    log::trace!(
        "generated {} samples of {} Hz at {} Hz",
        n,
        request.frequency,
        request.sample_rate
    );

    Waveform::from_samples(samples, request.sample_rate)
}

/// `sin(2π·frequency·t)`, finite for every input.
fn unit_sine(frequency: f64, t: f64) -> f64 {
    let phase = 2.0 * PI * frequency * t;
    if phase.is_finite() {
        return phase.sin();
    }
    let cycles = (frequency * t).fract();
    if cycles.is_finite() {
        (2.0 * PI * cycles).sin()
    } else {
        0.0
    }
}

/// Shorthand for [`generate`] with positional arguments.
pub fn generate_sine(frequency: f64, duration: f64, sample_rate: u32) -> Waveform {
    generate(&WaveformRequest::new(frequency, duration, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn zero_crossings(samples: &[f64]) -> usize {
        samples
            .windows(2)
            .filter(|w| (w[0] < 0.0 && w[1] >= 0.0) || (w[0] >= 0.0 && w[1] < 0.0))
            .count()
    }

    #[test]
    fn test_one_second_a4() {
        let wave = generate_sine(440.0, 1.0, 44100);
        assert_eq!(wave.len(), 44100);
        assert_eq!(wave.samples()[0], 0.0);
        assert_eq!(wave.sample_rate(), 44100);

        // 440 cycles cross zero twice each, minus the start at zero.
        let crossings = zero_crossings(wave.samples());
        assert!(
            (878..=880).contains(&crossings),
            "expected ~880 zero crossings, got {}",
            crossings
        );
    }

    #[test]
    fn test_streaming_chunk_length() {
        let wave = generate_sine(880.0, 0.1, 44100);
        assert_eq!(wave.len(), 4410);
    }

    #[test]
    fn test_length_rounds_down() {
        // 0.00001 s at 44100 Hz is 0.441 samples.
        assert_eq!(generate_sine(440.0, 0.00001, 44100).len(), 0);
        // 1.5 samples rounds to 1.
        assert_eq!(generate_sine(440.0, 1.5, 1).len(), 1);
        assert_eq!(generate_sine(440.0, 0.5, 3).len(), 1);
    }

    #[test]
    fn test_amplitude_bound() {
        for &freq in &[1.0, 27.5, 440.0, 1000.0, 12345.6, 22050.0, 100000.0] {
            let wave = generate_sine(freq, 0.05, 44100);
            for &s in wave.samples() {
                assert!((-0.5..=0.5).contains(&s), "{} Hz sample {} out of range", freq, s);
            }
        }
    }

    #[test]
    fn test_peak_reaches_half_scale() {
        let wave = generate_sine(441.0, 1.0, 44100);
        let peak = wave.samples().iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
        assert!((peak - 0.5).abs() < 1e-6, "peak was {}", peak);
    }

    #[test]
    fn test_pure() {
        let a = generate_sine(523.25, 0.25, 48000);
        let b = generate_sine(523.25, 0.25, 48000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_quarter_period_sample() {
        // f = r/4 puts sample 1 at a quarter period.
        let wave = generate_sine(11025.0, 1.0, 44100);
        assert!((wave.samples()[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_frequency_is_silence() {
        let wave = generate_sine(0.0, 0.1, 44100);
        assert_eq!(wave.len(), 4410);
        assert!(wave.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_negative_frequency_inverts() {
        let up = generate_sine(440.0, 0.01, 44100);
        let down = generate_sine(-440.0, 0.01, 44100);
        for (a, b) in up.samples().iter().zip(down.samples()) {
            assert!((a + b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degenerate_parameters_yield_empty() {
        assert!(generate_sine(440.0, 0.0, 44100).is_empty());
        assert!(generate_sine(440.0, -1.0, 44100).is_empty());
        assert!(generate_sine(440.0, 1.0, 0).is_empty());
        assert!(generate_sine(440.0, f64::NAN, 44100).is_empty());
        assert!(generate_sine(440.0, f64::INFINITY, 44100).is_empty());
    }

    #[test]
    fn test_duration_secs() {
        let wave = generate_sine(440.0, 0.1, 44100);
        assert!((wave.duration_secs() - 0.1).abs() < 1e-12);
        assert_eq!(Waveform::from_samples(vec![], 0).duration_secs(), 0.0);
    }

    #[test]
    fn test_custom_amplitude() {
        let request = WaveformRequest::new(11025.0, 1.0, 44100);
        let wave = generate_with_amplitude(&request, 1.0);
        assert!((wave.samples()[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_frequency_stays_finite() {
        // 2π·f overflows to infinity above ~2.86e307 Hz.
        for &freq in &[1e308, f64::MAX, -f64::MAX] {
            let wave = generate_sine(freq, 0.01, 44100);
            assert_eq!(wave.len(), 441);
            assert_eq!(wave.samples()[0], 0.0);
            for &s in wave.samples() {
                assert!(s.is_finite(), "{} Hz produced {}", freq, s);
                assert!((-0.5..=0.5).contains(&s));
            }
        }
    }

    #[test]
    fn test_non_finite_frequency_is_silence() {
        for &freq in &[f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let wave = generate_sine(freq, 0.01, 44100);
            assert!(wave.samples().iter().all(|&s| s == 0.0), "{} Hz", freq);
        }
    }

    #[test]
    fn test_large_in_range_frequency_matches_formula() {
        // Phase is finite here, so samples follow sin(2π·f·t) exactly.
        let freq = 1e300;
        let wave = generate_sine(freq, 0.001, 8000);
        for (i, &s) in wave.samples().iter().enumerate() {
            let t = i as f64 * (0.001 / 8.0);
            assert_eq!(s, 0.5 * (2.0 * PI * freq * t).sin());
        }
    }
}
