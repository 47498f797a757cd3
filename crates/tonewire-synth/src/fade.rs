//! Linear fade envelopes.

/// Default fade length in seconds (10 ms).
pub const DEFAULT_FADE_SECS: f64 = 0.01;

/// Number of fade samples for a fade of `seconds` at `sample_rate`.
pub fn fade_samples(seconds: f64, sample_rate: u32) -> usize {
    let n = seconds * sample_rate as f64;
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Applies a linear fade-in over the first `fade` samples and a linear
/// fade-out over the last `fade` samples, in place.
///
/// Fade-in gain is `i / fade`; fade-out gain is `(n - i - 1) / fade`, so the
/// last sample is always silent. When the buffer is shorter than two fades
/// the fade-out wins where the two overlap.
pub fn apply_linear_fade(samples: &mut [f64], fade: usize) {
    if fade == 0 {
        return;
    }
    let n = samples.len();
    let fade_f = fade as f64;

    for (i, sample) in samples.iter_mut().enumerate() {
        let gain = if i + fade >= n {
            (n - i - 1) as f64 / fade_f
        } else if i < fade {
            i as f64 / fade_f
        } else {
            continue;
        };
        *sample *= gain;
    }
}
