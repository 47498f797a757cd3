//! Listening-range classification of frequencies.

/// Frequencies above this level may cause discomfort.
pub const DISCOMFORT_THRESHOLD_HZ: f64 = 15000.0;

/// Lower edge of human hearing.
pub const AUDIBLE_MIN_HZ: f64 = 20.0;

/// Upper edge of human hearing.
pub const AUDIBLE_MAX_HZ: f64 = 20000.0;

/// Named frequency range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyBand {
    /// Below 20 Hz.
    Infrasonic,
    /// 20 Hz - 60 Hz.
    SubBass,
    /// 60 Hz - 250 Hz.
    Bass,
    /// 250 Hz - 500 Hz.
    LowMidrange,
    /// 500 Hz - 2 kHz.
    Midrange,
    /// 2 kHz - 4 kHz.
    UpperMidrange,
    /// 4 kHz - 20 kHz.
    Treble,
    /// Above 20 kHz.
    Ultrasonic,
}

impl FrequencyBand {
    /// Classifies `freq` (Hz). Each band includes its lower edge.
    pub fn classify(freq: f64) -> Self {
        match freq {
            f if f < AUDIBLE_MIN_HZ => FrequencyBand::Infrasonic,
            f if f < 60.0 => FrequencyBand::SubBass,
            f if f < 250.0 => FrequencyBand::Bass,
            f if f < 500.0 => FrequencyBand::LowMidrange,
            f if f < 2000.0 => FrequencyBand::Midrange,
            f if f < 4000.0 => FrequencyBand::UpperMidrange,
            f if f <= AUDIBLE_MAX_HZ => FrequencyBand::Treble,
            _ => FrequencyBand::Ultrasonic,
        }
    }

    /// Human-readable band name.
    pub fn label(&self) -> &'static str {
        match self {
            FrequencyBand::Infrasonic => "Infrasonic",
            FrequencyBand::SubBass => "Sub-bass",
            FrequencyBand::Bass => "Bass",
            FrequencyBand::LowMidrange => "Low midrange",
            FrequencyBand::Midrange => "Midrange",
            FrequencyBand::UpperMidrange => "Upper midrange",
            FrequencyBand::Treble => "Treble",
            FrequencyBand::Ultrasonic => "Ultrasonic",
        }
    }
}

/// Returns a listening warning for `freq`, if any.
pub fn hearing_warning(freq: f64) -> Option<&'static str> {
    if freq < AUDIBLE_MIN_HZ {
        Some("Very low frequencies may not be audible")
    } else if freq > DISCOMFORT_THRESHOLD_HZ {
        Some("High frequencies may cause discomfort")
    } else {
        None
    }
}
