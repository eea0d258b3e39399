use crate::{
    error::Result,
    format::{SampleFormat, MATRIX_DEFAULT},
    morse::{scale, Note, SampleSet},
};

/// Base frequency of A used when none is given.
pub const DEFAULT_BASE: f64 = 440.0;

/// Unit length used when a unit of 0 ms is requested.
pub const FALLBACK_UNIT_MILLIS: u32 = 10;

pub const MAX_VOLUME: u32 = 100;

/// Settings of the morse player.
#[derive(Clone, Debug, PartialEq)]
pub struct MorseConfig {
    /// Samples per second per channel.
    pub rate: u32,
    pub channels: u16,
    pub matrix: String,
    /// Audio driver short name, empty for the system default.
    pub driver: String,
    pub note: String,
    /// Frequency of A in Hz.
    pub base: f64,
    /// Length of a dot in milliseconds.
    pub unit: u32,
    /// 0..=100
    pub volume: u32,
}

impl Default for MorseConfig {
    fn default() -> Self {
        MorseConfig {
            rate: 8000,
            channels: 2,
            matrix: MATRIX_DEFAULT.to_string(),
            driver: String::new(),
            note: "F#".to_string(),
            base: DEFAULT_BASE,
            unit: 50,
            volume: 100,
        }
    }
}

impl MorseConfig {
    /// Replaces out of range values with usable ones and normalizes the note name.
    ///
    /// Fails if the note is not one of the 12 note names.
    pub fn sanitize(mut self) -> Result<Self> {
        if self.base == 0.0 {
            self.base = DEFAULT_BASE;
        }
        if self.unit == 0 {
            self.unit = FALLBACK_UNIT_MILLIS;
        }
        if self.volume > MAX_VOLUME {
            self.volume = MAX_VOLUME;
        }
        self.note = self.note.parse::<Note>()?.name().to_string();

        Ok(self)
    }

    pub fn frequency(&self) -> f64 {
        scale(self.base, &self.note)
    }

    pub fn sample_format(&self) -> SampleFormat {
        SampleFormat::new(self.rate, self.channels).with_matrix(&self.matrix)
    }

    pub fn sample_set(&self) -> SampleSet {
        SampleSet::new(
            self.rate,
            self.channels,
            self.unit,
            self.volume,
            self.frequency(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults_are_sane() {
        let config = MorseConfig::default().sanitize().unwrap();
        assert_eq!(config, MorseConfig::default());
        assert!((config.frequency() - 369.99).abs() < 1e-2);
        assert!(config.sample_format().validate().is_ok());
    }

    #[test]
    fn zero_values_fall_back() {
        let config = MorseConfig {
            base: 0.0,
            unit: 0,
            volume: 250,
            ..Default::default()
        }
        .sanitize()
        .unwrap();
        assert_eq!(config.base, DEFAULT_BASE);
        assert_eq!(config.unit, FALLBACK_UNIT_MILLIS);
        assert_eq!(config.volume, MAX_VOLUME);
    }

    #[test]
    fn note_is_upper_cased() {
        let config = MorseConfig {
            note: "a#".to_string(),
            ..Default::default()
        }
        .sanitize()
        .unwrap();
        assert_eq!(config.note, "A#");
        assert!((config.frequency() - 466.16).abs() < 1e-2);
    }

    #[test]
    fn unknown_note_is_an_error() {
        let result = MorseConfig {
            note: "H".to_string(),
            ..Default::default()
        }
        .sanitize();
        assert!(matches!(result, Err(Error::UnknownNote(_))));
    }

    #[test]
    fn sample_set_uses_unit() {
        let set = MorseConfig::default().sample_set();
        // 8000 Hz * 50 ms * 2 channels.
        assert_eq!(set.dot.len(), 800);
    }
}
