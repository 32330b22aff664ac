//! Analyzer options.

use crate::analysis::{PitchAlgorithm, PitchDetector};
use crate::{Error, Result};

/// Analysis configuration.
///
/// Every field can be set independently; [`AnalysisOptions::validate`] checks
/// them together before an [`Analyzer`](crate::Analyzer) accepts them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AnalysisOptions {
    /// Analysis window in samples (power of two).
    pub fft_size: usize,
    /// Spectrum smoothing for realtime sessions (0.0 - 1.0). Batch analysis ignores it.
    pub smoothing: f32,
    /// Lowest detectable pitch (Hz).
    pub min_frequency: f32,
    /// Highest detectable pitch (Hz).
    pub max_frequency: f32,
    /// YIN absolute threshold, strictly inside (0, 1).
    pub threshold: f32,
    pub min_bpm: f32,
    pub max_bpm: f32,
    /// Run tempo and chord detection in [`Analyzer::analyze`](crate::Analyzer::analyze).
    pub enable_advanced: bool,
    pub pitch_algorithm: PitchAlgorithm,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing: 0.8,
            min_frequency: 50.0,
            max_frequency: 5000.0,
            threshold: 0.1,
            min_bpm: 60.0,
            max_bpm: 180.0,
            enable_advanced: false,
            pitch_algorithm: PitchAlgorithm::Yin,
        }
    }
}

impl AnalysisOptions {
    /// Check every field and the relations between them.
    pub fn validate(&self) -> Result<()> {
        if self.fft_size == 0 || !self.fft_size.is_power_of_two() {
            return Err(invalid(format!(
                "fft_size must be a positive power of two, got {}",
                self.fft_size
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(invalid(format!(
                "smoothing must be in [0, 1], got {}",
                self.smoothing
            )));
        }
        if !(self.min_frequency.is_finite()
            && self.max_frequency.is_finite()
            && self.min_frequency > 0.0)
        {
            return Err(invalid(format!(
                "frequency bounds must be positive and finite, got {}..{}",
                self.min_frequency, self.max_frequency
            )));
        }
        if self.min_frequency >= self.max_frequency {
            return Err(invalid(format!(
                "min_frequency {} must be below max_frequency {}",
                self.min_frequency, self.max_frequency
            )));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(invalid(format!(
                "threshold must be in (0, 1), got {}",
                self.threshold
            )));
        }
        if !(self.min_bpm.is_finite() && self.max_bpm.is_finite() && self.min_bpm > 0.0) {
            return Err(invalid(format!(
                "BPM bounds must be positive and finite, got {}..{}",
                self.min_bpm, self.max_bpm
            )));
        }
        if self.min_bpm >= self.max_bpm {
            return Err(invalid(format!(
                "min_bpm {} must be below max_bpm {}",
                self.min_bpm, self.max_bpm
            )));
        }
        Ok(())
    }

    /// True when `other` needs a different pitch detector than `self`.
    pub(crate) fn pitch_settings_differ(&self, other: &Self) -> bool {
        self.min_frequency != other.min_frequency
            || self.max_frequency != other.max_frequency
            || self.threshold != other.threshold
            || self.pitch_algorithm != other.pitch_algorithm
    }

    /// Build the pitch detector these options describe.
    pub(crate) fn pitch_detector(&self, sample_rate: f64) -> Result<PitchDetector> {
        Ok(PitchDetector::new(
            self.pitch_algorithm,
            sample_rate,
            self.min_frequency,
            self.max_frequency,
            self.threshold,
        )?)
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidOptions(message)
}
