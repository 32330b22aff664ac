//! Pitch detection
//!
//! Monophonic fundamental-frequency estimation over a single window.
//!
//! ## Algorithms
//!
//! - [`PitchAlgorithm::Yin`] (default): de Cheveigné & Kawahara's YIN. Difference
//!   function, cumulative mean normalization, absolute threshold, parabolic
//!   interpolation.
//! - [`PitchAlgorithm::Autocorrelation`]: raw autocorrelation, first strict local
//!   peak above half the zero-lag energy. Biased toward the lowest periodic lag,
//!   i.e. the fundamental rather than a harmonic.
//!
//! A [`PitchDetector`] is an immutable value. Changing the frequency bounds,
//! threshold or algorithm means building a new one, so a detector shared with
//! an in-flight call never changes underneath it.
//!
//! Silence, noise and windows too short for the requested range all yield
//! `None`.

mod autocorr;
mod yin;

use crate::error::{Error, Result};
use crate::note;

/// Pitch detection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum PitchAlgorithm {
    /// YIN cumulative mean normalized difference (default)
    #[default]
    Yin,
    /// Plain autocorrelation, first qualifying peak
    Autocorrelation,
}

/// A detected pitch for a single window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PitchEstimate {
    /// Fundamental frequency in Hz
    pub frequency: f32,
    /// Periodicity confidence (0.0 - 1.0)
    pub confidence: f32,
}

impl PitchEstimate {
    /// Nearest MIDI note and cents offset
    pub fn midi_note(&self) -> Option<(i32, f32)> {
        note::freq_to_midi(self.frequency)
    }

    /// Nearest note name with sharp notation (e.g. "A4", "C#5")
    pub fn note_name(&self) -> Option<String> {
        note::frequency_to_note(self.frequency)
    }
}

/// Search bounds in samples: `min <= lag < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LagRange {
    pub min: usize,
    pub max: usize,
}

/// Period estimate in (possibly fractional) samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Period {
    pub lag: f64,
    pub confidence: f32,
}

/// Immutable pitch detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchDetector {
    algorithm: PitchAlgorithm,
    sample_rate: f64,
    min_freq: f32,
    max_freq: f32,
    threshold: f32,
}

impl PitchDetector {
    /// Create a detector.
    ///
    /// # Arguments
    /// * `algorithm` - Detection strategy
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `min_freq` / `max_freq` - Search bounds in Hz, `0 < min_freq < max_freq`
    /// * `threshold` - YIN absolute threshold, strictly inside `(0, 1)`
    pub fn new(
        algorithm: PitchAlgorithm,
        sample_rate: f64,
        min_freq: f32,
        max_freq: f32,
        threshold: f32,
    ) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        if !(min_freq.is_finite() && max_freq.is_finite() && min_freq > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "frequency bounds must be positive and finite, got {}..{}",
                min_freq, max_freq
            )));
        }
        if min_freq >= max_freq {
            return Err(Error::InvalidConfig(format!(
                "min frequency {} must be below max frequency {}",
                min_freq, max_freq
            )));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "threshold must be in (0, 1), got {}",
                threshold
            )));
        }

        Ok(Self {
            algorithm,
            sample_rate,
            min_freq,
            max_freq,
            threshold,
        })
    }

    /// YIN detector with the default bounds (50 - 5000 Hz, threshold 0.1)
    pub fn yin(sample_rate: f64) -> Result<Self> {
        Self::new(PitchAlgorithm::Yin, sample_rate, 50.0, 5000.0, 0.1)
    }

    /// Same bounds, threshold and algorithm at another sample rate.
    pub fn with_sample_rate(&self, sample_rate: f64) -> Result<Self> {
        Self::new(
            self.algorithm,
            sample_rate,
            self.min_freq,
            self.max_freq,
            self.threshold,
        )
    }

    pub fn algorithm(&self) -> PitchAlgorithm {
        self.algorithm
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn min_freq(&self) -> f32 {
        self.min_freq
    }

    pub fn max_freq(&self) -> f32 {
        self.max_freq
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Smallest window that covers one period of `min_freq` twice
    pub fn min_window_size(&self) -> usize {
        (self.sample_rate / self.min_freq as f64) as usize * 2
    }

    /// Detect the pitch of a single window.
    pub fn detect(&self, samples: &[f32]) -> Option<PitchEstimate> {
        let lags = self.lag_range(samples.len())?;

        let period = match self.algorithm {
            PitchAlgorithm::Yin => yin::estimate_period(samples, lags, self.threshold as f64),
            PitchAlgorithm::Autocorrelation => autocorr::estimate_period(samples, lags),
        }?;

        let frequency = self.frequency_in_band(period.lag)?;

        Some(PitchEstimate {
            frequency,
            confidence: period.confidence.clamp(0.0, 1.0),
        })
    }

    /// Detect a pitch track over an entire buffer.
    ///
    /// # Arguments
    /// * `samples` - Mono audio samples
    /// * `frame_size` - Samples per analysis frame
    /// * `hop_size` - Samples between frame starts
    ///
    /// # Returns
    /// One entry per frame, `None` where no pitch was found
    pub fn detect_track(
        &self,
        samples: &[f32],
        frame_size: usize,
        hop_size: usize,
    ) -> Vec<Option<PitchEstimate>> {
        if frame_size == 0 || hop_size == 0 || samples.len() < frame_size {
            return Vec::new();
        }

        let num_frames = (samples.len() - frame_size) / hop_size + 1;
        (0..num_frames)
            .map(|i| {
                let start = i * hop_size;
                self.detect(&samples[start..start + frame_size])
            })
            .collect()
    }

    /// Frequency of a period in samples, or `None` outside the search band.
    ///
    /// Interpolation can move a period found at the edge of the lag range up
    /// to one sample past the band. Such estimates are pulled back onto the
    /// bound.
    fn frequency_in_band(&self, lag: f64) -> Option<f32> {
        let shortest = self.sample_rate / self.max_freq as f64;
        let longest = self.sample_rate / self.min_freq as f64;
        if !lag.is_finite() || lag < shortest - 1.0 || lag > longest + 1.0 {
            return None;
        }

        let frequency = (self.sample_rate / lag.clamp(shortest, longest)) as f32;
        Some(frequency.clamp(self.min_freq, self.max_freq))
    }

    /// `min = floor(sr / max_freq)`, `max = min(floor(sr / min_freq), len / 2)`
    fn lag_range(&self, len: usize) -> Option<LagRange> {
        let min = ((self.sample_rate / self.max_freq as f64).floor() as usize).max(1);
        let max = ((self.sample_rate / self.min_freq as f64).floor() as usize).min(len / 2);

        // Need at least one lag with a neighbour on each side.
        if max < 3 || min + 1 >= max {
            return None;
        }
        Some(LagRange { min, max })
    }
}

/// Refine `index` to the vertex of the parabola through its neighbours.
///
/// Keeps the integer index at either edge of `values` or when the three
/// points are (numerically) collinear.
pub(crate) fn parabolic_interpolation(values: &[f64], index: usize) -> f64 {
    if index == 0 || index + 1 >= values.len() {
        return index as f64;
    }

    let s0 = values[index - 1];
    let s1 = values[index];
    let s2 = values[index + 1];

    let denominator = 2.0 * (s0 - 2.0 * s1 + s2);
    if denominator.abs() > 1e-12 {
        index as f64 + (s0 - s2) / denominator
    } else {
        index as f64
    }
}

/// Median filter for smoothing pitch tracks
///
/// Removes outliers (like octave jumps) by replacing each frame's frequency
/// with the median of the voiced frequencies in its neighbourhood.
pub fn median_filter(track: &[Option<PitchEstimate>], window_size: usize) -> Vec<Option<PitchEstimate>> {
    if track.is_empty() || window_size < 2 {
        return track.to_vec();
    }

    let half = window_size / 2;
    (0..track.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(track.len());

            let mut freqs: Vec<f32> = track[start..end]
                .iter()
                .flatten()
                .map(|p| p.frequency)
                .collect();

            if freqs.is_empty() {
                return None;
            }

            freqs.sort_by(f32::total_cmp);
            Some(PitchEstimate {
                frequency: freqs[freqs.len() / 2],
                confidence: track[i].map_or(0.0, |p| p.confidence),
            })
        })
        .collect()
}
