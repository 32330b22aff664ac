//! Tempo and beat detection
//!
//! 1. Short-time RMS envelope: 40 ms frames every 10 ms
//! 2. Onset strength: half-wave rectified first difference of the envelope
//! 3. Autocorrelation of the onset curve
//! 4. Local peak (±2 frames) inside the lag band given by the BPM bounds with the
//!    greatest strength, counting its stronger immediate neighbour so a beat
//!    period between two frames is not split
//! 5. Octave check: a sub-multiple of that lag keeping most of its strength wins
//! 6. Parabolic refinement of the lag, BPM clamped to the configured bounds
//!
//! Beat positions are a separate scan for onset peaks above 30% of the
//! strongest onset. They are not projected from the tempo lag, so they can be
//! irregular even when the BPM is clean.

use crate::buffer::{mix_to_mono, PcmSource};
use crate::error::{Error, Result};
use crate::pitch::parabolic_interpolation;

/// Envelope frame length in seconds
const FRAME_SECONDS: f64 = 0.040;

/// Envelope hop in seconds
const HOP_SECONDS: f64 = 0.010;

/// A tempo lag must dominate this many frames on each side.
const PEAK_NEIGHBORHOOD: usize = 2;

/// A sub-multiple lag replaces the winner when it keeps this share of its strength.
const SUBMULTIPLE_RATIO: f64 = 0.6;

/// Divisors tried by the octave check, fastest candidate first.
const SUBMULTIPLES: [usize; 3] = [4, 3, 2];

/// Onset peaks below this fraction of the maximum are not beats.
const BEAT_PEAK_RATIO: f32 = 0.3;

const SILENCE_ENERGY: f64 = 1e-12;

/// Result of tempo detection
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TempoEstimate {
    /// Tempo in beats per minute, `None` if no periodicity was found
    pub bpm: Option<u32>,
    /// Strength of the tempo lag relative to lag 0 (0.0 - 1.0)
    pub confidence: f32,
    /// Onset peak times in seconds, ascending
    pub beat_positions: Vec<f64>,
}

/// Onset-autocorrelation tempo detector
#[derive(Debug, Clone, PartialEq)]
pub struct BeatTracker {
    min_bpm: f32,
    max_bpm: f32,
}

impl BeatTracker {
    /// Create a tracker searching `min_bpm..=max_bpm`.
    pub fn new(min_bpm: f32, max_bpm: f32) -> Result<Self> {
        if !(min_bpm.is_finite() && max_bpm.is_finite() && min_bpm > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "BPM bounds must be positive and finite, got {}..{}",
                min_bpm, max_bpm
            )));
        }
        if min_bpm >= max_bpm {
            return Err(Error::InvalidConfig(format!(
                "min BPM {} must be below max BPM {}",
                min_bpm, max_bpm
            )));
        }
        Ok(Self { min_bpm, max_bpm })
    }

    pub fn min_bpm(&self) -> f32 {
        self.min_bpm
    }

    pub fn max_bpm(&self) -> f32 {
        self.max_bpm
    }

    /// Mix `source` to mono and detect its tempo.
    pub fn detect_source<S: PcmSource + ?Sized>(&self, source: &S) -> TempoEstimate {
        self.detect(&mix_to_mono(source), source.sample_rate())
    }

    /// Detect tempo and beat positions in a mono buffer.
    pub fn detect(&self, samples: &[f32], sample_rate: f64) -> TempoEstimate {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return TempoEstimate::default();
        }

        let frame_len = ((FRAME_SECONDS * sample_rate).round() as usize).max(1);
        let hop = ((HOP_SECONDS * sample_rate).round() as usize).max(1);
        let frames_per_second = sample_rate / hop as f64;

        let envelope = energy_envelope(samples, frame_len, hop);
        let onsets = onset_strength(&envelope);

        let (min_lag, max_lag) = self.lag_band(frames_per_second);
        let ac = autocorrelation(&onsets, max_lag + PEAK_NEIGHBORHOOD + 1);

        let Some(best) = best_lag(&ac, min_lag, max_lag) else {
            tracing::trace!(frames = onsets.len(), "no tempo periodicity found");
            return TempoEstimate::default();
        };
        let (lag, strength) = prefer_submultiple(&ac, best, min_lag, max_lag);
        if lag != best.0 {
            tracing::trace!(from = best.0, to = lag, "octave check moved tempo lag");
        }

        let refined = parabolic_interpolation(&ac, lag);
        let period_frames = if (refined - lag as f64).abs() <= 0.5 {
            refined
        } else {
            lag as f64
        };
        let seconds_per_beat = period_frames * hop as f64 / sample_rate;
        let confidence = ((strength / ac[0]) as f32).min(1.0);

        TempoEstimate {
            bpm: Some(self.clamp_bpm(60.0 / seconds_per_beat)),
            confidence,
            beat_positions: beat_positions(&onsets, hop, sample_rate),
        }
    }

    /// Round to whole BPM inside the configured bounds.
    ///
    /// The lag band is widened to whole frames, so a tempo just past a bound
    /// can still win the search.
    fn clamp_bpm(&self, bpm: f64) -> u32 {
        let lowest = (self.min_bpm as f64).ceil();
        let highest = (self.max_bpm as f64).floor().max(lowest);
        bpm.round().max(lowest).min(highest) as u32
    }

    /// Lag band in frames: fastest tempo -> smallest lag.
    fn lag_band(&self, frames_per_second: f64) -> (usize, usize) {
        let min_lag = ((60.0 / self.max_bpm as f64) * frames_per_second).floor() as usize;
        let max_lag = ((60.0 / self.min_bpm as f64) * frames_per_second).ceil() as usize;
        (min_lag.max(1), max_lag)
    }
}

/// RMS of each `frame_len` window, stepped by `hop`. Partial trailing frames are dropped.
fn energy_envelope(samples: &[f32], frame_len: usize, hop: usize) -> Vec<f64> {
    if samples.len() < frame_len {
        return Vec::new();
    }

    let num_frames = (samples.len() - frame_len) / hop + 1;
    (0..num_frames)
        .map(|i| {
            let frame = &samples[i * hop..i * hop + frame_len];
            let sum_sq: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
            (sum_sq / frame_len as f64).sqrt()
        })
        .collect()
}

/// `max(0, e[i] - e[i-1])`, with the first frame at zero.
fn onset_strength(envelope: &[f64]) -> Vec<f64> {
    let mut onsets = Vec::with_capacity(envelope.len());
    if !envelope.is_empty() {
        onsets.push(0.0);
    }
    onsets.extend(envelope.windows(2).map(|w| (w[1] - w[0]).max(0.0)));
    onsets
}

/// Autocorrelation over the full curve for lags `0..lag_count` (capped at the curve length).
fn autocorrelation(curve: &[f64], lag_count: usize) -> Vec<f64> {
    (0..lag_count.min(curve.len()))
        .map(|lag| {
            curve
                .iter()
                .zip(&curve[lag..])
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect()
}

/// Autocorrelation at `lag` plus its larger immediate neighbour.
fn lag_strength(ac: &[f64], lag: usize) -> f64 {
    let below = lag.checked_sub(1).map_or(0.0, |l| ac[l]);
    let above = ac.get(lag + 1).copied().unwrap_or(0.0);
    ac[lag] + below.max(above)
}

/// Lag in `min_lag..=max_lag` that is a peak within ±[`PEAK_NEIGHBORHOOD`]
/// frames and has the greatest [`lag_strength`]. The first such lag wins ties.
fn best_lag(ac: &[f64], min_lag: usize, max_lag: usize) -> Option<(usize, f64)> {
    let energy = *ac.first()?;
    if energy <= SILENCE_ENERGY || ac.len() < 2 {
        return None;
    }
    let max_lag = max_lag.min(ac.len() - 1);

    let mut best: Option<(usize, f64)> = None;
    for lag in min_lag..=max_lag {
        let value = ac[lag];
        if value <= 0.0 || !is_local_peak(ac, lag) {
            continue;
        }
        let strength = lag_strength(ac, lag);
        if best.map_or(true, |(_, best_strength)| strength > best_strength) {
            best = Some((lag, strength));
        }
    }
    best
}

/// Replace `best` with its fastest sub-multiple (`lag / d`, ±1 frame) that
/// stays in band and keeps [`SUBMULTIPLE_RATIO`] of its strength.
fn prefer_submultiple(
    ac: &[f64],
    best: (usize, f64),
    min_lag: usize,
    max_lag: usize,
) -> (usize, f64) {
    let (lag, strength) = best;
    let max_lag = max_lag.min(ac.len().saturating_sub(1));

    for divisor in SUBMULTIPLES {
        let center = (lag as f64 / divisor as f64).round() as usize;
        let candidate = (center.saturating_sub(1)..=center + 1)
            .filter(|&l| l >= min_lag && l <= max_lag && ac[l] > 0.0)
            .fold(None, |found: Option<usize>, l| match found {
                Some(f) if ac[f] >= ac[l] => Some(f),
                _ => Some(l),
            });

        if let Some(candidate) = candidate {
            let candidate_strength = lag_strength(ac, candidate);
            if candidate_strength >= SUBMULTIPLE_RATIO * strength {
                return (candidate, candidate_strength);
            }
        }
    }
    best
}

fn is_local_peak(ac: &[f64], lag: usize) -> bool {
    (1..=PEAK_NEIGHBORHOOD).all(|k| {
        let below = lag < k || ac[lag - k] <= ac[lag];
        let above = lag + k >= ac.len() || ac[lag + k] <= ac[lag];
        below && above
    })
}

/// Times (seconds) of onset local maxima above [`BEAT_PEAK_RATIO`] of the strongest onset.
fn beat_positions(onsets: &[f64], hop: usize, sample_rate: f64) -> Vec<f64> {
    let max = onsets.iter().copied().fold(0.0f64, f64::max);
    if max <= 0.0 || onsets.len() < 3 {
        return Vec::new();
    }
    let threshold = max * BEAT_PEAK_RATIO as f64;

    (1..onsets.len() - 1)
        .filter(|&i| {
            onsets[i] > threshold && onsets[i] > onsets[i - 1] && onsets[i] >= onsets[i + 1]
        })
        .map(|i| (i * hop) as f64 / sample_rate)
        .collect()
}
