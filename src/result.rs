//! Analysis output records.

use std::time::SystemTime;

use crate::analysis::{ChordInfo, Chromagram, PitchEstimate, TempoEstimate};

/// One analysis call's output.
///
/// Owned by the caller. `waveform` and `spectrum` are fresh copies and never
/// alias analyzer state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnalysisResult {
    /// Seconds of audio analyzed; `None` for realtime windows.
    pub duration: Option<f64>,
    /// RMS volume (0.0 - 1.0)
    pub volume: f32,
    /// Detected pitch in Hz
    pitch: Option<f32>,
    /// Nearest note name for `pitch`
    note: Option<String>,
    /// Samples the volume and pitch were computed from
    pub waveform: Vec<f32>,
    /// Byte-scaled coarse spectrum, one value per bin
    pub spectrum: Vec<u8>,
    pub timestamp: SystemTime,
    pub advanced: Option<AdvancedResult>,
}

impl AnalysisResult {
    pub(crate) fn new(
        duration: Option<f64>,
        volume: f32,
        pitch: Option<PitchEstimate>,
        waveform: Vec<f32>,
        spectrum: Vec<u8>,
    ) -> Self {
        // Note is derived here so pitch and note are present together or not at all.
        let (pitch, note) = match pitch.and_then(|p| p.note_name().map(|n| (p.frequency, n))) {
            Some((frequency, name)) => (Some(frequency), Some(name)),
            None => (None, None),
        };
        Self {
            duration,
            volume,
            pitch,
            note,
            waveform,
            spectrum,
            timestamp: SystemTime::now(),
            advanced: None,
        }
    }

    /// Detected pitch in Hz
    pub fn pitch(&self) -> Option<f32> {
        self.pitch
    }

    /// Note name of [`pitch`](Self::pitch), e.g. "A4"
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Tempo and harmony descriptors, computed only when advanced analysis is enabled.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AdvancedResult {
    pub bpm: Option<u32>,
    /// 0.0 - 1.0
    pub bpm_confidence: f32,
    pub chord: Option<ChordInfo>,
    /// Confidence of the pitch in the enclosing result, 0.0 when unvoiced
    pub pitch_confidence: f32,
    /// Pitch-class energies, index 0 = C
    pub chromagram: Chromagram,
    /// Onset times in seconds, ascending
    pub beat_positions: Vec<f64>,
}

impl AdvancedResult {
    pub(crate) fn new(
        tempo: TempoEstimate,
        chord: Option<ChordInfo>,
        pitch: Option<PitchEstimate>,
        chromagram: Chromagram,
    ) -> Self {
        Self {
            bpm: tempo.bpm,
            bpm_confidence: tempo.confidence,
            chord,
            pitch_confidence: pitch.map_or(0.0, |p| p.confidence),
            chromagram,
            beat_positions: tempo.beat_positions,
        }
    }
}
