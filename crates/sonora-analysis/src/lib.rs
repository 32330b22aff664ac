//! # Sonora Analysis
//!
//! Musical feature extraction over complete, already-decoded audio buffers.
//!
//! This crate provides:
//! - **Channel mixing**: Planar PCM sources reduced to one averaged channel
//! - **Volume**: RMS loudness scaled so a full-scale sine reads ~1.0
//! - **Pitch detection**: YIN with an autocorrelation fallback strategy
//! - **Spectrum approximation**: Coarse byte-scaled energy buckets
//! - **Chromagram**: Spectrum folded into 12 pitch classes
//! - **Chord recognition**: Template matching over the chromagram
//! - **Tempo**: BPM and beat positions from onset-energy autocorrelation
//! - **Note mapping**: Frequency <-> note name (A4 = 440 Hz)
//!
//! All functions operate on raw `&[f32]` sample buffers and are stateless.
//! Absence of a pitch, tempo or chord is `None`, never an error.
//!
//! ## Example
//!
//! ```rust
//! use sonora_analysis::{
//!     beat::BeatTracker,
//!     chord::ChordRecognizer,
//!     chroma::chromagram,
//!     pitch::{PitchAlgorithm, PitchDetector},
//!     spectrum::{EnergyBucketSpectrum, SpectrumEstimator},
//!     volume::rms_volume,
//! };
//!
//! let sample_rate = 44100.0;
//! let samples: Vec<f32> = (0..4096)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//!
//! let volume = rms_volume(&samples);
//! assert!(volume > 0.95);
//!
//! let detector = PitchDetector::new(PitchAlgorithm::Yin, sample_rate, 50.0, 5000.0, 0.1).unwrap();
//! let pitch = detector.detect(&samples[..2048]).unwrap();
//! assert!((pitch.frequency - 440.0).abs() < 4.4);
//!
//! let spectrum = EnergyBucketSpectrum::default().estimate(&samples[..2048], 1024);
//! let chroma = chromagram(&spectrum.iter().map(|&b| f32::from(b)).collect::<Vec<_>>(), sample_rate);
//! let _chord = ChordRecognizer::new().recognize(&chroma);
//!
//! let tempo = BeatTracker::new(60.0, 180.0).unwrap().detect(&samples, sample_rate);
//! assert!(tempo.bpm.is_none() || tempo.confidence <= 1.0);
//! ```

pub mod beat;
pub mod buffer;
pub mod chord;
pub mod chroma;
pub mod error;
pub mod note;
pub mod pitch;
pub mod spectrum;
pub mod volume;

pub use beat::{BeatTracker, TempoEstimate};
pub use buffer::{mix_to_mono, AudioBuffer, PcmSource, SampleWindow};
pub use chord::{ChordInfo, ChordQuality, ChordRecognizer, ChordTemplate};
pub use chroma::{chromagram, Chromagram, PITCH_CLASSES};
pub use error::{Error, Result};
pub use note::{
    freq_to_midi, frequency_to_note, midi_to_freq, note_to_frequency, NoteName, NOTE_NAMES,
};
pub use pitch::{median_filter, PitchAlgorithm, PitchDetector, PitchEstimate};
pub use spectrum::{EnergyBucketSpectrum, SpectrumEstimator};
pub use volume::rms_volume;
