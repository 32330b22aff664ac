//! # Sonora - Audio Feature Extraction
//!
//! Turns decoded PCM buffers into compact musical descriptors: loudness,
//! fundamental pitch and note name, a coarse spectrum, and optionally tempo,
//! beat positions, a chromagram and the best-matching chord.
//!
//! ## Architecture
//!
//! Sonora is an umbrella crate over:
//! - **sonora-analysis** - Stateless DSP (YIN / autocorrelation pitch, RMS volume,
//!   energy-bucket spectrum, chromagram, chord templates, onset-autocorrelation tempo,
//!   note mapping)
//!
//! and adds the [`Analyzer`] orchestrator with copy-on-write configuration.
//!
//! ## Quick Start
//!
//! ```rust
//! use sonora::prelude::*;
//!
//! let analyzer = Analyzer::builder()
//!     .frequency_range(50.0, 2000.0)
//!     .build()?;
//!
//! let samples: Vec<f32> = (0..44100)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//! let result = analyzer.analyze(&AudioBuffer::from_mono(samples, 44100.0))?;
//!
//! assert!(result.volume > 0.99);
//! assert_eq!(result.note(), Some("A4"));
//!
//! // Note mapping works without an analyzer.
//! assert_eq!(sonora::note_to_frequency("A4")?, 440.0);
//! # Ok::<(), sonora::Error>(())
//! ```
//!
//! Nothing detected is not an error: silence, noise and atonal input give
//! `None` for pitch, tempo and chord.
//!
//! ## Feature Flags
//!
//! - `serialization` - serde derives on options and result records

/// Re-export of sonora-analysis for direct access
pub use sonora_analysis as analysis;

pub use sonora_analysis::{
    freq_to_midi, frequency_to_note, midi_to_freq, note_to_frequency, AudioBuffer, ChordInfo,
    ChordQuality, Chromagram, NoteName, PcmSource, PitchAlgorithm, PitchEstimate, SampleWindow,
    SpectrumEstimator,
};

mod analyzer;
mod builder;
mod error;
mod options;
mod realtime;
mod result;

pub use analyzer::Analyzer;
pub use builder::AnalyzerBuilder;
pub use error::{Error, Result};
pub use options::AnalysisOptions;
pub use realtime::RealtimeSession;
pub use result::{AdvancedResult, AnalysisResult};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        AdvancedResult, AnalysisOptions, AnalysisResult, Analyzer, AnalyzerBuilder,
        RealtimeSession,
    };

    // Inputs
    pub use crate::analysis::{AudioBuffer, PcmSource, SampleWindow};

    // Output and configuration types
    pub use crate::analysis::{ChordInfo, ChordQuality, PitchAlgorithm, PitchEstimate};
}
