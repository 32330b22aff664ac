//! Realtime analysis with spectrum smoothing.
//!
//! A [`RealtimeSession`] is fed successive windows from a live source and
//! smooths the spectrum between them:
//!
//! `s[k] = smoothing * s_prev[k] + (1 - smoothing) * x[k]`
//!
//! Smoothed bins start at zero and reset whenever the bin count changes, so
//! the first frames of a session ramp up from silence. Volume, pitch and
//! note are never smoothed.

use crate::analysis::SampleWindow;
use crate::analyzer::check_source;
use crate::{AnalysisResult, Analyzer, Result};

/// Stateful realtime analysis over one stream of windows.
///
/// Not shared between streams: give each live source its own session.
#[derive(Debug)]
pub struct RealtimeSession {
    analyzer: Analyzer,
    smoothed: Vec<f32>,
}

impl RealtimeSession {
    pub(crate) fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            smoothed: Vec::new(),
        }
    }

    /// Analyze the next window.
    ///
    /// Same as [`Analyzer::analyze_realtime`] except `spectrum` is smoothed
    /// against previous windows.
    pub fn analyze(&mut self, window: &SampleWindow) -> Result<AnalysisResult> {
        check_source(window)?;
        let state = self.analyzer.snapshot();
        let (mut result, _) =
            self.analyzer
                .describe(&state, &window.samples, window.sample_rate, None)?;

        let smoothing = state.options.smoothing;
        if self.smoothed.len() != result.spectrum.len() {
            self.smoothed = vec![0.0; result.spectrum.len()];
        }
        for (smoothed, raw) in self.smoothed.iter_mut().zip(result.spectrum.iter_mut()) {
            *smoothed = smoothing * *smoothed + (1.0 - smoothing) * f32::from(*raw);
            *raw = smoothed.round().clamp(0.0, 255.0) as u8;
        }

        Ok(result)
    }

    /// Smoothed bins before byte rounding.
    pub fn smoothed_spectrum(&self) -> &[f32] {
        &self.smoothed
    }

    /// Forget smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.clear();
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }
}
