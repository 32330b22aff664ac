//! Builder for configuring and constructing an `Analyzer`.

use std::sync::Arc;

use crate::analysis::{
    ChordRecognizer, ChordTemplate, EnergyBucketSpectrum, PitchAlgorithm, SpectrumEstimator,
};
use crate::analyzer::AnalyzerState;
use crate::{AnalysisOptions, Analyzer, Error, Result};

/// Every option defaults to [`AnalysisOptions::default`]. Nothing is checked
/// until [`build`](AnalyzerBuilder::build), which validates all fields
/// together.
///
/// The sample rate only pre-builds the pitch detector. Buffers at other rates
/// still analyze correctly.
///
/// # Example
///
/// ```rust
/// use sonora::prelude::*;
///
/// let analyzer = Analyzer::builder()
///     .fft_size(4096)
///     .frequency_range(80.0, 1200.0)
///     .pitch_algorithm(PitchAlgorithm::Autocorrelation)
///     .build()?;
///
/// assert_eq!(analyzer.options().fft_size, 4096);
/// # Ok::<(), sonora::Error>(())
/// ```
pub struct AnalyzerBuilder {
    options: AnalysisOptions,
    sample_rate: f64,
    spectrum: Option<Arc<dyn SpectrumEstimator>>,
    templates: Option<Vec<ChordTemplate>>,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self {
            options: AnalysisOptions::default(),
            sample_rate: 44100.0,
            spectrum: None,
            templates: None,
        }
    }
}

impl AnalyzerBuilder {
    /// Start from a complete options value.
    pub fn options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Default: 44100.0
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Default: 2048
    pub fn fft_size(mut self, size: usize) -> Self {
        self.options.fft_size = size;
        self
    }

    /// Default: 0.8
    pub fn smoothing(mut self, smoothing: f32) -> Self {
        self.options.smoothing = smoothing;
        self
    }

    /// Default: 50.0
    pub fn min_frequency(mut self, hz: f32) -> Self {
        self.options.min_frequency = hz;
        self
    }

    /// Default: 5000.0
    pub fn max_frequency(mut self, hz: f32) -> Self {
        self.options.max_frequency = hz;
        self
    }

    pub fn frequency_range(self, min_hz: f32, max_hz: f32) -> Self {
        self.min_frequency(min_hz).max_frequency(max_hz)
    }

    /// Default: 0.1
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Default: 60.0
    pub fn min_bpm(mut self, bpm: f32) -> Self {
        self.options.min_bpm = bpm;
        self
    }

    /// Default: 180.0
    pub fn max_bpm(mut self, bpm: f32) -> Self {
        self.options.max_bpm = bpm;
        self
    }

    pub fn bpm_range(self, min_bpm: f32, max_bpm: f32) -> Self {
        self.min_bpm(min_bpm).max_bpm(max_bpm)
    }

    /// Default: false
    pub fn enable_advanced(mut self, enable: bool) -> Self {
        self.options.enable_advanced = enable;
        self
    }

    /// Default: [`PitchAlgorithm::Yin`]
    pub fn pitch_algorithm(mut self, algorithm: PitchAlgorithm) -> Self {
        self.options.pitch_algorithm = algorithm;
        self
    }

    /// Replace the energy-bucket spectrum, e.g. with an FFT-based estimator.
    pub fn spectrum_estimator<E>(mut self, estimator: E) -> Self
    where
        E: SpectrumEstimator + 'static,
    {
        self.spectrum = Some(Arc::new(estimator));
        self
    }

    /// Match chords against `templates` instead of the six built-in shapes.
    pub fn chord_templates(mut self, templates: Vec<ChordTemplate>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn build(self) -> Result<Analyzer> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Error::InvalidOptions(format!(
                "sample rate must be positive and finite, got {}",
                self.sample_rate
            )));
        }

        let state = AnalyzerState::new(self.options, self.sample_rate)?;
        let spectrum: Arc<dyn SpectrumEstimator> = match self.spectrum {
            Some(estimator) => estimator,
            None => Arc::new(EnergyBucketSpectrum::default()),
        };
        let chords = match self.templates {
            Some(templates) => ChordRecognizer::with_templates(templates),
            None => ChordRecognizer::new(),
        };

        Ok(Analyzer::from_parts(state, spectrum, chords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_each_field() {
        let analyzer = AnalyzerBuilder::default()
            .fft_size(1024)
            .smoothing(0.5)
            .frequency_range(80.0, 1000.0)
            .threshold(0.2)
            .bpm_range(70.0, 160.0)
            .enable_advanced(true)
            .pitch_algorithm(PitchAlgorithm::Autocorrelation)
            .build()
            .unwrap();

        let options = analyzer.options();
        assert_eq!(options.fft_size, 1024);
        assert_eq!(options.smoothing, 0.5);
        assert_eq!((options.min_frequency, options.max_frequency), (80.0, 1000.0));
        assert_eq!(options.threshold, 0.2);
        assert_eq!((options.min_bpm, options.max_bpm), (70.0, 160.0));
        assert!(options.enable_advanced);

        let detector = analyzer.pitch_detector();
        assert_eq!(detector.algorithm(), PitchAlgorithm::Autocorrelation);
        assert_eq!(detector.min_freq(), 80.0);
    }

    #[test]
    fn test_build_rejects_invalid_options() {
        assert!(matches!(
            AnalyzerBuilder::default().frequency_range(500.0, 100.0).build(),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            AnalyzerBuilder::default().fft_size(1000).build(),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            AnalyzerBuilder::default().sample_rate(-1.0).build(),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_custom_spectrum_estimator() {
        struct Flat;
        impl SpectrumEstimator for Flat {
            fn estimate(&self, _samples: &[f32], bin_count: usize) -> Vec<u8> {
                vec![7; bin_count]
            }
        }

        let analyzer = AnalyzerBuilder::default()
            .fft_size(64)
            .spectrum_estimator(Flat)
            .build()
            .unwrap();
        let window = crate::analysis::SampleWindow::new(vec![0.0; 64], 44100.0);
        let result = analyzer.analyze_realtime(&window).unwrap();
        assert_eq!(result.spectrum, vec![7; 32]);
    }
}
