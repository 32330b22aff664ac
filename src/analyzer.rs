//! The analysis orchestrator.
//!
//! Sequences mixing, volume, pitch, spectrum and (optionally) tempo and chord
//! detection into one [`AnalysisResult`] per call.
//!
//! Configuration lives in an immutable [`AnalyzerState`] snapshot behind an
//! `ArcSwap`. Each call loads one snapshot up front, so a concurrent
//! [`Analyzer::set_options`] never changes the bounds or detector an
//! in-flight call is using.

use std::borrow::Cow;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::analysis::{
    chromagram, median_filter, mix_to_mono, rms_volume, BeatTracker, ChordRecognizer, PcmSource,
    PitchDetector, PitchEstimate, SampleWindow, SpectrumEstimator,
};
use crate::realtime::RealtimeSession;
use crate::{AdvancedResult, AnalysisOptions, AnalysisResult, AnalyzerBuilder, Error, Result};

/// Median window applied by [`Analyzer::pitch_contour`].
const CONTOUR_SMOOTHING: usize = 3;

/// One published configuration: options plus the detector built from them.
#[derive(Debug)]
pub(crate) struct AnalyzerState {
    pub options: AnalysisOptions,
    pub detector: Arc<PitchDetector>,
}

impl AnalyzerState {
    pub fn new(options: AnalysisOptions, sample_rate: f64) -> Result<Self> {
        options.validate()?;
        let detector = Arc::new(options.pitch_detector(sample_rate)?);
        Ok(Self { options, detector })
    }

    /// Validate `options` and derive the next state, reusing the detector
    /// when its settings are unchanged.
    fn reconfigure(&self, options: AnalysisOptions) -> Result<Self> {
        options.validate()?;
        let detector = if self.options.pitch_settings_differ(&options) {
            tracing::debug!(
                min_frequency = options.min_frequency,
                max_frequency = options.max_frequency,
                threshold = options.threshold,
                algorithm = ?options.pitch_algorithm,
                "rebuilding pitch detector"
            );
            Arc::new(options.pitch_detector(self.detector.sample_rate())?)
        } else {
            Arc::clone(&self.detector)
        };
        Ok(Self { options, detector })
    }

    /// The cached detector, or a copy retargeted to `sample_rate`.
    fn detector_at(&self, sample_rate: f64) -> Result<Cow<'_, PitchDetector>> {
        if self.detector.sample_rate() == sample_rate {
            Ok(Cow::Borrowed(self.detector.as_ref()))
        } else {
            Ok(Cow::Owned(self.detector.with_sample_rate(sample_rate)?))
        }
    }
}

/// Audio feature extractor.
///
/// Cheap to clone; clones share configuration. `Send + Sync`, so one
/// analyzer can serve many threads.
///
/// # Example
///
/// ```rust
/// use sonora::prelude::*;
///
/// let analyzer = Analyzer::builder().enable_advanced(true).build()?;
///
/// let samples: Vec<f32> = (0..44100)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
///     .collect();
/// let result = analyzer.analyze(&AudioBuffer::from_mono(samples, 44100.0))?;
///
/// assert_eq!(result.note(), Some("A4"));
/// assert!(result.advanced.is_some());
/// # Ok::<(), sonora::Error>(())
/// ```
#[derive(Clone)]
pub struct Analyzer {
    state: Arc<ArcSwap<AnalyzerState>>,
    spectrum: Arc<dyn SpectrumEstimator>,
    chords: Arc<ChordRecognizer>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("options", &self.state.load().options)
            .field("chords", &self.chords)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Analyzer with default options at 44.1 kHz.
    pub fn new() -> Result<Self> {
        AnalyzerBuilder::default().build()
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    pub(crate) fn from_parts(
        state: AnalyzerState,
        spectrum: Arc<dyn SpectrumEstimator>,
        chords: ChordRecognizer,
    ) -> Self {
        Self {
            state: Arc::new(ArcSwap::from_pointee(state)),
            spectrum,
            chords: Arc::new(chords),
        }
    }

    /// Current options.
    pub fn options(&self) -> AnalysisOptions {
        self.state.load().options.clone()
    }

    /// Current pitch detector.
    pub fn pitch_detector(&self) -> Arc<PitchDetector> {
        Arc::clone(&self.state.load().detector)
    }

    /// Replace all options.
    ///
    /// Nothing changes if `options` fail validation.
    pub fn set_options(&self, options: AnalysisOptions) -> Result<()> {
        self.update_options(|current| *current = options.clone())
    }

    /// Edit a copy of the current options and publish it.
    ///
    /// `edit` may run more than once if another thread updates concurrently.
    /// Nothing changes if the edited options fail validation.
    pub fn update_options<F>(&self, mut edit: F) -> Result<()>
    where
        F: FnMut(&mut AnalysisOptions),
    {
        loop {
            let current = self.state.load_full();
            let mut options = current.options.clone();
            edit(&mut options);

            let next = match current.reconfigure(options) {
                Ok(next) => Arc::new(next),
                Err(e) => {
                    tracing::debug!(error = %e, "options rejected");
                    return Err(e);
                }
            };

            let previous = self.state.compare_and_swap(&current, next);
            if Arc::ptr_eq(&previous, &current) {
                return Ok(());
            }
        }
    }

    pub(crate) fn snapshot(&self) -> Arc<AnalyzerState> {
        self.state.load_full()
    }

    /// Analyze a whole buffer.
    ///
    /// Volume, pitch and spectrum come from the first `fft_size` samples of
    /// the mono mix. Tempo runs over the full mix when advanced analysis is
    /// enabled.
    pub fn analyze<S: PcmSource + ?Sized>(&self, source: &S) -> Result<AnalysisResult> {
        check_source(source)?;
        let state = self.snapshot();
        let sample_rate = source.sample_rate();
        let mono = mix_to_mono(source);

        let window = &mono[..state.options.fft_size.min(mono.len())];
        let (mut result, pitch) =
            self.describe(&state, window, sample_rate, Some(source.duration()))?;

        if state.options.enable_advanced {
            let advanced = self.advanced(&state, &mono, sample_rate, &result.spectrum, pitch)?;
            result.advanced = Some(advanced);
        }

        tracing::debug!(
            duration = source.duration(),
            volume = result.volume,
            pitch = ?result.pitch(),
            advanced = result.advanced.is_some(),
            "analysis complete"
        );
        Ok(result)
    }

    /// Analyze `duration` seconds starting at `start` seconds.
    ///
    /// The end is clamped to the buffer. Tempo and chord detection never run
    /// here.
    ///
    /// # Errors
    /// [`Error::InvalidSegment`] for a negative or non-finite `start` or
    /// `duration`, or a `start` at or past the end of the buffer.
    pub fn analyze_segment<S: PcmSource + ?Sized>(
        &self,
        source: &S,
        start: f64,
        duration: f64,
    ) -> Result<AnalysisResult> {
        check_source(source)?;
        let invalid = || Error::InvalidSegment { start, duration };
        if !(start.is_finite() && duration.is_finite() && start >= 0.0 && duration >= 0.0) {
            return Err(invalid());
        }

        let sample_rate = source.sample_rate();
        let frames = source.frame_count();
        let first = (start * sample_rate).floor() as usize;
        if first >= frames {
            return Err(invalid());
        }
        let last = first
            .saturating_add((duration * sample_rate).round() as usize)
            .min(frames);

        let state = self.snapshot();
        let mono = mix_to_mono(source);
        let segment = &mono[first..last];
        let window = &segment[..state.options.fft_size.min(segment.len())];
        let seconds = segment.len() as f64 / sample_rate;

        let (result, _) = self.describe(&state, window, sample_rate, Some(seconds))?;
        Ok(result)
    }

    /// Analyze one live window without smoothing or advanced fields.
    ///
    /// Use [`Analyzer::realtime_session`] to smooth the spectrum across windows.
    pub fn analyze_realtime(&self, window: &SampleWindow) -> Result<AnalysisResult> {
        check_source(window)?;
        let state = self.snapshot();
        let (result, _) = self.describe(&state, &window.samples, window.sample_rate, None)?;
        Ok(result)
    }

    /// Stateful realtime analysis with spectrum smoothing.
    pub fn realtime_session(&self) -> RealtimeSession {
        RealtimeSession::new(self.clone())
    }

    /// Per-frame pitch over the whole mono mix, `fft_size` frames every
    /// `hop_size` samples, median-filtered to remove isolated octave jumps.
    pub fn pitch_contour<S: PcmSource + ?Sized>(
        &self,
        source: &S,
        hop_size: usize,
    ) -> Result<Vec<Option<PitchEstimate>>> {
        check_source(source)?;
        if hop_size == 0 {
            return Err(Error::InvalidOptions("hop size must be greater than 0".into()));
        }
        let state = self.snapshot();
        let detector = state.detector_at(source.sample_rate())?;
        let mono = mix_to_mono(source);

        let track = detector.detect_track(&mono, state.options.fft_size, hop_size);
        Ok(median_filter(&track, CONTOUR_SMOOTHING))
    }

    /// Volume, pitch and spectrum of one window.
    pub(crate) fn describe(
        &self,
        state: &AnalyzerState,
        window: &[f32],
        sample_rate: f64,
        duration: Option<f64>,
    ) -> Result<(AnalysisResult, Option<PitchEstimate>)> {
        let detector = state.detector_at(sample_rate)?;

        let volume = rms_volume(window);
        let pitch = detector.detect(window);
        let spectrum = self.spectrum.estimate(window, state.options.fft_size / 2);

        let result = AnalysisResult::new(duration, volume, pitch, window.to_vec(), spectrum);
        Ok((result, pitch))
    }

    fn advanced(
        &self,
        state: &AnalyzerState,
        mono: &[f32],
        sample_rate: f64,
        spectrum: &[u8],
        pitch: Option<PitchEstimate>,
    ) -> Result<AdvancedResult> {
        let tracker = BeatTracker::new(state.options.min_bpm, state.options.max_bpm)?;
        let tempo = tracker.detect(mono, sample_rate);

        let magnitudes: Vec<f32> = spectrum.iter().map(|&b| f32::from(b)).collect();
        let chroma = chromagram(&magnitudes, sample_rate);
        let chord = self.chords.recognize(&chroma);

        tracing::trace!(bpm = ?tempo.bpm, chord = ?chord.as_ref().map(|c| &c.name), "advanced analysis");
        Ok(AdvancedResult::new(tempo, chord, pitch, chroma))
    }
}

/// Reject sources no detector can interpret.
pub(crate) fn check_source<S: PcmSource + ?Sized>(source: &S) -> Result<()> {
    let sample_rate = source.sample_rate();
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(Error::InvalidBuffer(format!(
            "sample rate must be positive and finite, got {}",
            sample_rate
        )));
    }
    let frames = source.frame_count();
    for index in 0..source.channel_count() {
        let len = source.channel(index).len();
        if len != frames {
            return Err(Error::InvalidBuffer(format!(
                "channel {} has {} samples, expected {}",
                index, len, frames
            )));
        }
    }
    Ok(())
}
