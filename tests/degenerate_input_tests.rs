//! Degenerate input tests
//!
//! Silence, noise, empty and out-of-range buffers must yield "nothing
//! detected" rather than errors or NaN.
//!
//! Run with:
//! ```bash
//! cargo test -p sonora --test degenerate_input_tests
//! ```

#[path = "helpers/mod.rs"]
mod helpers;

use helpers::{
    advanced_analyzer, generate_noise, generate_silence, test_analyzer, TEST_SAMPLE_RATE,
};
use proptest::prelude::*;
use sonora::prelude::*;

#[test]
fn test_silence() {
    let analyzer = advanced_analyzer();
    let buffer = AudioBuffer::from_mono(generate_silence(44100), TEST_SAMPLE_RATE);

    let result = analyzer.analyze(&buffer).unwrap();
    assert_eq!(result.volume, 0.0);
    assert_eq!(result.pitch(), None);
    assert_eq!(result.note(), None);
    assert!(result.spectrum.iter().all(|&b| b == 0));

    let advanced = result.advanced.unwrap();
    assert_eq!(advanced.bpm, None);
    assert_eq!(advanced.bpm_confidence, 0.0);
    assert_eq!(advanced.chord, None);
    assert_eq!(advanced.chromagram, [0.0; 12]);
    assert!(advanced.beat_positions.is_empty());
}

#[test]
fn test_white_noise_has_no_pitch() {
    let analyzer = test_analyzer();
    let buffer = AudioBuffer::from_mono(generate_noise(44100, 42), TEST_SAMPLE_RATE);

    let result = analyzer.analyze(&buffer).unwrap();
    assert_eq!(result.pitch(), None);
    assert_eq!(result.note(), None);
    assert!(result.volume > 0.0);
}

#[test]
fn test_empty_buffer() {
    let analyzer = advanced_analyzer();
    let buffer = AudioBuffer::from_mono(Vec::new(), TEST_SAMPLE_RATE);

    let result = analyzer.analyze(&buffer).unwrap();
    assert_eq!(result.volume, 0.0);
    assert_eq!(result.pitch(), None);
    assert_eq!(result.duration, Some(0.0));
    assert!(result.waveform.is_empty());

    let advanced = result.advanced.unwrap();
    assert_eq!(advanced.bpm, None);
    assert_eq!(advanced.chord, None);
}

#[test]
fn test_no_channels() {
    let analyzer = test_analyzer();
    let buffer = AudioBuffer::from_channels(Vec::new(), TEST_SAMPLE_RATE).unwrap();
    let result = analyzer.analyze(&buffer).unwrap();
    assert_eq!(result.volume, 0.0);
    assert_eq!(result.pitch(), None);
}

#[test]
fn test_clipped_input_volume_is_clamped() {
    let analyzer = test_analyzer();
    let loud: Vec<f32> = generate_noise(4096, 9).iter().map(|s| s * 8.0).collect();
    let result = analyzer.analyze(&AudioBuffer::from_mono(loud, TEST_SAMPLE_RATE)).unwrap();
    assert_eq!(result.volume, 1.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn volume_always_in_unit_range(
        samples in prop::collection::vec(-4.0f32..4.0, 0..4096),
        gain in 0.0f32..16.0,
    ) {
        let scaled: Vec<f32> = samples.iter().map(|s| s * gain).collect();
        let analyzer = Analyzer::new().unwrap();
        let result = analyzer.analyze_realtime(&SampleWindow::new(scaled, 44100.0)).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.volume), "{}", result.volume);
        prop_assert_eq!(result.pitch().is_some(), result.note().is_some());
    }
}
