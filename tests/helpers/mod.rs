//! Test helpers and fixtures for sonora integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (copies, mixing identical channels)
//! - `PITCH_TOLERANCE` (1%): Pitch accuracy on noiseless periodic input
//! - `BPM_TOLERANCE` (2): Tempo accuracy on click tracks

#![allow(dead_code)]

pub mod tolerances;

use std::path::Path;

use sonora::prelude::*;

/// Default test sample rate
pub const TEST_SAMPLE_RATE: f64 = 44100.0;

/// Analyzer with default options.
pub fn test_analyzer() -> Analyzer {
    Analyzer::new().expect("Failed to create test analyzer")
}

/// Analyzer with advanced (tempo + chord) analysis enabled.
pub fn advanced_analyzer() -> Analyzer {
    Analyzer::builder()
        .enable_advanced(true)
        .build()
        .expect("Failed to create test analyzer")
}

/// Install a fmt subscriber once; `RUST_LOG` controls the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Generate white noise (uniform in -1..1).
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / (1u64 << 31) as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Click track: 10 ms decaying 1 kHz bursts every beat, first one at `offset` seconds.
pub fn generate_click_track(bpm: f64, sample_rate: f64, seconds: f64, offset: f64) -> Vec<f32> {
    let num_samples = (sample_rate * seconds) as usize;
    let burst = (sample_rate * 0.010) as usize;
    let period = 60.0 / bpm;
    let mut samples = vec![0.0f32; num_samples];

    let mut t = offset;
    while t < seconds {
        let start = (t * sample_rate).round() as usize;
        for i in 0..burst.min(num_samples.saturating_sub(start)) {
            let phase = 2.0 * std::f64::consts::PI * 1000.0 * i as f64 / sample_rate;
            samples[start + i] = (phase.sin() * (-(i as f64) / 100.0).exp()) as f32;
        }
        t += period;
    }
    samples
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Assert a detected pitch is within `tolerance` (fraction) of `expected` Hz.
pub fn assert_pitch_near(detected: Option<f32>, expected: f32, tolerance: f32) {
    let detected = detected.unwrap_or_else(|| panic!("Expected ~{} Hz, got no pitch", expected));
    let error = ((detected - expected) / expected).abs();
    assert!(
        error < tolerance,
        "Expected ~{} Hz, got {} Hz ({:.3}% error)",
        expected,
        detected,
        error * 100.0
    );
}

// =============================================================================
// WAV I/O (decoding collaborator stand-in)
// =============================================================================

/// Planar PCM decoded from a WAV file.
#[derive(Debug)]
pub struct WavSource {
    channels: Vec<Vec<f32>>,
    sample_rate: f64,
}

impl PcmSource for WavSource {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }
}

/// Load a WAV file into planar channels.
pub fn load_wav_file(path: &Path) -> Result<WavSource, String> {
    use hound::WavReader;

    let reader = WavReader::open(path)
        .map_err(|e| format!("Failed to open WAV '{}': {}", path.display(), e))?;

    let spec = reader.spec();
    let channel_count = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Failed to read float samples: {}", e))?,
        hound::SampleFormat::Int => {
            let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| format!("Failed to read int samples: {}", e))?
                .into_iter()
                .map(|s| s as f32 / max_val)
                .collect()
        }
    };

    let mut channels = vec![Vec::with_capacity(samples.len() / channel_count); channel_count];
    for frame in samples.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok(WavSource {
        channels,
        sample_rate: spec.sample_rate as f64,
    })
}

/// Save planar channels to a 32-bit float WAV file.
pub fn save_wav_file(path: &Path, channels: &[Vec<f32>], sample_rate: u32) -> Result<(), String> {
    use hound::{WavSpec, WavWriter};

    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|e| format!("Failed to create WAV: {}", e))?;

    let len = channels.iter().map(Vec::len).min().unwrap_or(0);
    for i in 0..len {
        for channel in channels {
            writer
                .write_sample(channel[i])
                .map_err(|e| format!("Write error: {}", e))?;
        }
    }

    writer
        .finalize()
        .map_err(|e| format!("Finalize error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine() {
        let samples = generate_sine(440.0, 44100.0, 44100);
        assert_eq!(samples.len(), 44100);
        assert!(rms(&samples) > 0.5);
        assert!(peak(&samples) <= 1.0);
    }

    #[test]
    fn test_noise_is_centred() {
        let noise = generate_noise(44100, 3);
        let mean: f32 = noise.iter().sum::<f32>() / noise.len() as f32;
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!(peak(&noise) <= 1.0);
    }
}
