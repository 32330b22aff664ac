//! Coarse spectrum approximation
//!
//! Produces a byte-scaled, dB-like magnitude per frequency bin from a
//! time-domain window without running an FFT. The default
//! [`EnergyBucketSpectrum`] splits the window into `bin_count` equal runs of
//! samples and maps each run's RMS level onto `0..=255`.
//!
//! This is a precision compromise: bucket *k* reflects the energy of the
//! k-th slice of time, not of the k-th frequency band. Anything implementing
//! [`SpectrumEstimator`] can replace it, since the chromagram only needs one
//! magnitude per bin plus the sample rate.

/// Produces one byte-scaled magnitude per frequency bin.
pub trait SpectrumEstimator: Send + Sync {
    /// Estimate `bin_count` magnitudes covering `0..sample_rate / 2`.
    fn estimate(&self, samples: &[f32], bin_count: usize) -> Vec<u8>;
}

/// Energy-bucket pseudo-spectrum with a linear dB-to-byte mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBucketSpectrum {
    /// Level mapped to 0
    pub min_decibels: f32,
    /// Level mapped to 255
    pub max_decibels: f32,
}

impl Default for EnergyBucketSpectrum {
    fn default() -> Self {
        Self {
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl EnergyBucketSpectrum {
    fn to_byte(&self, rms: f32) -> u8 {
        if rms <= 0.0 || !rms.is_finite() {
            return 0;
        }
        let db = 20.0 * rms.log10();
        let range = self.max_decibels - self.min_decibels;
        let scaled = (db - self.min_decibels) / range * 255.0;
        scaled.clamp(0.0, 255.0) as u8
    }
}

impl SpectrumEstimator for EnergyBucketSpectrum {
    fn estimate(&self, samples: &[f32], bin_count: usize) -> Vec<u8> {
        if bin_count == 0 {
            return Vec::new();
        }

        let bucket_len = (samples.len() / bin_count).max(1);
        let mut spectrum = vec![0u8; bin_count];

        for (bin, bucket) in spectrum.iter_mut().zip(samples.chunks(bucket_len)) {
            let sum_sq: f32 = bucket.iter().map(|s| s * s).sum();
            let rms = (sum_sq / bucket.len() as f32).sqrt();
            *bin = self.to_byte(rms);
        }

        spectrum
    }
}
