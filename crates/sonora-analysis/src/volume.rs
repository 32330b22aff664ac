//! Loudness estimation

/// RMS volume of a window, normalized to `[0, 1]`.
///
/// The RMS is scaled by √2 so that a full-scale sine (RMS = 1/√2) reads ~1.0,
/// then clamped. An empty window reads 0.0.
pub fn rms_volume(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_sq / samples.len() as f64).sqrt();
    let volume = (rms * core::f64::consts::SQRT_2) as f32;

    if volume.is_nan() {
        0.0
    } else {
        volume.min(1.0)
    }
}
