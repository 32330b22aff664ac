//! Chromagram extraction
//!
//! Folds a magnitude spectrum into 12 octave-independent pitch classes
//! (0 = C .. 11 = B), normalized by the strongest class.

use crate::note::midi_from_frequency;

/// Number of pitch classes in an octave.
pub const PITCH_CLASSES: usize = 12;

/// Pitch-class energies in `[0, 1]`, index = pitch class.
pub type Chromagram = [f32; PITCH_CLASSES];

/// Compute a chromagram from spectrum magnitudes.
///
/// Bin `i` of `N` is centred on `(i / N) * sample_rate / 2`. Its magnitude is
/// added to the pitch class of the nearest equal-tempered note. Bins at or
/// below 0 Hz are skipped. The result is divided by its maximum (left at zero
/// when every bin is empty).
pub fn chromagram(magnitudes: &[f32], sample_rate: f64) -> Chromagram {
    let mut chroma = [0.0f32; PITCH_CLASSES];
    let bin_count = magnitudes.len();
    if bin_count == 0 || !(sample_rate > 0.0) {
        return chroma;
    }

    let nyquist = sample_rate / 2.0;
    for (i, &magnitude) in magnitudes.iter().enumerate() {
        let frequency = i as f64 / bin_count as f64 * nyquist;
        if frequency <= 0.0 || !magnitude.is_finite() {
            continue;
        }
        let midi = midi_from_frequency(frequency).round() as i64;
        let pitch_class = midi.rem_euclid(PITCH_CLASSES as i64) as usize;
        chroma[pitch_class] += magnitude;
    }

    let max = chroma.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        for value in &mut chroma {
            *value /= max;
        }
    }

    chroma
}
