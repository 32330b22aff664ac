//! Frequency <-> note name conversion
//!
//! Twelve-tone equal temperament with A4 = 440 Hz (MIDI note 69). Names use
//! sharps and scientific octave numbering, so C4 is middle C (MIDI 60) and
//! MIDI 0 is `C-1`.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// Reference pitch for A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

/// MIDI note number of A4.
pub const A4_MIDI: i32 = 69;

/// Pitch-class names with sharp notation, index = pitch class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Fractional MIDI note number: `69 + 12 * log2(f / 440)`.
pub(crate) fn midi_from_frequency(frequency: f64) -> f64 {
    A4_MIDI as f64 + 12.0 * (frequency / A4_FREQUENCY).log2()
}

/// Convert frequency to the nearest MIDI note and its cents offset.
///
/// Returns `None` for non-positive or non-finite frequencies.
pub fn freq_to_midi(frequency: f32) -> Option<(i32, f32)> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return None;
    }

    let note_float = midi_from_frequency(frequency as f64);
    let note = note_float.round() as i32;
    let cents = ((note_float - note as f64) * 100.0) as f32;

    Some((note, cents))
}

/// Convert MIDI note number to frequency
///
/// Saturates to `inf` or `0.0` for notes far outside the audible range.
pub fn midi_to_freq(note: i32) -> f32 {
    (A4_FREQUENCY * 2f64.powf((note as f64 - A4_MIDI as f64) / 12.0)) as f32
}

/// A pitch class plus octave, e.g. `C#4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NoteName {
    /// 0 = C .. 11 = B
    pub pitch_class: u8,
    pub octave: i32,
}

impl NoteName {
    pub fn from_midi(note: i32) -> Self {
        Self {
            pitch_class: note.rem_euclid(12) as u8,
            octave: note.div_euclid(12) - 1,
        }
    }

    pub fn midi(&self) -> i32 {
        (self.octave + 1) * 12 + self.pitch_class as i32
    }

    pub fn frequency(&self) -> f32 {
        midi_to_freq(self.midi())
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NOTE_NAMES[self.pitch_class as usize], self.octave)
    }
}

impl FromStr for NoteName {
    type Err = Error;

    /// Parses `<letter>[#]<octave>`: letter `A`-`G` (either case), an optional
    /// sharp, then a possibly negative integer octave.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidNoteName(s.to_string());

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let natural: u8 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let (sharp, octave_str) = match rest.strip_prefix('#') {
            Some(octave) => (1, octave),
            None => (0, rest),
        };

        let digits = octave_str.strip_prefix('-').unwrap_or(octave_str);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let octave: i32 = octave_str.parse().map_err(|_| invalid())?;

        // B# rolls over into the next octave.
        let midi = octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|m| m.checked_add((natural + sharp) as i32))
            .ok_or_else(invalid)?;

        // Must map to a representable, non-zero frequency.
        let frequency = midi_to_freq(midi);
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(invalid());
        }
        Ok(Self::from_midi(midi))
    }
}

/// Nearest note name for a frequency, e.g. 440.0 -> "A4".
///
/// Returns `None` for non-positive or non-finite frequencies.
pub fn frequency_to_note(frequency: f32) -> Option<String> {
    freq_to_midi(frequency).map(|(note, _)| NoteName::from_midi(note).to_string())
}

/// Frequency of a note name, e.g. "A4" -> 440.0.
pub fn note_to_frequency(name: &str) -> Result<f32> {
    name.parse::<NoteName>().map(|note| note.frequency())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_reference_notes() {
        assert_eq!(note_to_frequency("A4").unwrap(), 440.0);
        assert_abs_diff_eq!(note_to_frequency("C4").unwrap(), 261.63, epsilon = 0.01);
        assert_abs_diff_eq!(note_to_frequency("C#4").unwrap(), 277.18, epsilon = 0.01);
        assert_abs_diff_eq!(note_to_frequency("a3").unwrap(), 220.0, epsilon = 1e-3);
    }

    #[test]
    fn test_frequency_to_note() {
        assert_eq!(frequency_to_note(440.0).as_deref(), Some("A4"));
        assert_eq!(frequency_to_note(261.63).as_deref(), Some("C4"));
        assert_eq!(frequency_to_note(27.5).as_deref(), Some("A0"));
        assert_eq!(frequency_to_note(8.18).as_deref(), Some("C-1"));
        assert_eq!(frequency_to_note(0.0), None);
        assert_eq!(frequency_to_note(-3.0), None);
        assert_eq!(frequency_to_note(f32::NAN), None);
    }

    #[test]
    fn test_malformed_names_rejected() {
        for name in [
            "",
            "H4",
            "A",
            "A#",
            "Ab4",
            "A4x",
            "#4",
            "A--1",
            "A 4",
            "4A",
            "C999999999",
            "C-178956971",
            "C178956969",
            "A1000",
            "A-1000",
        ] {
            assert!(
                matches!(note_to_frequency(name), Err(Error::InvalidNoteName(_))),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_note_name_parse_and_display() {
        let note: NoteName = "C-1".parse().unwrap();
        assert_eq!(note.midi(), 0);
        assert_eq!(note.to_string(), "C-1");

        let note: NoteName = "B#3".parse().unwrap();
        assert_eq!(note.to_string(), "C4");

        let note: NoteName = "F#5".parse().unwrap();
        assert_eq!(note, NoteName { pitch_class: 6, octave: 5 });
    }

    #[test]
    fn test_midi_to_freq_extremes() {
        assert_eq!(midi_to_freq(i32::MIN), 0.0);
        assert_eq!(midi_to_freq(i32::MAX), f32::INFINITY);
        assert_abs_diff_eq!(midi_to_freq(0), 8.1758, epsilon = 1e-3);
    }

    #[test]
    fn test_freq_midi_conversion() {
        let (note, cents) = freq_to_midi(440.0).unwrap();
        assert_eq!(note, 69);
        assert!(cents.abs() < 1e-3);

        let (note, cents) = freq_to_midi(261.63).unwrap();
        assert_eq!(note, 60);
        assert!(cents.abs() < 5.0);

        for midi in [0, 21, 36, 48, 60, 69, 72, 84, 96, 127] {
            let (back, cents) = freq_to_midi(midi_to_freq(midi)).unwrap();
            assert_eq!(back, midi, "Round trip failed for MIDI {}", midi);
            assert!(cents.abs() < 0.01);
        }
    }

    proptest! {
        #[test]
        fn note_round_trip_within_a_semitone(frequency in 20.0f32..8000.0) {
            let name = frequency_to_note(frequency).unwrap();
            let back = note_to_frequency(&name).unwrap();
            let ratio = (back / frequency).max(frequency / back);
            prop_assert!(ratio < 1.0595, "{} Hz -> {} -> {} Hz", frequency, name, back);
        }
    }
}
