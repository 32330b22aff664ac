//! Chord recognition by chromagram template matching
//!
//! Every root (C..B) is scored against every template. A template's score is
//! the chroma energy on its pitch classes minus 0.3 × the energy on all
//! other pitch classes. The best (root, template) pair wins; ties keep the
//! first pair in root order, then template declaration order.
//!
//! ## Confidence
//!
//! `confidence = score / 3` and is **not** clamped: a strong triad with a quiet
//! background reads close to 1.0, while dense chroma can push it negative.
//! Treat it as a relative strength, not a probability.

use crate::chroma::{Chromagram, PITCH_CLASSES};
use crate::note::NOTE_NAMES;

/// Weight applied to energy outside the template.
const FOREIGN_TONE_PENALTY: f32 = 0.3;

/// Below this peak chroma energy there is nothing to recognize.
const SILENCE_LEVEL: f32 = 1e-6;

/// Chord quality reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Suspended,
    Unknown,
}

impl ChordQuality {
    /// Quality for a template label; unrecognized labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "major" => ChordQuality::Major,
            "minor" => ChordQuality::Minor,
            "dim" => ChordQuality::Diminished,
            "aug" => ChordQuality::Augmented,
            "sus4" | "sus2" => ChordQuality::Suspended,
            _ => ChordQuality::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Augmented => "augmented",
            ChordQuality::Suspended => "suspended",
            ChordQuality::Unknown => "unknown",
        }
    }
}

/// A chord shape as semitone intervals above the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordTemplate {
    /// Template label, mapped to a quality by [`ChordQuality::from_label`]
    pub label: &'static str,
    /// Suffix appended to the root in display names ("" for major)
    pub suffix: &'static str,
    /// Intervals in semitones, root first
    pub intervals: &'static [u8],
}

impl ChordTemplate {
    pub fn quality(&self) -> ChordQuality {
        ChordQuality::from_label(self.label)
    }

    fn contains(&self, interval: usize) -> bool {
        self.intervals.iter().any(|&i| i as usize == interval)
    }
}

/// Templates in tie-break order.
pub const TEMPLATES: [ChordTemplate; 6] = [
    ChordTemplate {
        label: "major",
        suffix: "",
        intervals: &[0, 4, 7],
    },
    ChordTemplate {
        label: "minor",
        suffix: "m",
        intervals: &[0, 3, 7],
    },
    ChordTemplate {
        label: "dim",
        suffix: "dim",
        intervals: &[0, 3, 6],
    },
    ChordTemplate {
        label: "aug",
        suffix: "aug",
        intervals: &[0, 4, 8],
    },
    ChordTemplate {
        label: "sus4",
        suffix: "sus4",
        intervals: &[0, 5, 7],
    },
    ChordTemplate {
        label: "sus2",
        suffix: "sus2",
        intervals: &[0, 2, 7],
    },
];

/// A recognized chord
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ChordInfo {
    /// Root pitch-class name, e.g. "C#"
    pub root: String,
    pub quality: ChordQuality,
    /// Display name, e.g. "C#m"
    pub name: String,
    /// Constituent pitch-class names, root first
    pub notes: Vec<String>,
    /// `score / 3`, unbounded (see module docs)
    pub confidence: f32,
}

/// Chromagram template matcher
#[derive(Debug, Clone)]
pub struct ChordRecognizer {
    templates: Vec<ChordTemplate>,
}

impl Default for ChordRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordRecognizer {
    /// Recognizer over the six built-in templates
    pub fn new() -> Self {
        Self::with_templates(TEMPLATES.to_vec())
    }

    /// Recognizer over a custom template set (declaration order breaks ties)
    pub fn with_templates(templates: Vec<ChordTemplate>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[ChordTemplate] {
        &self.templates
    }

    /// Find the best-matching chord, or `None` for an empty chromagram.
    pub fn recognize(&self, chroma: &Chromagram) -> Option<ChordInfo> {
        let peak = chroma.iter().copied().fold(0.0f32, f32::max);
        if !(peak > SILENCE_LEVEL) {
            return None;
        }

        let mut best: Option<(usize, &ChordTemplate, f32)> = None;
        for root in 0..PITCH_CLASSES {
            for template in &self.templates {
                let score = Self::score(chroma, root, template);
                if best.map_or(true, |(_, _, best_score)| score > best_score) {
                    best = Some((root, template, score));
                }
            }
        }

        let (root, template, score) = best?;
        let root_name = NOTE_NAMES[root];
        Some(ChordInfo {
            root: root_name.to_string(),
            quality: template.quality(),
            name: format!("{}{}", root_name, template.suffix),
            notes: template
                .intervals
                .iter()
                .map(|&i| NOTE_NAMES[(root + i as usize) % PITCH_CLASSES].to_string())
                .collect(),
            confidence: score / 3.0,
        })
    }

    fn score(chroma: &Chromagram, root: usize, template: &ChordTemplate) -> f32 {
        let (matched, foreign) = chroma.iter().enumerate().fold(
            (0.0f32, 0.0f32),
            |(matched, foreign), (pitch_class, &energy)| {
                let interval = (pitch_class + PITCH_CLASSES - root) % PITCH_CLASSES;
                if template.contains(interval) {
                    (matched + energy, foreign)
                } else {
                    (matched, foreign + energy)
                }
            },
        );
        matched - FOREIGN_TONE_PENALTY * foreign
    }
}
