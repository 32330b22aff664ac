//! Tolerance constants for analysis testing.
//!
//! Different descriptors carry different precision guarantees.

/// Floating point rounding errors (copies, mixing identical channels).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Relative pitch error allowed on noiseless periodic input (1%).
pub const PITCH_TOLERANCE: f32 = 0.01;

/// Tempo error allowed on synthetic click tracks (BPM).
pub const BPM_TOLERANCE: i64 = 2;

/// One equal-tempered semitone as a frequency ratio.
pub const SEMITONE_RATIO: f32 = 1.059_463_1;

/// Full-scale sine volume lower bound (√2-scaled RMS over a partial period).
pub const FULL_SCALE_VOLUME: f32 = 0.99;
