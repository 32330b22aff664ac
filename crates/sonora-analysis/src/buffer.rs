//! Sample buffers and channel mixing
//!
//! Decoding compressed audio is left to the caller. Anything that can hand
//! out planar `f32` channels at a known sample rate implements [`PcmSource`],
//! and [`mix_to_mono`] reduces it to the single averaged channel every
//! detector in this crate expects.

use crate::error::{Error, Result};

/// A decoded, planar PCM source.
///
/// Samples are expected in `[-1, 1]`. Detectors tolerate values outside that
/// range (volume clamps), but the byte-scaled spectrum assumes it.
pub trait PcmSource {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> f64;

    /// Number of channels.
    fn channel_count(&self) -> usize;

    /// Number of samples in each channel.
    fn frame_count(&self) -> usize;

    /// Samples of one channel. Panics if `index >= channel_count()`.
    fn channel(&self, index: usize) -> &[f32];

    /// Duration in seconds.
    fn duration(&self) -> f64 {
        if self.sample_rate() > 0.0 {
            self.frame_count() as f64 / self.sample_rate()
        } else {
            0.0
        }
    }
}

/// Owned planar audio buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: f64,
}

impl AudioBuffer {
    /// Single-channel buffer.
    pub fn from_mono(samples: Vec<f32>, sample_rate: f64) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    /// Planar buffer. All channels must have the same length.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: f64) -> Result<Self> {
        if let Some(first) = channels.first() {
            let len = first.len();
            if let Some(bad) = channels.iter().position(|c| c.len() != len) {
                return Err(Error::InvalidBuffer(format!(
                    "channel {} has {} samples, expected {}",
                    bad,
                    channels[bad].len(),
                    len
                )));
            }
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// De-interleave `[L0, R0, L1, R1, ...]` style data.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(interleaved: &[f32], channel_count: usize, sample_rate: f64) -> Result<Self> {
        if channel_count == 0 {
            return Err(Error::InvalidBuffer(
                "channel count must be greater than 0".into(),
            ));
        }

        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }
}

impl PcmSource for AudioBuffer {
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

/// Average all channels of `source` into one.
///
/// A mono source is copied as-is; a source with no channels yields an empty vec.
pub fn mix_to_mono<S: PcmSource + ?Sized>(source: &S) -> Vec<f32> {
    let channel_count = source.channel_count();
    match channel_count {
        0 => Vec::new(),
        1 => source.channel(0).to_vec(),
        _ => {
            let frames = source.frame_count();
            let mut mono = vec![0.0f32; frames];
            for index in 0..channel_count {
                for (acc, &sample) in mono.iter_mut().zip(source.channel(index)) {
                    *acc += sample;
                }
            }
            let scale = 1.0 / channel_count as f32;
            for sample in &mut mono {
                *sample *= scale;
            }
            mono
        }
    }
}

/// A fixed run of mono samples at a known rate, owned by whoever analyzes it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SampleWindow {
    pub samples: Vec<f32>,
    pub sample_rate: f64,
}

impl SampleWindow {
    pub fn new(samples: Vec<f32>, sample_rate: f64) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0.0 for a non-positive sample rate).
    pub fn duration(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.samples.len() as f64 / self.sample_rate
        } else {
            0.0
        }
    }
}

impl PcmSource for SampleWindow {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn channel_count(&self) -> usize {
        1
    }

    fn frame_count(&self) -> usize {
        self.samples.len()
    }

    fn channel(&self, index: usize) -> &[f32] {
        assert_eq!(index, 0, "SampleWindow has a single channel");
        &self.samples
    }
}
