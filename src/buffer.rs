//! An in-memory provider of raw source samples.
//!
//! The `SamplesBuffer` struct holds interleaved raw samples, such as a decoded instrument
//! sample, and serves them to a resampler by frame index.
//!
//! # Example
//!
//! ```
//! use tracker_resample::buffer::SamplesBuffer;
//! use tracker_resample::SampleSource;
//!
//! let buffer = SamplesBuffer::new(1, 8363, vec![1i16, 2, 3, 4, 5, 6]);
//! assert_eq!(buffer.frames(), 6);
//! assert_eq!(buffer.sample(0, 2), 3);
//! ```
//!

use std::sync::Arc;
use std::time::Duration;

use crate::common::{ChannelCount, SampleRate};
use crate::format::{BitDepth, RawSample, SampleFormat};
use crate::math::delta_for_rates;
use crate::source::SampleSource;

/// What a [`SamplesBuffer`] returns for frames outside its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutOfRange {
    /// Repeat the nearest frame inside the data.
    Clamp,

    /// Read silence.
    #[default]
    Zero,
}

/// A buffer of interleaved raw samples treated as a sample provider.
#[derive(Debug, Clone)]
pub struct SamplesBuffer<S> {
    data: Arc<[S]>,
    channels: ChannelCount,
    sample_rate: SampleRate,
    out_of_range: OutOfRange,
}

impl<S> SamplesBuffer<S>
where
    S: RawSample,
{
    /// Builds a new `SamplesBuffer`.
    ///
    /// # Panic
    ///
    /// - Panics if the number of channels is zero.
    /// - Panics if the samples rate is zero.
    ///
    pub fn new<D>(channels: ChannelCount, sample_rate: SampleRate, data: D) -> SamplesBuffer<S>
    where
        D: Into<Vec<S>>,
    {
        assert!(channels != 0);
        assert!(sample_rate != 0);

        let data: Vec<S> = data.into();
        SamplesBuffer {
            data: data.into(),
            channels,
            sample_rate,
            out_of_range: OutOfRange::default(),
        }
    }

    /// Sets what frames outside the data read as.
    pub fn with_out_of_range(mut self, out_of_range: OutOfRange) -> SamplesBuffer<S> {
        self.out_of_range = out_of_range;
        self
    }

    /// Number of channels the data is interleaved with.
    #[inline]
    pub fn channels(&self) -> ChannelCount {
        self.channels
    }

    /// Bit depth of the samples, which decides the [`SampleFormat`] to resample them with.
    #[inline]
    pub fn depth(&self) -> BitDepth {
        S::Format::DEPTH
    }

    /// Rate the data was recorded at.
    #[inline]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Number of whole frames in the buffer.
    #[inline]
    pub fn frames(&self) -> usize {
        self.data.len() / self.channels as usize
    }

    /// Length of the buffer played at its own rate.
    pub fn duration(&self) -> Duration {
        let frames = self.frames() as u64;
        let rate = self.sample_rate as u64;
        Duration::new(
            frames / rate,
            ((frames % rate) * 1_000_000_000 / rate) as u32,
        )
    }

    /// Delta that plays this buffer at its own pitch on an output running at `output_rate`.
    pub fn delta_for(&self, output_rate: SampleRate) -> f64 {
        delta_for_rates(self.sample_rate, output_rate)
    }

    /// The raw interleaved samples.
    #[inline]
    pub fn as_slice(&self) -> &[S] {
        &self.data
    }
}

impl<S> SampleSource for SamplesBuffer<S>
where
    S: RawSample,
{
    #[inline]
    fn sample(&self, channel: usize, index: i64) -> i32 {
        let frames = self.frames();
        if frames == 0 {
            return 0;
        }
        let frame = match usize::try_from(index) {
            Ok(frame) if frame < frames => frame,
            _ => match self.out_of_range {
                OutOfRange::Zero => return 0,
                OutOfRange::Clamp if index < 0 => 0,
                OutOfRange::Clamp => frames - 1,
            },
        };
        let channels = self.channels as usize;
        let channel = channel.min(channels - 1);
        self.data[frame * channels + channel].to_raw()
    }
}
