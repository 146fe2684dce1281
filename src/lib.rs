//! Fixed-point resampling and mixing core for tracker-music playback.
//!
//! A [`Resampler`] plays a window of raw 8, 16 or 24-bit PCM samples at an arbitrary,
//! per-call rate, with a choice of four interpolation kernels and a linear volume fade per
//! channel. Output always lands on a common 24-bit scale and consecutive calls continue
//! seamlessly, so a host can pull audio in whatever block size suits it.
//!
//! The crate is organized like this:
//!
//! - A [`SampleSource`] serves raw samples by channel and frame index. Any closure
//!   `Fn(usize, i64) -> i32` is one, and [`buffer::SamplesBuffer`] serves interleaved samples
//!   held in memory.
//! - A [`Resampler`] is generic over the [`SampleFormat`] of its source: [`Bits8`], [`Bits16`]
//!   or [`Bits24`]. [`Resampler::from_buffer`] takes the format from the sample type of a
//!   buffer. When the depth is only known at runtime use [`AnyResampler`] instead.
//! - Each call takes one [`VolumeRamp`] per channel and a delta, the number of source frames
//!   to move per produced frame.
//!
//! # Example
//!
//! ```
//! use tracker_resample::buffer::SamplesBuffer;
//! use tracker_resample::{conversions, Quality, Resampler, VolumeRamp};
//!
//! let sample = SamplesBuffer::new(1, 8363, vec![0i16, 4000, 8000, 4000, 0, -4000, -8000, -4000]);
//! let mut resampler = Resampler::from_buffer(&sample, 0, 0, 8, Some(Quality::Cubic))?;
//!
//! // play at the rate of a 44.1 kHz output and fade in over the block
//! let delta = sample.delta_for(44_100);
//! let mut volume = VolumeRamp::fade(0.0, 1.0);
//! let mut block = [0; 32];
//! let produced = resampler.resample_1_1(&mut block, &mut volume, delta);
//! assert_eq!(produced, 32);
//! assert_eq!(volume.volume, 1.0);
//!
//! let float = conversions::to_float(block[31]);
//! assert!(float.abs() <= 1.0);
//! # Ok::<(), tracker_resample::ResampleError>(())
//! ```
//!
//! # Lookup tables
//!
//! The cubic and sinc kernels read process-wide tables that are generated on first use.
//! Starting or resetting a resampler generates them. Call [`tables::ensure_tables`] up front
//! to keep the generation off an audio thread.
//!
//! # Optional Features
//!
//! - **`tracing`**: emits `tracing` events for table generation and resampler lifecycle
//!   changes. Nothing is logged per sample.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

mod common;
mod dispatch;
mod format;
mod kernel;
mod math;
mod quality;
mod ramp;
mod resampler;
mod source;

pub mod buffer;
pub mod constants;
pub mod conversions;
pub mod tables;

pub use crate::common::{ChannelCount, Sample, SampleRate};
pub use crate::dispatch::AnyResampler;
pub use crate::format::{BitDepth, Bits16, Bits24, Bits8, RawSample, SampleFormat};
pub use crate::math::delta_for_rates;
pub use crate::quality::{default_quality, set_default_quality, Quality};
pub use crate::ramp::VolumeRamp;
pub use crate::resampler::{Direction, Pickup, ResampleError, Resampler, Shape, Window};
pub use crate::source::{EdgeFill, SampleSource};
