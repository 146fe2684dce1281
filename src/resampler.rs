//! The resampling state machine.
//!
//! A [`Resampler`] plays one window of a [`SampleSource`] at an arbitrary, per-call rate. It owns
//! a fixed-point position, the kernel history around that position and the interpolation routines
//! selected for its quality. Consecutive calls continue exactly where the previous call stopped,
//! so producing a block in one call or in several gives the same samples.
//!
//! # Example
//!
//! ```
//! use tracker_resample::{Quality, Resampler, VolumeRamp};
//! use tracker_resample::buffer::SamplesBuffer;
//!
//! let data = SamplesBuffer::new(1, 8363, vec![0i16, 1000, 2000, 1000, 0, -1000, -2000, -1000]);
//! let mut resampler = Resampler::from_buffer(&data, 0, 0, 7, Some(Quality::Linear))?;
//!
//! let mut out = [0; 4];
//! let produced = resampler.resample_1_1(&mut out, &mut VolumeRamp::unity(), 0.5);
//! assert_eq!(produced, 4);
//! // output is on a 24-bit scale, 16-bit input sits 8 bits up
//! assert_eq!(out.map(|s| s >> 8), [0, 500, 1000, 1500]);
//! # Ok::<(), tracker_resample::ResampleError>(())
//! ```
//!
//! # Windows and pickups
//!
//! Playback is confined to `[start, end]`. Moving forward the position must stay below `end`,
//! moving backward it must stay at or above `start`. When it crosses a bound the resampler asks
//! its pickup hook, if it has one, what to do. The hook can wrap the position to build a loop,
//! flip the direction for a ping-pong loop or move the bounds. Without a hook, or when the hook
//! gives up, the position is clamped onto the bound and the resampler is exhausted until the
//! next [`reset`](Resampler::reset).

mod mix;

use std::collections::TryReserveError;
use std::fmt;

use crate::buffer::SamplesBuffer;
use crate::common::{ChannelCount, Sample};
use crate::constants::{MAX_CHANNELS, MAX_TAPS, SUBPOS_BITS, SUBPOS_MASK};
use crate::format::{BitDepth, RawSample, SampleFormat};
use crate::quality::{default_quality, Quality};
use crate::ramp::VolumeRamp;
use crate::source::{EdgeFill, SampleSource};
use crate::tables::ensure_tables;

use mix::Routines;

pub use mix::Shape;

/// Errors that might occur when starting a resampler.
#[derive(Debug, thiserror::Error)]
pub enum ResampleError {
    /// The kernel history could not be allocated.
    #[error("could not allocate the resampler history")]
    Allocation(#[from] TryReserveError),
}

/// Playback direction through the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Increasing source index.
    #[default]
    Forward,

    /// Decreasing source index.
    Backward,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    #[inline]
    fn flipped_if(self, flip: bool) -> Direction {
        if flip {
            self.reversed()
        } else {
            self
        }
    }
}

/// Position and bounds of a resampler, as seen and edited by a pickup hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// Whole part of the position.
    pub position: i64,

    /// Fractional part of the position, in 1/65536 of a sample.
    pub subpos: i32,

    /// First playable frame.
    pub start: i64,

    /// Frame playback stops at.
    pub end: i64,

    /// Direction playback is moving in.
    pub direction: Direction,
}

impl Window {
    /// Returns `true` if playback in [`direction`](Window::direction) can continue from the
    /// current position.
    pub fn contains_position(&self) -> bool {
        match self.direction {
            Direction::Forward => self.position < self.end,
            Direction::Backward => self.position >= self.start,
        }
    }

    /// Length of the window in frames.
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    /// Returns `true` if the window holds no frames.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Hook run when playback crosses a window bound. Returning `false` ends playback.
pub type Pickup<'a> = Box<dyn FnMut(&mut Window) -> bool + 'a>;

/// Heap-owning state that survives a change of sample format.
pub(crate) struct Parts<'a> {
    history: Vec<[i32; MAX_TAPS]>,
    pickup: Option<Pickup<'a>>,
    edge_fill: EdgeFill,
}

impl Parts<'_> {
    pub(crate) fn allocate() -> Result<Self, ResampleError> {
        let mut history = Vec::new();
        history.try_reserve_exact(MAX_CHANNELS)?;
        Ok(Parts {
            history,
            pickup: None,
            edge_fill: EdgeFill::default(),
        })
    }
}

/// Resampler over a source of samples in format `F`.
///
/// Output samples are always on a 24-bit scale, see [`Sample`].
pub struct Resampler<'a, F: SampleFormat> {
    source: &'a dyn SampleSource,
    channels: usize,
    pos: i64,
    subpos: i32,
    start: i64,
    end: i64,
    direction: Direction,
    quality: Quality,
    taps: usize,
    edge_fill: EdgeFill,
    exhausted: bool,
    // one kernel window per source channel
    history: Vec<[i32; MAX_TAPS]>,
    pickup: Option<Pickup<'a>>,
    routines: Routines<'a, F>,
}

impl<'a, F: SampleFormat> Resampler<'a, F> {
    /// Creates a resampler playing `source` from `position` within `[start, end]`.
    ///
    /// `channels` is clamped to 1 or 2, `end` is raised to `start` if it lies before it and
    /// `position` is clamped into the window. `quality` falls back to
    /// [`default_quality`](crate::default_quality).
    ///
    /// # Errors
    ///
    /// Fails only when the kernel history cannot be allocated.
    pub fn start(
        source: &'a dyn SampleSource,
        channels: ChannelCount,
        position: i64,
        start: i64,
        end: i64,
        quality: Option<Quality>,
    ) -> Result<Self, ResampleError> {
        let parts = Parts::allocate()?;
        Ok(Self::from_parts(
            parts, source, channels, position, start, end, quality,
        ))
    }

    /// Creates a resampler playing every channel of `buffer`, in the format its samples carry.
    ///
    /// The format is taken from the sample type, so a buffer cannot be played at the wrong depth:
    ///
    /// ```compile_fail
    /// use tracker_resample::buffer::SamplesBuffer;
    /// use tracker_resample::{Bits8, Resampler};
    ///
    /// let buffer = SamplesBuffer::new(1, 8363, vec![0i16; 4]);
    /// let resampler = Resampler::<Bits8>::from_buffer(&buffer, 0, 0, 4, None);
    /// ```
    ///
    /// # Errors
    ///
    /// Fails only when the kernel history cannot be allocated.
    pub fn from_buffer<S>(
        buffer: &'a SamplesBuffer<S>,
        position: i64,
        start: i64,
        end: i64,
        quality: Option<Quality>,
    ) -> Result<Self, ResampleError>
    where
        S: RawSample<Format = F>,
    {
        Self::start(buffer, buffer.channels(), position, start, end, quality)
    }

    pub(crate) fn from_parts(
        parts: Parts<'a>,
        source: &'a dyn SampleSource,
        channels: ChannelCount,
        position: i64,
        start: i64,
        end: i64,
        quality: Option<Quality>,
    ) -> Self {
        let quality = quality.unwrap_or_else(default_quality);
        let mut resampler = Resampler {
            source,
            channels: 1,
            pos: 0,
            subpos: 0,
            start: 0,
            end: 0,
            direction: Direction::Forward,
            quality,
            taps: quality.taps(),
            edge_fill: parts.edge_fill,
            exhausted: false,
            history: parts.history,
            pickup: parts.pickup,
            routines: Routines::new(quality),
        };
        resampler.reset(source, channels, position, start, end, Some(quality));
        resampler
    }

    /// Moves the heap-owning state out, leaving this resampler unusable until it is dropped.
    pub(crate) fn take_parts(&mut self) -> Parts<'a> {
        Parts {
            history: std::mem::take(&mut self.history),
            pickup: self.pickup.take(),
            edge_fill: self.edge_fill,
        }
    }

    /// Rebinds this resampler to a source and window without reallocating.
    ///
    /// Takes the same arguments as [`start`](Resampler::start) and clamps them the same way. The
    /// direction goes back to [`Direction::Forward`] and an exhausted resampler becomes active
    /// again. The pickup hook and edge policy are kept.
    pub fn reset(
        &mut self,
        source: &'a dyn SampleSource,
        channels: ChannelCount,
        position: i64,
        start: i64,
        end: i64,
        quality: Option<Quality>,
    ) {
        ensure_tables();

        let quality = quality.unwrap_or_else(default_quality);
        let channels = (channels as usize).clamp(1, MAX_CHANNELS);
        let end = end.max(start);

        self.source = source;
        self.channels = channels;
        self.start = start;
        self.end = end;
        self.pos = position.clamp(start, end);
        self.subpos = 0;
        self.direction = Direction::Forward;
        self.exhausted = false;
        if quality != self.routines.quality() {
            self.routines = Routines::new(quality);
        }
        self.quality = quality;
        self.taps = quality.taps();

        self.history.clear();
        self.history.resize(channels, [0; MAX_TAPS]);
        self.prime();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            depth = ?F::DEPTH,
            ?quality,
            channels,
            position = self.pos,
            start,
            end,
            "resampler reset"
        );
    }

    /// Releases the resampler. The source is left untouched.
    pub fn end(self) {}

    /// Resamples a mono source into a mono destination.
    ///
    /// Fills up to `dst.len()` samples and returns how many were produced. Fewer are produced
    /// only when playback reached the end of its window.
    pub fn resample_1_1(&mut self, dst: &mut [Sample], volume: &mut VolumeRamp, delta: f64) -> usize {
        let run = self.routines.run(Shape::OneToOne);
        run(self, dst, &mut [volume], delta)
    }

    /// Resamples a mono source into interleaved stereo, with a volume per output channel.
    ///
    /// Returns the number of frames produced, each frame being two samples.
    pub fn resample_1_2(
        &mut self,
        dst: &mut [Sample],
        left: &mut VolumeRamp,
        right: &mut VolumeRamp,
        delta: f64,
    ) -> usize {
        let run = self.routines.run(Shape::OneToTwo);
        run(self, dst, &mut [left, right], delta)
    }

    /// Downmixes a stereo source into mono, with a volume per source channel.
    pub fn resample_2_1(
        &mut self,
        dst: &mut [Sample],
        left: &mut VolumeRamp,
        right: &mut VolumeRamp,
        delta: f64,
    ) -> usize {
        let run = self.routines.run(Shape::TwoToOne);
        run(self, dst, &mut [left, right], delta)
    }

    /// Resamples a stereo source into interleaved stereo.
    ///
    /// Returns the number of frames produced, each frame being two samples.
    pub fn resample_2_2(
        &mut self,
        dst: &mut [Sample],
        left: &mut VolumeRamp,
        right: &mut VolumeRamp,
        delta: f64,
    ) -> usize {
        let run = self.routines.run(Shape::TwoToTwo);
        run(self, dst, &mut [left, right], delta)
    }

    /// Resamples with a channel shape chosen at runtime.
    ///
    /// `ramps` must hold at least [`Shape::ramps`] entries; with fewer nothing is produced.
    pub fn resample(
        &mut self,
        shape: Shape,
        dst: &mut [Sample],
        ramps: &mut [&mut VolumeRamp],
        delta: f64,
    ) -> usize {
        if ramps.len() < shape.ramps() {
            return 0;
        }
        let run = self.routines.run(shape);
        run(self, dst, &mut ramps[..shape.ramps()], delta)
    }

    /// Returns the mono sample at the current position without moving.
    pub fn current_sample_1_1(&self, volume: &VolumeRamp) -> Sample {
        let mut dst = [0];
        self.routines.peek(Shape::OneToOne)(self, &[volume], &mut dst);
        dst[0]
    }

    /// Returns the stereo frame a mono source pans to at the current position.
    pub fn current_sample_1_2(&self, left: &VolumeRamp, right: &VolumeRamp) -> [Sample; 2] {
        let mut dst = [0; 2];
        self.routines.peek(Shape::OneToTwo)(self, &[left, right], &mut dst);
        dst
    }

    /// Returns the mono downmix of a stereo source at the current position.
    pub fn current_sample_2_1(&self, left: &VolumeRamp, right: &VolumeRamp) -> Sample {
        let mut dst = [0];
        self.routines.peek(Shape::TwoToOne)(self, &[left, right], &mut dst);
        dst[0]
    }

    /// Returns the stereo frame at the current position.
    pub fn current_sample_2_2(&self, left: &VolumeRamp, right: &VolumeRamp) -> [Sample; 2] {
        let mut dst = [0; 2];
        self.routines.peek(Shape::TwoToTwo)(self, &[left, right], &mut dst);
        dst
    }

    /// Writes the frame at the current position for a channel shape chosen at runtime.
    ///
    /// Writes at most [`Shape::output_channels`] samples. With fewer than [`Shape::ramps`]
    /// ramps the frame is silent.
    pub fn current_sample(&self, shape: Shape, ramps: &[&VolumeRamp], dst: &mut [Sample]) {
        if ramps.len() < shape.ramps() {
            let len = dst.len().min(shape.output_channels());
            dst[..len].fill(0);
            return;
        }
        self.routines.peek(shape)(self, ramps, dst);
    }

    /// Bit depth of the source samples.
    pub fn depth(&self) -> BitDepth {
        F::DEPTH
    }

    /// Interpolation quality in use.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Number of source channels read.
    pub fn channels(&self) -> ChannelCount {
        self.channels as ChannelCount
    }

    /// Whole part of the position.
    pub fn position(&self) -> i64 {
        self.pos
    }

    /// Fractional part of the position, in 1/65536 of a sample.
    pub fn subpos(&self) -> i32 {
        self.subpos
    }

    /// Position as a floating point frame index.
    pub fn fractional_position(&self) -> f64 {
        self.pos as f64 + self.subpos as f64 / (1u64 << SUBPOS_BITS) as f64
    }

    /// Position, bounds and direction.
    pub fn window(&self) -> Window {
        Window {
            position: self.pos,
            subpos: self.subpos,
            start: self.start,
            end: self.end,
            direction: self.direction,
        }
    }

    /// Stored playback direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Sets the playback direction.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Returns `true` once playback has ended, until the next reset.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Policy for frames before the start of the source.
    pub fn edge_fill(&self) -> EdgeFill {
        self.edge_fill
    }

    /// Sets the policy for frames before the start of the source and refills the history.
    pub fn set_edge_fill(&mut self, edge_fill: EdgeFill) {
        self.edge_fill = edge_fill;
        self.prime();
    }

    /// Builder form of [`set_edge_fill`](Resampler::set_edge_fill).
    pub fn with_edge_fill(mut self, edge_fill: EdgeFill) -> Self {
        self.set_edge_fill(edge_fill);
        self
    }

    /// Installs the hook run when playback crosses a window bound.
    pub fn set_pickup<P>(&mut self, pickup: P)
    where
        P: FnMut(&mut Window) -> bool + 'a,
    {
        self.pickup = Some(Box::new(pickup));
    }

    /// Removes the pickup hook.
    pub fn clear_pickup(&mut self) {
        self.pickup = None;
    }

    /// The kernel window of `channel`, oldest sample first.
    pub fn history(&self, channel: usize) -> &[i32] {
        match self.history.get(channel.min(self.channels - 1)) {
            Some(history) => &history[..self.taps],
            None => &[],
        }
    }

    /// Refills every kernel window around the current position.
    fn prime(&mut self) {
        let first = self.pos.saturating_sub((self.taps as i64 - 1) / 2);
        for (channel, history) in self.history.iter_mut().enumerate() {
            for (offset, slot) in history[..self.taps].iter_mut().enumerate() {
                let index = first.saturating_add(offset as i64);
                *slot = self.edge_fill.fetch(self.source, channel, index);
            }
        }
    }

    #[inline]
    fn in_window(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.pos < self.end,
            Direction::Backward => self.pos >= self.start,
        }
    }

    /// Moves the position by `step` fraction units.
    #[inline]
    fn step(&mut self, direction: Direction, step: i64) {
        let subpos = self.subpos as i64;
        let total = match direction {
            Direction::Forward => subpos.saturating_add(step),
            Direction::Backward => subpos.saturating_sub(step),
        };
        self.subpos = (total & SUBPOS_MASK) as i32;
        self.advance(total >> SUBPOS_BITS);
    }

    /// Moves the position by `whole` frames, sliding the kernel windows along.
    #[inline]
    fn advance(&mut self, whole: i64) {
        if whole == 0 {
            return;
        }
        let taps = self.taps;
        if whole.unsigned_abs() >= taps as u64 {
            self.pos = self.pos.saturating_add(whole);
            self.prime();
            return;
        }

        let ahead = taps as i64 / 2;
        let behind = (taps as i64 - 1) / 2;
        for _ in 0..whole.unsigned_abs() {
            if whole > 0 {
                self.pos += 1;
                let index = self.pos.saturating_add(ahead);
                for (channel, history) in self.history.iter_mut().enumerate() {
                    history.copy_within(1..taps, 0);
                    history[taps - 1] = self.edge_fill.fetch(self.source, channel, index);
                }
            } else {
                self.pos -= 1;
                let index = self.pos.saturating_sub(behind);
                for (channel, history) in self.history.iter_mut().enumerate() {
                    history.copy_within(0..taps - 1, 1);
                    history[0] = self.edge_fill.fetch(self.source, channel, index);
                }
            }
        }
    }

    /// Handles a crossed bound. Returns `false` once playback has ended.
    ///
    /// `flip` is set while a negative delta reverses the stored direction.
    fn pick_up(&mut self, flip: bool) -> bool {
        if let Some(pickup) = self.pickup.as_mut() {
            let mut window = Window {
                position: self.pos,
                subpos: self.subpos,
                start: self.start,
                end: self.end,
                direction: self.direction.flipped_if(flip),
            };

            #[cfg(feature = "tracing")]
            tracing::trace!(?window, "resampler pickup");

            if pickup(&mut window) {
                self.start = window.start;
                self.end = window.end.max(window.start);
                self.pos = window.position;
                self.subpos = window.subpos & SUBPOS_MASK as i32;
                self.direction = window.direction.flipped_if(flip);
                self.prime();
                if self.in_window(window.direction) {
                    return true;
                }
            }
        }

        self.exhaust(self.direction.flipped_if(flip));
        false
    }

    /// Clamps the position onto the bound crossed moving in `direction` and stops playback.
    fn exhaust(&mut self, direction: Direction) {
        self.pos = match direction {
            Direction::Forward => self.end,
            Direction::Backward => self.start,
        };
        self.subpos = 0;
        self.exhausted = true;
        self.prime();

        #[cfg(feature = "tracing")]
        tracing::trace!(position = self.pos, ?direction, "resampler exhausted");
    }
}

impl<F: SampleFormat> fmt::Debug for Resampler<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resampler")
            .field("depth", &F::DEPTH)
            .field("quality", &self.quality)
            .field("channels", &self.channels)
            .field("window", &self.window())
            .field("edge_fill", &self.edge_fill)
            .field("exhausted", &self.exhausted)
            .field("pickup", &self.pickup.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Bits16, Bits8};

    fn ramp(_: usize, index: i64) -> i32 {
        index as i32
    }

    #[test]
    fn start_clamps_its_arguments() {
        let r = Resampler::<Bits16>::start(&ramp, 0, 50, 10, 5, Some(Quality::Linear)).unwrap();
        assert_eq!(r.channels(), 1);
        assert_eq!(r.window().start, 10);
        assert_eq!(r.window().end, 10);
        assert_eq!(r.position(), 10);

        let r = Resampler::<Bits16>::start(&ramp, 9, -4, 0, 100, None).unwrap();
        assert_eq!(r.channels(), 2);
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn history_covers_the_kernel_window() {
        let cases = [
            (Quality::Aliasing, vec![20]),
            (Quality::Linear, vec![20, 21]),
            (Quality::Cubic, vec![19, 20, 21, 22]),
            (Quality::Sinc, vec![17, 18, 19, 20, 21, 22, 23, 24]),
        ];
        for (quality, expected) in cases {
            let r = Resampler::<Bits8>::start(&ramp, 1, 20, 0, 100, Some(quality)).unwrap();
            assert_eq!(r.history(0), expected.as_slice(), "{quality:?}");
        }
    }

    #[test]
    fn stepping_slides_the_window() {
        let mut r = Resampler::<Bits8>::start(&ramp, 1, 10, 0, 100, Some(Quality::Sinc)).unwrap();
        r.step(Direction::Forward, 3 << SUBPOS_BITS);
        assert_eq!(r.history(0), &[10, 11, 12, 13, 14, 15, 16, 17]);
        r.step(Direction::Backward, 1 << SUBPOS_BITS);
        assert_eq!(r.history(0), &[9, 10, 11, 12, 13, 14, 15, 16]);
        r.step(Direction::Forward, 20 << SUBPOS_BITS);
        assert_eq!(r.position(), 32);
        assert_eq!(r.history(0), &[29, 30, 31, 32, 33, 34, 35, 36]);
    }

    #[test]
    fn fractional_steps_carry() {
        let mut r = Resampler::<Bits8>::start(&ramp, 1, 10, 0, 100, Some(Quality::Linear)).unwrap();
        r.step(Direction::Backward, 0x4000);
        assert_eq!((r.position(), r.subpos()), (9, 0xc000));
        r.step(Direction::Forward, 0x8000);
        assert_eq!((r.position(), r.subpos()), (10, 0x4000));
        assert_eq!(r.fractional_position(), 10.25);
    }

    #[test]
    fn edge_fill_applies_before_the_source() {
        let r = Resampler::<Bits8>::start(&ramp, 1, 0, 0, 100, Some(Quality::Sinc)).unwrap();
        assert_eq!(r.history(0), &[0, 0, 0, 0, 1, 2, 3, 4]);

        let ones = |_: usize, index: i64| index as i32 + 1;
        let r = Resampler::<Bits8>::start(&ones, 1, 0, 0, 100, Some(Quality::Cubic))
            .unwrap()
            .with_edge_fill(EdgeFill::Silence);
        assert_eq!(r.history(0), &[0, 1, 2, 3]);

        let r = Resampler::<Bits8>::start(&ones, 1, 0, 0, 100, Some(Quality::Cubic))
            .unwrap()
            .with_edge_fill(EdgeFill::Passthrough);
        assert_eq!(r.history(0), &[0, 1, 2, 3]);
    }

    #[test]
    fn reset_keeps_configuration() {
        let mut r = Resampler::<Bits8>::start(&ramp, 2, 0, 0, 4, Some(Quality::Linear))
            .unwrap()
            .with_edge_fill(EdgeFill::Silence);
        r.set_pickup(|_| false);
        r.set_direction(Direction::Backward);
        r.reset(&ramp, 1, 3, 0, 4, Some(Quality::Sinc));
        assert_eq!(r.edge_fill(), EdgeFill::Silence);
        assert_eq!(r.direction(), Direction::Forward);
        assert_eq!(r.quality(), Quality::Sinc);
        assert_eq!(r.history(0).len(), 8);
        assert!(format!("{r:?}").contains("pickup: true"));
    }

    #[test]
    fn window_reports_direction_bounds() {
        let mut window = Window {
            position: 10,
            subpos: 0,
            start: 0,
            end: 10,
            direction: Direction::Forward,
        };
        assert!(!window.contains_position());
        window.direction = Direction::Backward;
        assert!(window.contains_position());
        assert_eq!(window.len(), 10);
        assert!(!window.is_empty());
    }
}
