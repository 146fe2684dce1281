//! A resampler whose source bit depth is chosen at runtime.

use crate::buffer::SamplesBuffer;
use crate::common::{ChannelCount, Sample};
use crate::format::{BitDepth, Bits16, Bits24, Bits8, RawSample, SampleFormat};
use crate::quality::Quality;
use crate::ramp::VolumeRamp;
use crate::resampler::{Direction, Parts, ResampleError, Resampler, Shape, Window};
use crate::source::{EdgeFill, SampleSource};

/// A [`Resampler`] over a source whose bit depth is only known at runtime.
///
/// Every operation forwards to the resampler specialized for the depth given at
/// [`start`](AnyResampler::start) or the last [`reset`](AnyResampler::reset).
///
/// ```
/// use tracker_resample::{AnyResampler, BitDepth, VolumeRamp};
///
/// let square = |_: usize, index: i64| if index % 2 == 0 { 100 } else { -100 };
/// let mut resampler = AnyResampler::start(BitDepth::from_bits(8), &square, 1, 0, 0, 64, None)?;
/// let mut out = [0; 4];
/// assert_eq!(resampler.resample_1_1(&mut out, &mut VolumeRamp::unity(), 1.0), 4);
/// # Ok::<(), tracker_resample::ResampleError>(())
/// ```
#[derive(Debug)]
pub enum AnyResampler<'a> {
    /// 8-bit source.
    Eight(Resampler<'a, Bits8>),
    /// 16-bit source.
    Sixteen(Resampler<'a, Bits16>),
    /// 24-bit source.
    TwentyFour(Resampler<'a, Bits24>),
}

macro_rules! dispatch {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            AnyResampler::Eight($r) => $body,
            AnyResampler::Sixteen($r) => $body,
            AnyResampler::TwentyFour($r) => $body,
        }
    };
}

impl<'a> AnyResampler<'a> {
    /// Creates a resampler for a source of the given depth.
    ///
    /// See [`Resampler::start`] for how the arguments are clamped.
    pub fn start(
        depth: BitDepth,
        source: &'a dyn SampleSource,
        channels: ChannelCount,
        position: i64,
        start: i64,
        end: i64,
        quality: Option<Quality>,
    ) -> Result<Self, ResampleError> {
        let parts = Parts::allocate()?;
        Ok(Self::from_parts(
            depth, parts, source, channels, position, start, end, quality,
        ))
    }

    /// Creates a resampler playing every channel of `buffer` at the depth of its samples.
    ///
    /// # Errors
    ///
    /// Fails only when the kernel history cannot be allocated.
    pub fn from_buffer<S: RawSample>(
        buffer: &'a SamplesBuffer<S>,
        position: i64,
        start: i64,
        end: i64,
        quality: Option<Quality>,
    ) -> Result<Self, ResampleError> {
        Self::start(
            buffer.depth(),
            buffer,
            buffer.channels(),
            position,
            start,
            end,
            quality,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn from_parts(
        depth: BitDepth,
        parts: Parts<'a>,
        source: &'a dyn SampleSource,
        channels: ChannelCount,
        position: i64,
        start: i64,
        end: i64,
        quality: Option<Quality>,
    ) -> Self {
        match depth {
            BitDepth::Eight => AnyResampler::Eight(Resampler::from_parts(
                parts, source, channels, position, start, end, quality,
            )),
            BitDepth::Sixteen => AnyResampler::Sixteen(Resampler::from_parts(
                parts, source, channels, position, start, end, quality,
            )),
            BitDepth::TwentyFour => AnyResampler::TwentyFour(Resampler::from_parts(
                parts, source, channels, position, start, end, quality,
            )),
        }
    }

    /// Rebinds to a source of the given depth without reallocating.
    ///
    /// When the depth changes the history buffer, pickup hook and edge policy move over to the
    /// resampler for the new depth.
    #[allow(clippy::too_many_arguments)]
    pub fn reset(
        &mut self,
        depth: BitDepth,
        source: &'a dyn SampleSource,
        channels: ChannelCount,
        position: i64,
        start: i64,
        end: i64,
        quality: Option<Quality>,
    ) {
        if depth == self.depth() {
            dispatch!(self, r => r.reset(source, channels, position, start, end, quality));
            return;
        }
        let parts = dispatch!(self, r => r.take_parts());
        *self = Self::from_parts(
            depth, parts, source, channels, position, start, end, quality,
        );
    }

    /// Releases the resampler. The source is left untouched.
    pub fn end(self) {}

    /// Bit depth of the source samples.
    pub fn depth(&self) -> BitDepth {
        match self {
            AnyResampler::Eight(_) => Bits8::DEPTH,
            AnyResampler::Sixteen(_) => Bits16::DEPTH,
            AnyResampler::TwentyFour(_) => Bits24::DEPTH,
        }
    }

    /// See [`Resampler::resample_1_1`].
    pub fn resample_1_1(&mut self, dst: &mut [Sample], volume: &mut VolumeRamp, delta: f64) -> usize {
        dispatch!(self, r => r.resample_1_1(dst, volume, delta))
    }

    /// See [`Resampler::resample_1_2`].
    pub fn resample_1_2(
        &mut self,
        dst: &mut [Sample],
        left: &mut VolumeRamp,
        right: &mut VolumeRamp,
        delta: f64,
    ) -> usize {
        dispatch!(self, r => r.resample_1_2(dst, left, right, delta))
    }

    /// See [`Resampler::resample_2_1`].
    pub fn resample_2_1(
        &mut self,
        dst: &mut [Sample],
        left: &mut VolumeRamp,
        right: &mut VolumeRamp,
        delta: f64,
    ) -> usize {
        dispatch!(self, r => r.resample_2_1(dst, left, right, delta))
    }

    /// See [`Resampler::resample_2_2`].
    pub fn resample_2_2(
        &mut self,
        dst: &mut [Sample],
        left: &mut VolumeRamp,
        right: &mut VolumeRamp,
        delta: f64,
    ) -> usize {
        dispatch!(self, r => r.resample_2_2(dst, left, right, delta))
    }

    /// See [`Resampler::resample`].
    pub fn resample(
        &mut self,
        shape: Shape,
        dst: &mut [Sample],
        ramps: &mut [&mut VolumeRamp],
        delta: f64,
    ) -> usize {
        dispatch!(self, r => r.resample(shape, dst, ramps, delta))
    }

    /// See [`Resampler::current_sample_1_1`].
    pub fn current_sample_1_1(&self, volume: &VolumeRamp) -> Sample {
        dispatch!(self, r => r.current_sample_1_1(volume))
    }

    /// See [`Resampler::current_sample_1_2`].
    pub fn current_sample_1_2(&self, left: &VolumeRamp, right: &VolumeRamp) -> [Sample; 2] {
        dispatch!(self, r => r.current_sample_1_2(left, right))
    }

    /// See [`Resampler::current_sample_2_1`].
    pub fn current_sample_2_1(&self, left: &VolumeRamp, right: &VolumeRamp) -> Sample {
        dispatch!(self, r => r.current_sample_2_1(left, right))
    }

    /// See [`Resampler::current_sample_2_2`].
    pub fn current_sample_2_2(&self, left: &VolumeRamp, right: &VolumeRamp) -> [Sample; 2] {
        dispatch!(self, r => r.current_sample_2_2(left, right))
    }

    /// See [`Resampler::current_sample`].
    pub fn current_sample(&self, shape: Shape, ramps: &[&VolumeRamp], dst: &mut [Sample]) {
        dispatch!(self, r => r.current_sample(shape, ramps, dst))
    }

    /// Interpolation quality in use.
    pub fn quality(&self) -> Quality {
        dispatch!(self, r => r.quality())
    }

    /// Number of source channels read.
    pub fn channels(&self) -> ChannelCount {
        dispatch!(self, r => r.channels())
    }

    /// Position, bounds and direction.
    pub fn window(&self) -> Window {
        dispatch!(self, r => r.window())
    }

    /// Sets the playback direction.
    pub fn set_direction(&mut self, direction: Direction) {
        dispatch!(self, r => r.set_direction(direction))
    }

    /// Returns `true` once playback has ended, until the next reset.
    pub fn is_exhausted(&self) -> bool {
        dispatch!(self, r => r.is_exhausted())
    }

    /// Sets the policy for frames before the start of the source.
    pub fn set_edge_fill(&mut self, edge_fill: EdgeFill) {
        dispatch!(self, r => r.set_edge_fill(edge_fill))
    }

    /// Installs the hook run when playback crosses a window bound.
    pub fn set_pickup<P>(&mut self, pickup: P)
    where
        P: FnMut(&mut Window) -> bool + 'a,
    {
        dispatch!(self, r => r.set_pickup(pickup))
    }

    /// Removes the pickup hook.
    pub fn clear_pickup(&mut self) {
        dispatch!(self, r => r.clear_pickup())
    }
}

macro_rules! impl_from_resampler {
    ($format:ty, $variant:ident) => {
        impl<'a> From<Resampler<'a, $format>> for AnyResampler<'a> {
            fn from(resampler: Resampler<'a, $format>) -> Self {
                AnyResampler::$variant(resampler)
            }
        }
    };
}

impl_from_resampler!(Bits8, Eight);
impl_from_resampler!(Bits16, Sixteen);
impl_from_resampler!(Bits24, TwentyFour);
