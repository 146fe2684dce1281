//! The per-sample loops, monomorphized over format, kernel and channel shape.

use std::array;

use super::Resampler;
use crate::common::Sample;
use crate::constants::MAX_CHANNELS;
use crate::format::SampleFormat;
use crate::kernel::{Aliasing, Cubic, Kernel, Linear, Lookup, Sinc};
use crate::math::step_from_delta;
use crate::quality::Quality;
use crate::ramp::{RampState, VolumeRamp};

/// How source channels map onto output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Mono source, mono output.
    OneToOne,

    /// Mono source panned into stereo output, one volume per output channel.
    OneToTwo,

    /// Stereo source downmixed into mono output, one volume per source channel.
    TwoToOne,

    /// Stereo source, stereo output.
    TwoToTwo,
}

impl Shape {
    /// Every shape.
    pub const ALL: [Shape; 4] = [
        Shape::OneToOne,
        Shape::OneToTwo,
        Shape::TwoToOne,
        Shape::TwoToTwo,
    ];

    /// Returns the shape for a number of source and output channels, clamping each to 1..=2.
    pub fn from_channels(source: usize, output: usize) -> Shape {
        match (source.clamp(1, 2), output.clamp(1, 2)) {
            (1, 1) => Shape::OneToOne,
            (1, _) => Shape::OneToTwo,
            (_, 1) => Shape::TwoToOne,
            _ => Shape::TwoToTwo,
        }
    }

    /// Number of source channels read.
    pub fn source_channels(self) -> usize {
        match self {
            Shape::OneToOne | Shape::OneToTwo => 1,
            Shape::TwoToOne | Shape::TwoToTwo => 2,
        }
    }

    /// Number of interleaved samples per output frame.
    pub fn output_channels(self) -> usize {
        match self {
            Shape::OneToOne | Shape::TwoToOne => 1,
            Shape::OneToTwo | Shape::TwoToTwo => 2,
        }
    }

    /// Number of volume ramps a call takes.
    pub fn ramps(self) -> usize {
        self.source_channels().max(self.output_channels())
    }
}

pub(super) type RunFn<'a, F> =
    fn(&mut Resampler<'a, F>, &mut [Sample], &mut [&mut VolumeRamp], f64) -> usize;

pub(super) type PeekFn<'a, F> = fn(&Resampler<'a, F>, &[&VolumeRamp], &mut [Sample]);

/// The resample and peek routines of one quality, indexed by [`Shape`].
pub(super) struct Routines<'a, F: SampleFormat> {
    quality: Quality,
    run: [RunFn<'a, F>; 4],
    peek: [PeekFn<'a, F>; 4],
}

impl<'a, F: SampleFormat> Routines<'a, F> {
    pub(super) fn new(quality: Quality) -> Self {
        match quality {
            Quality::Aliasing => Self::of::<Aliasing>(),
            Quality::Linear => Self::of::<Linear>(),
            Quality::Cubic => Self::of::<Cubic>(),
            Quality::Sinc => Self::of::<Sinc>(),
        }
    }

    fn of<K: Kernel>() -> Self {
        Routines {
            quality: K::QUALITY,
            run: [
                run::<F, K, 1, 1> as RunFn<'a, F>,
                run::<F, K, 1, 2> as RunFn<'a, F>,
                run::<F, K, 2, 1> as RunFn<'a, F>,
                run::<F, K, 2, 2> as RunFn<'a, F>,
            ],
            peek: [
                peek::<F, K, 1, 1> as PeekFn<'a, F>,
                peek::<F, K, 1, 2> as PeekFn<'a, F>,
                peek::<F, K, 2, 1> as PeekFn<'a, F>,
                peek::<F, K, 2, 2> as PeekFn<'a, F>,
            ],
        }
    }

    pub(super) fn quality(&self) -> Quality {
        self.quality
    }

    #[inline]
    pub(super) fn run(&self, shape: Shape) -> RunFn<'a, F> {
        self.run[shape as usize]
    }

    #[inline]
    pub(super) fn peek(&self, shape: Shape) -> PeekFn<'a, F> {
        self.peek[shape as usize]
    }
}

/// Applies the per-channel volumes to interpolated source values and writes one frame.
///
/// With one output channel every source channel is summed, each at its own volume. With two
/// output channels each output reads its own source channel, or the only one there is.
#[inline(always)]
fn write_frame<F, K, const SRC: usize, const OUT: usize>(
    x: &[i32; SRC],
    volumes: &[RampState; MAX_CHANNELS],
    frame: &mut [Sample],
) where
    F: SampleFormat,
    K: Kernel,
{
    if OUT == 1 {
        frame[0] = x
            .iter()
            .zip(volumes)
            .fold(0i32, |acc, (&x, state)| {
                acc.wrapping_add(K::volume::<F>(x, state.volume()))
            });
    } else {
        for (o, out) in frame.iter_mut().take(OUT).enumerate() {
            *out = K::volume::<F>(x[o.min(SRC - 1)], volumes[o].volume());
        }
    }
}

/// Interpolates every source channel at the current position.
#[inline(always)]
fn interpolate<F, K, const SRC: usize>(r: &Resampler<'_, F>, lookup: &Lookup) -> [i32; SRC]
where
    F: SampleFormat,
    K: Kernel,
{
    array::from_fn(|c| {
        let channel = c.min(r.channels - 1);
        K::interpolate::<F>(lookup, &r.history[channel], r.subpos)
    })
}

fn run<F, K, const SRC: usize, const OUT: usize>(
    r: &mut Resampler<'_, F>,
    dst: &mut [Sample],
    ramps: &mut [&mut VolumeRamp],
    delta: f64,
) -> usize
where
    F: SampleFormat,
    K: Kernel,
{
    let frames = dst.len() / OUT;
    if frames == 0 || r.exhausted {
        return 0;
    }

    let lookup = Lookup::get();
    let step = step_from_delta(delta);
    let flip = delta < 0.0;

    let ramp_count = SRC.max(OUT).min(ramps.len());
    let mut volumes = [RampState::default(); MAX_CHANNELS];
    for (state, ramp) in volumes.iter_mut().zip(ramps.iter()).take(ramp_count) {
        *state = RampState::begin(ramp, frames);
    }
    let silent = volumes[..ramp_count].iter().all(RampState::is_silent);

    let mut produced = 0;
    for frame in dst.chunks_exact_mut(OUT) {
        if !r.in_window(r.direction.flipped_if(flip)) && !r.pick_up(flip) {
            break;
        }

        if silent {
            frame.fill(0);
        } else {
            let x = interpolate::<F, K, SRC>(r, &lookup);
            write_frame::<F, K, SRC, OUT>(&x, &volumes, frame);
        }
        for state in &mut volumes[..ramp_count] {
            state.advance();
        }
        produced += 1;

        r.step(r.direction.flipped_if(flip), step);
    }

    for (state, ramp) in volumes.iter().zip(ramps.iter_mut()).take(ramp_count) {
        state.finish(ramp);
    }
    produced
}

fn peek<F, K, const SRC: usize, const OUT: usize>(
    r: &Resampler<'_, F>,
    ramps: &[&VolumeRamp],
    dst: &mut [Sample],
) where
    F: SampleFormat,
    K: Kernel,
{
    let len = dst.len().min(OUT);
    let dst = &mut dst[..len];
    if r.exhausted || !r.in_window(r.direction) || len < OUT {
        dst.fill(0);
        return;
    }

    let mut volumes = [RampState::default(); MAX_CHANNELS];
    for (state, ramp) in volumes.iter_mut().zip(ramps).take(SRC.max(OUT)) {
        *state = RampState::hold(ramp);
    }

    let x = interpolate::<F, K, SRC>(r, &Lookup::get());
    write_frame::<F, K, SRC, OUT>(&x, &volumes, dst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_channel_counts() {
        let counts: Vec<_> = Shape::ALL
            .iter()
            .map(|s| (s.source_channels(), s.output_channels(), s.ramps()))
            .collect();
        assert_eq!(counts, vec![(1, 1, 1), (1, 2, 2), (2, 1, 2), (2, 2, 2)]);
    }

    #[test]
    fn shape_from_channels_clamps() {
        assert_eq!(Shape::from_channels(0, 0), Shape::OneToOne);
        assert_eq!(Shape::from_channels(1, 6), Shape::OneToTwo);
        assert_eq!(Shape::from_channels(2, 1), Shape::TwoToOne);
        assert_eq!(Shape::from_channels(8, 2), Shape::TwoToTwo);
    }

    #[test]
    fn shapes_index_in_declaration_order() {
        for (i, shape) in Shape::ALL.iter().enumerate() {
            assert_eq!(*shape as usize, i);
        }
    }

    #[test]
    fn routines_exist_for_every_quality() {
        for quality in Quality::ALL {
            let routines = Routines::<crate::format::Bits16>::new(quality);
            assert_eq!(routines.quality(), quality);
        }
    }
}
