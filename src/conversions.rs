//! Conversions from resampled samples to the formats hosts play.
//!
//! Resampled output is on a 24-bit scale. These helpers saturate it to the 24-bit range and
//! convert it through [`dasp_sample`].

use dasp_sample::{Sample as _, I24};

use crate::common::Sample;

const MIN: Sample = -(1 << 23);
const MAX: Sample = (1 << 23) - 1;

#[inline]
fn saturate(sample: Sample) -> I24 {
    I24::new_unchecked(sample.clamp(MIN, MAX))
}

/// Converts a resampled sample to `f32` in `[-1.0, 1.0]`.
#[inline]
pub fn to_float(sample: Sample) -> f32 {
    saturate(sample).to_sample::<f32>()
}

/// Converts a resampled sample to `i16`, dropping the lowest 8 bits.
#[inline]
pub fn to_i16(sample: Sample) -> i16 {
    saturate(sample).to_sample::<i16>()
}

/// Converts as many samples as both slices hold. Returns the number converted.
pub fn to_float_slice(src: &[Sample], dst: &mut [f32]) -> usize {
    let len = src.len().min(dst.len());
    for (out, &sample) in dst.iter_mut().zip(src) {
        *out = to_float(sample);
    }
    len
}

/// Converts an iterator of resampled samples to `f32`.
#[derive(Clone, Debug)]
pub struct FloatConverter<I> {
    input: I,
}

impl<I> FloatConverter<I> {
    /// Builds a new converter.
    #[inline]
    pub fn new(input: I) -> FloatConverter<I> {
        FloatConverter { input }
    }

    /// Destroys this iterator and returns the underlying iterator.
    #[inline]
    pub fn into_inner(self) -> I {
        self.input
    }
}

impl<I> Iterator for FloatConverter<I>
where
    I: Iterator<Item = Sample>,
{
    type Item = f32;

    #[inline]
    fn next(&mut self) -> Option<f32> {
        self.input.next().map(to_float)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.input.size_hint()
    }
}

impl<I> ExactSizeIterator for FloatConverter<I> where I: ExactSizeIterator<Item = Sample> {}
