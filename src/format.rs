//! Source sample formats.
//!
//! Each supported source bit depth has a zero-sized format type implementing [`SampleFormat`].
//! The format describes how raw samples of that depth are brought to the common 24-bit working
//! scale by each kernel. The resampling loop itself is written once, generic over the format.

use dasp_sample::I24;

use crate::math::{mul_scale, mul_scale16, mul_shr};

/// Bit depth of the raw samples a source provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// Signed 8-bit samples.
    Eight,
    /// Signed 16-bit samples.
    Sixteen,
    /// Signed 24-bit samples stored in 32 bits.
    TwentyFour,
}

impl BitDepth {
    /// Maps a bit count to a depth. Anything other than 8 or 16 is treated as 24-bit.
    pub fn from_bits(bits: u32) -> BitDepth {
        match bits {
            8 => BitDepth::Eight,
            16 => BitDepth::Sixteen,
            _ => BitDepth::TwentyFour,
        }
    }

    /// Returns the number of significant bits per raw sample.
    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::TwentyFour => 24,
        }
    }

    /// Left shift that takes a raw sample of this depth to the 24-bit working scale.
    pub fn working_shift(self) -> u32 {
        24 - self.bits()
    }
}

/// Per-depth fixed-point scaling of the interpolation kernels.
///
/// `x` values are raw source samples widened to `i32`, `subpos` is a 16-bit position fraction,
/// `vol` a 16-bit volume (65536 is unity) and `w` a table weight with 14 fractional bits.
pub trait SampleFormat: Copy + Default + Send + Sync + 'static {
    /// Depth this format reads.
    const DEPTH: BitDepth;

    /// Scales a raw sample straight to the working scale at volume `vol`.
    fn alias(x: i32, vol: i32) -> i32;

    /// Interpolates between `x0` and `x1`, producing a working-scale value at unity volume.
    fn linear(x0: i32, x1: i32, subpos: i32) -> i32;

    /// Applies `vol` to an output of [`linear`](SampleFormat::linear).
    #[inline(always)]
    fn linear_volume(x: i32, vol: i32) -> i32 {
        mul_scale(x, vol)
    }

    /// One product of a FIR sum (cubic or sinc).
    fn weigh(x: i32, w: i32) -> i32;

    /// Final scaling of a FIR sum.
    #[inline(always)]
    fn finish(sum: i32) -> i32 {
        sum
    }

    /// Applies `vol` to a finished FIR sum, landing on the working scale.
    fn fir_volume(x: i32, vol: i32) -> i32;

    /// Runs a FIR over `x` with weights `w`.
    #[inline(always)]
    fn fir<const N: usize>(x: &[i32; N], w: &[i32; N]) -> i32 {
        let mut sum = 0i32;
        for i in 0..N {
            sum = sum.wrapping_add(Self::weigh(x[i], w[i]));
        }
        Self::finish(sum)
    }
}

/// 8-bit source format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bits8;

/// 16-bit source format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bits16;

/// 24-bit source format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bits24;

impl SampleFormat for Bits8 {
    const DEPTH: BitDepth = BitDepth::Eight;

    #[inline(always)]
    fn alias(x: i32, vol: i32) -> i32 {
        x.wrapping_mul(vol)
    }

    #[inline(always)]
    fn linear(x0: i32, x1: i32, subpos: i32) -> i32 {
        (x0 << 16) + (x1 - x0) * subpos
    }

    #[inline(always)]
    fn weigh(x: i32, w: i32) -> i32 {
        x * w
    }

    #[inline(always)]
    fn finish(sum: i32) -> i32 {
        sum << 6
    }

    #[inline(always)]
    fn fir_volume(x: i32, vol: i32) -> i32 {
        mul_shr(x, vol, 20)
    }
}

impl SampleFormat for Bits16 {
    const DEPTH: BitDepth = BitDepth::Sixteen;

    #[inline(always)]
    fn alias(x: i32, vol: i32) -> i32 {
        mul_shr(x, vol, 8)
    }

    #[inline(always)]
    fn linear(x0: i32, x1: i32, subpos: i32) -> i32 {
        (x0 << 8) + mul_scale16(x1 - x0, subpos)
    }

    #[inline(always)]
    fn weigh(x: i32, w: i32) -> i32 {
        x * w
    }

    #[inline(always)]
    fn fir_volume(x: i32, vol: i32) -> i32 {
        mul_shr(x, vol, 22)
    }
}

impl SampleFormat for Bits24 {
    const DEPTH: BitDepth = BitDepth::TwentyFour;

    #[inline(always)]
    fn alias(x: i32, vol: i32) -> i32 {
        mul_scale(x, vol)
    }

    #[inline(always)]
    fn linear(x0: i32, x1: i32, subpos: i32) -> i32 {
        x0 + mul_scale(x1 - x0, subpos)
    }

    #[inline(always)]
    fn weigh(x: i32, w: i32) -> i32 {
        mul_shr(x, w, 14)
    }

    #[inline(always)]
    fn fir_volume(x: i32, vol: i32) -> i32 {
        mul_scale(x, vol)
    }
}

/// A raw sample type a [`SamplesBuffer`](crate::buffer::SamplesBuffer) can hold.
pub trait RawSample: Copy + Send + Sync + 'static {
    /// Format the resampler uses for this sample type.
    type Format: SampleFormat;

    /// Widens the sample to `i32` without rescaling it.
    fn to_raw(self) -> i32;
}

impl RawSample for i8 {
    type Format = Bits8;

    #[inline]
    fn to_raw(self) -> i32 {
        self as i32
    }
}

impl RawSample for i16 {
    type Format = Bits16;

    #[inline]
    fn to_raw(self) -> i32 {
        self as i32
    }
}

impl RawSample for I24 {
    type Format = Bits24;

    #[inline]
    fn to_raw(self) -> i32 {
        self.inner()
    }
}
