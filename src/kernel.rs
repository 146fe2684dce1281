//! Interpolation kernels.
//!
//! A kernel turns a window of history samples and a position fraction into one pre-volume value,
//! then applies a volume to it. Kernels are zero-sized types so the resampling loop can be
//! monomorphized over them.

use crate::constants::MAX_TAPS;
use crate::format::SampleFormat;
use crate::quality::Quality;
use crate::tables::{cubic_table, sinc_table, CubicTable, SincTable};

/// Read-only tables handed to the kernels for the duration of one call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lookup {
    cubic: &'static CubicTable,
    sinc: &'static SincTable,
}

impl Lookup {
    #[inline]
    pub(crate) fn get() -> Lookup {
        Lookup {
            cubic: cubic_table(),
            sinc: sinc_table(),
        }
    }
}

/// One interpolation method.
///
/// `history` holds the kernel window with the sample at or before the position at index
/// `(taps - 1) / 2`. Only the first `taps` entries are meaningful.
pub(crate) trait Kernel: 'static {
    const QUALITY: Quality;

    fn interpolate<F: SampleFormat>(lookup: &Lookup, history: &[i32; MAX_TAPS], subpos: i32)
        -> i32;

    fn volume<F: SampleFormat>(x: i32, vol: i32) -> i32;
}

pub(crate) struct Aliasing;
pub(crate) struct Linear;
pub(crate) struct Cubic;
pub(crate) struct Sinc;

impl Kernel for Aliasing {
    const QUALITY: Quality = Quality::Aliasing;

    #[inline(always)]
    fn interpolate<F: SampleFormat>(_: &Lookup, history: &[i32; MAX_TAPS], _: i32) -> i32 {
        history[0]
    }

    #[inline(always)]
    fn volume<F: SampleFormat>(x: i32, vol: i32) -> i32 {
        F::alias(x, vol)
    }
}

impl Kernel for Linear {
    const QUALITY: Quality = Quality::Linear;

    #[inline(always)]
    fn interpolate<F: SampleFormat>(_: &Lookup, history: &[i32; MAX_TAPS], subpos: i32) -> i32 {
        F::linear(history[0], history[1], subpos)
    }

    #[inline(always)]
    fn volume<F: SampleFormat>(x: i32, vol: i32) -> i32 {
        F::linear_volume(x, vol)
    }
}

impl Kernel for Cubic {
    const QUALITY: Quality = Quality::Cubic;

    #[inline(always)]
    fn interpolate<F: SampleFormat>(
        lookup: &Lookup,
        history: &[i32; MAX_TAPS],
        subpos: i32,
    ) -> i32 {
        let x = [history[0], history[1], history[2], history[3]];
        F::fir(&x, &lookup.cubic.weights(subpos))
    }

    #[inline(always)]
    fn volume<F: SampleFormat>(x: i32, vol: i32) -> i32 {
        F::fir_volume(x, vol)
    }
}

impl Kernel for Sinc {
    const QUALITY: Quality = Quality::Sinc;

    #[inline(always)]
    fn interpolate<F: SampleFormat>(
        lookup: &Lookup,
        history: &[i32; MAX_TAPS],
        subpos: i32,
    ) -> i32 {
        let taps = lookup.sinc.taps(subpos).map(i32::from);
        F::fir(history, &taps)
    }

    #[inline(always)]
    fn volume<F: SampleFormat>(x: i32, vol: i32) -> i32 {
        F::fir_volume(x, vol)
    }
}
