//! Fixed-point constants shared by the resampling core.

/// Number of fractional bits in a playback position.
pub const SUBPOS_BITS: u32 = 16;

/// One whole source sample, expressed in position fraction units.
pub const SUBPOS_ONE: i64 = 1 << SUBPOS_BITS;

/// Mask selecting the fractional part of a position.
pub const SUBPOS_MASK: i64 = SUBPOS_ONE - 1;

/// Largest position step a single output frame can take.
pub const MAX_STEP: i64 = i64::MAX >> 1;

/// Fixed-point scale of a [`VolumeRamp`](crate::VolumeRamp) once converted for mixing
/// (1.0 == `1 << 24`).
pub const RAMP_ONE: f32 = 16_777_216.0;

/// Effective per-sample volume at unity gain (1.0 == `1 << 16`).
pub const UNITY_VOLUME: i32 = 1 << 16;

/// Widest interpolation kernel, in source samples.
pub const MAX_TAPS: usize = 8;

/// Most source channels a resampler reads.
pub const MAX_CHANNELS: usize = 2;
