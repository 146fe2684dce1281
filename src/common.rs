/// Stream sample rate (samples per second per channel).
pub type SampleRate = u32;

/// Number of channels in a stream.
pub type ChannelCount = u16;

/// A resampled output sample.
///
/// Output samples always use a 24-bit working scale, whatever the bit depth of the source: full
/// scale is `±(1 << 23)`. An 8-bit source value `x` played at unity volume comes out as
/// `x << 16`, a 16-bit value as `x << 8` and a 24-bit value unchanged.
pub type Sample = i32;
