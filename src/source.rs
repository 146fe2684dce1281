//! Sample providers read by a resampler.

/// Random-access provider of raw source samples.
///
/// The resampler asks for one sample at a time by channel and absolute frame index, in the
/// provider's own bit depth and without any rescaling. Indices before zero are only requested
/// when the instance uses [`EdgeFill::Passthrough`]. Indices past the end of the data are
/// requested whenever a kernel looks ahead of the last frame; the provider decides whether those
/// read as silence or repeat the last frame.
///
/// Any `Fn(usize, i64) -> i32` closure is a provider, which is convenient for generated
/// signals:
///
/// ```
/// use tracker_resample::SampleSource;
///
/// let ramp = |_channel: usize, index: i64| index as i32 * 10;
/// assert_eq!(ramp.sample(0, 3), 30);
/// ```
pub trait SampleSource {
    /// Returns the sample of `channel` at frame `index`.
    fn sample(&self, channel: usize, index: i64) -> i32;
}

impl<T> SampleSource for T
where
    T: Fn(usize, i64) -> i32,
{
    #[inline]
    fn sample(&self, channel: usize, index: i64) -> i32 {
        self(channel, index)
    }
}

/// What the kernel history holds for frames before the start of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeFill {
    /// Repeat the first frame of the source.
    #[default]
    Replicate,

    /// Read silence.
    Silence,

    /// Ask the provider, negative index included.
    Passthrough,
}

impl EdgeFill {
    /// Reads `channel` at `index` from `source`, applying this policy to negative indices.
    #[inline]
    pub fn fetch<S>(self, source: &S, channel: usize, index: i64) -> i32
    where
        S: SampleSource + ?Sized,
    {
        if index >= 0 {
            return source.sample(channel, index);
        }
        match self {
            EdgeFill::Replicate => source.sample(channel, 0),
            EdgeFill::Silence => 0,
            EdgeFill::Passthrough => source.sample(channel, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(_: usize, index: i64) -> i32 {
        100 + index as i32
    }

    #[test]
    fn inside_the_source_every_policy_reads_through() {
        for fill in [EdgeFill::Replicate, EdgeFill::Silence, EdgeFill::Passthrough] {
            assert_eq!(fill.fetch(&counting, 0, 0), 100);
            assert_eq!(fill.fetch(&counting, 1, 5), 105);
        }
    }

    #[test]
    fn before_the_source() {
        assert_eq!(EdgeFill::Replicate.fetch(&counting, 0, -3), 100);
        assert_eq!(EdgeFill::Silence.fetch(&counting, 0, -3), 0);
        assert_eq!(EdgeFill::Passthrough.fetch(&counting, 0, -3), 97);
    }

    #[test]
    fn trait_objects_fetch() {
        let source: &dyn SampleSource = &counting;
        assert_eq!(EdgeFill::default().fetch(source, 0, -1), 100);
    }
}
