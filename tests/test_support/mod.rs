#![allow(dead_code)]
/// in separate folder so its not ran as integration test
use rand::{rngs::StdRng, RngExt, SeedableRng};
use tracker_resample::{AnyResampler, BitDepth, Quality, Sample, SampleSource, Shape, VolumeRamp};

/// Planar test signal. Frames outside the data read as silence.
#[derive(Debug, Clone)]
pub struct TestSignal {
    pub channels: Vec<Vec<i32>>,
}

impl TestSignal {
    pub fn from_channels(channels: Vec<Vec<i32>>) -> Self {
        Self { channels }
    }

    pub fn mono(samples: &[i32]) -> Self {
        Self::from_channels(vec![samples.to_vec()])
    }

    /// Seeded noise spanning most of the range of `depth`.
    pub fn noise(depth: BitDepth, channels: usize, frames: usize, seed: u64) -> Self {
        let limit = full_scale(depth) * 9 / 10;
        let mut rng = StdRng::seed_from_u64(seed);
        let channels = (0..channels)
            .map(|_| {
                (0..frames)
                    .map(|_| rng.random_range(-limit..=limit))
                    .collect()
            })
            .collect();
        Self { channels }
    }

    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

impl SampleSource for TestSignal {
    fn sample(&self, channel: usize, index: i64) -> i32 {
        let channel = channel.min(self.channels.len() - 1);
        usize::try_from(index)
            .ok()
            .and_then(|i| self.channels[channel].get(i))
            .copied()
            .unwrap_or(0)
    }
}

pub const DEPTHS: [BitDepth; 3] = [BitDepth::Eight, BitDepth::Sixteen, BitDepth::TwentyFour];

/// Largest positive raw sample of `depth`.
pub fn full_scale(depth: BitDepth) -> i32 {
    (1 << (depth.bits() - 1)) - 1
}

/// Raw sample of `depth` brought to the 24-bit output scale.
pub fn to_output_scale(depth: BitDepth, raw: i32) -> Sample {
    raw << depth.working_shift()
}

/// Largest error a FIR kernel may add to a constant of `expected` on the output scale.
pub fn fir_tolerance(expected: Sample) -> i32 {
    expected.abs() * 4 / 16384 + 8
}

/// Exact for the kernels that interpolate without tables.
pub fn tolerance(quality: Quality, expected: Sample) -> i32 {
    match quality {
        Quality::Aliasing | Quality::Linear => 0,
        Quality::Cubic | Quality::Sinc => fir_tolerance(expected),
    }
}

/// Runs `resampler` through consecutive calls of the given frame counts, collecting everything
/// produced. Returns the output and the frame count.
pub fn drive(
    resampler: &mut AnyResampler<'_>,
    shape: Shape,
    chunks: &[usize],
    ramps: &mut [VolumeRamp; 2],
    delta: f64,
) -> (Vec<Sample>, usize) {
    let mut output = Vec::new();
    let mut frames = 0;
    for &chunk in chunks {
        let mut block = vec![0; chunk * shape.output_channels()];
        let [left, right] = &mut *ramps;
        let produced = resampler.resample(shape, &mut block, &mut [left, right], delta);
        output.extend_from_slice(&block[..produced * shape.output_channels()]);
        frames += produced;
    }
    (output, frames)
}

/// Splits `total` into chunks of the given sizes, with the remainder in a last chunk.
pub fn split(total: usize, sizes: &[usize]) -> Vec<usize> {
    let mut chunks = Vec::new();
    let mut left = total;
    for &size in sizes {
        let size = size.min(left);
        chunks.push(size);
        left -= size;
    }
    chunks.push(left);
    chunks
}
