//! Interpolation quality levels and the process-wide default.

use std::sync::atomic::{AtomicU8, Ordering};

/// Interpolation kernel used by a resampler, from cheapest to most accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Quality {
    /// Zero-order hold: repeats the source sample at or before the position.
    Aliasing,

    /// Straight line between the two samples around the position.
    Linear,

    /// Four-point Lagrange cubic through table lookups.
    #[default]
    Cubic,

    /// Eight-tap windowed-sinc FIR.
    Sinc,
}

impl Quality {
    /// All levels, cheapest first.
    pub const ALL: [Quality; 4] = [
        Quality::Aliasing,
        Quality::Linear,
        Quality::Cubic,
        Quality::Sinc,
    ];

    /// Maps an integer level (0 = aliasing … 3 = sinc) to a quality.
    ///
    /// Levels outside the range behave like the nearest valid level.
    pub fn from_level(level: i32) -> Quality {
        match level {
            i32::MIN..=0 => Quality::Aliasing,
            1 => Quality::Linear,
            2 => Quality::Cubic,
            _ => Quality::Sinc,
        }
    }

    /// Returns the integer level of this quality.
    pub fn level(self) -> i32 {
        self as i32
    }

    /// Number of consecutive source samples the kernel reads.
    pub fn taps(self) -> usize {
        match self {
            Quality::Aliasing => 1,
            Quality::Linear => 2,
            Quality::Cubic => 4,
            Quality::Sinc => 8,
        }
    }
}

static DEFAULT_QUALITY: AtomicU8 = AtomicU8::new(Quality::Cubic as u8);

/// Sets the quality used by resamplers started or reset without an explicit quality.
pub fn set_default_quality(quality: Quality) {
    DEFAULT_QUALITY.store(quality as u8, Ordering::Relaxed);
}

/// Returns the quality used by resamplers started or reset without an explicit quality.
pub fn default_quality() -> Quality {
    Quality::from_level(DEFAULT_QUALITY.load(Ordering::Relaxed) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_clamped() {
        assert_eq!(Quality::from_level(-7), Quality::Aliasing);
        assert_eq!(Quality::from_level(0), Quality::Aliasing);
        assert_eq!(Quality::from_level(2), Quality::Cubic);
        assert_eq!(Quality::from_level(3), Quality::Sinc);
        assert_eq!(Quality::from_level(99), Quality::Sinc);
    }

    #[test]
    fn levels_round_trip() {
        for quality in Quality::ALL {
            assert_eq!(Quality::from_level(quality.level()), quality);
        }
    }

    #[test]
    fn ordered_by_cost() {
        assert!(Quality::Aliasing < Quality::Linear);
        assert!(Quality::Cubic < Quality::Sinc);
        assert!(Quality::ALL.windows(2).all(|w| w[0].taps() < w[1].taps()));
    }
}
