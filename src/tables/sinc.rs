//! Windowed-sinc FIR taps.
//!
//! An 8-tap Hann-windowed sinc with its cutoff at 0.95 × Nyquist, tabulated at 512 fractional
//! phases. Each phase is normalized to unity gain before quantization, which compensates for the
//! gain the window takes away.

use std::f64::consts::PI;
use std::sync::OnceLock;

use super::WEIGHT_BITS;

/// Taps per phase.
pub const SINC_TAPS: usize = 8;

/// Number of tabulated phases per unit interval.
pub const SINC_PHASES: usize = 512;

/// Cutoff frequency relative to Nyquist.
const CUTOFF: f64 = 0.95;

/// Distance under which a tap is considered to sit exactly on the sinc peak.
const PEAK_EPSILON: f64 = 1e-8;

static SINC: OnceLock<SincTable> = OnceLock::new();

/// Quantized FIR taps with 14 fractional bits, [`SINC_TAPS`] per phase.
#[derive(Debug)]
pub struct SincTable {
    taps: Box<[[i16; SINC_TAPS]]>,
}

/// Windowed-sinc weight of tap `tap` for a kernel shifted by `offset` samples.
///
/// The kernel is centred halfway between taps 3 and 4, so `offset == -0.5` puts the peak on
/// tap 3 and `offset == 0.5` puts it on tap 4.
fn coefficient(tap: usize, offset: f64) -> f64 {
    let span = (SINC_TAPS - 1) as f64;
    let along = tap as f64 - offset;
    let from_centre = along - 0.5 * span;
    if from_centre.abs() < PEAK_EPSILON {
        return CUTOFF;
    }
    let window = 0.5 - 0.5 * (2.0 * PI / span * along).cos();
    let x = from_centre * PI;
    window * (CUTOFF * x).sin() / x
}

impl SincTable {
    fn generate() -> SincTable {
        let scale = (1i32 << WEIGHT_BITS) as f64;
        let mut taps = vec![[0i16; SINC_TAPS]; SINC_PHASES].into_boxed_slice();

        for (phase, out) in taps.iter_mut().enumerate() {
            let offset = phase as f64 / SINC_PHASES as f64 - 0.5;
            let mut raw = [0f64; SINC_TAPS];
            for (tap, weight) in raw.iter_mut().enumerate() {
                *weight = coefficient(tap, offset);
            }
            let gain = 1.0 / raw.iter().sum::<f64>();
            for (weight, out) in raw.iter().zip(out.iter_mut()) {
                let quantized = (0.5 + scale * weight * gain).floor();
                *out = quantized.clamp(-scale, scale) as i16;
            }
        }

        SincTable { taps }
    }

    /// Returns the taps of one phase (0..512).
    #[inline]
    pub fn phase(&self, phase: usize) -> &[i16; SINC_TAPS] {
        &self.taps[phase]
    }

    /// Returns the taps selected by a 16-bit position fraction.
    #[inline(always)]
    pub fn taps(&self, subpos: i32) -> &[i16; SINC_TAPS] {
        self.phase((subpos >> 7) as usize & (SINC_PHASES - 1))
    }
}

/// Generates the sinc table if this process has not done so yet.
pub fn ensure_sinc_table() {
    sinc_table();
}

/// Returns the sinc table, generating it on first use.
pub fn sinc_table() -> &'static SincTable {
    SINC.get_or_init(|| {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            phases = SINC_PHASES,
            taps = SINC_TAPS,
            cutoff = CUTOFF,
            "generating windowed-sinc table"
        );
        SincTable::generate()
    })
}
