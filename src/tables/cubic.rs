//! Four-point Lagrange cubic weights.
//!
//! For history samples `x0..x3` and a phase `t` between `x1` and `x2`:
//!
//! ```text
//! x = A0(t)·x0 + A1(t)·x1 + A2(t)·x2 + A3(t)·x3
//!
//! A0(t) = -0.5t³ +   t² - 0.5t
//! A1(t) =  1.5t³ - 2.5t²        + 1
//! A2(t) = -1.5t³ +  2t² + 0.5t      = A1(1 - t)
//! A3(t) =  0.5t³ - 0.5t²            = A0(1 - t)
//! ```
//!
//! Only A0 and A1 are stored. A2 and A3 are read from the same tables at the mirrored phase.

use std::sync::OnceLock;

/// Number of phases per unit interval. The tables hold one extra entry for `t == 1`.
pub const CUBIC_PHASES: usize = 1024;

static CUBIC: OnceLock<CubicTable> = OnceLock::new();

/// Cubic basis weights with 14 fractional bits, indexed by a 10-bit phase.
#[derive(Debug)]
pub struct CubicTable {
    a0: [i16; CUBIC_PHASES + 1],
    a1: [i16; CUBIC_PHASES + 1],
}

impl CubicTable {
    fn generate() -> CubicTable {
        let mut a0 = [0i16; CUBIC_PHASES + 1];
        let mut a1 = [0i16; CUBIC_PHASES + 1];
        for t in 0..=CUBIC_PHASES as i64 {
            // t is in 1/1024 units; 3 * 1024³ needs more than 32 bits.
            let (t2, t3) = (t * t, t * t * t);
            a0[t as usize] = (-(t3 >> 17) + (t2 >> 6) - (t << 3)) as i16;
            a1[t as usize] = ((3 * t3 >> 17) - (5 * t2 >> 7) + (1 << 14)) as i16;
        }
        CubicTable { a0, a1 }
    }

    /// Returns the stored A0 weight at `phase` (0..=1024).
    #[inline]
    pub fn a0(&self, phase: usize) -> i32 {
        self.a0[phase] as i32
    }

    /// Returns the stored A1 weight at `phase` (0..=1024).
    #[inline]
    pub fn a1(&self, phase: usize) -> i32 {
        self.a1[phase] as i32
    }

    /// Returns the four weights A0..A3 for a 16-bit position fraction.
    ///
    /// A2 and A3 come from the A1 and A0 tables at the mirrored phase `1024 - phase`.
    #[inline(always)]
    pub fn weights(&self, subpos: i32) -> [i32; 4] {
        let phase = (subpos >> 6) as usize & (CUBIC_PHASES - 1);
        let mirror = CUBIC_PHASES - phase;
        [
            self.a0[phase] as i32,
            self.a1[phase] as i32,
            self.a1[mirror] as i32,
            self.a0[mirror] as i32,
        ]
    }
}

/// Generates the cubic table if this process has not done so yet.
pub fn ensure_cubic_table() {
    cubic_table();
}

/// Returns the cubic table, generating it on first use.
pub fn cubic_table() -> &'static CubicTable {
    CUBIC.get_or_init(|| {
        #[cfg(feature = "tracing")]
        tracing::debug!(phases = CUBIC_PHASES, "generating cubic interpolation table");
        CubicTable::generate()
    })
}
