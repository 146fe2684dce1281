//! Process-wide interpolation lookup tables.
//!
//! Both tables are pure functions of fixed design constants. They are generated at most once per
//! process, the first time they are asked for, and are immutable afterwards so any number of
//! resamplers may read them concurrently. Creating or resetting a resampler forces both tables,
//! so the per-sample paths never pay for the initialization check.
//!
//! Generation goes through [`std::sync::OnceLock`], which makes concurrent first use safe as
//! well; calling [`ensure_tables`] up front is still the cheapest way to keep table generation
//! out of a real-time thread.

mod cubic;
mod sinc;

pub use cubic::{cubic_table, ensure_cubic_table, CubicTable, CUBIC_PHASES};
pub use sinc::{ensure_sinc_table, sinc_table, SincTable, SINC_PHASES, SINC_TAPS};

/// Number of fractional bits of a table weight.
pub const WEIGHT_BITS: u32 = 14;

/// A weight of exactly 1.0.
pub const WEIGHT_ONE: i32 = 1 << WEIGHT_BITS;

/// Generates every lookup table that has not been generated yet.
pub fn ensure_tables() {
    ensure_cubic_table();
    ensure_sinc_table();
}
