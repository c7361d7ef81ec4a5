///! Frequency calculations

use crate::constants::*;

/// Frequency register value for a desired output frequency.
///
/// The output frequency is `MCLK / 2^28 * FREQREG`, so one register unit
/// is `FREQ_STEP_HZ` and the register value is the requested frequency
/// divided by the step, rounded to nearest.
///
/// No bounds are checked: a result wider than 28 bits is truncated by the
/// command word encoding when it is written out, not rejected here.
/// Callers that need an exact output frequency must pick values that are
/// a whole multiple of the step.
pub fn frequency_to_register_units(hz: f32) -> u32 {
    // f32::round is std-only, and the argument is never negative in any
    // meaningful use.
    (hz / FREQ_STEP_HZ + 0.5) as u32
}
