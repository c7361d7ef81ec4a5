//! Constants

/// Master clock frequency, Hz.
/// The MiniGen board clocks the AD9837 at 16MHz.
pub const MCLK_HZ: u32 = 16_000_000;

/// Smallest output frequency step, Hz: `MCLK / 2^28`.
/// One frequency register unit changes the output by this much.
pub const FREQ_STEP_HZ: f32 = 0.0596;

/// Output frequency programmed into both frequency registers by a reset, Hz.
pub const RESET_OUT_FREQ_HZ: f32 = 100.0;

/// Control word with only the RESET bit (D8) set.
/// While RESET is held the output sits at a constant mid-level voltage.
pub const CONTROL_RESET: u16 = 0x0100;

/// Payload width of a single frequency register transfer.
pub const FREQ_HALF_BITS: u8 = 14;
