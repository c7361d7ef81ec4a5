///! AD9837 device

use embedded_hal::{blocking::spi::Write, digital::v2::OutputPin};

use crate::constants::*;
use crate::errors::*;
use crate::frequency::*;
use crate::register::*;

/// AD9837 device.
///
/// Owns the SPI bus handle and the FSYNC (frame sync / chip select) pin,
/// plus the shadow copy of the write-only control register.
///
/// The chip expects SPI mode 2 (`CPOL` = 1, `CPHA` = 0), MSB first. It is
/// rated to a 40MHz bus clock. Configuring the bus is the caller's job;
/// FSYNC framing of each 16-bit word is handled here.
///
/// Every operation is a blocking write with no acknowledgement from the
/// chip. Calls must be serialized by the caller: the shadow register and
/// the multi-transfer operations are not atomic with respect to each
/// other.
pub struct Ad9837<SPI, FSYNC> {
    spi: SPI,
    pin_fsync: FSYNC,
    control: ControlReg,
}

impl<SPI, FSYNC> Ad9837<SPI, FSYNC>
where
    SPI: Write<u8>,
    FSYNC: OutputPin,
{
    /// Creates the device handle.
    ///
    /// No bus traffic happens here; FSYNC should already be configured as
    /// an output and driven high (deselected). The shadow control register
    /// starts at zero, matching the chip's power-on state. Call
    /// [`reset`](Ad9837::reset) to bring the chip itself to a known state.
    pub fn new(spi: SPI, pin_fsync: FSYNC) -> Self {
        Ad9837 {
            spi,
            pin_fsync,
            control: ControlReg::default(),
        }
    }

    /// Releases the bus handle and the FSYNC pin.
    pub fn release(self) -> (SPI, FSYNC) {
        (self.spi, self.pin_fsync)
    }

    /// Last control word written to the chip.
    #[inline]
    pub fn control(self: &Self) -> ControlReg {
        self.control
    }

    /// Resets the chip to a known state: both frequency registers
    /// programmed to 100Hz (forcing the adjust mode to
    /// [`FreqAdjustMode::Full`] on the way), both phase registers zeroed,
    /// then the RESET control bit pulsed.
    ///
    /// The final RESET pulse writes the control register directly instead
    /// of read-modify-writing the shadow; the chip comes out of reset with
    /// an all-zero control register, so the shadow is zeroed to match.
    pub fn reset(self: &mut Self) -> Result<(), Error> {
        let default_freq = frequency_to_register_units(RESET_OUT_FREQ_HZ);

        self.adjust_freq_full_with_mode(FreqRegister::F0, FreqAdjustMode::Full, default_freq)?;
        self.adjust_freq_full_with_mode(FreqRegister::F1, FreqAdjustMode::Full, default_freq)?;
        self.adjust_phase_shift(PhaseRegister::P0, 0)?;
        self.adjust_phase_shift(PhaseRegister::P1, 0)?;

        self.write_word(command_word(Register::Control, CONTROL_RESET))?;
        self.write_word(command_word(Register::Control, 0x0000))?;
        self.control = ControlReg::default();
        Ok(())
    }

    /// Selects the output waveform.
    ///
    /// Read-modify-writes the shadow control register; all other control
    /// bits are preserved.
    pub fn set_mode(self: &mut Self, waveform: Waveform) -> Result<(), Error> {
        self.write_control(self.control.with_waveform(waveform))
    }

    /// Selects which frequency register drives the output (FSELECT).
    ///
    /// The other register keeps its value and can be reprogrammed without
    /// disturbing the output.
    pub fn select_freq_reg(self: &mut Self, reg: FreqRegister) -> Result<(), Error> {
        self.write_control(self.control.with_freq_select(reg))
    }

    /// Selects which phase register offsets the output (PSELECT).
    pub fn select_phase_reg(self: &mut Self, reg: PhaseRegister) -> Result<(), Error> {
        self.write_control(self.control.with_phase_select(reg))
    }

    /// Sets how subsequent frequency register writes are interpreted by
    /// the chip (see [`FreqAdjustMode`]).
    pub fn set_freq_adjust_mode(self: &mut Self, mode: FreqAdjustMode) -> Result<(), Error> {
        self.write_control(self.control.with_adjust_mode(mode))
    }

    /// Writes a 12-bit phase shift value to the given phase register.
    ///
    /// The value is in units of `2π / 4096`; upper bits are discarded.
    pub fn adjust_phase_shift(self: &mut Self, reg: PhaseRegister, phase: u16) -> Result<(), Error> {
        self.write_register(reg.register(), phase)
    }

    /// Writes a full 28-bit value to the given frequency register as two
    /// 16-bit transfers, low 14 bits first.
    ///
    /// The adjust mode must already be [`FreqAdjustMode::Full`]; this is
    /// not checked. If it is not, the chip loads the low or high half of
    /// its register from each of the two words instead of pairing them,
    /// which is almost certainly not what you want. Use
    /// [`adjust_freq_full_with_mode`](Ad9837::adjust_freq_full_with_mode)
    /// when in doubt.
    pub fn adjust_freq_full(self: &mut Self, reg: FreqRegister, freq: u32) -> Result<(), Error> {
        self.write_register(reg.register(), freq as u16)?;
        self.write_register(reg.register(), (freq >> FREQ_HALF_BITS) as u16)
    }

    /// Writes one 14-bit half of the given frequency register; which half
    /// depends on the current adjust mode (fine = low, coarse = high).
    ///
    /// Must not be used while the adjust mode is [`FreqAdjustMode::Full`]:
    /// the chip would be left waiting for the second word of a pair, and
    /// what it does with the half-finished register is undefined.
    pub fn adjust_freq_half(self: &mut Self, reg: FreqRegister, freq: u16) -> Result<(), Error> {
        self.write_register(reg.register(), freq)
    }

    /// Switches the adjust mode, then writes the full 28-bit value.
    ///
    /// This is two independent framed transfers, not one atomic sequence;
    /// a fault between them leaves the mode changed but the register
    /// unwritten. It is also the slowest way to update a register. Prefer
    /// setting the mode once and calling
    /// [`adjust_freq_full`](Ad9837::adjust_freq_full) repeatedly.
    pub fn adjust_freq_full_with_mode(
        self: &mut Self,
        reg: FreqRegister,
        mode: FreqAdjustMode,
        freq: u32,
    ) -> Result<(), Error> {
        self.set_freq_adjust_mode(mode)?;
        self.adjust_freq_full(reg, freq)
    }

    /// Switches the adjust mode, then writes one half of the register.
    ///
    /// Same non-atomicity caveat as
    /// [`adjust_freq_full_with_mode`](Ad9837::adjust_freq_full_with_mode).
    /// Passing [`FreqAdjustMode::Full`] here recreates the unpaired-write
    /// hazard described on [`adjust_freq_half`](Ad9837::adjust_freq_half).
    pub fn adjust_freq_half_with_mode(
        self: &mut Self,
        reg: FreqRegister,
        mode: FreqAdjustMode,
        freq: u16,
    ) -> Result<(), Error> {
        self.set_freq_adjust_mode(mode)?;
        self.adjust_freq_half(reg, freq)
    }

    /// Writes the shadow out as a control word. The shadow is only
    /// updated once the transfer succeeded.
    fn write_control(self: &mut Self, control: ControlReg) -> Result<(), Error> {
        self.write_register(Register::Control, control.w)?;
        self.control = control;
        Ok(())
    }

    #[inline(always)]
    fn write_register(self: &mut Self, reg: Register, payload: u16) -> Result<(), Error> {
        self.write_word(command_word(reg, payload))
    }

    /// One framed 16-bit transfer: FSYNC low, two bytes MSB first, FSYNC
    /// high. Data is clocked into the chip on the falling edge of SCLK
    /// while FSYNC is held low.
    fn write_word(self: &mut Self, w: u16) -> Result<(), Error> {
        self.pin_fsync.set_low().map_err(|_| Error::Pin)?;

        let data = [(w >> 8) as u8, (w & 0xFF) as u8];
        let res = self.spi.write(&data).map_err(|_| Error::Spi);

        // Deselect even when the transfer failed.
        self.pin_fsync.set_high().map_err(|_| Error::Pin)?;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SpiMock {
        written: Vec<u8>,
        fail: bool,
    }

    impl Write<u8> for SpiMock {
        type Error = ();

        fn write(&mut self, words: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.written.extend_from_slice(words);
            Ok(())
        }
    }

    #[derive(Default)]
    struct PinMock {
        levels: Vec<bool>,
    }

    impl OutputPin for PinMock {
        type Error = ();

        fn set_low(&mut self) -> Result<(), ()> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), ()> {
            self.levels.push(true);
            Ok(())
        }
    }

    fn device() -> Ad9837<SpiMock, PinMock> {
        Ad9837::new(SpiMock::default(), PinMock::default())
    }

    fn words(spi: &SpiMock) -> Vec<u16> {
        assert_eq!(spi.written.len() % 2, 0, "partial word on the bus");
        spi.written
            .chunks(2)
            .map(|b| ((b[0] as u16) << 8) | b[1] as u16)
            .collect()
    }

    #[test]
    fn set_mode_writes_one_control_word() {
        let mut dev = device();
        dev.set_mode(Waveform::Square).unwrap();
        assert_eq!(dev.control().w, 0x0028);

        let (spi, _) = dev.release();
        assert_eq!(words(&spi), vec![0x0028]);
    }

    #[test]
    fn register_selects_accumulate_in_the_shadow() {
        let mut dev = device();
        dev.select_freq_reg(FreqRegister::F1).unwrap();
        dev.select_phase_reg(PhaseRegister::P1).unwrap();
        dev.set_mode(Waveform::Sine).unwrap();

        let (spi, _) = dev.release();
        assert_eq!(words(&spi), vec![0x0800, 0x0C00, 0x0C00]);
    }

    #[test]
    fn waveform_changes_preserve_register_selects() {
        let mut dev = device();
        dev.select_freq_reg(FreqRegister::F1).unwrap();
        dev.select_phase_reg(PhaseRegister::P1).unwrap();
        dev.set_mode(Waveform::SquareHalf).unwrap();
        dev.set_mode(Waveform::Sine).unwrap();
        assert_eq!(dev.control().w, 0x0C00);
    }

    #[test]
    fn full_frequency_write_is_two_words_low_half_first() {
        let mut dev = device();
        dev.adjust_freq_full(FreqRegister::F0, 1_000_000).unwrap();

        let (spi, _) = dev.release();
        assert_eq!(
            words(&spi),
            vec![
                0x4000 | (1_000_000 & 0x3FFF) as u16,
                0x4000 | ((1_000_000 >> 14) & 0x3FFF) as u16,
            ]
        );
    }

    #[test]
    fn half_frequency_write_is_one_word() {
        let mut dev = device();
        dev.adjust_freq_half_with_mode(FreqRegister::F0, FreqAdjustMode::Coarse, 0x3FFF)
            .unwrap();

        let (spi, _) = dev.release();
        assert_eq!(words(&spi), vec![0x1000, 0x7FFF]);
    }

    #[test]
    fn phase_write_masks_to_twelve_bits() {
        let mut dev = device();
        dev.adjust_phase_shift(PhaseRegister::P1, 0xFABC).unwrap();

        let (spi, _) = dev.release();
        assert_eq!(words(&spi), vec![0xEABC]);
    }

    // The scenario from the MiniGen documentation: pick frequency register
    // 1, then program it with a full 28-bit value.
    #[test]
    fn select_then_full_write_sequence() {
        let mut dev = device();
        dev.select_freq_reg(FreqRegister::F1).unwrap();
        dev.adjust_freq_full_with_mode(FreqRegister::F1, FreqAdjustMode::Full, 1_000_000)
            .unwrap();

        let (spi, _) = dev.release();
        assert_eq!(
            words(&spi),
            vec![
                0x0800, // FSELECT = 1
                0x2800, // B28 on top of FSELECT
                0x8240, // 1000000 & 0x3FFF
                0x803D, // 1000000 >> 14
            ]
        );
    }

    #[test]
    fn reset_programs_the_documented_word_sequence() {
        let units = frequency_to_register_units(RESET_OUT_FREQ_HZ);
        assert_eq!(units, 1678);

        let mut dev = device();
        dev.reset().unwrap();
        assert_eq!(dev.control().w, 0x0000);

        let (spi, _) = dev.release();
        assert_eq!(
            words(&spi),
            vec![
                0x2000, // full adjust mode
                0x4000 | (units & 0x3FFF) as u16,
                0x4000 | ((units >> 14) & 0x3FFF) as u16,
                0x2000, // again, for the second register
                0x8000 | (units & 0x3FFF) as u16,
                0x8000 | ((units >> 14) & 0x3FFF) as u16,
                0xC000, // phase 0 = 0
                0xE000, // phase 1 = 0
                0x0100, // RESET high
                0x0000, // RESET low
            ]
        );
    }

    #[test]
    fn shadow_tracks_device_across_reset() {
        let mut dev = device();
        dev.set_freq_adjust_mode(FreqAdjustMode::Coarse).unwrap();
        dev.reset().unwrap();
        // The RESET pulse zeroed the chip's control register, so the next
        // control write must start from a clean slate.
        dev.set_mode(Waveform::Triangle).unwrap();
        assert_eq!(dev.control().w, 0x0002);
    }

    #[test]
    fn fsync_frames_every_word() {
        let mut dev = device();
        dev.reset().unwrap();

        let (spi, pin) = dev.release();
        let n = words(&spi).len();
        assert_eq!(pin.levels.len(), 2 * n);
        for frame in pin.levels.chunks(2) {
            assert_eq!(frame, [false, true]);
        }
    }

    #[test]
    fn spi_failure_leaves_shadow_unchanged_and_deselects() {
        let mut dev = Ad9837::new(
            SpiMock {
                written: Vec::new(),
                fail: true,
            },
            PinMock::default(),
        );
        assert_eq!(dev.set_mode(Waveform::Square), Err(Error::Spi));
        assert_eq!(dev.control().w, 0x0000);

        let (_, pin) = dev.release();
        assert_eq!(pin.levels, vec![false, true]);
    }
}
