//! AD9837 registers
//!
//! Every transfer to the chip is a single 16-bit word. The top bits carry
//! the address of the destination register, the remaining bits the payload.

/// Destination register, addressed by the top bits of a command word.
///
/// The frequency registers and the control register use a 2-bit address;
/// the phase registers use a 4-bit address (bit 12 of a phase word is
/// ignored by the chip, it is always sent as 0 here).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    Control,
    Freq0,
    Freq1,
    Phase0,
    Phase1,
}

impl Register {
    /// Bits of the command word reserved for the register address.
    #[inline]
    pub fn addr_mask(self) -> u16 {
        match self {
            Register::Control | Register::Freq0 | Register::Freq1 => 0xC000,
            Register::Phase0 | Register::Phase1 => 0xF000,
        }
    }

    /// Fixed address pattern, already shifted into the top bits.
    #[inline]
    pub fn addr_bits(self) -> u16 {
        match self {
            Register::Control => 0x0000, // 0b00
            Register::Freq0 => 0x4000,   // 0b01
            Register::Freq1 => 0x8000,   // 0b10
            Register::Phase0 => 0xC000,  // 0b1100
            Register::Phase1 => 0xE000,  // 0b1110
        }
    }
}

/// Builds the 16-bit command word for a write to `reg`.
///
/// Payload bits that would overflow into the address region are silently
/// discarded, mirroring the bit layout of the chip itself. There is no
/// error condition.
#[inline]
pub fn command_word(reg: Register, payload: u16) -> u16 {
    (payload & !reg.addr_mask()) | reg.addr_bits()
}

/// Output waveform selection.
///
/// Three control register bits pick the waveform: D5 (OPBITEN), D3 (DIV2)
/// and D1 (MODE):
///
/// | Waveform          | D5 | D3 | D1 |
/// |-------------------|----|----|----|
/// | Sine              |  0 |  0 |  0 |
/// | Triangle          |  0 |  0 |  1 |
/// | Square, half freq |  1 |  0 |  0 |
/// | Square, full freq |  1 |  1 |  0 |
///
/// D5 = 1 together with D1 = 1 is reserved by the chip; no variant of this
/// enum encodes it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    /// Square wave at half the programmed frequency (MSB/2 of the phase
    /// accumulator routed to the output).
    SquareHalf,
    /// Square wave at the programmed frequency.
    Square,
}

impl Waveform {
    /// All waveform bits: D5, D3 and D1.
    pub const MASK: u16 = 0x002A;

    /// Control register bit pattern for this waveform.
    #[inline]
    pub fn bits(self) -> u16 {
        match self {
            Waveform::Sine => 0x0000,
            Waveform::Triangle => 0x0002,
            Waveform::SquareHalf => 0x0020,
            Waveform::Square => 0x0028,
        }
    }
}

/// One of the two frequency registers.
///
/// Both can be programmed at any time; bit 11 of the control register
/// (FSELECT) picks the one that drives the output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FreqRegister {
    F0,
    F1,
}

impl FreqRegister {
    /// FSELECT, control register bit 11.
    pub const SELECT_MASK: u16 = 0x0800;

    #[inline]
    pub fn select_bits(self) -> u16 {
        match self {
            FreqRegister::F0 => 0x0000,
            FreqRegister::F1 => 0x0800,
        }
    }

    /// Destination register for frequency data writes.
    #[inline]
    pub fn register(self) -> Register {
        match self {
            FreqRegister::F0 => Register::Freq0,
            FreqRegister::F1 => Register::Freq1,
        }
    }
}

/// One of the two phase registers.
///
/// Bit 10 of the control register (PSELECT) picks the one added to the
/// phase accumulator output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PhaseRegister {
    P0,
    P1,
}

impl PhaseRegister {
    /// PSELECT, control register bit 10.
    pub const SELECT_MASK: u16 = 0x0400;

    #[inline]
    pub fn select_bits(self) -> u16 {
        match self {
            PhaseRegister::P0 => 0x0000,
            PhaseRegister::P1 => 0x0400,
        }
    }

    /// Destination register for phase data writes.
    #[inline]
    pub fn register(self) -> Register {
        match self {
            PhaseRegister::P0 => Register::Phase0,
            PhaseRegister::P1 => Register::Phase1,
        }
    }
}

/// How the chip interprets a single write to a frequency register.
///
/// Control register bits 13:12 (B28, HLB):
///
/// | Mode   | D13 | D12 | A frequency write loads...                   |
/// |--------|-----|-----|----------------------------------------------|
/// | Fine   |  0  |  0  | the lower 14 bits only (fast fine adjust)    |
/// | Coarse |  0  |  1  | the upper 14 bits only (fast coarse adjust)  |
/// | Full   |  1  |  x  | LSBs on the first write, MSBs on the second; |
/// |        |     |     | writes must come in pairs                    |
///
/// `11` behaves the same as `10`; only `10` is generated here.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FreqAdjustMode {
    Fine,
    Coarse,
    Full,
}

impl FreqAdjustMode {
    /// B28 and HLB, control register bits 13:12.
    pub const MASK: u16 = 0x3000;

    /// Control register bit pattern for this mode.
    #[inline]
    pub fn bits(self) -> u16 {
        match self {
            FreqAdjustMode::Fine => 0x0000,
            FreqAdjustMode::Coarse => 0x1000,
            FreqAdjustMode::Full => 0x2000,
        }
    }
}

/// Shadow copy of the write-only control register.
///
/// The chip offers no read-back, so this value must always equal the last
/// control word written out. Each combinator clears exactly the bits of
/// one field and leaves everything else untouched.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ControlReg {
    /// Control register word. The top two (address) bits stay clear.
    pub w: u16,
}

impl ControlReg {
    #[inline]
    fn update(self, clear: u16, set: u16) -> Self {
        ControlReg {
            w: (self.w & !clear) | set,
        }
    }

    /// Replace the waveform bits.
    #[inline]
    pub fn with_waveform(self, wf: Waveform) -> Self {
        self.update(Waveform::MASK, wf.bits())
    }

    /// Replace FSELECT.
    #[inline]
    pub fn with_freq_select(self, reg: FreqRegister) -> Self {
        self.update(FreqRegister::SELECT_MASK, reg.select_bits())
    }

    /// Replace PSELECT.
    #[inline]
    pub fn with_phase_select(self, reg: PhaseRegister) -> Self {
        self.update(PhaseRegister::SELECT_MASK, reg.select_bits())
    }

    /// Replace the frequency adjust mode bits.
    #[inline]
    pub fn with_adjust_mode(self, mode: FreqAdjustMode) -> Self {
        self.update(FreqAdjustMode::MASK, mode.bits())
    }
}
