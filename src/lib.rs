#![cfg_attr(not(test), no_std)]

///! (AD9837)[https://www.analog.com/en/products/ad9837.html] driver.
///!
///! The AD9837 (register compatible with the AD9833, and the chip on the
///! SparkFun MiniGen board) is a DDS waveform generator programmed through
///! a write-only 16-bit serial interface. The top bits of each word address
///! one of the internal registers: the control register, two 28-bit
///! frequency registers and two 12-bit phase registers.
///!
///! The control register cannot be read back, so the driver keeps a shadow
///! copy and read-modify-writes it on every control operation.

pub mod constants;
pub mod register;
pub mod errors;
pub mod frequency;
pub mod device;
