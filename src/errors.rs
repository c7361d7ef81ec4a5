//! Errors

/// Driver error.
///
/// The chip is write-only and never acknowledges anything, so the only
/// failures that can surface here come from the HAL collaborators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// SPI bus error
    Spi,
    /// FSYNC pin error
    Pin,
}
