//! I²C transport abstraction for the clock synthesizer driver.

use thiserror::Error;

/// Errors surfaced by an I²C transport implementation.
#[derive(Debug, Error)]
pub enum HalError {
    #[error("I2C transaction failed: {0}")]
    Transaction(String),

    #[error("I2C bus initialization failed: {0}")]
    Init(String),
}

/// Minimal I²C register-write transport the synth driver depends on. A
/// real implementation targets a single fixed 7-bit device address; mocks
/// record every write for inspection.
pub trait Hal {
    /// Write `data` starting at register `reg`, in one I²C transaction.
    fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), HalError>;
}
