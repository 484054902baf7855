//! Raspberry Pi I²C transport, backed by `rppal`.

use rppal::i2c::I2c;

use super::hal::{Hal, HalError};

/// Default Si5351 7-bit I²C address.
pub const DEFAULT_I2C_ADDRESS: u16 = 0x60;

pub struct RppalI2cHal {
    i2c: I2c,
}

impl RppalI2cHal {
    pub fn new(address: u16) -> Result<Self, HalError> {
        let mut i2c = I2c::new().map_err(|e| HalError::Init(e.to_string()))?;
        i2c.set_slave_address(address)
            .map_err(|e| HalError::Init(e.to_string()))?;
        Ok(RppalI2cHal { i2c })
    }
}

impl Hal for RppalI2cHal {
    fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), HalError> {
        let mut buf = Vec::with_capacity(1 + data.len());
        buf.push(reg);
        buf.extend_from_slice(data);
        self.i2c
            .write(&buf)
            .map_err(|e| HalError::Transaction(e.to_string()))?;
        Ok(())
    }
}
