//! Si5351-class clock synthesizer driver and its I²C transport (§4.2).

mod driver;
mod hal;
mod mock;

#[cfg(feature = "raspberry-pi")]
mod rppal_hal;

pub use driver::{DriveStrength, OutputConfig, Pll, PllConfig, RDiv, Si5351Driver};
pub use hal::{Hal as SynthHal, HalError};
pub use mock::MockHal;

#[cfg(feature = "raspberry-pi")]
pub use rppal_hal::{RppalI2cHal, DEFAULT_I2C_ADDRESS};
