//! # Beacon Error Handling
//!
//! Defines `BeaconError`, which enumerates the error taxonomy described in the
//! controlling specification: most kinds are non-fatal and are logged and
//! absorbed by the layer that produced them; `I2cInitFailure` and
//! `TimerCreateFailure` are fatal and drive the top-level FSM into
//! `NetworkState::Error`.

use thiserror::Error;

/// Errors that can occur across the beacon core.
#[derive(Debug, Error)]
pub enum BeaconError {
    /// No enabled+scheduled band exists for the current UTC hour. Non-fatal:
    /// the transmission opportunity is skipped and stats are left unchanged.
    #[error("no eligible band for the current hour")]
    NoEligibleBand,

    /// A single I2C register write to the clock synthesizer failed. Non-fatal
    /// during a transmission: the offending symbol may be mistuned but the
    /// transmission continues.
    #[error("I2C transaction failed: {0}")]
    I2cTransient(String),

    /// The clock synthesizer could not be initialized at boot. Fatal.
    #[error("clock synthesizer initialization failed: {0}")]
    I2cInitFailure(String),

    /// The scheduler or modulator worker could not be created. Fatal.
    #[error("failed to create timer/worker: {0}")]
    TimerCreateFailure(String),

    /// New settings were accepted in memory but could not be persisted.
    /// Non-fatal: the next boot will revert to the last persisted settings.
    #[error("settings store failed: {0}")]
    SettingsStoreFailure(String),

    /// Wi-Fi STA connect attempt timed out; the FSM falls back to AP mode.
    #[error("Wi-Fi connect timed out after {0:?}")]
    WifiConnectTimeout(std::time::Duration),

    /// Invalid argument passed to a ClockSynth configuration call (denom=0,
    /// output index out of range, divisor too small outside integer mode).
    #[error("invalid clock synthesizer configuration: {0}")]
    InvalidSynthConfig(String),
}

pub type Result<T> = std::result::Result<T, BeaconError>;
