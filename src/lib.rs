//! # wspr-beacon - a standalone WSPR amateur-radio beacon controller
//!
//! This crate implements the portable core of a WSPR (Weak Signal
//! Propagation Reporter) beacon: message encoding, a UTC-aligned
//! transmission scheduler, band selection, a real-time symbol modulator,
//! and the top-level control state machine that ties them together. It
//! drives a Si5351-class clock synthesizer over I²C through a small `Hal`
//! trait, so the same core runs against real hardware or an in-memory mock.
//!
//! ## Scope
//!
//! Wi-Fi provisioning UX, the HTTP/web status surface, NVS persistence
//! transport, and every non-WSPR mode are intentionally outside this
//! crate; see `SPEC_FULL.md` for the full boundary.
//!
//! ## Usage
//!
//! ```no_run
//! use wspr_beacon::config::Settings;
//! use wspr_beacon::encoder::{encode, WsprMessage};
//!
//! let settings = Settings::default();
//! let msg = WsprMessage::new(&settings.callsign, &settings.locator, settings.power_dbm);
//! let symbols = encode(&msg);
//! assert_eq!(symbols.len(), 162);
//! ```

pub mod band;
pub mod config;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod fsm;
pub mod logging;
pub mod modulator;
pub mod scheduler;
pub mod status;
pub mod synth;
pub mod time_provider;

pub use crate::error::{BeaconError, Result};
pub use crate::logging::{init_logger, log_debug, log_error, log_info, log_warn};
