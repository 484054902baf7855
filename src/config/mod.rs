//! Typed configuration, loaded/saved as JSON and merged over compiled-in
//! defaults, with a string-keyed bridge for the external settings interface
//! (§6.1) consumed by the (out-of-scope) HTTP layer.

mod hour_mask;
mod settings;
mod store;

pub use hour_mask::HourMask;
pub use settings::{Band, BandMode, Settings, WifiMode};
pub use store::{FileSettingsStore, SettingsStore};
