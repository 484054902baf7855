//! WSPR message encoding: callsign/locator/power in, 162 four-level channel
//! symbols out. Stateless — `encode` takes a message by reference and
//! returns a fresh symbol table; nothing here retains state between calls.

mod bitpack;
mod convolve;
mod interleave;
pub mod nhash;

mod message;

pub use message::{normalize_callsign, normalize_locator, normalize_power, wspr_code, WsprMessage};

use crate::constants::WSPR_SYMBOL_COUNT;

/// Encode a normalized message into its 162-symbol WSPR channel table.
pub fn encode(msg: &WsprMessage) -> [u8; WSPR_SYMBOL_COUNT] {
    let packed = bitpack::bit_pack(msg);
    let coded = convolve::convolve(&packed);
    let interleaved = interleave::interleave(&coded);
    interleave::merge_sync_vector(&interleaved)
}
