//! WSPR on-the-air constants and the static band table.
//!
//! Values in this module must match the WSPR protocol exactly (§6.5 of the
//! controlling specification) and the international WSPR band segments.

use std::time::Duration;

/// Number of channel symbols in one WSPR transmission.
pub const WSPR_SYMBOL_COUNT: usize = 162;

/// Nominal symbol period. 162 * 683ms ~= 110.646s, which WSPR receivers tolerate.
pub const WSPR_SYMBOL_PERIOD: Duration = Duration::from_millis(683);

/// Total on-air duration of one transmission, per the WSPR protocol definition
/// (12000 Hz baseband rate, 8192 samples/symbol, 162 symbols).
pub const WSPR_TX_DURATION: Duration = Duration::from_millis(110_592);

/// Tone spacing between the four WSPR channel symbols, in Hz. Exact by
/// construction: 12000 Hz / 8192 samples.
pub const TONE_SPACING_HZ: f64 = 12_000.0 / 8192.0;

/// Rate-1/2 constraint-length-32 convolutional code generator polynomials.
pub const CONV_POLY_0: u32 = 0xF2D0_5351;
pub const CONV_POLY_1: u32 = 0xE461_3C47;

/// The 162-element WSPR sync vector, reproduced verbatim from the reference
/// encoder. `symbol[i] = sync[i] + 2 * data_bit[i]`.
pub const SYNC_VECTOR: [u8; WSPR_SYMBOL_COUNT] = [
    1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1, 0, 0,
    1, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 1, 0, 0,
    0, 0, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 0, 1, 1, 0, 1,
    0, 0, 0, 0, 1, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 1, 0, 0, 1, 0,
    1, 1, 0, 0, 0, 1, 1, 0, 1, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1,
    0, 0, 1, 0, 0, 1, 1, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 0, 1,
    1, 1, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 0, 1, 0, 1, 1, 0, 0, 0, 1, 1, 0, 0, 0,
];

/// Legal WSPR power levels, in dBm. Any coerced power collapses onto one of
/// these 28 discrete values.
pub const VALID_DBM: [i8; 28] = [
    -30, -27, -23, -20, -17, -13, -10, -7, -3, 0, 3, 7, 10, 13, 17, 20, 23, 27, 30, 33, 37, 40,
    43, 47, 50, 53, 57, 60,
];

/// Default crystal frequency assumed by the clock synthesizer, in Hz.
pub const DEFAULT_XTAL_HZ: u32 = 25_000_000;

/// Canonical band order used for tie-breaks and sequential selection.
pub const BAND_ORDER: [&str; 12] = [
    "160m", "80m", "60m", "40m", "30m", "20m", "17m", "15m", "12m", "10m", "6m", "2m",
];

/// Dial frequency (in Hz) at the center of the international WSPR segment for
/// each band, used as the compiled-in default before any settings are loaded.
pub fn default_frequency_hz(band: &str) -> Option<u32> {
    Some(match band {
        "160m" => 1_836_600,
        "80m" => 3_568_600,
        "60m" => 5_287_200,
        "40m" => 7_038_600,
        "30m" => 10_138_700,
        "20m" => 14_095_600,
        "17m" => 18_104_600,
        "15m" => 21_094_600,
        "12m" => 24_924_600,
        "10m" => 28_124_600,
        "6m" => 50_293_000,
        "2m" => 144_489_000,
        _ => return None,
    })
}

/// Si5351-class clock synthesizer register map (§4.2 / §6.4).
pub mod si5351_regs {
    /// Active-low output-enable mask.
    pub const OUTPUT_ENABLE_CONTROL: u8 = 3;
    pub const CLK0_CONTROL: u8 = 16;
    pub const CLK1_CONTROL: u8 = 17;
    pub const CLK2_CONTROL: u8 = 18;
    pub const MS0_BASE: u8 = 42;
    pub const MS1_BASE: u8 = 50;
    pub const MS2_BASE: u8 = 58;
    /// Write `0b1010_0000` here after reprogramming a PLL.
    pub const PLL_RESET: u8 = 177;
    /// Write `0b11_000000` here for a 10pF crystal load.
    pub const CRYSTAL_LOAD: u8 = 183;
    pub const CRYSTAL_LOAD_10PF: u8 = 0b11_000000;
    pub const PLL_RESET_PLLA_PLLB: u8 = 0b1010_0000;
}
