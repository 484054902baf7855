//! Normalization of the raw (callsign, locator, power) triple into the
//! canonical form the bit-packer consumes (§4.1 step 1).

use crate::constants::VALID_DBM;

/// Callsign/locator/power after normalization. Construction always succeeds;
/// invalid input degrades to a legal but uninformative message rather than
/// being rejected (§4.1 "Failure").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsprMessage {
    /// Upper-cased, space-padded to 12 bytes; unsupported characters become
    /// space, except `/`, `<`, `>` which are preserved verbatim.
    pub callsign: [u8; 12],
    /// Either `"AA00AA"` or a validated 4- or 6-character Maidenhead locator.
    pub locator: String,
    /// One of the 28 legal WSPR dBm values.
    pub power_dbm: i8,
}

impl WsprMessage {
    pub fn new(call: &str, loc: &str, power_dbm: i8) -> Self {
        WsprMessage {
            callsign: normalize_callsign(call),
            locator: normalize_locator(loc),
            power_dbm: normalize_power(power_dbm),
        }
    }

    /// Returns the raw callsign bytes with `<`/`>`/`/` stripped of trailing
    /// padding, for message-type discrimination and diagnostics.
    pub fn callsign_str(&self) -> String {
        String::from_utf8_lossy(&self.callsign)
            .trim_end()
            .to_string()
    }
}

/// Map a WSPR message character to its packing code: `0`-`9` -> 0-9,
/// `A`-`Z` -> 10-35, space (and anything else) -> 36.
pub fn wspr_code(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'A'..=b'Z' => c - b'A' + 10,
        _ => 36,
    }
}

/// Normalize a raw callsign into 12 uppercase bytes, space-padded, with
/// `/`, `<`, `>` preserved verbatim and every other disallowed character
/// mapped to space.
pub fn normalize_callsign(call: &str) -> [u8; 12] {
    let bytes = call.as_bytes();
    let mut out = [b' '; 12];
    for i in 0..12 {
        let c = bytes.get(i).copied().unwrap_or(b' ');
        out[i] = if c == b'/' || c == b'<' || c == b'>' {
            c
        } else {
            let upper = c.to_ascii_uppercase();
            if upper.is_ascii_digit() || upper.is_ascii_uppercase() {
                upper
            } else {
                b' '
            }
        };
    }
    out
}

/// Normalize a Maidenhead locator: `AA00AA` on anything malformed.
pub fn normalize_locator(loc: &str) -> String {
    let chars: Vec<char> = loc.chars().collect();
    let fallback = "AA00AA".to_string();

    if chars.len() != 4 && chars.len() != 6 {
        return fallback;
    }

    let field_ok = |c: char| c.to_ascii_uppercase().is_ascii_uppercase();
    let digit_ok = |c: char| c.is_ascii_digit();

    for &c in &chars[0..2] {
        let up = c.to_ascii_uppercase();
        if !field_ok(c) || !('A'..='R').contains(&up) {
            return fallback;
        }
    }
    for &c in &chars[2..4] {
        if !digit_ok(c) {
            return fallback;
        }
    }
    if chars.len() == 6 {
        for &c in &chars[4..6] {
            let up = c.to_ascii_uppercase();
            if !field_ok(c) || !('A'..='X').contains(&up) {
                return fallback;
            }
        }
    }

    let mut out = String::with_capacity(chars.len());
    for (i, c) in chars.into_iter().enumerate() {
        out.push(if i < 4 { c.to_ascii_uppercase() } else { c.to_ascii_uppercase() });
    }
    out
}

/// Clamp into `[-30, 60]`, then snap to the nearest legal value at or below
/// the clamped value.
pub fn normalize_power(dbm: i8) -> i8 {
    let min_legal = VALID_DBM[0];
    let max_legal = *VALID_DBM.last().unwrap();
    let clamped = dbm.clamp(min_legal, max_legal);

    if let Some(&exact) = VALID_DBM.iter().find(|&&v| v == clamped) {
        return exact;
    }
    VALID_DBM
        .iter()
        .rev()
        .find(|&&v| v <= clamped)
        .copied()
        .unwrap_or(min_legal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_boundaries_coerce_as_specified() {
        assert_eq!(normalize_power(-31), -30);
        assert_eq!(normalize_power(-29), -30);
        assert_eq!(normalize_power(61), 60);
        assert_eq!(normalize_power(37), 37);
        assert_eq!(normalize_power(25), 23);
    }

    #[test]
    fn locator_boundaries_coerce_as_specified() {
        assert_eq!(normalize_locator(""), "AA00AA");
        assert_eq!(normalize_locator("ZZZZ"), "AA00AA");
        assert_eq!(normalize_locator("FN42x"), "AA00AA");
        assert_eq!(normalize_locator("FN42"), "FN42");
        assert_eq!(normalize_locator("fn42pr"), "FN42pr".to_ascii_uppercase());
    }

    #[test]
    fn callsign_normalizes_unsupported_chars_to_space() {
        let norm = normalize_callsign("k1-abc");
        assert_eq!(String::from_utf8_lossy(&norm).trim_end(), "K1 ABC");
    }

    #[test]
    fn callsign_preserves_slash_and_brackets() {
        let norm = normalize_callsign("K1ABC/P");
        assert_eq!(String::from_utf8_lossy(&norm).trim_end(), "K1ABC/P");
        let norm = normalize_callsign("<K1ABC>");
        assert_eq!(String::from_utf8_lossy(&norm).trim_end(), "<K1ABC>");
    }
}
