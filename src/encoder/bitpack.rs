//! Message-type discrimination and bit packing (§4.1 step 2).
//!
//! Mirrors the three WSPR message shapes: Type 1 (callsign + 4-character
//! locator + power), Type 2 (compound callsign with prefix/suffix, no
//! locator), and Type 3 (hashed callsign + 6-character locator + power).

use super::message::{wspr_code, WsprMessage};
use super::nhash::callsign_hash_15;

/// Shift a space-prefixed 1x2-format callsign (e.g. `W1AW`) right by one so
/// every callsign occupies the same 6-cell `[letter-or-space][letter][digit]
/// [suffix x3]` field.
fn pad_callsign(call: &mut [u8; 6]) {
    if call[1].is_ascii_digit() && call[2].is_ascii_uppercase() {
        call[5] = call[4];
        call[4] = call[3];
        call[3] = call[2];
        call[2] = call[1];
        call[1] = call[0];
        call[0] = b' ';
    }
}

/// Re-run the callsign normalization rule (alnum uppercase, else space) over
/// a raw 6-byte buffer, used for the base-call extracted from a Type 2
/// compound callsign.
fn renormalize6(buf: &mut [u8; 6]) {
    for b in buf.iter_mut() {
        let upper = b.to_ascii_uppercase();
        *b = if upper.is_ascii_digit() || upper.is_ascii_uppercase() {
            upper
        } else {
            b' '
        };
    }
}

fn pack_base_call(buf: &[u8; 6]) -> u32 {
    let mut n = wspr_code(buf[0]) as u32;
    n = n * 36 + wspr_code(buf[1]) as u32;
    n = n * 10 + wspr_code(buf[2]) as u32;
    n = n * 27 + (wspr_code(buf[3]) as u32 - 10);
    n = n * 27 + (wspr_code(buf[4]) as u32 - 10);
    n = n * 27 + (wspr_code(buf[5]) as u32 - 10);
    n
}

enum MessageKind {
    Type1,
    Type2 { slash: usize },
    Type3 { bracket: Option<usize> },
}

fn classify(callsign: &[u8; 12]) -> MessageKind {
    if callsign[0] == b'<' {
        let bracket = callsign.iter().position(|&b| b == b'>');
        MessageKind::Type3 { bracket }
    } else if let Some(slash) = callsign.iter().position(|&b| b == b'/') {
        MessageKind::Type2 { slash }
    } else {
        MessageKind::Type1
    }
}

fn at(callsign: &[u8; 12], i: usize) -> u8 {
    callsign.get(i).copied().unwrap_or(b' ')
}

fn encode_type1(msg: &WsprMessage) -> (u32, u32) {
    let mut buf = [b' '; 6];
    buf.copy_from_slice(&msg.callsign[0..6]);
    pad_callsign(&mut buf);
    let n = pack_base_call(&buf);

    let loc = msg.locator.as_bytes();
    let l0 = loc[0] as i64 - b'A' as i64;
    let l1 = loc[1] as i64 - b'A' as i64;
    let l2 = loc[2] as i64 - b'0' as i64;
    let l3 = loc[3] as i64 - b'0' as i64;
    let m = ((179 - 10 * l0 - l2) * 180) + (10 * l1) + l3;
    let m = m * 128 + msg.power_dbm as i64 + 64;
    (n, m as u32)
}

fn encode_type3(msg: &WsprMessage) -> (u32, u32) {
    let callsign = &msg.callsign;
    let bracket = match classify(callsign) {
        MessageKind::Type3 { bracket } => bracket,
        _ => unreachable!(),
    };
    let end = bracket.unwrap_or(12).max(1);
    let base_call: String = callsign[1..end]
        .iter()
        .map(|&b| b as char)
        .collect();
    let hash = callsign_hash_15(&base_call);

    let loc = if msg.locator.len() == 6 {
        msg.locator.as_bytes().to_vec()
    } else {
        b"AA00AA".to_vec()
    };
    let mut loc6 = [0u8; 6];
    loc6.copy_from_slice(&loc);
    loc6.rotate_left(1);

    let mut n = wspr_code(loc6[0]) as u32;
    n = n * 36 + wspr_code(loc6[1]) as u32;
    n = n * 10 + wspr_code(loc6[2]) as u32;
    n = n * 27 + (wspr_code(loc6[3]) as u32 - 10);
    n = n * 27 + (wspr_code(loc6[4]) as u32 - 10);
    n = n * 27 + (wspr_code(loc6[5]) as u32 - 10);

    let m = (hash as i64) * 128 - (msg.power_dbm as i64 + 1) + 64;
    (n, m as u32)
}

fn base_call_from_prefix_slice(callsign: &[u8; 12], upto: usize) -> [u8; 6] {
    let mut buf = [0u8; 6];
    for (i, slot) in buf.iter_mut().enumerate() {
        *slot = if i < upto {
            callsign.get(i).copied().unwrap_or(0)
        } else {
            0
        };
    }
    renormalize6(&mut buf);
    buf
}

fn encode_type2(msg: &WsprMessage, slash: usize) -> (u32, u32) {
    let callsign = &msg.callsign;

    if at(callsign, slash + 2) == b' ' {
        // single-character suffix
        let mut base = base_call_from_prefix_slice(callsign, slash);
        pad_callsign(&mut base);
        let n = pack_base_call(&base);

        let x = at(callsign, slash + 1);
        let x = match x {
            b'0'..=b'9' => (x - b'0') as i64,
            b'A'..=b'Z' => (x - b'A' + 10) as i64,
            _ => 38,
        };
        let m = 60_000 - 32_768 + x;
        let m = m * 128 + msg.power_dbm as i64 + 2 + 64;
        (n, m as u32)
    } else if at(callsign, slash + 3) == b' ' {
        // two-digit numeric suffix
        let mut base = base_call_from_prefix_slice(callsign, slash);
        pad_callsign(&mut base);
        let n = pack_base_call(&base);

        let d1 = (at(callsign, slash + 1).wrapping_sub(b'0')) as i64;
        let d2 = (at(callsign, slash + 2).wrapping_sub(b'0')) as i64;
        let m = 10 * d1 + d2;
        let m = 60_000 + 26 + m;
        let m = m * 128 + msg.power_dbm as i64 + 2 + 64;
        (n, m as u32)
    } else {
        // prefix
        let mut prefix = [0u8; 4];
        for (i, slot) in prefix.iter_mut().enumerate().take(slash.min(4)) {
            *slot = callsign[i];
        }
        if prefix[2] == 0 || prefix[2] == b' ' {
            prefix[3] = 0;
            prefix[2] = prefix[1];
            prefix[1] = prefix[0];
            prefix[0] = b' ';
        }

        let mut base = [0u8; 6];
        for (i, slot) in base.iter_mut().enumerate() {
            *slot = callsign.get(slash + 1 + i).copied().unwrap_or(0);
        }
        renormalize6(&mut base);
        pad_callsign(&mut base);
        let n = pack_base_call(&base);

        let mut m: i64 = 0;
        for &p in prefix.iter().take(3) {
            m = 37 * m + wspr_code(p) as i64;
        }
        let m = if m >= 32_768 {
            let m = m - 32_768;
            m * 128 + msg.power_dbm as i64 + 2 + 64
        } else {
            m * 128 + msg.power_dbm as i64 + 1 + 64
        };
        (n, m as u32)
    }
}

/// Pack a normalized message into the 11-byte field the convolutional coder
/// consumes: 28 bits of callsign data, 22 bits of locator/power data.
pub fn bit_pack(msg: &WsprMessage) -> [u8; 11] {
    let (mut n, mut m) = match classify(&msg.callsign) {
        MessageKind::Type1 => encode_type1(msg),
        MessageKind::Type2 { slash } => encode_type2(msg, slash),
        MessageKind::Type3 { .. } => encode_type3(msg),
    };

    let mut c = [0u8; 11];
    c[3] = ((n & 0x0f) << 4) as u8;
    n >>= 4;
    c[2] = (n & 0xff) as u8;
    n >>= 8;
    c[1] = (n & 0xff) as u8;
    n >>= 8;
    c[0] = (n & 0xff) as u8;

    c[6] = ((m & 0x03) << 6) as u8;
    m >>= 2;
    c[5] = (m & 0xff) as u8;
    m >>= 8;
    c[4] = (m & 0xff) as u8;
    m >>= 8;
    c[3] |= (m & 0x0f) as u8;

    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type1_message_classifies_correctly() {
        let msg = WsprMessage::new("K1ABC", "FN42", 37);
        matches!(classify(&msg.callsign), MessageKind::Type1);
        let packed = bit_pack(&msg);
        assert_eq!(packed.len(), 11);
    }

    #[test]
    fn type2_message_classifies_correctly() {
        let msg = WsprMessage::new("K1ABC/P", "FN42", 37);
        let packed = bit_pack(&msg);
        assert_eq!(packed.len(), 11);
    }

    #[test]
    fn type3_message_classifies_correctly() {
        let msg = WsprMessage::new("<K1ABC>", "FN42pr", 37);
        let packed = bit_pack(&msg);
        assert_eq!(packed.len(), 11);
    }

    #[test]
    fn one_letter_prefix_callsign_is_padded() {
        let mut buf = *b"W1AW  ";
        pad_callsign(&mut buf);
        assert_eq!(&buf, b" W1AW ");
    }

    #[test]
    fn two_letter_prefix_callsign_is_untouched() {
        let mut buf = *b"K1ABC ";
        let before = buf;
        pad_callsign(&mut buf);
        assert_eq!(buf, before);
    }
}
