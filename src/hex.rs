//! Fixed-width ASCII hex encoding used by the response frames.
//!
//! Every byte is rendered as two uppercase hex digits, most-significant nibble
//! first. Multi-byte values are rendered most-significant byte first, so the
//! text is big-endian regardless of the target's native byte order.
//!
//! ## Functions
//!
//! - [`encode_nibble`]: Converts a 4-bit value into one hex digit
//! - [`encode_u8`]: Converts a byte into two hex digits
//! - [`encode_u16`]: Converts a 16-bit value into four hex digits
//! - [`decode_nibble`], [`decode_u8`], [`decode_u16`]: The reverse mappings
//!
//! ## Limitations
//!
//! - Decoding accepts both upper and lower case digits; encoding only emits upper case
//! - Decoding any other character returns `None`

static DIGITS: [u8; 16] = *b"0123456789ABCDEF";

/// Encodes the low nibble of `nibble` as one uppercase hex digit.
///
/// The high nibble is ignored.
pub fn encode_nibble(nibble: u8) -> u8 {
    DIGITS[(nibble & 0x0F) as usize]
}

/// Encodes a byte as two hex digits, high nibble first.
pub fn encode_u8(byte: u8) -> [u8; 2] {
    [encode_nibble(byte >> 4), encode_nibble(byte)]
}

/// Encodes a 16-bit value as four hex digits, most-significant byte first.
pub fn encode_u16(value: u16) -> [u8; 4] {
    let [hi, lo] = value.to_be_bytes();
    let [a, b] = encode_u8(hi);
    let [c, d] = encode_u8(lo);
    [a, b, c, d]
}

/// Decodes one hex digit back into its 4-bit value.
///
/// Returns `None` if `digit` is not in `0-9`, `A-F` or `a-f`.
pub fn decode_nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        _ => None,
    }
}

/// Decodes a pair of hex digits, high nibble first, back into a byte.
pub fn decode_u8(hi: u8, lo: u8) -> Option<u8> {
    Some((decode_nibble(hi)? << 4) | decode_nibble(lo)?)
}

/// Decodes four hex digits, most-significant byte first, into a 16-bit value.
///
/// Returns `None` if `digits` is not exactly four valid hex digits.
pub fn decode_u16(digits: &[u8]) -> Option<u16> {
    match digits {
        [a, b, c, d] => Some(u16::from_be_bytes([decode_u8(*a, *b)?, decode_u8(*c, *d)?])),
        _ => None,
    }
}
