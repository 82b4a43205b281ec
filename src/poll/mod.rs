//! Main-loop scheduling helpers for the protocol engine.
//!
//! The engine is cooperative: it only needs [`ProtocolEngine::poll`](crate::engine::ProtocolEngine::poll)
//! to be called regularly. Firmware with other main-loop work calls it directly;
//! single-purpose firmware can hand the loop over to [`run_poll_loop`]
//! (feature `delay-loop`).
//!
//! Polling once per character time keeps the turnaround below one byte on the
//! wire. [`char_time_us`] gives that interval for a given baud rate:
//!
//! | Baud | Character time (8N1) |
//! |------|----------------------|
//! |   9 600 | 1042 µs |
//! |  38 400 |  261 µs |
//! | 115 200 |   87 µs |

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg(feature = "delay-loop")]
pub use delay::*;

/// Bits on the wire per character: start bit, 8 data bits, no parity, 1 stop bit.
pub const BITS_PER_CHAR: u32 = 10;

/// Duration of one character at `baud`, in microseconds, rounded up.
///
/// Returns `u32::MAX` for a baud rate of zero.
pub const fn char_time_us(baud: u32) -> u32 {
    if baud == 0 {
        return u32::MAX;
    }
    (BITS_PER_CHAR * 1_000_000).div_ceil(baud)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_time_common_rates() {
        assert_eq!(char_time_us(9_600), 1042);
        assert_eq!(char_time_us(38_400), 261);
        assert_eq!(char_time_us(115_200), 87);
    }

    #[test]
    fn test_char_time_zero_baud() {
        assert_eq!(char_time_us(0), u32::MAX);
    }
}
