//! Response frames and the packed switch field.
//!
//! Two responses exist, both plain ASCII terminated by `\r\n`:
//!
//! | Frame | Bytes | Layout |
//! |-------|-------|--------|
//! | [`Frame::ResetAck`] | 5 | `[R]\r\n` |
//! | [`Frame::Status`] | 11 | `[S` dddd ss `]\r\n` |
//!
//! `dddd` is the encoder delta as a big-endian 16-bit hex value and `ss` is the
//! [`SwitchBits`] field. A frame only exists between formatting and the last
//! byte leaving the transmitter; the device formats straight into the output
//! buffer with [`Frame::write_to`].

use heapless::Vec;

use crate::consts::{
    FRAME_END, FRAME_START, FRAME_TERMINATOR, RESET_FRAME_LEN, SELECTOR_MASK, STATUS_DELTA_OFFSET,
    STATUS_FRAME_LEN, STATUS_SWITCH_OFFSET, SWITCH_AXIS_SHIFT, SWITCH_E_STOP_BIT,
    SWITCH_STEP_SHIFT, TAG_RESET, TAG_STATUS,
};
use crate::error::{Error, Result};
use crate::hex;

/// Packed switch readouts: bits 0-2 axis, bits 3-5 step, bit 6 e-stop.
///
/// Bit 7 is always clear. Selector values wider than 3 bits are truncated.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SwitchBits(u8);

impl SwitchBits {
    /// Packs the three switch readouts into one byte.
    pub const fn pack(axis: u8, step: u8, e_stop: bool) -> Self {
        let mut bits = (axis & SELECTOR_MASK) << SWITCH_AXIS_SHIFT;
        bits |= (step & SELECTOR_MASK) << SWITCH_STEP_SHIFT;
        if e_stop {
            bits |= SWITCH_E_STOP_BIT;
        }
        Self(bits)
    }

    /// Wraps a raw switch byte, as received by the host.
    pub const fn from_raw(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw byte.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Axis selector position.
    pub const fn axis(self) -> u8 {
        (self.0 >> SWITCH_AXIS_SHIFT) & SELECTOR_MASK
    }

    /// Step-size selector position.
    pub const fn step(self) -> u8 {
        (self.0 >> SWITCH_STEP_SHIFT) & SELECTOR_MASK
    }

    /// Whether the emergency stop is engaged.
    pub const fn e_stop(self) -> bool {
        self.0 & SWITCH_E_STOP_BIT != 0
    }
}

/// Payload of a status response.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct StatusReport {
    /// Encoder delta since the previous read, as its 16-bit two's-complement pattern.
    pub delta: u16,
    /// Switch readouts.
    pub switches: SwitchBits,
}

impl StatusReport {
    /// The delta interpreted as the signed count the encoder accumulated.
    pub const fn signed_delta(&self) -> i16 {
        i16::from_be_bytes(self.delta.to_be_bytes())
    }
}

/// A response sent from the device to the host.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Frame {
    /// Acknowledges a reset request.
    ResetAck,
    /// Reports encoder delta and switch state.
    Status(StatusReport),
}

impl Frame {
    /// Encoded length of this frame in bytes.
    pub const fn encoded_len(&self) -> usize {
        match self {
            Frame::ResetAck => RESET_FRAME_LEN,
            Frame::Status(_) => STATUS_FRAME_LEN,
        }
    }

    /// Formats the frame into `out`, replacing its contents.
    ///
    /// Every buffer of at least [`STATUS_FRAME_LEN`] bytes holds any frame.
    ///
    /// # Errors
    /// [`Error::BufferTooSmall`] if `N` is less than [`encoded_len`](Frame::encoded_len);
    /// `out` is left untouched.
    pub fn write_to<const N: usize>(&self, out: &mut Vec<u8, N>) -> Result<()> {
        let needed = self.encoded_len();
        if needed > N {
            return Err(Error::BufferTooSmall {
                needed,
                capacity: N,
            });
        }
        out.clear();
        let mut raw = [0u8; STATUS_FRAME_LEN];
        raw[0] = FRAME_START;
        let body_end = match self {
            Frame::ResetAck => {
                raw[1] = TAG_RESET;
                2
            }
            Frame::Status(report) => {
                raw[1] = TAG_STATUS;
                raw[STATUS_DELTA_OFFSET..STATUS_SWITCH_OFFSET]
                    .copy_from_slice(&hex::encode_u16(report.delta));
                raw[STATUS_SWITCH_OFFSET..STATUS_SWITCH_OFFSET + 2]
                    .copy_from_slice(&hex::encode_u8(report.switches.bits()));
                STATUS_SWITCH_OFFSET + 2
            }
        };
        raw[body_end] = FRAME_END;
        raw[body_end + 1..body_end + 3].copy_from_slice(&FRAME_TERMINATOR);
        out.extend_from_slice(&raw[..needed])
            .map_err(|()| Error::BufferTooSmall {
                needed,
                capacity: N,
            })
    }

    /// Parses a complete response frame as received by the host.
    ///
    /// # Errors
    /// - [`Error::InvalidLength`] if `bytes` is neither 5 nor 11 bytes long
    /// - [`Error::Delimiter`] if the brackets or `\r\n` are missing
    /// - [`Error::UnknownTag`] if the tag does not match the frame length
    /// - [`Error::InvalidHex`] if a status field holds a non-hex character
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let len = bytes.len();
        if len != RESET_FRAME_LEN && len != STATUS_FRAME_LEN {
            return Err(Error::InvalidLength(len));
        }
        if bytes[0] != FRAME_START
            || bytes[len - 3] != FRAME_END
            || bytes[len - 2..] != FRAME_TERMINATOR
        {
            return Err(Error::Delimiter);
        }
        match (bytes[1], len) {
            (TAG_RESET, RESET_FRAME_LEN) => Ok(Frame::ResetAck),
            (TAG_STATUS, STATUS_FRAME_LEN) => {
                let delta = hex::decode_u16(&bytes[STATUS_DELTA_OFFSET..STATUS_SWITCH_OFFSET])
                    .ok_or(Error::InvalidHex)?;
                let switches = hex::decode_u8(
                    bytes[STATUS_SWITCH_OFFSET],
                    bytes[STATUS_SWITCH_OFFSET + 1],
                )
                .ok_or(Error::InvalidHex)?;
                Ok(Frame::Status(StatusReport {
                    delta,
                    switches: SwitchBits::from_raw(switches),
                }))
            }
            (tag, _) => Err(Error::UnknownTag(tag)),
        }
    }
}
