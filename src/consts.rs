//! Constants used across the pendant link protocol.
//!
//! This module defines the wire-level command bytes, the fixed response frame
//! layouts, buffer sizing, and the bit layout of the packed switch field.
//!
//! ## Key Concepts
//!
//! - **Commands**: Single ASCII bytes sent by the host, no payload.
//! - **Frames**: Fixed-length ASCII responses delimited by `[` ... `]\r\n`.
//! - **Switch field**: One byte packing the axis selector, step selector and
//!   emergency-stop input, sent as two hex digits.
//!
//! These values should be used wherever framing or buffer logic is implemented
//! to keep the device and host sides in agreement.

/// Command byte requesting an encoder reset.
pub const CMD_RESET: u8 = b'R';

/// Command byte requesting a status report.
pub const CMD_STATUS: u8 = b'S';

/// First byte of every response frame.
pub const FRAME_START: u8 = b'[';

/// Closing delimiter, followed by the line terminator.
pub const FRAME_END: u8 = b']';

/// Line terminator appended to every frame.
pub const FRAME_TERMINATOR: [u8; 2] = *b"\r\n";

/// Tag byte identifying a reset acknowledgement frame.
pub const TAG_RESET: u8 = CMD_RESET;

/// Tag byte identifying a status report frame.
pub const TAG_STATUS: u8 = CMD_STATUS;

/// Total length of the reset acknowledgement frame, `[R]\r\n`.
pub const RESET_FRAME_LEN: usize = 5;

/// Total length of the status report frame, `[Sddddss]\r\n`.
pub const STATUS_FRAME_LEN: usize = 11;

/// Offset of the four encoder-delta hex digits within a status frame.
pub const STATUS_DELTA_OFFSET: usize = 2;

/// Offset of the two switch-field hex digits within a status frame.
pub const STATUS_SWITCH_OFFSET: usize = 6;

/// Capacity (in bytes) of the output frame buffer.
///
/// Must hold the longest frame; the spare room matches the 16 byte transmit
/// buffer the firmware has always reserved.
pub const FRAME_BUFFER_CAPACITY: usize = 16;

/// Mask applied to a selector value before packing (3 bits per selector).
pub const SELECTOR_MASK: u8 = 0x07;

/// Bit offset of the axis selector within the switch field.
pub const SWITCH_AXIS_SHIFT: u8 = 0;

/// Bit offset of the step-size selector within the switch field.
pub const SWITCH_STEP_SHIFT: u8 = 3;

/// Bit set in the switch field while the emergency stop is engaged.
pub const SWITCH_E_STOP_BIT: u8 = 1 << 6;

const _: () = assert!(FRAME_BUFFER_CAPACITY >= STATUS_FRAME_LEN);
const _: () = assert!(FRAME_BUFFER_CAPACITY <= u8::MAX as usize);
