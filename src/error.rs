//! Error type for the fallible conversions in this crate.
//!
//! The device-side handlers never surface errors: malformed input is dropped.
//! These variants are returned by [`Command::try_from`](crate::command::Command),
//! [`Frame::parse`](crate::frame::Frame::parse) and
//! [`Frame::write_to`](crate::frame::Frame::write_to).

use thiserror::Error;

/// Errors produced when interpreting or formatting bytes on the link.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// The byte is not a recognized command character.
    #[error("unrecognized command byte {0:#04x}")]
    UnknownCommand(u8),
    /// The frame length matches no known response.
    #[error("frame of {0} bytes matches no response layout")]
    InvalidLength(usize),
    /// The frame is not enclosed in `[` ... `]\r\n`.
    #[error("frame delimiters are missing or misplaced")]
    Delimiter,
    /// The frame tag does not match its length.
    #[error("unexpected frame tag {0:#04x}")]
    UnknownTag(u8),
    /// A hex field contains a non-hex character.
    #[error("invalid hex digit in frame")]
    InvalidHex,
    /// The output buffer cannot hold the frame.
    #[error("frame needs {needed} bytes, buffer holds {capacity}")]
    BufferTooSmall {
        /// Encoded length of the frame.
        needed: usize,
        /// Capacity of the output buffer.
        capacity: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
