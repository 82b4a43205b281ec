//! Fixed-capacity output buffer drained by the transmit handler.

use heapless::Vec;

use crate::consts::FRAME_BUFFER_CAPACITY;
use crate::error::Result;
use crate::frame::Frame;

/// Holds the frame currently being transmitted.
///
/// The buffer is allocated once (it is `const`-constructible so it can live in
/// a `static`) and reused for every response. Its contents and length are only
/// replaced by [`load`](FrameBuffer::load); the read cursor is only advanced
/// by [`next_byte`](FrameBuffer::next_byte). [`Link`](crate::link::Link) gates
/// both on the link state so the writer and the reader never overlap.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    bytes: Vec<u8, FRAME_BUFFER_CAPACITY>,
    /// Index of the next byte to transmit.
    cursor: u8,
}

impl FrameBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cursor: 0,
        }
    }

    /// Formats `frame` into the buffer and rewinds the cursor.
    ///
    /// On error the previous frame and cursor are kept.
    pub(crate) fn load(&mut self, frame: &Frame) -> Result<()> {
        frame.write_to(&mut self.bytes)?;
        self.cursor = 0;
        Ok(())
    }

    /// Drops any contents and rewinds the cursor.
    pub(crate) fn clear(&mut self) {
        self.bytes.clear();
        self.cursor = 0;
    }

    /// Returns the byte under the cursor and advances past it, or `None`
    /// once the whole frame has been handed out.
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.cursor as usize)?;
        self.cursor += 1;
        Some(byte)
    }

    /// Total length of the loaded frame.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no frame is loaded.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of bytes already handed to the transmitter.
    pub fn cursor(&self) -> usize {
        self.cursor as usize
    }

    /// Bytes of the loaded frame not yet transmitted.
    pub fn remaining(&self) -> &[u8] {
        &self.bytes[self.cursor()..]
    }

    /// The whole loaded frame.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
