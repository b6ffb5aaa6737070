//! Delimiter-based frame extraction for the device-to-host byte stream.
//!
//! The player terminates every frame with `\r`. Frames produced here keep
//! that terminator, which is what the parsers in [`crate::frame`] expect.

use bytes::{Buf, BytesMut};

use crate::constants::{MAX_FRAME_LENGTH, RESPONSE_END, RESPONSE_START};

/// A codec that accumulates received bytes and yields complete frames.
///
/// - Splits the stream on `\r`
/// - Discards bytes before the `@` start marker (line noise, stray `\n`)
/// - Drops a partial frame that grows past `max_frame_length`
#[derive(Debug)]
pub struct FrameCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
    /// Longest frame accepted, terminator included.
    max_frame_length: usize,
    /// Number of frames dropped for exceeding the length limit.
    dropped: u64,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCodec {
    /// Create a new frame codec with the default length limit.
    pub fn new() -> Self {
        Self::with_max_frame_length(MAX_FRAME_LENGTH)
    }

    /// Create a new frame codec with a custom length limit.
    pub fn with_max_frame_length(max_frame_length: usize) -> Self {
        FrameCodec {
            buffer: BytesMut::with_capacity(max_frame_length),
            max_frame_length,
            dropped: 0,
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode a complete frame from the buffer.
    ///
    /// Returns `Some(frame)` including the trailing `\r`, or `None` if more
    /// data is needed.
    pub fn decode(&mut self) -> Option<Vec<u8>> {
        loop {
            // Scan for the start marker, discarding anything before it
            match self.buffer.iter().position(|&b| b == RESPONSE_START) {
                Some(start) => self.buffer.advance(start),
                None => {
                    self.buffer.clear();
                    return None;
                }
            }

            match self.buffer.iter().position(|&b| b == RESPONSE_END) {
                Some(end) if end < self.max_frame_length => {
                    return Some(self.buffer.split_to(end + 1).to_vec());
                }
                Some(end) => {
                    log::warn!("Dropping oversized frame ({} bytes)", end + 1);
                    self.buffer.advance(end + 1);
                    self.dropped += 1;
                }
                None if self.buffer.len() >= self.max_frame_length => {
                    log::warn!(
                        "Dropping unterminated frame after {} bytes",
                        self.buffer.len()
                    );
                    self.buffer.clear();
                    self.dropped += 1;
                    return None;
                }
                None => return None,
            }
        }
    }

    /// Decode every complete frame currently buffered.
    pub fn decode_all(&mut self) -> Vec<Vec<u8>> {
        std::iter::from_fn(|| self.decode()).collect()
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of frames dropped for exceeding the length limit.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
