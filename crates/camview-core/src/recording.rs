//! In-memory recording buffers.
//!
//! Recording accumulates full-resolution encoded frames in memory until the
//! user stops and downloads them; nothing is spilled to disk while recording
//! is active.

/// A single encoded (PNG) frame held in memory.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

impl EncodedFrame {
    /// Wraps encoded bytes as a frame.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Size of the encoded frame in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the frame is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An ordered buffer of recorded frames.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frames: Vec<EncodedFrame>,
}

impl FrameBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame.
    pub fn push(&mut self, frame: EncodedFrame) {
        self.frames.push(frame);
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frames have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total encoded bytes across all frames.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.frames.iter().map(EncodedFrame::len).sum()
    }

    /// Iterates over recorded frames in capture order.
    pub fn iter(&self) -> impl Iterator<Item = &EncodedFrame> {
        self.frames.iter()
    }

    /// Removes and returns all frames, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<EncodedFrame> {
        std::mem::take(&mut self.frames)
    }

    /// Discards all frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_preserve_order() {
        let mut buf = FrameBuffer::new();
        assert!(buf.is_empty());

        buf.push(EncodedFrame::new(vec![1]));
        buf.push(EncodedFrame::new(vec![2, 2]));
        buf.push(EncodedFrame::new(vec![3, 3, 3]));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.total_bytes(), 6);

        let frames = buf.drain();
        assert!(buf.is_empty());
        let sizes: Vec<usize> = frames.iter().map(EncodedFrame::len).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
    }
}
