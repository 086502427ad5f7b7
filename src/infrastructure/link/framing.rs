//! Reassembly of the peer's newline-delimited text frames.

use tracing::warn;

/// Accumulates raw bytes and yields one trimmed text frame per line feed.
///
/// Bytes after the last line feed stay buffered; end of stream therefore
/// never emits a partial frame. A frame that fails UTF-8 decoding is logged
/// and dropped, never an error.
#[derive(Debug, Default)]
pub struct FrameAccumulator {
    buffer: Vec<u8>,
}

impl FrameAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns the complete frames it terminated.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut frames = Vec::new();
        for &byte in bytes {
            if byte == b'\n' {
                let raw = std::mem::take(&mut self.buffer);
                match String::from_utf8(raw) {
                    Ok(text) => frames.push(text.trim_end().to_string()),
                    Err(e) => warn!("discarding undecodable frame: {e}"),
                }
            } else {
                self.buffer.push(byte);
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_split_across_chunks_is_reassembled() {
        let mut acc = FrameAccumulator::new();
        assert!(acc.push(b"pos:").is_empty());
        assert!(acc.push(b"120").is_empty());
        assert_eq!(acc.push(b"\n"), vec!["pos:120"]);
    }

    #[test]
    fn multiple_frames_in_one_chunk_are_all_emitted() {
        let mut acc = FrameAccumulator::new();
        assert_eq!(acc.push(b"ok\nready\n"), vec!["ok", "ready"]);
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let mut acc = FrameAccumulator::new();
        assert_eq!(acc.push(b"done \r\n"), vec!["done"]);
    }

    #[test]
    fn bytes_after_the_last_newline_stay_buffered() {
        let mut acc = FrameAccumulator::new();
        assert_eq!(acc.push(b"a\npartial"), vec!["a"]);
        assert_eq!(acc.push(b" frame\n"), vec!["partial frame"]);
    }

    #[test]
    fn undecodable_frame_is_dropped_without_breaking_the_stream() {
        let mut acc = FrameAccumulator::new();
        assert!(acc.push(&[0xFF, 0xFE, b'\n']).is_empty());
        assert_eq!(acc.push(b"next\n"), vec!["next"]);
    }
}
