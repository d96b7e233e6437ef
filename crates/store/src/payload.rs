//! Chunked payload transport for shape bitmaps.
//!
//! Shape bitmap serializations cross the sink boundary as a sequence of
//! fixed-size chunks rather than one allocation handed over in a single
//! call, bounding the transport layer's peak memory independent of image
//! size. Chunking is purely a transport detail: sinks must persist the
//! in-order concatenation of the chunks, byte-for-byte.

use crate::error::{ErrorKind, Result};

/// Fixed transport chunk size.
pub const CHUNK_SIZE: usize = 10 * 1024;

/// A serialized shape bitmap ready for upload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterate the payload as in-order chunks of at most [`CHUNK_SIZE`]
    /// bytes. An empty payload yields no chunks.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks(CHUNK_SIZE)
    }

    /// Take the whole payload as one allocation, failing if it exceeds
    /// `limit`. Non-chunked transport paths must go through this bound;
    /// chunked consumers should use [`chunks`](Self::chunks) instead.
    pub fn into_bytes_bounded(self, limit: usize) -> Result<Vec<u8>> {
        if self.bytes.len() > limit {
            exn::bail!(ErrorKind::PayloadTooLarge { size: self.bytes.len(), limit });
        }
        Ok(self.bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(CHUNK_SIZE, 1)]
    #[case(CHUNK_SIZE + 1, 2)]
    #[case(3 * CHUNK_SIZE, 3)]
    fn test_chunk_count(#[case] len: usize, #[case] chunks: usize) {
        let payload = Payload::new(vec![0u8; len]);
        assert_eq!(payload.chunks().count(), chunks);
    }

    #[test]
    fn test_chunks_reassemble_exactly() {
        // Just over two chunks, with a recognizable byte pattern.
        let bytes: Vec<u8> = (0..(2 * CHUNK_SIZE + 37)).map(|i| (i % 251) as u8).collect();
        let payload = Payload::new(bytes.clone());
        let mut reassembled = Vec::new();
        for chunk in payload.chunks() {
            assert!(chunk.len() <= CHUNK_SIZE);
            reassembled.extend_from_slice(chunk);
        }
        assert_eq!(reassembled, bytes);
    }

    #[test]
    fn test_bounded_take_rejects_oversized() {
        let payload = Payload::new(vec![0u8; 100]);
        assert!(payload.clone().into_bytes_bounded(99).is_err());
        assert_eq!(payload.into_bytes_bounded(100).unwrap().len(), 100);
    }
}
