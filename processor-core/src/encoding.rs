//! Incremental base64 encoding for streamed bodies

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::{BufMut, BytesMut};

/// Encodes a body chunk by chunk so that the concatenated output equals the
/// encoding of the whole body. Bytes that do not fill a 3-byte group are held
/// back until the next chunk, or flushed with padding on the last one.
#[derive(Debug, Default)]
pub struct Base64ChunkEncoder {
    leftovers: BytesMut,
}

impl Base64ChunkEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, chunk: &[u8], last_chunk: bool) -> String {
        let mut buf = self.leftovers.split();
        buf.put_slice(chunk);

        if !last_chunk {
            let complete = buf.len() - buf.len() % 3;
            self.leftovers = buf.split_off(complete);
        }

        STANDARD.encode(&buf)
    }
}
