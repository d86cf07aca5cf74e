//! Incremental UTF-8 decoding of streamed fragments.
use encoding_rs::{CoderResult, Decoder, DecoderResult, UTF_8};

/// Bytes dropped at the end of a stream because they never completed a character.
///
/// This is a formatting artifact, not an error: the rest of the reply is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeArtifact {
    pub discarded: usize,
}

/// Turns a sequence of byte fragments into text fragments.
///
/// A character split across fragment boundaries is held back until its remaining bytes arrive,
/// so concatenating every decoded fragment gives the same text as decoding all bytes at once.
/// Invalid sequences in the middle of the stream are replaced with U+FFFD.
pub struct ChunkDecoder {
    inner: Decoder,
}

impl Default for ChunkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChunkDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkDecoder")
            .field("encoding", &self.inner.encoding().name())
            .finish()
    }
}

impl ChunkDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: UTF_8.new_decoder_without_bom_handling(),
        }
    }

    /// Decodes the next fragment, buffering an incomplete trailing character.
    pub fn decode(&mut self, fragment: &[u8]) -> String {
        let mut text = String::with_capacity(self.capacity_for(fragment.len()));
        let mut src = fragment;

        loop {
            let (result, read, _) = self.inner.decode_to_string(src, &mut text, false);
            src = &src[read..];

            match result {
                CoderResult::InputEmpty => return text,
                CoderResult::OutputFull => text.reserve(self.capacity_for(src.len())),
            }
        }
    }

    /// Ends the stream. Bytes still waiting for the rest of their character are dropped.
    pub fn finish(mut self) -> Option<DecodeArtifact> {
        let mut sink = String::with_capacity(self.capacity_for(0));
        let mut discarded = 0;

        loop {
            let (result, _) = self
                .inner
                .decode_to_string_without_replacement(&[], &mut sink, true);

            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::Malformed(bad, _) => discarded += usize::from(bad),
                DecoderResult::OutputFull => sink.reserve(self.capacity_for(0)),
            }
        }

        if discarded == 0 {
            None
        } else {
            log::warn!("discarded {} undecodable trailing bytes", discarded);
            Some(DecodeArtifact { discarded })
        }
    }

    fn capacity_for(&self, byte_length: usize) -> usize {
        self.inner
            .max_utf8_buffer_length(byte_length)
            .unwrap_or(byte_length.saturating_mul(3))
            .max(4)
    }
}
