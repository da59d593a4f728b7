// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Decodes a stream of byte chunks as UTF-8. A multi-byte character split across two
/// chunks is held back until the rest of it arrives. Invalid bytes decode to
/// [`char::REPLACEMENT_CHARACTER`].
#[derive(Debug, Default, Clone)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut acc = String::with_capacity(input.len());
        let mut chunks = input.utf8_chunks().peekable();

        while let Some(chunk) = chunks.next() {
            acc.push_str(chunk.valid());

            let invalid = chunk.invalid();
            if invalid.is_empty() {
                continue;
            }

            let is_last = chunks.peek().is_none();
            if is_last && is_truncated_utf8(invalid) {
                self.pending = invalid.to_vec();
            } else {
                acc.push(char::REPLACEMENT_CHARACTER);
            }
        }

        acc
    }

    /// Flushes a dangling partial character at end of input.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool { !self.pending.is_empty() }
}

/// `true` if `bytes` is the start of a valid multi-byte character that was cut short.
fn is_truncated_utf8(bytes: &[u8]) -> bool {
    matches!(std::str::from_utf8(bytes), Err(error) if error.error_len().is_none())
}
