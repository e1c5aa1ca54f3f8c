//! Plain-text decoding: UTF-8 identity passthrough with Latin-1 fallback.

/// Decode uploaded bytes as text.
///
/// Valid UTF-8 round-trips byte-identically. Anything else is decoded as
/// Latin-1, which maps every byte to a character, so text-like files in
/// legacy encodings still produce usable output instead of an error.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
