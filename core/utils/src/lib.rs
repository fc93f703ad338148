pub mod source;

pub use source::{ByteSource, MappedSource, MemorySource, Result, SourceError};

/// Format bytes as uppercase hex pairs separated by spaces, e.g. "4A 00 FF".
pub fn bytes_to_hex_space(bytes: &[u8]) -> String {
    let hex_string = hex::encode_upper(bytes);
    let mut result = String::with_capacity(hex_string.len() + hex_string.len() / 2);
    for (i, c) in hex_string.char_indices() {
        if i > 0 && i % 2 == 0 {
            result.push(' ');
        }
        result.push(c);
    }
    result
}
