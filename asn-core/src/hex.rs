//! Hexadecimal helpers used for diagnostics and hex string conversion

use crate::error::{AsnError, AsnResult};

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Converts bytes to an uppercase hexadecimal string.
pub fn encode(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push(DIGITS[(byte >> 4) as usize] as char);
        hex.push(DIGITS[(byte & 0x0F) as usize] as char);
    }
    hex
}

/// Like [`encode`], but only the first `limit` bytes are converted and
/// `...` marks that the rest was left out.
pub fn encode_prefix(bytes: &[u8], limit: usize) -> String {
    if bytes.len() <= limit {
        return encode(bytes);
    }
    let mut hex = encode(&bytes[..limit]);
    hex.push_str("...");
    hex
}

/// Converts a hexadecimal string (either case) to bytes.
pub fn decode(hex: &str) -> AsnResult<Vec<u8>> {
    let hex = hex.as_bytes();
    if hex.len() % 2 != 0 {
        return Err(AsnError::Parse(format!(
            "Odd number of hex characters: {}",
            hex.len()
        )));
    }

    hex.chunks(2)
        .enumerate()
        .map(|(i, pair)| Ok((digit(pair[0], i * 2)? << 4) | digit(pair[1], i * 2 + 1)?))
        .collect()
}

fn digit(c: u8, index: usize) -> AsnResult<u8> {
    (c as char)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| {
            AsnError::Parse(format!(
                "Illegal hexadecimal character '{}' at index {}",
                c as char, index
            ))
        })
}
