//! BER identifier and length octets
//!
//! # Identifier Octets
//!
//! Short form (tag number 0-30):
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//!
//! High-tag-number form (tag number >= 31):
//! ```text
//! First byte:      C C P 1 1 1 1 1  (all tag bits set to 1)
//! Following bytes: 1 T T T T T T T  (continuation bytes, last byte has bit 8 = 0)
//! ```
//!
//! # Length Octets
//!
//! Short form (0-127):
//! ```text
//! Byte: 0 L L L L L L L
//! ```
//!
//! Long form:
//! ```text
//! First byte:      1 N N N N N N N  (N = number of length bytes)
//! Following bytes: L L L L L L L L  (big-endian length value)
//! ```
//!
//! Indefinite length (`0x80`) is not supported.

use asn_core::hex;
use asn_core::{AsnError, AsnResult, Tag, TagClass};

/// Bits 8-7 of the first identifier octet
pub const CLASS_BITS: u8 = 0xC0;
/// Bit 6 of the first identifier octet
pub const CONSTRUCTED_BIT: u8 = 0x20;
/// Bits 5-1 of the first identifier octet
pub const TAG_NUMBER_BITS: u8 = 0x1F;
/// Bit 8, continuation flag of tag octets and long form flag of length octets
pub const MOST_SIGNIFICANT_BIT: u8 = 0x80;
/// Bits 7-1
pub const NON_LEADING_BITS: u8 = 0x7F;

/// Largest tag number that still fits in the short form
const MAX_SHORT_TAG_NUMBER: u32 = 30;

/// Encode a tag to its identifier octets
pub fn encode_tag(tag: &Tag) -> Vec<u8> {
    let description = tag.class().to_bits()
        | if tag.is_constructed() {
            CONSTRUCTED_BIT
        } else {
            0x00
        };

    if tag.number() <= MAX_SHORT_TAG_NUMBER {
        return vec![description | tag.number() as u8];
    }

    // 7 bit chunks, least significant first
    let mut remaining = tag.number();
    let mut chunks = Vec::with_capacity(5);
    while remaining > 0 {
        chunks.push((remaining & NON_LEADING_BITS as u32) as u8);
        remaining >>= 7;
    }

    let mut result = Vec::with_capacity(chunks.len() + 1);
    result.push(description | TAG_NUMBER_BITS);
    for (i, &chunk) in chunks.iter().rev().enumerate() {
        if i < chunks.len() - 1 {
            result.push(chunk | MOST_SIGNIFICANT_BIT);
        } else {
            result.push(chunk);
        }
    }
    result
}

/// Parse a complete group of identifier octets
///
/// # Error Handling
/// Returns [`AsnError::Parse`] if:
/// - The octets are empty
/// - A single octet has bits 5-1 all set
/// - A multi-octet tag does not have bits 5-1 of the first octet all set
/// - A non-final continuation octet has bit 8 cleared, or the final one has it set
/// - The tag number does not fit in 32 bits
pub fn parse_tag(octets: &[u8]) -> AsnResult<Tag> {
    let (&first, rest) = octets
        .split_first()
        .ok_or_else(|| AsnError::Parse("Empty identifier octets".to_string()))?;

    let class = TagClass::from_bits(first & CLASS_BITS);
    let constructed = first & CONSTRUCTED_BIT == CONSTRUCTED_BIT;

    if rest.is_empty() {
        if first & TAG_NUMBER_BITS == TAG_NUMBER_BITS {
            return Err(AsnError::Parse(format!(
                "If bits 5 to 1 are set tag must not be only one byte long: {:02X}",
                first
            )));
        }
        return Ok(Tag::new(
            (first & TAG_NUMBER_BITS) as u32,
            class,
            constructed,
        ));
    }

    if first & TAG_NUMBER_BITS != TAG_NUMBER_BITS {
        return Err(AsnError::Parse(format!(
            "For multibyte tags bits 5 to 1 of the first byte must be all set to 1: {}",
            hex::encode(octets)
        )));
    }

    let last = rest.len() - 1;
    if rest[last] & MOST_SIGNIFICANT_BIT != 0 {
        return Err(AsnError::Parse(format!(
            "For multibyte tag bit 8 of the final byte must be 0: {}",
            hex::encode(octets)
        )));
    }

    let mut number: u32 = 0;
    for (i, &octet) in rest.iter().enumerate() {
        if i < last && octet & MOST_SIGNIFICANT_BIT != MOST_SIGNIFICANT_BIT {
            return Err(AsnError::Parse(format!(
                "For multibyte tag bit 8 of the internal bytes must be 1: {}",
                hex::encode(octets)
            )));
        }
        if number > u32::MAX >> 7 {
            return Err(AsnError::Parse(format!(
                "Tag number does not fit in 32 bits: {}",
                hex::encode(octets)
            )));
        }
        number = (number << 7) | (octet & NON_LEADING_BITS) as u32;
    }

    Ok(Tag::new(number, class, constructed))
}

/// Encode a length to its length octets
///
/// Lengths below 128 use the short form, everything else the minimal long form.
pub fn encode_length(length: usize) -> Vec<u8> {
    if length < 0x80 {
        return vec![length as u8];
    }

    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[skip..];

    let mut result = Vec::with_capacity(significant.len() + 1);
    result.push(MOST_SIGNIFICANT_BIT | significant.len() as u8);
    result.extend_from_slice(significant);
    result
}

/// Parse a complete group of length octets
///
/// # Error Handling
/// Returns [`AsnError::Parse`] if:
/// - The octets are empty
/// - A single octet has the high bit set (this includes indefinite length)
/// - The first of several octets does not have the high bit set
/// - The count in the first octet does not match the number of following octets
/// - The value does not fit in `usize`
pub fn parse_length(octets: &[u8]) -> AsnResult<usize> {
    let (&first, rest) = octets
        .split_first()
        .ok_or_else(|| AsnError::Parse("Empty length octets".to_string()))?;

    if rest.is_empty() {
        if first & MOST_SIGNIFICANT_BIT == MOST_SIGNIFICANT_BIT {
            return Err(AsnError::Parse(format!(
                "When length is 1 byte, first bit should not be 1: {:02X}",
                first
            )));
        }
        return Ok(first as usize);
    }

    if first & MOST_SIGNIFICANT_BIT != MOST_SIGNIFICANT_BIT {
        return Err(AsnError::Parse(format!(
            "When length is more than 1 byte, first bit should be 1: {}",
            hex::encode(octets)
        )));
    }

    if (first & NON_LEADING_BITS) as usize != rest.len() {
        return Err(AsnError::Parse(format!(
            "Length is not as described in the first byte: {} != {}",
            hex::encode(octets),
            rest.len()
        )));
    }

    rest.iter().try_fold(0usize, |length, &octet| {
        length
            .checked_mul(0x100)
            .map(|length| length | octet as usize)
            .ok_or_else(|| {
                AsnError::Parse(format!("Length does not fit in usize: {}", hex::encode(octets)))
            })
    })
}
