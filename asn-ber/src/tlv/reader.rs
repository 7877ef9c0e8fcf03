//! Plain TLV reader

use super::{BerData, TlvDataReader};
use crate::ber::types::{
    MOST_SIGNIFICANT_BIT, NON_LEADING_BITS, TAG_NUMBER_BITS, parse_length,
};
use asn_core::{AsnError, AsnResult};
use bytes::Bytes;

/// Reads the next TLV from the cursor, whatever its tag
#[derive(Debug, Clone, Copy, Default)]
pub struct BerDataReader;

impl BerDataReader {
    pub fn new() -> Self {
        Self
    }
}

impl TlvDataReader for BerDataReader {
    fn read_next(&self, source: &mut Bytes) -> AsnResult<BerData> {
        read_tlv(source)
    }
}

/// Read identifier, length and value octets from the front of `source`
///
/// The cursor is only advanced when the whole record is available.
pub(crate) fn read_tlv(source: &mut Bytes) -> AsnResult<BerData> {
    let tag_size = tag_octets_size(source)?;
    let length_size = length_octets_size(&source[tag_size..])?;
    let header = tag_size + length_size;
    let value_size = parse_length(&source[tag_size..header])?;

    let available = source.len() - header;
    if available < value_size {
        return Err(AsnError::Read(format!(
            "Stream ended while reading value: need {} bytes, have {}",
            value_size, available
        )));
    }

    let tag = source.split_to(tag_size);
    let length = source.split_to(length_size);
    let value = source.split_to(value_size);
    Ok(BerData::new(tag, length, value))
}

/// Number of identifier octets at the front of `source`
fn tag_octets_size(source: &[u8]) -> AsnResult<usize> {
    let first = *source
        .first()
        .ok_or_else(|| AsnError::Read("Stream ended while reading tag".to_string()))?;

    if first & TAG_NUMBER_BITS != TAG_NUMBER_BITS {
        return Ok(1);
    }

    // continuation octets until one with bit 8 cleared
    source[1..]
        .iter()
        .position(|octet| octet & MOST_SIGNIFICANT_BIT == 0)
        .map(|last| last + 2)
        .ok_or_else(|| AsnError::Read("Stream ended while reading multibyte tag".to_string()))
}

/// Number of length octets at the front of `source`
fn length_octets_size(source: &[u8]) -> AsnResult<usize> {
    let first = *source
        .first()
        .ok_or_else(|| AsnError::Read("Stream ended while reading length".to_string()))?;

    if first & MOST_SIGNIFICANT_BIT != MOST_SIGNIFICANT_BIT {
        return Ok(1);
    }

    let size = 1 + (first & NON_LEADING_BITS) as usize;
    if source.len() < size {
        return Err(AsnError::Read(format!(
            "Stream ended while reading length: need {} bytes, have {}",
            size,
            source.len()
        )));
    }
    Ok(size)
}
