//! TLV assembly

use super::types::{encode_length, encode_tag};
use asn_core::Tag;

/// Encode a primitive TLV
pub fn encode_tlv(tag: &Tag, value: &[u8]) -> Vec<u8> {
    let mut tlv = encode_tag(tag);
    tlv.extend_from_slice(&encode_length(value.len()));
    tlv.extend_from_slice(value);
    tlv
}

/// Accumulates already encoded TLVs and wraps them in one constructed TLV
///
/// Values are written in the order they were added. `build` consumes the
/// builder.
#[derive(Debug)]
pub struct BerStructureBuilder {
    tag: Tag,
    values: Vec<Vec<u8>>,
    total_length: usize,
}

impl BerStructureBuilder {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            values: Vec::new(),
            total_length: 0,
        }
    }

    pub fn add_value(&mut self, value: Vec<u8>) {
        self.total_length += value.len();
        self.values.push(value);
    }

    pub fn build(self) -> Vec<u8> {
        let mut result = encode_tag(&self.tag);
        result.extend_from_slice(&encode_length(self.total_length));
        result.reserve(self.total_length);
        for value in self.values {
            result.extend_from_slice(&value);
        }
        result
    }
}
