//! Raw TLV record

use crate::ber::types::parse_tag;
use asn_core::{AsnResult, Tag, hex};
use bytes::Bytes;
use std::fmt;

/// One TLV as it appeared on the wire
///
/// Holds the identifier octets, the length octets and the value octets
/// exactly as read. The record is transient: it lives while the enclosing
/// structure is being decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BerData {
    tag: Bytes,
    length: Bytes,
    value: Bytes,
}

impl BerData {
    pub fn new(tag: Bytes, length: Bytes, value: Bytes) -> Self {
        Self { tag, length, value }
    }

    /// Identifier octets
    pub fn tag_octets(&self) -> &[u8] {
        &self.tag
    }

    /// Length octets
    pub fn length_octets(&self) -> &[u8] {
        &self.length
    }

    /// Value octets
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// A cheap handle on the value, used as the cursor for nested TLVs
    pub fn value_bytes(&self) -> Bytes {
        self.value.clone()
    }

    /// Parse the identifier octets
    pub fn tag(&self) -> AsnResult<Tag> {
        parse_tag(&self.tag)
    }

    /// True when the value part is not empty
    pub fn is_value_present(&self) -> bool {
        !self.value.is_empty()
    }

    /// The record re-assembled as wire bytes: tag, length, value
    pub fn to_tlv(&self) -> Vec<u8> {
        let mut tlv = Vec::with_capacity(self.tag.len() + self.length.len() + self.value.len());
        tlv.extend_from_slice(&self.tag);
        tlv.extend_from_slice(&self.length);
        tlv.extend_from_slice(&self.value);
        tlv
    }
}

impl fmt::Display for BerData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BerData[tag={}, length={}, value={}]",
            hex::encode(&self.tag),
            hex::encode(&self.length),
            hex::encode(&self.value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> BerData {
        BerData::new(
            Bytes::from_static(&[0xA1]),
            Bytes::from_static(&[0x03]),
            Bytes::from_static(&[0x02, 0x01, 0x03]),
        )
    }

    #[test]
    fn test_to_tlv() {
        assert_eq!(data().to_tlv(), vec![0xA1, 0x03, 0x02, 0x01, 0x03]);
    }

    #[test]
    fn test_parsed_tag() {
        let tag = data().tag().unwrap();
        assert_eq!(tag, Tag::context(1));
        assert!(tag.is_constructed());
    }

    #[test]
    fn test_value_presence() {
        assert!(data().is_value_present());
        let empty = BerData::new(Bytes::from_static(&[0x80]), Bytes::from_static(&[0x00]), Bytes::new());
        assert!(!empty.is_value_present());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            data().to_string(),
            "BerData[tag=A1, length=03, value=020103]"
        );
    }
}
