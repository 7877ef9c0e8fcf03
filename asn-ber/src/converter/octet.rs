use asn_core::{AsnConverter, AsnResult};

/// OCTET STRING as raw bytes, passed through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct OctetStringConverter;

impl AsnConverter<Vec<u8>> for OctetStringConverter {
    fn decode(&self, data: &[u8]) -> AsnResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn encode(&self, value: &Vec<u8>) -> AsnResult<Vec<u8>> {
        Ok(value.clone())
    }
}
