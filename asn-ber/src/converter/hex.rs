use asn_core::{AsnConverter, AsnError, AsnResult, hex};

/// Raw octets presented as a hexadecimal string
///
/// Decoding yields uppercase digits; encoding accepts either case.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexStringConverter;

impl AsnConverter<String> for HexStringConverter {
    fn decode(&self, data: &[u8]) -> AsnResult<String> {
        Ok(hex::encode(data))
    }

    fn encode(&self, value: &String) -> AsnResult<Vec<u8>> {
        hex::decode(value).map_err(|e| {
            AsnError::Convert(format!("Cannot encode {} as hex: {}", value, e))
        })
    }
}
