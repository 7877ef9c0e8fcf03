use asn_core::{AsnConverter, AsnError, AsnResult, hex};

/// UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8StringConverter;

impl AsnConverter<String> for Utf8StringConverter {
    fn decode(&self, data: &[u8]) -> AsnResult<String> {
        String::from_utf8(data.to_vec()).map_err(|e| {
            AsnError::Convert(format!("{} is not valid UTF-8: {}", hex::encode(data), e))
        })
    }

    fn encode(&self, value: &String) -> AsnResult<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }
}

/// 7-bit ASCII text, anything outside that range is rejected both ways
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiStringConverter;

impl AsnConverter<String> for AsciiStringConverter {
    fn decode(&self, data: &[u8]) -> AsnResult<String> {
        if !data.is_ascii() {
            return Err(AsnError::Convert(format!(
                "{} is not an ASCII string",
                hex::encode(data)
            )));
        }
        Ok(data.iter().map(|&b| b as char).collect())
    }

    fn encode(&self, value: &String) -> AsnResult<Vec<u8>> {
        if !value.is_ascii() {
            return Err(AsnError::Convert(format!("'{}' is not an ASCII string", value)));
        }
        Ok(value.as_bytes().to_vec())
    }
}
