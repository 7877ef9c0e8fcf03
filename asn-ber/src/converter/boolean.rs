use asn_core::{AsnConverter, AsnError, AsnResult, hex};

const TRUE: u8 = 0xFF;
const FALSE: u8 = 0x00;

/// BOOLEAN value octets
///
/// Only `0x00` and `0xFF` are accepted on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl AsnConverter<bool> for BooleanConverter {
    fn decode(&self, data: &[u8]) -> AsnResult<bool> {
        match data {
            [FALSE] => Ok(false),
            [TRUE] => Ok(true),
            [_] => Err(AsnError::Convert(format!(
                "{} doesn't represent boolean",
                hex::encode(data)
            ))),
            _ => Err(AsnError::Convert(format!(
                "Boolean must be exactly one byte: {}",
                hex::encode(data)
            ))),
        }
    }

    fn encode(&self, value: &bool) -> AsnResult<Vec<u8>> {
        Ok(vec![if *value { TRUE } else { FALSE }])
    }
}
