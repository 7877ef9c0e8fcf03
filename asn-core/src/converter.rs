//! Converter contract between value bytes and logical values

use crate::error::AsnResult;

/// Converts the value octets of a primitive TLV to and from a logical value
///
/// A converter only ever sees the value part of a TLV; tag and length octets
/// are handled by the encoding engine. Implementations must be pure: the same
/// input always yields the same output, and a converter instance is shared by
/// every encode/decode call that uses it.
///
/// # Error Handling
///
/// `decode` must fail with [`AsnError::Convert`](crate::AsnError::Convert) when the
/// bytes cannot represent the target type (for example an integer wider than
/// the target width). Values are never clamped or truncated.
pub trait AsnConverter<V>: Send + Sync {
    /// Decode value octets into a logical value
    fn decode(&self, data: &[u8]) -> AsnResult<V>;

    /// Encode a logical value into value octets
    fn encode(&self, value: &V) -> AsnResult<Vec<u8>>;

    /// Absent bytes decode to an absent value
    fn decode_opt(&self, data: Option<&[u8]>) -> AsnResult<Option<V>> {
        data.map(|data| self.decode(data)).transpose()
    }

    /// Absent values encode to absent bytes
    fn encode_opt(&self, value: Option<&V>) -> AsnResult<Option<Vec<u8>>> {
        value.map(|value| self.encode(value)).transpose()
    }
}
