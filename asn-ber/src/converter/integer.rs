//! INTEGER value octets for fixed width signed integers
//!
//! Encoding produces the minimal big-endian two's complement form. Decoding
//! accepts redundant sign extension octets but rejects any value that does
//! not fit the target width.

use asn_core::{AsnConverter, AsnError, AsnResult, hex};

/// Strip leading octets that only repeat the sign of the next one
fn significant(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < bytes.len() {
        let redundant = match bytes[start] {
            0x00 => bytes[start + 1] & 0x80 == 0,
            0xFF => bytes[start + 1] & 0x80 != 0,
            _ => false,
        };
        if !redundant {
            break;
        }
        start += 1;
    }
    &bytes[start..]
}

macro_rules! integer_converter {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl AsnConverter<$ty> for $name {
            fn decode(&self, data: &[u8]) -> AsnResult<$ty> {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                if data.is_empty() {
                    return Err(AsnError::Convert(format!(
                        "Cannot convert empty value to {}",
                        stringify!($ty)
                    )));
                }

                let significant = significant(data);
                if significant.len() > WIDTH {
                    return Err(AsnError::Convert(format!(
                        "Cannot convert {} to {}",
                        hex::encode(data),
                        stringify!($ty)
                    )));
                }

                let fill = if significant[0] & 0x80 != 0 { 0xFF } else { 0x00 };
                let mut buffer = [fill; WIDTH];
                buffer[WIDTH - significant.len()..].copy_from_slice(significant);
                Ok(<$ty>::from_be_bytes(buffer))
            }

            fn encode(&self, value: &$ty) -> AsnResult<Vec<u8>> {
                Ok(significant(&value.to_be_bytes()).to_vec())
            }
        }
    };
}

integer_converter!(
    /// INTEGER as `i8`
    ByteConverter,
    i8
);
integer_converter!(
    /// INTEGER as `i16`
    ShortConverter,
    i16
);
integer_converter!(
    /// INTEGER as `i32`
    IntegerConverter,
    i32
);
integer_converter!(
    /// INTEGER as `i64`
    LongConverter,
    i64
);
