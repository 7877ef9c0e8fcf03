//! BER converters for primitive values
//!
//! Each converter implements [`AsnConverter`](asn_core::AsnConverter) for one
//! logical type. Converters are stateless and created once per registry.

pub mod boolean;
pub mod date;
pub mod hex;
pub mod integer;
pub mod octet;
pub mod string;

pub use boolean::BooleanConverter;
pub use date::DateConverter;
pub use hex::HexStringConverter;
pub use integer::{ByteConverter, IntegerConverter, LongConverter, ShortConverter};
pub use octet::OctetStringConverter;
pub use string::{AsciiStringConverter, Utf8StringConverter};
