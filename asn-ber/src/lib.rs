//! BER codec for described Rust types
//!
//! This crate provides the BER engine on top of `asn-core`:
//!
//! - [`ber`]: tag and length octets, TLV assembly, the decoder and encoder
//! - [`tlv`]: raw TLV records and the readers producing them
//! - [`converter`]: value octets of scalar types
//! - [`description`]: per type descriptor tables declared through [`AsnType`]
//! - [`registry`]: process wide caches of descriptor tables and converters
//! - [`resolver`]: default tags and converters for fields declared without one
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use asn_ber::{AsnType, BerDecoder, BerEncoder, ConverterCache, TypeDescription};
//! use asn_core::{AsnResult, Tag};
//!
//! #[derive(Default)]
//! struct Address {
//!     value: Option<String>,
//!     number: Option<i32>,
//! }
//!
//! impl AsnType for Address {
//!     fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
//!         TypeDescription::structure(Tag::SEQUENCE, Address::default, converters)
//!             .primitive("value", None, |a| a.value.as_ref(), |a, v| a.value = Some(v))
//!             .primitive("number", Some(Tag::context(1)), |a| a.number.as_ref(), |a, v| a.number = Some(v))
//!             .build()
//!     }
//! }
//!
//! let bytes = BerEncoder::new().encode(&address)?;
//! let decoded: Address = BerDecoder::new().decode(&bytes)?;
//! ```

pub mod ber;
pub mod converter;
pub mod description;
pub mod registry;
pub mod resolver;
pub mod tlv;

#[cfg(test)]
mod test_models;

pub use ber::{BerDecoder, BerEncoder, BerStructureBuilder};
pub use description::{
    AsnCollection, AsnType, CollectionKind, FieldDescription, FieldRole, TypeDescription,
};
pub use registry::{ConverterCache, Registry};
pub use resolver::{AutoAsn, BerAutoResolver};
pub use tlv::{BerData, BerDataExtractReader, BerDataReader, TlvDataReader};
