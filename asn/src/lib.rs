//! asn - ASN.1 BER codec for described Rust types
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `asn-core`: Tag model, error handling, converter contract and utilities
//! - `asn-ber`: BER tag/length codec, TLV readers, converters, descriptor
//!   tables and the encoding/decoding engines
//!
//! # Usage
//!
//! ```rust,ignore
//! use asn::{AsnType, BerDecoder, BerEncoder, ConverterCache, Tag, TypeDescription, AsnResult};
//!
//! impl AsnType for Address {
//!     fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
//!         TypeDescription::structure(Tag::SEQUENCE, Address::default, converters)
//!             .primitive("value", None, |a| a.value.as_ref(), |a, v| a.value = Some(v))
//!             .build()
//!     }
//! }
//!
//! let bytes = BerEncoder::new().encode(&address)?;
//! let address: Address = BerDecoder::new().decode(&bytes)?;
//! ```

// Re-export core types
pub use asn_core::{AsnConverter, AsnError, AsnResult, Counter, Tag, TagClass, hex, universal};

// Re-export the BER engine
pub use asn_ber::{
    AsnCollection, AsnType, AutoAsn, BerAutoResolver, BerData, BerDataExtractReader,
    BerDataReader, BerDecoder, BerEncoder, BerStructureBuilder, CollectionKind, ConverterCache,
    FieldDescription, FieldRole, Registry, TlvDataReader, TypeDescription,
};

pub mod converter {
    pub use asn_ber::converter::*;
}

pub mod ber {
    pub use asn_ber::ber::types::{encode_length, encode_tag, parse_length, parse_tag};
    pub use asn_ber::ber::encode_tlv;
}
