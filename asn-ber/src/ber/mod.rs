//! BER (Basic Encoding Rules) codec
//!
//! Each value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! - [`types`]: identifier and length octets
//! - [`builder`]: assembling primitive and constructed TLVs
//! - [`decoder`] / [`encoder`]: the engines turning bytes into described
//!   types and back
//!
//! Only definite lengths are supported.

pub mod builder;
pub mod decoder;
pub mod encoder;
pub mod types;

pub use builder::{BerStructureBuilder, encode_tlv};
pub use decoder::{BerDecoder, DEFAULT_MAX_DEPTH};
pub use encoder::BerEncoder;
pub use types::{encode_length, encode_tag, parse_length, parse_tag};
