//! Core types and utilities for ASN.1 encoding rules
//!
//! This crate provides the encoding-independent pieces shared by the codec
//! crates: the tag model, error handling, the converter contract, and small
//! utilities used while encoding and decoding.

pub mod converter;
pub mod counter;
pub mod error;
pub mod hex;
pub mod tag;

pub use converter::AsnConverter;
pub use counter::Counter;
pub use error::{AsnError, AsnResult};
pub use tag::{Tag, TagClass, universal};
