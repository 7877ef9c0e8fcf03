//! Automatic tag and converter resolution
//!
//! | Rust type | Universal tag  | Converter               |
//! |-----------|----------------|-------------------------|
//! | `bool`    | BOOLEAN        | `BooleanConverter`      |
//! | `i8`      | INTEGER        | `ByteConverter`         |
//! | `i16`     | INTEGER        | `ShortConverter`        |
//! | `i32`     | INTEGER        | `IntegerConverter`      |
//! | `i64`     | INTEGER        | `LongConverter`         |
//! | `String`  | OCTET STRING   | `Utf8StringConverter`   |
//! | `Vec<u8>` | OCTET STRING   | `OctetStringConverter`  |
//!
//! Structures resolve to SEQUENCE, collections to SEQUENCE or SET.

use crate::converter::{
    BooleanConverter, ByteConverter, IntegerConverter, LongConverter, OctetStringConverter,
    ShortConverter, Utf8StringConverter,
};
use crate::description::CollectionKind;
use asn_core::{AsnConverter, Tag, universal};
use std::any::TypeId;

/// A scalar type with a default universal tag and converter
pub trait AutoAsn: Sized + 'static {
    const UNIVERSAL_TAG: u32;

    type Converter: AsnConverter<Self> + Default + 'static;
}

macro_rules! auto_asn {
    ($($ty:ty => $tag:expr, $converter:ty;)*) => {
        $(
            impl AutoAsn for $ty {
                const UNIVERSAL_TAG: u32 = $tag;
                type Converter = $converter;
            }
        )*

        fn auto_universal_tag(id: TypeId) -> Option<u32> {
            $(
                if id == TypeId::of::<$ty>() {
                    return Some(<$ty as AutoAsn>::UNIVERSAL_TAG);
                }
            )*
            None
        }
    };
}

auto_asn! {
    bool => universal::BOOLEAN, BooleanConverter;
    i8 => universal::INTEGER, ByteConverter;
    i16 => universal::INTEGER, ShortConverter;
    i32 => universal::INTEGER, IntegerConverter;
    i64 => universal::INTEGER, LongConverter;
    String => universal::OCTET_STRING, Utf8StringConverter;
    Vec<u8> => universal::OCTET_STRING, OctetStringConverter;
}

/// Resolves tags for fields declared without one
#[derive(Debug, Clone, Copy, Default)]
pub struct BerAutoResolver;

impl BerAutoResolver {
    /// Universal tag of a scalar type, `None` for types without a default
    pub fn universal_tag<V: 'static>() -> Option<Tag> {
        auto_universal_tag(TypeId::of::<V>()).map(Tag::universal)
    }

    pub fn structure_tag() -> Tag {
        Tag::SEQUENCE
    }

    pub fn collection_tag(kind: CollectionKind) -> Tag {
        match kind {
            CollectionKind::List => Tag::SEQUENCE,
            CollectionKind::Set => Tag::SET,
        }
    }
}
