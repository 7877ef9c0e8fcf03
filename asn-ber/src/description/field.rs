//! Field descriptors

use super::collection::CollectionKind;
use crate::ber::{BerDecoder, BerEncoder};
use crate::tlv::BerData;
use asn_core::{AsnError, AsnResult, Tag, hex};

/// Value octets quoted when a field cannot be decoded
const QUOTED_OCTETS: usize = 64;

/// Writes a decoded TLV, found at the given nesting level, into a field of `T`
pub(crate) type DecodeField<T> =
    Box<dyn Fn(&mut T, &BerDecoder, &BerData, usize) -> AsnResult<()> + Send + Sync>;

/// Reads a field of `T` and returns its complete TLV, or `None` when the field is absent
pub(crate) type EncodeField<T> =
    Box<dyn Fn(&T, &BerEncoder) -> AsnResult<Option<Vec<u8>>> + Send + Sync>;

/// What a field holds and how its value octets are interpreted
///
/// Type and converter names are only carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRole {
    /// A scalar handled by a converter
    Primitive { converter: &'static str },
    /// A nested structure or choice
    Structure { nested: &'static str },
    /// SET OF / SEQUENCE OF
    Collection {
        kind: CollectionKind,
        element_tag: Tag,
        structured: bool,
        element_type: &'static str,
        converter: Option<&'static str>,
    },
}

/// One declared field of a structure
pub struct FieldDescription<T> {
    name: &'static str,
    order: usize,
    tag: Tag,
    role: FieldRole,
    decode: DecodeField<T>,
    encode: EncodeField<T>,
}

impl<T> FieldDescription<T> {
    pub(crate) fn new(
        name: &'static str,
        order: usize,
        tag: Tag,
        role: FieldRole,
        decode: DecodeField<T>,
        encode: EncodeField<T>,
    ) -> Self {
        Self {
            name,
            order,
            tag,
            role,
            decode,
            encode,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Position in declaration order, which is also the encoding order
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn role(&self) -> &FieldRole {
        &self.role
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.role, FieldRole::Primitive { .. })
    }

    pub fn is_structure(&self) -> bool {
        matches!(self.role, FieldRole::Structure { .. })
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.role, FieldRole::Collection { .. })
    }

    /// Decode `data` into this field of `instance`, adding the field as context on failure
    ///
    /// Only the first octets of the value are quoted, so the error stays small
    /// however deep the failing value sits.
    pub(crate) fn decode_into(
        &self,
        instance: &mut T,
        decoder: &BerDecoder,
        data: &BerData,
        depth: usize,
    ) -> AsnResult<()> {
        (self.decode)(instance, decoder, data, depth).map_err(|e| {
            let message = match self.role {
                FieldRole::Primitive { .. } => format!(
                    "Cannot set value '{}' into field '{}'",
                    hex::encode_prefix(data.value(), QUOTED_OCTETS),
                    self.name
                ),
                FieldRole::Structure { .. } => {
                    format!("Cannot decode nested value of field '{}'", self.name)
                }
                FieldRole::Collection { .. } => format!(
                    "Cannot decode collection data '{}' into field '{}'",
                    hex::encode_prefix(data.value(), QUOTED_OCTETS),
                    self.name
                ),
            };
            AsnError::decode_with(message, e)
        })
    }

    /// Encode this field of `instance`
    pub(crate) fn encode_from(
        &self,
        instance: &T,
        encoder: &BerEncoder,
    ) -> AsnResult<Option<Vec<u8>>> {
        (self.encode)(instance, encoder).map_err(|e| {
            AsnError::encode_with(format!("Cannot encode field '{}' as {}", self.name, self.tag), e)
        })
    }
}

impl<T> std::fmt::Debug for FieldDescription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescription")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("tag", &self.tag)
            .field("role", &self.role)
            .finish()
    }
}
