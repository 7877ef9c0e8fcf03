//! Choice descriptors
//!
//! A choice is a sum type whose alternative is selected by the tag of the
//! TLV it is encoded as. On the wire a choice field looks like:
//!
//! ```text
//! [field tag] { [alternative tag] { ...alternative content... } }
//! ```
//!
//! An element of a choice collection is the alternative TLV itself.

use super::{AsnType, TypeDescription};
use crate::ber::builder::encode_tlv;
use crate::ber::{BerDecoder, BerEncoder};
use crate::registry::ConverterCache;
use crate::tlv::BerData;
use asn_core::{AsnConverter, AsnError, AsnResult, Tag};
use std::any::type_name;
use std::collections::HashMap;

pub(crate) type DecodeAlternative<T> =
    Box<dyn Fn(&BerDecoder, &BerData, usize) -> AsnResult<Option<T>> + Send + Sync>;

/// Returns `None` when the value is not this alternative
pub(crate) type EncodeAlternative<T> =
    Box<dyn Fn(&T, &BerEncoder) -> AsnResult<Option<Vec<u8>>> + Send + Sync>;

pub struct Alternative<T> {
    name: &'static str,
    tag: Tag,
    type_name: &'static str,
    structured: bool,
    decode: DecodeAlternative<T>,
    encode: EncodeAlternative<T>,
}

impl<T> Alternative<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Name of the type wrapped by this alternative
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_structured(&self) -> bool {
        self.structured
    }

    pub(crate) fn decode(
        &self,
        decoder: &BerDecoder,
        data: &BerData,
        depth: usize,
    ) -> AsnResult<Option<T>> {
        (self.decode)(decoder, data, depth)
    }

    pub(crate) fn encode(&self, value: &T, encoder: &BerEncoder) -> AsnResult<Option<Vec<u8>>> {
        (self.encode)(value, encoder)
    }
}

impl<T> std::fmt::Debug for Alternative<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alternative")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Descriptor table of a choice type
#[derive(Debug)]
pub struct ChoiceDescription<T> {
    name: &'static str,
    tag: Tag,
    alternatives: Vec<Alternative<T>>,
    by_tag: HashMap<Tag, usize>,
}

impl<T> ChoiceDescription<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tag used when the choice is encoded on its own
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn alternatives(&self) -> &[Alternative<T>] {
        &self.alternatives
    }

    pub fn find_by_tag(&self, tag: &Tag) -> Option<&Alternative<T>> {
        self.by_tag
            .get(tag)
            .map(|&position| &self.alternatives[position])
    }
}

/// Declares the alternatives of a choice
///
/// `wrap` lifts an alternative value into the choice, `unwrap` extracts it
/// again and returns `None` for the other alternatives.
pub struct ChoiceBuilder<'a, T> {
    converters: &'a ConverterCache,
    tag: Tag,
    alternatives: Vec<Alternative<T>>,
    error: Option<AsnError>,
}

impl<'a, T: 'static> ChoiceBuilder<'a, T> {
    pub(crate) fn new(converters: &'a ConverterCache) -> Self {
        Self {
            converters,
            tag: Tag::SEQUENCE,
            alternatives: Vec::new(),
            error: None,
        }
    }

    /// Tag used when the choice is the root value, SEQUENCE unless set
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tag = tag.constructed();
        self
    }

    /// An alternative holding a structure (or another choice)
    pub fn alternative<U: AsnType>(
        mut self,
        name: &'static str,
        tag: Tag,
        wrap: impl Fn(U) -> T + Send + Sync + 'static,
        unwrap: impl Fn(&T) -> Option<&U> + Send + Sync + 'static,
    ) -> Self {
        let tag = tag.constructed();
        self.alternatives.push(Alternative {
            name,
            tag,
            type_name: type_name::<U>(),
            structured: true,
            decode: Box::new(move |decoder: &BerDecoder, data: &BerData, depth: usize| {
                Ok(decoder.decode_nested::<U>(data, tag, depth)?.map(&wrap))
            }),
            encode: Box::new(move |value: &T, encoder: &BerEncoder| {
                unwrap(value)
                    .map(|inner| encoder.encode_nested(inner, tag))
                    .transpose()
            }),
        });
        self
    }

    /// An alternative holding a scalar converted by `C`
    pub fn primitive_alternative<C, V>(
        mut self,
        name: &'static str,
        tag: Tag,
        wrap: impl Fn(V) -> T + Send + Sync + 'static,
        unwrap: impl Fn(&T) -> Option<&V> + Send + Sync + 'static,
    ) -> Self
    where
        C: AsnConverter<V> + Default + 'static,
        V: 'static,
    {
        if self.error.is_some() {
            return self;
        }
        let converter = match self.converters.converter::<C>() {
            Ok(converter) => converter,
            Err(e) => {
                self.error = Some(e);
                return self;
            }
        };
        let decoding = std::sync::Arc::clone(&converter);

        self.alternatives.push(Alternative {
            name,
            tag,
            type_name: type_name::<V>(),
            structured: false,
            decode: Box::new(move |_: &BerDecoder, data: &BerData, _: usize| {
                Ok(Some(wrap(decoding.decode(data.value())?)))
            }),
            encode: Box::new(move |value: &T, _: &BerEncoder| {
                Ok(converter
                    .encode_opt(unwrap(value))?
                    .map(|inner| encode_tlv(&tag, &inner)))
            }),
        });
        self
    }

    pub fn build(self) -> AsnResult<TypeDescription<T>> {
        if let Some(e) = self.error {
            return Err(AsnError::Configuration(format!(
                "Cannot describe '{}': {}",
                type_name::<T>(),
                e
            )));
        }
        if self.alternatives.is_empty() {
            return Err(AsnError::Configuration(format!(
                "Choice '{}' declares no alternatives",
                type_name::<T>()
            )));
        }

        let mut by_tag = HashMap::with_capacity(self.alternatives.len());
        for (position, alternative) in self.alternatives.iter().enumerate() {
            if let Some(previous) = by_tag.insert(alternative.tag, position) {
                return Err(AsnError::Configuration(format!(
                    "Alternatives '{}' and '{}' of '{}' share tag {}",
                    self.alternatives[previous].name,
                    alternative.name,
                    type_name::<T>(),
                    alternative.tag
                )));
            }
        }

        Ok(TypeDescription::Choice(ChoiceDescription {
            name: type_name::<T>(),
            tag: self.tag,
            alternatives: self.alternatives,
            by_tag,
        }))
    }
}
