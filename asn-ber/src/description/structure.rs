//! Structure descriptors and their builder

use super::collection::AsnCollection;
use super::field::{DecodeField, EncodeField, FieldDescription, FieldRole};
use super::{AsnType, TypeDescription};
use crate::ber::builder::{BerStructureBuilder, encode_tlv};
use crate::ber::{BerDecoder, BerEncoder};
use crate::registry::ConverterCache;
use crate::resolver::{AutoAsn, BerAutoResolver};
use crate::tlv::BerData;
use asn_core::{AsnConverter, AsnError, AsnResult, Tag};
use log::debug;
use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

/// Descriptor table of a structured type
///
/// Fields are kept in declaration order, which is the order they are
/// encoded in. Decoding looks fields up by tag; when several fields share a
/// tag, the n-th TLV carrying that tag goes to the n-th of those fields.
///
/// # Field Roles
/// - **Primitive**: value octets handled by a converter
/// - **Structure**: a nested structure or choice, decoded from the whole TLV
/// - **Collection**: SET OF / SEQUENCE OF, one TLV per element
///
/// # Shared Tags
/// Two `i32` fields without explicit tags both resolve to INTEGER:
///
/// ```text
/// 30 09 02 01 05 02 01 07 02 01 09
///       ^ first  ^ second ^ third, discarded
/// ```
///
/// # Why Closures?
/// Each field carries its getter and setter as typed closures, so decoding
/// writes straight into the instance created by `factory` without any
/// runtime type inspection.
pub struct StructureDescription<T> {
    name: &'static str,
    tag: Tag,
    factory: fn() -> T,
    fields: Vec<FieldDescription<T>>,
    by_tag: HashMap<Tag, Vec<usize>>,
    post_decode: Option<fn(&mut T)>,
}

impl<T> StructureDescription<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn fields(&self) -> &[FieldDescription<T>] {
        &self.fields
    }

    /// The field receiving the `index`-th occurrence of `tag`
    pub fn find_by_tag(&self, tag: &Tag, index: usize) -> Option<&FieldDescription<T>> {
        self.by_tag
            .get(tag)
            .and_then(|positions| positions.get(index))
            .map(|&position| &self.fields[position])
    }

    pub fn has_post_decode(&self) -> bool {
        self.post_decode.is_some()
    }

    pub(crate) fn create(&self) -> T {
        (self.factory)()
    }

    pub(crate) fn post_process(&self, instance: &mut T) {
        if let Some(hook) = self.post_decode {
            hook(instance);
        }
    }
}

impl<T> std::fmt::Debug for StructureDescription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureDescription")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Declares the fields of a structure
///
/// Every field takes a name, an optional tag, a getter and a setter. A `None`
/// tag is resolved automatically: scalars get their universal tag, nested
/// structures SEQUENCE, collections SEQUENCE or SET depending on their kind.
///
/// The first declaration error is kept and returned by [`build`](Self::build).
pub struct StructureBuilder<'a, T> {
    converters: &'a ConverterCache,
    tag: Tag,
    factory: fn() -> T,
    fields: Vec<FieldDescription<T>>,
    post_decode: Option<fn(&mut T)>,
    error: Option<AsnError>,
}

impl<'a, T: 'static> StructureBuilder<'a, T> {
    pub(crate) fn new(converters: &'a ConverterCache, tag: Tag, factory: fn() -> T) -> Self {
        Self {
            converters,
            tag: tag.constructed(),
            factory,
            fields: Vec::new(),
            post_decode: None,
            error: None,
        }
    }

    fn push(
        mut self,
        field: impl FnOnce(&ConverterCache, usize) -> AsnResult<FieldDescription<T>>,
    ) -> Self {
        if self.error.is_none() {
            match field(self.converters, self.fields.len()) {
                Ok(field) => self.fields.push(field),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// A scalar field using the converter and universal tag registered for `V`
    pub fn primitive<V: AutoAsn>(
        self,
        name: &'static str,
        tag: Option<Tag>,
        get: impl Fn(&T) -> Option<&V> + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        let tag = tag.unwrap_or(Tag::universal(V::UNIVERSAL_TAG));
        self.primitive_with::<V::Converter, V>(name, Some(tag), get, set)
    }

    /// A scalar field using converter `C`
    pub fn primitive_with<C, V>(
        self,
        name: &'static str,
        tag: Option<Tag>,
        get: impl Fn(&T) -> Option<&V> + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        C: AsnConverter<V> + Default + 'static,
        V: 'static,
    {
        self.push(move |converters, order| {
            let tag = match tag {
                Some(tag) => tag,
                None => resolve_universal_tag::<V>(name)?,
            };
            let converter = converters.converter::<C>()?;
            let decoding = Arc::clone(&converter);

            let decode: DecodeField<T> =
                Box::new(move |instance: &mut T, _: &BerDecoder, data: &BerData, _: usize| {
                    set(instance, decoding.decode(data.value())?);
                    Ok(())
                });
            let encode: EncodeField<T> = Box::new(move |instance: &T, _: &BerEncoder| {
                Ok(converter
                    .encode_opt(get(instance))?
                    .map(|value| encode_tlv(&tag, &value)))
            });

            Ok(FieldDescription::new(
                name,
                order,
                tag,
                FieldRole::Primitive {
                    converter: type_name::<C>(),
                },
                decode,
                encode,
            ))
        })
    }

    /// A nested structure or choice field
    pub fn structure<U: AsnType>(
        self,
        name: &'static str,
        tag: Option<Tag>,
        get: impl Fn(&T) -> Option<&U> + Send + Sync + 'static,
        set: impl Fn(&mut T, U) + Send + Sync + 'static,
    ) -> Self {
        let tag = tag.unwrap_or(BerAutoResolver::structure_tag()).constructed();
        self.push(move |_, order| {
            let decode: DecodeField<T> =
                Box::new(move |instance: &mut T, decoder: &BerDecoder, data: &BerData, depth: usize| {
                    if let Some(value) = decoder.decode_nested::<U>(data, tag, depth)? {
                        set(instance, value);
                    }
                    Ok(())
                });
            let encode: EncodeField<T> =
                Box::new(move |instance: &T, encoder: &BerEncoder| {
                    get(instance)
                        .map(|value| encoder.encode_nested(value, tag))
                        .transpose()
                });

            Ok(FieldDescription::new(
                name,
                order,
                tag,
                FieldRole::Structure {
                    nested: type_name::<U>(),
                },
                decode,
                encode,
            ))
        })
    }

    /// A collection of structures or choices
    ///
    /// Elements of a structure type must carry `element_tag` (SEQUENCE when
    /// `None`), anything else is skipped. Elements of a choice type are
    /// resolved by their own tag.
    pub fn structure_collection<C>(
        self,
        name: &'static str,
        tag: Option<Tag>,
        element_tag: Option<Tag>,
        get: impl Fn(&T) -> Option<&C> + Send + Sync + 'static,
        set: impl Fn(&mut T, C) + Send + Sync + 'static,
    ) -> Self
    where
        C: AsnCollection,
        C::Item: AsnType,
    {
        let tag = tag.unwrap_or(BerAutoResolver::collection_tag(C::KIND)).constructed();
        let element_tag = element_tag
            .unwrap_or(BerAutoResolver::structure_tag())
            .constructed();

        self.push(move |_, order| {
            let decode: DecodeField<T> =
                Box::new(move |instance: &mut T, decoder: &BerDecoder, data: &BerData, depth: usize| {
                    let mut collection = C::default();
                    let mut source = data.value_bytes();
                    while !source.is_empty() {
                        let element = decoder.read_next(&mut source)?;
                        if let Some(item) =
                            decoder.decode_element::<C::Item>(&element, element_tag, depth + 1)?
                        {
                            collection.push(item);
                        }
                    }
                    set(instance, collection);
                    Ok(())
                });
            let encode: EncodeField<T> =
                Box::new(move |instance: &T, encoder: &BerEncoder| {
                    let Some(collection) = get(instance) else {
                        return Ok(None);
                    };
                    let mut builder = BerStructureBuilder::new(tag);
                    for item in collection.items() {
                        builder.add_value(encoder.encode_element(item, element_tag)?);
                    }
                    Ok(Some(builder.build()))
                });

            Ok(FieldDescription::new(
                name,
                order,
                tag,
                FieldRole::Collection {
                    kind: C::KIND,
                    element_tag,
                    structured: true,
                    element_type: type_name::<C::Item>(),
                    converter: None,
                },
                decode,
                encode,
            ))
        })
    }

    /// A collection of scalars converted by `Conv`
    ///
    /// A `None` element tag resolves to the universal tag of the element type.
    /// Elements carrying another tag are skipped.
    pub fn primitive_collection<C, Conv>(
        self,
        name: &'static str,
        tag: Option<Tag>,
        element_tag: Option<Tag>,
        get: impl Fn(&T) -> Option<&C> + Send + Sync + 'static,
        set: impl Fn(&mut T, C) + Send + Sync + 'static,
    ) -> Self
    where
        C: AsnCollection,
        Conv: AsnConverter<C::Item> + Default + 'static,
    {
        let tag = tag.unwrap_or(BerAutoResolver::collection_tag(C::KIND)).constructed();

        self.push(move |converters, order| {
            let element_tag = match element_tag {
                Some(element_tag) => element_tag,
                None => resolve_universal_tag::<C::Item>(name)?,
            };
            let converter = converters.converter::<Conv>()?;
            let decoding = Arc::clone(&converter);

            let decode: DecodeField<T> =
                Box::new(move |instance: &mut T, decoder: &BerDecoder, data: &BerData, _: usize| {
                    let mut collection = C::default();
                    let mut source = data.value_bytes();
                    while !source.is_empty() {
                        let element = decoder.read_next(&mut source)?;
                        let parsed = element.tag()?;
                        if parsed != element_tag {
                            debug!(
                                "Skipping element {} of '{}', expected {}",
                                parsed, name, element_tag
                            );
                            continue;
                        }
                        collection.push(decoding.decode(element.value())?);
                    }
                    set(instance, collection);
                    Ok(())
                });
            let encode: EncodeField<T> =
                Box::new(move |instance: &T, _: &BerEncoder| {
                    let Some(collection) = get(instance) else {
                        return Ok(None);
                    };
                    let mut builder = BerStructureBuilder::new(tag);
                    for item in collection.items() {
                        builder.add_value(encode_tlv(&element_tag, &converter.encode(item)?));
                    }
                    Ok(Some(builder.build()))
                });

            Ok(FieldDescription::new(
                name,
                order,
                tag,
                FieldRole::Collection {
                    kind: C::KIND,
                    element_tag,
                    structured: false,
                    element_type: type_name::<C::Item>(),
                    converter: Some(type_name::<Conv>()),
                },
                decode,
                encode,
            ))
        })
    }

    /// Hook run once on every decoded instance, after all fields were set
    pub fn post_decode(mut self, hook: fn(&mut T)) -> Self {
        self.post_decode = Some(hook);
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

        let mut by_tag: HashMap<Tag, Vec<usize>> = HashMap::new();
        for (position, field) in self.fields.iter().enumerate() {
            by_tag.entry(field.tag()).or_default().push(position);
        }

        Ok(TypeDescription::Structure(StructureDescription {
            name: type_name::<T>(),
            tag: self.tag,
            factory: self.factory,
            fields: self.fields,
            by_tag,
            post_decode: self.post_decode,
        }))
    }
}

fn resolve_universal_tag<V: 'static>(field: &str) -> AsnResult<Tag> {
    BerAutoResolver::universal_tag::<V>().ok_or_else(|| {
        AsnError::Configuration(format!(
            "Cannot resolve a universal tag for '{}' of field '{}', declare one explicitly",
            type_name::<V>(),
            field
        ))
    })
}
