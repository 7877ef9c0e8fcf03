//! BER decoding engine
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use asn_ber::BerDecoder;
//!
//! let decoder = BerDecoder::new();
//! let person: Person = decoder.decode(&data)?;
//! ```
//!
//! # Decoding Process
//!
//! 1. Read the outer TLV and check its tag against the type's tag
//! 2. Choice: read one more TLV from the value, its tag selects the alternative
//! 3. Structure: create an empty instance and read the value TLV by TLV.
//!    Each TLV goes to the field registered for its tag and occurrence;
//!    TLVs with an empty value or without a matching field are skipped
//! 4. Run the post decode hook
//!
//! Decoding is all or nothing: any failure discards the partially built value.

use crate::description::{AsnType, ChoiceDescription, StructureDescription, TypeDescription};
use crate::registry::Registry;
use crate::tlv::{BerData, BerDataReader, TlvDataReader};
use asn_core::{AsnError, AsnResult, Counter, Tag, hex};
use bytes::Bytes;
use log::debug;
use std::sync::Arc;

/// Nesting levels accepted by [`BerDecoder::new`] and [`BerDecoder::with_registry`]
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Octets of a nested TLV quoted in error messages
const QUOTED_OCTETS: usize = 64;

/// Decodes BER bytes into described types
///
/// The decoder is cheap to clone and can be shared between threads.
///
/// # Nesting Depth
/// Every nested structure, choice alternative and collection adds one level.
/// The root value is level 0. Input nesting deeper than
/// [`max_depth`](Self::max_depth) fails with [`AsnError::Parse`] before the
/// deeper value is looked at, so self referencing types cannot be driven into
/// unbounded recursion by their input.
///
/// # Why a Pluggable Reader?
/// [`BerDataExtractReader`](crate::tlv::BerDataExtractReader) shares the
/// engine but descends through wrapper TLVs first, which is what inspection
/// tools need when the interesting value sits inside an envelope.
#[derive(Clone)]
pub struct BerDecoder {
    registry: Arc<Registry>,
    reader: Arc<dyn TlvDataReader>,
    max_depth: usize,
}

impl BerDecoder {
    /// Decoder using the global registry and the plain TLV reader
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            reader: Arc::new(BerDataReader::new()),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the TLV reader used for every read
    pub fn with_reader(mut self, reader: impl TlvDataReader + 'static) -> Self {
        self.reader = Arc::new(reader);
        self
    }

    /// Limit how deeply nested values may be, [`DEFAULT_MAX_DEPTH`] unless set
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decode `data` as a `T`
    ///
    /// # Error Handling
    /// Returns [`AsnError::Decode`] if the input is malformed or truncated, if
    /// the outer tag is not the tag of `T`, if a converter fails, if values are
    /// nested deeper than [`max_depth`](Self::max_depth), or if `T` is a choice
    /// and no alternative matches. Bytes following the outer TLV are ignored.
    pub fn decode<T: AsnType>(&self, data: &[u8]) -> AsnResult<T> {
        self.decode_choice::<T>(data)?.ok_or_else(|| {
            AsnError::decode(format!(
                "No alternative of '{}' matches '{}'",
                std::any::type_name::<T>(),
                hex::encode(data)
            ))
        })
    }

    /// Decode `data` as a `T`, returning `None` when `T` is a choice and no
    /// alternative matches the inner tag
    ///
    /// For structures this never returns `Ok(None)`.
    pub fn decode_choice<T: AsnType>(&self, data: &[u8]) -> AsnResult<Option<T>> {
        let description = self.registry.description::<T>()?;

        let mut source = Bytes::copy_from_slice(data);
        let tlv = self.reader.read_next(&mut source).map_err(|e| {
            AsnError::decode_with(
                format!(
                    "Cannot decode '{}' into '{}'",
                    hex::encode(data),
                    description.name()
                ),
                e,
            )
        })?;
        if !source.is_empty() {
            debug!(
                "Ignoring {} trailing bytes after '{}'",
                source.len(),
                description.name()
            );
        }

        self.decode_described(&description, &tlv, description.tag(), 0)
    }

    pub(crate) fn read_next(&self, source: &mut Bytes) -> AsnResult<BerData> {
        self.reader.read_next(source)
    }

    /// Decode a TLV at nesting level `depth` whose tag must be `expected`
    pub(crate) fn decode_nested<U: AsnType>(
        &self,
        tlv: &BerData,
        expected: Tag,
        depth: usize,
    ) -> AsnResult<Option<U>> {
        let description = self.registry.description::<U>()?;
        self.decode_described(&description, tlv, expected, depth)
    }

    /// Decode one collection element
    ///
    /// A choice element is resolved by its own tag. A structure element must
    /// carry `element_tag`, otherwise it is skipped.
    pub(crate) fn decode_element<U: AsnType>(
        &self,
        element: &BerData,
        element_tag: Tag,
        depth: usize,
    ) -> AsnResult<Option<U>> {
        let description = self.registry.description::<U>()?;
        match description.as_ref() {
            TypeDescription::Choice(choice) => {
                self.check_depth(depth, description.name())?;
                self.decode_alternative(choice, element, depth)
                    .map_err(|e| self.wrap(e, element, description.name(), depth))
            }
            TypeDescription::Structure(_) => {
                let tag = element.tag()?;
                if tag != element_tag {
                    debug!(
                        "Skipping element {} of '{}', expected {}",
                        tag,
                        description.name(),
                        element_tag
                    );
                    return Ok(None);
                }
                self.decode_described(&description, element, element_tag, depth)
            }
        }
    }

    fn check_depth(&self, depth: usize, name: &str) -> AsnResult<()> {
        if depth > self.max_depth {
            return Err(AsnError::Parse(format!(
                "'{}' is nested deeper than {} levels",
                name, self.max_depth
            )));
        }
        Ok(())
    }

    fn decode_described<U>(
        &self,
        description: &TypeDescription<U>,
        tlv: &BerData,
        expected: Tag,
        depth: usize,
    ) -> AsnResult<Option<U>> {
        self.check_depth(depth, description.name())?;
        self.decode_tlv(description, tlv, expected, depth)
            .map_err(|e| self.wrap(e, tlv, description.name(), depth))
    }

    fn decode_tlv<U>(
        &self,
        description: &TypeDescription<U>,
        tlv: &BerData,
        expected: Tag,
        depth: usize,
    ) -> AsnResult<Option<U>> {
        let tag = tlv.tag()?;
        if tag != expected {
            return Err(AsnError::decode(format!(
                "Defined tag {} does not match parsed tag {}",
                expected, tag
            )));
        }

        match description {
            TypeDescription::Structure(structure) => {
                self.decode_structure(structure, tlv, depth).map(Some)
            }
            TypeDescription::Choice(choice) => {
                let mut source = tlv.value_bytes();
                let inner = self.reader.read_next(&mut source)?;
                self.decode_alternative(choice, &inner, depth + 1)
            }
        }
    }

    fn decode_structure<U>(
        &self,
        structure: &StructureDescription<U>,
        tlv: &BerData,
        depth: usize,
    ) -> AsnResult<U> {
        let mut instance = structure.create();
        let mut counter = Counter::new();

        let mut source = tlv.value_bytes();
        while !source.is_empty() {
            let field_tlv = self.reader.read_next(&mut source)?;
            if !field_tlv.is_value_present() {
                continue;
            }

            let tag = field_tlv.tag()?;
            let index = counter.count(tag);
            let Some(field) = structure.find_by_tag(&tag, index) else {
                debug!(
                    "Discarding {} (occurrence {}) from '{}': {}",
                    tag,
                    index,
                    structure.name(),
                    field_tlv
                );
                continue;
            };

            field.decode_into(&mut instance, self, &field_tlv, depth + 1)?;
        }

        structure.post_process(&mut instance);
        Ok(instance)
    }

    fn decode_alternative<U>(
        &self,
        choice: &ChoiceDescription<U>,
        inner: &BerData,
        depth: usize,
    ) -> AsnResult<Option<U>> {
        let tag = inner.tag()?;
        match choice.find_by_tag(&tag) {
            Some(alternative) => alternative.decode(self, inner, depth),
            None => {
                debug!("No alternative of '{}' for tag {}", choice.name(), tag);
                Ok(None)
            }
        }
    }

    /// The root level quotes the whole TLV, nested levels only its first octets
    fn wrap(&self, e: AsnError, tlv: &BerData, name: &str, depth: usize) -> AsnError {
        let octets = tlv.to_tlv();
        let quoted = if depth == 0 {
            hex::encode(&octets)
        } else {
            hex::encode_prefix(&octets, QUOTED_OCTETS)
        };
        AsnError::decode_with(format!("Cannot decode '{}' into '{}'", quoted, name), e)
    }
}

impl Default for BerDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BerDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BerDecoder")
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::builder::encode_tlv;
    use crate::test_models::*;
    use crate::tlv::BerDataExtractReader;
    use asn_core::universal;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    fn decoder() -> BerDecoder {
        BerDecoder::with_registry(Arc::new(Registry::new()))
    }

    fn octets(given: &str) -> Vec<u8> {
        hex::decode(given).unwrap()
    }

    /// A `Node` whose child fields are nested `levels` deep around `leaf`
    fn nested_nodes(levels: usize, leaf: &[u8]) -> Vec<u8> {
        let mut node = leaf.to_vec();
        for _ in 0..levels {
            node = encode_tlv(&Tag::context(1).constructed(), &node);
        }
        encode_tlv(&Tag::SEQUENCE, &node)
    }

    fn messages(err: &AsnError) -> Vec<String> {
        let mut messages = Vec::new();
        let mut current: Option<&dyn std::error::Error> = Some(err);
        while let Some(e) = current {
            messages.push(e.to_string());
            current = e.source();
        }
        messages
    }

    #[test]
    fn test_decode_person() {
        let decoded: Person = decoder().decode(&octets(PERSON_HEX)).unwrap();
        assert_eq!(decoded, Person::example());
        assert!(decoded.adult);
    }

    #[test]
    fn test_decode_multiple_addresses_discards_extra() {
        let decoded: MultipleAddressWrapper = decoder()
            .decode(&octets(
                "302aa40c0201010404616472318201ffa40c020102040461647232820100a40c020103040461647233820100",
            ))
            .unwrap();
        assert_eq!(decoded.address_one, Some(Address::new("adr1", 1, true)));
        assert_eq!(decoded.address_two, Some(Address::new("adr2", 2, false)));
    }

    #[test]
    fn test_decode_choice_field() {
        let decoder = decoder();

        let a: EventWrapper = decoder.decode(&octets("300D810161A208A106810101820102")).unwrap();
        assert_eq!(a.id.as_deref(), Some("a"));
        assert_eq!(a.event, Some(Event::A(EventA::new(1, 2))));

        let b: EventWrapper = decoder.decode(&octets("300D810162A208A2068101FF820102")).unwrap();
        assert_eq!(b.id.as_deref(), Some("b"));
        assert_eq!(b.event, Some(Event::B(EventB::new(true, 2))));
    }

    #[test]
    fn test_decode_choice_collection() {
        let decoded: EventListWrapper = decoder()
            .decode(&octets(
                "301D810101A218A106810101820102A106810103820104A2068101FF820102",
            ))
            .unwrap();
        assert_eq!(decoded.id, Some(1));
        assert_eq!(
            decoded.events,
            vec![
                Event::A(EventA::new(1, 2)),
                Event::A(EventA::new(3, 4)),
                Event::B(EventB::new(true, 2)),
            ]
        );
    }

    #[test]
    fn test_unknown_alternative_in_field_leaves_it_unset() {
        let decoded: EventWrapper = decoder()
            .decode(&octets("300D810161A208A306810101820102"))
            .unwrap();
        assert_eq!(decoded.id.as_deref(), Some("a"));
        assert_eq!(decoded.event, None);
    }

    #[test]
    fn test_unknown_alternative_in_collection_is_skipped() {
        let decoded: EventListWrapper = decoder()
            .decode(&octets("3011810101A20CA106810101820102A5020500"))
            .unwrap();
        assert_eq!(decoded.events, vec![Event::A(EventA::new(1, 2))]);
    }

    #[test]
    fn test_decode_root_choice() {
        let decoder = decoder();
        let event: Event = decoder.decode(&octets("3008A106810101820102")).unwrap();
        assert_eq!(event, Event::A(EventA::new(1, 2)));

        assert_eq!(decoder.decode_choice::<Event>(&octets("3008A306810101820102")).unwrap(), None);
        assert!(matches!(
            decoder.decode::<Event>(&octets("3008A306810101820102")),
            Err(AsnError::Decode { .. })
        ));
    }

    #[test]
    fn test_decode_primitive_alternatives() {
        let decoder = decoder();
        assert_eq!(
            decoder.decode::<Identifier>(&octets("300380012A")).unwrap(),
            Identifier::Number(42)
        );
        assert_eq!(
            decoder.decode::<Identifier>(&octets("300481026964")).unwrap(),
            Identifier::Name("id".to_string())
        );
    }

    #[test]
    fn test_outer_tag_mismatch() {
        let result = decoder().decode::<Address>(&octets("3103020101"));
        let err = result.unwrap_err();
        assert!(matches!(err, AsnError::Decode { .. }));
        assert!(err.to_string().contains("3103020101"));
    }

    #[test]
    fn test_converter_failure_names_field() {
        // enabled = 0xAA is not a boolean
        let err = decoder()
            .decode::<Address>(&octets("30060201018201AA"))
            .unwrap_err();
        assert!(matches!(err.root_cause(), AsnError::Convert(_)));
        assert!(messages(&err).iter().any(|m| m.contains("field 'enabled'")));
    }

    #[test]
    fn test_nesting_up_to_max_depth() {
        let decoder = decoder().with_max_depth(8);
        let decoded: Node = decoder.decode(&nested_nodes(8, &[0x02, 0x01, 0x07])).unwrap();
        assert_eq!(decoded, Node::chain(8));
    }

    #[test]
    fn test_nesting_beyond_max_depth() {
        let decoder = decoder().with_max_depth(8);
        let err = decoder
            .decode::<Node>(&nested_nodes(9, &[0x02, 0x01, 0x07]))
            .unwrap_err();
        assert!(matches!(err, AsnError::Decode { .. }));
        assert!(matches!(err.root_cause(), AsnError::Parse(_)));
    }

    #[test]
    fn test_deeply_nested_input_is_rejected() {
        let data = nested_nodes(2000, &[0x02, 0x01, 0x07]);
        let err = decoder().decode::<Node>(&data).unwrap_err();
        assert!(matches!(err.root_cause(), AsnError::Parse(_)));

        let total: usize = messages(&err).iter().map(String::len).sum();
        assert!(total < 2 * data.len() + 32 * 1024);
    }

    #[test]
    fn test_nested_errors_quote_a_prefix() {
        // the innermost INTEGER claims 5 octets but carries 1
        let data = nested_nodes(100, &[0x02, 0x05, 0x01]);
        let err = decoder()
            .with_max_depth(128)
            .decode::<Node>(&data)
            .unwrap_err();
        assert!(matches!(err.root_cause(), AsnError::Read(_)));

        let messages = messages(&err);
        assert!(messages[0].contains(&hex::encode(&data)));
        assert!(messages[1..].iter().all(|m| m.len() < 256));
        assert!(messages.iter().any(|m| m.contains("...")));
    }

    #[test]
    fn test_truncated_input() {
        let err = decoder().decode::<Address>(&octets("300602010182")).unwrap_err();
        assert!(matches!(err.root_cause(), AsnError::Read(_)));
    }

    #[test]
    fn test_empty_values_and_unknown_tags_are_skipped() {
        // [9] 01 is unknown, number is present with an empty value
        let decoded: Address = decoder()
            .decode(&octets("300C890101020004026869820100"))
            .unwrap();
        assert_eq!(decoded, Address {
            value: Some("hi".to_string()),
            number: None,
            enabled: Some(false),
        });
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let decoded: Address = decoder().decode(&octets("30030201050000")).unwrap();
        assert_eq!(decoded.number, Some(5));
    }

    #[test]
    fn test_collection_elements_with_foreign_tag_are_skipped() {
        // second phone carries INTEGER instead of OCTET STRING
        let decoded: Person = decoder()
            .decode(&octets("F009310704023859020102"))
            .unwrap();
        assert_eq!(decoded.phones, HashSet::from(["3859".to_string()]));
        assert!(decoded.addresses.is_empty());
    }

    #[test]
    fn test_post_decode_runs_once() {
        let decoded: Counted = decoder().decode(&octets("3003800101")).unwrap();
        assert_eq!(decoded.value, Some(1));
        assert_eq!(decoded.post_decoded, 1);
    }

    #[test]
    fn test_with_extract_reader() {
        let decoder = decoder().with_reader(BerDataExtractReader::new(vec![
            Tag::SEQUENCE,
            Tag::universal(universal::INTEGER),
        ]));
        let mut source = Bytes::from(octets("3003020107"));
        let data = decoder.read_next(&mut source).unwrap();
        assert_eq!(data.value(), &[0x07]);
    }

    #[test]
    fn test_random_input_never_panics() {
        let decoder = decoder();
        let mut rng = StdRng::seed_from_u64(0x00A5_0BE2);
        for _ in 0..2000 {
            let len = rng.gen_range(0..64);
            let mut data: Vec<u8> = (0..len).map(|_| rng.r#gen()).collect();
            // give a good share of inputs a plausible outer tag
            if let Some(first) = data.first_mut() {
                if rng.gen_bool(0.5) {
                    *first = 0xF0;
                }
            }
            let _ = decoder.decode::<Person>(&data);
            let _ = decoder.decode::<EventListWrapper>(&data);
            let _ = decoder.decode_choice::<Event>(&data);
            let _ = decoder.decode::<Node>(&data);
        }
    }
}
