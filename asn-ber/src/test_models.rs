//! Described types shared by the engine tests

use crate::converter::{DateConverter, HexStringConverter, IntegerConverter, Utf8StringConverter};
use crate::description::{AsnType, TypeDescription};
use crate::registry::ConverterCache;
use asn_core::{AsnResult, Tag};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};

pub const PERSON_HEX: &str = "F03C0101FF020118311004063859980690030406385998069002A11FA20D040546697273740201018201FFA20E04065365636F6E64020102820100830128";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub male: bool,
    pub age: i32,
    pub phones: HashSet<String>,
    pub addresses: Vec<Address>,
    pub shoe_size: i16,
    pub adult: bool,
}

impl Person {
    pub fn example() -> Self {
        Self {
            male: true,
            age: 24,
            phones: HashSet::from(["385998069002".to_string(), "385998069003".to_string()]),
            addresses: vec![Address::new("First", 1, true), Address::new("Second", 2, false)],
            shoe_size: 40,
            adult: true,
        }
    }
}

impl AsnType for Person {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::private(16), Person::default, converters)
            .primitive("male", None, |p| Some(&p.male), |p, v| p.male = v)
            .primitive("age", None, |p| Some(&p.age), |p, v| p.age = v)
            .primitive_collection::<_, HexStringConverter>(
                "phones",
                None,
                None,
                |p| Some(&p.phones),
                |p, v| p.phones = v,
            )
            .structure_collection(
                "addresses",
                Some(Tag::context(1)),
                Some(Tag::context(2)),
                |p| Some(&p.addresses),
                |p, v| p.addresses = v,
            )
            .primitive("shoe_size", Some(Tag::context(3)), |p| Some(&p.shoe_size), |p, v| p.shoe_size = v)
            .post_decode(|p| p.adult = p.age >= 18)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    pub value: Option<String>,
    pub number: Option<i32>,
    pub enabled: Option<bool>,
}

impl Address {
    pub fn new(value: &str, number: i32, enabled: bool) -> Self {
        Self {
            value: Some(value.to_string()),
            number: Some(number),
            enabled: Some(enabled),
        }
    }
}

impl AsnType for Address {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::SEQUENCE, Address::default, converters)
            .primitive("value", None, |a| a.value.as_ref(), |a, v| a.value = Some(v))
            .primitive("number", None, |a| a.number.as_ref(), |a, v| a.number = Some(v))
            .primitive(
                "enabled",
                Some(Tag::context(2)),
                |a| a.enabled.as_ref(),
                |a, v| a.enabled = Some(v),
            )
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct MultipleAddressWrapper {
    pub address_one: Option<Address>,
    pub address_two: Option<Address>,
}

impl AsnType for MultipleAddressWrapper {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::SEQUENCE, MultipleAddressWrapper::default, converters)
            .structure(
                "address_one",
                Some(Tag::context(4)),
                |w| w.address_one.as_ref(),
                |w, v| w.address_one = Some(v),
            )
            .structure(
                "address_two",
                Some(Tag::context(4)),
                |w| w.address_two.as_ref(),
                |w, v| w.address_two = Some(v),
            )
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventA {
    pub value: Option<i32>,
    pub number: Option<i32>,
}

impl EventA {
    pub fn new(value: i32, number: i32) -> Self {
        Self {
            value: Some(value),
            number: Some(number),
        }
    }
}

impl AsnType for EventA {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::context(1), EventA::default, converters)
            .primitive("value", Some(Tag::context(1)), |e| e.value.as_ref(), |e, v| e.value = Some(v))
            .primitive("number", Some(Tag::context(2)), |e| e.number.as_ref(), |e, v| e.number = Some(v))
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventB {
    pub enabled: Option<bool>,
    pub value: Option<i32>,
}

impl EventB {
    pub fn new(enabled: bool, value: i32) -> Self {
        Self {
            enabled: Some(enabled),
            value: Some(value),
        }
    }
}

impl AsnType for EventB {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::context(2), EventB::default, converters)
            .primitive("enabled", Some(Tag::context(1)), |e| e.enabled.as_ref(), |e, v| e.enabled = Some(v))
            .primitive("value", Some(Tag::context(2)), |e| e.value.as_ref(), |e, v| e.value = Some(v))
            .build()
    }
}

/// `Unknown` has no alternative and cannot be encoded
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    A(EventA),
    B(EventB),
    Unknown,
}

impl AsnType for Event {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::choice(converters)
            .alternative("a", Tag::context(1), Event::A, |e| match e {
                Event::A(a) => Some(a),
                _ => None,
            })
            .alternative("b", Tag::context(2), Event::B, |e| match e {
                Event::B(b) => Some(b),
                _ => None,
            })
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct EventWrapper {
    pub id: Option<String>,
    pub event: Option<Event>,
}

impl AsnType for EventWrapper {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::SEQUENCE, EventWrapper::default, converters)
            .primitive("id", Some(Tag::context(1)), |w| w.id.as_ref(), |w, v| w.id = Some(v))
            .structure("event", Some(Tag::context(2)), |w| w.event.as_ref(), |w, v| w.event = Some(v))
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct EventListWrapper {
    pub id: Option<i32>,
    pub events: Vec<Event>,
}

impl AsnType for EventListWrapper {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::SEQUENCE, EventListWrapper::default, converters)
            .primitive("id", Some(Tag::context(1)), |w| w.id.as_ref(), |w, v| w.id = Some(v))
            .structure_collection(
                "events",
                Some(Tag::context(2)),
                None,
                |w| Some(&w.events),
                |w, v| w.events = v,
            )
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    Number(i32),
    Name(String),
}

impl AsnType for Identifier {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::choice(converters)
            .primitive_alternative::<IntegerConverter, _>(
                "number",
                Tag::context(0),
                Identifier::Number,
                |i| match i {
                    Identifier::Number(n) => Some(n),
                    _ => None,
                },
            )
            .primitive_alternative::<Utf8StringConverter, _>(
                "name",
                Tag::context(1),
                Identifier::Name,
                |i| match i {
                    Identifier::Name(name) => Some(name),
                    _ => None,
                },
            )
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Counted {
    pub value: Option<i32>,
    pub post_decoded: u32,
}

impl AsnType for Counted {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::SEQUENCE, Counted::default, converters)
            .primitive("value", Some(Tag::context(0)), |c| c.value.as_ref(), |c, v| c.value = Some(v))
            .post_decode(|c| c.post_decoded += 1)
            .build()
    }
}

/// Two INTEGER fields share the universal tag and are told apart by position
#[derive(Debug, Default, PartialEq)]
pub struct Dated {
    pub created: Option<DateTime<Utc>>,
    pub tags: BTreeSet<String>,
    pub raw: Option<Vec<u8>>,
    pub small: Option<i8>,
    pub big: Option<i64>,
}

impl AsnType for Dated {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::SEQUENCE, Dated::default, converters)
            .primitive_with::<DateConverter, _>(
                "created",
                Some(Tag::context(0)),
                |d| d.created.as_ref(),
                |d, v| d.created = Some(v),
            )
            .primitive_collection::<_, Utf8StringConverter>(
                "tags",
                None,
                None,
                |d| Some(&d.tags),
                |d, v| d.tags = v,
            )
            .primitive("raw", None, |d| d.raw.as_ref(), |d, v| d.raw = Some(v))
            .primitive("small", None, |d| d.small.as_ref(), |d, v| d.small = Some(v))
            .primitive("big", None, |d| d.big.as_ref(), |d, v| d.big = Some(v))
            .build()
    }
}

/// Refers to itself through `child`
#[derive(Debug, Default, PartialEq)]
pub struct Node {
    pub value: Option<i32>,
    pub child: Option<Box<Node>>,
}

impl Node {
    /// `levels` nodes wrapped around a leaf holding 7
    pub fn chain(levels: usize) -> Self {
        let mut node = Node {
            value: Some(7),
            child: None,
        };
        for _ in 0..levels {
            node = Node {
                value: None,
                child: Some(Box::new(node)),
            };
        }
        node
    }
}

impl AsnType for Node {
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
        TypeDescription::structure(Tag::SEQUENCE, Node::default, converters)
            .primitive("value", None, |n| n.value.as_ref(), |n, v| n.value = Some(v))
            .structure(
                "child",
                Some(Tag::context(1)),
                |n| n.child.as_deref(),
                |n, v| n.child = Some(Box::new(v)),
            )
            .build()
    }
}
