//! Type descriptors
//!
//! A type takes part in encoding and decoding by implementing [`AsnType`],
//! which returns a [`TypeDescription`] built once and cached by the
//! [`Registry`](crate::registry::Registry). The description holds typed
//! getters and setters for every field, so the engines never need runtime
//! reflection.
//!
//! ```rust,ignore
//! impl AsnType for Address {
//!     fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>> {
//!         TypeDescription::structure(Tag::SEQUENCE, Address::default, converters)
//!             .primitive("value", None, |a| a.value.as_ref(), |a, v| a.value = Some(v))
//!             .primitive("number", None, |a| a.number.as_ref(), |a, v| a.number = Some(v))
//!             .primitive("enabled", Some(Tag::context(2)), |a| a.enabled.as_ref(), |a, v| a.enabled = Some(v))
//!             .build()
//!     }
//! }
//! ```

pub mod choice;
pub mod collection;
pub mod field;
pub mod structure;

pub use choice::{Alternative, ChoiceBuilder, ChoiceDescription};
pub use collection::{AsnCollection, CollectionKind};
pub use field::{FieldDescription, FieldRole};
pub use structure::{StructureBuilder, StructureDescription};

use crate::registry::ConverterCache;
use asn_core::{AsnResult, Tag};

/// A type that can be encoded to and decoded from BER
pub trait AsnType: Sized + 'static {
    /// Build the descriptor table of this type
    ///
    /// Called once per registry, or once per racing thread on a concurrent
    /// first use, in which case only one result is kept. Converters must be
    /// taken from `converters` so they are shared with every other type.
    fn describe(converters: &ConverterCache) -> AsnResult<TypeDescription<Self>>;
}

/// Descriptor table of a structure or a choice
#[derive(Debug)]
pub enum TypeDescription<T> {
    Structure(StructureDescription<T>),
    Choice(ChoiceDescription<T>),
}

impl<T: 'static> TypeDescription<T> {
    /// Start describing a structure encoded under `tag`
    ///
    /// `factory` creates the empty instance fields are decoded into.
    pub fn structure(
        tag: Tag,
        factory: fn() -> T,
        converters: &ConverterCache,
    ) -> StructureBuilder<'_, T> {
        StructureBuilder::new(converters, tag, factory)
    }

    /// Start describing a choice
    pub fn choice(converters: &ConverterCache) -> ChoiceBuilder<'_, T> {
        ChoiceBuilder::new(converters)
    }
}

impl<T> TypeDescription<T> {
    pub fn name(&self) -> &'static str {
        match self {
            TypeDescription::Structure(structure) => structure.name(),
            TypeDescription::Choice(choice) => choice.name(),
        }
    }

    /// Tag of the type when it is the root value
    pub fn tag(&self) -> Tag {
        match self {
            TypeDescription::Structure(structure) => structure.tag(),
            TypeDescription::Choice(choice) => choice.tag(),
        }
    }
}
