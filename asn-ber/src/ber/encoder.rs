//! BER encoding engine
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use asn_ber::BerEncoder;
//!
//! let encoder = BerEncoder::new();
//! let bytes = encoder.encode(&person)?;
//! ```
//!
//! Fields are written in declaration order. Absent fields are omitted; a
//! collection is written with its elements in iteration order.

use super::builder::BerStructureBuilder;
use crate::description::{AsnType, ChoiceDescription, TypeDescription};
use crate::registry::Registry;
use asn_core::{AsnError, AsnResult, Tag};
use std::sync::Arc;

/// Encodes described types to BER bytes
#[derive(Debug, Clone)]
pub struct BerEncoder {
    registry: Arc<Registry>,
}

impl BerEncoder {
    /// Encoder using the global registry
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Encode `value` under the tag of its type
    ///
    /// # Error Handling
    /// Returns [`AsnError::Encode`] if a converter fails, and
    /// [`AsnError::Configuration`] if the type cannot be described or a choice
    /// value matches none of its alternatives.
    pub fn encode<T: AsnType>(&self, value: &T) -> AsnResult<Vec<u8>> {
        let description = self.registry.description::<T>()?;
        self.encode_described(&description, value, description.tag())
    }

    /// Encode `value` under `tag`
    ///
    /// A choice is wrapped: `tag` contains the TLV of the alternative.
    pub(crate) fn encode_nested<U: AsnType>(&self, value: &U, tag: Tag) -> AsnResult<Vec<u8>> {
        let description = self.registry.description::<U>()?;
        self.encode_described(&description, value, tag)
    }

    /// Encode one collection element
    ///
    /// A choice element is the TLV of its alternative, a structure element is
    /// written under `element_tag`.
    pub(crate) fn encode_element<U: AsnType>(
        &self,
        value: &U,
        element_tag: Tag,
    ) -> AsnResult<Vec<u8>> {
        let description = self.registry.description::<U>()?;
        match description.as_ref() {
            TypeDescription::Choice(choice) => self.encode_alternative(choice, value),
            TypeDescription::Structure(_) => {
                self.encode_described(&description, value, element_tag)
            }
        }
    }

    fn encode_described<U>(
        &self,
        description: &TypeDescription<U>,
        value: &U,
        tag: Tag,
    ) -> AsnResult<Vec<u8>> {
        let mut builder = BerStructureBuilder::new(tag.constructed());
        match description {
            TypeDescription::Structure(structure) => {
                for field in structure.fields() {
                    if let Some(encoded) = field.encode_from(value, self)? {
                        builder.add_value(encoded);
                    }
                }
            }
            TypeDescription::Choice(choice) => {
                builder.add_value(self.encode_alternative(choice, value)?);
            }
        }
        Ok(builder.build())
    }

    fn encode_alternative<U>(&self, choice: &ChoiceDescription<U>, value: &U) -> AsnResult<Vec<u8>> {
        for alternative in choice.alternatives() {
            let encoded = alternative.encode(value, self).map_err(|e| {
                AsnError::encode_with(
                    format!(
                        "Cannot encode alternative '{}' of '{}'",
                        alternative.name(),
                        choice.name()
                    ),
                    e,
                )
            })?;
            if let Some(encoded) = encoded {
                return Ok(encoded);
            }
        }
        Err(AsnError::Configuration(format!(
            "Value of '{}' matches none of its alternatives",
            choice.name()
        )))
    }
}

impl Default for BerEncoder {
    fn default() -> Self {
        Self::new()
    }
}
