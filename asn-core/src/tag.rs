//! ASN.1 tag model
//!
//! A tag identifies the type of an encoded value. It consists of:
//! - **Class**: Universal, Application, Context-specific, or Private
//! - **Number**: The tag number within the class
//! - **Constructed flag**: Whether the value contains nested TLVs
//!
//! Two tags are equal when class and number match. The constructed flag is
//! carried along for encoding but ignored by comparisons, so a declared field
//! tag matches a TLV no matter how the sender encoded it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Universal tag numbers defined by X.680
pub mod universal {
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const BIT_STRING: u32 = 3;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const OBJECT_IDENTIFIER: u32 = 6;
    pub const ENUMERATED: u32 = 10;
    pub const UTF8_STRING: u32 = 12;
    pub const SEQUENCE: u32 = 16;
    pub const SET: u32 = 17;
    pub const NUMERIC_STRING: u32 = 18;
    pub const PRINTABLE_STRING: u32 = 19;
    pub const TELETEX_STRING: u32 = 20;
    pub const VIDEOTEX_STRING: u32 = 21;
    pub const IA5_STRING: u32 = 22;
    pub const UTC_TIME: u32 = 23;
    pub const GENERALIZED_TIME: u32 = 24;
    pub const GRAPHIC_STRING: u32 = 25;
    pub const VISIBLE_STRING: u32 = 26;
    pub const GENERAL_STRING: u32 = 27;
    pub const UNIVERSAL_STRING: u32 = 28;
    pub const CHARACTER_STRING: u32 = 29;
    pub const BMP_STRING: u32 = 30;
}

/// Tag class
///
/// The discriminant is the 2-bit class code found in bits 8-7 of the first
/// identifier octet, so the derived ordering follows the wire ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    Context = 2,
    /// Private class (11)
    Private = 3,
}

impl TagClass {
    /// Get tag class from the first identifier octet (bits 8-7)
    pub fn from_bits(octet: u8) -> Self {
        match (octet >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::Context,
            _ => TagClass::Private,
        }
    }

    /// Convert tag class to its position in the first identifier octet
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }

    fn label(self) -> &'static str {
        match self {
            TagClass::Universal => "UNIVERSAL",
            TagClass::Application => "APPLICATION",
            TagClass::Context => "CONTEXT",
            TagClass::Private => "PRIVATE",
        }
    }
}

/// An ASN.1 tag
///
/// Tags are immutable values. They are created when a type description is
/// built or when identifier octets are parsed.
///
/// # Encoding Format
///
/// Tag numbers 0-30 fit in one identifier octet:
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// Larger numbers set bits 5-1 of the first octet and follow with base 128
/// digits, most significant first, bit 8 set on all but the last:
/// ```text
/// First octet:     C C P 1 1 1 1 1
/// Following octets: 1 T T T T T T T ... 0 T T T T T T T
/// ```
///
/// # Why Is `constructed` Not Part of Equality?
/// Descriptors name a field by class and number only. A sender may mark the
/// same field primitive or constructed, and the field must be found either way.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tag {
    number: u32,
    class: TagClass,
    constructed: bool,
}

impl Tag {
    /// Universal SEQUENCE, the default tag of structures and list-like collections
    pub const SEQUENCE: Tag = Tag::new(universal::SEQUENCE, TagClass::Universal, true);

    /// Universal SET, the default tag of set-like collections
    pub const SET: Tag = Tag::new(universal::SET, TagClass::Universal, true);

    /// Create a new tag
    pub const fn new(number: u32, class: TagClass, constructed: bool) -> Self {
        Self {
            number,
            class,
            constructed,
        }
    }

    /// Create a primitive Universal class tag
    pub const fn universal(number: u32) -> Self {
        Self::new(number, TagClass::Universal, false)
    }

    /// Create a primitive Application class tag
    pub const fn application(number: u32) -> Self {
        Self::new(number, TagClass::Application, false)
    }

    /// Create a primitive Context-specific class tag
    pub const fn context(number: u32) -> Self {
        Self::new(number, TagClass::Context, false)
    }

    /// Create a primitive Private class tag
    pub const fn private(number: u32) -> Self {
        Self::new(number, TagClass::Private, false)
    }

    /// Same class and number with the given constructed flag
    pub const fn with_constructed(self, constructed: bool) -> Self {
        Self::new(self.number, self.class, constructed)
    }

    /// Same class and number, marked as constructed
    pub const fn constructed(self) -> Self {
        self.with_constructed(true)
    }

    /// Get tag number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Get tag class
    pub fn class(&self) -> TagClass {
        self.class
    }

    /// Check if tag is constructed
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && self.class == other.class
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        self.number.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    // order by class, then by number
    fn cmp(&self, other: &Self) -> Ordering {
        self.class
            .cmp(&other.class)
            .then_with(|| self.number.cmp(&other.number))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}", self.class.label(), self.number)?;
        if self.constructed {
            write!(f, " C")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_constructed_flag() {
        let primitive = Tag::context(3);
        let constructed = Tag::context(3).constructed();
        assert_eq!(primitive, constructed);

        let mut set = HashSet::new();
        set.insert(primitive);
        assert!(set.contains(&constructed));
    }

    #[test]
    fn test_equality_respects_class() {
        assert_ne!(Tag::context(1), Tag::application(1));
        assert_ne!(Tag::context(1), Tag::context(2));
    }

    #[test]
    fn test_ordering_by_class_then_number() {
        let mut tags = vec![
            Tag::private(0),
            Tag::context(5),
            Tag::universal(30),
            Tag::context(1),
            Tag::application(2),
        ];
        tags.sort();
        assert_eq!(
            tags,
            vec![
                Tag::universal(30),
                Tag::application(2),
                Tag::context(1),
                Tag::context(5),
                Tag::private(0),
            ]
        );
    }

    #[test]
    fn test_class_bits() {
        for class in [
            TagClass::Universal,
            TagClass::Application,
            TagClass::Context,
            TagClass::Private,
        ] {
            assert_eq!(TagClass::from_bits(class.to_bits() | 0x3F), class);
        }
        assert_eq!(TagClass::Context.to_bits(), 0x80);
    }

    #[test]
    fn test_serde_keeps_constructed_flag() {
        let tag = Tag::context(3).constructed();
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, r#"{"number":3,"class":"Context","constructed":true}"#);

        let parsed: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tag);
        assert!(parsed.is_constructed());
        assert_eq!(parsed.class(), TagClass::Context);
    }

    #[test]
    fn test_display() {
        assert_eq!(Tag::context(3).to_string(), "[CONTEXT 3]");
        assert_eq!(Tag::SEQUENCE.to_string(), "[UNIVERSAL 16 C]");
    }
}
