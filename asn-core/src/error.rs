use thiserror::Error;

/// Main error type for ASN.1 encoding and decoding
///
/// The low level variants (`Parse`, `Read`, `Convert`, `Configuration`) describe
/// what went wrong. `Decode` and `Encode` wrap one of them with the context of the
/// structure or field that was being processed when it happened.
#[derive(Error, Debug)]
pub enum AsnError {
    /// Invalid tag or length bit patterns
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input ended before a complete TLV could be read
    #[error("Read error: {0}")]
    Read(String),

    /// Value bytes do not represent the declared scalar type
    #[error("Conversion error: {0}")]
    Convert(String),

    /// A type, field or converter was declared in a way that cannot work
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<AsnError>>,
    },

    #[error("Encode error: {message}")]
    Encode {
        message: String,
        #[source]
        source: Option<Box<AsnError>>,
    },
}

impl AsnError {
    /// Create a decode error without an underlying cause
    pub fn decode(message: impl Into<String>) -> Self {
        AsnError::Decode {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap `source` in a decode error carrying `message` as context
    pub fn decode_with(message: impl Into<String>, source: AsnError) -> Self {
        AsnError::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an encode error without an underlying cause
    pub fn encode(message: impl Into<String>) -> Self {
        AsnError::Encode {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap `source` in an encode error carrying `message` as context
    pub fn encode_with(message: impl Into<String>, source: AsnError) -> Self {
        AsnError::Encode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Walk the chain of wrapped errors and return the innermost one
    pub fn root_cause(&self) -> &AsnError {
        let mut current = self;
        loop {
            match current {
                AsnError::Decode {
                    source: Some(source),
                    ..
                }
                | AsnError::Encode {
                    source: Some(source),
                    ..
                } => current = source,
                _ => return current,
            }
        }
    }
}

/// Result type alias for ASN.1 operations
pub type AsnResult<T> = Result<T, AsnError>;
