/// Version string or wire id could not be turned into a [`Version`](crate::version::Version).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("malformed version '{input}': {reason}")]
    Format { input: String, reason: &'static str },

    #[error("invalid version id {0}")]
    InvalidId(i32),

    #[error("version {0} has no wire id: minor and revision must be at most 99")]
    Unencodable(crate::version::Version),
}

/// Primitive-level failure while reading or writing a byte stream.
///
/// Never surfaces on its own from the envelope: the envelope attributes it to
/// the field being processed (see [`CodecError::within`]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    Eof { needed: usize, remaining: usize },

    #[error("malformed {0}")]
    Malformed(String),
}

impl From<VersionError> for StreamError {
    fn from(e: VersionError) -> Self {
        StreamError::Malformed(e.to_string())
    }
}

/// Protocol-definition bug found while building the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("record '{record}' field '{field}': {reason}")]
    UnknownFieldVersion {
        record: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("record type '{0}' registered twice")]
    DuplicateRecordType(&'static str),
}

/// Encode/decode failure. Always fatal to the call that produced it.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("record '{record}': required field '{field}' is missing")]
    MissingField { record: &'static str, field: String },

    #[error(
        "record '{record}' truncated in field '{field}': needed {needed} bytes, {remaining} remaining"
    )]
    Truncated {
        record: &'static str,
        field: String,
        needed: usize,
        remaining: usize,
    },

    #[error("record '{record}' field '{field}': {reason}")]
    Malformed {
        record: &'static str,
        field: String,
        reason: String,
    },

    #[error("record '{record}': {remaining} trailing bytes after the last field")]
    TrailingBytes { record: &'static str, remaining: usize },

    #[error("record type '{0}' is not registered")]
    UnregisteredRecord(String),

    /// Stream failure not yet attributed to a field.
    #[error("{0}")]
    Stream(#[from] StreamError),
}

impl From<VersionError> for CodecError {
    fn from(e: VersionError) -> Self {
        CodecError::Stream(StreamError::Malformed(e.to_string()))
    }
}

impl CodecError {
    /// Placeholder for an absent required value; [`within`](Self::within)
    /// fills in the record and field.
    pub fn missing() -> Self {
        CodecError::MissingField {
            record: "",
            field: String::new(),
        }
    }

    /// Attribute the error to `field` of `record`.
    ///
    /// Applied at every nesting level, so the outermost record wins and the
    /// field becomes a dotted path: `plugins.entries`.
    pub fn within(self, record: &'static str, field: &str) -> Self {
        let path = |inner: String| {
            if inner.is_empty() {
                field.to_string()
            } else {
                format!("{field}.{inner}")
            }
        };
        match self {
            CodecError::Stream(StreamError::Eof { needed, remaining }) => CodecError::Truncated {
                record,
                field: field.to_string(),
                needed,
                remaining,
            },
            CodecError::Stream(StreamError::Malformed(reason)) => CodecError::Malformed {
                record,
                field: field.to_string(),
                reason,
            },
            CodecError::Truncated {
                field: inner,
                needed,
                remaining,
                ..
            } => CodecError::Truncated {
                record,
                field: path(inner),
                needed,
                remaining,
            },
            CodecError::Malformed {
                field: inner,
                reason,
                ..
            } => CodecError::Malformed {
                record,
                field: path(inner),
                reason,
            },
            CodecError::MissingField { field: inner, .. } => CodecError::MissingField {
                record,
                field: path(inner),
            },
            other => other,
        }
    }
}
