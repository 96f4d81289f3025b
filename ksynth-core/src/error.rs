//! Error types for SysEx decoding and encoding

/// A value outside the declared domain of a ranged parameter
///
/// Raised at construction or mutation time. Never produced by silently
/// clamping: callers that want saturation ask for it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{name}: {value} is outside {min}..={max}")]
pub struct RangeError {
    /// Symbolic name of the parameter
    pub name: &'static str,
    /// The rejected value
    pub value: i32,
    /// Inclusive lower bound
    pub min: i32,
    /// Inclusive upper bound
    pub max: i32,
}

/// Errors that can occur when decoding or encoding SysEx units
///
/// Decode errors carry the name of the structural unit being walked and the
/// absolute byte offset into the buffer handed to `from_bytes`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyxError {
    /// Editing-time domain violation
    #[error(transparent)]
    Range(#[from] RangeError),

    /// A wire byte decoded to a value outside its domain
    #[error("{unit} @ {offset:#06x}: {source}")]
    Value {
        unit: &'static str,
        offset: usize,
        #[source]
        source: RangeError,
    },

    /// An enumerated selector has no variant for the wire bits
    #[error("{unit} @ {offset:#06x}: {value:#04x} is not a valid {kind}")]
    InvalidKind {
        unit: &'static str,
        offset: usize,
        kind: &'static str,
        value: u8,
    },

    /// Assembled or consumed byte count disagrees with the declared length
    #[error("{unit}: expected {expected} bytes, got {actual}")]
    StructuralLength {
        unit: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Stored checksum disagrees with the one computed from the payload
    #[error("{unit} @ {offset:#06x}: checksum mismatch (stored {stored:#06x}, computed {computed:#06x})")]
    ChecksumMismatch {
        unit: &'static str,
        offset: usize,
        stored: u16,
        computed: u16,
    },

    /// Buffer ended inside a unit
    #[error("{unit} @ {offset:#06x}: unexpected end of data ({needed} more bytes needed)")]
    UnexpectedEof {
        unit: &'static str,
        offset: usize,
        needed: usize,
    },

    /// Decoded source count outside the family's bounds
    #[error("{unit} @ {offset:#06x}: source count {count} outside {min}..={max}")]
    SourceCount {
        unit: &'static str,
        offset: usize,
        count: u8,
        min: u8,
        max: u8,
    },

    /// A patch being encoded holds a source list the format cannot carry
    ///
    /// Raised before any byte is written, so it has no offset.
    #[error("{unit}: {count} sources, the format carries {min}..={max}")]
    SourceLimit {
        unit: &'static str,
        count: usize,
        min: usize,
        max: usize,
    },

    /// Character with no representation in the patch-name charset
    #[error("character {0:?} cannot be stored in a patch name")]
    UnsupportedCharacter(char),
}

impl SyxError {
    /// Name of the unit the error was raised in, if any
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Value { unit, .. }
            | Self::InvalidKind { unit, .. }
            | Self::StructuralLength { unit, .. }
            | Self::ChecksumMismatch { unit, .. }
            | Self::UnexpectedEof { unit, .. }
            | Self::SourceCount { unit, .. }
            | Self::SourceLimit { unit, .. } => Some(unit),
            Self::Range(_) | Self::UnsupportedCharacter(_) => None,
        }
    }

    /// Absolute byte offset the error points at, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Value { offset, .. }
            | Self::InvalidKind { offset, .. }
            | Self::ChecksumMismatch { offset, .. }
            | Self::UnexpectedEof { offset, .. }
            | Self::SourceCount { offset, .. } => Some(*offset),
            Self::Range(_)
            | Self::StructuralLength { .. }
            | Self::SourceLimit { .. }
            | Self::UnsupportedCharacter(_) => None,
        }
    }
}

/// Result alias used throughout the codec crates
pub type Result<T> = std::result::Result<T, SyxError>;
