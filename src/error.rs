//! Error types for pack loading and configuration

use thiserror::Error;

/// Result type for fallible pack and config operations
pub type Result<T> = std::result::Result<T, BundleError>;

/// Errors raised while loading data packs or bundle configuration
///
/// Lookups on a [`ResourceBundle`](crate::ResourceBundle) never surface these;
/// they are logged and the lookup degrades to an empty result.
#[derive(Error, Debug)]
pub enum BundleError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffer too small to hold the pack header
    #[error("Pack header truncated: {0} bytes available")]
    TruncatedHeader(usize),

    /// Pack version is neither 4 nor 5
    #[error("Unsupported pack version: {0}")]
    UnsupportedVersion(u32),

    /// Unknown text encoding byte in the header
    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(u8),

    /// Entry or alias table runs past the end of the buffer
    #[error("Pack index truncated: need {needed} bytes, have {available}")]
    TruncatedIndex { needed: usize, available: usize },

    /// An entry points outside the pack
    #[error("Resource {resource_id} offset {offset} exceeds pack length {length}")]
    EntryOutOfBounds {
        resource_id: u16,
        offset: u32,
        length: usize,
    },

    /// Entry ids must be strictly ascending, offsets non-decreasing
    #[error("Pack index is not sorted at resource {0}")]
    UnsortedIndex(u16),

    /// Alias refers to an entry that does not exist
    #[error("Alias {resource_id} points at missing entry {index}")]
    InvalidAlias { resource_id: u16, index: u16 },

    /// More resources than a v5 header can count
    #[error("Too many resources for one pack: {0}")]
    TooManyResources(usize),

    /// Encoded pack would place data past the 32-bit offset range
    #[error("Pack too large: offset {0} exceeds 32 bits")]
    PackTooLarge(usize),

    /// Requested sub-region of a file is out of range
    #[error("Invalid file region: offset {offset} + size {size} exceeds file length {length}")]
    InvalidRegion { offset: u64, size: u64, length: u64 },

    /// Config file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}
