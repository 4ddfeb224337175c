//! Pak container header and index
//!
//! ```text
//! v4:  u32 version | u32 resource_count | u8 encoding
//! v5:  u32 version | u8 encoding | 3 pad | u16 resource_count | u16 alias_count
//!
//! then (resource_count + 1) entries:  u16 resource_id | u32 offset
//! then (v5 only) alias_count aliases: u16 resource_id | u16 entry_index
//! ```
//!
//! All integers are little-endian. Offsets are absolute from the start of
//! the buffer; the final entry is a sentinel whose offset marks the end of
//! the last resource.

use crate::cursor::ByteCursor;
use crate::error::{BundleError, Result};
use crate::ResourceId;
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const PAK_VERSION_V4: u32 = 4;
pub const PAK_VERSION_V5: u32 = 5;

const V4_HEADER_SIZE: usize = 9;
const V5_HEADER_SIZE: usize = 12;
const ENTRY_SIZE: usize = 6;
const ALIAS_SIZE: usize = 4;

/// Text encoding declared by a pack for its string resources
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Binary = 0,
    Utf8 = 1,
    Utf16 = 2,
}

impl TextEncoding {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(TextEncoding::Binary),
            1 => Ok(TextEncoding::Utf8),
            2 => Ok(TextEncoding::Utf16),
            other => Err(BundleError::InvalidEncoding(other)),
        }
    }

    /// True for the encodings strings may be decoded from
    pub fn is_text(self) -> bool {
        matches!(self, TextEncoding::Utf8 | TextEncoding::Utf16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    pub id: ResourceId,
    pub offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Alias {
    pub id: ResourceId,
    pub entry_index: u16,
}

/// Validated pack index
///
/// `entries` always carries the trailing sentinel, so it is never empty.
#[derive(Debug, Clone)]
pub(crate) struct PakIndex {
    pub version: u32,
    pub encoding: TextEncoding,
    pub entries: Vec<Entry>,
    pub aliases: Vec<Alias>,
}

impl PakIndex {
    /// Index with no resources, used by empty in-memory packs
    pub fn empty(encoding: TextEncoding) -> Self {
        PakIndex {
            version: PAK_VERSION_V5,
            encoding,
            entries: vec![Entry { id: 0, offset: 0 }],
            aliases: Vec::new(),
        }
    }

    /// Real resources, sentinel excluded
    pub fn resources(&self) -> &[Entry] {
        &self.entries[..self.entries.len() - 1]
    }

    /// Byte range holding `id`, following aliases
    pub fn lookup(&self, id: ResourceId) -> Option<Range<usize>> {
        let resources = self.resources();
        let index = match resources.binary_search_by_key(&id, |e| e.id) {
            Ok(index) => index,
            Err(_) => {
                let alias = self
                    .aliases
                    .binary_search_by_key(&id, |a| a.id)
                    .ok()
                    .map(|i| self.aliases[i])?;
                alias.entry_index as usize
            }
        };
        let start = self.entries[index].offset as usize;
        let end = self.entries[index + 1].offset as usize;
        Some(start..end)
    }

    /// Every id reachable through the index, aliases included, ascending
    pub fn resource_ids(&self) -> Vec<ResourceId> {
        let mut ids: Vec<ResourceId> = self
            .resources()
            .iter()
            .map(|e| e.id)
            .chain(self.aliases.iter().map(|a| a.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Parse and validate the header and index of a pak buffer
pub(crate) fn parse(data: &[u8]) -> Result<PakIndex> {
    let mut cursor = ByteCursor::new(data);
    let truncated = || BundleError::TruncatedHeader(data.len());

    let version = cursor.u32_le().ok_or_else(truncated)?;
    let (encoding, resource_count, alias_count) = match version {
        PAK_VERSION_V4 => {
            if data.len() < V4_HEADER_SIZE {
                return Err(truncated());
            }
            let count = cursor.u32_le().ok_or_else(truncated)?;
            let encoding = cursor.u8().ok_or_else(truncated)?;
            (encoding, count as usize, 0usize)
        }
        PAK_VERSION_V5 => {
            if data.len() < V5_HEADER_SIZE {
                return Err(truncated());
            }
            let encoding = cursor.u8().ok_or_else(truncated)?;
            cursor.skip(3).ok_or_else(truncated)?;
            let count = cursor.u16_le().ok_or_else(truncated)?;
            let aliases = cursor.u16_le().ok_or_else(truncated)?;
            (encoding, count as usize, aliases as usize)
        }
        other => return Err(BundleError::UnsupportedVersion(other)),
    };
    let encoding = TextEncoding::from_u8(encoding)?;

    let table_size = (resource_count + 1) * ENTRY_SIZE + alias_count * ALIAS_SIZE;
    if cursor.remaining() < table_size {
        return Err(BundleError::TruncatedIndex {
            needed: cursor.position() + table_size,
            available: data.len(),
        });
    }

    let mut entries = Vec::with_capacity(resource_count + 1);
    for _ in 0..=resource_count {
        let id = cursor.u16_le().ok_or_else(truncated)?;
        let offset = cursor.u32_le().ok_or_else(truncated)?;
        entries.push(Entry { id, offset });
    }

    let mut aliases = Vec::with_capacity(alias_count);
    for _ in 0..alias_count {
        let id = cursor.u16_le().ok_or_else(truncated)?;
        let entry_index = cursor.u16_le().ok_or_else(truncated)?;
        aliases.push(Alias { id, entry_index });
    }

    validate(data.len(), &entries, &aliases)?;

    Ok(PakIndex {
        version,
        encoding,
        entries,
        aliases,
    })
}

fn validate(length: usize, entries: &[Entry], aliases: &[Alias]) -> Result<()> {
    for entry in entries {
        if entry.offset as usize > length {
            return Err(BundleError::EntryOutOfBounds {
                resource_id: entry.id,
                offset: entry.offset,
                length,
            });
        }
    }

    let resource_count = entries.len() - 1;
    for pair in entries.windows(2) {
        if pair[1].offset < pair[0].offset {
            return Err(BundleError::UnsortedIndex(pair[0].id));
        }
    }
    for pair in entries[..resource_count].windows(2) {
        if pair[1].id <= pair[0].id {
            return Err(BundleError::UnsortedIndex(pair[1].id));
        }
    }

    for pair in aliases.windows(2) {
        if pair[1].id <= pair[0].id {
            return Err(BundleError::UnsortedIndex(pair[1].id));
        }
    }
    for alias in aliases {
        if alias.entry_index as usize >= resource_count {
            return Err(BundleError::InvalidAlias {
                resource_id: alias.id,
                index: alias.entry_index,
            });
        }
    }

    Ok(())
}

/// Serialize resources as a v5 pak without aliases
///
/// `resources` must already be sorted by id. Fails when the count does not
/// fit the v5 header or an offset would not fit in 32 bits.
pub(crate) fn encode<'a, I>(encoding: TextEncoding, resources: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (ResourceId, &'a [u8])>,
    I::IntoIter: ExactSizeIterator,
{
    let resources = resources.into_iter();
    let count = resources.len();
    let count_field = u16::try_from(count).map_err(|_| BundleError::TooManyResources(count))?;
    let data_start = V5_HEADER_SIZE + (count + 1) * ENTRY_SIZE;
    let offset_at = |position: usize| {
        u32::try_from(position).map_err(|_| BundleError::PackTooLarge(position))
    };

    let mut header = Vec::with_capacity(data_start);
    let mut body = Vec::new();

    header.extend_from_slice(&PAK_VERSION_V5.to_le_bytes());
    header.push(encoding as u8);
    header.extend_from_slice(&[0u8; 3]);
    header.extend_from_slice(&count_field.to_le_bytes());
    header.extend_from_slice(&0u16.to_le_bytes());

    for (id, bytes) in resources {
        let offset = offset_at(data_start + body.len())?;
        header.extend_from_slice(&id.to_le_bytes());
        header.extend_from_slice(&offset.to_le_bytes());
        body.extend_from_slice(bytes);
    }
    let end = offset_at(data_start + body.len())?;
    header.extend_from_slice(&0u16.to_le_bytes());
    header.extend_from_slice(&end.to_le_bytes());

    header.extend_from_slice(&body);
    Ok(header)
}
