//! Immutable data packs
//!
//! A [`DataPack`] maps 16-bit resource ids to byte ranges of one backing
//! buffer. Every pack is tagged with the [`ScaleFactor`] it was loaded for
//! and the [`TextEncoding`] its header declares. Packs are never mutated
//! after loading; lookups hand out [`Bytes`] views that share the backing
//! buffer, so they stay valid after the pack itself is dropped.

pub mod format;

pub use format::{TextEncoding, PAK_VERSION_V4, PAK_VERSION_V5};

use crate::error::{BundleError, Result};
use crate::scale::ScaleFactor;
use crate::ResourceId;
use bytes::Bytes;
use format::PakIndex;
use memmap2::MmapOptions;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Portion of an open file to map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileRegion {
    /// The entire file
    #[default]
    WholeFile,
    /// `size` bytes starting at `offset`
    Range { offset: u64, size: u64 },
}

impl FileRegion {
    fn resolve(self, file_len: u64) -> Result<(u64, u64)> {
        match self {
            FileRegion::WholeFile => Ok((0, file_len)),
            FileRegion::Range { offset, size } => match offset.checked_add(size) {
                Some(end) if end <= file_len => Ok((offset, size)),
                _ => Err(BundleError::InvalidRegion {
                    offset,
                    size,
                    length: file_len,
                }),
            },
        }
    }
}

/// Immutable, single-scale, single-encoding resource container
#[derive(Debug, Clone)]
pub struct DataPack {
    scale_factor: ScaleFactor,
    data: Bytes,
    index: Arc<PakIndex>,
}

impl DataPack {
    /// Pack with no resources
    ///
    /// Declares UTF-8 so string lookups that fall through it stay legal.
    pub fn empty(scale_factor: ScaleFactor) -> Self {
        DataPack {
            scale_factor,
            data: Bytes::new(),
            index: Arc::new(PakIndex::empty(TextEncoding::Utf8)),
        }
    }

    /// Build an in-memory pack from resource bytes keyed by id
    ///
    /// A v5 header counts at most 65,535 resources, so a map holding every
    /// `u16` id is rejected with [`BundleError::TooManyResources`].
    pub fn from_entries(
        scale_factor: ScaleFactor,
        encoding: TextEncoding,
        resources: &BTreeMap<ResourceId, Vec<u8>>,
    ) -> Result<Self> {
        let buffer = format::encode(
            encoding,
            resources.iter().map(|(id, bytes)| (*id, bytes.as_slice())),
        )?;
        Self::load_from_buffer(Bytes::from(buffer), scale_factor)
    }

    /// Load a pack from an in-memory buffer
    pub fn load_from_buffer(data: Bytes, scale_factor: ScaleFactor) -> Result<Self> {
        let index = format::parse(&data)?;
        debug!(
            "Loaded pak v{} ({:?}, {} resources) at {}",
            index.version,
            index.encoding,
            index.resources().len(),
            scale_factor
        );
        Ok(DataPack {
            scale_factor,
            data,
            index: Arc::new(index),
        })
    }

    /// Memory-map and load the pack at `path`
    pub fn load_from_path<P: AsRef<Path>>(path: P, scale_factor: ScaleFactor) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::load_from_file_region(file, FileRegion::WholeFile, scale_factor)
    }

    /// Memory-map and load the whole of an already open file
    pub fn load_from_file(file: File, scale_factor: ScaleFactor) -> Result<Self> {
        Self::load_from_file_region(file, FileRegion::WholeFile, scale_factor)
    }

    /// Memory-map and load part of an already open file
    ///
    /// Offsets recorded in the pak are relative to the start of the region.
    pub fn load_from_file_region(
        file: File,
        region: FileRegion,
        scale_factor: ScaleFactor,
    ) -> Result<Self> {
        let file_len = file.metadata()?.len();
        let (offset, size) = region.resolve(file_len)?;
        if size == 0 {
            return Err(BundleError::TruncatedHeader(0));
        }
        let len = usize::try_from(size).map_err(|_| BundleError::InvalidRegion {
            offset,
            size,
            length: file_len,
        })?;

        // The pack owns the mapping for its whole lifetime and never writes
        // through it. Files are expected not to be truncated while mapped.
        let mmap = unsafe { MmapOptions::new().offset(offset).len(len).map(&file)? };
        Self::load_from_buffer(Bytes::from_owner(mmap), scale_factor)
    }

    pub fn scale_factor(&self) -> ScaleFactor {
        self.scale_factor
    }

    pub fn text_encoding(&self) -> TextEncoding {
        self.index.encoding
    }

    /// Pak format version the pack was read from
    pub fn version(&self) -> u32 {
        self.index.version
    }

    /// Whole backing buffer, header included, as it would be written to disk
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes for `id`, or `None` when the pack does not contain it
    pub fn get(&self, id: ResourceId) -> Option<Bytes> {
        let range = self.index.lookup(id)?;
        Some(self.data.slice(range))
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.index.lookup(id).is_some()
    }

    /// Ids present in the pack, aliases included, ascending
    pub fn resource_ids(&self) -> Vec<ResourceId> {
        self.index.resource_ids()
    }

    /// Number of stored resources (aliases not counted)
    pub fn len(&self) -> usize {
        self.index.resources().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in this pack that some pack in `others` with the same scale
    /// factor already provides
    ///
    /// Purely diagnostic: colliding packs still load, and the earlier pack
    /// wins lookups.
    pub fn duplicate_resources(&self, others: &[DataPack]) -> Vec<ResourceId> {
        let ours = self.resource_ids();
        let mut duplicates: Vec<ResourceId> = others
            .iter()
            .filter(|other| other.scale_factor == self.scale_factor)
            .flat_map(|other| ours.iter().copied().filter(move |id| other.contains(*id)))
            .collect();
        duplicates.sort_unstable();
        duplicates.dedup();
        duplicates
    }
}

/// Decode a string resource per the encoding of the pack it came from
///
/// UTF-16 data is read as little-endian code units; a trailing odd byte is
/// ignored. Invalid sequences are replaced rather than rejected.
pub fn decode_string(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf16 => {
            let units: Vec<u16> = data
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        TextEncoding::Utf8 | TextEncoding::Binary => String::from_utf8_lossy(data).into_owned(),
    }
}
