//! Embedder hooks consulted before default resolution
//!
//! Every hook has a default that declines, so an implementor overrides only
//! what it cares about. Returning `None` means "not handled": the bundle
//! carries on with its own lookup.

use crate::scale::ScaleFactor;
use crate::ResourceId;
use bytes::Bytes;
use std::path::{Path, PathBuf};

pub trait ResourceDelegate: Send + Sync {
    /// Remap the path of a common resource pack before it is loaded
    ///
    /// Returning an empty or relative path prevents the pack from loading.
    fn path_for_resource_pack(&self, _pack_path: &Path, _scale: ScaleFactor) -> Option<PathBuf> {
        None
    }

    /// Remap the path of a locale pack before it is loaded
    ///
    /// Returning an empty or relative path prevents the pack from loading.
    fn path_for_locale_pack(&self, _pack_path: &Path, _locale: &str) -> Option<PathBuf> {
        None
    }

    /// Supply raw bytes for a resource in place of the general packs
    fn raw_data_resource(&self, _id: ResourceId, _scale: ScaleFactor) -> Option<Bytes> {
        None
    }

    /// Supply owned bytes for a resource in place of the general packs
    fn load_data_resource_bytes(&self, _id: ResourceId, _scale: ScaleFactor) -> Option<Bytes> {
        None
    }

    /// Supply a localized string in place of the locale packs
    fn localized_string(&self, _id: ResourceId) -> Option<String> {
        None
    }
}

/// Delegate that declines every hook
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelegate;

impl ResourceDelegate for NoopDelegate {}
