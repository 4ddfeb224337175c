//! Resource bundle
//!
//! A [`ResourceBundle`] owns the general data packs (one per scale factor
//! and source) and the locale packs, and resolves lookups through a fixed
//! fallback chain:
//!
//! ```text
//! raw bytes:  delegate → packs at the requested scale → 100%/200%/300%/none packs
//! strings:    delegate → overrides → primary locale → secondary locale → raw bytes
//! ```
//!
//! ## Lifetime
//!
//! At most one bundle may be alive in a process. Every initialization path
//! goes through [`ResourceBundleBuilder`], which panics if another bundle is
//! still alive; dropping the bundle (or calling [`ResourceBundle::cleanup`])
//! releases the slot.
//!
//! ## Concurrency
//!
//! General packs and the delegate are fixed once setup is done: attaching
//! packs needs `&mut self`, so it cannot race lookups. The locale packs and
//! the override table live behind a single lock; string lookups hold it for
//! reading, reloads hold it for writing across the whole
//! clear-unload-load sequence.

mod builder;
mod locale;
mod lookup;

pub use builder::{LoadResources, ResourceBundleBuilder};

use crate::config::BundleConfig;
use crate::delegate::ResourceDelegate;
use crate::locale::LocaleResolver;
use crate::pack::{DataPack, FileRegion};
use crate::scale::{self, ScaleFactor};
use bytes::Bytes;
use locale::LocaleResources;
use parking_lot::RwLock;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

static LIVE_INSTANCE: AtomicBool = AtomicBool::new(false);

pub struct ResourceBundle {
    delegate: Option<Arc<dyn ResourceDelegate>>,
    locale_resolver: Arc<dyn LocaleResolver>,
    config: BundleConfig,

    /// General packs in insertion order
    data_packs: Vec<DataPack>,

    /// Highest scale factor among `data_packs`
    max_scale_factor: ScaleFactor,

    /// Primary/secondary locale packs and string overrides
    locale: RwLock<LocaleResources>,

    /// Read once from the config at construction
    mangle_localized_strings: bool,

    /// Set when initialized from explicit test paths
    is_test_resources: bool,
}

impl ResourceBundle {
    /// Start configuring a bundle
    pub fn builder() -> ResourceBundleBuilder {
        ResourceBundleBuilder::new()
    }

    /// True while some bundle is alive in this process
    pub fn has_live_instance() -> bool {
        LIVE_INSTANCE.load(Ordering::Acquire)
    }

    /// Claim the single-instance slot
    ///
    /// # Panics
    ///
    /// Panics if another bundle is still alive.
    fn new(
        delegate: Option<Arc<dyn ResourceDelegate>>,
        locale_resolver: Arc<dyn LocaleResolver>,
        config: BundleConfig,
    ) -> Self {
        if LIVE_INSTANCE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            panic!("ResourceBundle initialized twice");
        }

        let mangle_localized_strings = config.mangle_localized_strings;
        if mangle_localized_strings {
            info!("Mangling localized strings");
        }

        ResourceBundle {
            delegate,
            locale_resolver,
            config,
            data_packs: Vec::new(),
            max_scale_factor: ScaleFactor::P100,
            locale: RwLock::new(LocaleResources::default()),
            mangle_localized_strings,
            is_test_resources: false,
        }
    }

    /// Drop the bundle and release the single-instance slot
    pub fn cleanup(self) {
        drop(self);
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// General packs in lookup priority order
    pub fn data_packs(&self) -> &[DataPack] {
        &self.data_packs
    }

    /// Highest scale factor among attached general packs (100% when none)
    pub fn max_scale_factor(&self) -> ScaleFactor {
        self.max_scale_factor
    }

    pub fn is_test_resources(&self) -> bool {
        self.is_test_resources
    }

    pub fn mangles_localized_strings(&self) -> bool {
        self.mangle_localized_strings
    }

    /// True if `scale_factor` is in the process-wide supported set
    pub fn is_scale_factor_supported(scale_factor: ScaleFactor) -> bool {
        scale::is_scale_factor_supported(scale_factor)
    }

    /// Attach a loaded pack after the existing ones
    pub fn add_data_pack(&mut self, data_pack: DataPack) {
        if cfg!(debug_assertions) {
            for id in data_pack.duplicate_resources(&self.data_packs) {
                warn!(
                    "Duplicate resource id {} at scale {}",
                    id,
                    data_pack.scale_factor()
                );
            }
        }

        if data_pack.scale_factor().scale() > self.max_scale_factor.scale() {
            self.max_scale_factor = data_pack.scale_factor();
        }

        debug!(
            "Attached data pack #{} ({} resources) at {}",
            self.data_packs.len(),
            data_pack.len(),
            data_pack.scale_factor()
        );
        self.data_packs.push(data_pack);
    }

    /// Load and attach a required pack; failures are logged and skipped
    pub fn add_data_pack_from_path<P: AsRef<Path>>(&mut self, path: P, scale_factor: ScaleFactor) {
        self.add_data_pack_from_path_internal(path.as_ref(), scale_factor, false);
    }

    /// Load and attach a pack that may legitimately be absent
    pub fn add_optional_data_pack_from_path<P: AsRef<Path>>(
        &mut self,
        path: P,
        scale_factor: ScaleFactor,
    ) {
        self.add_data_pack_from_path_internal(path.as_ref(), scale_factor, true);
    }

    pub fn add_data_pack_from_file(&mut self, file: File, scale_factor: ScaleFactor) {
        self.add_data_pack_from_file_region(file, FileRegion::WholeFile, scale_factor);
    }

    pub fn add_data_pack_from_file_region(
        &mut self,
        file: File,
        region: FileRegion,
        scale_factor: ScaleFactor,
    ) {
        match DataPack::load_from_file_region(file, region, scale_factor) {
            Ok(data_pack) => self.add_data_pack(data_pack),
            Err(e) => error!(
                "Failed to load data pack from file: {}. Some features may not be available.",
                e
            ),
        }
    }

    pub fn add_data_pack_from_buffer(&mut self, buffer: Bytes, scale_factor: ScaleFactor) {
        match DataPack::load_from_buffer(buffer, scale_factor) {
            Ok(data_pack) => self.add_data_pack(data_pack),
            Err(e) => error!("Failed to load data pack from buffer: {}", e),
        }
    }

    /// Attach the configured common packs whose scale is supported
    pub fn load_common_resources(&mut self) {
        let Some(dir) = self.config.resources_dir() else {
            warn!("No resources directory; skipping common resources");
            return;
        };

        let packs = self.config.common_packs.clone();
        for pack in packs {
            if !scale::is_scale_factor_supported(pack.scale) {
                debug!(
                    "Skipping {} (scale {} unsupported)",
                    pack.file.display(),
                    pack.scale
                );
                continue;
            }
            self.add_data_pack_from_path_internal(&dir.join(&pack.file), pack.scale, pack.optional);
        }
    }

    fn add_data_pack_from_path_internal(
        &mut self,
        path: &Path,
        scale_factor: ScaleFactor,
        optional: bool,
    ) {
        // Callers pass at least a file name when the directory is unknown
        debug_assert!(!path.as_os_str().is_empty());

        let mut pack_path = path.to_path_buf();
        if let Some(delegate) = &self.delegate {
            if let Some(remapped) = delegate.path_for_resource_pack(&pack_path, scale_factor) {
                pack_path = remapped;
            }
        }

        if pack_path.as_os_str().is_empty() || !pack_path.is_absolute() {
            debug!("Not loading pack with non-absolute path {:?}", pack_path);
            return;
        }

        match DataPack::load_from_path(&pack_path, scale_factor) {
            Ok(data_pack) => self.add_data_pack(data_pack),
            Err(e) if !optional => error!(
                "Failed to load {}: {}. Some features may not be available.",
                pack_path.display(),
                e
            ),
            Err(_) => {}
        }
    }

    /// Use one pak as both the general and the locale source
    ///
    /// Either load failing leaves that part empty rather than failing.
    fn load_test_resources(&mut self, path: &Path, locale_path: &Path) {
        self.is_test_resources = true;

        let scale_factor = scale::supported_scale_factors()
            .first()
            .copied()
            .unwrap_or(ScaleFactor::P100);
        if !path.as_os_str().is_empty() {
            match DataPack::load_from_path(path, scale_factor) {
                Ok(data_pack) => self.add_data_pack(data_pack),
                Err(e) => warn!("Failed to load test pak {}: {}", path.display(), e),
            }
        }

        let locale_pack = if locale_path.as_os_str().is_empty() {
            DataPack::empty(ScaleFactor::None)
        } else {
            DataPack::load_from_path(locale_path, ScaleFactor::None).unwrap_or_else(|e| {
                warn!(
                    "Failed to load test locale pak {}: {}",
                    locale_path.display(),
                    e
                );
                DataPack::empty(ScaleFactor::None)
            })
        };
        self.locale.get_mut().primary = Some(locale_pack);

        // Warm up locale resolution; nothing is loaded for it
        let locale = self.locale_resolver.resolve("");
        debug!("Test resources initialized (default locale {})", locale);
    }
}

impl Drop for ResourceBundle {
    fn drop(&mut self) {
        self.locale.get_mut().unload();
        LIVE_INSTANCE.store(false, Ordering::Release);
    }
}

impl fmt::Debug for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBundle")
            .field("has_delegate", &self.delegate.is_some())
            .field("data_packs", &self.data_packs.len())
            .field("max_scale_factor", &self.max_scale_factor)
            .field("mangle_localized_strings", &self.mangle_localized_strings)
            .field("is_test_resources", &self.is_test_resources)
            .finish()
    }
}
