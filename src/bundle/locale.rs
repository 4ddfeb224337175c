//! Locale pack state and (re)loading

use super::ResourceBundle;
use crate::pack::{DataPack, FileRegion};
use crate::scale::ScaleFactor;
use crate::ResourceId;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Everything guarded by the locale lock
///
/// Readers see either the whole state before a reload or the whole state
/// after it, never a mix.
#[derive(Debug, Default)]
pub(super) struct LocaleResources {
    pub(super) primary: Option<DataPack>,
    pub(super) secondary: Option<DataPack>,
    pub(super) overrides: HashMap<ResourceId, String>,
    pub(super) overridden_pak_path: Option<PathBuf>,
}

impl LocaleResources {
    pub(super) fn unload(&mut self) {
        self.primary = None;
        self.secondary = None;
    }
}

impl ResourceBundle {
    /// Resolve `preferred` and install that locale's pak as the primary
    /// locale pack
    ///
    /// Returns the resolved locale name, or an empty string when no pak
    /// could be found or loaded.
    pub fn load_locale_resources(&self, preferred: &str) -> String {
        let mut state = self.locale.write();
        self.load_locale_resources_locked(&mut state, preferred)
    }

    /// Swap every locale pack for those of `preferred`
    ///
    /// Overrides are cleared, both packs released and the new primary pack
    /// loaded without releasing the lock in between.
    pub fn reload_locale_resources(&self, preferred: &str) -> String {
        let mut state = self.locale.write();
        state.overrides.clear();
        state.unload();
        self.load_locale_resources_locked(&mut state, preferred)
    }

    /// Release the primary and secondary locale packs
    pub fn unload_locale_resources(&self) {
        self.locale.write().unload();
    }

    /// Install a fallback-only locale pack read from part of `file`
    pub fn load_secondary_locale_data_with_pak_file_region(&self, file: File, region: FileRegion) {
        match DataPack::load_from_file_region(file, region, ScaleFactor::P100) {
            Ok(pack) => {
                debug!("Installed secondary locale pack ({} resources)", pack.len());
                self.locale.write().secondary = Some(pack);
            }
            Err(e) => warn!("Failed to load secondary locale pak: {}", e),
        }
    }

    /// Path of the pak for `locale`, if it is usable
    ///
    /// The delegate may remap the default `<locales_dir>/<locale><ext>`
    /// path. Empty or relative results are rejected, and with
    /// `test_file_exists` so is a path that does not exist.
    pub fn locale_file_path(&self, locale: &str, test_file_exists: bool) -> Option<PathBuf> {
        if locale.is_empty() {
            return None;
        }

        let mut path = self
            .config
            .locales_dir()
            .map(|dir| dir.join(self.config.locale_file_name(locale)))
            .unwrap_or_default();

        if let Some(delegate) = &self.delegate {
            if let Some(remapped) = delegate.path_for_locale_pack(&path, locale) {
                path = remapped;
            }
        }

        if path.as_os_str().is_empty() || !path.is_absolute() {
            return None;
        }
        if test_file_exists && !path.exists() {
            return None;
        }
        Some(path)
    }

    /// True if a pak for `locale` exists on disk
    pub fn locale_data_pak_exists(&self, locale: &str) -> bool {
        self.locale_file_path(locale, true).is_some()
    }

    /// Load locale resources from `path` regardless of the locale asked for
    pub fn override_locale_pak_for_test<P: AsRef<Path>>(&self, path: P) {
        let path = path.as_ref();
        self.locale.write().overridden_pak_path =
            (!path.as_os_str().is_empty()).then(|| path.to_path_buf());
    }

    /// Make `get_localized_string(id)` return `value` until the next reload
    pub fn override_locale_string_resource(&self, id: ResourceId, value: impl Into<String>) {
        self.locale.write().overrides.insert(id, value.into());
    }

    /// True while a primary locale pack is installed
    pub fn has_locale_resources(&self) -> bool {
        self.locale.read().primary.is_some()
    }

    fn load_locale_resources_locked(&self, state: &mut LocaleResources, preferred: &str) -> String {
        debug_assert!(state.primary.is_none(), "locale pak already loaded");

        let locale = self.locale_resolver.resolve(preferred);
        let path = match &state.overridden_pak_path {
            Some(path) => Some(path.clone()),
            None => self.locale_file_path(&locale, true),
        };
        let Some(path) = path else {
            warn!("No locale pak found for locale {:?}", locale);
            return String::new();
        };

        match DataPack::load_from_path(&path, ScaleFactor::P100) {
            Ok(pack) => {
                info!(
                    "Loaded locale {} from {} ({} resources)",
                    locale,
                    path.display(),
                    pack.len()
                );
                state.primary = Some(pack);
                locale
            }
            Err(e) => {
                error!("Failed to load locale pak {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}
