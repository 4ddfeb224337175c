//! Bundle construction and the initialization entry points

use super::ResourceBundle;
use crate::config::BundleConfig;
use crate::delegate::ResourceDelegate;
use crate::locale::{DefaultLocaleResolver, LocaleResolver};
use crate::pack::{DataPack, FileRegion};
use crate::scale::{self, ScaleFactor};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Whether `init_with_locale` attaches the configured common packs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadResources {
    #[default]
    LoadCommonResources,
    DoNotLoadCommonResources,
}

/// Configures and creates the process's [`ResourceBundle`]
///
/// Every terminal method installs the supported scale factors into the
/// process-wide registry, then claims the single-instance slot.
///
/// # Example
///
/// ```no_run
/// use resbundle::{LoadResources, ResourceBundle};
///
/// let (bundle, locale) = ResourceBundle::builder()
///     .init_with_locale("fr-FR", LoadResources::LoadCommonResources);
/// if locale.is_empty() {
///     eprintln!("no locale pak available");
/// }
/// println!("{}", bundle.get_localized_string(1024));
/// ```
pub struct ResourceBundleBuilder {
    delegate: Option<Arc<dyn ResourceDelegate>>,
    locale_resolver: Arc<dyn LocaleResolver>,
    config: BundleConfig,
    supported_scale_factors: Vec<ScaleFactor>,
}

impl ResourceBundleBuilder {
    pub fn new() -> Self {
        ResourceBundleBuilder {
            delegate: None,
            locale_resolver: Arc::new(DefaultLocaleResolver::default()),
            config: BundleConfig::default(),
            supported_scale_factors: vec![ScaleFactor::P100, ScaleFactor::P200],
        }
    }

    pub fn delegate(self, delegate: impl ResourceDelegate + 'static) -> Self {
        self.shared_delegate(Arc::new(delegate))
    }

    pub fn shared_delegate(mut self, delegate: Arc<dyn ResourceDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn locale_resolver(mut self, resolver: impl LocaleResolver + 'static) -> Self {
        self.locale_resolver = Arc::new(resolver);
        self
    }

    pub fn config(mut self, config: BundleConfig) -> Self {
        self.config = config;
        self
    }

    /// Scale factors to install as the supported set (default 100% and 200%)
    pub fn supported_scale_factors(mut self, scale_factors: &[ScaleFactor]) -> Self {
        self.supported_scale_factors = scale_factors.to_vec();
        self
    }

    /// Create a bundle with no packs attached
    ///
    /// # Panics
    ///
    /// Panics if a bundle is already alive.
    pub fn build(self) -> ResourceBundle {
        if ResourceBundle::has_live_instance() {
            panic!("ResourceBundle initialized twice");
        }
        scale::set_supported_scale_factors(&self.supported_scale_factors);
        ResourceBundle::new(self.delegate, self.locale_resolver, self.config)
    }

    /// Create a bundle, optionally attach the common packs, and load the
    /// locale resolved from `preferred`
    ///
    /// Returns the bundle and the resolved locale name, which is empty when
    /// the locale pak could not be loaded.
    pub fn init_with_locale(
        self,
        preferred: &str,
        load_resources: LoadResources,
    ) -> (ResourceBundle, String) {
        let mut bundle = self.build();
        if load_resources == LoadResources::LoadCommonResources {
            bundle.load_common_resources();
        }
        let locale = bundle.load_locale_resources(preferred);
        (bundle, locale)
    }

    /// Create a bundle whose only pack is read from part of `file`
    ///
    /// The pack is tagged with no scale factor and serves as the locale pack.
    ///
    /// # Panics
    ///
    /// Panics if a bundle is already alive or the pack cannot be loaded.
    pub fn init_with_pak_file_region(self, file: File, region: FileRegion) -> ResourceBundle {
        let mut bundle = self.build();
        match DataPack::load_from_file_region(file, region, ScaleFactor::None) {
            Ok(pack) => {
                info!("Initialized from pak region ({} resources)", pack.len());
                bundle.locale.get_mut().primary = Some(pack);
            }
            Err(e) => panic!("failed to load pak file: {}", e),
        }
        bundle
    }

    /// Create a bundle using the pak at `path` for both general and
    /// localized resources
    pub fn init_with_pak_path<P: AsRef<Path>>(self, path: P) -> ResourceBundle {
        let mut bundle = self.build();
        let path = path.as_ref();
        bundle.load_test_resources(path, path);
        bundle
    }
}

impl Default for ResourceBundleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
