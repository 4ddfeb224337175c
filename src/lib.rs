//! # resbundle - Scale-Aware Resource Bundles
//!
//! `resbundle` resolves application resources (images, raw data and
//! localized strings) from immutable data packs. Features:
//!
//! - **Scale-aware lookup**: packs are tagged with a display scale factor and
//!   lookups prefer the exact tier before falling back to generic ones
//! - **Locale packs**: a primary and an optional secondary locale pack, with
//!   atomic runtime reload and a test-only override table
//! - **Embedder delegate**: hooks to remap pack paths or supply resources
//! - **Zero-copy**: packs are memory-mapped and lookups return shared
//!   [`Bytes`](bytes::Bytes) views
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resbundle::{ResourceBundle, ScaleFactor};
//!
//! let mut bundle = ResourceBundle::builder().build();
//! bundle.add_data_pack_from_path("/opt/app/resources_100_percent.pak", ScaleFactor::P100);
//! bundle.load_locale_resources("de-DE");
//!
//! if let Some(icon) = bundle.get_raw_data_resource_for_scale(4012, ScaleFactor::P200) {
//!     println!("icon: {} bytes", icon.len());
//! }
//! println!("{}", bundle.get_localized_string(1024));
//! ```
//!
//! ## Locale Reload
//!
//! ```rust,no_run
//! use resbundle::{BundleConfig, LoadResources, ResourceBundle};
//!
//! # fn main() -> resbundle::Result<()> {
//! let config = BundleConfig::load("/etc/app/resources.toml")?.with_env_overrides();
//! let (bundle, locale) = ResourceBundle::builder()
//!     .config(config)
//!     .init_with_locale("en-US", LoadResources::LoadCommonResources);
//! assert_eq!(locale, "en-US");
//!
//! // Safe while other threads are reading strings
//! bundle.reload_locale_resources("ja");
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod config;
pub mod cursor;
pub mod delegate;
pub mod error;
pub mod locale;
pub mod mangle;
pub mod pack;
pub mod png;
pub mod scale;

#[cfg(test)]
pub(crate) mod test_util;

/// Identifier of a resource inside a data pack
pub type ResourceId = u16;

pub use bundle::{LoadResources, ResourceBundle, ResourceBundleBuilder};
pub use config::{BundleConfig, CommonPack};
pub use delegate::{NoopDelegate, ResourceDelegate};
pub use error::{BundleError, Result};
pub use locale::{DefaultLocaleResolver, LocaleResolver};
pub use mangle::mangle_localized_string;
pub use pack::{DataPack, FileRegion, TextEncoding};
pub use png::png_contains_fallback_marker;
pub use scale::{ScaleFactor, ScopedSupportedScaleFactors};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
