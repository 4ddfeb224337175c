//! Bundle configuration
//!
//! Where common and locale packs live, which common packs to attach, and
//! the mangling test switch. Loadable from TOML:
//!
//! ```toml
//! resources_dir = "/opt/app/resources"
//! locales_dir = "/opt/app/resources/locales"
//! mangle_localized_strings = false
//!
//! [[common_packs]]
//! file = "resources_100_percent.pak"
//! scale = "100p"
//!
//! [[common_packs]]
//! file = "resources_200_percent.pak"
//! scale = "200p"
//! optional = true
//! ```

use crate::error::Result;
use crate::scale::ScaleFactor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that turns string mangling on
pub const MANGLE_ENV_VAR: &str = "RESBUNDLE_MANGLE_LOCALIZED_STRINGS";

/// A common (non-locale) pack attached by `load_common_resources`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonPack {
    /// File name, resolved against `resources_dir`
    pub file: PathBuf,

    /// Scale factor the pack is tagged with; skipped when unsupported
    pub scale: ScaleFactor,

    /// Optional packs fail silently
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Directory holding common packs (default: executable's directory)
    pub resources_dir: Option<PathBuf>,

    /// Directory holding `<locale><pak_extension>` files
    /// (default: `locales/` next to the executable)
    pub locales_dir: Option<PathBuf>,

    /// Extension appended to locale names
    pub pak_extension: String,

    /// Common packs, attached in order
    pub common_packs: Vec<CommonPack>,

    /// Wrap every localized string with visible markers
    pub mangle_localized_strings: bool,
}

impl Default for BundleConfig {
    fn default() -> Self {
        BundleConfig {
            resources_dir: None,
            locales_dir: None,
            pak_extension: ".pak".to_string(),
            common_packs: vec![
                CommonPack {
                    file: PathBuf::from("resources_100_percent.pak"),
                    scale: ScaleFactor::P100,
                    optional: false,
                },
                CommonPack {
                    file: PathBuf::from("resources_200_percent.pak"),
                    scale: ScaleFactor::P200,
                    optional: true,
                },
            ],
            mangle_localized_strings: false,
        }
    }
}

impl BundleConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        debug!("Loaded bundle config from {}", path.as_ref().display());
        Self::from_toml_str(&contents)
    }

    /// Apply environment switches on top of this config
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var(MANGLE_ENV_VAR) {
            self.mangle_localized_strings = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self
    }

    /// Directory common packs are resolved against
    pub fn resources_dir(&self) -> Option<PathBuf> {
        self.resources_dir.clone().or_else(executable_dir)
    }

    /// Directory locale packs are resolved against
    pub fn locales_dir(&self) -> Option<PathBuf> {
        self.locales_dir
            .clone()
            .or_else(|| executable_dir().map(|dir| dir.join("locales")))
    }

    /// File name of the pak for `locale`
    pub fn locale_file_name(&self, locale: &str) -> String {
        format!("{}{}", locale, self.pak_extension)
    }
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
