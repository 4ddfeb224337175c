//! Resource lookups through the fallback chain

use super::ResourceBundle;
use crate::mangle::mangle_localized_string;
use crate::pack::{decode_string, TextEncoding};
use crate::scale::ScaleFactor;
use crate::ResourceId;
use bytes::Bytes;
use tracing::{error, warn};

/// Tiers searched when no exact-scale pack has the resource
const GENERIC_SCALE_FACTORS: [ScaleFactor; 4] = [
    ScaleFactor::P100,
    ScaleFactor::P200,
    ScaleFactor::P300,
    ScaleFactor::None,
];

impl ResourceBundle {
    /// Raw bytes for `id` at unspecified scale
    pub fn get_raw_data_resource(&self, id: ResourceId) -> Option<Bytes> {
        self.get_raw_data_resource_for_scale(id, ScaleFactor::None)
    }

    /// Raw bytes for `id`, preferring packs tagged `scale_factor`
    ///
    /// The delegate is asked first. For a specified tier, packs with exactly
    /// that scale are searched in insertion order; then every pack tagged
    /// 100%, 200%, 300% or none is searched in insertion order.
    pub fn get_raw_data_resource_for_scale(
        &self,
        id: ResourceId,
        scale_factor: ScaleFactor,
    ) -> Option<Bytes> {
        if let Some(delegate) = &self.delegate {
            if let Some(data) = delegate.raw_data_resource(id, scale_factor) {
                return Some(data);
            }
        }

        if scale_factor.is_specified() {
            let exact = self
                .data_packs
                .iter()
                .filter(|pack| pack.scale_factor() == scale_factor)
                .find_map(|pack| pack.get(id));
            if exact.is_some() {
                return exact;
            }
        }

        self.data_packs
            .iter()
            .filter(|pack| GENERIC_SCALE_FACTORS.contains(&pack.scale_factor()))
            .find_map(|pack| pack.get(id))
    }

    /// Owned bytes for `id` at unspecified scale, `None` when missing or empty
    pub fn load_data_resource_bytes(&self, id: ResourceId) -> Option<Bytes> {
        self.load_data_resource_bytes_for_scale(id, ScaleFactor::None)
    }

    pub fn load_data_resource_bytes_for_scale(
        &self,
        id: ResourceId,
        scale_factor: ScaleFactor,
    ) -> Option<Bytes> {
        if let Some(delegate) = &self.delegate {
            if let Some(data) = delegate.load_data_resource_bytes(id, scale_factor) {
                return Some(data);
            }
        }

        self.get_raw_data_resource_for_scale(id, scale_factor)
            .filter(|data| !data.is_empty())
    }

    /// Localized string for `id`
    ///
    /// Resolution order: delegate, overrides, primary locale pack, secondary
    /// locale pack, then the general packs. Misses yield an empty string.
    /// The result is mangled when mangling is enabled.
    pub fn get_localized_string(&self, id: ResourceId) -> String {
        if let Some(delegate) = &self.delegate {
            if let Some(s) = delegate.localized_string(id) {
                return self.maybe_mangle(s);
            }
        }

        let state = self.locale.read();

        if let Some(s) = state.overrides.get(&id) {
            return self.maybe_mangle(s.clone());
        }

        let Some(primary) = &state.primary else {
            warn!("Locale resources are not loaded");
            return String::new();
        };

        let mut encoding = primary.text_encoding();
        let data = match primary.get(id) {
            Some(data) => data,
            None => match state.secondary.as_ref().and_then(|s| s.get(id).map(|d| (s, d))) {
                Some((secondary, data)) => {
                    encoding = secondary.text_encoding();
                    data
                }
                None => match self.get_raw_data_resource(id).filter(|d| !d.is_empty()) {
                    Some(data) => data,
                    None => {
                        error!("Unable to find resource: {}", id);
                        return String::new();
                    }
                },
            },
        };
        drop(state);

        debug_assert!(
            encoding.is_text(),
            "requested localized string from binary pack file"
        );
        if encoding == TextEncoding::Binary {
            warn!("Localized string {} read from a binary pack", id);
        }

        self.maybe_mangle(decode_string(&data, encoding))
    }

    /// Localized bytes for `id`
    ///
    /// Searches the primary then the secondary locale pack, skipping empty
    /// entries, and falls back to [`load_data_resource_bytes`]. Overrides
    /// are not consulted.
    ///
    /// [`load_data_resource_bytes`]: ResourceBundle::load_data_resource_bytes
    pub fn load_localized_resource_bytes(&self, id: ResourceId) -> Option<Bytes> {
        {
            let state = self.locale.read();
            let found = [state.primary.as_ref(), state.secondary.as_ref()]
                .into_iter()
                .flatten()
                .filter_map(|pack| pack.get(id))
                .find(|data| !data.is_empty());
            if found.is_some() {
                return found;
            }
        }

        self.load_data_resource_bytes(id)
    }

    fn maybe_mangle(&self, s: String) -> String {
        if self.mangle_localized_strings {
            mangle_localized_string(&s)
        } else {
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bundle::ResourceBundle;
    use crate::pack::{DataPack, TextEncoding};
    use crate::scale::ScaleFactor;
    use crate::test_util::serial;
    use std::collections::BTreeMap;

    fn pack(scale: ScaleFactor, pairs: &[(u16, &str)]) -> DataPack {
        let resources: BTreeMap<u16, Vec<u8>> = pairs
            .iter()
            .map(|(id, s)| (*id, s.as_bytes().to_vec()))
            .collect();
        DataPack::from_entries(scale, TextEncoding::Utf8, &resources).unwrap()
    }

    #[test]
    fn test_exact_scale_before_generic() {
        let _serial = serial();
        let mut bundle = ResourceBundle::builder().build();
        bundle.add_data_pack(pack(ScaleFactor::P100, &[(1, "lo")]));
        bundle.add_data_pack(pack(ScaleFactor::P200, &[(1, "hi")]));

        let raw = |sf| bundle.get_raw_data_resource_for_scale(1, sf);
        assert_eq!(raw(ScaleFactor::P200).as_deref(), Some(&b"hi"[..]));
        assert_eq!(raw(ScaleFactor::P100).as_deref(), Some(&b"lo"[..]));
        assert_eq!(raw(ScaleFactor::None).as_deref(), Some(&b"lo"[..]));
        assert_eq!(raw(ScaleFactor::P300).as_deref(), Some(&b"lo"[..]));
    }

    #[test]
    fn test_non_generic_tier_only_by_exact_match() {
        let _serial = serial();
        let mut bundle = ResourceBundle::builder().build();
        bundle.add_data_pack(pack(ScaleFactor::P150, &[(4, "mid")]));

        assert!(bundle.get_raw_data_resource(4).is_none());
        assert_eq!(
            bundle
                .get_raw_data_resource_for_scale(4, ScaleFactor::P150)
                .as_deref(),
            Some(&b"mid"[..])
        );
        assert_eq!(bundle.max_scale_factor(), ScaleFactor::P150);
    }

    #[test]
    fn test_load_bytes_skips_empty() {
        let _serial = serial();
        let mut bundle = ResourceBundle::builder().build();
        bundle.add_data_pack(pack(ScaleFactor::P100, &[(1, ""), (2, "x")]));

        assert_eq!(bundle.get_raw_data_resource(1).as_deref(), Some(&b""[..]));
        assert!(bundle.load_data_resource_bytes(1).is_none());
        assert_eq!(bundle.load_data_resource_bytes(2).as_deref(), Some(&b"x"[..]));
    }

    #[test]
    fn test_string_without_locale_is_empty() {
        let _serial = serial();
        let bundle = ResourceBundle::builder().build();
        assert_eq!(bundle.get_localized_string(1), "");
    }

    #[test]
    fn test_override_needs_no_locale_pack() {
        let _serial = serial();
        let bundle = ResourceBundle::builder().build();
        bundle.override_locale_string_resource(9, "forced");
        assert_eq!(bundle.get_localized_string(9), "forced");
    }
}
