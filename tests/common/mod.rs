//! Shared helpers for integration tests

#![allow(dead_code)]

use parking_lot::{const_mutex, Mutex, MutexGuard};
use resbundle::{ResourceId, TextEncoding};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

static SERIAL: Mutex<()> = const_mutex(());

/// Hold for the whole test when it builds a bundle or touches the scale registry
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock()
}

/// Encode a v5 pak; `resources` must be sorted by id
///
/// Each alias maps an id to the index of a stored resource.
pub fn encode_pak_v5(
    encoding: TextEncoding,
    resources: &[(ResourceId, &[u8])],
    aliases: &[(ResourceId, u16)],
) -> Vec<u8> {
    let header_len = 12 + (resources.len() + 1) * 6 + aliases.len() * 4;
    let mut out = Vec::new();
    out.extend_from_slice(&5u32.to_le_bytes());
    out.push(encoding as u8);
    out.extend_from_slice(&[0u8; 3]);
    out.extend_from_slice(&(resources.len() as u16).to_le_bytes());
    out.extend_from_slice(&(aliases.len() as u16).to_le_bytes());

    let mut offset = header_len;
    for (id, data) in resources {
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += data.len();
    }
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(offset as u32).to_le_bytes());

    for (id, index) in aliases {
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&index.to_le_bytes());
    }
    for (_, data) in resources {
        out.extend_from_slice(data);
    }
    out
}

/// Encode a v4 pak; `resources` must be sorted by id
pub fn encode_pak_v4(encoding: TextEncoding, resources: &[(ResourceId, &[u8])]) -> Vec<u8> {
    let header_len = 9 + (resources.len() + 1) * 6;
    let mut out = Vec::new();
    out.extend_from_slice(&4u32.to_le_bytes());
    out.extend_from_slice(&(resources.len() as u32).to_le_bytes());
    out.push(encoding as u8);

    let mut offset = header_len;
    for (id, data) in resources {
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += data.len();
    }
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(offset as u32).to_le_bytes());

    for (_, data) in resources {
        out.extend_from_slice(data);
    }
    out
}

/// UTF-8 string pak
pub fn utf8_pak(strings: &[(ResourceId, &str)]) -> Vec<u8> {
    let resources: Vec<(ResourceId, &[u8])> =
        strings.iter().map(|(id, s)| (*id, s.as_bytes())).collect();
    encode_pak_v5(TextEncoding::Utf8, &resources, &[])
}

/// UTF-16LE string pak
pub fn utf16_pak(strings: &[(ResourceId, &str)]) -> Vec<u8> {
    let encoded: Vec<(ResourceId, Vec<u8>)> = strings
        .iter()
        .map(|(id, s)| (*id, s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()))
        .collect();
    let resources: Vec<(ResourceId, &[u8])> = encoded
        .iter()
        .map(|(id, data)| (*id, data.as_slice()))
        .collect();
    encode_pak_v5(TextEncoding::Utf16, &resources, &[])
}

/// Write `bytes` to `dir/name` and return the absolute path
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Temporary directory laid out as `<root>/locales/<locale>.pak` plus
/// common packs directly under `<root>`
pub struct PakDir {
    pub root: TempDir,
}

impl PakDir {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("locales")).unwrap();
        PakDir { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn locales(&self) -> PathBuf {
        self.root.path().join("locales")
    }

    pub fn add_locale(&self, locale: &str, bytes: &[u8]) -> PathBuf {
        write_file(&self.locales(), &format!("{}.pak", locale), bytes)
    }

    pub fn add_common(&self, name: &str, bytes: &[u8]) -> PathBuf {
        write_file(self.path(), name, bytes)
    }

    /// Config pointing both directories into this layout
    pub fn config(&self) -> resbundle::BundleConfig {
        resbundle::BundleConfig {
            resources_dir: Some(self.path().to_path_buf()),
            locales_dir: Some(self.locales()),
            ..resbundle::BundleConfig::default()
        }
    }
}
