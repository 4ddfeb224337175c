//! Basic resbundle usage
//!
//! Demonstrates:
//! - Writing scale and locale packs
//! - Scale-aware image lookups with fallback
//! - Localized strings, overrides and a runtime locale switch
//!
//! Run with: cargo run --example basic

use resbundle::{
    BundleConfig, DataPack, LoadResources, ResourceBundle, ResourceId, ScaleFactor, TextEncoding,
};
use std::collections::BTreeMap;
use std::fs;

const IDS_GREETING: ResourceId = 100;
const IDR_ICON: ResourceId = 2000;
const IDR_LOGO: ResourceId = 2001;

fn pack(
    scale: ScaleFactor,
    encoding: TextEncoding,
    pairs: &[(ResourceId, &[u8])],
) -> resbundle::Result<DataPack> {
    let resources: BTreeMap<ResourceId, Vec<u8>> =
        pairs.iter().map(|(id, data)| (*id, data.to_vec())).collect();
    DataPack::from_entries(scale, encoding, &resources)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== resbundle Basic Usage ===\n");

    let dir = tempfile::tempdir()?;
    let locales = dir.path().join("locales");
    fs::create_dir_all(&locales)?;

    // Locale packs live on disk as <locale>.pak
    println!("1. Writing locale packs...");
    let de = pack(ScaleFactor::P100, TextEncoding::Utf8, &[(IDS_GREETING, "Hallo".as_bytes())])?;
    let fr = pack(ScaleFactor::P100, TextEncoding::Utf8, &[(IDS_GREETING, "Bonjour".as_bytes())])?;
    fs::write(locales.join("de.pak"), de.as_bytes())?;
    fs::write(locales.join("fr.pak"), fr.as_bytes())?;
    println!("   ✓ Wrote de.pak and fr.pak to {}", locales.display());
    println!();

    println!("2. Initializing bundle with locale 'de'...");
    let config = BundleConfig {
        locales_dir: Some(locales),
        ..BundleConfig::default()
    };
    let (mut bundle, locale) = ResourceBundle::builder()
        .config(config)
        .locale_resolver(|preferred: &str| preferred.to_string())
        .init_with_locale("de", LoadResources::DoNotLoadCommonResources);
    println!("   ✓ Loaded locale: {}", locale);
    println!();

    // The logo only ships at 100%, so a 200% lookup falls back to it
    println!("3. Adding image packs at 100% and 200%...");
    bundle.add_data_pack(pack(
        ScaleFactor::P100,
        TextEncoding::Binary,
        &[(IDR_ICON, &b"icon@1x"[..]), (IDR_LOGO, &b"logo@1x"[..])],
    )?);
    bundle.add_data_pack(pack(
        ScaleFactor::P200,
        TextEncoding::Binary,
        &[(IDR_ICON, &b"icon@2x"[..])],
    )?);
    println!("   Max scale factor: {}", bundle.max_scale_factor());
    println!();

    println!("4. Looking up images at 200%...");
    for id in [IDR_ICON, IDR_LOGO] {
        if let Some(data) = bundle.get_raw_data_resource_for_scale(id, ScaleFactor::P200) {
            println!("   {} -> {}", id, String::from_utf8_lossy(&data));
        }
    }
    println!();

    println!("5. Localized strings...");
    println!("   Greeting: {}", bundle.get_localized_string(IDS_GREETING));
    bundle.override_locale_string_resource(IDS_GREETING, "Servus");
    println!("   Overridden: {}", bundle.get_localized_string(IDS_GREETING));
    println!();

    // Reload drops the override along with the old packs
    println!("6. Switching to 'fr'...");
    let locale = bundle.reload_locale_resources("fr");
    println!("   ✓ Loaded locale: {}", locale);
    println!("   Greeting: {}", bundle.get_localized_string(IDS_GREETING));
    println!();

    println!("=== Example Complete ===");
    Ok(())
}
