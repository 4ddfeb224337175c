#![no_main]
use libfuzzer_sys::fuzz_target;
use resbundle::png::PNG_SIGNATURE;
use resbundle::png_contains_fallback_marker;

fuzz_target!(|data: &[u8]| {
    let _ = png_contains_fallback_marker(data);

    // Also exercise the chunk walk with a valid signature in front
    let mut png = PNG_SIGNATURE.to_vec();
    png.extend_from_slice(data);
    let _ = png_contains_fallback_marker(&png);
});
