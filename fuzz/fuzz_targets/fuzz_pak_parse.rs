#![no_main]
use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use resbundle::{DataPack, ScaleFactor};

#[derive(Arbitrary, Debug)]
struct Input {
    data: Vec<u8>,
    lookups: Vec<u16>,
}

// Parsing arbitrary bytes must fail cleanly, and any pack that does parse
// must only hand out in-bounds slices
fuzz_target!(|input: Input| {
    let pack = match DataPack::load_from_buffer(Bytes::from(input.data), ScaleFactor::None) {
        Ok(p) => p,
        Err(_) => return,
    };

    for id in pack.resource_ids() {
        assert!(pack.get(id).is_some());
    }
    for id in input.lookups {
        let _ = pack.get(id);
    }
});
