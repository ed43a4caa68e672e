//! Segment decoder fuzz target: feed arbitrary bytes to every decoder.
//! Decoders must not panic; anything they accept must re-encode and decode to the same value.
//! Build with: cargo fuzz run epath_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    use cip_epath::{AppPath, PathCodec, PortSegmentGroup, SimpleDataSegment};

    if let Ok((path, _)) = AppPath::decode(data, None) {
        let bytes = path.to_bytes();
        if let Ok((again, consumed)) = AppPath::decode(&bytes, None) {
            assert_eq!(consumed, bytes.len());
            assert_eq!(again, path);
        }
    }
    let _ = PathCodec::default().decode_chain(data);
    let _ = PortSegmentGroup::decode(data);
    let _ = SimpleDataSegment::decode(data);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run epath_fuzz");
}
