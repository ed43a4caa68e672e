//! Benchmark: decode and encode of typical application paths and a multi-path chain.

use cip_epath::{AppPath, PathCodec, PortSegmentGroup};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const LOGICAL: [u8; 6] = [0x20, 0x02, 0x24, 0x01, 0x30, 0x07];
const SYMBOLIC: [u8; 16] = [
    0x91, 0x0B, b'P', b'r', b'o', b'g', b'r', b'a', b'm', b'.', b'T', b'a', b'g', 0x00, 0x28, 0x03,
];
const CHAIN: [u8; 10] = [0x20, 0x04, 0x24, 0x64, 0x2C, 0x96, 0x2C, 0x97, 0x30, 0x03];
const ROUTE: [u8; 14] = [
    0x01, 0x00, 0x34, 0x04, 0x01, 0x00, 0x0C, 0x00, 0x41, 0x00, 0x03, 0x02, 0x43, 0x0A,
];

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_logical", |b| {
        b.iter(|| AppPath::decode(black_box(&LOGICAL), None))
    });
    c.bench_function("decode_symbolic", |b| {
        b.iter(|| AppPath::decode(black_box(&SYMBOLIC), None))
    });
    let codec = PathCodec::default();
    c.bench_function("decode_chain", |b| b.iter(|| codec.decode_chain(black_box(&CHAIN))));
    c.bench_function("decode_port_group", |b| {
        b.iter(|| PortSegmentGroup::decode(black_box(&ROUTE)))
    });
}

fn bench_encode(c: &mut Criterion) {
    let logical = AppPath::decode(&LOGICAL, None).map(|(p, _)| p).unwrap_or_default();
    let symbolic = AppPath::decode(&SYMBOLIC, None).map(|(p, _)| p).unwrap_or_default();
    let mut out = [0u8; 64];
    c.bench_function("encode_logical", |b| {
        b.iter(|| black_box(&logical).encode(&mut out))
    });
    c.bench_function("encode_symbolic", |b| {
        b.iter(|| black_box(&symbolic).encode(&mut out))
    });
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
