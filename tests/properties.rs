//! Property tests: encode/decode agreement and decoder robustness on arbitrary input.

use cip_epath::{
    AppPath, EpathFormat, LogicalField, LogicalPath, PathCodec, PortSegmentGroup,
    SimpleDataSegment, Symbol, SymbolicPath, MAX_MEMBERS,
};
use proptest::prelude::*;

fn value() -> impl Strategy<Value = u32> {
    prop_oneof![0u32..0x100, 0x100u32..0x1_0000, any::<u32>()]
}

fn logical_path() -> impl Strategy<Value = AppPath> {
    proptest::collection::vec(proptest::option::of(value()), 4).prop_map(|slots| {
        let mut p = LogicalPath::new();
        for (field, slot) in LogicalField::ALL.into_iter().zip(slots) {
            if let Some(v) = slot {
                p.set(field, v);
            }
        }
        AppPath::Logical(p)
    })
}

fn symbolic_path() -> impl Strategy<Value = AppPath> {
    (
        "[A-Za-z_][A-Za-z0-9_.]{0,40}",
        proptest::option::of(value()),
        proptest::collection::vec(value(), 0..=MAX_MEMBERS),
    )
        .prop_map(|(tag, conn_pt, members)| {
            let mut p = SymbolicPath::new(Symbol::new(&tag).expect("tag fits"));
            p.set_conn_pt(conn_pt);
            for m in members {
                p.push_member(m).expect("member fits");
            }
            AppPath::Symbolic(p)
        })
}

fn is_assembly_instance_and_conn_pt(path: &AppPath) -> bool {
    path.class() == Some(4) && path.instance().is_some() && path.conn_pt().is_some()
        && path.attribute().is_none()
}

proptest! {
    #[test]
    fn logical_round_trip(path in logical_path(), padded in any::<bool>()) {
        // class 4 with instance immediately followed by conn_pt decodes as two paths
        prop_assume!(!is_assembly_instance_and_conn_pt(&path));
        let codec = PathCodec::new(if padded { EpathFormat::Padded } else { EpathFormat::Packed });
        let bytes = codec.app_path_to_bytes(&path);
        let (decoded, consumed) = codec.decode_app_path(&bytes, None).expect("decode");
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(decoded, path);
    }

    #[test]
    fn symbolic_round_trip(path in symbolic_path()) {
        let bytes = path.to_bytes();
        let tag_len = path.symbol().map(Symbol::len).unwrap_or(0);
        let tag_segment = (2 + tag_len + 1) & !1;
        if tag_len % 2 == 1 {
            prop_assert_eq!(bytes[tag_segment - 1], 0);
        }
        let (tail, _) = AppPath::decode(&bytes[..tag_segment], None).expect("tag alone");
        prop_assert_eq!(tail.symbol(), path.symbol());
        let (decoded, consumed) = AppPath::decode(&bytes, None).expect("decode");
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(decoded, path);
    }

    #[test]
    fn text_round_trip(path in prop_oneof![logical_path(), symbolic_path()]) {
        let text = path.to_string();
        let parsed: AppPath = text.parse().expect("parse");
        prop_assert_eq!(parsed, path);
    }

    #[test]
    fn decoders_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        if let Ok((_, consumed)) = AppPath::decode(&bytes, None) {
            prop_assert!(consumed <= bytes.len());
        }
        if let Ok(chain) = PathCodec::default().decode_chain(&bytes) {
            if let Some(last) = chain.last() {
                prop_assert!(last.range.end <= bytes.len());
            }
        }
        if let Ok((_, consumed)) = PortSegmentGroup::decode(&bytes) {
            prop_assert!(consumed <= bytes.len());
        }
        if let Ok((_, consumed)) = SimpleDataSegment::decode(&bytes) {
            prop_assert!(consumed <= bytes.len());
        }
    }

    #[test]
    fn decode_error_offsets_are_in_bounds(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        if let Err(e) = AppPath::decode(&bytes, None) {
            prop_assert!(e.offset().expect("decode errors carry an offset") <= bytes.len());
        }
    }
}
