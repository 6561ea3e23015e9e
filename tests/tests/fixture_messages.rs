use hl7_ast::{Composite, CompositeKind, Data};
use hl7_parser::{decode, decode_with, Decoder, DecoderConfig, UnknownEscapePolicy};
use pretty_assertions::assert_eq;
use std::sync::Once;
use tests::{all_fixtures, fixture, fixture_path};

static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Debug)
            .try_init();
    });
}

fn node(kind: CompositeKind, children: Vec<Data>) -> Data {
    Composite::new(kind, children).unwrap().into()
}

fn t(s: &str) -> Data {
    Data::text(s)
}

#[test]
fn test_simple_fixture_tree() {
    init_logger();
    let msg = decode(&fixture("simple.hl7").unwrap()).unwrap();
    let pair = |kind, a: &str, b: &str| node(kind, vec![t(a), t(b)]);

    let expected = node(
        CompositeKind::Segment,
        vec![
            t("MSH"),
            t("^~\\&"),
            t("field"),
            t("\\|~^&HEY"),
            pair(CompositeKind::Component, "component1", "component2"),
            node(
                CompositeKind::Component,
                vec![
                    pair(CompositeKind::SubComponent, "1a", "2a"),
                    pair(CompositeKind::SubComponent, "1b", "2b"),
                ],
            ),
            node(
                CompositeKind::Repeated,
                vec![
                    pair(CompositeKind::Component, "1a", "2a"),
                    pair(CompositeKind::Component, "1b", "2b"),
                ],
            ),
        ],
    );
    assert_eq!(msg.segments(), &[expected]);
}

#[test]
fn test_every_fixture_decodes() {
    init_logger();
    let paths = all_fixtures().unwrap();
    assert!(paths.len() >= 3, "fixtures missing: {paths:?}");
    for path in paths {
        let msg = Decoder::from_path(&path)
            .unwrap()
            .decode()
            .unwrap_or_else(|e| panic!("{} failed: {e}", path.display()));
        assert!(!msg.is_empty(), "{}", path.display());
        assert_eq!(msg.segments()[0].segment_id(), Some(&b"MSH"[..]));
    }
}

#[test]
fn test_adt_a01_fields() {
    let msg = decode(&fixture("adt_a01.hl7").unwrap()).unwrap();
    let ids: Vec<&str> = msg
        .iter()
        .filter_map(|s| s.segment_id())
        .map(|id| std::str::from_utf8(id).unwrap())
        .collect();
    assert_eq!(ids, ["MSH", "EVN", "PID", "NK1", "PV1", "AL1", "AL1"]);

    let msh = msg.segment("MSH").unwrap();
    assert_eq!(msh.children().len(), 14);
    assert_eq!(msh.child(4).and_then(Data::as_str), Some("GHH LAB, INC."));
    assert_eq!(
        msh.child(8).unwrap(),
        &node(CompositeKind::Component, vec![t("ADT"), t("A01"), t("ADT_A01")])
    );
    assert_eq!(msh.child(13), Some(&Data::absent()));

    let pid = msg.segment("PID").unwrap();
    let identifiers = pid.child(3).unwrap();
    assert_eq!(identifiers.kind(), Some(CompositeKind::Component));
    assert_eq!(identifiers.children().len(), 10);
    assert_eq!(identifiers.child(1), Some(&Data::absent()));
    assert_eq!(identifiers.child(4).and_then(Data::as_str), Some("MR"));
    assert_eq!(pid.child(5).unwrap().children().len(), 4);

    let allergies: Vec<&Data> = msg.segments_named("AL1").collect();
    assert_eq!(
        allergies[0].child(3).unwrap(),
        &node(CompositeKind::Component, vec![Data::absent(), t("PENICILLIN")])
    );
    assert_eq!(
        allergies[0].child(5).unwrap(),
        &node(CompositeKind::Repeated, vec![t("PRODUCES HIVES"), t("RASH")])
    );
    assert_eq!(allergies[1].child(4), Some(&Data::null()));
}

#[test]
fn test_oru_r01_with_crlf_terminators() {
    let bytes = fixture("oru_r01.hl7").unwrap();
    let msg = decode(&bytes).unwrap();
    assert_eq!(msg.len(), 6);
    assert_eq!(msg.segments_named("OBX").count(), 2);

    let obx = msg.segment("OBX").unwrap();
    assert_eq!(
        obx.child(5).unwrap(),
        &node(CompositeKind::Component, vec![Data::absent(), t("182")])
    );

    let nte = msg.segment("NTE").unwrap();
    assert_eq!(
        nte.child(3).and_then(Data::as_str),
        Some("Fasting sample.brCollected 07&30")
    );

    let config = DecoderConfig::new().with_unknown_escape(UnknownEscapePolicy::Preserve);
    let msg = decode_with(&bytes, &config).unwrap();
    assert_eq!(
        msg.segment("NTE").unwrap().child(3).and_then(Data::as_str),
        Some("Fasting sample\\.br\\Collected 07&30")
    );
}

#[test]
fn test_reader_and_buffer_agree_on_fixtures() {
    for name in ["simple.hl7", "adt_a01.hl7", "oru_r01.hl7"] {
        let from_file = Decoder::from_path(fixture_path(name))
            .unwrap()
            .decode()
            .unwrap();
        let from_bytes = decode(&fixture(name).unwrap()).unwrap();
        assert_eq!(from_file, from_bytes, "{name}");
    }
}
