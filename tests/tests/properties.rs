use std::thread;

use hl7_ast::{CompositeKind, Data, Message};
use hl7_parser::{decode, DecodeError};
use proptest::prelude::*;
use tests::{fixture, walk};

fn body_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop::sample::select(vec![
            b'a', b'b', b'1', b' ', b'"', b'|', b'^', b'~', b'&', b'\\', b'\r', b'\n',
        ]),
        0..200,
    )
}

fn check_shape(msg: &Message) -> Result<(), TestCaseError> {
    for segment in msg {
        prop_assert_eq!(segment.kind(), Some(CompositeKind::Segment));
        prop_assert!(segment.children().first().is_some_and(Data::is_leaf));
    }
    let mut violation = None;
    walk(msg, |node, depth| {
        if let Some(kind) = node.kind() {
            let nested_segment = depth > 0 && kind == CompositeKind::Segment;
            if node.children().len() < kind.min_children() || nested_segment {
                violation.get_or_insert_with(|| node.to_string());
            }
            if kind != CompositeKind::Segment && node.children().len() < 2 {
                violation.get_or_insert_with(|| node.to_string());
            }
        }
    });
    prop_assert!(violation.is_none(), "bad composite: {:?}", violation);
    Ok(())
}

proptest! {
    #[test]
    fn decoded_trees_keep_their_shape(body in body_bytes()) {
        let mut input = b"MSH|^~\\&|".to_vec();
        input.extend_from_slice(&body);
        match decode(&input) {
            Ok(msg) => check_shape(&msg)?,
            Err(DecodeError::Segment { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn arbitrary_input_never_panics(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&input);
    }

    #[test]
    fn decoding_is_deterministic(body in body_bytes()) {
        let mut input = b"MSH|^~\\&|".to_vec();
        input.extend_from_slice(&body);
        let first = decode(&input).map_err(|e| e.to_string());
        let second = decode(&input).map_err(|e| e.to_string());
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_concurrent_decodes_agree() {
    let input = fixture("adt_a01.hl7").unwrap();
    let expected = decode(&input).unwrap();

    let results: Vec<Message> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| decode(&input)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });
    for msg in results {
        assert_eq!(msg, expected);
    }
}

#[test]
fn test_composite_kinds_nest_in_order() {
    let msg = decode(&fixture("simple.hl7").unwrap()).unwrap();
    fn rank(kind: CompositeKind) -> u8 {
        match kind {
            CompositeKind::Segment => 0,
            CompositeKind::Repeated => 1,
            CompositeKind::Component => 2,
            CompositeKind::SubComponent => 3,
        }
    }
    fn check(node: &Data) {
        if let Some(kind) = node.kind() {
            for child in node.children() {
                if let Some(child_kind) = child.kind() {
                    assert!(rank(child_kind) > rank(kind), "{node}");
                }
                check(child);
            }
        }
    }
    for segment in &msg {
        check(segment);
    }
}
