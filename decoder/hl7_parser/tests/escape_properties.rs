use hl7_parser::{decode, unescape, Data, Delimiters, UnknownEscapePolicy};
use proptest::prelude::*;

fn escape_text(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for &b in text {
        match b {
            b'\\' => out.extend_from_slice(br"\E\"),
            b'|' => out.extend_from_slice(br"\F\"),
            b'^' => out.extend_from_slice(br"\S\"),
            b'~' => out.extend_from_slice(br"\R\"),
            b'&' => out.extend_from_slice(br"\T\"),
            _ => out.push(b),
        }
    }
    out
}

fn field_text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        any::<u8>().prop_filter("segment terminator", |b| *b != b'\r' && *b != b'\n'),
        1..64,
    )
}

proptest! {
    #[test]
    fn escaped_delimiters_decode_to_original_text(text in field_text()) {
        prop_assume!(text != b"\"\"");
        let mut input = b"MSH|^~\\&\rNTE|".to_vec();
        input.extend_from_slice(&escape_text(&text));

        let msg = decode(&input).unwrap();
        let nte = &msg.segments()[1];
        prop_assert_eq!(nte.children().len(), 2);
        prop_assert_eq!(nte.child(1).and_then(Data::as_bytes), Some(&text[..]));
    }

    #[test]
    fn text_without_escape_byte_is_unchanged(text in field_text()) {
        prop_assume!(!text.contains(&b'\\'));
        let out = unescape(&text, &Delimiters::default(), UnknownEscapePolicy::Strip);
        prop_assert_eq!(&*out, &text[..]);
    }
}
