// Structural properties of the parser: losslessness over arbitrary mixes of
// literal text and well-formed references, and identity resolution for
// strings with no reference at all.

use jobspec_interpolation as interp;
use interp::context::Context;
use interp::template::{parse_template, Segment};
use interp::NodeIdentity;
use proptest::prelude::*;
use std::collections::HashMap;

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_-]{0,7}"
}

fn path_reference() -> impl Strategy<Value = String> {
    prop::collection::vec(identifier(), 1..4).prop_map(|segs| format!("${{{}}}", segs.join(".")))
}

fn index_reference() -> impl Strategy<Value = String> {
    // Opaque keys: dots, spaces, anything but the quote itself.
    "[A-Za-z0-9. _-]{1,12}".prop_map(|key| format!("${{env[\"{key}\"]}}"))
}

fn literal_chunk() -> impl Strategy<Value = String> {
    // No `$` or braces, so chunks cannot combine into a reference opener.
    "[A-Za-z0-9 :/_.,-]{0,10}"
}

fn template() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => literal_chunk(),
            2 => path_reference(),
            1 => index_reference(),
        ],
        0..8,
    )
    .prop_map(|pieces| pieces.concat())
}

fn reassemble(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|seg| match seg {
            Segment::Literal(text) => text.as_str(),
            Segment::Reference(r) => r.raw(),
        })
        .collect()
}

proptest! {
    #[test]
    fn parse_is_lossless(input in template()) {
        let segments = parse_template(&input).unwrap();
        prop_assert_eq!(reassemble(&segments), input);
    }

    #[test]
    fn strings_without_references_resolve_to_themselves(
        input in "[ -~]{0,40}".prop_filter("no reference opener", |s| !s.contains("${"))
    ) {
        let ctx = Context::runtime(
            NodeIdentity::default(),
            HashMap::new(),
            HashMap::new(),
            HashMap::new(),
        );
        prop_assert_eq!(interp::resolve(&input, &ctx).unwrap(), input);
    }

    #[test]
    fn parser_never_panics(input in "[ -~]{0,60}") {
        let _ = parse_template(&input);
    }
}
