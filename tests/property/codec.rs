//! Properties of composing and parsing tagged file names.

use phototag::codec::{compose, parse, tags_of};
use proptest::prelude::*;

fn base() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ -]{1,12}(\\.[a-z0-9]{1,4})?"
}

fn extension() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z0-9]{1,5}")
}

fn tag() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}".prop_map(|body| format!("@{}", body))
}

proptest! {
    #[test]
    fn untagged_names_round_trip(base in base(), ext in extension()) {
        let none: [&str; 0] = [];
        let name = compose(&base, &none, ext.as_deref());
        let parsed = parse(&name).unwrap();

        // A dotted base without an extension reads back with the dot as extension.
        if ext.is_none() && base.contains('.') {
            prop_assert_eq!(parsed.compose(), name);
        } else {
            prop_assert_eq!(parsed.base, base);
            prop_assert!(parsed.tags.is_empty());
            prop_assert_eq!(parsed.extension, ext);
        }
    }

    #[test]
    fn tagged_names_round_trip(
        base in "[a-zA-Z0-9_ -]{1,12}",
        tags in proptest::collection::vec(tag(), 0..5),
        ext in extension(),
    ) {
        let name = compose(&base, &tags, ext.as_deref());
        let parsed = parse(&name).unwrap();
        prop_assert_eq!(&parsed.base, &base);
        prop_assert_eq!(&parsed.tags, &tags);
        prop_assert_eq!(&parsed.extension, &ext);
        prop_assert_eq!(tags_of(&name).unwrap(), tags);
        prop_assert_eq!(parsed.compose(), name);
    }
}
