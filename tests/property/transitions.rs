//! Properties of tag operations on a single image.

use chrono::Utc;
use phototag::image::{Image, ImageId};
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Delete(String),
    RevertTo(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let tag = "[a-d]".prop_map(|t| format!("@{}", t));
    prop_oneof![
        tag.clone().prop_map(Op::Add),
        tag.prop_map(Op::Delete),
        (0usize..8).prop_map(Op::RevertTo),
    ]
}

fn image(name: &str) -> Image {
    Image::discovered(ImageId(1), PathBuf::new(), name, Utc::now()).unwrap()
}

proptest! {
    #[test]
    fn history_never_shrinks(ops in proptest::collection::vec(op(), 0..30)) {
        let mut image = image("photo.jpg");
        let mut seen: HashSet<String> = image.history().names().into_iter().collect();

        for op in ops {
            let planned = match &op {
                Op::Add(tag) => image.plan_add_tag(tag),
                Op::Delete(tag) => image.plan_delete_tag(tag),
                Op::RevertTo(i) => {
                    let names = image.history().names();
                    image.plan_revert(&names[i % names.len()])
                }
            };
            if let Ok(change) = planned {
                image.apply(change, Utc::now());
            }

            let now: HashSet<String> = image.history().names().into_iter().collect();
            prop_assert!(seen.is_subset(&now));
            prop_assert!(now.contains(image.name()));
            prop_assert_eq!(image.tags().to_vec(), phototag::codec::tags_of(image.name()).unwrap());
            seen = now;
        }
    }

    #[test]
    fn add_then_delete_restores_name(
        existing in proptest::collection::vec("[a-c]".prop_map(|t| format!("@{}", t)), 0..3),
        tag in "[a-e]".prop_map(|t| format!("@{}", t)),
    ) {
        let name = phototag::codec::compose("pic", &existing, Some("png"));
        let mut image = image(&name);
        prop_assume!(!image.has_tag(&tag));

        let change = image.plan_add_tag(&tag).unwrap();
        image.apply(change, Utc::now());
        let change = image.plan_delete_tag(&tag).unwrap();
        image.apply(change, Utc::now());

        prop_assert_eq!(image.name(), name.as_str());
        prop_assert_eq!(image.tags().to_vec(), existing);
    }
}
