//! Tree Example - element construction and a single static render.
//!
//! This example demonstrates the element model:
//! - Host elements with attributes
//! - Fragments rendering children without a wrapper node
//! - Primitive children wrapped as text
//! - Unknown tag names falling back to the generic container
//!
//! Run with: cargo run --example tree

use wisp_ui::{el, el_named, render, HostNode, HostTag, Props, VNode};

fn main() -> Result<(), wisp_ui::Error> {
    let container = HostNode::create(HostTag::Div);

    let tree = el(
        HostTag::Div,
        Props::new().attr("id", "app").attr("style", "padding: 8px;"),
        vec![
            el(HostTag::H1, Props::new(), vec!["wisp-ui".into()]).into(),
            VNode::fragment(vec![
                el(HostTag::P, Props::new(), vec!["first".into()]).into(),
                el(HostTag::P, Props::new(), vec!["second".into()]).into(),
                el(HostTag::P, Props::new(), vec![42i64.into()]).into(),
            ])
            .into(),
            el_named(
                "artikle",
                Props::new(),
                vec!["unknown tags fall back to <div>".into()],
            )
            .into(),
        ],
    );

    render(&tree, &container)?;
    print!("{}", container.to_pretty());
    Ok(())
}
