//! HTML parsing into the arena DOM.
//!
//! html5ever builds an `RcDom`, which is then walked once and copied into a
//! [`DOM`]. Doctypes, comments, processing instructions and whitespace-only
//! text are dropped on the way.

use crate::dom::DOM;
use anyhow::{Context as _, Error};
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use indextree::NodeId;
use log::trace;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse a complete HTML document.
///
/// # Errors
/// Returns an error if html5ever fails to read the input.
pub fn parse_html(html: &str) -> Result<DOM, Error> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    let rc_dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .context("Failed to parse HTML document")?;

    let mut dom = DOM::new();
    let root = dom.root();
    convert_node(&mut dom, &rc_dom.document, root);
    trace!("Parsed HTML document:\n{dom:?}");
    Ok(dom)
}

fn convert_node(dom: &mut DOM, handle: &Handle, parent: NodeId) {
    match &handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(dom, child, parent);
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let attributes: Vec<(String, String)> = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let node = dom.append_element(parent, &name.local, attributes);
            for child in handle.children.borrow().iter() {
                convert_node(dom, child, node);
            }
        }
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if !text.trim().is_empty() {
                dom.append_text(parent, &text);
            }
        }
        NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_items_with_inputs() {
        let parsed = parse_html(
            r#"<!DOCTYPE html><html><body>
                <ul><li id="item"><a data-href="p?&&">go</a><input value="a"> <input></li></ul>
                <!-- note -->
            </body></html>"#,
        );
        assert!(parsed.is_ok(), "parse failed: {:?}", parsed.err());
        if let Ok(dom) = parsed {
            let item = dom.get_element_by_id("item");
            assert!(item.is_some());
            if let Some(item) = item {
                let inputs = dom.get_elements_by_tag_name(item, "input");
                assert_eq!(inputs.len(), 2);
                assert_eq!(dom.value(inputs[0]), "a");
                assert!(inputs.iter().all(|&input| dom.parent(input) == Some(item)));
                let anchors = dom.get_elements_by_tag_name(item, "a");
                assert_eq!(dom.attribute(anchors[0], "data-href"), Some("p?&&"));
            }
            assert!(dom.body().is_some());
        }
    }

    #[test]
    fn fragments_gain_implied_body() {
        let parsed = parse_html("<p>hi</p>");
        assert!(parsed.is_ok());
        if let Ok(dom) = parsed {
            assert!(dom.body().is_some());
            let json = dom.to_json_value();
            assert_eq!(json["children"][0]["tag"], "html");
        }
    }
}
