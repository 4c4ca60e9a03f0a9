use core::fmt;

use super::{DOM, DOMNode, NodeKind};
use indextree::NodeId;

use serde_json::{Map, Value, json};

// -----------------------
// Module-scope helpers
// -----------------------

fn flush_text(children: &mut Vec<Value>, text_buf: &mut String) {
    if !text_buf.trim().is_empty() {
        children.push(json!({ "type": "text", "text": text_buf.clone() }));
    }
    text_buf.clear();
}

fn coalesce_children(dom: &DOM, id: NodeId) -> Vec<Value> {
    let mut children: Vec<Value> = Vec::new();
    let mut text_buf = String::new();
    for child in id.children(&dom.dom) {
        let Some(node) = dom.node(child) else {
            continue;
        };
        if let NodeKind::Text { text } = &node.kind {
            text_buf.push_str(text);
            continue;
        }
        flush_text(&mut children, &mut text_buf);
        children.push(node_to_json(dom, child, node));
    }
    flush_text(&mut children, &mut text_buf);
    children
}

fn sorted_attrs(node: &DOMNode) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = node
        .attrs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    pairs.sort_unstable_by_key(|&(name, _)| name);
    pairs
}

fn node_to_json(dom: &DOM, id: NodeId, node: &DOMNode) -> Value {
    match &node.kind {
        NodeKind::Document => json!({ "type": "document", "children": coalesce_children(dom, id) }),
        NodeKind::Element { tag } => {
            let mut attrs_obj = Map::new();
            for (name, value) in sorted_attrs(node) {
                attrs_obj.insert(name.to_owned(), Value::String(value.to_owned()));
            }
            let mut element = json!({
                "type": "element",
                "tag": tag.to_lowercase(),
                "attrs": Value::Object(attrs_obj),
                "children": coalesce_children(dom, id),
            });
            if let (Some(value), Some(object)) = (&node.value, element.as_object_mut()) {
                object.insert("value".to_owned(), Value::String(value.clone()));
            }
            element
        }
        NodeKind::Text { text } => json!({ "type": "text", "text": text }),
    }
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_indent(out: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str("  ")?;
    }
    Ok(())
}

fn fmt_node(dom: &DOM, id: NodeId, out: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let Some(node) = dom.node(id) else {
        return Ok(());
    };
    match &node.kind {
        NodeKind::Document => {
            write_indent(out, depth)?;
            writeln!(out, "#document")?;
        }
        NodeKind::Element { tag } => {
            write_indent(out, depth)?;
            write!(out, "<{}", tag.to_lowercase())?;
            for (name, value) in sorted_attrs(node) {
                write!(out, " {}=\"{}\"", name, escape_text(value))?;
            }
            if let Some(value) = &node.value {
                write!(out, " .value=\"{}\"", escape_text(value))?;
            }
            writeln!(out, ">")?;
        }
        NodeKind::Text { text } => {
            // Whitespace-only text is noise in the printed tree
            if text.chars().all(char::is_whitespace) {
                return Ok(());
            }
            write_indent(out, depth)?;
            return writeln!(out, "\"{}\"", escape_text(text));
        }
    }
    for child in id.children(&dom.dom) {
        fmt_node(dom, child, out, depth + 1)?;
    }
    if let NodeKind::Element { tag } = &node.kind {
        write_indent(out, depth)?;
        writeln!(out, "</{}>", tag.to_lowercase())?;
    }
    Ok(())
}

impl fmt::Debug for DOM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DOM")?;
        fmt_node(self, self.root, f, 0)
    }
}

impl DOM {
    /// Build a deterministic JSON representation of the DOM.
    /// Schema:
    /// - Document: { "type":"document", "children":[ ... ] }
    /// - Element: { "type":"element", "tag": "li", "attrs": {..}, "children":[ ... ] }
    ///   plus `"value"` once the live value has been written
    /// - Text: { "type":"text", "text":"..." }
    pub fn to_json_value(&self) -> Value {
        self.node(self.root)
            .map_or(Value::Null, |node| node_to_json(self, self.root, node))
    }

    /// Pretty JSON string for snapshots and test comparisons.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_dom() -> (DOM, NodeId) {
        let mut dom = DOM::new();
        let root = dom.root();
        let item = dom.append_element(root, "LI", []);
        let anchor = dom.append_element(
            item,
            "a",
            [
                ("data-href".to_owned(), "q?&".to_owned()),
                ("class".to_owned(), "go".to_owned()),
            ],
        );
        dom.append_text(anchor, "Go ");
        dom.append_text(anchor, "now");
        dom.append_text(item, "   ");
        let input = dom.append_element(item, "input", []);
        (dom, input)
    }

    #[test]
    fn json_snapshot_is_sorted_and_coalesced() {
        let (dom, _) = list_dom();
        let json = dom.to_json_value();
        let item = &json["children"][0];
        assert_eq!(item["tag"], "li");
        assert_eq!(item["children"].as_array().map(Vec::len), Some(2));
        let anchor = &item["children"][0];
        let keys: Vec<&String> = anchor["attrs"]
            .as_object()
            .map(|attrs| attrs.keys().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["class", "data-href"]);
        assert_eq!(anchor["children"][0]["text"], "Go now");
        assert!(item["children"][1].get("value").is_none());
    }

    #[test]
    fn json_snapshot_includes_written_values() {
        let (mut dom, input) = list_dom();
        if let Some(node) = dom.element_mut(input) {
            node.value = Some("typed".to_owned());
        }
        assert_eq!(dom.to_json_value()["children"][0]["children"][1]["value"], "typed");
        assert!(dom.to_json_string().contains("\"value\": \"typed\""));
    }

    #[test]
    fn debug_prints_indented_tree() {
        let (dom, _) = list_dom();
        let printed = format!("{dom:?}");
        assert!(printed.starts_with("DOM\n#document\n  <li>\n"));
        assert!(printed.contains("    <a class=\"go\" data-href=\"q?&\">\n"));
        assert!(printed.contains("      \"Go \"\n"));
        assert!(printed.contains("    <input>\n    </input>\n"));
    }
}
