//! Arena-backed DOM tree with the lookups page scripts rely on.

mod printing;
mod updating;

pub use updating::{DOMMirror, DOMSubscriber, DOMUpdate};

use indextree::{Arena, Node, NodeId};
use smallvec::SmallVec;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel carrying committed update batches.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element { tag: String },
    Text { text: String },
}

#[derive(Debug, Clone, Default)]
pub struct DOMNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
    /// Live form-control value. `None` until written; reads fall back to the
    /// `value` attribute.
    pub value: Option<String>,
}

impl DOMNode {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element { tag: tag.into() },
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text { text: text.into() },
            ..Self::default()
        }
    }

    /// Tag name for element nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Document | NodeKind::Text { .. } => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any previous value in place so attribute
    /// order stays stable.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            value.clone_into(&mut slot.1);
        } else {
            self.attrs.push((name.to_owned(), value.to_owned()));
        }
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|token| token == class))
    }

    /// The value a form control reports right now.
    pub fn current_value(&self) -> &str {
        self.value
            .as_deref()
            .or_else(|| self.attr("value"))
            .unwrap_or_default()
    }
}

pub struct DOM {
    dom: Arena<DOMNode>,
    root: NodeId,
    update_sender: broadcast::Sender<Vec<DOMUpdate>>,
}

impl DOM {
    pub fn new() -> Self {
        let mut dom = Arena::new();
        let (update_sender, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            root: dom.new_node(DOMNode::default()),
            dom,
            update_sender,
        }
    }

    /// The document node.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DOMNode> {
        self.dom
            .get(id)
            .filter(|node| !node.is_removed())
            .map(Node::get)
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut DOMNode> {
        self.dom
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(Node::get_mut)
            .filter(|node| matches!(node.kind, NodeKind::Element { .. }))
    }

    /// Append a new element as the last child of `parent`.
    pub fn append_element<I>(&mut self, parent: NodeId, tag: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut node = DOMNode::element(tag);
        for (name, value) in attrs {
            node.set_attr(&name, &value);
        }
        let id = self.dom.new_node(node);
        parent.append(id, &mut self.dom);
        id
    }

    /// Append a new text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.dom.new_node(DOMNode::text(text));
        parent.append(id, &mut self.dom);
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.dom.get(id)?.parent()
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.tag()
    }

    /// Tag comparison is ASCII case-insensitive, as HTML tag names are.
    pub fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attr(name)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|node| node.has_class(class))
    }

    /// Current form-control value of `id`, empty for unknown nodes.
    pub fn value(&self, id: NodeId) -> &str {
        self.node(id).map_or("", DOMNode::current_value)
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.node(node).is_some()
            && node
                .ancestors(&self.dom)
                .any(|candidate| candidate == ancestor)
    }

    /// Elements below `scope` (exclusive) with the given tag, in document order.
    pub fn get_elements_by_tag_name(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&id| self.has_tag(id, tag))
            .collect()
    }

    /// Elements below `scope` (exclusive) carrying the class token, in document order.
    pub fn get_elements_by_class_name(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// First element in the document whose `id` attribute matches (case-sensitive).
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|&id| self.attribute(id, "id") == Some(element_id))
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|&id| self.has_tag(id, "body"))
    }

    fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        scope
            .descendants(&self.dom)
            .skip(1)
            .filter(|&id| self.node(id).is_some())
    }
}

impl Default for DOM {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build `<body><ul><li><a/><input/><input/></li></ul><p class="x y"/></body>`.
    fn sample() -> (DOM, Vec<NodeId>) {
        let mut dom = DOM::new();
        let root = dom.root();
        let body = dom.append_element(root, "body", []);
        let list = dom.append_element(body, "ul", []);
        let item = dom.append_element(list, "LI", []);
        let anchor = dom.append_element(item, "a", [("data-href".into(), "p?&".into())]);
        let first = dom.append_element(item, "input", [("value".into(), "one".into())]);
        let second = dom.append_element(item, "input", []);
        let para = dom.append_element(body, "p", [("class".into(), " x  y ".into())]);
        (dom, vec![body, list, item, anchor, first, second, para])
    }

    #[test]
    fn tag_lookup_is_case_insensitive_and_ordered() {
        let (dom, ids) = sample();
        assert!(dom.has_tag(ids[2], "li"));
        assert_eq!(
            dom.get_elements_by_tag_name(ids[2], "INPUT"),
            vec![ids[4], ids[5]]
        );
        assert_eq!(dom.get_elements_by_tag_name(ids[3], "a"), Vec::new());
        assert_eq!(dom.body(), Some(ids[0]));
    }

    #[test]
    fn class_tokens_match_exactly() {
        let (dom, ids) = sample();
        assert!(dom.has_class(ids[6], "x"));
        assert!(dom.has_class(ids[6], "y"));
        assert!(!dom.has_class(ids[6], "X"));
        assert!(!dom.has_class(ids[6], "x y"));
        assert_eq!(dom.get_elements_by_class_name(dom.root(), "y"), vec![ids[6]]);
    }

    #[test]
    fn value_falls_back_to_attribute_then_empty() {
        let (mut dom, ids) = sample();
        assert_eq!(dom.value(ids[4]), "one");
        assert_eq!(dom.value(ids[5]), "");
        if let Some(node) = dom.element_mut(ids[4]) {
            node.value = Some("typed".to_owned());
        }
        assert_eq!(dom.value(ids[4]), "typed");
        assert_eq!(dom.attribute(ids[4], "value"), Some("one"));
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut node = DOMNode::element("a");
        node.set_attr("href", "first");
        node.set_attr("title", "t");
        node.set_attr("href", "second");
        assert_eq!(node.attrs.len(), 2);
        assert_eq!(node.attrs[0], ("href".to_owned(), "second".to_owned()));
    }

    #[test]
    fn contains_walks_ancestors() {
        let (dom, ids) = sample();
        assert!(dom.contains(ids[0], ids[5]));
        assert!(dom.contains(ids[2], ids[2]));
        assert!(!dom.contains(ids[2], ids[6]));
        assert_eq!(dom.parent(ids[4]), Some(ids[2]));
    }
}
