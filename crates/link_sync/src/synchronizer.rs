//! The input synchronizer.
//!
//! Two reactions, chosen per event by [`InputSynchronizer::classify`]:
//! - an input whose parent is a list-item container rewrites the `href` of the
//!   container's first anchor from the anchor's template and the container's
//!   input values;
//! - the mirror source copies its value to every duplicate under the root.

use crate::config::SyncConfig;
use crate::events::{InputEvent, InputListener, InputTarget};
use crate::template::QueryTemplate;
use anyhow::{Error, anyhow};
use html::{DOM, DOMUpdate, NodeId};
use log::{debug, trace};
use std::iter;

/// Attribute receiving the rendered link.
const HREF_ATTR: &str = "href";

/// Keeps list-item links and mirrored inputs in step with user edits.
pub struct InputSynchronizer {
    root: NodeId,
    config: SyncConfig,
}

impl InputSynchronizer {
    /// Observe inputs below `root` (inclusive).
    pub const fn new(root: NodeId, config: SyncConfig) -> Self {
        Self { root, config }
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Decide which reaction, if any, an event on `target` triggers. The
    /// list-item reaction wins when both apply.
    pub fn classify(&self, dom: &DOM, target: NodeId) -> InputTarget {
        if dom.tag_name(target).is_none() || !dom.contains(self.root, target) {
            return InputTarget::Unhandled;
        }
        if let Some(container) = dom
            .parent(target)
            .filter(|&parent| dom.has_tag(parent, &self.config.container_tag))
        {
            return InputTarget::ListItemInput { container };
        }
        if dom.has_class(target, &self.config.source_class) {
            return InputTarget::MirrorSourceInput;
        }
        InputTarget::Unhandled
    }

    /// Render the container's anchor `href` from its template and the current
    /// values of the container's inputs, in document order.
    ///
    /// The first slot of the template receives nothing, every following slot
    /// receives `=value` of the next input. Slots left over once the inputs run
    /// out stay empty; inputs beyond the last slot are ignored.
    ///
    /// # Errors
    /// Returns an error if the container has no anchor.
    pub fn list_item_updates(
        &self,
        dom: &DOM,
        container: NodeId,
    ) -> Result<Vec<DOMUpdate>, Error> {
        let anchor = dom
            .get_elements_by_tag_name(container, &self.config.anchor_tag)
            .into_iter()
            .next()
            .ok_or_else(|| {
                anyhow!(
                    "List item {container:?} has no <{}> to update",
                    self.config.anchor_tag
                )
            })?;

        let values: Vec<String> = iter::once(String::new())
            .chain(
                dom.get_elements_by_tag_name(container, &self.config.input_tag)
                    .into_iter()
                    .map(|input| format!("={}", dom.value(input))),
            )
            .collect();

        let template = dom
            .attribute(anchor, &self.config.template_attr)
            .unwrap_or_else(|| {
                debug!(
                    "Anchor {anchor:?} has no {} attribute, using an empty template",
                    self.config.template_attr
                );
                ""
            });
        let href = QueryTemplate::parse(template, self.config.separator).fill(&values);
        trace!("List item {container:?}: {template:?} -> {href:?}");

        Ok(vec![DOMUpdate::SetAttr {
            node: anchor,
            name: HREF_ATTR.to_owned(),
            value: href,
        }])
    }

    /// Copy the value of `source` to every duplicate below the root.
    pub fn mirror_updates(&self, dom: &DOM, source: NodeId) -> Vec<DOMUpdate> {
        let value = dom.value(source);
        let duplicates = dom.get_elements_by_class_name(self.root, &self.config.duplicate_class);
        trace!("Mirroring {value:?} to {} duplicates", duplicates.len());
        duplicates
            .into_iter()
            .map(|node| DOMUpdate::SetValue {
                node,
                value: value.to_owned(),
            })
            .collect()
    }
}

impl InputListener for InputSynchronizer {
    fn on_input(&mut self, dom: &DOM, event: &InputEvent) -> Result<Vec<DOMUpdate>, Error> {
        match self.classify(dom, event.target) {
            InputTarget::ListItemInput { container } => self.list_item_updates(dom, container),
            InputTarget::MirrorSourceInput => Ok(self.mirror_updates(dom, event.target)),
            InputTarget::Unhandled => Ok(Vec::new()),
        }
    }
}
