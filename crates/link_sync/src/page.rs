//! A page: one DOM plus the input listeners bound to it.

use crate::config::SyncConfig;
use crate::events::{InputEvent, InputListener};
use crate::synchronizer::InputSynchronizer;
use anyhow::{Context as _, Error};
use html::{DOM, DOMUpdate, NodeId, parse_html};
use log::{debug, warn};
use tokio::sync::broadcast;
use url::Url;

/// A parsed page together with the input listeners bound to it.
pub struct HtmlPage {
    dom: DOM,
    listeners: Vec<Box<dyn InputListener>>,
    base_url: Option<Url>,
}

impl HtmlPage {
    /// Wrap an existing DOM. No listeners are bound.
    pub fn new(dom: DOM) -> Self {
        Self {
            dom,
            listeners: Vec::new(),
            base_url: None,
        }
    }

    /// Parse `html` and bind an [`InputSynchronizer`] at document level, rooted
    /// at `<body>` when the document has one.
    ///
    /// # Errors
    /// Returns an error if the markup cannot be parsed.
    pub fn from_html(html: &str, config: SyncConfig) -> Result<Self, Error> {
        let dom = parse_html(html)?;
        let root = dom.body().unwrap_or_else(|| dom.root());
        let mut page = Self::new(dom);
        page.add_input_listener(Box::new(InputSynchronizer::new(root, config)));
        Ok(page)
    }

    /// Base URL used by [`HtmlPage::resolve_href`].
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[inline]
    pub const fn dom(&self) -> &DOM {
        &self.dom
    }

    /// Listeners run in registration order.
    pub fn add_input_listener(&mut self, listener: Box<dyn InputListener>) {
        self.listeners.push(listener);
    }

    /// Receive every batch this page commits from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<DOMUpdate>> {
        self.dom.subscribe()
    }

    /// Deliver an input event for `target` to every listener. Each listener's
    /// batch is committed before the next listener runs. A failing listener is
    /// logged and skipped for this event. Returns the number of updates applied.
    ///
    /// # Errors
    /// Returns an error if a listener produced an update the DOM rejects.
    pub fn dispatch_input(&mut self, target: NodeId) -> Result<usize, Error> {
        let event = InputEvent::new(target);
        let mut applied = 0;
        for listener in &mut self.listeners {
            match listener.on_input(&self.dom, &event) {
                Ok(batch) => applied += self.dom.commit(batch)?,
                Err(error) => warn!("Input listener failed for {target:?}: {error:#}"),
            }
        }
        debug!("Input on {target:?} applied {applied} updates");
        Ok(applied)
    }

    /// Write the live value of `target` as a user edit would, then dispatch the
    /// resulting input event.
    ///
    /// # Errors
    /// Returns an error if `target` is not an element, or if dispatch fails.
    pub fn set_input_value(&mut self, target: NodeId, value: &str) -> Result<usize, Error> {
        self.dom.commit(vec![DOMUpdate::SetValue {
            node: target,
            value: value.to_owned(),
        }])?;
        self.dispatch_input(target)
    }

    /// The anchor's live `href` as an absolute URL, resolved against the base
    /// URL when one is set. `None` when the anchor has no `href` yet.
    ///
    /// # Errors
    /// Returns an error if the `href` does not form a valid URL.
    pub fn resolve_href(&self, anchor: NodeId) -> Result<Option<Url>, Error> {
        let Some(href) = self.dom.attribute(anchor, "href") else {
            return Ok(None);
        };
        let resolved = match &self.base_url {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        resolved
            .map(Some)
            .with_context(|| format!("Cannot resolve href {href:?}"))
    }
}
