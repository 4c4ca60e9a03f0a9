//! Input event model and the listener seam used for dispatch.

use anyhow::Error;
use html::{DOM, DOMUpdate, NodeId};

/// A "value changed" notification for a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// The element whose value changed
    pub target: NodeId,
}

impl InputEvent {
    pub const fn new(target: NodeId) -> Self {
        Self { target }
    }
}

/// What an input event's target means to the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    /// The target's parent is a list-item container pairing an anchor with inputs.
    ListItemInput { container: NodeId },
    /// The target is the mirror source.
    MirrorSourceInput,
    /// Nothing to do.
    Unhandled,
}

/// Reacts to input events by describing the writes to make.
///
/// Listeners only read the DOM; the returned batch is committed by the
/// dispatcher once the listener returns.
pub trait InputListener {
    /// # Errors
    /// An error aborts this listener's handling of this event only.
    fn on_input(&mut self, dom: &DOM, event: &InputEvent) -> Result<Vec<DOMUpdate>, Error>;
}

impl<F> InputListener for F
where
    F: FnMut(&DOM, &InputEvent) -> Result<Vec<DOMUpdate>, Error>,
{
    fn on_input(&mut self, dom: &DOM, event: &InputEvent) -> Result<Vec<DOMUpdate>, Error> {
        self(dom, event)
    }
}
