use super::DOM;
use anyhow::{Error, anyhow};
use indextree::NodeId;
use log::debug;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// A single write against an existing element. Writes never create or
/// destroy nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DOMUpdate {
    SetAttr {
        node: NodeId,
        name: String,
        value: String,
    },
    SetValue {
        node: NodeId,
        value: String,
    },
}

impl DOMUpdate {
    pub const fn node(&self) -> NodeId {
        match self {
            Self::SetAttr { node, .. } | Self::SetValue { node, .. } => *node,
        }
    }
}

/// Anything that replays committed batches into its own state.
pub trait DOMSubscriber {
    /// Apply one update from a committed batch.
    ///
    /// # Errors
    /// Returns an error if the update cannot be applied to this subscriber.
    fn apply_update(&mut self, update: DOMUpdate) -> Result<(), Error>;
}

impl DOM {
    /// Apply a single update.
    ///
    /// # Errors
    /// Returns an error if the target is not an element of this DOM.
    pub fn apply(&mut self, update: &DOMUpdate) -> Result<(), Error> {
        let node = self
            .element_mut(update.node())
            .ok_or_else(|| anyhow!("update targets unknown element {:?}", update.node()))?;
        match update {
            DOMUpdate::SetAttr { name, value, .. } => node.set_attr(name, value),
            DOMUpdate::SetValue { value, .. } => node.value = Some(value.clone()),
        }
        Ok(())
    }

    /// Apply a batch in order, then hand it to subscribers. Returns the number
    /// of updates applied.
    ///
    /// A batch applies as a whole or not at all.
    ///
    /// # Errors
    /// Returns an error, leaving the tree untouched and broadcasting nothing,
    /// if any update in the batch targets something other than an element.
    pub fn commit(&mut self, batch: Vec<DOMUpdate>) -> Result<usize, Error> {
        if let Some(bad) = batch
            .iter()
            .find(|update| self.tag_name(update.node()).is_none())
        {
            return Err(anyhow!(
                "Batch rejected: update targets unknown element {:?}",
                bad.node()
            ));
        }
        for update in &batch {
            self.apply(update)?;
        }
        let applied = batch.len();
        if applied > 0 && self.update_sender.receiver_count() > 0 {
            debug!("Broadcasting batch of {applied} DOM updates");
            self.update_sender
                .send(batch)
                .map_err(|_| anyhow!("All DOM subscribers hung up during commit"))?;
        }
        Ok(applied)
    }

    /// Receive every batch committed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<DOMUpdate>> {
        self.update_sender.subscribe()
    }

    /// Copy the tree into a detached DOM with its own (empty) subscriber set.
    /// Node ids stay valid across the copy.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        let (update_sender, _) = broadcast::channel(super::UPDATE_CHANNEL_CAPACITY);
        Self {
            dom: self.dom.clone(),
            root: self.root,
            update_sender,
        }
    }
}

impl DOMSubscriber for DOM {
    fn apply_update(&mut self, update: DOMUpdate) -> Result<(), Error> {
        self.apply(&update)
    }
}

/// Keeps a subscriber in step with the batches a DOM commits.
pub struct DOMMirror<T: DOMSubscriber> {
    in_updater: broadcast::Receiver<Vec<DOMUpdate>>,
    mirror: T,
}

impl<T: DOMSubscriber> DOMMirror<T> {
    pub fn new(source: &DOM, mirror: T) -> Self {
        Self {
            in_updater: source.subscribe(),
            mirror,
        }
    }

    /// Drain and apply every pending batch without blocking.
    ///
    /// # Errors
    /// Returns an error if a batch fails to apply, or if the mirror fell so far
    /// behind that batches were dropped.
    pub fn try_update_sync(&mut self) -> Result<(), Error> {
        loop {
            match self.in_updater.try_recv() {
                Ok(batch) => {
                    for update in batch {
                        self.mirror.apply_update(update)?;
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    return Err(anyhow!("Mirror lagged behind by {skipped} batches"));
                }
            }
        }
        Ok(())
    }

    pub const fn mirror(&self) -> &T {
        &self.mirror
    }

    pub fn mirror_mut(&mut self) -> &mut T {
        &mut self.mirror
    }
}
