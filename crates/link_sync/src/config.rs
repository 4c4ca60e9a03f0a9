//! Configuration for the input synchronizer.
//!
//! Names the marker classes, the template attribute and the tags the
//! synchronizer looks for. Configuration can be loaded from environment
//! variables, parsed from JSON, or constructed programmatically.

use anyhow::{Context as _, Error};
use serde::Deserialize;
use std::env;

/// Markup conventions the synchronizer reacts to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Class marking the single mirror source element
    pub source_class: String,
    /// Class marking every element that copies the mirror source
    pub duplicate_class: String,
    /// Anchor attribute holding the query-string template
    pub template_attr: String,
    /// Tag of the container pairing one anchor with its inputs
    pub container_tag: String,
    /// Tag of the link element inside a container
    pub anchor_tag: String,
    /// Tag of the controls whose values feed the template
    pub input_tag: String,
    /// Character marking a substitution point in the template
    pub separator: char,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_class: "this-ref".to_owned(),
            duplicate_class: "this-arg".to_owned(),
            template_attr: "data-href".to_owned(),
            container_tag: "li".to_owned(),
            anchor_tag: "a".to_owned(),
            input_tag: "input".to_owned(),
            separator: '&',
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `LINK_SYNC_SOURCE_CLASS` (default: `this-ref`)
    /// - `LINK_SYNC_DUPLICATE_CLASS` (default: `this-arg`)
    /// - `LINK_SYNC_TEMPLATE_ATTR` (default: `data-href`)
    /// - `LINK_SYNC_CONTAINER_TAG` (default: `li`)
    /// - `LINK_SYNC_SEPARATOR`: first character is used (default: `&`)
    ///
    /// Unset or empty variables keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup using the same keys as
    /// [`SyncConfig::from_env`].
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());
        let defaults = Self::default();
        Self {
            source_class: read("LINK_SYNC_SOURCE_CLASS").unwrap_or(defaults.source_class),
            duplicate_class: read("LINK_SYNC_DUPLICATE_CLASS").unwrap_or(defaults.duplicate_class),
            template_attr: read("LINK_SYNC_TEMPLATE_ATTR").unwrap_or(defaults.template_attr),
            container_tag: read("LINK_SYNC_CONTAINER_TAG").unwrap_or(defaults.container_tag),
            anchor_tag: defaults.anchor_tag,
            input_tag: defaults.input_tag,
            separator: read("LINK_SYNC_SEPARATOR")
                .and_then(|val| val.chars().next())
                .unwrap_or(defaults.separator),
        }
    }

    /// Parse configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid configuration object.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).context("Invalid link sync configuration")
    }
}
