#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]
//! Keeps hyperlinks in step with the form inputs that parameterise them.
//!
//! Inside a list item, every input edit re-renders the item's anchor `href`
//! from the anchor's `data-href` template. Separately, edits to the mirror
//! source (`this-ref`) are copied to every duplicate (`this-arg`).
//!
//! ```no_run
//! use link_sync::{HtmlPage, SyncConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut page = HtmlPage::from_html(
//!     r#"<ul><li><a id="go" data-href="call?m=run&arg0">run</a><input id="arg"></li></ul>"#,
//!     SyncConfig::default(),
//! )?;
//! if let Some(input) = page.dom().get_element_by_id("arg") {
//!     page.set_input_value(input, "42")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod events;
pub mod page;
pub mod synchronizer;
pub mod template;

pub use config::SyncConfig;
pub use events::{InputEvent, InputListener, InputTarget};
pub use page::HtmlPage;
pub use synchronizer::InputSynchronizer;
pub use template::QueryTemplate;
