//! Browser capabilities the scrape flow depends on.
//!
//! [`Driver`] is the whole surface: open a page, wait, find an element by a
//! text pattern, click it, read visible text. [`PageDriver`] implements it
//! on an eoka page; tests implement it in memory.

mod browser;

pub use browser::{BrowserSession, PageDriver};

use crate::Result;

/// A located element, addressed by a unique CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub selector: String,
}

#[allow(async_fn_in_trait)]
pub trait Driver {
    /// Navigate to `url`.
    async fn open(&self, url: &str) -> Result<()>;

    /// Wait until no requests are in flight for `idle_ms`.
    async fn wait_for_network_idle(&self, idle_ms: u64, timeout_ms: u64) -> Result<()>;

    /// First element whose visible text matches `pattern` (case-insensitive
    /// regex), polling until `timeout_ms`. `Ok(None)` when nothing matched.
    async fn find_by_text(&self, pattern: &str, timeout_ms: u64) -> Result<Option<Element>>;

    async fn click(&self, element: &Element) -> Result<()>;

    /// Fixed delay.
    async fn sleep(&self, ms: u64);

    /// Visible text of the first element matching the CSS selector `scope`,
    /// empty when there is none.
    async fn visible_text(&self, scope: &str) -> Result<String>;

    /// PNG screenshot of the viewport.
    async fn screenshot(&self) -> Result<Vec<u8>>;
}
