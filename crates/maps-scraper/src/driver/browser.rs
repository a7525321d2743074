use super::{Driver, Element};
use crate::config::BrowserConfig;
use crate::Result;
use eoka::{Browser, Page};
use std::time::{Duration, Instant};
use tracing::debug;

/// Delay between lookups while waiting for an element to appear.
const FIND_POLL_MS: u64 = 250;

/// Find the element whose visible text matches a regex - returns CSS selector.
///
/// Clickable elements win. Otherwise the innermost matching element is
/// used, since game menus are often plain divs with click handlers.
const FIND_BY_TEXT_JS: &str = r#"(() => {
    const re = new RegExp(__PATTERN__, 'iu');
    const CLICKABLE = 'a, button, input, select, [role="button"], [role="tab"], [role="menuitem"], [onclick]';
    const textOf = el => (el.innerText || el.textContent || '').trim();
    const visible = el => {
        const rect = el.getBoundingClientRect();
        return rect.width > 0 && rect.height > 0;
    };
    const cssPath = el => {
        if (el.id) return '#' + CSS.escape(el.id);
        const path = [];
        let node = el;
        while (node && node !== document.body) {
            let selector = node.tagName.toLowerCase();
            if (node.id) {
                path.unshift('#' + CSS.escape(node.id));
                break;
            }
            const siblings = Array.from(node.parentNode?.children || []);
            const index = siblings.indexOf(node) + 1;
            if (siblings.length > 1) selector += ':nth-child(' + index + ')';
            path.unshift(selector);
            node = node.parentNode;
        }
        return path.join(' > ');
    };
    let innermost = null;
    const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_ELEMENT, null);
    while (walker.nextNode()) {
        const el = walker.currentNode;
        const text = textOf(el);
        if (!text || !re.test(text) || !visible(el)) continue;
        if (el.matches(CLICKABLE)) return cssPath(el);
        const childMatches = Array.from(el.children).some(c => re.test(textOf(c)));
        if (!childMatches && !innermost) innermost = el;
    }
    return innermost ? cssPath(innermost) : null;
})()"#;

const VISIBLE_TEXT_JS: &str = r#"(() => {
    const el = document.querySelector(__SCOPE__);
    return el ? (el.innerText || '') : '';
})()"#;

fn find_script(pattern: &str) -> Result<String> {
    Ok(FIND_BY_TEXT_JS.replace("__PATTERN__", &serde_json::to_string(pattern)?))
}

/// A launched browser with one page. Close it with [`BrowserSession::close`]
/// on every path once the scrape is done.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
}

impl BrowserSession {
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: config.viewport.as_ref().map(|v| v.width).unwrap_or(1280),
            viewport_height: config.viewport.as_ref().map(|v| v.height).unwrap_or(720),
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, proxy: {:?})",
            config.headless, config.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self { browser, page })
    }

    pub fn driver(&self) -> PageDriver<'_> {
        PageDriver::new(&self.page)
    }

    pub async fn close(self) -> Result<()> {
        debug!("Closing browser");
        self.browser.close().await?;
        Ok(())
    }
}

/// [`Driver`] over an eoka page.
pub struct PageDriver<'a> {
    page: &'a Page,
}

impl<'a> PageDriver<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    async fn lookup(&self, js: &str) -> Result<Option<Element>> {
        let found: Option<String> = self.page.evaluate(js).await?;
        Ok(found.map(|selector| Element { selector }))
    }
}

impl Driver for PageDriver<'_> {
    async fn open(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn wait_for_network_idle(&self, idle_ms: u64, timeout_ms: u64) -> Result<()> {
        self.page.wait_for_network_idle(idle_ms, timeout_ms).await?;
        Ok(())
    }

    async fn find_by_text(&self, pattern: &str, timeout_ms: u64) -> Result<Option<Element>> {
        let js = find_script(pattern)?;
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if let Some(element) = self.lookup(&js).await? {
                debug!("find_by_text '{}': {}", pattern, element.selector);
                return Ok(Some(element));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            self.page.wait(FIND_POLL_MS).await;
        }
    }

    async fn click(&self, element: &Element) -> Result<()> {
        self.page.click(&element.selector).await?;
        Ok(())
    }

    async fn sleep(&self, ms: u64) {
        self.page.wait(ms).await;
    }

    async fn visible_text(&self, scope: &str) -> Result<String> {
        let js = VISIBLE_TEXT_JS.replace("__SCOPE__", &serde_json::to_string(scope)?);
        let text: String = self.page.evaluate(&js).await?;
        Ok(text)
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let data = self.page.screenshot().await?;
        Ok(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_script_embeds_pattern_as_unicode_regex() {
        let js = find_script(r#"Ігри|"Games"\d"#).unwrap();
        assert!(js.contains(r#"new RegExp("Ігри|\"Games\"\\d", 'iu')"#), "{}", js);
        assert!(!js.contains("__PATTERN__"));
    }
}
