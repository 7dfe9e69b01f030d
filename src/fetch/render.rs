//! Headless rendering for pages that only contain their data after scripts run.
//!
//! Only available with the `browser` feature. Without it, rendered sources
//! fail fast with [`SourceFailure::RenderUnsupported`].

use std::time::Duration;

use crate::config::DEFAULT_RENDER_WAIT_SELECTOR;
use crate::error_handling::{HarvestError, SourceFailure};
use crate::utils::parse_selector_checked;

#[cfg(feature = "browser")]
mod chrome {
    use std::sync::Arc;
    use std::time::Duration;

    use headless_chrome::{Browser, LaunchOptions, Tab};

    /// Owns the browser process for one render; dropping it closes the tab
    /// and terminates Chrome.
    pub(super) struct BrowserSession {
        tab: Arc<Tab>,
        _browser: Browser,
    }

    impl BrowserSession {
        pub(super) fn launch(timeout: Duration) -> anyhow::Result<Self> {
            let browser = Browser::new(LaunchOptions {
                headless: true,
                idle_browser_timeout: timeout + Duration::from_secs(30),
                ..Default::default()
            })?;
            let tab = browser.new_tab()?;
            tab.set_default_timeout(timeout);
            Ok(Self {
                tab,
                _browser: browser,
            })
        }

        /// Navigates and waits for `ready` to appear, then returns the DOM.
        ///
        /// A missing ready element is not fatal: whatever loaded is returned
        /// and extraction decides whether it is usable.
        pub(super) fn render(
            &self,
            url: &str,
            ready: &str,
            timeout: Duration,
        ) -> anyhow::Result<String> {
            self.tab.navigate_to(url)?;
            self.tab.wait_until_navigated()?;
            if let Err(e) = self.tab.wait_for_element_with_custom_timeout(ready, timeout) {
                log::warn!("Ready selector {:?} not found on {}: {}", ready, url, e);
            }
            Ok(self.tab.get_content()?)
        }
    }

    impl Drop for BrowserSession {
        fn drop(&mut self) {
            if let Err(e) = self.tab.close(true) {
                log::debug!("Failed to close tab: {}", e);
            }
        }
    }
}

/// Returns the configured ready selector, or the default one when it does
/// not parse (an unparsable selector would only burn the render timeout).
pub(crate) fn ready_selector(configured: &str) -> &str {
    if parse_selector_checked(configured, "--render-wait").is_some() {
        configured
    } else {
        log::warn!(
            "Using default ready selector {:?} instead",
            DEFAULT_RENDER_WAIT_SELECTOR
        );
        DEFAULT_RENDER_WAIT_SELECTOR
    }
}

/// Runs a blocking session on the blocking pool and waits for it to finish.
///
/// The join handle is awaited to completion, never raced against a timer,
/// so the session and everything it owns is dropped before this returns.
/// Time limits belong to the session itself.
#[cfg(any(feature = "browser", test))]
async fn run_blocking_session<S, O, R>(open: O, render: R) -> Result<String, String>
where
    O: FnOnce() -> anyhow::Result<S> + Send + 'static,
    R: FnOnce(&S) -> anyhow::Result<String> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || {
        let session = open()?;
        render(&session)
    });
    match task.await {
        Ok(result) => result.map_err(|e| format!("{:#}", e)),
        Err(join) => Err(join.to_string()),
    }
}

/// Renders `url` in a headless browser and returns the resulting HTML.
///
/// Navigation and the ready wait are bounded by `timeout` on the tab.
#[cfg(feature = "browser")]
pub(crate) async fn render_and_wait(
    url: &str,
    ready: &str,
    timeout: Duration,
) -> Result<String, HarvestError> {
    let (owned_url, owned_ready) = (url.to_string(), ready.to_string());
    run_blocking_session(
        move || chrome::BrowserSession::launch(timeout),
        move |session| session.render(&owned_url, &owned_ready, timeout),
    )
    .await
    .map_err(|message| HarvestError::SourceUnavailable {
        url: url.to_string(),
        kind: SourceFailure::Render,
        message,
    })
}

#[cfg(not(feature = "browser"))]
pub(crate) async fn render_and_wait(
    url: &str,
    _ready: &str,
    _timeout: Duration,
) -> Result<String, HarvestError> {
    Err(HarvestError::SourceUnavailable {
        url: url.to_string(),
        kind: SourceFailure::RenderUnsupported,
        message: "built without the `browser` feature".to_string(),
    })
}
