//! Redirect resolution through a headless Chromium.
//!
//! Some document hosts only reach the final file through script-driven
//! redirects, which an HTTP client cannot follow. Each call launches its own
//! browser with a throwaway profile, navigates, reads the settled location
//! and shuts the browser down again. Nothing is shared between calls.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures_util::StreamExt;
use tempfile::TempDir;
use tracing::{debug, info};

use super::{RedirectResolver, ResolveError};
use crate::config::BrowserSettings;

const NAME: &str = "browser";

/// Resolves URLs by navigating a fresh headless Chromium per call.
#[derive(Debug, Clone)]
pub struct BrowserResolver {
    settings: BrowserSettings,
}

impl BrowserResolver {
    /// Creates a resolver after checking that a browser can be configured.
    ///
    /// The browser itself is launched lazily per call.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unavailable`] if the configured executable does
    /// not exist or no Chrome/Chromium installation can be found.
    pub fn new(settings: BrowserSettings) -> Result<Self, ResolveError> {
        let resolver = Self { settings };
        let profile = scratch_profile()?;
        resolver.browser_config(&profile)?;
        debug!(chrome = ?resolver.settings.chrome_executable, "browser resolver ready");
        Ok(resolver)
    }

    fn browser_config(&self, profile: &TempDir) -> Result<BrowserConfig, ResolveError> {
        let mut builder = BrowserConfig::builder().user_data_dir(profile.path());

        if let Some(ref chrome) = self.settings.chrome_executable {
            if !chrome.is_file() {
                return Err(ResolveError::unavailable(
                    NAME,
                    format!("Chrome executable not found at '{}'", chrome.display()),
                    "Check the `--chrome` path or use `--resolver http`",
                ));
            }
            builder = builder.chrome_executable(chrome);
        }
        if !self.settings.headless {
            builder = builder.with_head();
        }

        builder
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .build()
            .map_err(|e| {
                ResolveError::unavailable(
                    NAME,
                    e,
                    "Install Chromium or set `chrome_executable` in the config file",
                )
            })
    }

    async fn navigate(browser: &Browser, url: &str) -> Result<String, ResolveError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ResolveError::navigation(NAME, url, e))?;
        page.goto(url)
            .await
            .map_err(|e| ResolveError::navigation(NAME, url, e))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ResolveError::navigation(NAME, url, e))?;

        let location = page
            .url()
            .await
            .map_err(|e| ResolveError::navigation(NAME, url, e))?
            .unwrap_or_default();
        let _ = page.close().await;
        Ok(location)
    }
}

fn scratch_profile() -> Result<TempDir, ResolveError> {
    TempDir::new().map_err(|e| {
        ResolveError::unavailable(NAME, e, "Check that the temp directory is writable")
    })
}

#[async_trait]
impl RedirectResolver for BrowserResolver {
    fn name(&self) -> &str {
        NAME
    }

    async fn resolve(&self, url: &str) -> Result<String, ResolveError> {
        let profile = scratch_profile()?;
        let config = self.browser_config(&profile)?;

        let (mut browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            ResolveError::unavailable(
                NAME,
                e,
                "Install Chromium or set `chrome_executable` in the config file",
            )
        })?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!(url, "navigating");
        let timeout_secs = self.settings.navigation_timeout_secs;
        let result = match tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            Self::navigate(&browser, url),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ResolveError::timeout(NAME, url, timeout_secs)),
        };

        if let Err(e) = browser.close().await {
            debug!(error = %e, "browser close failed");
        }
        if let Err(e) = browser.wait().await {
            debug!(error = %e, "browser wait failed");
        }
        handler_task.abort();

        let location = result?;
        debug!(url, location = %location, "navigation settled");
        Ok(location)
    }
}
