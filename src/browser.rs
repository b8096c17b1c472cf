//! Headless browser rendering for client-side template injection checks.
//!
//! Uses headless Chromium to execute client-side scripts in a reflected body
//! before the fragment is classified again. Only available with the
//! `browser` feature.

use crate::error::Result;
use async_trait::async_trait;

/// Capability interface for rendering HTML through a browser.
///
/// The scanner only depends on this trait, so tests can substitute a
/// scripted renderer.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders `html` in the context of `url` and returns the settled DOM
    async fn render(&self, html: &str, url: &str) -> Result<String>;
}

#[cfg(feature = "browser")]
pub use chromium::ChromiumRenderer;

#[cfg(feature = "browser")]
mod chromium {
    use super::Renderer;
    use crate::error::{ProteusError, Result};
    use async_trait::async_trait;
    use chromiumoxide::{Browser, BrowserConfig};
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::{debug, info};

    /// Seconds a page gets to settle before its DOM is read
    const RENDER_DEADLINE_SECS: u64 = 15;

    /// Headless Chromium renderer
    pub struct ChromiumRenderer {
        browser: Arc<Browser>,
    }

    impl ChromiumRenderer {
        /// Launches a headless Chromium instance
        pub async fn new() -> Result<Self> {
            let (browser, mut handler) = Browser::launch(
                BrowserConfig::builder()
                    .no_sandbox()
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    .build()
                    .map_err(|e| ProteusError::RenderError(format!("Browser config error: {e}")))?,
            )
            .await
            .map_err(|e| ProteusError::RenderError(e.to_string()))?;

            tokio::spawn(async move { while handler.next().await.is_some() {} });

            info!("Headless browser initialized");
            Ok(Self {
                browser: Arc::new(browser),
            })
        }
    }

    #[async_trait]
    impl Renderer for ChromiumRenderer {
        async fn render(&self, html: &str, url: &str) -> Result<String> {
            let render = async {
                let page = self
                    .browser
                    .new_page(url)
                    .await
                    .map_err(|e| ProteusError::RenderError(e.to_string()))?;
                page.set_content(html)
                    .await
                    .map_err(|e| ProteusError::RenderError(e.to_string()))?;
                let rendered = page
                    .content()
                    .await
                    .map_err(|e| ProteusError::RenderError(e.to_string()))?;
                let _ = page.close().await;
                Ok::<String, ProteusError>(rendered)
            };

            match tokio::time::timeout(Duration::from_secs(RENDER_DEADLINE_SECS), render).await {
                Ok(result) => result,
                Err(_) => {
                    debug!("Render of {url} exceeded {RENDER_DEADLINE_SECS}s deadline");
                    Err(ProteusError::RenderError("render deadline exceeded".to_string()))
                }
            }
        }
    }
}
