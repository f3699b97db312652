// Chromium backend over the DevTools protocol.

use crate::driver::{BoundingBox, Driver, Node};
use crate::error::{Result, ScrapeError};
use crate::timings::Timings;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::element::Element;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::layout::Point;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// How the browser is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub headless: bool,
    pub width: u32,
    pub height: u32,
    /// Ceiling for any single DevTools command. The protocol handler fails
    /// commands on its own after this, so it must cover the longest wait.
    pub request_timeout: Duration,
}

impl LaunchOptions {
    pub fn new(headless: bool, (width, height): (u32, u32), timings: &Timings) -> Self {
        Self {
            headless,
            width,
            height,
            request_timeout: timings
                .navigation_timeout
                .max(timings.initial_selector_timeout),
        }
    }
}

pub struct ChromeDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    viewport: (u32, u32),
}

impl ChromeDriver {
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let LaunchOptions {
            headless,
            width,
            height,
            request_timeout,
        } = *options;

        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            })
            .request_timeout(request_timeout);
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(ScrapeError::Config)?;

        info!("Launching Chromium ({}x{}, headless: {})", width, height, headless);
        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler must be polled for the browser connection to make progress.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler,
            viewport: (width, height),
        })
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        let _ = self.handler.await;
        Ok(())
    }
}

#[async_trait]
impl Driver for ChromeDriver {
    type Node = ChromeNode;

    async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| ScrapeError::Timeout {
                what: format!("navigation to {}", url),
                timeout,
            })??;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.page.find_elements(selector).await?.is_empty() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::Timeout {
                    what: format!("selector {}", selector),
                    timeout,
                });
            }
            tokio::time::sleep(SELECTOR_POLL).await;
        }
    }

    async fn query(&self, selector: &str) -> Result<Option<ChromeNode>> {
        let elements = self.page.find_elements(selector).await?;
        Ok(elements.into_iter().next().map(ChromeNode))
    }

    async fn wheel(&self, delta_y: f64) -> Result<()> {
        let (width, height) = self.viewport;
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(f64::from(width) / 2.0)
            .y(f64::from(height) / 2.0)
            .delta_x(0.0)
            .delta_y(delta_y)
            .build()
            .map_err(ScrapeError::Config)?;
        self.page.execute(params).await?;
        Ok(())
    }

    async fn click_at(&self, x: f64, y: f64) -> Result<()> {
        self.page.click(Point { x, y }).await?;
        Ok(())
    }
}

pub struct ChromeNode(Element);

#[async_trait]
impl Node for ChromeNode {
    async fn bounding_box(&self) -> Result<Option<BoundingBox>> {
        let bbox = self.0.bounding_box().await?;
        Ok(Some(BoundingBox {
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
        }))
    }

    async fn scroll_into_view(&self) -> Result<()> {
        self.0.scroll_into_view().await?;
        Ok(())
    }

    async fn force_click(&self) -> Result<()> {
        // Dispatches at the element centre; nothing checks what receives it.
        self.0.click().await?;
        Ok(())
    }

    async fn inner_text(&self) -> Result<String> {
        Ok(self.0.inner_text().await?.unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.attribute(name).await?)
    }

    async fn children(&self, tag: &str) -> Result<Vec<ChromeNode>> {
        let elements = self.0.find_elements(tag).await?;
        Ok(elements.into_iter().map(ChromeNode).collect())
    }
}
