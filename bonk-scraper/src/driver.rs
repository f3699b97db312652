use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Element geometry in CSS pixels, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Page-level capabilities the scraper needs from a browser.
#[async_trait]
pub trait Driver: Send + Sync {
    type Node: Node;

    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// First element matching `selector`, if one is currently in the DOM.
    async fn query(&self, selector: &str) -> Result<Option<Self::Node>>;

    /// Simulated mouse wheel; positive `delta_y` scrolls down.
    async fn wheel(&self, delta_y: f64) -> Result<()>;

    async fn click_at(&self, x: f64, y: f64) -> Result<()>;
}

/// Element handle capabilities.
#[async_trait]
pub trait Node: Send + Sync + Sized {
    async fn bounding_box(&self) -> Result<Option<BoundingBox>>;

    async fn scroll_into_view(&self) -> Result<()>;

    /// Click the element centre without checking what is on top of it.
    async fn force_click(&self) -> Result<()>;

    async fn inner_text(&self) -> Result<String>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    async fn children(&self, tag: &str) -> Result<Vec<Self>>;
}

/// Waiting strategy between UI steps.
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately. Used by tests and dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSleep;

#[async_trait]
impl Sleep for NoSleep {
    async fn sleep(&self, _duration: Duration) {}
}
