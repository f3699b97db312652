// Scripted stand-in for a browser page showing a virtualized leaderboard.
//
// Rows are laid out every ROW_PITCH pixels. Only rows near the scroll
// position exist in the "DOM". Rows start collapsed and expand after a
// configurable number of clicks; some images only show once expanded.

#![allow(dead_code)]

use async_trait::async_trait;
use bonk_scraper::error::{Result, ScrapeError};
use bonk_scraper::{BoundingBox, Driver, Node, Sleep};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ROW_PITCH: f64 = 100.0;
pub const ROW_WIDTH: f64 = 1000.0;
pub const COLLAPSED_HEIGHT: f64 = 80.0;
pub const EXPANDED_HEIGHT: f64 = 300.0;
pub const VIEWPORT_HEIGHT: f64 = 900.0;
pub const RENDER_MARGIN: f64 = 500.0;

#[derive(Debug, Clone, Default)]
pub struct FakeRow {
    pub text: String,
    pub images: Vec<String>,
    /// Only listed once the row is expanded.
    pub hidden_images: Vec<String>,
    pub links: Vec<String>,
    /// `None` means the row never expands.
    pub clicks_to_expand: Option<usize>,
    /// Reading the row text fails.
    pub broken: bool,
}

impl FakeRow {
    pub fn player(score: &str, name: &str) -> Self {
        Self {
            text: format!("{}\n{}", score, name),
            images: vec![
                "https://cdn.test/img/characters/fox.png".to_string(),
                "https://cdn.test/img/weapon/sword.png".to_string(),
            ],
            hidden_images: vec!["https://cdn.test/img/item/clover.png".to_string()],
            links: Vec::new(),
            clicks_to_expand: Some(1),
            broken: false,
        }
    }
}

#[derive(Debug, Default)]
struct PageState {
    rows: Vec<FakeRow>,
    scroll: f64,
    expanded: Vec<bool>,
    clicks: Vec<usize>,
    point_clicks: usize,
    forced_clicks: usize,
    wheel_log: Vec<f64>,
    visited: Option<String>,
    unreachable: bool,
}

impl PageState {
    fn top(&self, index: usize) -> f64 {
        index as f64 * ROW_PITCH
    }

    fn materialized(&self, index: usize) -> bool {
        let top = self.top(index);
        index < self.rows.len()
            && top >= self.scroll - RENDER_MARGIN
            && top <= self.scroll + VIEWPORT_HEIGHT + RENDER_MARGIN
    }

    fn row_box(&self, index: usize) -> BoundingBox {
        BoundingBox {
            x: 0.0,
            y: self.top(index) - self.scroll,
            width: ROW_WIDTH,
            height: if self.expanded[index] {
                EXPANDED_HEIGHT
            } else {
                COLLAPSED_HEIGHT
            },
        }
    }

    fn register_click(&mut self, index: usize) {
        self.clicks[index] += 1;
        if let Some(needed) = self.rows[index].clicks_to_expand
            && self.clicks[index] >= needed
        {
            self.expanded[index] = true;
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakePage {
    state: Arc<Mutex<PageState>>,
}

impl FakePage {
    pub fn new(rows: Vec<FakeRow>) -> Self {
        let count = rows.len();
        Self {
            state: Arc::new(Mutex::new(PageState {
                rows,
                expanded: vec![false; count],
                clicks: vec![0; count],
                ..PageState::default()
            })),
        }
    }

    pub fn unreachable() -> Self {
        let page = Self::new(Vec::new());
        page.state.lock().unwrap().unreachable = true;
        page
    }

    pub fn scroll(&self) -> f64 {
        self.state.lock().unwrap().scroll
    }

    pub fn set_scroll(&self, scroll: f64) {
        self.state.lock().unwrap().scroll = scroll;
    }

    pub fn set_expanded(&self, index: usize) {
        self.state.lock().unwrap().expanded[index] = true;
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.state.lock().unwrap().expanded[index]
    }

    pub fn clicks(&self, index: usize) -> usize {
        self.state.lock().unwrap().clicks[index]
    }

    pub fn point_clicks(&self) -> usize {
        self.state.lock().unwrap().point_clicks
    }

    pub fn forced_clicks(&self) -> usize {
        self.state.lock().unwrap().forced_clicks
    }

    pub fn wheel_log(&self) -> Vec<f64> {
        self.state.lock().unwrap().wheel_log.clone()
    }

    pub fn visited(&self) -> Option<String> {
        self.state.lock().unwrap().visited.clone()
    }
}

fn parse_row_index(selector: &str) -> Option<usize> {
    selector
        .strip_prefix(r#"div[data-index=""#)?
        .strip_suffix(r#""]"#)?
        .parse()
        .ok()
}

#[async_trait]
impl Driver for FakePage {
    type Node = FakeNode;

    async fn goto(&self, url: &str, _timeout: Duration) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(ScrapeError::Other(format!("{} is unreachable", url)));
        }
        state.visited = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        match self.query(selector).await? {
            Some(_) => Ok(()),
            None => Err(ScrapeError::Timeout {
                what: selector.to_string(),
                timeout,
            }),
        }
    }

    async fn query(&self, selector: &str) -> Result<Option<FakeNode>> {
        let Some(index) = parse_row_index(selector) else {
            return Ok(None);
        };
        let state = self.state.lock().unwrap();
        if state.materialized(index) {
            Ok(Some(FakeNode::Row {
                page: self.clone(),
                index,
            }))
        } else {
            Ok(None)
        }
    }

    async fn wheel(&self, delta_y: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let max = state.rows.len() as f64 * ROW_PITCH;
        state.scroll = (state.scroll + delta_y).clamp(0.0, max);
        state.wheel_log.push(delta_y);
        Ok(())
    }

    async fn click_at(&self, x: f64, y: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.point_clicks += 1;
        // Later rows are painted on top of earlier, expanded ones.
        let target = (0..state.rows.len())
            .rev()
            .find(|&index| state.materialized(index) && state.row_box(index).contains(x, y));
        if let Some(index) = target {
            state.register_click(index);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum FakeNode {
    Row { page: FakePage, index: usize },
    Image(String),
    Link(String),
}

#[async_trait]
impl Node for FakeNode {
    async fn bounding_box(&self) -> Result<Option<BoundingBox>> {
        match self {
            FakeNode::Row { page, index } => Ok(Some(page.state.lock().unwrap().row_box(*index))),
            _ => Ok(None),
        }
    }

    async fn scroll_into_view(&self) -> Result<()> {
        if let FakeNode::Row { page, index } = self {
            let mut state = page.state.lock().unwrap();
            state.scroll = state.top(*index);
        }
        Ok(())
    }

    async fn force_click(&self) -> Result<()> {
        if let FakeNode::Row { page, index } = self {
            let mut state = page.state.lock().unwrap();
            state.forced_clicks += 1;
            state.register_click(*index);
        }
        Ok(())
    }

    async fn inner_text(&self) -> Result<String> {
        match self {
            FakeNode::Row { page, index } => {
                let state = page.state.lock().unwrap();
                let row = &state.rows[*index];
                if row.broken {
                    Err(ScrapeError::Other("node is detached".to_string()))
                } else {
                    Ok(row.text.clone())
                }
            }
            _ => Ok(String::new()),
        }
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(match (self, name) {
            (FakeNode::Image(src), "src") => Some(src.clone()),
            (FakeNode::Link(href), "href") => Some(href.clone()),
            _ => None,
        })
    }

    async fn children(&self, tag: &str) -> Result<Vec<FakeNode>> {
        let FakeNode::Row { page, index } = self else {
            return Ok(Vec::new());
        };
        let state = page.state.lock().unwrap();
        let row = &state.rows[*index];

        Ok(match tag {
            "img" => {
                let mut sources = row.images.clone();
                if state.expanded[*index] {
                    sources.extend(row.hidden_images.iter().cloned());
                }
                sources.into_iter().map(FakeNode::Image).collect()
            }
            "a" => row.links.iter().cloned().map(FakeNode::Link).collect(),
            _ => Vec::new(),
        })
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleep {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleep {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleep for RecordingSleep {
    async fn sleep(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}
