use crate::driver::{Driver, Node, Sleep};
use crate::error::Result;
use crate::timings::{Pass, Timings};
use tracing::debug;

/// Selector of a leaderboard row; the list tags rows with their zero-based index.
pub fn row_selector(rank: u32) -> String {
    format!(r#"div[data-index="{}"]"#, rank.saturating_sub(1))
}

/// Finds rows in the virtualized list and gets them into a readable state.
pub struct RowLocator<'a, D: Driver, S: Sleep> {
    driver: &'a D,
    sleep: &'a S,
    timings: &'a Timings,
}

impl<'a, D: Driver, S: Sleep> RowLocator<'a, D, S> {
    pub fn new(driver: &'a D, sleep: &'a S, timings: &'a Timings) -> Self {
        Self {
            driver,
            sleep,
            timings,
        }
    }

    /// Locate, stabilize and expand the row for `rank`.
    ///
    /// Returns `Ok(None)` when the row never materialized. Stabilizing and
    /// expanding are best effort: the handle is returned whatever state the
    /// row ended up in.
    pub async fn acquire(&self, rank: u32, pass: Pass) -> Result<Option<D::Node>> {
        let Some(row) = self.locate(rank, pass).await? else {
            return Ok(None);
        };

        self.stabilize(&row, pass).await;

        let expanded = self.expand(&row).await;
        debug!("Rank {} expanded: {}", rank, expanded);

        Ok(Some(row))
    }

    /// Scroll until the row exists in the DOM or the attempt ceiling is hit.
    pub async fn locate(&self, rank: u32, pass: Pass) -> Result<Option<D::Node>> {
        let selector = row_selector(rank);
        let step = self.timings.search_step(pass, rank);

        for attempt in 0..=self.timings.search_attempts {
            if let Some(row) = self.driver.query(&selector).await? {
                debug!("Found rank {} after {} scrolls", rank, attempt);
                return Ok(Some(row));
            }
            if attempt == self.timings.search_attempts {
                break;
            }
            self.driver.wheel(step).await?;
            self.sleep.sleep(self.timings.search_delay).await;
        }

        Ok(None)
    }

    /// Bring the row into view and clear the fixed header overlay.
    pub async fn stabilize(&self, row: &D::Node, pass: Pass) {
        let result: Result<()> = async {
            row.scroll_into_view().await?;
            self.driver.wheel(self.timings.overlay_correction).await
        }
        .await;

        if let Err(e) = result {
            debug!("Ignoring stabilize failure: {}", e);
        }
        self.sleep.sleep(self.timings.settle(pass)).await;
    }

    /// Click the row open. Returns whether it ended up expanded.
    pub async fn expand(&self, row: &D::Node) -> bool {
        for attempt in 0..self.timings.expand_attempts {
            let bbox = match row.bounding_box().await {
                Ok(Some(bbox)) => bbox,
                Ok(None) => return false,
                Err(e) => {
                    debug!("No bounding box for row: {}", e);
                    return false;
                }
            };

            if bbox.height > self.timings.expanded_height {
                return true;
            }

            let clicked = if attempt == 0 {
                let x = bbox.x + bbox.width * self.timings.expand_click_fraction;
                let (_, y) = bbox.center();
                self.driver.click_at(x, y).await
            } else {
                row.force_click().await
            };
            if let Err(e) = clicked {
                debug!("Expand click {} failed: {}", attempt, e);
            }

            self.sleep.sleep(self.timings.expand_pause(attempt)).await;

            if let Ok(Some(after)) = row.bounding_box().await
                && after.height > bbox.height + self.timings.expand_growth
            {
                return true;
            }
        }

        false
    }
}
