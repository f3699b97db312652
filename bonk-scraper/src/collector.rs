use crate::driver::{Driver, Sleep};
use crate::error::Result;
use crate::extract::extract_record;
use crate::locator::{RowLocator, row_selector};
use crate::record::LeaderboardRecord;
use crate::timings::{Pass, Timings};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Sequential pass over ranks 1..=N.
    Sweep,
    /// Retries for ranks that are missing or have no items.
    Repair,
}

/// Called with the phase, the rank about to be processed and the number of
/// ranks that phase will visit.
pub type ProgressCallback = Arc<dyn Fn(Phase, u32, usize) + Send + Sync>;

/// Whether `candidate` should take the place of what is stored for its rank.
pub fn should_replace(existing: Option<&LeaderboardRecord>, candidate: &LeaderboardRecord) -> bool {
    match existing {
        None => true,
        Some(current) => candidate.is_complete() && !current.is_complete(),
    }
}

/// Records collected so far, keyed by rank.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    records: BTreeMap<u32, LeaderboardRecord>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `candidate` if it beats the current record. Returns whether it was stored.
    pub fn offer(&mut self, candidate: LeaderboardRecord) -> bool {
        let rank = candidate.rank;
        if should_replace(self.records.get(&rank), &candidate) {
            self.records.insert(rank, candidate);
            true
        } else {
            false
        }
    }

    pub fn get(&self, rank: u32) -> Option<&LeaderboardRecord> {
        self.records.get(&rank)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ranks in `1..=target` that are absent or have an empty item list.
    pub fn retry_ranks(&self, target: u32) -> Vec<u32> {
        (1..=target)
            .filter(|rank| !self.records.get(rank).is_some_and(LeaderboardRecord::is_complete))
            .collect()
    }

    /// Records in ascending rank order; ranks that never produced one are skipped.
    pub fn into_sorted(self) -> Vec<LeaderboardRecord> {
        self.records.into_values().collect()
    }
}

impl FromIterator<LeaderboardRecord> for Collection {
    fn from_iter<I: IntoIterator<Item = LeaderboardRecord>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for record in iter {
            collection.offer(record);
        }
        collection
    }
}

/// Drives the two collection phases against an open leaderboard page.
pub struct Collector<'a, D: Driver, S: Sleep> {
    driver: &'a D,
    sleep: &'a S,
    timings: &'a Timings,
    progress_callback: Option<ProgressCallback>,
}

impl<'a, D: Driver, S: Sleep> Collector<'a, D, S> {
    pub fn new(driver: &'a D, sleep: &'a S, timings: &'a Timings) -> Self {
        Self {
            driver,
            sleep,
            timings,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Navigate to the leaderboard and wait for the first row.
    pub async fn open(&self, url: &str) -> Result<()> {
        info!("Opening {}", url);
        self.driver
            .goto(url, self.timings.navigation_timeout)
            .await?;
        self.driver
            .wait_for_selector(&row_selector(1), self.timings.initial_selector_timeout)
            .await
    }

    pub async fn run(&self, target: u32) -> Collection {
        let mut collection = Collection::new();
        self.sweep(target, &mut collection).await;
        self.repair(target, &mut collection).await;
        collection
    }

    pub async fn sweep(&self, target: u32, collection: &mut Collection) {
        info!("Sweeping ranks 1-{}", target);

        for rank in 1..=target {
            self.report(Phase::Sweep, rank, target as usize);

            match self.collect_rank(rank, Pass::Initial).await {
                Some(record) => {
                    let status = if record.is_complete() { "ok" } else { "needs repair" };
                    info!(
                        "#{} {} | items: {} ({})",
                        rank,
                        record.player_name,
                        record.items.len(),
                        status
                    );
                    collection.offer(record);
                }
                None => warn!("#{} collection failed", rank),
            }
        }
    }

    pub async fn repair(&self, target: u32, collection: &mut Collection) {
        let pending = collection.retry_ranks(target);
        if pending.is_empty() {
            info!("No incomplete ranks, nothing to repair");
            return;
        }
        info!("Repairing {} incomplete ranks: {:?}", pending.len(), pending);

        for &rank in &pending {
            self.report(Phase::Repair, rank, pending.len());

            let mut repaired = false;
            for attempt in 1..=self.timings.retry_attempts {
                if let Some(record) = self.collect_rank(rank, Pass::Retry).await {
                    let complete = record.is_complete();
                    let items = record.items.len();
                    collection.offer(record);
                    if complete {
                        info!("#{} repaired, items: {}", rank, items);
                        repaired = true;
                        break;
                    }
                }

                debug!("#{} repair attempt {} failed", rank, attempt);
                if let Err(e) = self.driver.wheel(self.timings.retry_nudge).await {
                    debug!("Nudge scroll failed: {}", e);
                }
                self.sleep.sleep(self.timings.retry_delay).await;
            }

            if !repaired {
                warn!("Giving up on #{}; it may have no items", rank);
            }
        }
    }

    /// One locate/stabilize/expand/extract round. Failures are logged and
    /// reported as `None`.
    pub async fn collect_rank(&self, rank: u32, pass: Pass) -> Option<LeaderboardRecord> {
        let locator = RowLocator::new(self.driver, self.sleep, self.timings);

        let row = match locator.acquire(rank, pass).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                warn!("Could not find rank {}", rank);
                return None;
            }
            Err(e) => {
                warn!("Error locating rank {}: {}", rank, e);
                return None;
            }
        };

        match extract_record(rank, &row).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Error extracting rank {}: {}", rank, e);
                None
            }
        }
    }

    fn report(&self, phase: Phase, rank: u32, total: usize) {
        if let Some(ref callback) = self.progress_callback {
            callback(phase, rank, total);
        }
    }
}
