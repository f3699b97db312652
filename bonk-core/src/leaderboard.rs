use crate::report::LeaderboardSnapshot;
use anyhow::Context;
use bonk_scraper::{
    ChromeDriver, Collector, LaunchOptions, Phase, ProgressCallback, Timings, TokioSleep,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_LEADERBOARD_URL: &str = "https://megabonk.fun";
pub const DEFAULT_TARGET_COUNT: u32 = 150;
pub const DEFAULT_OUTPUT: &str = "leaderboard-data.json";

/// Options for configuring a leaderboard scrape
pub struct ScrapeOptions {
    pub url: String,
    pub count: u32,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub show_progress_bars: bool,
    pub timings: Timings,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_LEADERBOARD_URL.to_string(),
            count: DEFAULT_TARGET_COUNT,
            headless: true,
            window_size: (1400, 900),
            show_progress_bars: true,
            timings: Timings::default(),
        }
    }
}

fn progress_callback(pb: Arc<ProgressBar>) -> ProgressCallback {
    Arc::new(move |phase: Phase, rank: u32, total: usize| {
        match phase {
            Phase::Sweep => {
                pb.set_length(total as u64);
                pb.set_position(u64::from(rank.saturating_sub(1)));
                pb.set_message(format!("Collecting #{}", rank));
            }
            Phase::Repair => {
                pb.set_message(format!("Repairing #{} ({} incomplete)", rank, total));
            }
        }
        pb.tick();
    })
}

/// Launch a browser, collect the leaderboard and return the snapshot.
///
/// Setup failures (browser launch, navigation, the list never rendering) are
/// errors. Individual ranks that fail are simply missing from the snapshot.
pub async fn execute_scrape(options: ScrapeOptions) -> anyhow::Result<LeaderboardSnapshot> {
    let ScrapeOptions {
        url,
        count,
        headless,
        window_size,
        show_progress_bars,
        timings,
    } = options;

    Url::parse(&url).with_context(|| format!("Invalid leaderboard URL '{}'", url))?;

    let launch = LaunchOptions::new(headless, window_size, &timings);
    let driver = ChromeDriver::launch(&launch)
        .await
        .context("Failed to launch Chromium")?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new(u64::from(count));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        Some(Arc::new(pb))
    } else {
        None
    };

    let sleep = TokioSleep;
    let outcome = {
        let mut collector = Collector::new(&driver, &sleep, &timings);
        if let Some(ref pb) = progress_bar {
            collector = collector.with_progress_callback(progress_callback(pb.clone()));
        }
        match collector.open(&url).await {
            Ok(()) => Ok(collector.run(count).await),
            Err(e) => Err(e),
        }
    };

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }
    if let Err(e) = driver.close().await {
        warn!("Failed to close browser: {}", e);
    }

    let collection =
        outcome.with_context(|| format!("Failed to open leaderboard at {}", url))?;
    info!("Collected {} of {} ranks", collection.len(), count);

    Ok(LeaderboardSnapshot::capture(collection.into_sorted()))
}
