pub mod leaderboard;
pub mod localize;
pub mod report;

pub use leaderboard::{ScrapeOptions, execute_scrape};
pub use localize::{LocalizeConfig, LocalizeSummary, Localizer, PageEntry};
pub use report::LeaderboardSnapshot;
