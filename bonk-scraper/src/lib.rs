pub mod chrome;
pub mod collector;
pub mod driver;
pub mod error;
pub mod extract;
pub mod locator;
pub mod record;
pub mod rules;
pub mod timings;

pub use chrome::{ChromeDriver, LaunchOptions};
pub use collector::{Collection, Collector, Phase, ProgressCallback};
pub use driver::{BoundingBox, Driver, Node, NoSleep, Sleep, TokioSleep};
pub use error::ScrapeError;
pub use record::{Country, LeaderboardRecord};
pub use timings::{Pass, Timings};
