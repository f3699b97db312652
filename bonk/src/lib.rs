// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_localize_config, expand_path, format_localize_summary, load_page_map, scrape_options,
};

// Re-export the library entry points from bonk-core
pub use bonk_core::{
    LeaderboardSnapshot, LocalizeConfig, LocalizeSummary, PageEntry, ScrapeOptions,
    execute_scrape,
};
