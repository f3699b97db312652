use bonk_core::localize::{self, LocalizeConfig, LocalizeSummary, PageEntry};
use bonk_core::report::{self, LeaderboardSnapshot};
use bonk_core::{ScrapeOptions, execute_scrape};
use clap::ArgMatches;
use colored::Colorize;
use std::path::{Path, PathBuf};
use url::Url;

const BANNER: &str = r#"
   __                __
  / /_  ____  ____  / /__
 / __ \/ __ \/ __ \/ //_/
/ /_/ / /_/ / / / / ,<
/_.___/\____/_/ /_/_/|_|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_magenta().bold());
    println!(
        "  {} {}\n",
        "megabonk.org tooling".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

// Helper functions for the localize handler

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Use the page map from a file if one was given, otherwise the built-in map
pub fn load_page_map(pages_file: Option<&Path>) -> Result<Vec<PageEntry>, String> {
    match pages_file {
        Some(path) => localize::load_pages_from_file(path).map_err(|e| format!("{:#}", e)),
        None => Ok(localize::default_pages()),
    }
}

/// Assemble and validate the localizer configuration from command line values.
/// The target directory defaults to the locale name.
pub fn build_localize_config(
    root: &str,
    target_dir: Option<&str>,
    base_url: &Url,
    source_locale: &str,
    target_locale: &str,
    overwrite: bool,
) -> Result<LocalizeConfig, String> {
    let config = LocalizeConfig {
        base_url: base_url.as_str().trim_end_matches('/').to_string(),
        source_locale: source_locale.to_string(),
        target_locale: target_locale.to_string(),
        root: expand_path(root),
        target_dir: target_dir
            .map(expand_path)
            .unwrap_or_else(|| PathBuf::from(target_locale)),
        overwrite,
    };
    config.validate().map_err(|e| format!("{:#}", e))?;
    Ok(config)
}

pub fn format_localize_summary(summary: &LocalizeSummary) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "{} {} written\n",
        "✓".green().bold(),
        summary.written.len()
    ));
    for path in &summary.written {
        report.push_str(&format!("    {}\n", path.display().to_string().bright_white()));
    }
    if !summary.skipped_existing.is_empty() {
        report.push_str(&format!(
            "{} {} kept (already localized, use --force to overwrite)\n",
            "→".blue().bold(),
            summary.skipped_existing.len()
        ));
        for path in &summary.skipped_existing {
            report.push_str(&format!("    {}\n", path.display()));
        }
    }
    if !summary.missing_sources.is_empty() {
        report.push_str(&format!(
            "{} {} skipped (source not found)\n",
            "⚠".yellow().bold(),
            summary.missing_sources.len()
        ));
        for path in &summary.missing_sources {
            report.push_str(&format!("    {}\n", path.display()));
        }
    }
    if !summary.failed.is_empty() {
        report.push_str(&format!(
            "{} {} failed\n",
            "✗".red().bold(),
            summary.failed.len()
        ));
        for (path, error) in &summary.failed {
            report.push_str(&format!("    {}: {}\n", path.display(), error));
        }
    }
    report
}

pub fn handle_localize(args: &ArgMatches) {
    let root = args.get_one::<String>("root").unwrap();
    let target_dir = args.get_one::<String>("target-dir").map(String::as_str);
    let base_url = args.get_one::<Url>("base-url").unwrap();
    let target_locale = args.get_one::<String>("locale").unwrap();
    let source_locale = args.get_one::<String>("source-locale").unwrap();
    let pages_file = args.get_one::<String>("pages").map(|p| expand_path(p));
    let force = args.get_flag("force");

    let pages = match load_page_map(pages_file.as_deref()) {
        Ok(pages) => pages,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let config = match build_localize_config(
        root,
        target_dir,
        base_url,
        source_locale,
        target_locale,
        force,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    print_divider();
    println!(
        "{}",
        format!("  LOCALIZE {} → {}", source_locale, target_locale)
            .bright_white()
            .bold()
    );
    print_divider();
    println!(
        "{} Pages: {}",
        "→".blue(),
        pages.len().to_string().bright_white()
    );
    println!(
        "{} Output: {}",
        "→".blue(),
        config
            .root
            .join(&config.target_dir)
            .display()
            .to_string()
            .bright_white()
    );
    println!();

    let summary = localize::generate(config, &pages);

    println!();
    print!("{}", format_localize_summary(&summary));
}

// Helper functions for the leaderboard handler

pub fn scrape_options(url: &Url, count: u32, show_browser: bool, quiet: bool) -> ScrapeOptions {
    ScrapeOptions {
        url: url.as_str().to_string(),
        count,
        headless: !show_browser,
        show_progress_bars: !quiet,
        ..ScrapeOptions::default()
    }
}

pub async fn handle_leaderboard(args: &ArgMatches, quiet: bool) {
    let url = args.get_one::<Url>("url").unwrap();
    let count = *args.get_one::<u32>("count").unwrap();
    let output = expand_path(args.get_one::<String>("output").unwrap());
    let show_browser = args.get_flag("show-browser");

    print_divider();
    println!("{}", "  LEADERBOARD SNAPSHOT".bright_white().bold());
    print_divider();
    println!("{} Source: {}", "→".blue(), url.as_str().bright_white());
    println!("{} Ranks: {}", "→".blue(), count.to_string().bright_white());
    println!(
        "{} Output: {}",
        "→".blue(),
        output.display().to_string().bright_white()
    );
    println!();

    let options = scrape_options(url, count, show_browser, quiet);
    let snapshot: LeaderboardSnapshot = match execute_scrape(options).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{} Scrape failed: {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = report::write_snapshot(&snapshot, &output) {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }

    println!(
        "{} Saved {} records to {}",
        "✓".green().bold(),
        snapshot.count,
        output.display().to_string().bright_white()
    );
    println!();
    print!("{}", report::generate_text_summary(&snapshot, count));
}
