// Leaderboard snapshot output

use anyhow::Context;
use bonk_scraper::LeaderboardRecord;
use chrono::{DateTime, Local};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The file the site loads: records in rank order plus capture metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub count: usize,
    pub fetched_at: String,
    pub data: Vec<LeaderboardRecord>,
}

impl LeaderboardSnapshot {
    pub fn new(mut records: Vec<LeaderboardRecord>, fetched_at: DateTime<Local>) -> Self {
        records.sort_by_key(|record| record.rank);
        Self {
            count: records.len(),
            fetched_at: fetched_at.format(TIMESTAMP_FORMAT).to_string(),
            data: records,
        }
    }

    pub fn capture(records: Vec<LeaderboardRecord>) -> Self {
        Self::new(records, Local::now())
    }

    pub fn incomplete(&self) -> impl Iterator<Item = &LeaderboardRecord> {
        self.data.iter().filter(|record| !record.is_complete())
    }
}

/// Pretty JSON with four-space indentation; non-ASCII names are kept as is.
pub fn generate_json_report(snapshot: &LeaderboardSnapshot) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    snapshot.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(serde_json::Error::custom)
}

pub fn generate_text_summary(snapshot: &LeaderboardSnapshot, target: u32) -> String {
    let mut report = String::new();
    report.push_str(&format!("  Records: {} of {}\n", snapshot.count, target));
    report.push_str(&format!("  Fetched at: {}\n", snapshot.fetched_at));

    let missing = target as usize - snapshot.count.min(target as usize);
    report.push_str(&format!("  Missing ranks: {}\n", missing));

    let incomplete: Vec<String> = snapshot
        .incomplete()
        .map(|record| format!("#{}", record.rank))
        .collect();
    if incomplete.is_empty() {
        report.push_str("  Without items: none\n");
    } else {
        report.push_str(&format!("  Without items: {}\n", incomplete.join(", ")));
    }

    if !snapshot.data.is_empty() {
        report.push_str("\n  Top players:\n");
        for record in snapshot.data.iter().take(3) {
            report.push_str(&format!(
                "    #{:<3} {} ({} kills, {})\n",
                record.rank,
                record.player_name,
                record.kills,
                if record.character.is_empty() { "?" } else { record.character.as_str() }
            ));
        }
    }
    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn write_snapshot(snapshot: &LeaderboardSnapshot, path: &Path) -> anyhow::Result<()> {
    let json = generate_json_report(snapshot).context("Failed to serialize leaderboard")?;
    save_report(&json, path).with_context(|| format!("Failed to write {}", path.display()))
}
