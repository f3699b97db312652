use crate::driver::Node;
use crate::error::Result;
use crate::record::{LeaderboardRecord, parse_score};
use crate::rules::Loadout;
use regex::Regex;
use std::sync::LazyLock;

static SCORE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+(\.\d+)?[mk]?$").expect("score pattern compiles"));

const VIDEO_MARKERS: &[&str] = &["twitch", "youtu"];

/// Split a row's visible text into trimmed, non-empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(['\n', '|'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// The first score-looking token and the token right after it.
///
/// Falls back to `("0", "Unknown")`.
pub fn score_and_name(tokens: &[String]) -> (String, String) {
    for (idx, token) in tokens.iter().enumerate() {
        if SCORE_TOKEN.is_match(token) {
            let name = tokens
                .get(idx + 1)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());
            return (token.clone(), name);
        }
    }
    ("0".to_string(), "Unknown".to_string())
}

pub fn video_url<'a>(hrefs: impl IntoIterator<Item = &'a str>) -> String {
    hrefs
        .into_iter()
        .find(|href| VIDEO_MARKERS.iter().any(|marker| href.contains(marker)))
        .unwrap_or_default()
        .to_string()
}

/// Assemble a record from what a row exposes: image sources, visible text
/// and link targets.
pub fn build_record<'a>(
    rank: u32,
    image_sources: impl IntoIterator<Item = &'a str>,
    text: &str,
    hrefs: impl IntoIterator<Item = &'a str>,
) -> LeaderboardRecord {
    let loadout = Loadout::from_sources(image_sources);
    let (score, player_name) = score_and_name(&tokenize(text));

    LeaderboardRecord {
        rank,
        player_name,
        kills: parse_score(&score),
        character: loadout.character,
        country: loadout.country,
        weapons: loadout.weapons,
        tomes: loadout.tomes,
        items: loadout.items,
        video_url: video_url(hrefs),
    }
}

/// Read a row through the browser and build its record.
///
/// Any browser error fails the whole row; no partial record is returned.
pub async fn extract_record<N: Node>(rank: u32, row: &N) -> Result<LeaderboardRecord> {
    let mut sources = Vec::new();
    for img in row.children("img").await? {
        if let Some(src) = img.attribute("src").await? {
            sources.push(src);
        }
    }

    let text = row.inner_text().await?;

    let mut hrefs = Vec::new();
    for link in row.children("a").await? {
        if let Some(href) = link.attribute("href").await? {
            hrefs.push(href);
        }
    }

    Ok(build_record(
        rank,
        sources.iter().map(String::as_str),
        &text,
        hrefs.iter().map(String::as_str),
    ))
}
