use serde::{Deserialize, Serialize};

/// Country shown next to a player, taken from the flag icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

impl Country {
    pub fn from_flag(id: &str) -> Self {
        Self {
            code: id.to_string(),
            name: id.to_string(),
        }
    }
}

/// One ranked entry of the leaderboard, in the shape consumed by the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRecord {
    pub rank: u32,
    pub player_name: String,
    pub kills: u64,
    pub character: String,
    pub country: Option<Country>,
    pub weapons: Vec<String>,
    pub tomes: Vec<String>,
    pub items: Vec<String>,
    #[serde(rename = "videoURL")]
    pub video_url: String,
}

impl LeaderboardRecord {
    pub fn new(rank: u32) -> Self {
        Self {
            rank,
            player_name: "Unknown".to_string(),
            kills: 0,
            character: String::new(),
            country: None,
            weapons: Vec::new(),
            tomes: Vec::new(),
            items: Vec::new(),
            video_url: String::new(),
        }
    }

    /// A record only counts as complete once its item list was captured.
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Normalize a displayed score such as `1.2m`, `3k` or `1,234`.
///
/// Thousands separators are dropped, an `m` or `k` suffix scales the value
/// (fraction truncated) and anything unparsable yields zero.
pub fn parse_score(raw: &str) -> u64 {
    let s = raw.trim().to_lowercase().replace(',', "");

    let (number, multiplier) = if let Some(n) = s.strip_suffix('m') {
        (n, 1_000_000)
    } else if let Some(n) = s.strip_suffix('k') {
        (n, 1_000)
    } else {
        return s.parse().unwrap_or(0);
    };

    scale_decimal(number.trim(), multiplier).unwrap_or(0)
}

fn scale_decimal(number: &str, multiplier: u64) -> Option<u64> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut value = whole.checked_mul(multiplier)?;

    let mut scale = multiplier;
    for digit in fraction.bytes() {
        scale /= 10;
        if scale == 0 {
            break;
        }
        value = value.checked_add(u64::from(digit - b'0') * scale)?;
    }

    Some(value)
}
