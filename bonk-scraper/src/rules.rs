// Image classification for leaderboard rows.
//
// Rows show weapons, tomes, items, a flag and a character portrait as plain
// <img> tags. The only thing telling them apart is the asset path.

use crate::record::Country;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    Weapon,
    Tome,
    Item,
    Flag,
    Character,
    /// Logos of external platforms (stream links, chat invites).
    Brand,
}

/// Ordered rule table: the first pattern contained in the image source wins.
pub const IMAGE_RULES: &[(&str, ImageCategory)] = &[
    ("/weapon/", ImageCategory::Weapon),
    ("/tome/", ImageCategory::Tome),
    ("/passive/", ImageCategory::Item),
    ("/item/", ImageCategory::Item),
    ("/flags/", ImageCategory::Flag),
    ("/characters/", ImageCategory::Character),
    ("twitch", ImageCategory::Brand),
    ("youtube", ImageCategory::Brand),
    ("discord", ImageCategory::Brand),
];

/// Returns `None` when no rule matches; see [`Loadout::add_image`] for the
/// fallback applied in that case.
pub fn classify(src: &str) -> Option<ImageCategory> {
    IMAGE_RULES
        .iter()
        .find(|(pattern, _)| src.contains(pattern))
        .map(|(_, category)| *category)
}

/// Identifier of an asset: file name of the source URL up to the first dot.
///
/// `https://cdn.example/img/weapon/sword.png?v=3` -> `sword`
pub fn asset_id(src: &str) -> String {
    if src.is_empty() {
        return String::new();
    }
    let path = src.split('?').next().unwrap_or(src);
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name.split('.').next().unwrap_or(file_name).to_string()
}

/// Everything a row's images say about a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loadout {
    pub weapons: Vec<String>,
    pub tomes: Vec<String>,
    pub items: Vec<String>,
    pub character: String,
    pub country: Option<Country>,
}

impl Loadout {
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = &'a str>) -> Self {
        let mut loadout = Self::default();
        for src in sources {
            loadout.add_image(src);
        }
        loadout
    }

    pub fn add_image(&mut self, src: &str) {
        if src.is_empty() {
            return;
        }
        let id = asset_id(src);

        match classify(src) {
            Some(ImageCategory::Weapon) => push_unique(&mut self.weapons, id),
            Some(ImageCategory::Tome) => push_unique(&mut self.tomes, id),
            Some(ImageCategory::Item) => push_unique(&mut self.items, id),
            // Last flag and last portrait in the row win.
            Some(ImageCategory::Flag) => self.country = Some(Country::from_flag(&id)),
            Some(ImageCategory::Character) => self.character = id,
            Some(ImageCategory::Brand) => {}
            None => {
                if self.is_known(&id) {
                    return;
                }
                // Unrecognized asset types end up here too.
                debug!("Unclassified image {} filed as item '{}'", src, id);
                self.items.push(id);
            }
        }
    }

    fn is_known(&self, id: &str) -> bool {
        self.items.iter().any(|i| i == id)
            || self.weapons.iter().any(|w| w == id)
            || self.tomes.iter().any(|t| t == id)
            || self.character == id
    }
}

fn push_unique(list: &mut Vec<String>, id: String) {
    if !list.contains(&id) {
        list.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id() {
        assert_eq!(asset_id("https://cdn.x/img/weapon/sword.png"), "sword");
        assert_eq!(asset_id("/img/tome/fire.v2.webp?cache=1"), "fire");
        assert_eq!(asset_id("plain"), "plain");
        assert_eq!(asset_id(""), "");
    }

    #[test]
    fn test_classify_rule_order() {
        assert_eq!(classify("/img/weapon/sword.png"), Some(ImageCategory::Weapon));
        assert_eq!(classify("/img/tome/fire.png"), Some(ImageCategory::Tome));
        assert_eq!(classify("/img/passive/luck.png"), Some(ImageCategory::Item));
        assert_eq!(classify("/img/item/boots.png"), Some(ImageCategory::Item));
        assert_eq!(classify("/img/flags/tr.svg"), Some(ImageCategory::Flag));
        assert_eq!(classify("/img/characters/fox.png"), Some(ImageCategory::Character));
        assert_eq!(classify("/logos/twitch.svg"), Some(ImageCategory::Brand));
        assert_eq!(classify("/logos/discord.svg"), Some(ImageCategory::Brand));
        // Category paths take precedence over brand names.
        assert_eq!(classify("/img/weapon/youtube.png"), Some(ImageCategory::Weapon));
        assert_eq!(classify("/img/misc/thing.png"), None);
    }

    #[test]
    fn test_loadout_dedups_in_first_seen_order() {
        let loadout = Loadout::from_sources([
            "/img/weapon/sword.png",
            "/img/weapon/bow.png",
            "/img/weapon/sword.png",
            "/img/item/boots.png",
            "/img/passive/boots.png",
        ]);
        assert_eq!(loadout.weapons, vec!["sword", "bow"]);
        assert_eq!(loadout.items, vec!["boots"]);
    }

    #[test]
    fn test_last_flag_and_character_win() {
        let loadout = Loadout::from_sources([
            "/img/flags/de.svg",
            "/img/characters/fox.png",
            "/img/flags/tr.svg",
            "/img/characters/noelle.png",
        ]);
        assert_eq!(loadout.country, Some(Country::from_flag("tr")));
        assert_eq!(loadout.character, "noelle");
    }

    #[test]
    fn test_fallback_files_unknown_images_as_items() {
        let loadout = Loadout::from_sources([
            "/img/characters/fox.png",
            "/img/weapon/sword.png",
            "/img/misc/fox.png",
            "/img/misc/sword.png",
            "/img/misc/clover.png",
            "/img/misc/clover.png",
            "/logos/youtube.png",
        ]);
        assert_eq!(loadout.items, vec!["clover"]);
    }
}
