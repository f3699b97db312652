// Static page localization: mirrors English pages into a locale directory

use anyhow::{Context, bail};
use regex::{Captures, NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Hrefs containing any of these are treated as assets and never rewritten.
pub const ASSET_MARKERS: &[&str] = &[".css", ".js", ".png", ".jpg"];

/// A page to localize: source file relative to the site root and its URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub path: String,
    pub slug: String,
}

impl PageEntry {
    pub fn new(path: &str, slug: &str) -> Self {
        Self {
            path: path.to_string(),
            slug: slug.to_string(),
        }
    }
}

/// Pages that currently have a translation.
pub fn default_pages() -> Vec<PageEntry> {
    vec![
        PageEntry::new("index.html", ""),
        PageEntry::new("leaderboard/index.html", "leaderboard/"),
        PageEntry::new("guides/builds/index.html", "guides/builds/"),
        PageEntry::new(
            "guides/builds/noelle-best-build.html",
            "guides/builds/noelle-best-build",
        ),
        PageEntry::new(
            "guides/characters/fox-kitsune-guide.html",
            "guides/characters/fox-kitsune-guide",
        ),
    ]
}

/// Load a page map from a JSON array of `{"path": ..., "slug": ...}` objects.
pub fn load_pages_from_file(path: &Path) -> anyhow::Result<Vec<PageEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page map {}", path.display()))?;
    let pages: Vec<PageEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid page map {}", path.display()))?;

    if pages.is_empty() {
        bail!("No pages found in {}", path.display());
    }
    Ok(pages)
}

/// Slugs with a localized counterpart, compared without surrounding slashes.
#[derive(Debug, Clone, Default)]
pub struct KnownSlugs(HashSet<String>);

impl KnownSlugs {
    pub fn from_pages(pages: &[PageEntry]) -> Self {
        Self(
            pages
                .iter()
                .map(|page| page.slug.trim_matches('/').to_string())
                .collect(),
        )
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path.trim_matches('/'))
    }
}

pub fn is_asset(href: &str) -> bool {
    ASSET_MARKERS.iter().any(|marker| href.contains(marker))
}

#[derive(Debug, Clone)]
pub struct LocalizeConfig {
    pub base_url: String,
    pub source_locale: String,
    pub target_locale: String,
    /// Directory the page paths are relative to.
    pub root: PathBuf,
    /// Output directory, relative to `root` unless absolute.
    pub target_dir: PathBuf,
    /// Replace outputs that already exist instead of skipping them.
    pub overwrite: bool,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://megabonk.org".to_string(),
            source_locale: "en".to_string(),
            target_locale: "tr".to_string(),
            root: PathBuf::from("."),
            target_dir: PathBuf::from("tr"),
            overwrite: false,
        }
    }
}

impl LocalizeConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL '{}'", self.base_url))?;
        if self.target_locale.is_empty() || self.target_locale.contains('/') {
            bail!("Invalid target locale '{}'", self.target_locale);
        }
        Ok(())
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn source_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base(), slug)
    }

    pub fn localized_url(&self, slug: &str) -> String {
        format!("{}/{}/{}", self.base(), self.target_locale, slug)
    }

    pub fn source_path(&self, page: &PageEntry) -> PathBuf {
        self.root.join(&page.path)
    }

    pub fn target_path(&self, page: &PageEntry) -> PathBuf {
        self.root.join(&self.target_dir).join(&page.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Written(PathBuf),
    /// Output exists; left alone to keep manual edits.
    SkippedExisting(PathBuf),
    MissingSource(PathBuf),
    Failed(PathBuf, String),
}

#[derive(Debug, Clone, Default)]
pub struct LocalizeSummary {
    pub written: Vec<PathBuf>,
    pub skipped_existing: Vec<PathBuf>,
    pub missing_sources: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl LocalizeSummary {
    pub fn record(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Written(path) => self.written.push(path),
            PageOutcome::SkippedExisting(path) => self.skipped_existing.push(path),
            PageOutcome::MissingSource(path) => self.missing_sources.push(path),
            PageOutcome::Failed(path, error) => self.failed.push((path, error)),
        }
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.skipped_existing.len() + self.missing_sources.len() + self.failed.len()
    }
}

pub struct Localizer {
    config: LocalizeConfig,
    known: KnownSlugs,
    canonical: Regex,
    alternate: Regex,
    href: Regex,
}

impl Localizer {
    pub fn new(config: LocalizeConfig, pages: &[PageEntry]) -> Self {
        Self {
            config,
            known: KnownSlugs::from_pages(pages),
            canonical: Regex::new(r#"<link\s+rel=["']canonical["']\s+href=["'][^"']*["']\s*/?>"#)
                .unwrap(),
            alternate: Regex::new(
                r#"[ \t]*<link\s+rel=["']alternate["']\s+hreflang=["'][^"']*["']\s+href=["'][^"']*["']\s*/?>[ \t]*(\r?\n)?"#,
            )
            .unwrap(),
            href: Regex::new(r#"href=(["'])([^"'\n]*)["']"#).unwrap(),
        }
    }

    pub fn config(&self) -> &LocalizeConfig {
        &self.config
    }

    /// Localize the HTML of the page published at `slug`.
    ///
    /// Links are rewritten before the canonical and alternate tags are put in
    /// place, so those always point where they were generated to.
    pub fn transform(&self, html: &str, slug: &str) -> String {
        let content = self.set_language(html);
        let content = self.rewrite_links(&content);
        let content = self.replace_canonical(&content, slug);
        self.inject_alternates(&content, slug)
    }

    fn set_language(&self, html: &str) -> String {
        let from = format!(r#"<html lang="{}">"#, self.config.source_locale);
        let to = format!(r#"<html lang="{}">"#, self.config.target_locale);
        html.replacen(&from, &to, 1)
    }

    /// Every canonical tag goes; one pointing at the localized page takes the
    /// place of the first.
    fn replace_canonical(&self, html: &str, slug: &str) -> String {
        let tag = format!(
            r#"<link rel="canonical" href="{}">"#,
            self.config.localized_url(slug)
        );
        let mut first = true;
        self.canonical
            .replace_all(html, |_: &Captures| {
                if std::mem::take(&mut first) {
                    tag.clone()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }

    fn inject_alternates(&self, html: &str, slug: &str) -> String {
        if !html.contains("</head>") {
            return html.to_string();
        }
        let stripped = self.alternate.replace_all(html, NoExpand(""));

        let source_url = self.config.source_url(slug);
        let localized_url = self.config.localized_url(slug);
        let block = format!(
            concat!(
                "    <link rel=\"alternate\" hreflang=\"{src}\" href=\"{en}\" />\n",
                "    <link rel=\"alternate\" hreflang=\"{dst}\" href=\"{tr}\" />\n",
                "    <link rel=\"alternate\" hreflang=\"x-default\" href=\"{en}\" />\n",
                "</head>"
            ),
            src = self.config.source_locale,
            dst = self.config.target_locale,
            en = source_url,
            tr = localized_url,
        );
        stripped.replacen("</head>", &block, 1)
    }

    fn rewrite_links(&self, html: &str) -> String {
        self.href
            .replace_all(html, |caps: &Captures| match self.rewrite_href(&caps[2]) {
                Some(localized) => format!("href={q}{localized}{q}", q = &caps[1]),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// The localized form of `href`, or `None` if it must stay as is.
    ///
    /// Only links to pages that have a translation are rewritten; everything
    /// else keeps pointing at the English site.
    pub fn rewrite_href(&self, href: &str) -> Option<String> {
        if is_asset(href) {
            return None;
        }
        let locale = &self.config.target_locale;

        // Protocol-relative: another host.
        if href.starts_with("//") {
            return None;
        }
        if href.starts_with('/') {
            return self
                .known
                .contains(href)
                .then(|| format!("/{}{}", locale, href));
        }

        let base = self.config.base();
        let rest = href.strip_prefix(base)?;
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        self.known
            .contains(rest)
            .then(|| format!("{}/{}{}", base, locale, rest))
    }

    /// Localize one page from the source tree into the target tree.
    pub fn localize_page(&self, page: &PageEntry) -> PageOutcome {
        let source = self.config.source_path(page);
        let target = self.config.target_path(page);

        if target.exists() && !self.config.overwrite {
            info!("Keeping existing {}", target.display());
            return PageOutcome::SkippedExisting(target);
        }

        let content = match fs::read_to_string(&source) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Skipping {}: source file not found", source.display());
                return PageOutcome::MissingSource(source);
            }
            Err(e) => {
                warn!("Failed to read {}: {}", source.display(), e);
                return PageOutcome::Failed(source, e.to_string());
            }
        };

        info!("Processing {}", page.path);
        let localized = self.transform(&content, &page.slug);

        match write_page(&target, &localized) {
            Ok(()) => {
                debug!("Wrote {}", target.display());
                PageOutcome::Written(target)
            }
            Err(e) => {
                warn!("Failed to write {}: {:#}", target.display(), e);
                PageOutcome::Failed(target, format!("{:#}", e))
            }
        }
    }
}

fn write_page(target: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(target, content).with_context(|| format!("Failed to write {}", target.display()))
}

/// Localize every page of the map. Per-page problems are logged and counted,
/// never propagated.
pub fn generate(config: LocalizeConfig, pages: &[PageEntry]) -> LocalizeSummary {
    info!(
        "Localizing {} pages into {} ({})",
        pages.len(),
        config.target_dir.display(),
        config.target_locale
    );
    let localizer = Localizer::new(config, pages);

    let mut summary = LocalizeSummary::default();
    for page in pages {
        summary.record(localizer.localize_page(page));
    }

    info!(
        "Done: {} written, {} kept, {} missing, {} failed",
        summary.written.len(),
        summary.skipped_existing.len(),
        summary.missing_sources.len(),
        summary.failed.len()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localizer() -> Localizer {
        let pages = vec![
            PageEntry::new("index.html", ""),
            PageEntry::new("leaderboard/index.html", "leaderboard/"),
            PageEntry::new("guides/builds/index.html", "guides/builds/"),
        ];
        Localizer::new(LocalizeConfig::default(), &pages)
    }

    #[test]
    fn test_known_slugs_ignore_surrounding_slashes() {
        let known = KnownSlugs::from_pages(&[PageEntry::new("a.html", "guides/builds/")]);
        assert!(known.contains("/guides/builds/"));
        assert!(known.contains("guides/builds"));
        assert!(!known.contains("/guides/"));
    }

    #[test]
    fn test_rewrite_known_root_relative_link() {
        let l = localizer();
        assert_eq!(l.rewrite_href("/guides/builds/"), Some("/tr/guides/builds/".to_string()));
        assert_eq!(l.rewrite_href("/leaderboard"), Some("/tr/leaderboard".to_string()));
        assert_eq!(l.rewrite_href("/"), Some("/tr/".to_string()));
    }

    #[test]
    fn test_unknown_link_untouched() {
        let l = localizer();
        assert_eq!(l.rewrite_href("/guides/builds/unknown-page"), None);
        assert_eq!(l.rewrite_href("https://example.com/guides/builds/"), None);
        assert_eq!(l.rewrite_href("guides/builds/"), None);
        assert_eq!(l.rewrite_href("#top"), None);
    }

    #[test]
    fn test_rewrite_absolute_same_site_link() {
        let l = localizer();
        assert_eq!(
            l.rewrite_href("https://megabonk.org/guides/builds/"),
            Some("https://megabonk.org/tr/guides/builds/".to_string())
        );
        assert_eq!(
            l.rewrite_href("https://megabonk.org"),
            Some("https://megabonk.org/tr".to_string())
        );
        assert_eq!(l.rewrite_href("https://megabonk.org.evil/leaderboard/"), None);
    }

    #[test]
    fn test_asset_links_excluded_by_substring() {
        let l = localizer();
        assert!(is_asset("/style/app.css?v=2"));
        assert!(is_asset("/data/stats.json"));
        assert!(!is_asset("/guides/builds/"));
        assert_eq!(l.rewrite_href("/img/logo.png"), None);
    }

    #[test]
    fn test_already_localized_link_not_prefixed_twice() {
        let l = localizer();
        assert_eq!(l.rewrite_href("/tr/guides/builds/"), None);
    }

    #[test]
    fn test_protocol_relative_link_is_off_site() {
        let l = localizer();
        assert_eq!(l.rewrite_href("//"), None);
        assert_eq!(l.rewrite_href("//leaderboard/"), None);
        assert_eq!(l.rewrite_href("//cdn.megabonk.org/guides/builds/"), None);
    }
}
