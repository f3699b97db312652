use crate::CLAP_STYLING;
use bonk_core::leaderboard::{DEFAULT_LEADERBOARD_URL, DEFAULT_OUTPUT};
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("bonk")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("bonk")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Enable debug logging").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("localize")
                .about(
                    "Copy the English pages into a locale directory with localized lang, \
                canonical, hreflang and internal links.",
                )
                .arg(
                    arg!(-r --"root" <DIR>)
                        .required(false)
                        .help("Site root the page paths are relative to")
                        .default_value("."),
                )
                .arg(
                    arg!(-d --"target-dir" <DIR>)
                        .required(false)
                        .help("Output directory, relative to the root unless absolute (default: the locale)"),
                )
                .arg(
                    arg!(-b --"base-url" <URL>)
                        .required(false)
                        .help("Public base URL of the site")
                        .value_parser(clap::value_parser!(Url))
                        .default_value("https://megabonk.org"),
                )
                .arg(
                    arg!(-l --"locale" <TAG>)
                        .required(false)
                        .help("Target locale")
                        .default_value("tr"),
                )
                .arg(
                    arg!(--"source-locale" <TAG>)
                        .required(false)
                        .help("Locale of the source pages")
                        .default_value("en"),
                )
                .arg(
                    arg!(-p --"pages" <PATH>)
                        .required(false)
                        .help("JSON page map of [{\"path\": ..., \"slug\": ...}] (default: built-in map)"),
                )
                .arg(
                    arg!(-f --"force")
                        .required(false)
                        .help("Overwrite localized pages that already exist")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("leaderboard")
                .about("Scrape the community leaderboard into a JSON snapshot using headless Chromium.")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Leaderboard page to scrape")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_LEADERBOARD_URL),
                )
                .arg(
                    arg!(-n --"count" <NUM>)
                        .required(false)
                        .help("Number of ranks to collect")
                        .value_parser(clap::value_parser!(u32).range(1..))
                        .default_value("150"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the snapshot")
                        .default_value(DEFAULT_OUTPUT),
                )
                .arg(
                    arg!(--"show-browser")
                        .required(false)
                        .help("Run Chromium with a visible window")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
