//! The fixed set of upstream GTFS-RT feed bundles and the line-to-bundle table.

use std::collections::HashSet;

/// One upstream real-time endpoint covering a fixed family of line codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedBundle {
    Ace,
    Bdfm,
    G,
    Jz,
    Nqrw,
    L,
    Numeric,
    Seven,
}

const FEED_BASE: &str = "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/nyct%2Fgtfs";

impl FeedBundle {
    pub const ALL: [FeedBundle; 8] = [
        FeedBundle::Ace,
        FeedBundle::Bdfm,
        FeedBundle::G,
        FeedBundle::Jz,
        FeedBundle::Nqrw,
        FeedBundle::L,
        FeedBundle::Numeric,
        FeedBundle::Seven,
    ];

    pub fn url(&self) -> String {
        match self {
            FeedBundle::Ace => format!("{FEED_BASE}-ace"),
            FeedBundle::Bdfm => format!("{FEED_BASE}-bdfm"),
            FeedBundle::G => format!("{FEED_BASE}-g"),
            FeedBundle::Jz => format!("{FEED_BASE}-jz"),
            FeedBundle::Nqrw => format!("{FEED_BASE}-nqrw"),
            FeedBundle::L => format!("{FEED_BASE}-l"),
            FeedBundle::Numeric => FEED_BASE.to_string(),
            FeedBundle::Seven => format!("{FEED_BASE}-7"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedBundle::Ace => "ace",
            FeedBundle::Bdfm => "bdfm",
            FeedBundle::G => "g",
            FeedBundle::Jz => "jz",
            FeedBundle::Nqrw => "nqrw",
            FeedBundle::L => "l",
            FeedBundle::Numeric => "123456",
            FeedBundle::Seven => "7",
        }
    }
}

impl std::fmt::Display for FeedBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static membership table from line code to its feed bundle.
/// Lines absent from every family resolve to `None` and are ignored.
pub fn bundle_for_line(line: &str) -> Option<FeedBundle> {
    match line {
        "A" | "C" | "E" => Some(FeedBundle::Ace),
        "B" | "D" | "F" | "M" => Some(FeedBundle::Bdfm),
        "G" => Some(FeedBundle::G),
        "J" | "Z" => Some(FeedBundle::Jz),
        "N" | "Q" | "R" | "W" => Some(FeedBundle::Nqrw),
        "L" => Some(FeedBundle::L),
        "1" | "2" | "3" | "4" | "5" | "6" => Some(FeedBundle::Numeric),
        "7" => Some(FeedBundle::Seven),
        _ => None,
    }
}

/// The deduplicated set of bundles covering the given lines.
/// No ordering guarantee; every bundle is queried independently.
pub fn bundles_for_lines<'a, I>(lines: I) -> HashSet<FeedBundle>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().filter_map(bundle_for_line).collect()
}
