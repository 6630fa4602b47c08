//! Derivation of the displayed game list from the raw slate and the user's
//! sort and filter selection.
//!
//! `derive` is a pure function: it never touches its input, always returns a
//! fresh list, and uses a stable sort so games with equal keys keep their
//! slate order across re-renders.

use std::cmp::Ordering;
use std::fmt;

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::slate::GameRecord;

/// Ordering applied to the visible games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum SortKey {
    /// Best projection confidence first
    Confidence,
    /// Most projected strikeouts first
    Strikeouts,
    /// Home starter's name, A–Z
    Pitcher,
    /// Game time string, ascending
    Time,
}

/// Subset of games kept before sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum FilterKey {
    All,
    Elite,
    HighConfidence,
}

impl SortKey {
    /// Parse a selector value. Anything unrecognized sorts by time.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "confidence" => SortKey::Confidence,
            "strikeouts" => SortKey::Strikeouts,
            "pitcher" => SortKey::Pitcher,
            _ => SortKey::Time,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Confidence => "confidence",
            SortKey::Strikeouts => "strikeouts",
            SortKey::Pitcher => "pitcher",
            SortKey::Time => "time",
        }
    }
}

impl FilterKey {
    /// Parse a selector value. Anything unrecognized keeps every game.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "elite" => FilterKey::Elite,
            "high-confidence" => FilterKey::HighConfidence,
            _ => FilterKey::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::All => "all",
            FilterKey::Elite => "elite",
            FilterKey::HighConfidence => "high-confidence",
        }
    }

    pub fn keeps(self, game: &GameRecord) -> bool {
        match self {
            FilterKey::All => true,
            FilterKey::Elite => game.is_elite(),
            FilterKey::HighConfidence => game.is_high_confidence(),
        }
    }
}

impl From<String> for SortKey {
    fn from(s: String) -> Self {
        SortKey::from_name(&s)
    }
}

impl From<String> for FilterKey {
    fn from(s: String) -> Self {
        FilterKey::from_name(&s)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter then stably sort `games` into a new list.
pub fn derive(games: &[GameRecord], sort: SortKey, filter: FilterKey) -> Vec<GameRecord> {
    let mut out: Vec<GameRecord> = games.iter().filter(|g| filter.keeps(g)).cloned().collect();
    let collator = match sort {
        SortKey::Pitcher => root_collator(),
        _ => None,
    };
    // `sort_by` is stable; equal keys keep their filtered order.
    out.sort_by(|a, b| compare(sort, collator.as_ref(), a, b));
    out
}

fn compare(
    sort: SortKey,
    collator: Option<&Collator>,
    a: &GameRecord,
    b: &GameRecord,
) -> Ordering {
    match sort {
        SortKey::Confidence => b.top_confidence().cmp(&a.top_confidence()),
        SortKey::Strikeouts => b.top_strikeouts().total_cmp(&a.top_strikeouts()),
        SortKey::Pitcher => collate(collator, &a.home_pitcher.name, &b.home_pitcher.name),
        // Plain string order: "10:10 PM ET" sorts before "7:05 PM ET".
        SortKey::Time => a.game_time.cmp(&b.game_time),
    }
}

/// Unicode root-locale collator (the CLDR default ordering).
pub fn root_collator() -> Option<Collator> {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!("Root collator unavailable, ordering names by code point: {}", e);
            None
        }
    }
}

/// Locale-aware name ordering: "Ángel" files under A, lowercase before
/// uppercase on an otherwise equal name.
pub fn collate(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(c) => c.compare(a, b),
        None => a.cmp(b),
    }
}
