use serde::{Deserialize, Deserializer, Serialize};

/// A game is an elite pick when either starter projects at least this many strikeouts.
pub const ELITE_STRIKEOUTS: f64 = 8.5;

/// A game is high-confidence when either projection is at least this confident (percent).
pub const HIGH_CONFIDENCE: u8 = 75;

/// Lower bound of the "fair" confidence tier on a pitcher card.
pub const FAIR_CONFIDENCE: u8 = 65;

/// Number of expected batters shown as key matchups under each pitcher.
pub const KEY_MATCHUPS: usize = 4;

/// One scheduled matchup on today's slate.
///
/// Field names are the canonical camelCase spelling; the aliases cover the
/// snake_case variant some upstream producers emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Stable list key. Upstream sends either a number or a string.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    #[serde(alias = "home_team")]
    pub home_team: Team,
    #[serde(alias = "away_team")]
    pub away_team: Team,
    /// Display start time, e.g. "7:05 PM ET"
    #[serde(alias = "game_time")]
    pub game_time: String,
    #[serde(alias = "home_pitcher")]
    pub home_pitcher: PitcherRecord,
    #[serde(alias = "away_pitcher")]
    pub away_pitcher: PitcherRecord,
    #[serde(alias = "team_stats")]
    pub team_stats: TeamStats,
    /// Relevance-ordered; never re-sorted by the board.
    #[serde(alias = "expected_batters", default)]
    pub expected_batters: Vec<BatterRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(alias = "abbr")]
    pub abbreviation: String,
    #[serde(default)]
    pub logo: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    #[serde(rename = "L", alias = "l")]
    Left,
    #[serde(rename = "R", alias = "r")]
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitcherRecord {
    pub name: String,
    #[serde(alias = "handedness")]
    pub hand: Hand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub stats: PitcherStats,
    pub projection: Projection,
}

/// Rate statistics, display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitcherStats {
    pub k9: f64,
    #[serde(alias = "k_percent")]
    pub k_percent: f64,
    #[serde(alias = "whiff_rate")]
    pub whiff_rate: f64,
    #[serde(alias = "swing_strike_rate")]
    pub swing_strike_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whip: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    #[serde(alias = "strikeouts", alias = "projected_strikeouts")]
    pub projected_strikeouts: f64,
    /// 0–100
    pub confidence: u8,
    /// Over/under description, e.g. "Over 7.5"
    #[serde(alias = "betting_line")]
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub home: HandSplits,
    pub away: HandSplits,
}

/// Team strikeout rate (percent) against right- and left-handed pitching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandSplits {
    #[serde(rename = "vsRHP")]
    pub vs_rhp: f64,
    #[serde(rename = "vsLHP")]
    pub vs_lhp: f64,
}

impl HandSplits {
    pub fn against(&self, hand: Hand) -> f64 {
        match hand {
            Hand::Right => self.vs_rhp,
            Hand::Left => self.vs_lhp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterRecord {
    pub name: String,
    #[serde(alias = "handedness")]
    pub hand: Hand,
    #[serde(alias = "k_rate")]
    pub k_rate: f64,
    /// Career strikeouts against the opposing starter
    #[serde(alias = "vs_pitcher_history")]
    pub vs_opponent: u32,
}

/// Colour band of a pitcher's projection confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Strong,
    Fair,
    Weak,
}

impl ConfidenceTier {
    pub fn of(confidence: u8) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            ConfidenceTier::Strong
        } else if confidence >= FAIR_CONFIDENCE {
            ConfidenceTier::Fair
        } else {
            ConfidenceTier::Weak
        }
    }
}

impl PitcherRecord {
    pub fn confidence_tier(&self) -> ConfidenceTier {
        ConfidenceTier::of(self.projection.confidence)
    }
}

impl GameRecord {
    pub fn top_strikeouts(&self) -> f64 {
        self.home_pitcher
            .projection
            .projected_strikeouts
            .max(self.away_pitcher.projection.projected_strikeouts)
    }

    pub fn top_confidence(&self) -> u8 {
        self.home_pitcher
            .projection
            .confidence
            .max(self.away_pitcher.projection.confidence)
    }

    pub fn is_elite(&self) -> bool {
        self.top_strikeouts() >= ELITE_STRIKEOUTS
    }

    pub fn is_high_confidence(&self) -> bool {
        self.top_confidence() >= HIGH_CONFIDENCE
    }

    /// Strikeout rate of the lineup the home starter faces.
    pub fn home_pitcher_matchup_rate(&self) -> f64 {
        self.team_stats.away.against(self.home_pitcher.hand)
    }

    /// Strikeout rate of the lineup the away starter faces.
    pub fn away_pitcher_matchup_rate(&self) -> f64 {
        self.team_stats.home.against(self.away_pitcher.hand)
    }

    pub fn key_matchups(&self) -> &[BatterRecord] {
        let n = self.expected_batters.len().min(KEY_MATCHUPS);
        &self.expected_batters[..n]
    }
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
