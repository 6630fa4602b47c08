//! Turns an upstream `/api/games/today` body into canonical [`GameRecord`]s.
//!
//! Two body shapes are accepted: a JSON array of games, or an object carrying
//! an `error` string. Records that fail to decode or break an invariant are
//! dropped with a warning rather than failing the whole slate, mirroring how
//! the producer itself skips games it cannot assemble.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use super::error::FetchError;
use super::models::{GameRecord, PitcherRecord};

/// Decode a raw response body.
pub fn parse_body(body: &[u8]) -> Result<Vec<GameRecord>, FetchError> {
    let raw: Value = serde_json::from_slice(body)?;
    parse_payload(raw)
}

/// Decode an already-parsed JSON payload.
pub fn parse_payload(raw: Value) -> Result<Vec<GameRecord>, FetchError> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(ref obj) => {
            return match obj.get("error") {
                Some(Value::String(msg)) => Err(FetchError::Upstream(msg.clone())),
                Some(other) => Err(FetchError::Upstream(other.to_string())),
                None => Err(FetchError::Malformed(
                    "expected an array of games or an error object".into(),
                )),
            };
        }
        other => {
            return Err(FetchError::Malformed(format!(
                "expected an array of games, got {}",
                json_kind(&other)
            )))
        }
    };

    let total = items.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let games: Vec<GameRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let game: GameRecord = match serde_json::from_value(item) {
                Ok(g) => g,
                Err(e) => {
                    warn!("Dropping game #{}: {}", idx, e);
                    return None;
                }
            };
            if let Err(reason) = validate(&game) {
                warn!("Dropping game {}: {}", game.id, reason);
                return None;
            }
            if !seen.insert(game.id.clone()) {
                warn!("Dropping game {}: duplicate id", game.id);
                return None;
            }
            Some(game)
        })
        .collect();

    debug!("Parsed {} of {} games", games.len(), total);
    Ok(games)
}

/// Check the record-level invariants the board relies on.
pub fn validate(game: &GameRecord) -> Result<(), String> {
    validate_pitcher("home", &game.home_pitcher)?;
    validate_pitcher("away", &game.away_pitcher)?;

    let splits = [
        game.team_stats.home.vs_rhp,
        game.team_stats.home.vs_lhp,
        game.team_stats.away.vs_rhp,
        game.team_stats.away.vs_lhp,
    ];
    if splits.iter().any(|v| !v.is_finite()) {
        return Err("non-finite team split".into());
    }
    if let Some(b) = game.expected_batters.iter().find(|b| !b.k_rate.is_finite()) {
        return Err(format!("batter {} has a non-finite K rate", b.name));
    }
    Ok(())
}

fn validate_pitcher(side: &str, p: &PitcherRecord) -> Result<(), String> {
    let proj = &p.projection;
    if !proj.projected_strikeouts.is_finite() || proj.projected_strikeouts < 0.0 {
        return Err(format!(
            "{} pitcher {} projects {} strikeouts",
            side, p.name, proj.projected_strikeouts
        ));
    }
    if proj.confidence > 100 {
        return Err(format!(
            "{} pitcher {} confidence {} outside 0-100",
            side, p.name, proj.confidence
        ));
    }
    let s = &p.stats;
    if [s.k9, s.k_percent, s.whiff_rate, s.swing_strike_rate]
        .iter()
        .any(|v| !v.is_finite())
    {
        return Err(format!("{} pitcher {} has non-finite stats", side, p.name));
    }
    Ok(())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
