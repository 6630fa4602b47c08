use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::board::{BoardController, BoardView, FilterKey, Phase, SortKey, Theme};
use crate::slate::models::{BatterRecord, ConfidenceTier};
use crate::slate::GameRecord;

#[derive(Clone)]
pub struct AppState {
    pub board: BoardController,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/board", get(board_handler))
        .route("/api/board/sort", post(sort_handler))
        .route("/api/board/filter", post(filter_handler))
        .route("/api/board/theme", post(theme_handler))
        .route("/api/board/retry", post(retry_handler))
        .route("/api/games/:id", get(game_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

// ── Response shapes ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    /// "loading" | "ready" | "failed"
    pub phase: &'static str,
    pub error: Option<String>,
    pub sort: SortKey,
    pub filter: FilterKey,
    pub theme: Theme,
    pub total: usize,
    pub no_matches: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub games: Vec<GameCard>,
}

/// A game plus the facts its card highlights.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCard {
    #[serde(flatten)]
    pub game: GameRecord,
    pub elite: bool,
    pub home_pitcher_tier: ConfidenceTier,
    pub away_pitcher_tier: ConfidenceTier,
    /// K% of the lineup each starter faces, split by the starter's hand
    pub home_pitcher_matchup_rate: f64,
    pub away_pitcher_matchup_rate: f64,
    pub key_matchups: Vec<BatterRecord>,
}

impl From<&GameRecord> for GameCard {
    fn from(game: &GameRecord) -> Self {
        GameCard {
            elite: game.is_elite(),
            home_pitcher_tier: game.home_pitcher.confidence_tier(),
            away_pitcher_tier: game.away_pitcher.confidence_tier(),
            home_pitcher_matchup_rate: game.home_pitcher_matchup_rate(),
            away_pitcher_matchup_rate: game.away_pitcher_matchup_rate(),
            key_matchups: game.key_matchups().to_vec(),
            game: game.clone(),
        }
    }
}

impl From<BoardView> for BoardResponse {
    fn from(view: BoardView) -> Self {
        let (phase, error) = match view.phase {
            Phase::Loading => ("loading", None),
            Phase::Ready => ("ready", None),
            Phase::Failed(msg) => ("failed", Some(msg)),
        };
        BoardResponse {
            phase,
            error,
            sort: view.sort,
            filter: view.filter,
            theme: view.theme,
            total: view.total,
            no_matches: view.no_matches,
            fetched_at: view.fetched_at,
            games: view.games.iter().map(GameCard::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub sort: SortKey,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub filter: FilterKey,
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Serve the dashboard page with the current theme applied to the document.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(render_index(state.board.theme().await))
}

fn render_index(theme: Theme) -> String {
    DASHBOARD_HTML.replace(
        r#"<html lang="en">"#,
        &format!(r#"<html lang="en" data-theme="{}">"#, theme.as_str()),
    )
}

/// GET /api/board
async fn board_handler(State(state): State<Arc<AppState>>) -> Json<BoardResponse> {
    Json(state.board.view().await.into())
}

/// POST /api/board/sort  { "sort": "strikeouts" }
async fn sort_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SortRequest>,
) -> Json<BoardResponse> {
    debug!("Sort → {}", req.sort);
    state.board.set_sort(req.sort).await;
    Json(state.board.view().await.into())
}

/// POST /api/board/filter  { "filter": "elite" }
async fn filter_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilterRequest>,
) -> Json<BoardResponse> {
    debug!("Filter → {}", req.filter);
    state.board.set_filter(req.filter).await;
    Json(state.board.view().await.into())
}

/// POST /api/board/theme
async fn theme_handler(State(state): State<Arc<AppState>>) -> Json<BoardResponse> {
    let theme = state.board.toggle_theme().await;
    debug!("Theme → {}", theme.as_str());
    Json(state.board.view().await.into())
}

/// POST /api/board/retry
///
/// 202 once a fetch has been started, 409 if one was already running.
async fn retry_handler(State(state): State<Arc<AppState>>) -> (StatusCode, Json<BoardResponse>) {
    let status = if state.board.spawn_refresh().await {
        info!("Retry requested, refetching slate");
        StatusCode::ACCEPTED
    } else {
        debug!("Retry ignored: fetch already in flight");
        StatusCode::CONFLICT
    };
    (status, Json(state.board.view().await.into()))
}

/// GET /api/games/:id
async fn game_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameCard>, (StatusCode, String)> {
    state
        .board
        .game(&id)
        .await
        .map(|g| Json(GameCard::from(&g)))
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No game {} on today's slate", id)))
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>MLB Strikeout Predictions</title>
<style>
  :root, [data-theme="dark"] {
    --bg: #0f1117; --card: #1a1d27; --border: #2a2d3a; --text: #e0e0e0; --muted: #8888aa;
    --accent: #6c63ff; --success: #00c896; --warning: #ff9800; --danger: #ff4f6a;
  }
  [data-theme="light"] {
    --bg: #f4f5f9; --card: #ffffff; --border: #dde0ea; --text: #1a1d27; --muted: #666688;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; flex-wrap: wrap; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  header p { color: var(--muted); font-size: .85rem; }
  .controls { margin-left: auto; display: flex; gap: .6rem; align-items: center; }
  select, button { background: var(--card); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .35rem .7rem; font-size: .85rem; cursor: pointer; }
  button:hover, select:hover { border-color: var(--accent); }
  main { padding: 1.5rem 2rem; }
  .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(420px, 1fr)); gap: 1.2rem; }
  .game { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1rem; }
  .game.elite { border-color: var(--success); }
  .game-head { display: flex; justify-content: space-between; align-items: center; margin-bottom: .8rem; }
  .badge { background: var(--success); color: #000; border-radius: 4px; padding: .15rem .5rem; font-size: .7rem; font-weight: 700; text-transform: uppercase; }
  .pitchers { display: grid; grid-template-columns: 1fr 1fr; gap: .8rem; }
  .pitcher { border: 1px solid var(--border); border-radius: 8px; padding: .7rem; }
  .pitcher h3 { font-size: 1rem; }
  .muted { color: var(--muted); font-size: .78rem; }
  .proj { font-size: 1.3rem; font-weight: 700; margin: .3rem 0; }
  .tier-strong { color: var(--success); } .tier-fair { color: var(--warning); } .tier-weak { color: var(--danger); }
  .stats { display: grid; grid-template-columns: repeat(4, 1fr); gap: .3rem; margin: .5rem 0; }
  .stat { text-align: center; font-size: .8rem; cursor: help; }
  .stat b { display: block; font-size: .9rem; }
  .batters { list-style: none; font-size: .78rem; margin-top: .4rem; }
  .batters li { display: flex; justify-content: space-between; padding: .15rem 0; }
  .notice { color: var(--muted); text-align: center; padding: 3rem; }
  .notice.error { color: var(--danger); }
</style>
</head>
<body>
<header>
  <div>
    <h1>MLB Strikeout Predictions</h1>
    <p>Today's Elite Pitching Matchups</p>
  </div>
  <div class="controls">
    <select id="sort" onchange="post('/api/board/sort', { sort: this.value })">
      <option value="confidence">Confidence</option>
      <option value="strikeouts">Projected K's</option>
      <option value="time">Game Time</option>
      <option value="pitcher">Pitcher Name</option>
    </select>
    <select id="filter" onchange="post('/api/board/filter', { filter: this.value })">
      <option value="all">All Games</option>
      <option value="elite">Elite Picks (8.5+ K)</option>
      <option value="high-confidence">High Confidence (75%+)</option>
    </select>
    <button id="theme" onclick="post('/api/board/theme')">☀</button>
  </div>
</header>

<main id="main"><div class="notice">Loading today's games...</div></main>

<script>
const TIPS = {
  k9: 'Strikeouts per 9 innings - measures strikeout rate per game',
  kPercent: 'Strikeout percentage - percentage of plate appearances ending in strikeout',
  whiffRate: 'Whiff rate - percentage of swings that miss the ball',
  swingStrikeRate: 'Swinging strike rate - percentage of pitches that result in swinging strikes',
  vsRHP: 'Team strikeout rate when facing right-handed pitching',
  vsLHP: 'Team strikeout rate when facing left-handed pitching'
};
const esc = s => String(s).replace(/[&<>"']/g, c => ({ '&':'&amp;', '<':'&lt;', '>':'&gt;', '"':'&quot;', "'":'&#39;' }[c]));

function stat(key, label, value, pct) {
  return `<div class="stat" title="${esc(TIPS[key])} (current: ${value}%)">${label}<b>${value}${pct ? '%' : ''}</b></div>`;
}

function pitcher(p, tier, matchup, batters) {
  const s = p.stats;
  const surname = p.name.split(' ').slice(1).join(' ') || p.name;
  return `<div class="pitcher">
    <h3>${esc(p.name)} <span class="muted">${p.hand}HP</span></h3>
    <div class="muted">${esc(p.projection.line)}</div>
    <div class="proj">${p.projection.projectedStrikeouts} K</div>
    <div class="tier-${tier}">${p.projection.confidence}% confidence</div>
    <div class="stats">
      ${stat('k9', 'K/9', s.k9, false)}${stat('kPercent', 'K%', s.kPercent, true)}
      ${stat('whiffRate', 'Whiff', s.whiffRate, true)}${stat('swingStrikeRate', 'SwStr', s.swingStrikeRate, true)}
    </div>
    <div class="muted" title="${esc(TIPS[p.hand === 'R' ? 'vsRHP' : 'vsLHP'])}">vs ${p.hand}HP: ${matchup}% K</div>
    <ul class="batters">${batters.map(b => `<li><span>${esc(b.name)}</span>
      <span>${b.kRate}% K${b.vsOpponent > 0 ? ` · ${b.vsOpponent} K vs ${esc(surname)}` : ''}</span></li>`).join('')}</ul>
  </div>`;
}

function card(g) {
  const batters = g.keyMatchups;
  return `<div class="game ${g.elite ? 'elite' : ''}">
    <div class="game-head">
      <div>${esc(g.awayTeam.logo)} ${esc(g.awayTeam.name)} @ ${esc(g.homeTeam.logo)} ${esc(g.homeTeam.name)}</div>
      <div class="muted">${esc(g.gameTime)}</div>
      ${g.elite ? '<span class="badge">Elite Pick</span>' : ''}
    </div>
    <div class="pitchers">
      ${pitcher(g.awayPitcher, g.awayPitcherTier, g.awayPitcherMatchupRate, batters)}
      ${pitcher(g.homePitcher, g.homePitcherTier, g.homePitcherMatchupRate, batters)}
    </div>
  </div>`;
}

function render(b) {
  document.documentElement.setAttribute('data-theme', b.theme);
  document.getElementById('theme').textContent = b.theme === 'dark' ? '☀' : '☾';
  document.getElementById('sort').value = b.sort;
  document.getElementById('filter').value = b.filter;
  const main = document.getElementById('main');
  if (b.phase === 'loading') {
    main.innerHTML = '<div class="notice">Loading today\'s games...</div>';
    setTimeout(load, 500);
  } else if (b.phase === 'failed') {
    main.innerHTML = `<div class="notice error"><p>Error: ${esc(b.error)}</p><br>
      <button onclick="retry()">Retry</button></div>`;
  } else if (b.noMatches) {
    main.innerHTML = '<div class="notice">No games match your current filters.</div>';
  } else {
    main.innerHTML = `<div class="grid">${b.games.map(card).join('')}</div>`;
  }
}

async function load() {
  const r = await fetch('/api/board');
  if (r.ok) render(await r.json());
}

async function post(path, body) {
  const r = await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body || {})
  });
  render(await r.json());
}

async function retry() {
  await post('/api/board/retry');
}

load();
</script>
</body>
</html>"#;
