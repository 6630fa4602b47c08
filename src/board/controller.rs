use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::memo::ViewCache;
use super::state::{BoardAction, BoardState, Phase, Theme};
use super::view::{FilterKey, SortKey};
use crate::slate::{GameRecord, SlateSource};

/// Owns the board state and view cache, and drives fetches from a [`SlateSource`].
///
/// All transitions go through one lock. The lock is released while the
/// network request runs, so reads and selection changes stay responsive
/// during a slow fetch.
#[derive(Clone)]
pub struct BoardController {
    source: Arc<dyn SlateSource>,
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    state: BoardState,
    cache: ViewCache,
}

impl Inner {
    fn dispatch(&mut self, action: BoardAction) {
        self.state = self.state.clone().reduce(action);
    }
}

/// What the board shows right now.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub phase: Phase,
    pub sort: SortKey,
    pub filter: FilterKey,
    pub theme: Theme,
    /// Games in display order; empty unless the phase is `Ready`.
    pub games: Arc<[GameRecord]>,
    /// Size of the unfiltered slate; zero unless the phase is `Ready`.
    pub total: usize,
    /// Filtering emptied a non-empty slate. Informational, not an error.
    pub no_matches: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl BoardController {
    pub fn new(source: Arc<dyn SlateSource>, initial: BoardState) -> Self {
        BoardController {
            source,
            inner: Arc::new(RwLock::new(Inner {
                state: initial,
                cache: ViewCache::new(),
            })),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Mark a fetch as started. Returns its ticket, or `None` if one is
    /// already in flight.
    pub async fn begin_fetch(&self) -> Option<u64> {
        let mut inner = self.inner.write().await;
        if inner.state.is_loading() {
            return None;
        }
        inner.dispatch(BoardAction::FetchStarted);
        inner.state.in_flight
    }

    /// Run the fetch for `ticket` and apply its outcome.
    pub async fn complete_fetch(&self, ticket: u64) {
        let result = self.source.fetch_games().await;

        let action = match result {
            Ok(games) => {
                info!(
                    "Slate #{} loaded from {}: {} games",
                    ticket,
                    self.source.name(),
                    games.len()
                );
                BoardAction::FetchSucceeded {
                    ticket,
                    games,
                    fetched_at: Utc::now(),
                }
            }
            Err(e) => {
                if e.is_upstream() {
                    warn!("Slate #{} rejected upstream: {}", ticket, e);
                } else {
                    warn!("Slate #{} fetch failed: {}", ticket, e);
                }
                BoardAction::FetchFailed {
                    ticket,
                    message: e.to_string(),
                }
            }
        };

        self.inner.write().await.dispatch(action);
    }

    /// Fetch the slate and wait for the outcome. Returns `false` when skipped
    /// because another fetch is in flight.
    pub async fn refresh(&self) -> bool {
        match self.begin_fetch().await {
            Some(ticket) => {
                self.complete_fetch(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Start a fetch in the background. Returns `false` when skipped.
    pub async fn spawn_refresh(&self) -> bool {
        match self.begin_fetch().await {
            Some(ticket) => {
                let this = self.clone();
                tokio::spawn(async move { this.complete_fetch(ticket).await });
                true
            }
            None => false,
        }
    }

    pub async fn set_sort(&self, sort: SortKey) {
        self.inner.write().await.dispatch(BoardAction::SetSort(sort));
    }

    pub async fn set_filter(&self, filter: FilterKey) {
        self.inner.write().await.dispatch(BoardAction::SetFilter(filter));
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut inner = self.inner.write().await;
        inner.dispatch(BoardAction::ToggleTheme);
        inner.state.theme
    }

    pub async fn theme(&self) -> Theme {
        self.inner.read().await.state.theme
    }

    /// Current board, re-deriving the game list only if an input changed.
    pub async fn view(&self) -> BoardView {
        let mut inner = self.inner.write().await;
        let Inner { state, cache } = &mut *inner;

        let (games, total) = match state.phase {
            Phase::Ready => (
                cache.get(&state.games, state.sort, state.filter),
                state.games.len(),
            ),
            _ => (Arc::from(Vec::new()), 0),
        };

        BoardView {
            phase: state.phase.clone(),
            sort: state.sort,
            filter: state.filter,
            theme: state.theme,
            no_matches: state.phase == Phase::Ready && games.is_empty() && total > 0,
            games,
            total,
            fetched_at: state.fetched_at,
        }
    }

    /// Look up one game of the current slate. Nothing is served while a
    /// fetch is pending or after a failure, matching [`BoardController::view`].
    pub async fn game(&self, id: &str) -> Option<GameRecord> {
        let inner = self.inner.read().await;
        if inner.state.phase != Phase::Ready {
            return None;
        }
        inner.state.games.iter().find(|g| g.id == id).cloned()
    }

    /// How many times the view has been re-derived.
    #[cfg(test)]
    pub async fn recomputes(&self) -> u64 {
        self.inner.read().await.cache.recomputes()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::*;
    use crate::slate::models::fixtures::game;
    use crate::slate::FetchError;
    use std::sync::atomic::Ordering;
    use tokio::sync::Notify;

    fn slate() -> Vec<GameRecord> {
        vec![
            game("1", "7:05 PM ET", ("Gerrit Cole", 8.5, 78), ("Chris Sale", 9.2, 82)),
            game("2", "10:10 PM ET", ("Walker Buehler", 7.8, 71), ("Yu Darvish", 6.9, 68)),
            game("3", "8:10 PM ET", ("Framber Valdez", 5.8, 64), ("Shohei Ohtani", 10.1, 85)),
        ]
    }

    fn controller(source: ScriptedSource) -> (BoardController, Arc<ScriptedSource>) {
        let source = Arc::new(source);
        let initial = BoardState::new(SortKey::Confidence, FilterKey::All, Theme::Dark);
        (BoardController::new(source.clone(), initial), source)
    }

    fn ids(view: &BoardView) -> Vec<&str> {
        view.games.iter().map(|g| g.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_refresh_then_sort_and_filter() {
        let (board, _) = controller(ScriptedSource::new(vec![Ok(slate())]));
        assert_eq!(board.view().await.phase, Phase::Loading);

        assert!(board.refresh().await);
        let view = board.view().await;
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(ids(&view), vec!["3", "1", "2"]);
        assert_eq!(view.total, 3);
        assert!(!view.no_matches);

        board.set_filter(FilterKey::Elite).await;
        board.set_sort(SortKey::Time).await;
        assert_eq!(ids(&board.view().await), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_view_is_memoized() {
        let (board, _) = controller(ScriptedSource::new(vec![Ok(slate())]));
        board.refresh().await;

        board.view().await;
        board.view().await;
        assert_eq!(board.recomputes().await, 1);

        // Theme is not a derivation input.
        board.toggle_theme().await;
        board.view().await;
        assert_eq!(board.recomputes().await, 1);

        board.set_sort(SortKey::Pitcher).await;
        board.view().await;
        board.view().await;
        assert_eq!(board.recomputes().await, 2);
    }

    #[tokio::test]
    async fn test_upstream_error_empties_board_and_retry_refetches() {
        let (board, source) = controller(ScriptedSource::new(vec![
            Err(FetchError::Upstream("rate limited".into())),
            Ok(slate()),
        ]));

        board.refresh().await;
        let view = board.view().await;
        assert_eq!(view.phase, Phase::Failed("rate limited".into()));
        assert!(view.games.is_empty());
        assert!(!view.no_matches);

        board.set_sort(SortKey::Strikeouts).await;
        assert!(board.refresh().await);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        let view = board.view().await;
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.sort, SortKey::Strikeouts);
        assert_eq!(ids(&view), vec!["3", "1", "2"]);
    }

    #[tokio::test]
    async fn test_filtered_to_empty_is_not_an_error() {
        let only_weak = vec![game(
            "2",
            "10:10 PM ET",
            ("Walker Buehler", 7.8, 71),
            ("Yu Darvish", 6.9, 68),
        )];
        let (board, _) = controller(ScriptedSource::new(vec![Ok(only_weak)]));
        board.refresh().await;
        board.set_filter(FilterKey::HighConfidence).await;

        let view = board.view().await;
        assert_eq!(view.phase, Phase::Ready);
        assert!(view.games.is_empty());
        assert!(view.no_matches);
    }

    #[tokio::test]
    async fn test_empty_slate_is_not_a_no_match() {
        let (board, _) = controller(ScriptedSource::new(vec![Ok(Vec::new())]));
        board.refresh().await;
        board.set_filter(FilterKey::Elite).await;
        let view = board.view().await;
        assert_eq!(view.total, 0);
        assert!(!view.no_matches);
    }

    #[tokio::test]
    async fn test_retry_while_in_flight_is_skipped() {
        let gate = Arc::new(Notify::new());
        let (board, source) = controller(ScriptedSource::gated(vec![Ok(slate())], gate.clone()));

        assert!(board.spawn_refresh().await);
        assert!(!board.spawn_refresh().await);
        assert!(!board.refresh().await);
        assert_eq!(board.view().await.phase, Phase::Loading);

        // Selections still apply while the fetch is pending.
        board.set_filter(FilterKey::Elite).await;

        gate.notify_one();
        for _ in 0..100 {
            if board.view().await.phase == Phase::Ready {
                break;
            }
            tokio::task::yield_now().await;
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        let view = board.view().await;
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(ids(&view), vec!["3", "1"]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetch_hides_previous_slate_until_it_lands() {
        let gate = Arc::new(Notify::new());
        let (board, _) = controller(ScriptedSource::gated(
            vec![Ok(slate()), Ok(slate()[..1].to_vec())],
            gate.clone(),
        ));

        gate.notify_one();
        assert!(board.refresh().await);
        let view = board.view().await;
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.games.len(), 3);

        assert!(board.spawn_refresh().await);
        let view = board.view().await;
        assert_eq!(view.phase, Phase::Loading);
        assert!(view.games.is_empty());
        assert_eq!(view.total, 0);
        assert!(!view.no_matches);
        assert!(board.game("1").await.is_none());

        gate.notify_one();
        for _ in 0..100 {
            if board.view().await.phase == Phase::Ready {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        let view = board.view().await;
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(ids(&view), vec!["1"]);
        assert_eq!(view.total, 1);
        assert!(board.game("1").await.is_some());
    }

    #[tokio::test]
    async fn test_game_lookup_hidden_after_failure() {
        let (board, _) = controller(ScriptedSource::new(vec![
            Ok(slate()),
            Err(FetchError::Upstream("rate limited".into())),
        ]));
        board.refresh().await;
        assert!(board.game("1").await.is_some());
        board.refresh().await;
        assert!(board.game("1").await.is_none());
    }

    #[tokio::test]
    async fn test_game_lookup() {
        let (board, _) = controller(ScriptedSource::new(vec![Ok(slate())]));
        assert!(board.game("1").await.is_none());
        board.refresh().await;
        let g = board.game("3").await.unwrap();
        assert_eq!(g.away_pitcher.name, "Shohei Ohtani");
        assert!(board.game("42").await.is_none());
    }
}
