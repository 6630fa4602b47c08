//! Board state and its transitions.
//!
//! Every user action and fetch milestone is a [`BoardAction`]; [`BoardState::reduce`]
//! maps `(state, action)` to the next state with no I/O, so the whole board
//! lifecycle can be exercised without a server or a browser.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::view::{FilterKey, SortKey};
use crate::slate::GameRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Where the slate lifecycle stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// A fetch is in flight; nothing from the previous slate is shown.
    Loading,
    Ready,
    /// The last fetch failed; the message is shown verbatim.
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum BoardAction {
    SetSort(SortKey),
    SetFilter(FilterKey),
    ToggleTheme,
    /// Start a fetch. Ignored while another one is in flight.
    FetchStarted,
    FetchSucceeded {
        ticket: u64,
        games: Vec<GameRecord>,
        fetched_at: DateTime<Utc>,
    },
    FetchFailed {
        ticket: u64,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct BoardState {
    pub sort: SortKey,
    pub filter: FilterKey,
    pub theme: Theme,
    pub phase: Phase,
    /// Current slate; replaced wholesale, never edited.
    pub games: Arc<[GameRecord]>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Ticket of the fetch currently in flight, if any.
    pub in_flight: Option<u64>,
    next_ticket: u64,
}

impl BoardState {
    /// Fresh board: loading, since the first fetch starts right away.
    pub fn new(sort: SortKey, filter: FilterKey, theme: Theme) -> Self {
        BoardState {
            sort,
            filter,
            theme,
            phase: Phase::Loading,
            games: Arc::from(Vec::new()),
            fetched_at: None,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn reduce(mut self, action: BoardAction) -> Self {
        match action {
            BoardAction::SetSort(sort) => self.sort = sort,
            BoardAction::SetFilter(filter) => self.filter = filter,
            BoardAction::ToggleTheme => self.theme = self.theme.toggled(),
            BoardAction::FetchStarted => {
                if self.in_flight.is_none() {
                    self.in_flight = Some(self.next_ticket);
                    self.next_ticket += 1;
                    self.phase = Phase::Loading;
                }
            }
            BoardAction::FetchSucceeded {
                ticket,
                games,
                fetched_at,
            } => {
                if self.in_flight == Some(ticket) {
                    self.in_flight = None;
                    self.games = games.into();
                    self.fetched_at = Some(fetched_at);
                    self.phase = Phase::Ready;
                }
            }
            BoardAction::FetchFailed { ticket, message } => {
                if self.in_flight == Some(ticket) {
                    self.in_flight = None;
                    self.games = Arc::from(Vec::new());
                    self.phase = Phase::Failed(message);
                }
            }
        }
        self
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slate::models::fixtures::game;

    fn board() -> BoardState {
        BoardState::new(SortKey::Confidence, FilterKey::All, Theme::Dark)
    }

    fn slate() -> Vec<GameRecord> {
        vec![game("1", "7:05 PM ET", ("A", 8.5, 78), ("B", 9.2, 82))]
    }

    fn succeed(state: BoardState, ticket: u64) -> BoardState {
        state.reduce(BoardAction::FetchSucceeded {
            ticket,
            games: slate(),
            fetched_at: Utc::now(),
        })
    }

    #[test]
    fn test_starts_loading_with_no_fetch_in_flight() {
        let s = board();
        assert_eq!(s.phase, Phase::Loading);
        assert!(!s.is_loading());
        assert!(s.games.is_empty());
    }

    #[test]
    fn test_fetch_success_replaces_games() {
        let s = board().reduce(BoardAction::FetchStarted);
        assert_eq!(s.in_flight, Some(1));
        assert!(s.is_loading());

        let s = succeed(s, 1);
        assert_eq!(s.phase, Phase::Ready);
        assert!(!s.is_loading());
        assert_eq!(s.games.len(), 1);
        assert!(s.fetched_at.is_some());
    }

    #[test]
    fn test_fetch_failure_clears_games_and_records_message() {
        let s = succeed(board().reduce(BoardAction::FetchStarted), 1);
        let s = s.reduce(BoardAction::FetchStarted);
        assert_eq!(s.phase, Phase::Loading);
        let s = s.reduce(BoardAction::FetchFailed {
            ticket: 2,
            message: "rate limited".into(),
        });
        assert_eq!(s.phase, Phase::Failed("rate limited".into()));
        assert!(s.games.is_empty());
        assert!(!s.is_loading());
    }

    #[test]
    fn test_retry_after_failure_clears_error() {
        let s = board().reduce(BoardAction::FetchStarted);
        let s = s.reduce(BoardAction::FetchFailed {
            ticket: 1,
            message: "rate limited".into(),
        });
        let s = s.reduce(BoardAction::FetchStarted);
        assert_eq!(s.phase, Phase::Loading);
        let s = succeed(s, 2);
        assert_eq!(s.phase, Phase::Ready);
    }

    #[test]
    fn test_overlapping_start_is_ignored() {
        let s = board().reduce(BoardAction::FetchStarted);
        let s = s.reduce(BoardAction::FetchStarted);
        assert_eq!(s.in_flight, Some(1));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let s = board().reduce(BoardAction::FetchStarted);
        let s = succeed(s, 7);
        assert_eq!(s.phase, Phase::Loading);
        assert!(s.games.is_empty());

        let s = s.reduce(BoardAction::FetchFailed {
            ticket: 99,
            message: "late".into(),
        });
        assert_eq!(s.phase, Phase::Loading);
        assert_eq!(s.in_flight, Some(1));
    }

    #[test]
    fn test_selections_survive_the_fetch_lifecycle() {
        let s = board()
            .reduce(BoardAction::SetSort(SortKey::Pitcher))
            .reduce(BoardAction::SetFilter(FilterKey::Elite))
            .reduce(BoardAction::ToggleTheme)
            .reduce(BoardAction::FetchStarted);
        let s = s.reduce(BoardAction::FetchFailed {
            ticket: 1,
            message: "boom".into(),
        });
        let s = succeed(s.reduce(BoardAction::FetchStarted), 2);
        assert_eq!(s.sort, SortKey::Pitcher);
        assert_eq!(s.filter, FilterKey::Elite);
        assert_eq!(s.theme, Theme::Light);
    }

    #[test]
    fn test_new_slate_gets_new_identity() {
        let s = succeed(board().reduce(BoardAction::FetchStarted), 1);
        let before = Arc::clone(&s.games);
        let s = succeed(s.reduce(BoardAction::FetchStarted), 2);
        assert!(!Arc::ptr_eq(&before, &s.games));
        assert_eq!(&*before, &*s.games);
    }
}
