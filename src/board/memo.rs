use std::sync::Arc;

use tracing::debug;

use super::view::{derive, FilterKey, SortKey};
use crate::slate::GameRecord;

/// Remembers the last `(games, sort, filter) → view` pair.
///
/// Slates are replaced wholesale and never mutated in place, so identity of
/// the `Arc` is enough to tell whether the games changed. The cache keeps its
/// own clone of the input `Arc`, which keeps the allocation alive and the
/// identity check sound.
#[derive(Debug, Default)]
pub struct ViewCache {
    last: Option<CacheEntry>,
    recomputes: u64,
}

#[derive(Debug)]
struct CacheEntry {
    games: Arc<[GameRecord]>,
    sort: SortKey,
    filter: FilterKey,
    view: Arc<[GameRecord]>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the derived view, recomputing only if an input changed.
    pub fn get(
        &mut self,
        games: &Arc<[GameRecord]>,
        sort: SortKey,
        filter: FilterKey,
    ) -> Arc<[GameRecord]> {
        if let Some(entry) = &self.last {
            if Arc::ptr_eq(&entry.games, games) && entry.sort == sort && entry.filter == filter {
                return Arc::clone(&entry.view);
            }
        }

        let view: Arc<[GameRecord]> = derive(games, sort, filter).into();
        self.recomputes += 1;
        debug!(
            "View #{} recomputed: {} of {} games (sort={}, filter={})",
            self.recomputes,
            view.len(),
            games.len(),
            sort,
            filter
        );
        self.last = Some(CacheEntry {
            games: Arc::clone(games),
            sort,
            filter,
            view: Arc::clone(&view),
        });
        view
    }

    /// How many times `derive` actually ran.
    #[cfg(test)]
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slate::models::fixtures::game;

    fn slate() -> Arc<[GameRecord]> {
        vec![
            game("1", "7:05 PM ET", ("Gerrit Cole", 8.5, 78), ("Chris Sale", 9.2, 82)),
            game("2", "10:10 PM ET", ("Walker Buehler", 7.8, 71), ("Yu Darvish", 6.9, 68)),
        ]
        .into()
    }

    #[test]
    fn test_same_inputs_hit_the_cache() {
        let mut cache = ViewCache::new();
        let games = slate();
        let first = cache.get(&games, SortKey::Confidence, FilterKey::All);
        let second = cache.get(&games, SortKey::Confidence, FilterKey::All);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.recomputes(), 1);
    }

    #[test]
    fn test_each_input_change_recomputes() {
        let mut cache = ViewCache::new();
        let games = slate();
        cache.get(&games, SortKey::Confidence, FilterKey::All);
        cache.get(&games, SortKey::Time, FilterKey::All);
        assert_eq!(cache.recomputes(), 2);
        cache.get(&games, SortKey::Time, FilterKey::Elite);
        assert_eq!(cache.recomputes(), 3);

        // Structurally equal but freshly fetched slate still counts as new.
        let refetched = slate();
        let view = cache.get(&refetched, SortKey::Time, FilterKey::Elite);
        assert_eq!(cache.recomputes(), 4);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "1");
    }

    #[test]
    fn test_switching_back_recomputes_once() {
        let mut cache = ViewCache::new();
        let games = slate();
        cache.get(&games, SortKey::Time, FilterKey::All);
        cache.get(&games, SortKey::Pitcher, FilterKey::All);
        let a = cache.get(&games, SortKey::Time, FilterKey::All);
        let b = cache.get(&games, SortKey::Time, FilterKey::All);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.recomputes(), 3);
    }
}
