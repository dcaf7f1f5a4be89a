use std::time::{Duration, Instant};

/// Suggestion queries are re-run on every keystroke of shell completion;
/// results older than this are recomputed.
pub const SUGGESTION_TTL: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// TtlCache
// ---------------------------------------------------------------------------

/// A single-slot cache with lazy expiry. Entries are discarded and
/// recomputed on read after the TTL elapses; there is no background
/// eviction and no invalidation signaling.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<(T, Instant)>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn get(&self) -> Option<T> {
        match &self.entry {
            Some((value, stored)) if stored.elapsed() < self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    pub fn put(&mut self, value: T) {
        self.entry = Some((value, Instant::now()));
    }

    /// Return the cached value, or compute, store, and return a fresh one.
    pub fn get_or_insert_with(&mut self, compute: impl FnOnce() -> T) -> T {
        if let Some(value) = self.get() {
            return value;
        }
        let value = compute();
        self.put(value.clone());
        value
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

// ---------------------------------------------------------------------------
// CompletionCache
// ---------------------------------------------------------------------------

/// Read-through caches backing shell-completion suggestions, one slot per
/// query kind (not per file).
#[derive(Debug)]
pub struct CompletionCache {
    pub all_changes: TtlCache<Vec<String>>,
    pub active_changes: TtlCache<Vec<String>>,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self {
            all_changes: TtlCache::new(SUGGESTION_TTL),
            active_changes: TtlCache::new(SUGGESTION_TTL),
        }
    }
}

impl Default for CompletionCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_misses() {
        let cache: TtlCache<Vec<String>> = TtlCache::new(SUGGESTION_TTL);
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn fresh_entry_hits() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.put(vec!["add-auth".to_string()]);
        assert_eq!(cache.get(), Some(vec!["add-auth".to_string()]));
    }

    #[test]
    fn expired_entry_misses_and_recomputes() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.put(1);
        assert_eq!(cache.get(), None);

        let value = cache.get_or_insert_with(|| 2);
        assert_eq!(value, 2);
    }

    #[test]
    fn get_or_insert_does_not_recompute_fresh_entries() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get_or_insert_with(|| 1), 1);
        assert_eq!(cache.get_or_insert_with(|| unreachable!()), 1);
    }

    #[test]
    fn clear_drops_entry() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.put("x");
        cache.clear();
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn completion_cache_slots_are_independent() {
        let mut cache = CompletionCache::new();
        cache.all_changes.put(vec!["a".to_string(), "b".to_string()]);
        assert!(cache.active_changes.get().is_none());
        assert_eq!(cache.all_changes.get().unwrap().len(), 2);
    }
}
