//! Page view counting.
//!
//! Counters are keyed by request path, `posts/<slug>` for posts. A
//! [`ViewStore`] is the seam to whatever holds them; [`MemoryViews`] keeps
//! them in-process.

use dashmap::DashMap;

/// A key-value store of view counters.
///
/// Each `increment_by` call counts, even when repeated with the same key.
pub trait ViewStore: Send + Sync {
    /// The count for `key`, `None` if it was never incremented.
    fn get(&self, key: &str) -> Option<u64>;

    /// Adds `delta` to `key`'s counter, creating it at zero, and returns the
    /// new count.
    fn increment_by(&self, key: &str, delta: u64) -> u64;

    /// The counts of several keys at once, in order.
    fn get_many(&self, keys: &[String]) -> Vec<Option<u64>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Every key with a counter, in no particular order.
    fn keys(&self) -> Vec<String>;
}

/// The counter key for the post with `slug`.
pub fn view_key(slug: &str) -> String {
    format!("posts/{slug}")
}

/// Counts one view of the post with `slug`.
pub fn record_view<S: ViewStore + ?Sized>(store: &S, slug: &str) -> u64 {
    store.increment_by(&view_key(slug), 1)
}

#[derive(Debug, Default)]
pub struct MemoryViews(DashMap<String, u64>);

impl MemoryViews {
    pub fn new() -> Self {
        MemoryViews::default()
    }
}

impl ViewStore for MemoryViews {
    fn get(&self, key: &str) -> Option<u64> {
        self.0.get(key).map(|count| *count)
    }

    fn increment_by(&self, key: &str, delta: u64) -> u64 {
        let mut count = self.0.entry(key.to_string()).or_insert(0);
        *count += delta;
        *count
    }

    fn keys(&self) -> Vec<String> {
        self.0.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_views() {
        let views = MemoryViews::new();
        assert_eq!(views.get("posts/hello"), None);
        assert_eq!(record_view(&views, "hello"), 1);
        assert_eq!(record_view(&views, "hello"), 2);
        assert_eq!(views.increment_by("posts/hello", 10), 12);
        assert_eq!(views.get(&view_key("hello")), Some(12));
    }

    #[test]
    fn many_keys() {
        let views = MemoryViews::new();
        record_view(&views, "a");
        record_view(&views, "c");

        let keys = ["a", "b", "c"].map(view_key);
        assert_eq!(views.get_many(&keys), [Some(1), None, Some(1)]);

        let mut all = views.keys();
        all.sort();
        assert_eq!(all, ["posts/a", "posts/c"]);
    }

    #[test]
    fn concurrent_increments_all_count() {
        use rayon::prelude::*;

        let views = MemoryViews::new();
        (0..1000).into_par_iter().for_each(|_| { record_view(&views, "busy"); });
        assert_eq!(views.get("posts/busy"), Some(1000));
    }
}
