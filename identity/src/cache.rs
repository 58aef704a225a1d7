//! Memoization for identity resolution.
//!
//! The cache is only valid for one unchanged graph snapshot. Nothing here
//! watches the graph: after any write, callers must [`clear`] the cache
//! before resolving again.
//!
//! [`clear`]: ResolutionCache::clear

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::Result;
use crate::model::Term;

/// Key of the UUID memo: the queried URI and the publication filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UuidKey {
    /// The URI as queried.
    pub uri: Term,
    /// Whether only published candidates were accepted.
    pub published_only: bool,
}

/// Hit and miss counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the memo.
    pub hits: u64,
    /// Lookups that had to be computed.
    pub misses: u64,
}

/// Thread-safe memo of UUID candidate lists and subject existence.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    uuids: Mutex<HashMap<UuidKey, Vec<Term>>>,
    subjects: Mutex<HashMap<Term, bool>>,
    stats: Mutex<CacheStats>,
}

impl ResolutionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized UUID candidates for `key`.
    #[must_use]
    pub fn uuid_candidates(&self, key: &UuidKey) -> Option<Vec<Term>> {
        let hit = self.uuids.lock().get(key).cloned();
        let mut stats = self.stats.lock();
        if hit.is_some() {
            stats.hits += 1;
            tracing::debug!(uri = %key.uri, "uuid cache hit");
        } else {
            stats.misses += 1;
        }
        hit
    }

    /// Records UUID candidates for `key`.
    pub fn store_uuid_candidates(&self, key: UuidKey, candidates: Vec<Term>) {
        self.uuids.lock().insert(key, candidates);
    }

    /// Memoized existence of `subject`, computing it with `check` on a miss.
    ///
    /// # Errors
    ///
    /// Propagates errors from `check`; failures are not memoized.
    pub fn subject_exists(
        &self,
        subject: &Term,
        check: impl FnOnce() -> Result<bool>,
    ) -> Result<bool> {
        if let Some(known) = self.subjects.lock().get(subject).copied() {
            self.stats.lock().hits += 1;
            return Ok(known);
        }
        self.stats.lock().misses += 1;
        let exists = check()?;
        self.subjects.lock().insert(subject.clone(), exists);
        Ok(exists)
    }

    /// Drops every memoized answer. Call after any graph mutation.
    pub fn clear(&self) {
        self.uuids.lock().clear();
        self.subjects.lock().clear();
        tracing::debug!("resolution cache cleared");
    }

    /// Number of memoized UUID lists and subject checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uuids.lock().len() + self.subjects.lock().len()
    }

    /// Returns true if nothing is memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hit and miss counts since creation.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(s: &str, published_only: bool) -> UuidKey {
        UuidKey {
            uri: Term::iri(s),
            published_only,
        }
    }

    #[test]
    fn uuid_memo_separates_publication_filter() {
        let cache = ResolutionCache::new();
        cache.store_uuid_candidates(key("http://a.example/x", false), vec![Term::iri("urn:x")]);
        assert!(cache.uuid_candidates(&key("http://a.example/x", true)).is_none());
        assert_eq!(
            cache.uuid_candidates(&key("http://a.example/x", false)),
            Some(vec![Term::iri("urn:x")])
        );
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn subject_check_runs_once() -> Result<()> {
        let cache = ResolutionCache::new();
        let s = Term::iri("http://a.example/s");
        let mut calls = 0;
        assert!(cache.subject_exists(&s, || {
            calls += 1;
            Ok(true)
        })?);
        assert!(cache.subject_exists(&s, || {
            calls += 1;
            Ok(false)
        })?);
        assert_eq!(calls, 1);
        Ok(())
    }

    #[test]
    fn clear_invalidates() -> Result<()> {
        let cache = ResolutionCache::new();
        let s = Term::iri("http://a.example/s");
        cache.subject_exists(&s, || Ok(false))?;
        cache.store_uuid_candidates(key("http://a.example/s", false), Vec::new());
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.subject_exists(&s, || Ok(true))?);
        Ok(())
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(ResolutionCache::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.store_uuid_candidates(key(&format!("http://a.example/{i}"), false), vec![]);
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread");
        }
        assert_eq!(cache.len(), 4);
    }
}
