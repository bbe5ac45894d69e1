use crate::config::ScorerConfig;
use crate::error::Result;
use crate::topk::Hit;
use crate::{InvertedIndex, Scorer};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Process-wide handle to a built index.
///
/// Any number of queries may hold the read side at once. Pruning takes the
/// write side and therefore waits for, and blocks, every scoring pass.
#[derive(Clone)]
pub struct SharedIndex {
    index: Arc<RwLock<InvertedIndex>>,
    config: ScorerConfig,
}

impl SharedIndex {
    pub fn new(index: InvertedIndex) -> Self { Self::with_config(index, ScorerConfig::default()) }

    pub fn with_config(index: InvertedIndex, config: ScorerConfig) -> Self {
        Self { index: Arc::new(RwLock::new(index)), config }
    }

    pub fn config(&self) -> &ScorerConfig { &self.config }

    /// Read access for statistics lookups or a custom [`Scorer`].
    pub fn read(&self) -> RwLockReadGuard<'_, InvertedIndex> { self.index.read() }

    pub fn rank_by_query<S: AsRef<str>>(&self, terms: &[S], k: usize) -> Vec<Hit> {
        let index = self.index.read();
        Scorer::with_config(&index, self.config.clone()).rank_by_query(terms, k)
    }

    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Vec<Hit> {
        self.rank_by_query(terms, self.config.default_k)
    }

    pub fn prune_high_frequency_terms(&self, threshold_fraction: f64) -> Result<Vec<String>> {
        self.index.write().prune_high_frequency_terms(threshold_fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn shared() -> SharedIndex {
        let index = InvertedIndex::build(vec![
            vec!["cat", "dog"],
            vec!["dog", "dog", "fish"],
            vec!["cat", "fish"],
            vec!["cat"],
        ])
        .unwrap();
        SharedIndex::new(index)
    }

    #[test]
    fn concurrent_queries_agree() {
        let shared = shared();
        let expected = shared.rank_by_query(&["dog", "fish"], 10);
        thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| shared.rank_by_query(&["dog", "fish"], 10))).collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn pruning_is_visible_to_clones() {
        let shared = shared();
        let other = shared.clone();
        assert_eq!(shared.prune_high_frequency_terms(0.5).unwrap(), vec!["cat".to_string()]);
        assert!(!other.read().contains("cat"));
        assert!(other.search(&["cat"]).is_empty());
    }
}
