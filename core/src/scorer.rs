use crate::config::{CosineMode, ScorerConfig};
use crate::topk::{Hit, TopK};
use crate::vector::SparseVector;
use crate::{DocId, InvertedIndex};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Per-document partial vector built up during a query sweep.
struct Accumulator {
    weights: SparseVector,
    full_norm: Option<f64>, // set in `CosineMode::FullDocument`
}

/// Ranks documents of a borrowed index against term queries.
#[derive(Debug, Clone)]
pub struct Scorer<'a> {
    index: &'a InvertedIndex,
    config: ScorerConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self { Self::with_config(index, ScorerConfig::default()) }

    pub fn with_config(index: &'a InvertedIndex, config: ScorerConfig) -> Self { Self { index, config } }

    pub fn index(&self) -> &'a InvertedIndex { self.index }

    pub fn config(&self) -> &ScorerConfig { &self.config }

    /// Unit vector with equal weight on every indexed query term.
    ///
    /// Repeated terms count once. Returns the zero vector when no term is indexed.
    pub fn query_vector<S: AsRef<str>>(&self, terms: &[S]) -> SparseVector {
        terms
            .iter()
            .filter_map(|t| self.index.dimension_of(t.as_ref()))
            .map(|dim| (dim, 1.0))
            .collect::<SparseVector>()
            .normalized()
    }

    /// Normalized tf-idf vector over every indexed term of `doc_id`.
    pub fn document_vector_dense(&self, doc_id: DocId) -> Option<SparseVector> {
        Some(self.raw_document_vector(doc_id)?.normalized())
    }

    fn raw_document_vector(&self, doc_id: DocId) -> Option<SparseVector> {
        let dims = self.index.document_terms(doc_id)?;
        Some(
            dims.iter()
                .filter_map(|&dim| self.index.postings_at(dim).map(|p| (dim, self.index.tf_idf_of(p, doc_id))))
                .collect(),
        )
    }

    /// Dense vectors of the whole corpus, indexed by doc id.
    pub fn document_vectors(&self) -> Vec<SparseVector> {
        (0..self.index.num_docs()).filter_map(|doc_id| self.document_vector_dense(doc_id)).collect()
    }

    /// Document vectors restricted to the query's dimensions, for every
    /// document sharing at least one query term. Normalized according to the
    /// configured [`CosineMode`].
    pub fn query_document_vectors<S: AsRef<str>>(&self, terms: &[S]) -> BTreeMap<DocId, SparseVector> {
        let mut vectors: BTreeMap<DocId, Accumulator> = BTreeMap::new();
        for term in terms {
            let Some(postings) = self.index.postings(term.as_ref()) else { continue };
            for posting in postings {
                let acc = vectors.entry(posting.doc_id).or_insert_with(|| self.accumulator(posting.doc_id));
                acc.weights.set(postings.dimension(), self.index.tf_idf_of(postings, posting.doc_id));
            }
        }
        vectors
            .into_iter()
            .map(|(doc_id, acc)| {
                let norm = self.norm_of(&acc);
                let weights = acc.weights.iter().map(|(d, w)| (d, if norm > 0.0 { w / norm } else { w })).collect();
                (doc_id, weights)
            })
            .collect()
    }

    fn accumulator(&self, doc_id: DocId) -> Accumulator {
        let full_norm = match self.config.cosine {
            CosineMode::QueryRestricted => None,
            CosineMode::FullDocument => Some(self.raw_document_vector(doc_id).map_or(0.0, |v| v.norm())),
        };
        Accumulator { weights: SparseVector::new(), full_norm }
    }

    fn norm_of(&self, acc: &Accumulator) -> f64 {
        acc.full_norm.unwrap_or_else(|| acc.weights.norm())
    }

    // Cosine of the normalized accumulator against an already normalized query.
    fn cosine(&self, acc: &Accumulator, query: &SparseVector) -> f64 {
        let norm = self.norm_of(acc);
        if norm == 0.0 {
            return 0.0;
        }
        acc.weights.iter().map(|(dim, w)| (w / norm) * query.get(dim)).sum()
    }

    /// Term-at-a-time sweep over the postings of the query terms.
    ///
    /// For each new indexed query term the running query vector gains that
    /// dimension, and every document on the term's posting list gets its
    /// tf-idf weight recorded and its score refreshed. Once all terms are
    /// consumed each touched document is scored a last time against the
    /// complete query, so the selector ends up holding final cosines.
    pub fn score_query<S: AsRef<str>>(&self, terms: &[S]) -> TopK {
        let mut selector = TopK::new();
        let mut query = SparseVector::new();
        let mut accumulators: HashMap<DocId, Accumulator> = HashMap::new();
        let mut touched: Vec<DocId> = Vec::new();

        for term in terms {
            let Some(postings) = self.index.postings(term.as_ref()) else { continue };
            let dim = postings.dimension();
            if query.contains(dim) {
                continue;
            }
            query.set(dim, 1.0);
            let unit_query = query.clone().normalized();
            trace!(term = term.as_ref(), dim, df = postings.len(), "scoring postings");

            for posting in postings {
                let acc = accumulators.entry(posting.doc_id).or_insert_with(|| {
                    touched.push(posting.doc_id);
                    self.accumulator(posting.doc_id)
                });
                acc.weights.set(dim, posting.frequency as f64 * self.index.idf_of(postings));
                selector.upsert(posting.doc_id, self.cosine(acc, &unit_query));
            }
        }

        let unit_query = query.normalized();
        for doc_id in &touched {
            if let Some(acc) = accumulators.get(doc_id) {
                selector.upsert(*doc_id, self.cosine(acc, &unit_query));
            }
        }
        debug!(query_terms = terms.len(), matched_terms = unit_query.nnz(), docs = touched.len(), "scored query");
        selector
    }

    /// The `k` best documents sharing at least one term with the query.
    pub fn rank_by_query<S: AsRef<str>>(&self, terms: &[S], k: usize) -> Vec<Hit> {
        if k == 0 {
            return Vec::new();
        }
        self.score_query(terms).extract_top_k(k)
    }

    /// [`rank_by_query`](Self::rank_by_query) with the configured default k.
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Vec<Hit> {
        self.rank_by_query(terms, self.config.default_k)
    }

    /// Brute-force ranking against the full dense vector of every document.
    ///
    /// Kept as a baseline for the inverted path; only documents sharing a
    /// query term are reported.
    pub fn rank_dense<S: AsRef<str>>(&self, terms: &[S], k: usize) -> Vec<Hit> {
        let query = self.query_vector(terms);
        if query.is_zero() || k == 0 {
            return Vec::new();
        }
        let mut selector = TopK::new();
        for (doc_id, doc) in (0..self.index.num_docs()).zip(self.document_vectors()) {
            let shares_term = self
                .index
                .document_terms(doc_id)
                .is_some_and(|dims| dims.iter().any(|&d| query.contains(d)));
            if shares_term {
                selector.upsert(doc_id, doc.dot(&query));
            }
        }
        selector.extract_top_k(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvertedIndex {
        InvertedIndex::build(vec![
            vec!["cat", "dog"],
            vec!["dog", "dog", "fish"],
            vec!["cat", "fish"],
            vec!["cat"],
        ])
        .unwrap()
    }

    #[test]
    fn query_vector_uses_presence() {
        let idx = sample();
        let scorer = Scorer::new(&idx);
        let q = scorer.query_vector(&["dog", "dog", "fish", "bird"]);
        assert_eq!(q.nnz(), 2);
        assert!((q.get(1) - 0.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(q.get(1), q.get(2));
        assert!(scorer.query_vector(&["bird"]).is_zero());
    }

    #[test]
    fn dense_vector_is_unit_length() {
        let idx = sample();
        let scorer = Scorer::new(&idx);
        let v = scorer.document_vector_dense(1).unwrap();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert_eq!(v.nnz(), 2);
        assert!(scorer.document_vector_dense(9).is_none());
        assert_eq!(scorer.document_vectors().len(), 4);
    }

    #[test]
    fn worked_example() {
        let idx = sample();
        let hits = Scorer::new(&idx).rank_by_query(&["dog", "fish"], 10);
        let ids: Vec<DocId> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![1, 0, 2]);
        assert!((hits[0].score - 0.9487).abs() < 1e-4);
        assert!((hits[1].score - 0.7071).abs() < 1e-4);
        assert_eq!(hits[1].score, hits[2].score);
    }

    #[test]
    fn k_bounds_results() {
        let idx = sample();
        let scorer = Scorer::new(&idx);
        assert_eq!(scorer.rank_by_query(&["dog", "fish"], 1).len(), 1);
        assert!(scorer.rank_by_query(&["dog", "fish"], 0).is_empty());
        assert!(scorer.rank_by_query(&["bird"], 5).is_empty());
        let empty: [&str; 0] = [];
        assert!(scorer.rank_by_query(&empty, 5).is_empty());
    }

    #[test]
    fn query_document_vectors_are_restricted() {
        let idx = sample();
        let vectors = Scorer::new(&idx).query_document_vectors(&["dog"]);
        assert_eq!(vectors.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        // doc 0 also holds "cat", which the restricted vector ignores
        assert!((vectors[&0].get(1) - 1.0).abs() < 1e-12);
        assert_eq!(vectors[&0].get(0), 0.0);
    }

    #[test]
    fn full_document_mode_uses_whole_norm() {
        let idx = sample();
        let config = ScorerConfig { cosine: CosineMode::FullDocument, ..ScorerConfig::default() };
        let scorer = Scorer::with_config(&idx, config);
        let hits = scorer.rank_by_query(&["dog"], 10);
        let dense = scorer.rank_dense(&["dog"], 10);
        assert_eq!(hits.len(), dense.len());
        for (a, b) in hits.iter().zip(&dense) {
            assert_eq!(a.doc_id, b.doc_id);
            assert!((a.score - b.score).abs() < 1e-9);
        }
    }
}
