use crate::DocId;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub score: f64,
}

type RankKey = (Reverse<OrderedFloat<f64>>, u64, DocId);

/// Latest score per document, kept in rank order.
///
/// Each document remembers the sequence number of its first upsert, which
/// breaks ties between equal scores (first seen ranks first).
#[derive(Debug, Default)]
pub struct TopK {
    ranked: BTreeSet<RankKey>,
    entries: HashMap<DocId, (OrderedFloat<f64>, u64)>,
    next_seq: u64,
}

impl TopK {
    pub fn new() -> Self { Self::default() }

    /// Set the score of `doc_id`, replacing any previous one.
    pub fn upsert(&mut self, doc_id: DocId, score: f64) {
        let score = OrderedFloat(score);
        let seq = match self.entries.get(&doc_id) {
            Some(&(old, seq)) => {
                self.ranked.remove(&(Reverse(old), seq, doc_id));
                seq
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        self.entries.insert(doc_id, (score, seq));
        self.ranked.insert((Reverse(score), seq, doc_id));
    }

    pub fn get(&self, doc_id: DocId) -> Option<f64> {
        self.entries.get(&doc_id).map(|(s, _)| s.0)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Up to `k` hits, highest score first.
    pub fn extract_top_k(&self, k: usize) -> Vec<Hit> {
        self.ranked
            .iter()
            .take(k)
            .map(|&(Reverse(score), _, doc_id)| Hit { doc_id, score: score.0 })
            .collect()
    }
}
