use crate::{DocId, TermId};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub frequency: u32,
}

/// Postings of a single term, ordered by descending frequency.
///
/// Equal frequencies keep the order in which they first reached that
/// frequency, so a list built from the same occurrence sequence is always
/// identical.
#[derive(Debug, Clone)]
pub struct PostingList {
    dimension: TermId,
    postings: Vec<Posting>,
    slots: HashMap<DocId, usize>, // doc_id -> position in `postings`
}

impl PostingList {
    pub fn new(dimension: TermId) -> Self {
        Self { dimension, postings: Vec::new(), slots: HashMap::new() }
    }

    /// Record one more occurrence of the term in `doc_id`.
    pub fn add_occurrence(&mut self, doc_id: DocId) {
        let idx = match self.slots.get(&doc_id) {
            Some(&idx) => {
                self.postings[idx].frequency += 1;
                idx
            }
            None => {
                let idx = self.postings.len();
                self.postings.push(Posting { doc_id, frequency: 1 });
                self.slots.insert(doc_id, idx);
                idx
            }
        };
        self.bubble_left(idx);
    }

    // Only the entry at `idx` changed, by +1, so a single leftward pass restores order.
    fn bubble_left(&mut self, mut idx: usize) {
        while idx > 0 && self.postings[idx].frequency > self.postings[idx - 1].frequency {
            self.postings.swap(idx, idx - 1);
            self.slots.insert(self.postings[idx].doc_id, idx);
            self.slots.insert(self.postings[idx - 1].doc_id, idx - 1);
            idx -= 1;
        }
    }

    pub fn frequency_of(&self, doc_id: DocId) -> Option<u32> {
        self.slots.get(&doc_id).map(|&idx| self.postings[idx].frequency)
    }

    pub fn dimension(&self) -> TermId { self.dimension }

    /// Document frequency of the term.
    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Posting> + '_ { self.postings.iter() }

    pub fn as_slice(&self) -> &[Posting] { &self.postings }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter { self.postings.iter() }
}
