use crate::error::{IndexError, Result};
use crate::postings::PostingList;
use std::collections::HashMap;
use tracing::{debug, info};

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone)]
struct TermEntry {
    term: String,
    postings: PostingList,
}

/// Term -> postings index over a fixed corpus.
///
/// Terms are stored in an arena indexed by their dimension. Pruning empties
/// a slot instead of shifting the arena, so a dimension handed out once stays
/// valid for the lifetime of the index.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    dictionary: HashMap<String, TermId>,
    terms: Vec<Option<TermEntry>>,
    doc_terms: Vec<Vec<TermId>>, // distinct dimensions per document, first-occurrence order
    num_docs: u32,
}

impl InvertedIndex {
    /// Index every document of `corpus`, assigning doc ids in corpus order.
    pub fn build<I, D, S>(corpus: I) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self {
            dictionary: HashMap::new(),
            terms: Vec::new(),
            doc_terms: Vec::new(),
            num_docs: 0,
        };
        let mut occurrences = 0usize;
        for (doc_idx, doc) in corpus.into_iter().enumerate() {
            let doc_id = DocId::try_from(doc_idx).map_err(|_| IndexError::CorpusTooLarge)?;
            let mut dims = Vec::new();
            for token in doc {
                let dim = index.intern(token.as_ref())?;
                let Some(entry) = index.terms[dim as usize].as_mut() else { continue };
                if entry.postings.frequency_of(doc_id).is_none() {
                    dims.push(dim);
                }
                entry.postings.add_occurrence(doc_id);
                occurrences += 1;
            }
            index.doc_terms.push(dims);
            index.num_docs = doc_id + 1;
        }
        if index.num_docs == 0 {
            return Err(IndexError::EmptyCorpus);
        }
        debug!(docs = index.num_docs, terms = index.terms.len(), occurrences, "built inverted index");
        Ok(index)
    }

    // Look up `token`, creating its posting list with the next free dimension.
    fn intern(&mut self, token: &str) -> Result<TermId> {
        if let Some(&dim) = self.dictionary.get(token) {
            return Ok(dim);
        }
        let dim = TermId::try_from(self.terms.len()).map_err(|_| IndexError::CorpusTooLarge)?;
        self.dictionary.insert(token.to_string(), dim);
        self.terms.push(Some(TermEntry { term: token.to_string(), postings: PostingList::new(dim) }));
        Ok(dim)
    }

    /// Corpus size N.
    pub fn num_docs(&self) -> u32 { self.num_docs }

    /// Number of terms currently indexed (pruned terms excluded).
    pub fn len(&self) -> usize { self.dictionary.len() }

    pub fn is_empty(&self) -> bool { self.dictionary.is_empty() }

    /// Size of the vector space: every dimension ever assigned, pruned ones included.
    pub fn dimensions(&self) -> usize { self.terms.len() }

    pub fn contains(&self, term: &str) -> bool { self.dictionary.contains_key(term) }

    pub fn dimension_of(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.dimension_of(term).and_then(|dim| self.postings_at(dim))
    }

    pub fn postings_at(&self, dim: TermId) -> Option<&PostingList> {
        self.terms.get(dim as usize)?.as_ref().map(|e| &e.postings)
    }

    pub fn term_at(&self, dim: TermId) -> Option<&str> {
        self.terms.get(dim as usize)?.as_ref().map(|e| e.term.as_str())
    }

    /// Indexed terms with their dimensions, in dimension order.
    pub fn terms(&self) -> impl Iterator<Item = (TermId, &str)> + '_ {
        self.terms.iter().flatten().map(|e| (e.postings.dimension(), e.term.as_str()))
    }

    /// Distinct indexed dimensions occurring in `doc_id`.
    pub fn document_terms(&self, doc_id: DocId) -> Option<&[TermId]> {
        self.doc_terms.get(doc_id as usize).map(Vec::as_slice)
    }

    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.postings(term).map(PostingList::len)
    }

    pub fn inverse_document_frequency(&self, term: &str) -> Option<f64> {
        self.postings(term).map(|p| self.idf_of(p))
    }

    /// Frequency of `term` in `doc_id`; `Some(0)` if the term is indexed but
    /// does not occur in that document.
    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> Option<u32> {
        self.postings(term).map(|p| p.frequency_of(doc_id).unwrap_or(0))
    }

    pub fn tf_idf(&self, term: &str, doc_id: DocId) -> Option<f64> {
        self.postings(term).map(|p| self.tf_idf_of(p, doc_id))
    }

    pub(crate) fn idf_of(&self, postings: &PostingList) -> f64 {
        (self.num_docs as f64 / postings.len() as f64).log10()
    }

    pub(crate) fn tf_idf_of(&self, postings: &PostingList, doc_id: DocId) -> f64 {
        postings.frequency_of(doc_id).unwrap_or(0) as f64 * self.idf_of(postings)
    }

    /// Drop every term whose document frequency exceeds `threshold_fraction * N`.
    ///
    /// Returns the removed terms in dimension order. Dimensions of the
    /// surviving terms are left untouched.
    pub fn prune_high_frequency_terms(&mut self, threshold_fraction: f64) -> Result<Vec<String>> {
        if threshold_fraction.is_nan() || threshold_fraction < 0.0 {
            return Err(IndexError::InvalidThreshold(threshold_fraction));
        }
        let limit = threshold_fraction * self.num_docs as f64;
        let mut removed = Vec::new();
        for slot in self.terms.iter_mut() {
            if slot.as_ref().is_some_and(|e| e.postings.len() as f64 > limit) {
                if let Some(entry) = slot.take() {
                    self.dictionary.remove(&entry.term);
                    removed.push(entry.term);
                }
            }
        }
        if !removed.is_empty() {
            let terms = &self.terms;
            for dims in self.doc_terms.iter_mut() {
                dims.retain(|&d| terms[d as usize].is_some());
            }
        }
        info!(threshold_fraction, removed = removed.len(), remaining = self.len(), "pruned high-frequency terms");
        Ok(removed)
    }
}
