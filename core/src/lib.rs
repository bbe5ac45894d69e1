//! Vector-space retrieval over a pre-tokenized corpus.
//!
//! An [`InvertedIndex`] is built once from documents given as term sequences.
//! A [`Scorer`] ranks documents against a query by tf-idf cosine similarity,
//! walking only the posting lists of the query terms.

pub mod config;
pub mod error;
pub mod index;
pub mod postings;
pub mod scorer;
pub mod shared;
pub mod topk;
pub mod vector;

pub use config::{CosineMode, ScorerConfig};
pub use error::{IndexError, Result};
pub use index::{DocId, InvertedIndex, TermId};
pub use postings::{Posting, PostingList};
pub use scorer::Scorer;
pub use shared::SharedIndex;
pub use topk::{Hit, TopK};
pub use vector::SparseVector;
