//! BM25 relevance search with a flat title bonus.
//!
//! Term statistics are computed once per loaded index, eagerly, alongside the
//! graph index itself. Queries only read them.
//!
//! For a document `d` and each distinct query term `t` present in the corpus:
//!
//! ```text
//! idf   = ln((N - df + 0.5) / (df + 0.5) + 1)
//! tf'   = tf * (k1 + 1) / (tf + k1 * (1 - b + b * |d| / avgdl))
//! score += idf * tf'
//! score += idf * title_boost        if t occurs in the title of d
//! ```
//!
//! `|d|` counts content and title tokens together. Documents scoring zero are
//! not returned.

mod snippet;
mod tokenizer;

pub use snippet::SnippetBuilder;
pub use tokenizer::tokenize;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::config::SearchConfig;
use crate::graph::indexer::GraphIndex;
use crate::graph::models::{DiscourseNode, SearchHit};

/// A ranked keyword query with optional pre-scoring filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    /// Exact category tag.
    #[serde(default)]
    pub node_type: Option<String>,
    /// Case-insensitive substring of the creator name.
    #[serde(default)]
    pub creator: Option<String>,
    /// Maximum hits; the configured default applies when absent.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Per-document term statistics.
#[derive(Debug, Clone)]
struct DocumentTerms {
    uid: String,
    /// Content and title tokens together.
    term_freqs: HashMap<String, u32>,
    length: usize,
    title_freqs: HashMap<String, u32>,
    title_length: usize,
}

impl DocumentTerms {
    fn from_node(node: &DiscourseNode) -> Self {
        let content_tokens = tokenize(&node.content);
        let title_tokens = tokenize(&node.title);

        let mut term_freqs: HashMap<String, u32> = HashMap::new();
        let mut title_freqs: HashMap<String, u32> = HashMap::new();
        for token in &content_tokens {
            *term_freqs.entry(token.clone()).or_insert(0) += 1;
        }
        for token in &title_tokens {
            *term_freqs.entry(token.clone()).or_insert(0) += 1;
            *title_freqs.entry(token.clone()).or_insert(0) += 1;
        }

        Self {
            uid: node.uid.clone(),
            term_freqs,
            length: content_tokens.len() + title_tokens.len(),
            title_freqs,
            title_length: title_tokens.len(),
        }
    }
}

/// Corpus-wide term statistics for BM25.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    documents: Vec<DocumentTerms>,
    /// Number of documents containing each term at least once.
    doc_freqs: HashMap<String, usize>,
    avg_doc_len: f64,
    k1: f64,
    b: f64,
    title_boost: f64,
}

impl Bm25Index {
    /// Compute statistics for every node, in index order.
    pub fn build(index: &GraphIndex, config: &SearchConfig) -> Self {
        let documents: Vec<DocumentTerms> = index.nodes().map(DocumentTerms::from_node).collect();

        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        for doc in &documents {
            for term in doc.term_freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let total_len: usize = documents.iter().map(|d| d.length).sum();
        let avg_doc_len = if documents.is_empty() {
            0.0
        } else {
            total_len as f64 / documents.len() as f64
        };

        Self {
            documents,
            doc_freqs,
            avg_doc_len,
            k1: config.k1,
            b: config.b,
            title_boost: config.title_boost,
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    /// Number of documents containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }

    /// Inverse document frequency, `None` for terms absent from the corpus.
    pub fn idf(&self, term: &str) -> Option<f64> {
        let df = *self.doc_freqs.get(term)? as f64;
        let n = self.documents.len() as f64;
        Some(((n - df + 0.5) / (df + 0.5) + 1.0).ln())
    }

    /// Saturated, length-normalized term frequency.
    pub fn tf_component(&self, tf: f64, doc_len: usize) -> f64 {
        let relative_len = if self.avg_doc_len > 0.0 {
            doc_len as f64 / self.avg_doc_len
        } else {
            1.0
        };
        tf * (self.k1 + 1.0) / (tf + self.k1 * (1.0 - self.b + self.b * relative_len))
    }

    fn score(&self, doc: &DocumentTerms, terms: &[String]) -> f64 {
        let mut score = 0.0;
        for term in terms {
            let Some(idf) = self.idf(term) else {
                continue;
            };
            if let Some(&tf) = doc.term_freqs.get(term) {
                score += idf * self.tf_component(tf as f64, doc.length);
            }
            if doc.title_freqs.contains_key(term) {
                score += idf * self.title_boost;
            }
        }
        score
    }

    /// Score of one document for a raw query, `None` for unknown uids.
    pub fn score_uid(&self, uid: &str, query: &str) -> Option<f64> {
        let terms = query_terms(query);
        self.documents
            .iter()
            .find(|d| d.uid == uid)
            .map(|doc| self.score(doc, &terms))
    }

    /// Title token count of a document.
    pub fn title_length(&self, uid: &str) -> Option<usize> {
        self.documents
            .iter()
            .find(|d| d.uid == uid)
            .map(|d| d.title_length)
    }

    /// Matching documents as `(uid, score)`, best first, unrounded and
    /// untruncated. `accept` filters documents before they are scored.
    pub fn rank<'a, F>(&'a self, query: &str, mut accept: F) -> Vec<(&'a str, f64)>
    where
        F: FnMut(&str) -> bool,
    {
        let terms = query_terms(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(&str, f64)> = self
            .documents
            .iter()
            .filter(|doc| accept(doc.uid.as_str()))
            .map(|doc| (doc.uid.as_str(), self.score(doc, &terms)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Stable: equal scores keep index order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored
    }
}

/// Distinct query tokens in first-seen order.
fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Ranking plus result presentation.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    bm25: Bm25Index,
    snippets: SnippetBuilder,
    default_limit: usize,
    score_precision: u32,
}

impl SearchEngine {
    pub fn build(index: &GraphIndex, config: &SearchConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            bm25: Bm25Index::build(index, config),
            snippets: SnippetBuilder::new(config.snippet_length)?,
            default_limit: config.default_limit,
            score_precision: config.score_precision,
        })
    }

    pub fn bm25(&self) -> &Bm25Index {
        &self.bm25
    }

    /// Run a query against `index`, which must be the index this engine was
    /// built from.
    pub fn search(&self, index: &GraphIndex, query: &SearchQuery) -> Vec<SearchHit> {
        let node_type = query
            .node_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let creator = query
            .creator
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());
        let limit = query.limit.unwrap_or(self.default_limit);

        let ranked = self.bm25.rank(&query.text, |uid| {
            let Some(node) = index.node(uid) else {
                return false;
            };
            if let Some(tag) = node_type {
                if !node.has_type(tag) {
                    return false;
                }
            }
            if let Some(needle) = &creator {
                if !node.creator.to_lowercase().contains(needle.as_str()) {
                    return false;
                }
            }
            true
        });

        ranked
            .into_iter()
            .take(limit)
            .filter_map(|(uid, score)| {
                let node = index.node(uid)?;
                Some(SearchHit {
                    node: node.summary(),
                    snippet: self.snippets.build(&node.content),
                    score: round_to(score, self.score_precision),
                })
            })
            .collect()
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
