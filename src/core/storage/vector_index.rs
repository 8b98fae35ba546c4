//! In-memory exact nearest-neighbour index.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{DocMindError, Result};
use crate::core::types::{Chunk, SearchHit};

/// Distance function used for insert and query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Euclidean distance
    #[default]
    L2,
    /// 1 - cosine similarity
    Cosine,
}

impl Metric {
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Metric::L2 => euclidean_distance_squared(a, b).sqrt(),
            Metric::Cosine => 1.0 - cosine_similarity(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::L2 => "l2",
            Metric::Cosine => "cosine",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DocMindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "l2" | "euclidean" => Ok(Metric::L2),
            "cosine" => Ok(Metric::Cosine),
            other => Err(DocMindError::ConfigError(format!(
                "Unknown metric '{}' (expected l2 or cosine)",
                other
            ))),
        }
    }
}

fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Read-only search capability used by the answer pipeline
pub trait VectorSearch: Send + Sync {
    /// Up to `k` nearest entries, nearest first, ties by ascending id
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>>;

    /// Number of entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension, `None` while empty
    fn dimension(&self) -> Option<usize>;
}

/// One stored vector with its chunk metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: u64,
    pub vector: Vec<f32>,
    pub chunk: Chunk,
}

/// Flat vector index with sequential ids
#[derive(Debug, Clone)]
pub struct VectorIndex {
    pub(crate) metric: Metric,
    pub(crate) dimension: Option<usize>,
    pub(crate) entries: Vec<IndexEntry>,
    pub(crate) next_id: u64,
    pub(crate) created_at: DateTime<Utc>,
}

impl VectorIndex {
    /// Empty index; the first insert fixes the dimension
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            dimension: None,
            entries: Vec::new(),
            next_id: 0,
            created_at: Utc::now(),
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Append a vector and return its id
    pub fn insert(&mut self, vector: Vec<f32>, chunk: Chunk) -> Result<u64> {
        if vector.is_empty() {
            return Err(DocMindError::InvalidVector(
                "cannot insert an empty vector".to_string(),
            ));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(DocMindError::InvalidVector(
                "vector contains NaN or infinite components".to_string(),
            ));
        }
        match self.dimension {
            Some(dim) if dim != vector.len() => {
                return Err(DocMindError::InvalidVector(format!(
                    "dimension mismatch: index has {}, got {}",
                    dim,
                    vector.len()
                )));
            }
            Some(_) => {}
            None => self.dimension = Some(vector.len()),
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(IndexEntry { id, vector, chunk });
        Ok(id)
    }
}

/// Heap element ordered by (distance, id); the heap top is the
/// current worst candidate.
struct Candidate {
    distance: f32,
    id: u64,
    position: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.id.cmp(&other.id))
    }
}

impl VectorSearch for VectorIndex {
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(dim) = self.dimension {
            if vector.len() != dim {
                return Err(DocMindError::InvalidVector(format!(
                    "query has {} dimensions, index has {}",
                    vector.len(),
                    dim
                )));
            }
        }

        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        for (position, entry) in self.entries.iter().enumerate() {
            let candidate = Candidate {
                distance: self.metric.distance(vector, &entry.vector),
                id: entry.id,
                position,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| SearchHit {
                id: c.id,
                distance: c.distance,
                chunk: self.entries[c.position].chunk.clone(),
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}
