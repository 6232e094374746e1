//! Signed trust graph model
//!
//! A trust network is a set of entities plus an ordered mapping from
//! (source, target) pairs to balanced-ternary trust values. This module is
//! pure data: filtering, statistics, and the JSON document boundary live
//! here, with no rendering or layout concerns.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur in the graph model
#[derive(Error, Debug)]
pub enum GraphError {
    /// The threshold is outside the balanced-ternary set
    #[error("invalid trust threshold: {0} (expected -1, 0, or 1)")]
    InvalidThreshold(i8),

    /// The trust value is outside the balanced-ternary set
    #[error("invalid trust value: {0} (expected -1, 0, or 1)")]
    InvalidTrustValue(i8),

    /// The trust network document could not be parsed
    #[error("malformed trust network document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// A balanced-ternary trust value: negative, neutral, or positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrustValue {
    Negative,
    Neutral,
    Positive,
}

impl TrustValue {
    /// The raw document representation (-1, 0, or +1)
    pub fn as_i8(self) -> i8 {
        match self {
            TrustValue::Negative => -1,
            TrustValue::Neutral => 0,
            TrustValue::Positive => 1,
        }
    }
}

impl TryFrom<i8> for TrustValue {
    type Error = GraphError;

    fn try_from(value: i8) -> GraphResult<Self> {
        match value {
            -1 => Ok(TrustValue::Negative),
            0 => Ok(TrustValue::Neutral),
            1 => Ok(TrustValue::Positive),
            other => Err(GraphError::InvalidTrustValue(other)),
        }
    }
}

/// A threshold for deriving a filtered sub-graph.
///
/// Threshold 0 keeps all non-neutral edges; +1 keeps only positive edges;
/// -1 keeps only negative edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Threshold {
    Negative,
    Neutral,
    Positive,
}

impl Threshold {
    /// The raw document representation (-1, 0, or +1)
    pub fn as_i8(self) -> i8 {
        match self {
            Threshold::Negative => -1,
            Threshold::Neutral => 0,
            Threshold::Positive => 1,
        }
    }

    fn keeps(self, value: TrustValue) -> bool {
        match self {
            Threshold::Neutral => value != TrustValue::Neutral,
            Threshold::Positive => value == TrustValue::Positive,
            Threshold::Negative => value == TrustValue::Negative,
        }
    }
}

impl TryFrom<i8> for Threshold {
    type Error = GraphError;

    fn try_from(value: i8) -> GraphResult<Self> {
        match value {
            -1 => Ok(Threshold::Negative),
            0 => Ok(Threshold::Neutral),
            1 => Ok(Threshold::Positive),
            other => Err(GraphError::InvalidThreshold(other)),
        }
    }
}

impl From<Threshold> for i8 {
    fn from(threshold: Threshold) -> i8 {
        threshold.as_i8()
    }
}

/// Document-level metadata carried alongside the graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkMeta {
    /// World identifier from the source document
    pub world_id: Option<String>,
    /// Creation timestamp from the source document (opaque string)
    pub created: Option<String>,
    /// Human-readable description
    pub description: Option<String>,
}

/// Aggregate statistics over a trust graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkStats {
    pub entity_count: usize,
    pub edge_count: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    /// Edge count over the number of possible ordered pairs; 0 for fewer
    /// than two entities.
    pub density: f64,
}

/// Count of document entries dropped during a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Edges dropped for referencing unknown entities, being self-edges,
    /// or carrying an out-of-range trust value
    pub dropped_edges: usize,
}

/// The wire shape of a trust network document.
///
/// This is the contract with the external data source; field names follow
/// the document's camelCase convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustNetworkDocument {
    #[serde(default)]
    pub world_id: Option<String>,
    pub entities: Vec<String>,
    #[serde(default)]
    pub trust_matrix: HashMap<String, HashMap<String, i8>>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A set of entities plus signed trust relationships between them.
///
/// Entity order is document/insertion order and is the canonical iteration
/// order everywhere (layout indexing, buffer building, pick tie-breaking).
/// Edges are keyed by entity index pairs, so there is at most one trust
/// value per ordered pair and iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct TrustGraph {
    entities: Vec<String>,
    index: HashMap<String, usize>,
    edges: BTreeMap<(usize, usize), TrustValue>,
    pub meta: NetworkMeta,
}

impl TrustGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph from an entity list, deduplicating while preserving order
    pub fn with_entities<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for entity in entities {
            graph.add_entity(entity);
        }
        graph
    }

    /// Add an entity. Returns false if it is already present.
    pub fn add_entity(&mut self, entity: impl Into<String>) -> bool {
        let entity = entity.into();
        if self.index.contains_key(&entity) {
            return false;
        }
        self.index.insert(entity.clone(), self.entities.len());
        self.entities.push(entity);
        true
    }

    /// Set the trust value between two entities.
    ///
    /// Returns false (and changes nothing) for self-edges or unknown
    /// endpoints. Setting an existing pair replaces its value.
    pub fn set_trust(&mut self, source: &str, target: &str, value: TrustValue) -> bool {
        if source == target {
            return false;
        }
        let (Some(&s), Some(&t)) = (self.index.get(source), self.index.get(target)) else {
            return false;
        };
        self.edges.insert((s, t), value);
        true
    }

    /// The trust value from `source` to `target`, if one is recorded
    pub fn trust_between(&self, source: &str, target: &str) -> Option<TrustValue> {
        let s = self.index.get(source)?;
        let t = self.index.get(target)?;
        self.edges.get(&(*s, *t)).copied()
    }

    /// All outgoing trust relationships for an entity, in target order
    pub fn outgoing_trust(&self, entity: &str) -> Vec<(&str, TrustValue)> {
        let Some(&idx) = self.index.get(entity) else {
            return Vec::new();
        };
        self.edges
            .range((idx, 0)..(idx + 1, 0))
            .map(|(&(_, t), &value)| (self.entities[t].as_str(), value))
            .collect()
    }

    /// All incoming trust relationships for an entity, in source order
    pub fn incoming_trust(&self, entity: &str) -> Vec<(&str, TrustValue)> {
        let Some(&idx) = self.index.get(entity) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .filter(|&(&(_, t), _)| t == idx)
            .map(|(&(s, _), &value)| (self.entities[s].as_str(), value))
            .collect()
    }

    /// Entities in canonical order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the entity is in the graph
    pub fn contains(&self, entity: &str) -> bool {
        self.index.contains_key(entity)
    }

    /// The canonical index of an entity, if present
    pub fn index_of(&self, entity: &str) -> Option<usize> {
        self.index.get(entity).copied()
    }

    /// Edges as (source, target, value) name triples, in index order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, TrustValue)> + '_ {
        self.edges.iter().map(|(&(s, t), &value)| {
            (self.entities[s].as_str(), self.entities[t].as_str(), value)
        })
    }

    /// Edges as (source index, target index, value) triples, in index order
    pub fn edge_indices(&self) -> impl Iterator<Item = (usize, usize, TrustValue)> + '_ {
        self.edges.iter().map(|(&(s, t), &value)| (s, t, value))
    }

    /// Derive the sub-graph of edges satisfying the threshold predicate.
    ///
    /// The entity set is unchanged; only edges are restricted. The result
    /// is a fresh graph, recomputed from scratch, never a mutated view.
    pub fn filter_by_threshold(&self, threshold: Threshold) -> TrustGraph {
        TrustGraph {
            entities: self.entities.clone(),
            index: self.index.clone(),
            edges: self
                .edges
                .iter()
                .filter(|&(_, &value)| threshold.keeps(value))
                .map(|(&pair, &value)| (pair, value))
                .collect(),
            meta: NetworkMeta {
                world_id: self.meta.world_id.clone(),
                created: self.meta.created.clone(),
                description: Some(format!(
                    "Filtered trust network (threshold: {})",
                    threshold.as_i8()
                )),
            },
        }
    }

    /// Aggregate statistics over the graph
    pub fn stats(&self) -> NetworkStats {
        let mut positive = 0;
        let mut neutral = 0;
        let mut negative = 0;
        for &value in self.edges.values() {
            match value {
                TrustValue::Positive => positive += 1,
                TrustValue::Neutral => neutral += 1,
                TrustValue::Negative => negative += 1,
            }
        }

        let n = self.entities.len();
        let density = if n > 1 {
            self.edges.len() as f64 / (n * (n - 1)) as f64
        } else {
            0.0
        };

        NetworkStats {
            entity_count: n,
            edge_count: self.edges.len(),
            positive_count: positive,
            neutral_count: neutral,
            negative_count: negative,
            density,
        }
    }

    /// Build a graph from a parsed document.
    ///
    /// Malformed matrix entries (self-edges, unknown endpoints, values
    /// outside {-1, 0, 1}) are dropped and counted rather than failing the
    /// whole load.
    pub fn from_document(doc: &TrustNetworkDocument) -> (TrustGraph, LoadReport) {
        let mut graph = TrustGraph::with_entities(doc.entities.iter().cloned());
        graph.meta = NetworkMeta {
            world_id: doc.world_id.clone(),
            created: doc.created.clone(),
            description: doc.description.clone(),
        };

        let mut dropped = 0usize;
        for (source, targets) in &doc.trust_matrix {
            for (target, &raw) in targets {
                let valid = source != target
                    && graph.contains(source)
                    && graph.contains(target);
                match (valid, TrustValue::try_from(raw)) {
                    (true, Ok(value)) => {
                        graph.set_trust(source, target, value);
                    }
                    _ => dropped += 1,
                }
            }
        }

        if dropped > 0 {
            warn!(dropped, "dropped malformed trust matrix entries");
        }

        (graph, LoadReport { dropped_edges: dropped })
    }

    /// Parse a trust network JSON document.
    ///
    /// Fails only on document-level syntax/shape errors; individual
    /// malformed edges are dropped per [`TrustGraph::from_document`].
    pub fn from_json(json: &str) -> GraphResult<(TrustGraph, LoadReport)> {
        let doc: TrustNetworkDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(&doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_graph() -> TrustGraph {
        let mut graph = TrustGraph::with_entities(["A", "B", "C"]);
        graph.set_trust("A", "B", TrustValue::Positive);
        graph.set_trust("B", "C", TrustValue::Negative);
        graph
    }

    #[test]
    fn trust_value_round_trips() {
        for raw in [-1i8, 0, 1] {
            let value = TrustValue::try_from(raw).unwrap();
            assert_eq!(value.as_i8(), raw);
        }
    }

    #[test]
    fn trust_value_rejects_out_of_range() {
        assert!(matches!(
            TrustValue::try_from(2),
            Err(GraphError::InvalidTrustValue(2))
        ));
        assert!(matches!(
            TrustValue::try_from(-3),
            Err(GraphError::InvalidTrustValue(-3))
        ));
    }

    #[test]
    fn threshold_rejects_out_of_range() {
        assert!(matches!(
            Threshold::try_from(2),
            Err(GraphError::InvalidThreshold(2))
        ));
        assert_eq!(Threshold::try_from(-1).unwrap(), Threshold::Negative);
    }

    #[test]
    fn self_edges_rejected() {
        let mut graph = TrustGraph::with_entities(["A", "B"]);
        assert!(!graph.set_trust("A", "A", TrustValue::Positive));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn unknown_endpoints_rejected() {
        let mut graph = TrustGraph::with_entities(["A"]);
        assert!(!graph.set_trust("A", "missing", TrustValue::Positive));
        assert!(!graph.set_trust("missing", "A", TrustValue::Positive));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_entities_deduplicated() {
        let graph = TrustGraph::with_entities(["A", "B", "A"]);
        assert_eq!(graph.entity_count(), 2);
        assert_eq!(graph.index_of("A"), Some(0));
        assert_eq!(graph.index_of("B"), Some(1));
    }

    #[test]
    fn at_most_one_value_per_ordered_pair() {
        let mut graph = TrustGraph::with_entities(["A", "B"]);
        graph.set_trust("A", "B", TrustValue::Positive);
        graph.set_trust("A", "B", TrustValue::Negative);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.trust_between("A", "B"), Some(TrustValue::Negative));
    }

    #[test]
    fn filter_threshold_scenario() {
        let graph = abc_graph();

        let all = graph.filter_by_threshold(Threshold::Neutral);
        assert_eq!(all.edge_count(), 2);
        assert_eq!(all.trust_between("A", "B"), Some(TrustValue::Positive));
        assert_eq!(all.trust_between("B", "C"), Some(TrustValue::Negative));

        let positive = graph.filter_by_threshold(Threshold::Positive);
        assert_eq!(positive.edge_count(), 1);
        assert_eq!(positive.trust_between("A", "B"), Some(TrustValue::Positive));

        let negative = graph.filter_by_threshold(Threshold::Negative);
        assert_eq!(negative.edge_count(), 1);
        assert_eq!(negative.trust_between("B", "C"), Some(TrustValue::Negative));
    }

    #[test]
    fn filter_zero_excludes_neutral_edges() {
        let mut graph = abc_graph();
        graph.set_trust("A", "C", TrustValue::Neutral);

        let filtered = graph.filter_by_threshold(Threshold::Neutral);
        assert_eq!(filtered.trust_between("A", "C"), None);
        assert!(filtered.edges().all(|(_, _, v)| v != TrustValue::Neutral));
    }

    #[test]
    fn filter_is_idempotent() {
        let graph = abc_graph();
        for threshold in [Threshold::Negative, Threshold::Neutral, Threshold::Positive] {
            let once = graph.filter_by_threshold(threshold);
            let twice = once.filter_by_threshold(threshold);
            let a: Vec<_> = once.edge_indices().collect();
            let b: Vec<_> = twice.edge_indices().collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn filter_preserves_entity_set() {
        let graph = abc_graph();
        let filtered = graph.filter_by_threshold(Threshold::Positive);
        assert_eq!(filtered.entities(), graph.entities());
    }

    #[test]
    fn filter_stamps_description() {
        let graph = abc_graph();
        let filtered = graph.filter_by_threshold(Threshold::Positive);
        assert_eq!(
            filtered.meta.description.as_deref(),
            Some("Filtered trust network (threshold: 1)")
        );
    }

    #[test]
    fn stats_counts_sum_to_edge_count() {
        let mut graph = abc_graph();
        graph.set_trust("C", "A", TrustValue::Neutral);
        let stats = graph.stats();
        assert_eq!(
            stats.positive_count + stats.neutral_count + stats.negative_count,
            stats.edge_count
        );
        assert_eq!(stats.edge_count, 3);
    }

    #[test]
    fn stats_density() {
        let graph = abc_graph();
        let stats = graph.stats();
        // 2 edges over 3 * 2 possible ordered pairs
        assert!((stats.density - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn stats_density_guards_small_graphs() {
        assert_eq!(TrustGraph::new().stats().density, 0.0);
        assert_eq!(TrustGraph::with_entities(["A"]).stats().density, 0.0);
    }

    #[test]
    fn incoming_and_outgoing_trust() {
        let graph = abc_graph();
        assert_eq!(
            graph.outgoing_trust("A"),
            vec![("B", TrustValue::Positive)]
        );
        assert_eq!(
            graph.incoming_trust("C"),
            vec![("B", TrustValue::Negative)]
        );
        assert!(graph.outgoing_trust("C").is_empty());
        assert!(graph.incoming_trust("unknown").is_empty());
    }

    #[test]
    fn from_document_drops_malformed_entries() {
        let json = r#"{
            "worldId": "vibes",
            "entities": ["A", "B"],
            "trustMatrix": {
                "A": {"B": 1, "A": 1, "ghost": -1},
                "B": {"A": 7}
            },
            "created": "2025-03-01",
            "description": "test network"
        }"#;
        let (graph, report) = TrustGraph::from_json(json).unwrap();

        // self-edge, unknown target, out-of-range value
        assert_eq!(report.dropped_edges, 3);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.trust_between("A", "B"), Some(TrustValue::Positive));
        assert_eq!(graph.meta.world_id.as_deref(), Some("vibes"));
    }

    #[test]
    fn from_json_rejects_syntax_errors() {
        assert!(matches!(
            TrustGraph::from_json("{not json"),
            Err(GraphError::Document(_))
        ));
    }

    #[test]
    fn empty_document_loads() {
        let (graph, report) =
            TrustGraph::from_json(r#"{"entities": []}"#).unwrap();
        assert_eq!(graph.entity_count(), 0);
        assert_eq!(report.dropped_edges, 0);
    }
}
