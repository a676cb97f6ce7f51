//! Counters kept by the enumeration engines
//!
//! Each engine owns one stats struct, updated inline at its instrumentation
//! points and exposed through `stats()`. Everything serializes with serde so
//! callers can dump a run with `serde_json::to_string(&engine.stats())`.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::time::Duration;

fn secs(d: &Duration) -> f64 {
    d.as_secs_f64()
}

/// Counters of one subset-minimality index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Sets inserted
    pub insertions: usize,
    /// Minimality queries answered
    pub queries: usize,
    /// Queries answered "not minimal"
    pub rejected: usize,
    /// Subtrees skipped by the fingerprint or length filter
    pub filter_skips: usize,
    /// Trie nodes entered while answering queries
    pub nodes_visited: usize,
}

impl IndexStats {
    /// Add the counters of `other` to `self`
    pub fn absorb(&mut self, other: &IndexStats) {
        self.insertions += other.insertions;
        self.queries += other.queries;
        self.rejected += other.rejected;
        self.filter_skips += other.filter_skips;
        self.nodes_visited += other.nodes_visited;
    }
}

/// Statistics of a `ResolutionJustificationComputation`.
#[derive(Debug, Clone, Default)]
pub struct ResolutionStats {
    /// Derived inferences and resolvents put on the queue
    pub produced_inferences: usize,
    /// Derived inferences retained as minimal for their conclusion
    pub minimal_inferences: usize,
    /// Derived inferences parked because their justification was dominated
    pub blocked_inferences: usize,
    /// Justifications reported to listeners
    pub justifications: usize,
    /// Time spent inside `enumerate`
    pub enumeration_time: Duration,
    /// Aggregated counters of all minimality indices of the engine
    pub minimality_index: IndexStats,
}

impl Serialize for ResolutionStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResolutionStats", 6)?;
        s.serialize_field("produced_inferences", &self.produced_inferences)?;
        s.serialize_field("minimal_inferences", &self.minimal_inferences)?;
        s.serialize_field("blocked_inferences", &self.blocked_inferences)?;
        s.serialize_field("justifications", &self.justifications)?;
        s.serialize_field("enumeration_time", &secs(&self.enumeration_time))?;
        s.serialize_field("minimality_index", &self.minimality_index)?;
        s.end()
    }
}

/// Statistics of a `TopDownRepairComputation`.
#[derive(Debug, Clone, Default)]
pub struct RepairStats {
    /// Jobs put on the queue
    pub produced_jobs: usize,
    /// Jobs that survived the minimality checks and were expanded
    pub minimal_jobs: usize,
    /// Repairs reported to listeners
    pub repairs: usize,
    /// Time spent inside `enumerate`
    pub enumeration_time: Duration,
    /// Aggregated counters of the job and repair indices
    pub minimality_index: IndexStats,
}

impl Serialize for RepairStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RepairStats", 5)?;
        s.serialize_field("produced_jobs", &self.produced_jobs)?;
        s.serialize_field("minimal_jobs", &self.minimal_jobs)?;
        s.serialize_field("repairs", &self.repairs)?;
        s.serialize_field("enumeration_time", &secs(&self.enumeration_time))?;
        s.serialize_field("minimality_index", &self.minimality_index)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb() {
        let mut total = IndexStats::default();
        let part = IndexStats {
            insertions: 2,
            queries: 5,
            rejected: 1,
            filter_skips: 3,
            nodes_visited: 9,
        };
        total.absorb(&part);
        total.absorb(&part);
        assert_eq!(total.queries, 10);
        assert_eq!(total.nodes_visited, 18);
    }

    #[test]
    fn test_resolution_stats_json() {
        let stats = ResolutionStats {
            justifications: 4,
            enumeration_time: Duration::from_millis(1500),
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["justifications"], 4);
        assert_eq!(json["enumeration_time"], 1.5);
        assert_eq!(json["minimality_index"]["insertions"], 0);
    }
}
