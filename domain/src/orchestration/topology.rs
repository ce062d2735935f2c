//! Topology and combination strategy selectors
//!
//! The two orthogonal axes of a collaboration:
//!
//! ```text
//! Topology             decides which models run, in what order, with what input
//!   parallel | sequential | voting | hierarchical
//!
//! CombinationStrategy  reduces the parallel contributions to one answer
//!   merge | vote | synthesis | critique_then_improve
//! ```

use serde::{Deserialize, Serialize};

/// Dispatch/ordering strategy for a collaboration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Every model at once; answer from the combination strategy
    #[default]
    Parallel,
    /// One model after another, each prompt derived from the previous role
    Sequential,
    /// Every model at once; highest confidence × weight wins
    Voting,
    /// Primary first, then critics/refiners seeded with its answer
    Hierarchical,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Parallel => "parallel",
            Topology::Sequential => "sequential",
            Topology::Voting => "voting",
            Topology::Hierarchical => "hierarchical",
        }
    }

    /// Whether models are dispatched concurrently
    pub fn is_concurrent(&self) -> bool {
        matches!(self, Topology::Parallel | Topology::Voting)
    }

    /// Whether the configured [`CombinationStrategy`] decides the final answer.
    ///
    /// Sequential, voting and hierarchical topologies select their own answer.
    pub fn uses_combination(&self) -> bool {
        matches!(self, Topology::Parallel)
    }

    pub fn all() -> [Topology; 4] {
        [
            Topology::Parallel,
            Topology::Sequential,
            Topology::Voting,
            Topology::Hierarchical,
        ]
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parallel" => Ok(Topology::Parallel),
            "sequential" => Ok(Topology::Sequential),
            "voting" => Ok(Topology::Voting),
            "hierarchical" => Ok(Topology::Hierarchical),
            other => Err(format!("unknown topology: {}", other)),
        }
    }
}

/// Reduction algorithm turning many contributions into one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationStrategy {
    #[default]
    Merge,
    Vote,
    Synthesis,
    CritiqueThenImprove,
}

impl CombinationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombinationStrategy::Merge => "merge",
            CombinationStrategy::Vote => "vote",
            CombinationStrategy::Synthesis => "synthesis",
            CombinationStrategy::CritiqueThenImprove => "critique_then_improve",
        }
    }

    /// Whether this strategy needs one extra backend call
    pub fn calls_backend(&self) -> bool {
        matches!(
            self,
            CombinationStrategy::Synthesis | CombinationStrategy::CritiqueThenImprove
        )
    }

    pub fn all() -> [CombinationStrategy; 4] {
        [
            CombinationStrategy::Merge,
            CombinationStrategy::Vote,
            CombinationStrategy::Synthesis,
            CombinationStrategy::CritiqueThenImprove,
        ]
    }
}

impl std::fmt::Display for CombinationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CombinationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "merge" => Ok(CombinationStrategy::Merge),
            "vote" => Ok(CombinationStrategy::Vote),
            "synthesis" => Ok(CombinationStrategy::Synthesis),
            "critique_then_improve" | "critique" => Ok(CombinationStrategy::CritiqueThenImprove),
            other => Err(format!("unknown combination strategy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_roundtrip() {
        for topology in Topology::all() {
            assert_eq!(topology.to_string().parse::<Topology>().unwrap(), topology);
        }
    }

    #[test]
    fn test_combination_roundtrip() {
        for strategy in CombinationStrategy::all() {
            assert_eq!(
                strategy.to_string().parse::<CombinationStrategy>().unwrap(),
                strategy
            );
        }
        assert_eq!(
            "critique-then-improve".parse::<CombinationStrategy>().unwrap(),
            CombinationStrategy::CritiqueThenImprove
        );
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!("star".parse::<Topology>().is_err());
        assert!("average".parse::<CombinationStrategy>().is_err());
    }

    #[test]
    fn test_only_parallel_uses_combination() {
        assert!(Topology::Parallel.uses_combination());
        assert!(!Topology::Voting.uses_combination());
        assert!(!Topology::Sequential.uses_combination());
        assert!(!Topology::Hierarchical.uses_combination());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&CombinationStrategy::CritiqueThenImprove).unwrap();
        assert_eq!(json, "\"critique_then_improve\"");
    }
}
