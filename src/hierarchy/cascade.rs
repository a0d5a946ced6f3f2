use std::fmt;
use std::sync::Arc;

use geo::{Contains, Intersects, Polygon, Relate};
use log::warn;

use crate::boundary::BoundaryFeature;

use super::group::GroupTable;
use super::index::CandidateIndex;
use super::key::normalize_key;

/// Terminal outcome of resolving one child feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A level-2 winner was found inside the level-1 winner's group.
    Full {
        parent_id: Arc<str>,
        parent_name: Option<Arc<str>>,
        parent_state: Option<Arc<str>>,
    },
    /// Level-1 matched but its group produced no level-2 winner: the child
    /// is demoted to the coarser parent. Not an error.
    LevelOneOnly { state_name: Option<Arc<str>> },
    /// No level-1 winner at all, or unusable child geometry. Checked and
    /// found nothing, as opposed to never checked.
    Unmatched,
}

impl Outcome {
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Outcome::Full { parent_id, .. } => Some(parent_id),
            _ => None,
        }
    }

    pub fn parent_name(&self) -> Option<&str> {
        match self {
            Outcome::Full { parent_name, .. } => parent_name.as_deref(),
            Outcome::LevelOneOnly { state_name } => state_name.as_deref(),
            Outcome::Unmatched => None,
        }
    }

    pub fn state_name(&self) -> Option<&str> {
        match self {
            Outcome::LevelOneOnly { state_name } => state_name.as_deref(),
            _ => None,
        }
    }

    pub fn parent_state(&self) -> Option<&str> {
        match self {
            Outcome::Full { parent_state, .. } => parent_state.as_deref(),
            _ => None,
        }
    }
}

/// Aggregate counters for one resolution pass. Surfaced at the end of a run;
/// recoverable errors are counted here rather than propagated.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveStats {
    pub matched: usize,
    pub level1_only: usize,
    pub unmatched: usize,
    pub skipped: usize,         // structurally invalid inputs dropped at parse
    pub geometry_errors: usize, // degenerate part pairs downgraded to no-match
    pub group_lookups: usize,   // level-2 group lookups performed
}

impl ResolveStats {
    #[inline] pub fn resolved(&self) -> usize { self.matched + self.level1_only + self.unmatched }
}

impl fmt::Display for ResolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matched={} level1_only={} unmatched={} skipped={} geometry_errors={}",
            self.matched, self.level1_only, self.unmatched, self.skipped, self.geometry_errors
        )
    }
}

#[derive(Clone, Copy)]
enum Chain {
    Level1, // within, intersects
    Level2, // within, overlaps, intersects
}

fn pair_degenerate(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    a.exterior().0.len() < 4 || b.exterior().0.len() < 4
}

/// Fixed level-1 predicate chain for one part pair, truthy short-circuit.
fn level1_pair(child: &Polygon<f64>, parent: &Polygon<f64>) -> bool {
    parent.contains(child) || child.intersects(parent)
}

/// Fixed level-2 chain: within, then area overlap, then intersects.
fn level2_pair(child: &Polygon<f64>, parent: &Polygon<f64>) -> bool {
    if parent.contains(child) {
        return true;
    }
    let im = child.relate(parent);
    // Overlap = intersects but not merely touching (boundary contact only).
    if im.is_intersects() && !im.is_touches() {
        return true;
    }
    child.intersects(parent)
}

/// True if any (child-part, candidate-part) pair satisfies the chain.
/// A degenerate pair is a non-match for that pair, never an abort.
fn any_part_pair(
    child: &BoundaryFeature,
    candidate: &BoundaryFeature,
    chain: Chain,
    stats: &mut ResolveStats,
) -> bool {
    child.parts().iter().any(|child_part| {
        candidate.parts().iter().any(|candidate_part| {
            if pair_degenerate(child_part, candidate_part) {
                warn!(
                    "degenerate part pair between {} and {}; treated as no match",
                    child.id, candidate.id
                );
                stats.geometry_errors += 1;
                return false;
            }
            match chain {
                Chain::Level1 => level1_pair(child_part, candidate_part),
                Chain::Level2 => level2_pair(child_part, candidate_part),
            }
        })
    })
}

/// Containment matcher against one parent level, pre-filtered through the
/// candidate index.
pub struct LevelMatcher<'a> {
    features: &'a [BoundaryFeature],
    index: &'a CandidateIndex,
}

impl<'a> LevelMatcher<'a> {
    pub fn new(features: &'a [BoundaryFeature], index: &'a CandidateIndex) -> Self {
        Self { features, index }
    }

    #[inline] pub fn feature(&self, idx: usize) -> &'a BoundaryFeature { &self.features[idx] }

    /// First candidate (in index-return order) with any matching part pair.
    /// A child without a computable box scans the full candidate list.
    pub fn find_parent(
        &self,
        child: &BoundaryFeature,
        stats: &mut ResolveStats,
    ) -> Option<usize> {
        match child.bbox() {
            Some(rect) => self
                .index
                .search(&rect)
                .find(|&idx| any_part_pair(child, &self.features[idx], Chain::Level1, stats)),
            None => self
                .index
                .all()
                .find(|&idx| any_part_pair(child, &self.features[idx], Chain::Level1, stats)),
        }
    }
}

/// Link one feature straight to a parent level (single-level resolution,
/// used to resolve districts against states before any deeper cascade).
pub fn link_to_parent(
    child: &BoundaryFeature,
    parents: &LevelMatcher<'_>,
    stats: &mut ResolveStats,
) -> Outcome {
    match parents.find_parent(child, stats) {
        Some(idx) => {
            stats.matched += 1;
            let parent = parents.feature(idx);
            Outcome::Full {
                parent_id: parent.id.clone(),
                parent_name: parent.name.clone(),
                parent_state: None,
            }
        }
        None => {
            warn!("no {} parent found for {}", child.level.to_str(), child.id);
            stats.unmatched += 1;
            Outcome::Unmatched
        }
    }
}

/// Two-stage parent resolution: level-1 winner through the spatial index,
/// then a level-2 winner from the grouping table restricted to the level-1
/// winner's group. Read-only over shared indices; each call resolves one
/// child and touches nothing else.
pub struct Cascade<'a> {
    level1: LevelMatcher<'a>,
    level2: &'a [BoundaryFeature],
    groups: &'a GroupTable,
}

impl<'a> Cascade<'a> {
    pub fn new(
        level1_features: &'a [BoundaryFeature],
        level1_index: &'a CandidateIndex,
        level2_features: &'a [BoundaryFeature],
        groups: &'a GroupTable,
    ) -> Self {
        Self {
            level1: LevelMatcher::new(level1_features, level1_index),
            level2: level2_features,
            groups,
        }
    }

    pub fn resolve(&self, child: &BoundaryFeature, stats: &mut ResolveStats) -> Outcome {
        // Level-2 matching is never attempted without a level-1 parent.
        let Some(state_idx) = self.level1.find_parent(child, stats) else {
            warn!("no {} match for {}", child.level.to_str(), child.id);
            stats.unmatched += 1;
            return Outcome::Unmatched;
        };
        let state = self.level1.feature(state_idx);

        stats.group_lookups += 1;
        let winner = self
            .groups
            .get(&normalize_key(state.name_str()))
            .and_then(|members| {
                members.iter().copied().find(|&idx| {
                    any_part_pair(child, &self.level2[idx], Chain::Level2, stats)
                })
            });

        match winner {
            Some(idx) => {
                stats.matched += 1;
                let district = &self.level2[idx];
                Outcome::Full {
                    parent_id: district.id.clone(),
                    parent_name: district.name.clone(),
                    parent_state: state.name.clone(),
                }
            }
            None => {
                stats.level1_only += 1;
                Outcome::LevelOneOnly { state_name: state.name.clone() }
            }
        }
    }
}
