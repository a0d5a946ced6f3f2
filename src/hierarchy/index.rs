use geo::Rect;
use log::warn;
use rstar::{RTree, AABB};

use crate::boundary::BoundaryFeature;
use crate::geom::BoundingBox;

/// Bounding-box pre-filter over one level's parent candidates.
///
/// Features whose bounding box cannot be computed are excluded at build time
/// (logged, never inserted with a degenerate box) and become unreachable as
/// candidates; the run continues without them.
#[derive(Debug)]
pub struct CandidateIndex {
    rtree: RTree<BoundingBox>,
    loaded: Vec<usize>, // Indices that made it into the tree, in load order
    dropped: usize,
}

impl CandidateIndex {
    pub fn build(features: &[BoundaryFeature]) -> Self {
        let mut entries = Vec::with_capacity(features.len());
        let mut loaded = Vec::with_capacity(features.len());
        let mut dropped = 0;
        for (idx, feature) in features.iter().enumerate() {
            match feature.bbox() {
                Some(rect) => {
                    entries.push(BoundingBox::new(idx, rect));
                    loaded.push(idx);
                }
                None => {
                    warn!(
                        "no bounding box for {} candidate {}; excluded from index",
                        feature.level.to_str(),
                        feature.id
                    );
                    dropped += 1;
                }
            }
        }
        Self { rtree: RTree::bulk_load(entries), loaded, dropped }
    }

    /// Candidates whose box overlaps `rect`, in index-return order.
    ///
    /// That order is index-implementation-defined, not a proximity order: if
    /// two candidates both geometrically claim a child, which one wins is
    /// nondeterministic across index implementations. Accepted limitation.
    pub fn search(&self, rect: &Rect<f64>) -> impl Iterator<Item = usize> + '_ {
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
        self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(BoundingBox::idx)
    }

    /// Every indexed candidate, in load order. Fallback for a query feature
    /// with no computable box: treat it as able to match anything.
    pub fn all(&self) -> impl Iterator<Item = usize> + '_ {
        self.loaded.iter().copied()
    }

    #[inline] pub fn len(&self) -> usize { self.loaded.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.loaded.is_empty() }

    /// Number of features excluded because their box could not be computed.
    #[inline] pub fn dropped(&self) -> usize { self.dropped }
}
