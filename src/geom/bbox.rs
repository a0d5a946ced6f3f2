use geo::Rect;
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a BoundaryFeature by index.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    idx: usize, // Index of corresponding feature in the source slice
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding feature.
    #[inline] pub fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}
