use std::sync::Arc;

use geo::{BoundingRect, MultiPolygon, Polygon, Rect, Simplify};

use super::level::AdmLevel;

/// A single administrative boundary unit at one level.
/// Keep the original shapeID text but avoid repeated owned Strings.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    pub level: AdmLevel,
    pub id: Arc<str>,            // e.g. "IND-ADM3-1590277" (stable shapeID)
    pub name: Option<Arc<str>>,  // Display name (shapeName)
    pub geometry: MultiPolygon<f64>,
}

impl BoundaryFeature {
    pub fn new(
        level: AdmLevel,
        id: impl Into<Arc<str>>,
        name: Option<&str>,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        Self { level, id: id.into(), name: name.map(Arc::from), geometry }
    }

    /// Constituent single-polygon parts. Containment is evaluated per part;
    /// a match on any part counts as a match for the whole feature.
    #[inline] pub fn parts(&self) -> &[Polygon<f64>] { &self.geometry.0 }

    #[inline] pub fn name_str(&self) -> Option<&str> { self.name.as_deref() }

    /// Bounding box of the full geometry. `None` for degenerate geometry
    /// (no usable parts), which excludes the feature from any spatial index.
    #[inline] pub fn bbox(&self) -> Option<Rect<f64>> { self.geometry.bounding_rect() }

    /// Reduce coordinate density with Ramer-Douglas-Peucker.
    pub fn simplify(&mut self, tolerance: f64) {
        self.geometry = self.geometry.simplify(&tolerance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0)]
    }

    #[test]
    fn parts_expose_each_polygon() {
        let mp = MultiPolygon(vec![square(0., 0., 1., 1.), square(2., 2., 3., 3.)]);
        let f = BoundaryFeature::new(AdmLevel::Adm3, "X-1", Some("X"), mp);
        assert_eq!(f.parts().len(), 2);
    }

    #[test]
    fn bbox_covers_all_parts() {
        let mp = MultiPolygon(vec![square(0., 0., 1., 1.), square(2., 2., 3., 3.)]);
        let f = BoundaryFeature::new(AdmLevel::Adm3, "X-1", Some("X"), mp);
        let rect = f.bbox().unwrap();
        assert_eq!((rect.min().x, rect.min().y), (0., 0.));
        assert_eq!((rect.max().x, rect.max().y), (3., 3.));
    }

    #[test]
    fn bbox_of_empty_geometry_is_none() {
        let f = BoundaryFeature::new(AdmLevel::Adm3, "X-2", None, MultiPolygon(vec![]));
        assert!(f.bbox().is_none());
    }
}
