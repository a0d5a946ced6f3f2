use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use geo::BoundingRect;
use serde_json::json;

use crate::boundary::BoundaryFeature;
use crate::common::PendingWrite;
use crate::geom::Bounds;
use crate::hierarchy::Outcome;

use super::geojson::resolved_record;

/// Streaming FeatureCollection writer. Records are serialized as they
/// arrive and never retained; a running dataset bounding box is folded
/// across every appended feature. The underlying sink is a temp file that
/// is atomically renamed on `close`, so the destination is a parseable
/// document exactly from `close` onward, never before.
pub struct FeatureStream {
    sink: PendingWrite,
    count: usize,
    bounds: Bounds,
}

impl FeatureStream {
    pub fn create(path: &Path, force: bool) -> Result<Self> {
        let mut sink = PendingWrite::open(path, force)?;
        sink.write_all(b"{\"type\":\"FeatureCollection\",\"features\":[")
            .context("write document prefix")?;
        Ok(Self { sink, count: 0, bounds: Bounds::new() })
    }

    /// Append one resolved child. The feature's box, when computable, widens
    /// the dataset bounds and is embedded in the record; a feature without a
    /// box is still written, without a `bbox` member.
    pub fn append(&mut self, feature: &BoundaryFeature, outcome: &Outcome) -> Result<()> {
        let rect = feature.geometry.bounding_rect();
        if let Some(rect) = &rect {
            self.bounds.widen(rect);
        }

        if self.count > 0 {
            self.sink.write_all(b",").context("write record separator")?;
        }
        let record = resolved_record(feature, outcome, rect.as_ref());
        serde_json::to_writer(&mut self.sink, &record)
            .with_context(|| format!("write record for {}", feature.id))?;
        self.count += 1;
        Ok(())
    }

    #[inline] pub fn count(&self) -> usize { self.count }

    #[inline] pub fn bounds(&self) -> Bounds { self.bounds }

    /// Terminate the document and atomically publish it. The dataset `bbox`
    /// is emitted only when at least one feature contributed a finite box.
    pub fn close(mut self) -> Result<usize> {
        self.sink.write_all(b"]").context("write document suffix")?;
        if let Some(bbox) = self.bounds.to_array() {
            self.sink.write_all(b",\"bbox\":").context("write bbox key")?;
            serde_json::to_writer(&mut self.sink, &json!(bbox)).context("write bbox")?;
        }
        self.sink.write_all(b"}").context("write document suffix")?;
        self.sink.finalize()?;
        Ok(self.count)
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};
    use serde_json::Value;

    use crate::boundary::AdmLevel;

    use super::*;

    fn feature(id: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> BoundaryFeature {
        let geometry = MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0),
        ]]);
        BoundaryFeature::new(AdmLevel::Adm3, id, Some(id), geometry)
    }

    #[test]
    fn empty_stream_closes_to_valid_document_without_bbox() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");

        let stream = FeatureStream::create(&path, false).unwrap();
        assert_eq!(stream.close().unwrap(), 0);

        let doc: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["type"], "FeatureCollection");
        assert_eq!(doc["features"].as_array().unwrap().len(), 0);
        assert!(doc.get("bbox").is_none());
    }

    #[test]
    fn records_are_comma_correct_and_bbox_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");

        let mut stream = FeatureStream::create(&path, false).unwrap();
        stream.append(&feature("a", 0., 0., 1., 1.), &Outcome::Unmatched).unwrap();
        stream.append(&feature("b", 4., -2., 9., 3.), &Outcome::Unmatched).unwrap();
        stream.close().unwrap();

        let doc: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["features"].as_array().unwrap().len(), 2);
        assert_eq!(doc["bbox"], serde_json::json!([0., -2., 9., 3.]));
        assert_eq!(doc["features"][0]["bbox"], serde_json::json!([0., 0., 1., 1.]));
    }

    #[test]
    fn destination_absent_until_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");

        let mut stream = FeatureStream::create(&path, false).unwrap();
        stream.append(&feature("a", 0., 0., 1., 1.), &Outcome::Unmatched).unwrap();
        assert!(!path.exists());
        stream.close().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn boxless_feature_writes_without_widening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");

        let mut stream = FeatureStream::create(&path, false).unwrap();
        let empty = BoundaryFeature::new(AdmLevel::Adm3, "x", None, MultiPolygon(vec![]));
        stream.append(&empty, &Outcome::Unmatched).unwrap();
        stream.close().unwrap();

        let doc: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["features"].as_array().unwrap().len(), 1);
        assert!(doc.get("bbox").is_none());
        assert!(doc["features"][0].get("bbox").is_none());
    }
}
