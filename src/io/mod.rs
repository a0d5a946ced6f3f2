mod geojson;
mod stream;

pub use geojson::{multipolygon_to_geojson, read_features, resolved_record};
pub use stream::FeatureStream;
