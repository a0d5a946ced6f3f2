mod bbox;
mod bounds;

pub use bbox::BoundingBox;
pub use bounds::Bounds;
