#![doc = "Hierarchical parent resolution for administrative boundary polygons"]
pub mod cli;
pub mod commands;
mod boundary;
mod common;
mod geom;
mod hierarchy;
mod io;

#[doc(inline)]
pub use boundary::{AdmLevel, BoundaryFeature};

#[doc(inline)]
pub use geom::Bounds;

#[doc(inline)]
pub use hierarchy::{
    link_to_parent, normalize_key, Cascade, CandidateIndex, GroupTable, LevelMatcher, Outcome,
    ResolveStats, UNMATCHED_KEY,
};

#[doc(inline)]
pub use io::{read_features, resolved_record, FeatureStream};
