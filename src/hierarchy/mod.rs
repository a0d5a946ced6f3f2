mod cascade;
mod group;
mod index;
mod key;

pub use cascade::{link_to_parent, Cascade, LevelMatcher, Outcome, ResolveStats};
pub use group::GroupTable;
pub use index::CandidateIndex;
pub use key::{normalize_key, UNMATCHED_KEY};
