mod fs;
mod io;
#[cfg(feature = "download")]
mod download;

pub use fs::*;
pub use io::*;
#[cfg(feature = "download")]
pub use download::*;
