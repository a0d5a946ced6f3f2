#[cfg(feature = "download")]
pub mod fetch;
pub mod resolve;
