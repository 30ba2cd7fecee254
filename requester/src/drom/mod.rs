pub mod client;
pub mod error;

pub use client::{DromRequester, DromRequesterExt, parts_url};
pub use error::RequesterError;
