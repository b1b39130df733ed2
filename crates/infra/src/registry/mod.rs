//! Student-records registry adapter: authenticated transport and the
//! page-based search protocol.

pub mod client;
pub mod search;

pub use client::RegistryClient;
pub use search::{page_count, ElementStream, SearchStream};
