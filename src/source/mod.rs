//! Campaign data provider.
//!
//! - `feed`: JSON campaign feed loading
//! - `decoder`: simulated background image decoding

pub mod decoder;
pub mod feed;

pub use decoder::{campaigns_from_feed, PendingDecode, SimulatedDecoder};
pub use feed::{load_feed, parse_feed, FeedEntry, FeedImage};
