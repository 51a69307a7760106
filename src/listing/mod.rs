//! The campaign listing: data sources, host container and the screen.
//!
//! # Module Structure
//!
//! - `data_source`: ListDataSource - loading and campaign drivers
//! - `host`: ListHost - host container contract and the headless host
//! - `view`: CampaignListingView - loading to loaded transition

pub mod data_source;
pub mod host;
pub mod view;

pub use data_source::{CampaignDataSource, ListDataSource, LoadingDataSource};
pub use host::{CellPool, HeadlessHost, HostStats, ListHost, DEFAULT_REUSE_SLOT_COUNT};
pub use view::{CampaignListingView, ListingSettings, ListingState};
