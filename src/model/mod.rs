//! Domain model types.
//!
//! Campaign items, geometry newtypes, the asynchronous image source and the
//! error taxonomy of the fallible edges.

pub mod campaign;
pub mod error;
pub mod geometry;
pub mod image;

pub use campaign::CampaignItem;
pub use error::{AppError, ProviderError};
pub use geometry::{CombinedHeight, ItemIndex, MeasuredSize, Size};
pub use image::{DecodedImage, ImageResolver, ImageSource};
