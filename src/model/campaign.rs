//! Campaign list item.

use super::image::ImageSource;

/// One campaign as displayed by the listing.
///
/// Immutable once built; the listing owns its copy for the duration of one
/// display session.
#[derive(Debug, Clone)]
pub struct CampaignItem {
    name: String,
    description: String,
    mood_image: ImageSource,
}

impl CampaignItem {
    /// Create a campaign item.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        mood_image: ImageSource,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            mood_image,
        }
    }

    /// The campaign's title.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The campaign's description text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The background image source.
    pub fn mood_image(&self) -> &ImageSource {
        &self.mood_image
    }
}
