//! List cells.
//!
//! - `campaign_cell`: [`CampaignCell`] - campaign row with three measurement emitters
//! - `text_measure`: [`TextMeasurer`] - synchronous fitted-size measurement
//!
//! [`ListCell`] is what the host dequeues and hands to a data source for
//! binding; its variant corresponds to the reuse kind the data source asked
//! for.

pub mod campaign_cell;
pub mod text_measure;

pub use campaign_cell::{CampaignCell, CellId, CellOutlets, ImageView, Label};
pub use text_measure::{Fitting, MonospaceMeasurer, TextMeasurer};

use std::rc::Rc;

/// Reuse identifiers for the cells used by the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Full-bleed placeholder shown while campaigns load.
    LoadingIndicator,
    /// A campaign row.
    Campaign,
}

/// The placeholder cell shown in the loading state. It has no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingIndicatorCell {
    id: CellId,
}

impl LoadingIndicatorCell {
    /// Create a placeholder cell.
    pub fn new(id: CellId) -> Self {
        Self { id }
    }

    /// This instance's identity.
    pub fn id(&self) -> CellId {
        self.id
    }
}

/// A dequeued cell of either kind.
#[derive(Debug, Clone)]
pub enum ListCell {
    /// Loading placeholder.
    LoadingIndicator(LoadingIndicatorCell),
    /// Campaign row.
    Campaign(Rc<CampaignCell>),
}

impl ListCell {
    /// Reuse kind of this cell.
    pub fn kind(&self) -> CellKind {
        match self {
            ListCell::LoadingIndicator(_) => CellKind::LoadingIndicator,
            ListCell::Campaign(_) => CellKind::Campaign,
        }
    }

    /// Identity of the underlying instance.
    pub fn id(&self) -> CellId {
        match self {
            ListCell::LoadingIndicator(cell) => cell.id(),
            ListCell::Campaign(cell) => cell.id(),
        }
    }

    /// The campaign cell, if this is one.
    pub fn as_campaign(&self) -> Option<&Rc<CampaignCell>> {
        match self {
            ListCell::Campaign(cell) => Some(cell),
            ListCell::LoadingIndicator(_) => None,
        }
    }
}
