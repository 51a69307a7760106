//! Data sources for the campaign listing.
//!
//! The host asks a data source for the item count, for the reuse kind of each
//! row, to bind a dequeued cell to a row, and for each row's size.
//!
//! - [`LoadingDataSource`] - one full-viewport placeholder row
//! - [`CampaignDataSource`] - one row per campaign, sized from the height cache

use crate::cell::{CampaignCell, CellId, CellKind, ListCell};
use crate::model::{CampaignItem, CombinedHeight, ItemIndex, Size};
use crate::reactive::{MainQueue, Subscription};
use crate::view_state::{HeightCache, HeightFormula};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

use super::host::ListHost;

/// Contract between the host list container and its content.
pub trait ListDataSource {
    /// Number of rows.
    fn item_count(&self) -> usize;

    /// Reuse kind of the cell row `index` is displayed in.
    fn cell_kind(&self, index: ItemIndex) -> CellKind;

    /// Fill `cell` with row `index`.
    fn bind(&self, index: ItemIndex, cell: &ListCell);

    /// Requested size of row `index` in a viewport of `viewport`.
    fn size_for(&self, index: ItemIndex, viewport: Size) -> Size;

    /// `cell` left the screen and went back to the reuse pool.
    fn did_end_displaying(&self, _cell: &ListCell) {}
}

/// Data source used while campaign data is still loading.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadingDataSource;

impl ListDataSource for LoadingDataSource {
    fn item_count(&self) -> usize {
        1
    }

    fn cell_kind(&self, _index: ItemIndex) -> CellKind {
        CellKind::LoadingIndicator
    }

    fn bind(&self, index: ItemIndex, cell: &ListCell) {
        debug_assert_eq!(
            cell.kind(),
            CellKind::LoadingIndicator,
            "loading row needs the loading indicator cell"
        );
        trace!(%index, "loading placeholder bound");
    }

    fn size_for(&self, _index: ItemIndex, viewport: Size) -> Size {
        viewport
    }
}

/// The live link between one cell instance and the row it displays.
struct Binding {
    index: ItemIndex,
    _height: Subscription,
}

/// Data source displaying a list of campaigns.
///
/// Owns the height cache for this display session. Each bound cell's height
/// combinator writes into the cache slot of the row the cell is bound to,
/// then asks the host to invalidate and lay out again.
pub struct CampaignDataSource {
    campaigns: Vec<CampaignItem>,
    heights: Rc<RefCell<HeightCache>>,
    bindings: RefCell<HashMap<CellId, Binding>>,
    host: Weak<dyn ListHost>,
    queue: MainQueue,
    formula: HeightFormula,
}

impl CampaignDataSource {
    /// Create a data source for `campaigns` with an empty height cache.
    pub fn new(
        campaigns: Vec<CampaignItem>,
        host: Weak<dyn ListHost>,
        queue: MainQueue,
        formula: HeightFormula,
        default_row_height: f64,
    ) -> Self {
        let heights = HeightCache::with_default(campaigns.len(), default_row_height);
        Self {
            campaigns,
            heights: Rc::new(RefCell::new(heights)),
            bindings: RefCell::new(HashMap::new()),
            host,
            queue,
            formula,
        }
    }

    /// The displayed campaigns.
    pub fn campaigns(&self) -> &[CampaignItem] {
        &self.campaigns
    }

    /// Recorded height of row `index`, if it finished measuring.
    pub fn cached_height(&self, index: ItemIndex) -> Option<CombinedHeight> {
        self.heights.borrow().recorded(index)
    }

    /// Number of rows with a recorded height.
    pub fn cached_count(&self) -> usize {
        self.heights.borrow().len()
    }

    /// Row currently bound to cell `id`.
    pub fn bound_index(&self, id: CellId) -> Option<ItemIndex> {
        self.bindings.borrow().get(&id).map(|b| b.index)
    }

    /// Number of live cell bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    /// Tear down every live binding.
    pub fn unbind_all(&self) {
        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        if !bindings.is_empty() {
            debug!(count = bindings.len(), "all cell bindings torn down");
        }
        drop(bindings);
    }

    fn unbind(&self, id: CellId) {
        let previous = self.bindings.borrow_mut().remove(&id);
        if let Some(previous) = previous {
            trace!(cell = id.get(), index = %previous.index, "cell binding torn down");
            drop(previous);
        }
    }

    fn bind_campaign(&self, index: ItemIndex, cell: &CampaignCell) {
        let Some(campaign) = self.campaigns.get(index.get()) else {
            debug_assert!(false, "bind for row {index} beyond {} items", self.campaigns.len());
            return;
        };

        // The old binding must be gone before anything new is observed.
        self.unbind(cell.id());
        cell.prepare_for_reuse();

        let heights = Rc::downgrade(&self.heights);
        let host = self.host.clone();
        let subscription = cell.observe_height(self.formula, move |height| {
            let Some(heights) = heights.upgrade() else {
                return;
            };
            let write = heights.borrow_mut().set(index, height);
            if !write.changed_layout() {
                return;
            }
            if let Some(host) = host.upgrade() {
                host.invalidate_layout();
                host.layout_if_needed();
            }
        });
        self.bindings.borrow_mut().insert(
            cell.id(),
            Binding {
                index,
                _height: subscription,
            },
        );

        debug!(%index, cell = cell.id().get(), name = campaign.name(), "campaign bound");
        cell.set_mood_image(campaign.mood_image(), &self.queue);
        cell.set_name(campaign.name());
        cell.set_description(campaign.description());
    }
}

impl ListDataSource for CampaignDataSource {
    fn item_count(&self) -> usize {
        self.campaigns.len()
    }

    fn cell_kind(&self, _index: ItemIndex) -> CellKind {
        CellKind::Campaign
    }

    fn bind(&self, index: ItemIndex, cell: &ListCell) {
        match cell {
            ListCell::Campaign(cell) => self.bind_campaign(index, cell),
            ListCell::LoadingIndicator(_) => {
                debug_assert!(false, "campaign row {index} needs a campaign cell");
            }
        }
    }

    fn size_for(&self, index: ItemIndex, viewport: Size) -> Size {
        Size::new(viewport.width, self.heights.borrow().get(index))
    }

    fn did_end_displaying(&self, cell: &ListCell) {
        self.unbind(cell.id());
    }
}

impl std::fmt::Debug for CampaignDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignDataSource")
            .field("campaigns", &self.campaigns.len())
            .field("cached", &self.cached_count())
            .field("bindings", &self.binding_count())
            .finish()
    }
}
