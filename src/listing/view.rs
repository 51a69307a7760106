//! The campaign listing screen.
//!
//! Starts in the loading state with a single placeholder row. `display`
//! installs the campaign data source; there is no way back to loading.

use super::data_source::{CampaignDataSource, ListDataSource, LoadingDataSource};
use super::host::ListHost;
use crate::cell::ListCell;
use crate::model::{CampaignItem, CombinedHeight, ItemIndex, Size};
use crate::reactive::MainQueue;
use crate::view_state::{HeightFormula, DEFAULT_ROW_HEIGHT};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// Tunables for the height pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingSettings {
    /// Row height formula.
    pub formula: HeightFormula,
    /// Height of a row that has not finished measuring.
    pub default_row_height: f64,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            formula: HeightFormula::default(),
            default_row_height: DEFAULT_ROW_HEIGHT,
        }
    }
}

/// Which data source currently drives the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    /// Placeholder row shown before data arrives.
    Loading,
    /// Campaign rows.
    Loaded,
}

enum Driver {
    Loading(Rc<LoadingDataSource>),
    Loaded(Rc<CampaignDataSource>),
}

impl Driver {
    fn source(&self) -> Rc<dyn ListDataSource> {
        match self {
            Driver::Loading(source) => Rc::clone(source) as Rc<dyn ListDataSource>,
            Driver::Loaded(source) => Rc::clone(source) as Rc<dyn ListDataSource>,
        }
    }
}

/// Campaign listing bound to a host list container.
///
/// Owns the current data source; the host only holds a weak reference.
pub struct CampaignListingView {
    host: Rc<dyn ListHost>,
    queue: MainQueue,
    settings: ListingSettings,
    driver: RefCell<Driver>,
}

impl CampaignListingView {
    /// Attach to `host` and show the loading placeholder.
    pub fn new(host: Rc<dyn ListHost>, queue: MainQueue, settings: ListingSettings) -> Self {
        let view = Self {
            host,
            queue,
            settings,
            driver: RefCell::new(Driver::Loading(Rc::new(LoadingDataSource))),
        };
        view.install();
        view
    }

    /// Show `campaigns`, replacing whatever was shown before.
    ///
    /// Each call starts a fresh height cache.
    pub fn display(&self, campaigns: Vec<CampaignItem>) {
        info!(count = campaigns.len(), "displaying campaigns");
        let source = CampaignDataSource::new(
            campaigns,
            Rc::downgrade(&self.host),
            self.queue.clone(),
            self.settings.formula,
            self.settings.default_row_height,
        );
        let previous = self.driver.replace(Driver::Loaded(Rc::new(source)));
        if let Driver::Loaded(previous) = previous {
            previous.unbind_all();
        }
        self.install();
    }

    /// Current state.
    pub fn state(&self) -> ListingState {
        match &*self.driver.borrow() {
            Driver::Loading(_) => ListingState::Loading,
            Driver::Loaded(_) => ListingState::Loaded,
        }
    }

    /// Number of rows.
    pub fn item_count(&self) -> usize {
        self.current().item_count()
    }

    /// Size of row `index` in the host's current viewport.
    pub fn size_for(&self, index: ItemIndex) -> Size {
        self.current().size_for(index, self.host.viewport())
    }

    /// Bind `cell` to row `index`.
    pub fn bind(&self, index: ItemIndex, cell: &ListCell) {
        self.current().bind(index, cell);
    }

    /// Recorded height of row `index`; `None` while loading or unmeasured.
    pub fn cached_height(&self, index: ItemIndex) -> Option<CombinedHeight> {
        match &*self.driver.borrow() {
            Driver::Loading(_) => None,
            Driver::Loaded(source) => source.cached_height(index),
        }
    }

    /// The campaign data source, once loaded.
    pub fn campaign_source(&self) -> Option<Rc<CampaignDataSource>> {
        match &*self.driver.borrow() {
            Driver::Loading(_) => None,
            Driver::Loaded(source) => Some(Rc::clone(source)),
        }
    }

    /// The host this listing is attached to.
    pub fn host(&self) -> &Rc<dyn ListHost> {
        &self.host
    }

    fn current(&self) -> Rc<dyn ListDataSource> {
        self.driver.borrow().source()
    }

    fn install(&self) {
        let source = self.current();
        self.host.set_data_source(Rc::downgrade(&source));
        self.host.reload_data();
    }
}

impl std::fmt::Debug for CampaignListingView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignListingView")
            .field("state", &self.state())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellKind, MonospaceMeasurer};
    use crate::listing::host::HeadlessHost;
    use crate::model::ImageSource;

    fn setup(width: f64, height: f64) -> (Rc<HeadlessHost>, CampaignListingView) {
        let host = Rc::new(HeadlessHost::new(
            Size::new(width, height),
            Rc::new(MonospaceMeasurer::default()),
        ));
        let view = CampaignListingView::new(host.clone(), MainQueue::new(), ListingSettings::default());
        (host, view)
    }

    fn campaign(name: &str) -> CampaignItem {
        CampaignItem::new(name, "description", ImageSource::never())
    }

    #[test]
    fn starts_loading_with_one_full_viewport_row() {
        let (host, view) = setup(320.0, 480.0);

        assert_eq!(view.state(), ListingState::Loading);
        assert_eq!(view.item_count(), 1);
        assert_eq!(view.size_for(ItemIndex::new(0)), Size::new(320.0, 480.0));
        assert_eq!(
            host.cell_at(ItemIndex::new(0)).map(|c| c.kind()),
            Some(CellKind::LoadingIndicator)
        );
    }

    #[test]
    fn display_switches_to_loaded_with_default_heights() {
        let (host, view) = setup(320.0, 480.0);

        view.display(vec![campaign("a"), campaign("b"), campaign("c")]);

        assert_eq!(view.state(), ListingState::Loaded);
        assert_eq!(view.item_count(), 3);
        assert_eq!(view.size_for(ItemIndex::new(2)), Size::new(320.0, 200.0));
        assert_eq!(host.content_height(), 600);
        assert_eq!(
            host.cell_at(ItemIndex::new(0)).map(|c| c.kind()),
            Some(CellKind::Campaign)
        );
    }

    #[test]
    fn display_empty_binds_nothing() {
        let (host, view) = setup(320.0, 480.0);

        view.display(Vec::new());

        assert_eq!(view.item_count(), 0);
        assert!(host.bound_indices().is_empty());
        let source = view.campaign_source().expect("loaded");
        assert_eq!(source.cached_count(), 0);
        assert_eq!(source.binding_count(), 0);
    }

    #[test]
    fn display_again_stays_loaded_and_replaces_items() {
        let (_host, view) = setup(320.0, 480.0);
        view.display(vec![campaign("a")]);
        view.display(vec![campaign("x"), campaign("y")]);

        assert_eq!(view.state(), ListingState::Loaded);
        assert_eq!(view.item_count(), 2);
        let source = view.campaign_source().expect("loaded");
        assert_eq!(source.campaigns()[0].name(), "x");
    }
}
