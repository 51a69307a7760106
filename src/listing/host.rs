//! Host list container.
//!
//! [`ListHost`] is what the listing needs from the UI layer: the viewport,
//! a weak link to the current data source, and layout invalidation.
//! [`HeadlessHost`] implements it without a screen: it keeps row frames,
//! binds the visible rows, and recycles cells that scroll out.

use super::data_source::ListDataSource;
use crate::cell::{CampaignCell, CellId, CellKind, ListCell, LoadingIndicatorCell, TextMeasurer};
use crate::model::{ItemIndex, Size};
use crate::view_state::{ListLayout, RowFrame, VisibleRows};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// Default number of recycled cells kept per kind.
pub const DEFAULT_REUSE_SLOT_COUNT: usize = 7;

/// Upper bound on back-to-back layout passes triggered from inside a pass.
const MAX_NESTED_PASSES: usize = 8;

/// Services the listing consumes from the host container.
///
/// All methods run on the main context.
pub trait ListHost {
    /// Current viewport size.
    fn viewport(&self) -> Size;

    /// Replace the data source. The host does not keep it alive.
    fn set_data_source(&self, source: Weak<dyn ListDataSource>);

    /// Drop every bound cell and lay out from scratch.
    fn reload_data(&self);

    /// Mark the current layout stale.
    fn invalidate_layout(&self);

    /// Run a layout pass now if the layout is stale.
    fn layout_if_needed(&self);
}

/// Counters describing what a host has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Calls to `invalidate_layout`.
    pub invalidations: usize,
    /// Layout passes actually run.
    pub layout_passes: usize,
    /// Cells handed to the data source for binding.
    pub binds: usize,
    /// Full reloads.
    pub reloads: usize,
}

/// Recycled cells waiting to be dequeued.
#[derive(Debug, Default)]
pub struct CellPool {
    loading: Vec<LoadingIndicatorCell>,
    campaign: Vec<Rc<CampaignCell>>,
    max_per_kind: usize,
}

impl CellPool {
    /// Pool keeping at most `max_per_kind` cells of each kind.
    pub fn new(max_per_kind: usize) -> Self {
        Self {
            loading: Vec::new(),
            campaign: Vec::new(),
            max_per_kind,
        }
    }

    /// Take a recycled cell of `kind`.
    ///
    /// Campaign cells are prepared for reuse on the way out.
    pub fn dequeue(&mut self, kind: CellKind) -> Option<ListCell> {
        match kind {
            CellKind::LoadingIndicator => self.loading.pop().map(ListCell::LoadingIndicator),
            CellKind::Campaign => self.campaign.pop().map(|cell| {
                cell.prepare_for_reuse();
                ListCell::Campaign(cell)
            }),
        }
    }

    /// Return `cell` for later reuse. Dropped if the pool for its kind is full.
    pub fn recycle(&mut self, cell: ListCell) {
        match cell {
            ListCell::LoadingIndicator(cell) if self.loading.len() < self.max_per_kind => {
                self.loading.push(cell)
            }
            ListCell::Campaign(cell) if self.campaign.len() < self.max_per_kind => {
                self.campaign.push(cell)
            }
            dropped => trace!(cell = dropped.id().get(), "reuse pool full; cell discarded"),
        }
    }

    /// Number of pooled cells of `kind`.
    pub fn len(&self, kind: CellKind) -> usize {
        match kind {
            CellKind::LoadingIndicator => self.loading.len(),
            CellKind::Campaign => self.campaign.len(),
        }
    }

    /// True if no cell of any kind is pooled.
    pub fn is_empty(&self) -> bool {
        self.loading.is_empty() && self.campaign.is_empty()
    }
}

/// Screenless [`ListHost`].
///
/// A layout pass asks the data source for every row's size, stacks the rows,
/// recycles cells whose rows left the viewport and binds the newly visible
/// rows.
pub struct HeadlessHost {
    viewport: Cell<Size>,
    scroll_offset: Cell<usize>,
    data_source: RefCell<Option<Weak<dyn ListDataSource>>>,
    layout: RefCell<ListLayout>,
    needs_layout: Cell<bool>,
    in_layout: Cell<bool>,
    visible: RefCell<BTreeMap<ItemIndex, ListCell>>,
    pool: RefCell<CellPool>,
    measurer: Rc<dyn TextMeasurer>,
    next_cell_id: Cell<u64>,
    stats: Cell<HostStats>,
}

impl HeadlessHost {
    /// Host with the given viewport; new campaign cells measure with `measurer`.
    pub fn new(viewport: Size, measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            viewport: Cell::new(viewport),
            scroll_offset: Cell::new(0),
            data_source: RefCell::new(None),
            layout: RefCell::new(ListLayout::default()),
            needs_layout: Cell::new(true),
            in_layout: Cell::new(false),
            visible: RefCell::new(BTreeMap::new()),
            pool: RefCell::new(CellPool::new(DEFAULT_REUSE_SLOT_COUNT)),
            measurer,
            next_cell_id: Cell::new(0),
            stats: Cell::new(HostStats::default()),
        }
    }

    /// Resize the viewport and lay out again.
    pub fn set_viewport(&self, viewport: Size) {
        if self.viewport.replace(viewport) == viewport {
            return;
        }
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.invalidate_layout();
        self.layout_if_needed();
    }

    /// Scroll to content offset `offset` and lay out again.
    pub fn scroll_to(&self, offset: usize) {
        if self.scroll_offset.replace(offset) == offset {
            return;
        }
        self.invalidate_layout();
        self.layout_if_needed();
    }

    /// Current scroll offset.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset.get()
    }

    /// Frames from the last layout pass.
    pub fn frames(&self) -> Vec<RowFrame> {
        self.layout.borrow().frames()
    }

    /// Frame of row `index` from the last layout pass.
    pub fn frame(&self, index: ItemIndex) -> Option<RowFrame> {
        self.layout.borrow().frame(index)
    }

    /// Total content height from the last layout pass.
    pub fn content_height(&self) -> usize {
        self.layout.borrow().content_height()
    }

    /// Row under content offset `y`.
    pub fn row_at(&self, y: usize) -> Option<ItemIndex> {
        self.layout.borrow().row_at(y)
    }

    /// Rows currently intersecting the viewport.
    pub fn visible_rows(&self) -> VisibleRows {
        let viewport_height = snap_extent(self.viewport.get().height);
        self.layout
            .borrow()
            .visible_rows(self.scroll_offset.get(), viewport_height)
    }

    /// Indices of the rows with a bound cell.
    pub fn bound_indices(&self) -> Vec<ItemIndex> {
        self.visible.borrow().keys().copied().collect()
    }

    /// Cell bound to row `index`.
    pub fn cell_at(&self, index: ItemIndex) -> Option<ListCell> {
        self.visible.borrow().get(&index).cloned()
    }

    /// Counters so far.
    pub fn stats(&self) -> HostStats {
        self.stats.get()
    }

    /// Number of pooled cells of `kind`.
    pub fn pooled(&self, kind: CellKind) -> usize {
        self.pool.borrow().len(kind)
    }

    /// True while the layout is stale.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout.get()
    }

    fn bump(&self, update: impl FnOnce(&mut HostStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    fn current_source(&self) -> Option<Rc<dyn ListDataSource>> {
        self.data_source.borrow().as_ref().and_then(Weak::upgrade)
    }

    fn make_cell(&self, kind: CellKind) -> ListCell {
        let id = CellId::new(self.next_cell_id.get());
        self.next_cell_id.set(id.get() + 1);
        match kind {
            CellKind::LoadingIndicator => ListCell::LoadingIndicator(LoadingIndicatorCell::new(id)),
            CellKind::Campaign => ListCell::Campaign(Rc::new(CampaignCell::with_measurer(
                id,
                Rc::clone(&self.measurer),
            ))),
        }
    }

    fn dequeue(&self, kind: CellKind) -> ListCell {
        let recycled = self.pool.borrow_mut().dequeue(kind);
        recycled.unwrap_or_else(|| self.make_cell(kind))
    }

    fn recycle(&self, source: Option<&Rc<dyn ListDataSource>>, cell: ListCell) {
        if let Some(source) = source {
            source.did_end_displaying(&cell);
        }
        self.pool.borrow_mut().recycle(cell);
    }

    fn recycle_all(&self, source: Option<&Rc<dyn ListDataSource>>) {
        let cells: Vec<ListCell> = std::mem::take(&mut *self.visible.borrow_mut())
            .into_values()
            .collect();
        for cell in cells {
            self.recycle(source, cell);
        }
    }

    fn run_layout_pass(&self) {
        self.needs_layout.set(false);
        self.bump(|s| s.layout_passes += 1);

        let viewport = self.viewport.get();
        let Some(source) = self.current_source() else {
            *self.layout.borrow_mut() = ListLayout::default();
            self.recycle_all(None);
            return;
        };

        let sizes: Vec<Size> = (0..source.item_count())
            .map(|i| source.size_for(ItemIndex::new(i), viewport))
            .collect();
        *self.layout.borrow_mut() = ListLayout::from_sizes(&sizes);
        let rows = self.visible_rows();
        debug!(rows = sizes.len(), start = rows.start, end = rows.end, "layout pass");

        let gone: Vec<ItemIndex> = self
            .visible
            .borrow()
            .keys()
            .filter(|index| !rows.contains(index.get()))
            .copied()
            .collect();
        for index in gone {
            let cell = self.visible.borrow_mut().remove(&index);
            if let Some(cell) = cell {
                self.recycle(Some(&source), cell);
            }
        }

        let kept: Vec<(ItemIndex, ListCell)> = self
            .visible
            .borrow()
            .iter()
            .map(|(index, cell)| (*index, cell.clone()))
            .collect();
        for (index, cell) in kept {
            if let (ListCell::Campaign(campaign), Some(frame)) = (&cell, self.frame(index)) {
                campaign.resize(frame.width);
            }
        }

        for index in rows.indices() {
            if self.visible.borrow().contains_key(&index) {
                continue;
            }
            let kind = source.cell_kind(index);
            let cell = self.dequeue(kind);
            if let ListCell::Campaign(campaign) = &cell {
                let width = self.frame(index).map_or(viewport.width, |f| f.width);
                campaign.resize(width);
            }
            self.visible.borrow_mut().insert(index, cell.clone());
            source.bind(index, &cell);
            self.bump(|s| s.binds += 1);
        }
    }
}

impl ListHost for HeadlessHost {
    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn set_data_source(&self, source: Weak<dyn ListDataSource>) {
        *self.data_source.borrow_mut() = Some(source);
    }

    fn reload_data(&self) {
        self.bump(|s| s.reloads += 1);
        let source = self.current_source();
        self.recycle_all(source.as_ref());
        self.invalidate_layout();
        self.layout_if_needed();
    }

    fn invalidate_layout(&self) {
        self.bump(|s| s.invalidations += 1);
        self.needs_layout.set(true);
    }

    fn layout_if_needed(&self) {
        if self.in_layout.get() {
            // The running pass loops until the layout settles.
            return;
        }
        self.in_layout.set(true);
        let mut passes = 0;
        while self.needs_layout.get() {
            if passes == MAX_NESTED_PASSES {
                warn!(passes, "layout did not settle; deferring to the next pass");
                break;
            }
            self.run_layout_pass();
            passes += 1;
        }
        self.in_layout.set(false);
    }
}

impl std::fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessHost")
            .field("viewport", &self.viewport.get())
            .field("scroll_offset", &self.scroll_offset.get())
            .field("stats", &self.stats.get())
            .finish_non_exhaustive()
    }
}

fn snap_extent(extent: f64) -> usize {
    if extent.is_finite() && extent > 0.0 {
        extent.ceil() as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::MonospaceMeasurer;

    /// Fixed-size rows, recording binds.
    struct FixedRows {
        count: usize,
        height: f64,
        bound: RefCell<Vec<(usize, CellId)>>,
        ended: RefCell<Vec<CellId>>,
    }

    impl FixedRows {
        fn new(count: usize, height: f64) -> Rc<Self> {
            Rc::new(Self {
                count,
                height,
                bound: RefCell::new(Vec::new()),
                ended: RefCell::new(Vec::new()),
            })
        }
    }

    impl ListDataSource for FixedRows {
        fn item_count(&self) -> usize {
            self.count
        }
        fn cell_kind(&self, _index: ItemIndex) -> CellKind {
            CellKind::Campaign
        }
        fn bind(&self, index: ItemIndex, cell: &ListCell) {
            self.bound.borrow_mut().push((index.get(), cell.id()));
        }
        fn size_for(&self, _index: ItemIndex, viewport: Size) -> Size {
            Size::new(viewport.width, self.height)
        }
        fn did_end_displaying(&self, cell: &ListCell) {
            self.ended.borrow_mut().push(cell.id());
        }
    }

    fn host(width: f64, height: f64) -> HeadlessHost {
        HeadlessHost::new(Size::new(width, height), Rc::new(MonospaceMeasurer::default()))
    }

    fn attach(host: &HeadlessHost, rows: &Rc<FixedRows>) {
        let source: Rc<dyn ListDataSource> = rows.clone();
        host.set_data_source(Rc::downgrade(&source));
        host.reload_data();
    }

    #[test]
    fn layout_without_source_is_empty() {
        let host = host(300.0, 600.0);
        host.layout_if_needed();
        assert!(host.frames().is_empty());
        assert_eq!(host.stats().layout_passes, 1);
    }

    #[test]
    fn reload_binds_visible_rows_only() {
        let host = host(300.0, 450.0);
        let rows = FixedRows::new(10, 200.0);
        attach(&host, &rows);

        let bound: Vec<usize> = rows.bound.borrow().iter().map(|(i, _)| *i).collect();
        assert_eq!(bound, vec![0, 1, 2]);
        assert_eq!(host.content_height(), 2000);
        assert_eq!(host.frame(ItemIndex::new(2)).map(|f| f.y), Some(400));
    }

    #[test]
    fn scrolling_recycles_cells_that_left() {
        let host = host(300.0, 200.0);
        let rows = FixedRows::new(10, 200.0);
        attach(&host, &rows);
        let first_cell = rows.bound.borrow()[0].1;

        host.scroll_to(1000);

        assert_eq!(host.bound_indices(), vec![ItemIndex::new(5)]);
        assert_eq!(*rows.ended.borrow(), vec![first_cell]);
        // The recycled instance is reused for the newly visible row.
        assert_eq!(rows.bound.borrow().last().map(|(i, id)| (*i, *id)), Some((5, first_cell)));
    }

    #[test]
    fn invalidate_without_layout_if_needed_defers_pass() {
        let host = host(300.0, 200.0);
        let rows = FixedRows::new(1, 200.0);
        attach(&host, &rows);
        let passes = host.stats().layout_passes;

        host.invalidate_layout();
        assert!(host.needs_layout());
        assert_eq!(host.stats().layout_passes, passes);

        host.layout_if_needed();
        assert!(!host.needs_layout());
        assert_eq!(host.stats().layout_passes, passes + 1);
    }

    #[test]
    fn layout_if_needed_is_noop_when_clean() {
        let host = host(300.0, 200.0);
        let rows = FixedRows::new(1, 200.0);
        attach(&host, &rows);
        let passes = host.stats().layout_passes;
        host.layout_if_needed();
        assert_eq!(host.stats().layout_passes, passes);
    }

    #[test]
    fn dropped_source_clears_layout() {
        let host = host(300.0, 200.0);
        let rows = FixedRows::new(3, 100.0);
        attach(&host, &rows);
        drop(rows);

        host.invalidate_layout();
        host.layout_if_needed();

        assert!(host.frames().is_empty());
        assert!(host.bound_indices().is_empty());
    }

    #[test]
    fn pool_respects_capacity() {
        let mut pool = CellPool::new(1);
        pool.recycle(ListCell::LoadingIndicator(LoadingIndicatorCell::new(CellId::new(1))));
        pool.recycle(ListCell::LoadingIndicator(LoadingIndicatorCell::new(CellId::new(2))));
        assert_eq!(pool.len(CellKind::LoadingIndicator), 1);
        assert!(pool.dequeue(CellKind::Campaign).is_none());
        assert!(pool.dequeue(CellKind::LoadingIndicator).is_some());
        assert!(pool.is_empty());
    }
}
