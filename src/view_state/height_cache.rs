//! Per-index row height cache.
//!
//! One cache lives for one display session. The layout sizing callback reads
//! it synchronously; combinator subscriptions write it. Both happen on the
//! main context only, so the cache needs no lock.

use crate::model::{CombinedHeight, ItemIndex};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Height reported for rows that have not finished measuring.
pub const DEFAULT_ROW_HEIGHT: f64 = 200.0;

/// Outcome of [`HeightCache::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    /// First height recorded for this index.
    Inserted,
    /// A different height replaced the previous one.
    Replaced,
    /// The same height was written again.
    Unchanged,
    /// The index is outside the current item range; nothing was stored.
    Orphaned,
}

impl CacheWrite {
    /// True if the visible layout may differ after this write.
    pub fn changed_layout(&self) -> bool {
        matches!(self, CacheWrite::Inserted | CacheWrite::Replaced)
    }
}

/// Last-writer-wins mapping from item index to combined height.
#[derive(Debug, Clone)]
pub struct HeightCache {
    heights: HashMap<ItemIndex, CombinedHeight>,
    item_count: usize,
    default_height: f64,
}

impl HeightCache {
    /// Empty cache for `item_count` items using [`DEFAULT_ROW_HEIGHT`].
    pub fn new(item_count: usize) -> Self {
        Self::with_default(item_count, DEFAULT_ROW_HEIGHT)
    }

    /// Empty cache with a custom fallback height.
    pub fn with_default(item_count: usize, default_height: f64) -> Self {
        Self {
            heights: HashMap::new(),
            item_count,
            default_height,
        }
    }

    /// Record `height` for `index`, replacing any previous value.
    pub fn set(&mut self, index: ItemIndex, height: CombinedHeight) -> CacheWrite {
        if index.get() >= self.item_count {
            warn!(%index, item_count = self.item_count, "ignoring height for orphaned index");
            return CacheWrite::Orphaned;
        }
        let write = match self.heights.insert(index, height) {
            None => CacheWrite::Inserted,
            Some(previous) if previous == height => CacheWrite::Unchanged,
            Some(_) => CacheWrite::Replaced,
        };
        debug!(%index, height = height.get(), ?write, "row height cached");
        write
    }

    /// Cached height for `index`, or the default height.
    pub fn get(&self, index: ItemIndex) -> f64 {
        self.recorded(index)
            .map(|h| h.get())
            .unwrap_or(self.default_height)
    }

    /// Cached height for `index` if one has been recorded.
    pub fn recorded(&self, index: ItemIndex) -> Option<CombinedHeight> {
        if index.get() >= self.item_count {
            return None;
        }
        self.heights.get(&index).copied()
    }

    /// Fallback height for unmeasured rows.
    pub fn default_height(&self) -> f64 {
        self.default_height
    }

    /// Number of items this cache covers.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of recorded heights.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True if no height has been recorded.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}
