//! Result of one layout pass: row frames and visible-range queries.

use super::height_index::HeightIndex;
use crate::model::{ItemIndex, Size};

/// Position and size of one row after a layout pass.
///
/// Heights are snapped up to whole points, so rows never overlap and
/// offsets are exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFrame {
    /// Row index.
    pub index: ItemIndex,
    /// Top edge in content coordinates.
    pub y: usize,
    /// Row width (the viewport width for this list).
    pub width: f64,
    /// Snapped row height.
    pub height: usize,
}

/// Half-open range of rows intersecting the viewport.
///
/// # Invariants
/// - `start <= end`
/// - `end <= row count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRows {
    /// First visible row (inclusive).
    pub start: usize,
    /// One past the last visible row (exclusive).
    pub end: usize,
}

impl VisibleRows {
    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if row `index` is visible.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    /// Visible row indices in order.
    pub fn indices(&self) -> impl Iterator<Item = ItemIndex> {
        (self.start..self.end).map(ItemIndex::new)
    }
}

/// Row geometry for the whole list.
#[derive(Debug, Clone, Default)]
pub struct ListLayout {
    widths: Vec<f64>,
    index: HeightIndex,
}

impl ListLayout {
    /// Lay rows out top to bottom from their requested sizes.
    pub fn from_sizes(sizes: &[Size]) -> Self {
        let heights: Vec<usize> = sizes.iter().map(|s| snap(s.height)).collect();
        Self {
            widths: sizes.iter().map(|s| s.width).collect(),
            index: HeightIndex::from_heights(&heights),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total content height.
    pub fn content_height(&self) -> usize {
        self.index.total()
    }

    /// Frame of row `index`.
    pub fn frame(&self, index: ItemIndex) -> Option<RowFrame> {
        let i = index.get();
        let height = self.index.height(i)?;
        Some(RowFrame {
            index,
            y: self.index.offset_of(i),
            width: self.widths[i],
            height,
        })
    }

    /// All frames in order.
    pub fn frames(&self) -> Vec<RowFrame> {
        (0..self.len())
            .filter_map(|i| self.frame(ItemIndex::new(i)))
            .collect()
    }

    /// Row covering content offset `y`.
    pub fn row_at(&self, y: usize) -> Option<ItemIndex> {
        self.index.lower_bound(y).map(ItemIndex::new)
    }

    /// Rows intersecting `[scroll_offset, scroll_offset + viewport_height)`.
    pub fn visible_rows(&self, scroll_offset: usize, viewport_height: usize) -> VisibleRows {
        if viewport_height == 0 {
            return VisibleRows::default();
        }
        let Some(start) = self.index.lower_bound(scroll_offset) else {
            return VisibleRows {
                start: self.len(),
                end: self.len(),
            };
        };
        let last_visible = scroll_offset.saturating_add(viewport_height - 1);
        let end = self
            .index
            .lower_bound(last_visible)
            .map_or(self.len(), |row| row + 1);
        VisibleRows { start, end }
    }
}

fn snap(height: f64) -> usize {
    if height.is_finite() && height > 0.0 {
        height.ceil() as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(heights: &[f64]) -> ListLayout {
        let sizes: Vec<Size> = heights.iter().map(|&h| Size::new(300.0, h)).collect();
        ListLayout::from_sizes(&sizes)
    }

    #[test]
    fn frames_stack_top_to_bottom() {
        let layout = layout(&[200.0, 295.0, 200.0]);
        let frames = layout.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].y, 200);
        assert_eq!(frames[2].y, 495);
        assert_eq!(frames[2].width, 300.0);
        assert_eq!(layout.content_height(), 695);
    }

    #[test]
    fn fractional_heights_snap_up() {
        let layout = layout(&[224.5, 10.0]);
        assert_eq!(layout.frame(ItemIndex::new(0)).map(|f| f.height), Some(225));
        assert_eq!(layout.frame(ItemIndex::new(1)).map(|f| f.y), Some(225));
    }

    #[test]
    fn nonsense_heights_snap_to_zero() {
        let layout = layout(&[f64::NAN, -4.0]);
        assert_eq!(layout.content_height(), 0);
    }

    #[test]
    fn visible_rows_cover_viewport() {
        let layout = layout(&[200.0, 200.0, 200.0, 200.0]);
        assert_eq!(layout.visible_rows(0, 500), VisibleRows { start: 0, end: 3 });
        assert_eq!(layout.visible_rows(200, 200), VisibleRows { start: 1, end: 2 });
        assert_eq!(layout.visible_rows(650, 1000), VisibleRows { start: 3, end: 4 });
    }

    #[test]
    fn scroll_past_end_shows_nothing() {
        let layout = layout(&[100.0]);
        let rows = layout.visible_rows(500, 100);
        assert!(rows.is_empty());
        assert_eq!(rows.start, 1);
    }

    #[test]
    fn empty_layout_has_no_rows() {
        let layout = ListLayout::from_sizes(&[]);
        assert!(layout.is_empty());
        assert!(layout.visible_rows(0, 600).is_empty());
        assert_eq!(layout.row_at(0), None);
    }

    #[test]
    fn row_at_maps_offset_to_row() {
        let layout = layout(&[100.0, 50.0]);
        assert_eq!(layout.row_at(99), Some(ItemIndex::new(0)));
        assert_eq!(layout.row_at(100), Some(ItemIndex::new(1)));
        assert_eq!(layout.row_at(150), None);
    }

    #[test]
    fn visible_rows_helpers() {
        let rows = VisibleRows { start: 2, end: 4 };
        assert_eq!(rows.len(), 2);
        assert!(rows.contains(3));
        assert!(!rows.contains(4));
        let indices: Vec<usize> = rows.indices().map(|i| i.get()).collect();
        assert_eq!(indices, vec![2, 3]);
    }
}
