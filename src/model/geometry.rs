//! Geometry newtypes shared by the cell, cache and host layers.

/// Width/height pair in layout points.
///
/// Measurement emitters produce snapshots of this type: each emission
/// replaces the previous one, it is never a delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A size produced by one of a cell's measurement emitters.
pub type MeasuredSize = Size;

/// Index of an item in the displayed collection. 0-based.
///
/// Stable within one display session; a new `display` call starts a new
/// index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemIndex(usize);

impl ItemIndex {
    /// Create a new ItemIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for ItemIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for ItemIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final height of one list row, derived from the three cell measurements.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct CombinedHeight(f64);

impl CombinedHeight {
    /// Wrap a raw height in points.
    pub fn new(height: f64) -> Self {
        Self(height)
    }

    /// Get the raw height in points.
    pub fn get(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_has_no_extent() {
        assert_eq!(Size::ZERO, Size::new(0.0, 0.0));
        assert_eq!(Size::default(), Size::ZERO);
    }

    #[test]
    fn item_index_round_trips_raw_value() {
        let index = ItemIndex::from(7);
        assert_eq!(index.get(), 7);
        assert_eq!(index, ItemIndex::new(7));
        assert_eq!(index.to_string(), "7");
    }

    #[test]
    fn combined_height_exposes_raw_points() {
        assert_eq!(CombinedHeight::new(295.0).get(), 295.0);
    }
}
