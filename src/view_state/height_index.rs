//! HeightIndex - O(log n) row offsets via Fenwick tree
//!
//! Backs the host's layout pass: row heights are pixel-snapped to whole
//! points, prefix sums give each row's top edge, and `lower_bound` maps a
//! scroll offset back to the row under it.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n) amortized
//! - `total`: O(log n)

/// Fenwick tree over row heights.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (1-indexed internally, 0-indexed API)
    tree: Vec<isize>,
    /// Raw heights, kept to rebuild the tree when storage grows
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use campaign_browser::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index holding `heights` in order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use campaign_browser::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights(&[200, 295, 200]);
    /// assert_eq!(index.prefix_sum(1), 495);
    /// assert_eq!(index.total(), 695);
    /// ```
    pub fn from_heights(heights: &[usize]) -> Self {
        let mut index = Self::new(heights.len());
        for &height in heights {
            index.push(height);
        }
        index
    }

    /// Sets the height of row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        let delta = height as isize - self.heights[index] as isize;
        self.heights[index] = height;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of row `index`.
    pub fn height(&self, index: usize) -> Option<usize> {
        self.heights.get(index).copied()
    }

    /// Cumulative height of rows `0..=index` (the bottom edge of `index`).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use campaign_browser::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(3);
    /// index.push(4);
    /// index.push(5);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        fenwick::array::prefix_sum(&self.tree, index).max(0) as usize
    }

    /// Top edge of row `index`.
    pub fn offset_of(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// First row whose bottom edge is below `value`, i.e. the row covering
    /// vertical offset `value`.
    ///
    /// Returns `None` if `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use campaign_browser::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights(&[10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all rows.
    pub fn total(&self) -> usize {
        match self.len() {
            0 => 0,
            len => self.prefix_sum(len - 1),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True if the index holds no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, height: usize) {
        if self.heights.len() >= self.tree.len() {
            self.grow();
        }
        let idx = self.heights.len();
        self.heights.push(height);
        fenwick::array::update(&mut self.tree, idx, height as isize);
    }

    /// Removes every row, keeping the allocation.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        self.heights.clear();
    }

    // Fenwick nodes past the old end summarize ranges that include existing
    // rows, so the tree is rebuilt rather than zero-extended.
    fn grow(&mut self) {
        let capacity = self.tree.len().max(1) * 2;
        self.tree.clear();
        self.tree.resize(capacity, 0);
        for (idx, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }
}
