//! View-state layer - row heights and layout geometry
//!
//! # Module Structure
//!
//! - `height_formula`: HeightFormula - fixed-ratio image area plus text heights
//! - `combinator`: HeightCombinator - combine-latest over a cell's three emitters
//! - `height_cache`: HeightCache - per-index last-known row heights
//! - `height_index`: HeightIndex - O(log n) row offsets via Fenwick tree
//! - `row_layout`: ListLayout - row frames and visible-range queries

pub mod combinator;
pub mod height_cache;
pub mod height_formula;
pub mod height_index;
pub mod row_layout;

pub use combinator::{observe_height, HeightCombinator, Measurement, MeasurementSources};
pub use height_cache::{CacheWrite, HeightCache, DEFAULT_ROW_HEIGHT};
pub use height_formula::{AspectRatio, HeightFormula, DEFAULT_TITLE_SPACING};
pub use row_layout::{ListLayout, RowFrame, VisibleRows};
