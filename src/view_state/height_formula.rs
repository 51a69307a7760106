//! Row height formula.

use crate::model::{CombinedHeight, MeasuredSize};

/// Vertical gap between title and description, in points.
pub const DEFAULT_TITLE_SPACING: f64 = 8.0;

/// Fixed width:height ratio of the mood image area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    /// Width units.
    pub width: f64,
    /// Height units.
    pub height: f64,
}

impl AspectRatio {
    /// The 4:3 ratio used for every campaign row.
    pub const FOUR_BY_THREE: Self = Self {
        width: 4.0,
        height: 3.0,
    };

    /// Height of an area of this ratio at `width`.
    pub fn height_for(&self, width: f64) -> f64 {
        (width / self.width) * self.height
    }
}

/// Combines the three cell measurements into a row height.
///
/// `height = image_height(cell_width) + ceil(description) + ceil(title) + spacing`
///
/// The image area is always sized from the cell width and the fixed ratio.
/// The image's own natural size is received but does not influence the
/// result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightFormula {
    /// Ratio of the image area.
    pub image_ratio: AspectRatio,
    /// Spacing between title and description.
    pub spacing: f64,
}

impl Default for HeightFormula {
    fn default() -> Self {
        Self {
            image_ratio: AspectRatio::FOUR_BY_THREE,
            spacing: DEFAULT_TITLE_SPACING,
        }
    }
}

impl HeightFormula {
    /// Formula with a custom title spacing and the standard 4:3 image area.
    pub fn with_spacing(spacing: f64) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }

    /// Height of the image area for a cell of `cell_width`.
    ///
    /// A cell that has not been laid out yet (width 0 or negative) gets no
    /// image area.
    pub fn image_height(&self, cell_width: f64) -> f64 {
        if cell_width <= 0.0 {
            return 0.0;
        }
        self.image_ratio.height_for(cell_width)
    }

    /// Combined row height.
    pub fn combine(
        &self,
        cell_width: f64,
        _image: MeasuredSize,
        title: MeasuredSize,
        description: MeasuredSize,
    ) -> CombinedHeight {
        CombinedHeight::new(
            self.image_height(cell_width)
                + description.height.ceil()
                + title.height.ceil()
                + self.spacing,
        )
    }
}
