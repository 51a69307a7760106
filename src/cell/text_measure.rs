//! Synchronous text measurement.
//!
//! Assigning text to a label triggers an immediate measurement pass that
//! yields the label's fitted size. The host UI layer provides the real
//! measurement; [`MonospaceMeasurer`] is the headless implementation used by
//! the bundled host.

use crate::model::Size;
use unicode_width::UnicodeWidthStr;

/// How a label may deviate from the proposed width when fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fitting {
    /// The label takes exactly the proposed width.
    #[default]
    FillWidth,
    /// The label may shrink horizontally to its widest line and grows
    /// vertically only as much as its content needs.
    Compressed,
}

/// Measures text for a label of a given width.
pub trait TextMeasurer {
    /// Fitted size of `text` when wrapped to at most `max_width`.
    fn fitted_size(&self, text: &str, max_width: f64, fitting: Fitting) -> Size;
}

/// Fixed-advance text measurement.
///
/// Every column of display width (as reported by `unicode-width`) advances
/// by `glyph_width`; wrapped lines are `line_height` tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Advance per display column, in points.
    pub glyph_width: f64,
    /// Height of one line, in points.
    pub line_height: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            glyph_width: 8.0,
            line_height: 20.4,
        }
    }
}

impl MonospaceMeasurer {
    /// Create a measurer.
    pub fn new(glyph_width: f64, line_height: f64) -> Self {
        Self {
            glyph_width,
            line_height,
        }
    }

    /// Columns that fit in `max_width`. Always at least one.
    fn columns(&self, max_width: f64) -> usize {
        if self.glyph_width <= 0.0 || !max_width.is_finite() {
            return usize::MAX;
        }
        ((max_width / self.glyph_width).floor() as usize).max(1)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn fitted_size(&self, text: &str, max_width: f64, fitting: Fitting) -> Size {
        let lines = wrap(text, self.columns(max_width));
        let height = lines.len() as f64 * self.line_height;
        let width = match fitting {
            Fitting::FillWidth => max_width.max(0.0),
            Fitting::Compressed => {
                let widest = lines.iter().map(|l| l.width()).max().unwrap_or(0);
                (widest as f64 * self.glyph_width).min(max_width.max(0.0))
            }
        };
        Size::new(width, height)
    }
}

/// Greedy word wrap to `columns` display columns.
///
/// Explicit newlines always break. Words wider than a line are split. Empty
/// text has no lines.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let needed = if line.is_empty() { word_width } else { line_width + 1 + word_width };
            if needed <= columns {
                if !line.is_empty() {
                    line.push(' ');
                    line_width += 1;
                }
                line.push_str(word);
                line_width += word_width;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if word_width <= columns {
                line.push_str(word);
                line_width = word_width;
            } else {
                for piece in split_word(word, columns) {
                    if !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                    }
                    line_width = piece.width();
                    line = piece;
                }
            }
        }
        lines.push(line);
    }
    lines
}

fn split_word(word: &str, columns: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0;
    for ch in word.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > columns && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
        }
        piece.push(ch);
        width += ch_width;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
