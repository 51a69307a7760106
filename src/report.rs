//! Plain-text report of a laid-out listing, printed by the binary.

use crate::listing::{HeadlessHost, HostStats};
use crate::model::{CampaignItem, CombinedHeight, ItemIndex};
use crate::view_state::RowFrame;
use std::fmt;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Column budget for campaign names.
const NAME_COLUMNS: usize = 24;

/// One printed row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Laid-out frame.
    pub frame: RowFrame,
    /// Campaign name, empty for the loading placeholder.
    pub name: String,
    /// Recorded combined height; `None` means the row still uses the default.
    pub measured: Option<CombinedHeight>,
}

/// Snapshot of the listing after the run loop stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Rows in order.
    pub rows: Vec<ReportRow>,
    /// Total content height.
    pub content_height: usize,
    /// Host counters.
    pub stats: HostStats,
}

impl FrameReport {
    /// Collect frames from `host` and names from `campaigns`.
    pub fn collect(
        host: &HeadlessHost,
        campaigns: &[CampaignItem],
        measured: impl Fn(ItemIndex) -> Option<CombinedHeight>,
    ) -> Self {
        let rows = host
            .frames()
            .into_iter()
            .map(|frame| ReportRow {
                name: campaigns
                    .get(frame.index.get())
                    .map(|c| c.name().to_string())
                    .unwrap_or_default(),
                measured: measured(frame.index),
                frame,
            })
            .collect();
        Self {
            rows,
            content_height: host.content_height(),
            stats: host.stats(),
        }
    }

    /// Number of rows that finished measuring.
    pub fn measured_count(&self) -> usize {
        self.rows.iter().filter(|r| r.measured.is_some()).count()
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>4}  {:<width$}  {:>6}  {:>6}  {:>7}",
            "row",
            "name",
            "y",
            "height",
            "status",
            width = NAME_COLUMNS
        )?;
        for row in &self.rows {
            let status = if row.measured.is_some() { "sized" } else { "default" };
            writeln!(
                f,
                "{:>4}  {}  {:>6}  {:>6}  {:>7}",
                row.frame.index.get(),
                fit_columns(&row.name, NAME_COLUMNS),
                row.frame.y,
                row.frame.height,
                status
            )?;
        }
        write!(
            f,
            "content height {} | {}/{} sized | {} layout passes, {} invalidations, {} binds",
            self.content_height,
            self.measured_count(),
            self.rows.len(),
            self.stats.layout_passes,
            self.stats.invalidations,
            self.stats.binds
        )
    }
}

/// Truncate or pad `text` to exactly `columns` display columns.
///
/// Truncated text ends with `…`.
pub fn fit_columns(text: &str, columns: usize) -> String {
    let width = text.width();
    if width <= columns {
        return format!("{text}{}", " ".repeat(columns - width));
    }
    let mut out = String::new();
    let mut used = 0;
    let budget = columns.saturating_sub(1);
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    if columns > 0 {
        out.push('…');
        used += 1;
    }
    out.push_str(&" ".repeat(columns.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_columns_pads_short_text() {
        assert_eq!(fit_columns("ab", 4), "ab  ");
    }

    #[test]
    fn fit_columns_truncates_with_ellipsis() {
        assert_eq!(fit_columns("abcdef", 4), "abc…");
    }

    #[test]
    fn fit_columns_counts_wide_glyphs() {
        // 日 and 本 are two columns each
        assert_eq!(fit_columns("日本語", 4), "日… ");
        assert_eq!(fit_columns("日本", 4).width(), 4);
    }

    #[test]
    fn fit_columns_zero_budget_is_empty() {
        assert_eq!(fit_columns("abc", 0), "");
    }
}
