use crate::{
    chart::options::ChartOptions,
    foundation::core::{Point, Rect},
    foundation::error::{RaceError, RaceResult},
};

/// Fraction of the bar height used for label and value text.
pub const LABEL_FONT_RATIO: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Pixel geometry derived once from the options and measured text widths.
pub struct BarLayout {
    /// Height of one bar.
    pub bar_height: f64,
    /// Vertical distance between bar tops at adjacent ranks.
    pub row_pitch: f64,
    /// Widest label text; reserved left of the bars.
    pub label_placeholder: f64,
    /// Widest value text; reserved right of the bars.
    pub value_placeholder: f64,
    /// Width a bar reaches at the current maximum value.
    pub available_width: f64,
    /// Left edge of every bar.
    pub bar_x: f64,
    /// Top edge of the rank-0 bar.
    pub top: f64,
}

impl BarLayout {
    /// `(H - top - bottom - gap * (n - 1)) / n`.
    pub fn bar_height_for(opts: &ChartOptions) -> f64 {
        let n = opts.item_count as f64;
        (opts.shape.height - opts.margin.top - opts.margin.bottom - opts.bar_gap * (n - 1.0)) / n
    }

    /// Font size used for labels and values.
    pub fn font_size_for(opts: &ChartOptions) -> f64 {
        Self::bar_height_for(opts) * LABEL_FONT_RATIO
    }

    /// Derive the layout; fails when bars or the drawable width collapse.
    pub fn new(
        opts: &ChartOptions,
        label_placeholder: f64,
        value_placeholder: f64,
    ) -> RaceResult<Self> {
        let bar_height = Self::bar_height_for(opts);
        if !bar_height.is_finite() || bar_height <= 0.0 {
            return Err(RaceError::configuration(format!(
                "bar height {bar_height} is not positive; shrink item_count, margins or bar_gap"
            )));
        }
        let m = &opts.margin;
        let available_width = opts.shape.width
            - m.left
            - opts.bar_padding
            - label_placeholder
            - m.right
            - value_placeholder;
        if !available_width.is_finite() || available_width <= 0.0 {
            return Err(RaceError::configuration(format!(
                "drawable bar width {available_width} is not positive"
            )));
        }
        Ok(Self {
            bar_height,
            row_pitch: bar_height + opts.bar_gap,
            label_placeholder,
            value_placeholder,
            available_width,
            bar_x: m.left + opts.bar_padding + label_placeholder,
            top: m.top,
        })
    }

    /// Top edge of a bar at a (possibly fractional) rank.
    pub fn y_for_rank(&self, rank: f64) -> f64 {
        self.top + rank * self.row_pitch
    }

    /// Bar rectangle for a smoothed rank and horizontal extent.
    pub fn bar_rect(&self, rank: f64, extent: f64) -> Rect {
        Rect::from_origin_size(
            Point::new(self.bar_x, self.y_for_rank(rank)),
            (extent.max(0.0), self.bar_height),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/bars.rs"]
mod tests;
