use std::fmt;

use crate::{
    foundation::core::{Edges, Shape},
    foundation::error::{RaceError, RaceResult},
    timeline::normalize::Meta,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Immutable chart configuration.
///
/// Every field has a default, so a partial JSON object (or `{}`) deserializes
/// into a usable configuration. Derived quantities (sampling, bar height,
/// placeholders) are computed once by [`crate::RaceEngine::new`].
pub struct ChartOptions {
    /// Number of bars visible at once (top-N window).
    pub item_count: usize,
    /// Row field holding the entity id.
    pub id_field: String,
    /// Row field holding the observation date.
    pub date_field: String,
    /// Primary value field used for ranking and bar extent.
    pub value_field: String,
    /// All numeric fields to coerce; `value_field` is always included.
    pub value_keys: Vec<String>,
    /// Explicit `[start, end]` seconds of rendered motion; derived when absent.
    pub ani_time: Option<[f64; 2]>,
    /// Hold time before motion starts and after it ends, in seconds.
    pub freeze_time: [f64; 2],
    /// Entrance and exit fade durations, in seconds.
    pub fade_time: [f64; 2],
    /// Rank smoothing window in seconds.
    pub swap_duration: f64,
    /// Chart area in pixels.
    pub shape: Shape,
    /// Margins inside `shape`.
    pub margin: Edges,
    /// Horizontal padding between label, bar and value text.
    pub bar_padding: f64,
    /// Vertical gap between bars.
    pub bar_gap: f64,
    /// `strftime` pattern for the date label.
    pub date_format: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            item_count: 20,
            id_field: "id".to_owned(),
            date_field: "date".to_owned(),
            value_field: "value".to_owned(),
            value_keys: vec!["value".to_owned()],
            ani_time: None,
            freeze_time: [2.0, 2.0],
            fade_time: [0.5, 0.0],
            swap_duration: 0.25,
            shape: Shape::default(),
            margin: Edges::default(),
            bar_padding: 8.0,
            bar_gap: 8.0,
            date_format: "%Y-%m-%d".to_owned(),
        }
    }
}

impl ChartOptions {
    /// Validate option values that do not depend on the dataset.
    pub fn validate(&self) -> RaceResult<()> {
        if self.item_count == 0 {
            return Err(RaceError::configuration("item_count must be > 0"));
        }
        for (name, field) in [
            ("id_field", &self.id_field),
            ("date_field", &self.date_field),
            ("value_field", &self.value_field),
        ] {
            if field.trim().is_empty() {
                return Err(RaceError::configuration(format!(
                    "{name} must be non-empty"
                )));
            }
        }
        if self.id_field == self.date_field {
            return Err(RaceError::configuration(
                "id_field and date_field must differ",
            ));
        }
        for pair in [self.freeze_time, self.fade_time] {
            if pair.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(RaceError::configuration(
                    "freeze_time and fade_time must be finite and >= 0",
                ));
            }
        }
        if !self.swap_duration.is_finite() || self.swap_duration <= 0.0 {
            return Err(RaceError::configuration("swap_duration must be > 0"));
        }
        if !self.bar_padding.is_finite() || !self.bar_gap.is_finite() {
            return Err(RaceError::configuration(
                "bar_padding and bar_gap must be finite",
            ));
        }
        validate_date_format(&self.date_format)
    }

    /// Value fields to coerce, primary field first, without duplicates.
    pub fn numeric_keys(&self) -> Vec<String> {
        let mut keys = vec![self.value_field.clone()];
        for k in &self.value_keys {
            if !keys.contains(k) && *k != self.id_field && *k != self.date_field {
                keys.push(k.clone());
            }
        }
        keys
    }
}

fn validate_date_format(fmt: &str) -> RaceResult<()> {
    use chrono::format::{Item, StrftimeItems};

    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(RaceError::configuration(format!(
            "invalid date_format '{fmt}'"
        )));
    }
    Ok(())
}

/// Formats a bar value for display.
pub type ValueFormatFn = Box<dyn Fn(f64) -> String + Send + Sync>;
/// Formats a per-id label from optional metadata.
pub type LabelFormatFn = Box<dyn Fn(&str, Option<&Meta>) -> String + Send + Sync>;

/// Display strategies supplied at construction.
///
/// Formatters must be pure: they see only `(value)` or `(id, meta)`, never engine state.
pub struct Formatters {
    /// Value text shown after each bar.
    pub value: ValueFormatFn,
    /// Label shown left of each bar.
    pub label: LabelFormatFn,
    /// Text drawn inside each bar; `None` reuses `label`.
    pub bar_info: Option<LabelFormatFn>,
}

impl Formatters {
    /// Format a value with the configured strategy.
    pub fn format_value(&self, v: f64) -> String {
        (self.value)(v)
    }

    /// Format a label with the configured strategy.
    pub fn format_label(&self, id: &str, meta: Option<&Meta>) -> String {
        (self.label)(id, meta)
    }

    /// Format bar info, falling back to the label strategy.
    pub fn format_bar_info(&self, id: &str, meta: Option<&Meta>) -> String {
        match &self.bar_info {
            Some(f) => f(id, meta),
            None => self.format_label(id, meta),
        }
    }
}

impl Default for Formatters {
    fn default() -> Self {
        Self {
            value: Box::new(format_thousands),
            label: Box::new(default_label),
            bar_info: None,
        }
    }
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatters")
            .field("bar_info", &self.bar_info.is_some())
            .finish_non_exhaustive()
    }
}

/// Metadata `name` when present, otherwise the id.
pub fn default_label(id: &str, meta: Option<&Meta>) -> String {
    meta.and_then(|m| m.name.clone())
        .unwrap_or_else(|| id.to_owned())
}

/// Round to an integer and group thousands with commas (`1234567.8 -> "1,234,568"`).
pub fn format_thousands(v: f64) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "NaN".to_owned()
        } else if v > 0.0 {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Measures rendered text width. Implemented by the rendering collaborator.
pub trait TextMeasure {
    /// Width in pixels of `text` drawn at `font_size`.
    fn measure(&self, text: &str, font_size: f64) -> f64;
}

/// Fixed-advance measurement for monospace fonts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Glyph advance as a fraction of the font size.
    pub advance_ratio: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.advance_ratio
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/options.rs"]
mod tests;
