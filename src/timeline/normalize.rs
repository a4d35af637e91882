use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::{
    chart::options::ChartOptions,
    foundation::error::{RaceError, RaceResult},
};

/// One raw dataset or metadata row: field name to JSON value.
pub type Row = serde_json::Map<String, Value>;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Display metadata for one id.
pub struct Meta {
    /// Optional display name.
    pub name: Option<String>,
    /// The full metadata row, for custom formatters.
    pub fields: Row,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Metadata rows keyed by id; the first row for an id wins.
pub struct MetaTable {
    by_id: BTreeMap<String, Meta>,
}

impl MetaTable {
    /// Group metadata rows by `id_field`. Rows without a usable id are ignored.
    pub fn from_rows(rows: &[Row], id_field: &str) -> Self {
        let mut by_id = BTreeMap::new();
        for row in rows {
            let Some(id) = row.get(id_field).and_then(id_string) else {
                continue;
            };
            by_id.entry(id).or_insert_with(|| Meta {
                name: row.get("name").and_then(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                }),
                fields: row.clone(),
            });
        }
        Self { by_id }
    }

    /// Metadata for `id`, if any.
    pub fn get(&self, id: &str) -> Option<&Meta> {
        self.by_id.get(id)
    }

    /// Number of ids with metadata.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Return `true` when no metadata was loaded.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One dated sample of every configured value key.
pub struct Observation {
    /// Canonical instant of the observation.
    pub date: NaiveDateTime,
    /// Values aligned with [`Timelines::keys`]; NaN marks "no data".
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
/// Chronological observations of one entity.
pub struct EntityTimeline {
    /// Entity id.
    pub id: String,
    /// Observations sorted ascending by date (stable for equal dates). Empty when
    /// every row of the entity had an unparsable date.
    pub observations: Vec<Observation>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Counts of recoverable per-row problems seen while normalizing.
pub struct NormalizeReport {
    /// Rows read.
    pub rows: usize,
    /// Rows dropped because their date could not be parsed.
    pub skipped_rows: usize,
    /// Value cells that could not be coerced to a number and became NaN.
    pub nan_values: usize,
}

#[derive(Clone, Debug, PartialEq)]
/// Dataset grouped into per-entity timelines.
pub struct Timelines {
    /// Value keys, primary value field first.
    pub keys: Vec<String>,
    /// Entities in first-appearance order.
    pub entities: Vec<EntityTimeline>,
    /// Recoverable problems encountered.
    pub report: NormalizeReport,
}

impl Timelines {
    /// Earliest and latest observation dates across the whole dataset.
    pub fn date_extent(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut dates = self
            .entities
            .iter()
            .flat_map(|e| e.observations.iter().map(|o| o.date));
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Index of a value key in [`Observation::values`].
    pub fn key_index(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }
}

/// Group raw rows into per-entity timelines.
///
/// Input rows are never modified. A row missing the id or date field is a
/// configuration error; so is a value field that no row carries. Uncoercible
/// values become NaN. Rows with unparsable dates are skipped, but their id
/// still appears in [`Timelines::entities`].
#[tracing::instrument(skip(rows, opts), fields(rows = rows.len()))]
pub fn normalize_rows(rows: &[Row], opts: &ChartOptions) -> RaceResult<Timelines> {
    let keys = opts.numeric_keys();
    let mut report = NormalizeReport {
        rows: rows.len(),
        ..NormalizeReport::default()
    };

    if !rows.is_empty() && !rows.iter().any(|r| r.contains_key(&opts.value_field)) {
        return Err(RaceError::configuration(format!(
            "value field '{}' is absent from every row",
            opts.value_field
        )));
    }

    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    let mut entities: Vec<EntityTimeline> = Vec::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let id = match row.get(&opts.id_field) {
            None => {
                return Err(RaceError::configuration(format!(
                    "row {row_idx} has no id field '{}'",
                    opts.id_field
                )));
            }
            Some(v) => id_string(v).ok_or_else(|| {
                RaceError::configuration(format!(
                    "row {row_idx} id field '{}' must be a string or number",
                    opts.id_field
                ))
            })?,
        };
        let Some(raw_date) = row.get(&opts.date_field) else {
            return Err(RaceError::configuration(format!(
                "row {row_idx} has no date field '{}'",
                opts.date_field
            )));
        };
        // Every id gets a timeline, even when none of its dates parse.
        let idx = *index_by_id.entry(id.clone()).or_insert_with(|| {
            entities.push(EntityTimeline {
                id,
                observations: Vec::new(),
            });
            entities.len() - 1
        });
        let Some(date) = parse_date(raw_date) else {
            tracing::warn!(row = row_idx, date = %raw_date, "skipping row with unparsable date");
            report.skipped_rows += 1;
            continue;
        };

        let values: Vec<f64> = keys
            .iter()
            .map(|k| {
                let v = coerce_value(row.get(k));
                if v.is_nan() {
                    report.nan_values += 1;
                }
                v
            })
            .collect();

        entities[idx].observations.push(Observation { date, values });
    }

    for e in &mut entities {
        e.observations.sort_by_key(|o| o.date);
        if e.observations.is_empty() {
            tracing::warn!(id = %e.id, "entity has no row with a usable date");
        }
    }

    if report.skipped_rows > 0 || report.nan_values > 0 {
        tracing::warn!(
            skipped_rows = report.skipped_rows,
            nan_values = report.nan_values,
            "dataset contained recoverable problems"
        );
    }
    tracing::debug!(entities = entities.len(), keys = ?keys, "normalized dataset");

    Ok(Timelines {
        keys,
        entities,
        report,
    })
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a raw cell into a number; anything unusable is NaN.
pub fn coerce_value(v: Option<&Value>) -> f64 {
    match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                f64::NAN
            } else {
                s.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

/// Parse a date cell into a canonical wall-clock instant.
///
/// Strings accept RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS[.f]]`, `YYYY-MM-DD`,
/// `YYYY/MM/DD`, `YYYY-MM` and `YYYY`. Numbers are epoch milliseconds.
pub fn parse_date(v: &Value) -> Option<NaiveDateTime> {
    match v {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => {
            let ms = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(ms).map(|d| d.naive_utc())
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.naive_utc());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0);
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/normalize.rs"]
mod tests;
