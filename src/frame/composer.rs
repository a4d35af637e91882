use chrono::NaiveDateTime;

use crate::{
    chart::options::{ChartOptions, Formatters, MonospaceMeasure, TextMeasure},
    foundation::core::{Rect, Stage},
    foundation::error::{RaceError, RaceResult},
    foundation::math::{LinearScale, sample_times},
    frame::fade::FadeSchedule,
    frame::ranking::ranks,
    frame::sampler::FrameSampler,
    frame::smoothing::RankSmoother,
    layout::bars::BarLayout,
    timeline::interp::ValueTrack,
    timeline::normalize::{Meta, MetaTable, NormalizeReport, Row, Timelines, normalize_rows},
    timeline::window::{AnimationWindow, DateScale},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Engine output for one entity at one query time.
pub struct FrameRecord {
    /// Entity id.
    pub id: String,
    /// Held-over value; NaN only before the entity's first numeric sample.
    pub value: f64,
    /// Smoothed rank; vertical position is `rank * (bar_height + bar_gap)`.
    pub rank: f64,
    /// Visibility multiplier in `[0, 1]`. Renderers skip records with `alpha <= 0`.
    pub alpha: f64,
    /// Bar width in pixels.
    pub horizontal_extent: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Counters exposing misuse of the sequential-time contract.
pub struct FrameDiagnostics {
    /// Total `frame_at` calls.
    pub queries: u64,
    /// Calls whose time was earlier than the previous call.
    pub time_regressions: u64,
    /// Calls whose time equalled the previous call.
    pub repeated_times: u64,
}

/// Temporal state engine for one dataset and configuration.
///
/// # Sequential access
///
/// [`RaceEngine::frame_at`] advances a sliding rank window by one sample per
/// call. Callers must request non-decreasing times at a fixed density
/// (`sampling` samples per `swap_duration`, i.e. once per video frame).
/// Repeating or rewinding a time is not corrected: the window advances anyway
/// and the smoothed ranks differ from a fresh run. Such calls are counted in
/// [`RaceEngine::diagnostics`] and logged. Parallel renderers need one engine
/// per worker, each primed independently, or must serialize calls.
pub struct RaceEngine {
    opts: ChartOptions,
    formatters: Formatters,
    meta: MetaTable,
    window: AnimationWindow,
    sampling: usize,
    ids: Vec<String>,
    timelines: Timelines,
    dates: Option<DateScale>,
    sampler: FrameSampler,
    smoother: RankSmoother,
    fade: FadeSchedule,
    layout: BarLayout,
    last_query: Option<f64>,
    diagnostics: FrameDiagnostics,
}

impl std::fmt::Debug for RaceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceEngine")
            .field("entities", &self.ids.len())
            .field("window", &self.window)
            .field("sampling", &self.sampling)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

impl RaceEngine {
    /// Build an engine with default formatters and monospace text measurement.
    pub fn new(
        rows: &[Row],
        meta_rows: &[Row],
        opts: ChartOptions,
        stage: Stage,
    ) -> RaceResult<Self> {
        Self::with_collaborators(
            rows,
            meta_rows,
            opts,
            stage,
            Formatters::default(),
            &MonospaceMeasure::default(),
        )
    }

    /// Build an engine with caller-supplied formatters and text measurement.
    ///
    /// Validates the configuration, normalizes the dataset, builds one
    /// interpolator per entity and primes the rank history over one
    /// `swap_duration` of look-back before the animation window starts.
    #[tracing::instrument(skip_all, fields(rows = rows.len(), fps = stage.fps.as_f64()))]
    pub fn with_collaborators(
        rows: &[Row],
        meta_rows: &[Row],
        opts: ChartOptions,
        stage: Stage,
        formatters: Formatters,
        measure: &dyn TextMeasure,
    ) -> RaceResult<Self> {
        opts.validate()?;
        let window = AnimationWindow::resolve(&opts, &stage)?;
        let sampling = sampling_for(&opts, &stage);

        let timelines = normalize_rows(rows, &opts)?;
        let meta = MetaTable::from_rows(meta_rows, &opts.id_field);
        let dates = timelines
            .date_extent()
            .map(|extent| DateScale::new(window, extent))
            .transpose()?;
        if dates.is_none() && !timelines.entities.is_empty() {
            return Err(RaceError::data(format!(
                "none of the {} rows has a parsable '{}'",
                timelines.report.rows, opts.date_field
            )));
        }

        let ids: Vec<String> = timelines.entities.iter().map(|e| e.id.clone()).collect();
        let tracks = match &dates {
            Some(ds) => timelines
                .entities
                .iter()
                .map(|e| ValueTrack::from_timeline(e, 0, ds))
                .collect(),
            None => Vec::new(),
        };
        let sampler = FrameSampler::new(tracks);

        let font_size = BarLayout::font_size_for(&opts);
        let label_placeholder = ids
            .iter()
            .map(|id| measure.measure(&formatters.format_label(id, meta.get(id)), font_size))
            .fold(0.0, f64::max);
        let value_placeholder = timelines
            .entities
            .iter()
            .flat_map(|e| e.observations.iter().map(|o| o.values[0]))
            .filter(|v| v.is_finite())
            .map(|v| measure.measure(&formatters.format_value(v), font_size))
            .fold(0.0, f64::max);
        let layout = BarLayout::new(&opts, label_placeholder, value_placeholder)?;

        let fade = FadeSchedule::new(&opts, window)?;

        let mut smoother = RankSmoother::new(ids.len(), sampling, opts.item_count);
        let lookback = sample_times(window.start - opts.swap_duration, window.start, sampling);
        smoother.prime(
            lookback
                .iter()
                .map(|&t| rank_samples(&sampler.sample_raw(t))),
        );

        tracing::debug!(
            entities = ids.len(),
            meta = meta.len(),
            window_start = window.start,
            window_end = window.end,
            sampling,
            bar_height = layout.bar_height,
            "race engine ready"
        );

        Ok(Self {
            opts,
            formatters,
            meta,
            window,
            sampling,
            ids,
            timelines,
            dates,
            sampler,
            smoother,
            fade,
            layout,
            last_query: None,
            diagnostics: FrameDiagnostics::default(),
        })
    }

    /// Compute the frame records at scene time `t` and advance the rank window.
    ///
    /// Returns one record per entity, in first-appearance order. Callers
    /// position bars by `rank`, not by list order.
    pub fn frame_at(&mut self, t: f64) -> Vec<FrameRecord> {
        self.note_query(t);
        if self.ids.is_empty() {
            return Vec::new();
        }

        let raw = self.sampler.sample_raw(t);
        let smoothed = self.smoother.advance(&rank_samples(&raw));
        let samples = self.sampler.hold_over(&raw);

        // Held-over values are drawn but never set the scale.
        let max = raw
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);
        let extent = extent_scale(max, self.layout.available_width);

        self.ids
            .iter()
            .zip(samples)
            .zip(smoothed)
            .map(|((id, s), rank)| FrameRecord {
                id: id.clone(),
                value: s.held,
                rank,
                alpha: self.fade.alpha(rank, t),
                horizontal_extent: extent.as_ref().map_or(0.0, |sc| {
                    let w = sc.apply(s.held);
                    if w.is_nan() { 0.0 } else { w }
                }),
            })
            .collect()
    }

    fn note_query(&mut self, t: f64) {
        self.diagnostics.queries += 1;
        if let Some(prev) = self.last_query {
            if t < prev {
                self.diagnostics.time_regressions += 1;
                tracing::warn!(
                    t,
                    prev,
                    "frame_at called with an earlier time; smoothed ranks will diverge"
                );
            } else if t == prev {
                self.diagnostics.repeated_times += 1;
                tracing::warn!(t, "frame_at called twice for the same time");
            }
        }
        self.last_query = Some(t);
    }

    /// Resolved animation window.
    pub fn window(&self) -> AnimationWindow {
        self.window
    }

    /// Rank samples per `swap_duration`, also the rank history length.
    pub fn sampling(&self) -> usize {
        self.sampling
    }

    /// Entity ids in first-appearance order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Options the engine was built with.
    pub fn options(&self) -> &ChartOptions {
        &self.opts
    }

    /// Derived bar geometry.
    pub fn layout(&self) -> &BarLayout {
        &self.layout
    }

    /// Recoverable problems found while loading the dataset.
    pub fn report(&self) -> NormalizeReport {
        self.timelines.report
    }

    /// Misuse counters for the sequential-time contract.
    pub fn diagnostics(&self) -> FrameDiagnostics {
        self.diagnostics
    }

    /// Metadata for `id`, if any was supplied.
    pub fn meta(&self, id: &str) -> Option<&Meta> {
        self.meta.get(id)
    }

    /// Display label for `id` via the label formatter.
    pub fn label(&self, id: &str) -> String {
        self.formatters.format_label(id, self.meta.get(id))
    }

    /// In-bar info text for `id` via the bar-info formatter.
    pub fn bar_info(&self, id: &str) -> String {
        self.formatters.format_bar_info(id, self.meta.get(id))
    }

    /// Display text for a value via the value formatter.
    pub fn format_value(&self, v: f64) -> String {
        self.formatters.format_value(v)
    }

    /// Dataset date shown at scene time `t`; `None` for an empty dataset.
    pub fn date_at(&self, t: f64) -> Option<NaiveDateTime> {
        self.dates.as_ref().and_then(|d| d.date_at(t))
    }

    /// Date label at `t`, formatted with `date_format`.
    pub fn date_label(&self, t: f64) -> Option<String> {
        self.date_at(t)
            .map(|d| d.format(&self.opts.date_format).to_string())
    }

    /// Sample a secondary value key for `id` at `t`. Pure; no hold-over.
    pub fn value_at(&self, id: &str, key: &str, t: f64) -> RaceResult<f64> {
        let key_idx = self.timelines.key_index(key).ok_or_else(|| {
            RaceError::evaluation(format!("unknown value key '{key}'"))
        })?;
        let entity = self
            .timelines
            .entities
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| RaceError::evaluation(format!("unknown id '{id}'")))?;
        let dates = self
            .dates
            .as_ref()
            .ok_or_else(|| RaceError::evaluation("dataset is empty"))?;
        Ok(ValueTrack::from_timeline(entity, key_idx, dates).sample(t))
    }

    /// Bar rectangle for a record, using the derived layout.
    pub fn bar_rect(&self, record: &FrameRecord) -> Rect {
        self.layout.bar_rect(record.rank, record.horizontal_extent)
    }

    /// Current rank history length for `id`.
    pub fn history_len(&self, id: &str) -> Option<usize> {
        let idx = self.ids.iter().position(|i| i == id)?;
        self.smoother.history(idx).map(|h| h.len())
    }
}

/// `round(fps * swap_duration)`, at least 1.
fn sampling_for(opts: &ChartOptions, stage: &Stage) -> usize {
    let n = (stage.fps.as_f64() * opts.swap_duration).round();
    if n.is_finite() && n >= 1.0 { n as usize } else { 1 }
}

/// Integer rank per entity; `None` where the raw sample is NaN.
fn rank_samples(raw: &[f64]) -> Vec<Option<usize>> {
    ranks(raw)
        .into_iter()
        .zip(raw)
        .map(|(r, v)| if v.is_nan() { None } else { Some(r) })
        .collect()
}

/// Clamped `[0, max] -> [0, width]`; `None` when no positive maximum exists.
fn extent_scale(max: f64, width: f64) -> Option<LinearScale> {
    if !max.is_finite() || max <= 0.0 {
        return None;
    }
    LinearScale::clamped(vec![0.0, max], vec![0.0, width]).ok()
}

#[cfg(test)]
#[path = "../../tests/unit/frame/composer.rs"]
mod tests;
