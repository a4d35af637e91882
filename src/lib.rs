//! racechart computes temporally coherent per-frame state for bar chart race videos.
//!
//! The engine maps raw per-entity time series and a query time to an unordered
//! list of [`FrameRecord`]s (`id`, held-over value, smoothed rank, alpha, bar
//! extent). Drawing, colors and dataset loading are left to the caller.
//!
//! # Pipeline overview
//!
//! Built once in [`RaceEngine::new`]:
//!
//! 1. **Normalize**: rows -> per-entity chronological timelines
//! 2. **Window**: options + [`Stage`] -> [`AnimationWindow`] and the seconds/date mapping
//! 3. **Interpolate**: one clamped piecewise-linear [`ValueTrack`] per entity
//!
//! Per call to [`RaceEngine::frame_at`]:
//!
//! 1. **Sample** every track, holding over the last numeric value for NaN samples
//! 2. **Rank** raw samples descending (NaN last, ties in encounter order)
//! 3. **Smooth** ranks through a fixed-length sliding window per entity
//! 4. **Fade** by rank cutoff and by the global entrance/exit schedule
//!
//! The rank window is stateful: query times must be non-decreasing and sampled
//! once per video frame. See [`RaceEngine`] for the exact contract.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chart;
mod foundation;
mod frame;
mod layout;
mod timeline;

pub use chart::options::{
    ChartOptions, Formatters, LabelFormatFn, MonospaceMeasure, TextMeasure, ValueFormatFn,
    default_label, format_thousands,
};
pub use foundation::core::{Edges, Fps, FrameIndex, Point, Rect, Shape, Stage};
pub use foundation::error::{RaceError, RaceResult};
pub use frame::composer::{FrameDiagnostics, FrameRecord, RaceEngine};
pub use frame::fade::{FadeSchedule, RANK_FADE_FLOOR};
pub use frame::ranking::{rank_order, ranks};
pub use frame::sampler::Sample;
pub use layout::bars::{BarLayout, LABEL_FONT_RATIO};
pub use timeline::interp::ValueTrack;
pub use timeline::normalize::{
    EntityTimeline, Meta, MetaTable, NormalizeReport, Observation, Row, Timelines, coerce_value,
    normalize_rows, parse_date,
};
pub use timeline::window::AnimationWindow;
