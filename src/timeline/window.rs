use chrono::{DateTime, NaiveDateTime};

use crate::{
    chart::options::ChartOptions,
    foundation::core::Stage,
    foundation::error::{RaceError, RaceResult},
    foundation::math::LinearScale,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Seconds of rendered motion, `[start, end]`.
pub struct AnimationWindow {
    /// First second of motion (the dataset's first date).
    pub start: f64,
    /// Last second of motion (the dataset's last date).
    pub end: f64,
}

impl AnimationWindow {
    /// Create a validated window with `start < end`.
    pub fn new(start: f64, end: f64) -> RaceResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(RaceError::configuration(
                "animation window bounds must be finite",
            ));
        }
        if end <= start {
            return Err(RaceError::configuration(format!(
                "animation window [{start}, {end}] is empty or inverted"
            )));
        }
        Ok(Self { start, end })
    }

    /// Explicit `ani_time`, or `[fadeIn + freezeIn, duration - freezeOut - fadeOut]`.
    pub fn resolve(opts: &ChartOptions, stage: &Stage) -> RaceResult<Self> {
        match opts.ani_time {
            Some([start, end]) => Self::new(start, end),
            None => Self::new(
                opts.fade_time[0] + opts.freeze_time[0],
                stage.duration_secs - opts.freeze_time[1] - opts.fade_time[1],
            ),
        }
    }
}

/// Clamped mapping between scene seconds and dataset dates.
///
/// A dataset whose dates are all equal maps every date to the window end.
#[derive(Clone, Debug)]
pub(crate) struct DateScale {
    sec_to_ms: LinearScale,
    ms_to_sec: LinearScale,
}

impl DateScale {
    pub(crate) fn new(
        window: AnimationWindow,
        (lo, hi): (NaiveDateTime, NaiveDateTime),
    ) -> RaceResult<Self> {
        let lo = to_ms(lo);
        let hi = to_ms(hi);
        Ok(Self {
            sec_to_ms: LinearScale::clamped(vec![window.start, window.end], vec![lo, hi])?,
            ms_to_sec: LinearScale::clamped(vec![lo, hi], vec![window.start, window.end])?,
        })
    }

    pub(crate) fn secs_for(&self, date: NaiveDateTime) -> f64 {
        self.ms_to_sec.apply(to_ms(date))
    }

    pub(crate) fn date_at(&self, sec: f64) -> Option<NaiveDateTime> {
        let ms = self.sec_to_ms.apply(sec);
        if !ms.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis(ms.round() as i64).map(|d| d.naive_utc())
    }
}

fn to_ms(d: NaiveDateTime) -> f64 {
    d.and_utc().timestamp_millis() as f64
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/window.rs"]
mod tests;
