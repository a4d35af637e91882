use crate::{
    foundation::math::lerp,
    timeline::normalize::EntityTimeline,
    timeline::window::DateScale,
};

/// Clamped piecewise-linear value function of one entity and one value key.
///
/// Knots are the entity's observation times remapped into scene seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTrack {
    secs: Vec<f64>,
    values: Vec<f64>,
}

impl ValueTrack {
    /// Build from parallel knot arrays; `secs` must be sorted ascending.
    ///
    /// Returns `None` when there are no knots.
    pub fn new(secs: Vec<f64>, values: Vec<f64>) -> Option<Self> {
        if secs.is_empty() || secs.len() != values.len() {
            return None;
        }
        debug_assert!(secs.windows(2).all(|w| w[0] <= w[1]));
        Some(Self { secs, values })
    }

    /// Track for an entity without usable observations: NaN at every time.
    pub(crate) fn missing() -> Self {
        Self {
            secs: vec![0.0],
            values: vec![f64::NAN],
        }
    }

    pub(crate) fn from_timeline(
        timeline: &EntityTimeline,
        key_idx: usize,
        dates: &DateScale,
    ) -> Self {
        let secs = timeline
            .observations
            .iter()
            .map(|o| dates.secs_for(o.date))
            .collect();
        let values = timeline
            .observations
            .iter()
            .map(|o| o.values.get(key_idx).copied().unwrap_or(f64::NAN))
            .collect();
        Self::new(secs, values).unwrap_or_else(Self::missing)
    }

    /// Value at scene time `t`.
    ///
    /// Before the first knot the first value is held, after the last knot the
    /// last value is held. Inside, a segment touching a NaN knot is NaN.
    pub fn sample(&self, t: f64) -> f64 {
        let n = self.secs.len();
        if t.is_nan() {
            return f64::NAN;
        }
        if n == 1 || t <= self.secs[0] {
            return self.values[0];
        }
        if t >= self.secs[n - 1] {
            return self.values[n - 1];
        }

        let i = self.secs.partition_point(|&s| s <= t).clamp(1, n - 1);
        let (s0, s1) = (self.secs[i - 1], self.secs[i]);
        let (v0, v1) = (self.values[i - 1], self.values[i]);
        if s1 == s0 {
            return v1;
        }
        lerp(v0, v1, (t - s0) / (s1 - s0))
    }

    /// First knot time in scene seconds.
    pub fn first_secs(&self) -> f64 {
        self.secs[0]
    }

    /// Last knot time in scene seconds.
    pub fn last_secs(&self) -> f64 {
        self.secs[self.secs.len() - 1]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/interp.rs"]
mod tests;
