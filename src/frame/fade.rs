use crate::{
    chart::options::ChartOptions,
    foundation::error::RaceResult,
    foundation::math::LinearScale,
    timeline::window::AnimationWindow,
};

/// Alpha floor reached by entities one full slot below the visible window.
pub const RANK_FADE_FLOOR: f64 = 0.001;

/// Visibility multipliers: global entrance/exit fade times per-rank cutoff fade.
#[derive(Clone, Debug)]
pub struct FadeSchedule {
    time: LinearScale,
    rank: LinearScale,
}

impl FadeSchedule {
    /// Build the four-point time schedule and the top-N rank ramp.
    pub fn new(opts: &ChartOptions, window: AnimationWindow) -> RaceResult<Self> {
        let [freeze_in, freeze_out] = opts.freeze_time;
        let [fade_in, fade_out] = opts.fade_time;
        let time = LinearScale::clamped(
            vec![
                window.start - freeze_in - fade_in,
                window.start - freeze_in,
                window.end + freeze_out,
                window.end + freeze_out + fade_out,
            ],
            vec![
                if fade_in > 0.0 { 0.0 } else { 1.0 },
                1.0,
                1.0,
                if fade_out > 0.0 { 0.0 } else { 1.0 },
            ],
        )?;
        let n = opts.item_count as f64;
        let rank = LinearScale::clamped(vec![n - 1.0, n], vec![1.0, RANK_FADE_FLOOR])?;
        Ok(Self { time, rank })
    }

    /// Global entrance/exit multiplier at scene time `t`.
    pub fn time_alpha(&self, t: f64) -> f64 {
        self.time.apply(t).clamp(0.0, 1.0)
    }

    /// Rank-cutoff multiplier for a smoothed rank.
    pub fn rank_alpha(&self, smoothed_rank: f64) -> f64 {
        self.rank.apply(smoothed_rank).clamp(0.0, 1.0)
    }

    /// Combined alpha, always within `[0, 1]`.
    pub fn alpha(&self, smoothed_rank: f64, t: f64) -> f64 {
        let a = self.rank_alpha(smoothed_rank) * self.time_alpha(t);
        if a.is_nan() { 0.0 } else { a }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/fade.rs"]
mod tests;
