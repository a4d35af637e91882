use crate::timeline::interp::ValueTrack;

#[derive(Clone, Copy, Debug, PartialEq)]
/// One entity's value at a query time.
pub struct Sample {
    /// Interpolated value before hold-over; NaN when there is no live data.
    pub raw: f64,
    /// `raw`, or the last numeric value seen when `raw` is NaN.
    pub held: f64,
}

/// Evaluates every entity's primary track and applies last-known-value hold-over.
#[derive(Clone, Debug)]
pub(crate) struct FrameSampler {
    tracks: Vec<ValueTrack>,
    last_value: Vec<Option<f64>>,
}

impl FrameSampler {
    pub(crate) fn new(tracks: Vec<ValueTrack>) -> Self {
        let last_value = vec![None; tracks.len()];
        Self { tracks, last_value }
    }

    /// Raw values at `t`, in entity order. Does not touch the hold-over cache.
    pub(crate) fn sample_raw(&self, t: f64) -> Vec<f64> {
        self.tracks.iter().map(|tr| tr.sample(t)).collect()
    }

    /// Record numeric samples and substitute the cached value for NaN ones.
    pub(crate) fn hold_over(&mut self, raw: &[f64]) -> Vec<Sample> {
        debug_assert_eq!(raw.len(), self.last_value.len());
        raw.iter()
            .zip(self.last_value.iter_mut())
            .map(|(&raw, last)| {
                if !raw.is_nan() {
                    *last = Some(raw);
                }
                Sample {
                    raw,
                    held: last.unwrap_or(f64::NAN),
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/sampler.rs"]
mod tests;
