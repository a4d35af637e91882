use crate::foundation::error::{RaceError, RaceResult};

/// Linear interpolation that never invents a number out of NaN.
///
/// Any NaN endpoint yields NaN, including at `t == 0` and `t == 1`.
#[inline]
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Arithmetic mean; NaN for an empty input.
pub(crate) fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// `count` evenly spaced sample times in `[start, stop)`.
pub(crate) fn sample_times(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let step = (stop - start) / count as f64;
    (0..count).map(|k| start + step * k as f64).collect()
}

/// Piecewise-linear map over a non-decreasing domain, optionally clamped.
///
/// Zero-width segments resolve to their right endpoint.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinearScale {
    domain: Vec<f64>,
    range: Vec<f64>,
    clamp: bool,
}

impl LinearScale {
    pub(crate) fn new(domain: Vec<f64>, range: Vec<f64>, clamp: bool) -> RaceResult<Self> {
        if domain.len() < 2 {
            return Err(RaceError::configuration(
                "linear scale needs at least two domain points",
            ));
        }
        if domain.len() != range.len() {
            return Err(RaceError::configuration(
                "linear scale domain and range must have equal length",
            ));
        }
        if domain.iter().any(|d| !d.is_finite()) {
            return Err(RaceError::configuration(
                "linear scale domain must be finite",
            ));
        }
        if !domain.windows(2).all(|w| w[0] <= w[1]) {
            return Err(RaceError::configuration(
                "linear scale domain must be non-decreasing",
            ));
        }
        Ok(Self {
            domain,
            range,
            clamp,
        })
    }

    pub(crate) fn clamped(domain: Vec<f64>, range: Vec<f64>) -> RaceResult<Self> {
        Self::new(domain, range, true)
    }

    pub(crate) fn apply(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let n = self.domain.len();
        let lo = self.domain[0];
        let hi = self.domain[n - 1];
        let x = if self.clamp { x.clamp(lo, hi) } else { x };

        let i = self.domain.partition_point(|&d| d <= x).clamp(1, n - 1);
        let (d0, d1) = (self.domain[i - 1], self.domain[i]);
        let (r0, r1) = (self.range[i - 1], self.range[i]);
        if d1 == d0 {
            return r1;
        }
        let t = (x - d0) / (d1 - d0);
        lerp(r0, r1, t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
