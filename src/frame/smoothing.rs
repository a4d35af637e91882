//! Sliding-window rank smoothing.
//!
//! Each entity keeps a queue of its most recent integer ranks; the mean of the
//! queue is its continuous vertical position. The window is stateful and
//! assumes one call per sample at a fixed density with non-decreasing time.

use std::collections::VecDeque;

use crate::foundation::math::mean;

/// Per-entity fixed-capacity rank history.
#[derive(Clone, Debug)]
pub(crate) struct RankSmoother {
    histories: Vec<VecDeque<usize>>,
    capacity: usize,
    sentinel: usize,
}

impl RankSmoother {
    /// `sentinel` marks "off-chart / no data"; it equals the visible item count.
    pub(crate) fn new(entities: usize, capacity: usize, sentinel: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            histories: (0..entities)
                .map(|_| VecDeque::with_capacity(capacity + 2))
                .collect(),
            capacity,
            sentinel,
        }
    }

    /// Warm the window with look-back samples, oldest first, without sliding.
    pub(crate) fn prime<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = Vec<Option<usize>>>,
    {
        for ranks in samples {
            for (h, r) in self.histories.iter_mut().zip(ranks) {
                h.push_back(r.unwrap_or(self.sentinel));
            }
        }
    }

    /// Slide every window by one sample and return the smoothed ranks.
    ///
    /// `None` records the sentinel. Per entity: push the sample; if the queue
    /// has just reached capacity push one extra sentinel; then drop the oldest.
    pub(crate) fn advance(&mut self, ranks: &[Option<usize>]) -> Vec<f64> {
        debug_assert_eq!(ranks.len(), self.histories.len());
        for (h, r) in self.histories.iter_mut().zip(ranks) {
            h.push_back(r.unwrap_or(self.sentinel));
            if h.len() == self.capacity {
                h.push_back(self.sentinel);
            }
            h.pop_front();
        }
        self.smoothed()
    }

    /// Mean of each entity's current window.
    pub(crate) fn smoothed(&self) -> Vec<f64> {
        self.histories
            .iter()
            .map(|h| mean(h.iter().map(|&r| r as f64)))
            .collect()
    }

    pub(crate) fn history(&self, idx: usize) -> Option<&VecDeque<usize>> {
        self.histories.get(idx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/smoothing.rs"]
mod tests;
