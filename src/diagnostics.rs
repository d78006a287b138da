//! Running summaries of a sampling run.

use ndarray::prelude::*;
use num_traits::Float;
use std::collections::VecDeque;

use crate::density::Point;

const ACCEPT_WINDOW: usize = 100;

/// Tracks a walk's acceptance rate and running moments as step results
/// stream in.
///
/// The acceptance rate covers a sliding window of the last 100 steps; the
/// mean and variance cover every observed position. The tracker sits outside
/// the step path, fed by whichever driver consumes the results.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTracker {
    n: u64,
    accept_queue: VecDeque<bool>,
    mean: Array1<f64>,
    mean_sq: Array1<f64>,
}

/// A point-in-time summary of a [`ChainTracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Steps observed so far.
    pub n: u64,
    /// Acceptance rate over the sliding window.
    pub p_accept: f64,
    /// Running mean per coordinate (x, y).
    pub mean: Array1<f64>,
    /// Unbiased sample variance per coordinate (x, y).
    pub var: Array1<f64>,
}

impl ChainTracker {
    pub fn new() -> Self {
        Self {
            n: 0,
            accept_queue: VecDeque::with_capacity(ACCEPT_WINDOW),
            mean: Array1::zeros(2),
            mean_sq: Array1::zeros(2),
        }
    }

    /// Records one step: the walker's position after it and whether the
    /// proposal was accepted.
    pub fn observe<T: Float>(&mut self, position: Point<T>, accepted: bool) {
        self.n += 1;

        if self.accept_queue.len() == ACCEPT_WINDOW {
            self.accept_queue.pop_front();
        }
        self.accept_queue.push_back(accepted);

        let n = self.n as f64;
        let x = arr1(&[
            position.x.to_f64().unwrap_or(f64::NAN),
            position.y.to_f64().unwrap_or(f64::NAN),
        ]);
        self.mean = (self.mean.clone() * (n - 1.0) + x.clone()) / n;
        if self.n == 1 {
            self.mean_sq = x.pow2();
        } else {
            self.mean_sq = (self.mean_sq.clone() * (n - 1.0) + x.pow2()) / n;
        }
    }

    /// Acceptance rate over the sliding window. Zero before the first step.
    pub fn p_accept(&self) -> f64 {
        if self.accept_queue.is_empty() {
            return 0.0;
        }
        let hits = self.accept_queue.iter().filter(|&&a| a).count();
        hits as f64 / self.accept_queue.len() as f64
    }

    /// Unbiased per-coordinate sample variance. Needs two observations to be
    /// meaningful.
    pub fn var(&self) -> Array1<f64> {
        let n = self.n as f64;
        (self.mean_sq.clone() - self.mean.pow2()) * n / (n - 1.0)
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats {
            n: self.n,
            p_accept: self.p_accept(),
            mean: self.mean.clone(),
            var: self.var(),
        }
    }
}

impl Default for ChainTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn running_moments_match_a_direct_computation() {
        let points = [(1.0, 10.0), (2.0, 20.0), (3.0, 30.0), (4.0, 40.0)];
        let mut tracker = ChainTracker::new();
        for (x, y) in points {
            tracker.observe(Point::new(x, y), true);
        }

        let stats = tracker.stats();
        assert_eq!(stats.n, 4);
        assert_abs_diff_eq!(stats.mean, arr1(&[2.5, 25.0]), epsilon = 1e-12);
        // Unbiased variances of 1..4 and 10..40.
        assert_abs_diff_eq!(
            stats.var,
            arr1(&[5.0 / 3.0, 500.0 / 3.0]),
            epsilon = 1e-9
        );
    }

    #[test]
    fn acceptance_window_slides() {
        let mut tracker = ChainTracker::new();
        for _ in 0..100 {
            tracker.observe(Point::new(0.0, 0.0), false);
        }
        assert_abs_diff_eq!(tracker.p_accept(), 0.0, epsilon = 1e-12);

        // 50 accepted steps push half the rejections out of the window.
        for _ in 0..50 {
            tracker.observe(Point::new(0.0, 0.0), true);
        }
        assert_abs_diff_eq!(tracker.p_accept(), 0.5, epsilon = 1e-12);

        for _ in 0..50 {
            tracker.observe(Point::new(0.0, 0.0), true);
        }
        assert_abs_diff_eq!(tracker.p_accept(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn short_runs_use_the_partial_window() {
        let mut tracker = ChainTracker::new();
        tracker.observe(Point::new(0.0, 0.0), true);
        tracker.observe(Point::new(1.0, 1.0), false);
        assert_abs_diff_eq!(tracker.p_accept(), 0.5, epsilon = 1e-12);
    }
}
