//! Construction-time settings for the engines and the session driver.
//!
//! Every knob is fixed when an engine is built; nothing here changes while a
//! run is in flight. The `Default` impls carry the reference demonstration
//! values, so `SimConfig::default()` is a complete runnable setup.

use std::time::Duration;

use num_traits::Float;

use crate::density::Point;

/// The rectangular domain both engines operate on.
///
/// Coordinates follow screen conventions: the origin is the top-left corner
/// and y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas<T> {
    /// Extent along x.
    pub width: T,
    /// Extent along y.
    pub height: T,
}

impl<T: Float> Canvas<T> {
    /// Whether `p` lies on the canvas. Both edges count as inside.
    pub fn contains(&self, p: Point<T>) -> bool {
        p.x >= T::zero() && p.x <= self.width && p.y >= T::zero() && p.y <= self.height
    }
}

impl<T: Float> Default for Canvas<T> {
    fn default() -> Self {
        Self {
            width: T::from(400.0).unwrap(),
            height: T::from(300.0).unwrap(),
        }
    }
}

/// Settings for the Metropolis-Hastings random walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetropolisConfig<T> {
    /// Side length of the square proposal box centered on the walker.
    pub step_size: T,
    /// Where the walker starts after construction or a reset.
    pub start: Point<T>,
    /// How many accepted samples the trace retains.
    pub trace_capacity: usize,
    /// Guard added to the current density in the acceptance ratio, so a
    /// walker parked at near-zero density cannot divide by zero.
    pub epsilon: T,
}

impl<T: Float> Default for MetropolisConfig<T> {
    fn default() -> Self {
        Self {
            step_size: T::from(40.0).unwrap(),
            start: Point::new(T::from(200.0).unwrap(), T::from(150.0).unwrap()),
            trace_capacity: 101,
            epsilon: T::from(1e-4).unwrap(),
        }
    }
}

/// Settings for the variational gradient-ascent engine.
///
/// The gradient constants are hand-tuned demonstration values, not physics.
/// The finite-difference probes are one-sided (+x, and up-canvas in y); the
/// optimizer's characteristic single-mode collapse depends on them staying
/// that way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationalConfig<T> {
    /// Initial mean of the approximating Gaussian.
    pub start: Point<T>,
    /// Initial spread (standard deviation) of the approximation.
    pub initial_spread: T,
    /// Scales finite-difference density deltas into a mean update.
    pub learning_rate: T,
    /// Probe offset for the finite differences, in canvas units.
    pub gradient_offset: T,
    /// Spread target while the mean sits in high density.
    pub confident_spread: T,
    /// Spread target while the mean is still searching.
    pub searching_spread: T,
    /// Density above which the approximation counts as confident.
    pub confidence_threshold: T,
    /// Per-step easing factor pulling the spread toward its target.
    pub spread_smoothing: T,
    /// Density the mean must exceed for the convergence signal.
    pub convergence_density: T,
    /// Gradient norm the optimizer must drop below for the convergence
    /// signal.
    pub convergence_gradient: T,
    /// How many optimization states the path trace retains.
    pub trace_capacity: usize,
    /// How many evidence values the evidence trace retains.
    pub evidence_capacity: usize,
}

impl<T: Float> Default for VariationalConfig<T> {
    fn default() -> Self {
        Self {
            start: Point::new(T::from(100.0).unwrap(), T::from(220.0).unwrap()),
            initial_spread: T::from(15.0).unwrap(),
            learning_rate: T::from(60.0).unwrap(),
            gradient_offset: T::from(5.0).unwrap(),
            confident_spread: T::from(45.0).unwrap(),
            searching_spread: T::from(15.0).unwrap(),
            confidence_threshold: T::from(0.1).unwrap(),
            spread_smoothing: T::from(0.08).unwrap(),
            convergence_density: T::from(0.8).unwrap(),
            convergence_gradient: T::from(5.0).unwrap(),
            trace_capacity: 51,
            evidence_capacity: 101,
        }
    }
}

/// Everything a [`Simulation`](crate::session::Simulation) needs at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig<T> {
    /// The domain both engines run on.
    pub canvas: Canvas<T>,
    /// Random-walk settings.
    pub metropolis: MetropolisConfig<T>,
    /// Gradient-ascent settings.
    pub variational: VariationalConfig<T>,
    /// Wall-clock period of one playback step.
    pub tick_period: Duration,
}

impl<T: Float> Default for SimConfig<T> {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            metropolis: MetropolisConfig::default(),
            variational: VariationalConfig::default(),
            tick_period: Duration::from_millis(40),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_bounds_are_inclusive() {
        let canvas: Canvas<f64> = Canvas::default();
        assert!(canvas.contains(Point::new(0.0, 0.0)));
        assert!(canvas.contains(Point::new(400.0, 300.0)));
        assert!(canvas.contains(Point::new(200.0, 150.0)));
        assert!(!canvas.contains(Point::new(-0.001, 150.0)));
        assert!(!canvas.contains(Point::new(400.001, 150.0)));
        assert!(!canvas.contains(Point::new(200.0, 300.001)));
    }

    #[test]
    fn defaults_match_the_reference_setup() {
        let config: SimConfig<f64> = SimConfig::default();
        assert_eq!(config.canvas.width, 400.0);
        assert_eq!(config.canvas.height, 300.0);
        assert_eq!(config.metropolis.step_size, 40.0);
        assert_eq!(config.metropolis.start, Point::new(200.0, 150.0));
        assert_eq!(config.metropolis.trace_capacity, 101);
        assert_eq!(config.metropolis.epsilon, 1e-4);
        assert_eq!(config.variational.start, Point::new(100.0, 220.0));
        assert_eq!(config.variational.initial_spread, 15.0);
        assert_eq!(config.variational.learning_rate, 60.0);
        assert_eq!(config.variational.gradient_offset, 5.0);
        assert_eq!(config.variational.confident_spread, 45.0);
        assert_eq!(config.variational.searching_spread, 15.0);
        assert_eq!(config.variational.trace_capacity, 51);
        assert_eq!(config.variational.evidence_capacity, 101);
        assert_eq!(config.tick_period, Duration::from_millis(40));
    }
}
