/*!
# Variational gradient ascent

Implements the optimization half of the demonstration: a single isotropic
Gaussian chases the target density by finite-difference gradient ascent on its
mean, while its spread eases toward a confidence-dependent width.

The update is fully deterministic; there is no random number generator here.
Two optimizers built from the same configuration follow identical paths.

The characteristic failure mode is intended behavior: started at the
reference position, the approximation locks onto the dominant bump and never
represents the minor one (mode collapse). The recorded evidence values make
that visible; they plateau once the approximation settles.

## Example Usage

```rust
use mini_inference::config::VariationalConfig;
use mini_inference::density::GaussianMixture;
use mini_inference::variational::VariationalOptimizer;

let mut optimizer = VariationalOptimizer::new(
    GaussianMixture::<f64>::default(),
    VariationalConfig::default(),
);

let mut update = optimizer.step();
for _ in 1..300 {
    update = optimizer.step();
}
assert!(update.converged);
assert!(update.density_at_mean > 0.8);
```
*/

use num_traits::Float;

use crate::config::VariationalConfig;
use crate::density::{Point, TargetDensity};
use crate::trace::Trace;

/// One member of the isotropic Gaussian family the optimizer searches over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian<T> {
    /// Center of the approximation.
    pub mean: Point<T>,
    /// Standard deviation, shared by both coordinates.
    pub spread: T,
}

/// What one optimization step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationalUpdate<T> {
    /// Mean of the approximation after the update.
    pub mean: Point<T>,
    /// Spread of the approximation after the update.
    pub spread: T,
    /// The scaled finite-difference gradient applied this step.
    pub gradient: Point<T>,
    /// Target density at the updated mean.
    pub density_at_mean: T,
    /// Whether the approximation counts as converged after the update.
    pub converged: bool,
}

/// Fits an isotropic [`Gaussian`] to the target by gradient ascent.
///
/// Each step probes the density around the current mean, moves the mean along
/// the scaled finite-difference gradient, eases the spread toward its target
/// width, and records the new state on the optimization and evidence traces.
#[derive(Debug, Clone)]
pub struct VariationalOptimizer<T, D> {
    /// The target density the approximation chases.
    pub target: D,
    state: Gaussian<T>,
    last_gradient: Point<T>,
    path: Trace<Gaussian<T>>,
    evidence: Trace<T>,
    steps: u64,
    config: VariationalConfig<T>,
}

impl<T, D> VariationalOptimizer<T, D>
where
    T: Float,
    D: TargetDensity<T>,
{
    /// Creates an optimizer at the configured start, with an empty path.
    ///
    /// # Panics
    ///
    /// Panics if a spread setting is not positive or the smoothing factor
    /// leaves (0, 1].
    pub fn new(target: D, config: VariationalConfig<T>) -> Self {
        assert!(
            config.initial_spread > T::zero(),
            "Initial spread must be positive."
        );
        assert!(
            config.confident_spread > T::zero() && config.searching_spread > T::zero(),
            "Spread targets must be positive."
        );
        assert!(
            config.spread_smoothing > T::zero() && config.spread_smoothing <= T::one(),
            "Spread smoothing must lie in (0, 1]."
        );
        Self {
            target,
            state: Gaussian {
                mean: config.start,
                spread: config.initial_spread,
            },
            last_gradient: Point::new(T::zero(), T::zero()),
            path: Trace::new(config.trace_capacity),
            evidence: Trace::new(config.evidence_capacity),
            steps: 0,
            config,
        }
    }

    /**
    Performs one gradient-ascent update and reports the new state.

    The gradient comes from two one-sided probes at `gradient_offset` from
    the mean: one along +x, one up-canvas (negative y, since canvas y grows
    downward). Both density deltas are scaled by `learning_rate`. The spread
    eases toward `confident_spread` while the mean sits above
    `confidence_threshold`, toward `searching_spread` otherwise.

    The mean is not clamped to the canvas; under sane settings it can only
    leave transiently while climbing back toward density.
    */
    pub fn step(&mut self) -> VariationalUpdate<T> {
        let m = self.state.mean;
        let h = self.config.gradient_offset;

        let p_center = self.target.density(m);
        let p_right = self.target.density(Point::new(m.x + h, m.y));
        let p_up = self.target.density(Point::new(m.x, m.y - h));
        debug_assert!(
            p_center >= T::zero() && p_right >= T::zero() && p_up >= T::zero(),
            "Target densities must be non-negative."
        );

        let gx = (p_right - p_center) * self.config.learning_rate;
        let gy = (p_up - p_center) * self.config.learning_rate;

        let spread_target = if p_center > self.config.confidence_threshold {
            self.config.confident_spread
        } else {
            self.config.searching_spread
        };
        let spread = self.state.spread
            + (spread_target - self.state.spread) * self.config.spread_smoothing;
        debug_assert!(spread > T::zero(), "Spread stays positive.");

        // The up-canvas probe inverted y, so its gain is applied by moving
        // the mean toward smaller y.
        let mean = Point::new(m.x + gx, m.y - gy);

        self.state = Gaussian { mean, spread };
        self.last_gradient = Point::new(gx, gy);
        self.steps += 1;

        let density_at_mean = self.target.density(mean);
        self.path.push(self.state);
        self.evidence.push(density_at_mean);

        VariationalUpdate {
            mean,
            spread,
            gradient: self.last_gradient,
            density_at_mean,
            converged: self.converged_with(density_at_mean),
        }
    }

    /// Whether the approximation currently counts as converged: the mean
    /// sits above `convergence_density` and the last gradient's norm is
    /// below `convergence_gradient`.
    ///
    /// This is a reporting signal only; it never stops or alters the update.
    pub fn converged(&self) -> bool {
        self.converged_with(self.target.density(self.state.mean))
    }

    fn converged_with(&self, density_at_mean: T) -> bool {
        density_at_mean > self.config.convergence_density
            && self.last_gradient.norm() < self.config.convergence_gradient
    }

    /// The current approximation.
    pub fn approximation(&self) -> Gaussian<T> {
        self.state
    }

    /// The gradient applied by the most recent step. Zero before the first.
    pub fn last_gradient(&self) -> Point<T> {
        self.last_gradient
    }

    /// Optimization states, oldest first. Empty until the first step.
    pub fn path(&self) -> &Trace<Gaussian<T>> {
        &self.path
    }

    /// Densities recorded at the mean after each step, oldest first.
    pub fn evidence(&self) -> &Trace<T> {
        &self.evidence
    }

    /// Steps taken since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The settings the optimizer was built with.
    pub fn config(&self) -> &VariationalConfig<T> {
        &self.config
    }
}
