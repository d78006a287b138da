/*!
# Metropolis-Hastings random walk

Implements the sampling half of the demonstration: a random walk over the
canvas whose accepted positions are, in the long run, distributed like the
target density. The walk never converges in the optimization sense; it keeps
producing samples and the recent ones approximate the posterior.

## Overview

- **Proposal**: independent uniform offsets in a square box of side
  `step_size` centered on the walker, x first, then y.
- **Boundary**: a proposal off the canvas is rejected outright, with no
  density evaluation and no acceptance draw. The draw order is part of the
  reproducibility contract, so seeded runs replay exactly.
- **Acceptance**: `min(1, density(proposed) / (density(current) + epsilon))`,
  accepted when a uniform draw falls strictly below it. The `epsilon` guard
  keeps the ratio finite when the walker sits in a region of vanishing
  density, at the cost of a slight downward bias there.
- **Reproducibility**: `set_seed` rewinds the walk onto a known random
  stream; two samplers with the same seed step identically.

## Example Usage

```rust
use mini_inference::config::{Canvas, MetropolisConfig};
use mini_inference::density::GaussianMixture;
use mini_inference::metropolis::MetropolisSampler;

let mut sampler = MetropolisSampler::new(
    GaussianMixture::<f64>::default(),
    Canvas::default(),
    MetropolisConfig::default(),
)
.set_seed(42);

for _ in 0..200 {
    sampler.step();
}

// The trace holds accepted positions only, newest last.
assert_eq!(sampler.trace().len() as u64, sampler.accepted().min(101));
```
*/

use num_traits::Float;
use rand::prelude::*;

use crate::config::{Canvas, MetropolisConfig};
use crate::density::{Point, TargetDensity};
use crate::trace::Trace;

/// What one step did: where it proposed and whether the walker moved there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProposalOutcome<T> {
    /// The candidate position drawn this step. May lie off the canvas.
    pub proposed: Point<T>,
    /// True if the walker moved to `proposed`.
    pub accepted: bool,
}

/**
A Metropolis-Hastings sampler over a bounded 2D canvas.

The sampler owns its target, its random stream, and a bounded trace of
accepted samples. Every step is a complete propose/accept transition;
rejected steps leave the walker and the trace untouched.

# Type Parameters
- `T`: The floating-point type (e.g. `f32` or `f64`).
- `D`: The target density type. Must implement [`TargetDensity`].

# Examples

```rust
use mini_inference::config::{Canvas, MetropolisConfig};
use mini_inference::density::GaussianMixture;
use mini_inference::metropolis::MetropolisSampler;

let sampler = MetropolisSampler::new(
    GaussianMixture::<f64>::default(),
    Canvas::default(),
    MetropolisConfig::default(),
);
assert_eq!(sampler.steps(), 0);
```
*/
#[derive(Debug, Clone)]
pub struct MetropolisSampler<T, D> {
    /// The target density the walk explores.
    pub target: D,
    /// The random seed.
    pub seed: u64,
    position: Point<T>,
    trace: Trace<Point<T>>,
    steps: u64,
    accepted: u64,
    rng: SmallRng,
    canvas: Canvas<T>,
    config: MetropolisConfig<T>,
}

impl<T, D> MetropolisSampler<T, D>
where
    T: Float,
    D: TargetDensity<T>,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /**
    Creates a sampler at the configured start position, seeded from entropy.

    # Panics

    Panics if the start position lies off the canvas, or if `step_size` or
    `epsilon` is not positive.

    # Examples

    ```rust
    use mini_inference::config::{Canvas, MetropolisConfig};
    use mini_inference::density::GaussianMixture;
    use mini_inference::metropolis::MetropolisSampler;

    let sampler = MetropolisSampler::new(
        GaussianMixture::<f64>::default(),
        Canvas::default(),
        MetropolisConfig::default(),
    );
    assert!(Canvas::default().contains(sampler.position()));
    ```
    */
    pub fn new(target: D, canvas: Canvas<T>, config: MetropolisConfig<T>) -> Self {
        assert!(
            canvas.contains(config.start),
            "Start position must lie on the canvas."
        );
        assert!(
            config.step_size > T::zero(),
            "Step size must be positive."
        );
        assert!(config.epsilon > T::zero(), "Epsilon must be positive.");
        let seed = thread_rng().gen::<u64>();
        Self {
            target,
            seed,
            position: config.start,
            trace: Trace::new(config.trace_capacity),
            steps: 0,
            accepted: 0,
            rng: SmallRng::seed_from_u64(seed),
            canvas,
            config,
        }
    }

    /// Sets a new random seed, rewinding the walk onto a known stream.
    ///
    /// Position, trace, and counters keep their current values; only the
    /// randomness changes.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /**
    Performs one propose/accept transition and reports what happened.

    Two uniform draws produce the proposal offsets (x first, then y). If the
    candidate leaves the canvas it is rejected before any density work and
    before the acceptance draw. Otherwise a third uniform draw `u` accepts
    the candidate iff `u < acceptance_ratio(current, proposed)`; a draw
    exactly at the ratio rejects.

    Accepted candidates become the walker's position and are pushed onto the
    trace. Rejected steps change neither.

    # Examples

    ```rust
    use mini_inference::config::{Canvas, MetropolisConfig};
    use mini_inference::density::GaussianMixture;
    use mini_inference::metropolis::MetropolisSampler;

    let mut sampler = MetropolisSampler::new(
        GaussianMixture::<f64>::default(),
        Canvas::default(),
        MetropolisConfig::default(),
    )
    .set_seed(7);

    let outcome = sampler.step();
    assert_eq!(sampler.steps(), 1);
    if outcome.accepted {
        assert_eq!(sampler.position(), outcome.proposed);
    }
    ```
    */
    pub fn step(&mut self) -> ProposalOutcome<T> {
        let half = T::from(0.5).unwrap();
        let dx = (self.rng.gen::<T>() - half) * self.config.step_size;
        let dy = (self.rng.gen::<T>() - half) * self.config.step_size;
        let proposed = Point::new(self.position.x + dx, self.position.y + dy);

        self.steps += 1;

        if !self.canvas.contains(proposed) {
            return ProposalOutcome {
                proposed,
                accepted: false,
            };
        }

        let alpha = self.acceptance_ratio(self.position, proposed);
        let u: T = self.rng.gen();
        let accepted = accept_draw(u, alpha);
        if accepted {
            self.position = proposed;
            self.trace.push(proposed);
            self.accepted += 1;
        }
        ProposalOutcome { proposed, accepted }
    }

    /// The probability of moving `from` -> `to`, before the uniform draw:
    /// `min(1, density(to) / (density(from) + epsilon))`.
    ///
    /// Uphill moves saturate at one; downhill moves keep the ratio, slightly
    /// shrunk by the `epsilon` guard in the denominator.
    pub fn acceptance_ratio(&self, from: Point<T>, to: Point<T>) -> T {
        let p_from = self.target.density(from);
        let p_to = self.target.density(to);
        debug_assert!(
            p_from >= T::zero() && p_to >= T::zero(),
            "Target densities must be non-negative."
        );
        (p_to / (p_from + self.config.epsilon)).min(T::one())
    }

    /// The walker's current position. Always on the canvas.
    pub fn position(&self) -> Point<T> {
        self.position
    }

    /// Accepted samples, oldest first, capped at the configured capacity.
    pub fn trace(&self) -> &Trace<Point<T>> {
        &self.trace
    }

    /// Steps taken since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Steps that moved the walker since construction.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Fraction of steps accepted so far. Zero before the first step.
    pub fn acceptance_rate(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.steps as f64
    }

    /// The canvas the walk is confined to.
    pub fn canvas(&self) -> Canvas<T> {
        self.canvas
    }

    /// The settings the sampler was built with.
    pub fn config(&self) -> &MetropolisConfig<T> {
        &self.config
    }
}

/// Strict inequality: a draw exactly at `alpha` rejects.
fn accept_draw<T: Float>(u: T, alpha: T) -> bool {
    u < alpha
}
