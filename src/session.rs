/*!
# Simulation session

Ties the two inference engines behind one step/reset/switch contract, the
shape a display layer drives. Exactly one engine is live at a time; switching
methods rebuilds the other engine from scratch, so no trace, counter, or
walker state ever leaks across a switch.

The session owns a [`Scheduler`] for timed playback. Hosts with their own
timing can ignore [`tick`](Simulation::tick) and call
[`step`](Simulation::step) directly; both go through the same engine.

## Example Usage

```rust
use mini_inference::session::{Method, Simulation};

let mut sim = Simulation::<f64>::default().set_seed(42);
sim.run(500);
assert!(sim.sample_trace().len() <= 101);

// Switching methods starts the other engine fresh and pauses playback.
sim.switch_method(Method::Vi);
assert!(sim.sample_trace().is_empty());
assert_eq!(sim.step_count(), 0);
```
*/

use std::error::Error;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use num_traits::Float;
use rand::prelude::*;

use crate::config::SimConfig;
use crate::density::{GaussianMixture, Point, TargetDensity};
use crate::metropolis::MetropolisSampler;
use crate::scheduler::Scheduler;
use crate::variational::{Gaussian, VariationalOptimizer};

/// Which inference strategy the session currently runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Metropolis-Hastings random walk.
    #[default]
    Mcmc,
    /// Variational gradient ascent.
    Vi,
}

/// What one session step did, tagged by the active method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResult<T> {
    /// A random-walk transition.
    Mcmc {
        /// The walker's position after the step.
        walker: Point<T>,
        /// The candidate drawn this step.
        proposal: Point<T>,
        /// Whether the candidate was accepted.
        accepted: bool,
    },
    /// A gradient-ascent update.
    Vi {
        /// Mean of the approximation after the step.
        mean: Point<T>,
        /// Spread of the approximation after the step.
        spread: T,
        /// The scaled gradient applied this step.
        gradient: Point<T>,
        /// Target density at the updated mean.
        density_at_mean: T,
        /// Whether the approximation counts as converged.
        converged: bool,
    },
}

#[derive(Debug, Clone)]
enum Engine<T, D> {
    Mcmc(MetropolisSampler<T, D>),
    Vi(VariationalOptimizer<T, D>),
}

/**
A complete simulation session: one shared target, one live engine, one
scheduler.

The session is single-threaded and cooperative. Every mutation happens inside
a method call on the caller's thread, and each [`step`](Simulation::step) is
an atomic transition: there is no partially applied state to observe, and
pausing can only ever discard steps that have not started.

A stored global seed makes the whole session reproducible:
[`reset`](Simulation::reset) and [`switch_method`](Simulation::switch_method)
rebuild engines from that seed, so a reset session replays exactly the run a
freshly built one would produce.

# Type Parameters
- `T`: The floating-point type (e.g. `f32` or `f64`).
- `D`: The target density, [`GaussianMixture`] unless substituted.

# Examples

```rust
use mini_inference::session::{Simulation, StepResult};

let mut sim = Simulation::<f64>::default().set_seed(42);
match sim.step() {
    StepResult::Mcmc { walker, .. } => assert!(walker.x >= 0.0),
    StepResult::Vi { .. } => panic!("A new session starts with MCMC."),
}
```
*/
#[derive(Debug, Clone)]
pub struct Simulation<T, D = GaussianMixture<T>> {
    /// The posterior stand-in both methods approximate.
    pub target: D,
    /// The global random seed.
    pub seed: u64,
    engine: Engine<T, D>,
    scheduler: Scheduler,
    config: SimConfig<T>,
    method: Method,
}

impl<T, D> Simulation<T, D>
where
    T: Float,
    D: TargetDensity<T> + Clone,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /// Creates a session running MCMC, seeded from entropy.
    pub fn new(target: D, config: SimConfig<T>) -> Self {
        let seed = thread_rng().gen::<u64>();
        let engine = Engine::Mcmc(
            MetropolisSampler::new(target.clone(), config.canvas, config.metropolis)
                .set_seed(seed),
        );
        Self {
            target,
            seed,
            engine,
            scheduler: Scheduler::new(config.tick_period),
            config,
            method: Method::Mcmc,
        }
    }

    /// Sets a new global seed and rebuilds the active engine from it, so the
    /// seed applies from the first step.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.engine = self.build_engine(self.method);
        self
    }

    fn build_engine(&self, method: Method) -> Engine<T, D> {
        match method {
            Method::Mcmc => Engine::Mcmc(
                MetropolisSampler::new(
                    self.target.clone(),
                    self.config.canvas,
                    self.config.metropolis,
                )
                .set_seed(self.seed),
            ),
            Method::Vi => Engine::Vi(VariationalOptimizer::new(
                self.target.clone(),
                self.config.variational,
            )),
        }
    }

    /// Advances the active method by exactly one transition.
    pub fn step(&mut self) -> StepResult<T> {
        match &mut self.engine {
            Engine::Mcmc(sampler) => {
                let outcome = sampler.step();
                StepResult::Mcmc {
                    walker: sampler.position(),
                    proposal: outcome.proposed,
                    accepted: outcome.accepted,
                }
            }
            Engine::Vi(optimizer) => {
                let update = optimizer.step();
                StepResult::Vi {
                    mean: update.mean,
                    spread: update.spread,
                    gradient: update.gradient,
                    density_at_mean: update.density_at_mean,
                    converged: update.converged,
                }
            }
        }
    }

    /// Returns the active method to its starting state.
    ///
    /// Traces and counters clear, and the randomness rewinds to the stored
    /// seed, so a reset session replays a fresh one exactly. Resetting twice
    /// is the same as resetting once.
    pub fn reset(&mut self) {
        self.engine = self.build_engine(self.method);
    }

    /// Swaps the active method, discarding the current engine's state
    /// entirely and pausing playback.
    ///
    /// Switching to the method already active is an explicit
    /// reset-and-pause.
    pub fn switch_method(&mut self, method: Method) {
        self.method = method;
        self.engine = self.build_engine(method);
        self.scheduler.set_playing(false);
    }

    /// Starts or stops timed playback. See [`Scheduler::set_playing`].
    pub fn set_playing(&mut self, playing: bool) {
        self.scheduler.set_playing(playing);
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    /// Runs every step due at `now`, returning their results oldest first.
    ///
    /// Returns an empty vector while paused, and on the arming poll right
    /// after a resume.
    pub fn tick(&mut self, now: Instant) -> Vec<StepResult<T>> {
        let due = self.scheduler.poll(now);
        (0..due).map(|_| self.step()).collect()
    }

    /// Advances `n_steps` transitions, returning each result in order.
    pub fn run(&mut self, n_steps: usize) -> Vec<StepResult<T>> {
        (0..n_steps).map(|_| self.step()).collect()
    }

    /// Like [`run`](Self::run), displaying an `indicatif` progress bar that
    /// reports the acceptance rate (MCMC) or the density at the mean (VI).
    pub fn run_progress(
        &mut self,
        n_steps: usize,
    ) -> Result<Vec<StepResult<T>>, Box<dyn Error>> {
        let pb = ProgressBar::new(n_steps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:8} {bar:40.white} ETA {eta:3} | {msg}")?
                .progress_chars("=>-"),
        );
        pb.set_prefix(match self.method {
            Method::Mcmc => "MCMC",
            Method::Vi => "VI",
        });

        let mut out = Vec::with_capacity(n_steps);
        for i in 0..n_steps {
            out.push(self.step());
            pb.inc(1);
            if i % 100 == 0 || i + 1 == n_steps {
                match &self.engine {
                    Engine::Mcmc(sampler) => {
                        pb.set_message(format!("p(accept)≈{:.2}", sampler.acceptance_rate()))
                    }
                    Engine::Vi(optimizer) => {
                        let at_mean = optimizer
                            .evidence()
                            .latest()
                            .and_then(|d| d.to_f64())
                            .unwrap_or(f64::NAN);
                        pb.set_message(format!("p(mean)≈{at_mean:.3}"))
                    }
                }
            }
        }
        pb.finish_with_message("Done!");
        Ok(out)
    }

    /// Accepted MCMC samples, oldest first. Empty while VI is active.
    pub fn sample_trace(&self) -> Vec<Point<T>> {
        match &self.engine {
            Engine::Mcmc(sampler) => sampler.trace().iter().copied().collect(),
            Engine::Vi(_) => Vec::new(),
        }
    }

    /// VI optimization states, oldest first. Empty while MCMC is active.
    pub fn optimization_trace(&self) -> Vec<Gaussian<T>> {
        match &self.engine {
            Engine::Mcmc(_) => Vec::new(),
            Engine::Vi(optimizer) => optimizer.path().iter().copied().collect(),
        }
    }

    /// Densities at the VI mean after each step, oldest first. Empty while
    /// MCMC is active.
    pub fn evidence_trace(&self) -> Vec<T> {
        match &self.engine {
            Engine::Mcmc(_) => Vec::new(),
            Engine::Vi(optimizer) => optimizer.evidence().iter().copied().collect(),
        }
    }

    /// The walker's position, while MCMC is active.
    pub fn walker(&self) -> Option<Point<T>> {
        match &self.engine {
            Engine::Mcmc(sampler) => Some(sampler.position()),
            Engine::Vi(_) => None,
        }
    }

    /// The current approximation, while VI is active.
    pub fn approximation(&self) -> Option<Gaussian<T>> {
        match &self.engine {
            Engine::Mcmc(_) => None,
            Engine::Vi(optimizer) => Some(optimizer.approximation()),
        }
    }

    /// Whether the active method reports convergence. Always false for
    /// MCMC: the walk never finishes, it only keeps sampling.
    pub fn converged(&self) -> bool {
        match &self.engine {
            Engine::Mcmc(_) => false,
            Engine::Vi(optimizer) => optimizer.converged(),
        }
    }

    /// Steps taken since construction, the last reset, or the last switch.
    pub fn step_count(&self) -> u64 {
        match &self.engine {
            Engine::Mcmc(sampler) => sampler.steps(),
            Engine::Vi(optimizer) => optimizer.steps(),
        }
    }

    /// Accepted MCMC steps. Zero while VI is active.
    pub fn accepted_count(&self) -> u64 {
        match &self.engine {
            Engine::Mcmc(sampler) => sampler.accepted(),
            Engine::Vi(_) => 0,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Borrows the MCMC engine, while active.
    pub fn mcmc(&self) -> Option<&MetropolisSampler<T, D>> {
        match &self.engine {
            Engine::Mcmc(sampler) => Some(sampler),
            Engine::Vi(_) => None,
        }
    }

    /// Borrows the VI engine, while active.
    pub fn vi(&self) -> Option<&VariationalOptimizer<T, D>> {
        match &self.engine {
            Engine::Mcmc(_) => None,
            Engine::Vi(optimizer) => Some(optimizer),
        }
    }

    /// The settings the session was built with.
    pub fn config(&self) -> &SimConfig<T> {
        &self.config
    }
}

impl<T> Default for Simulation<T, GaussianMixture<T>>
where
    T: Float,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /// A session over the reference two-bump target with default settings.
    fn default() -> Self {
        Self::new(GaussianMixture::default(), SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Simulation<f64> {
        Simulation::default().set_seed(42)
    }

    #[test]
    fn a_new_session_runs_mcmc() {
        let sim = seeded();
        assert_eq!(sim.method(), Method::Mcmc);
        assert_eq!(sim.walker(), Some(Point::new(200.0, 150.0)));
        assert!(sim.approximation().is_none());
        assert!(sim.mcmc().is_some());
        assert!(sim.vi().is_none());
        assert!(!sim.is_playing());
    }

    #[test]
    fn inactive_engine_accessors_are_empty() {
        let mut sim = seeded();
        sim.run(50);
        assert!(sim.optimization_trace().is_empty());
        assert!(sim.evidence_trace().is_empty());
        assert!(sim.accepted_count() > 0);

        sim.switch_method(Method::Vi);
        sim.run(50);
        assert!(sim.sample_trace().is_empty());
        assert_eq!(sim.accepted_count(), 0);
        assert!(sim.walker().is_none());
        assert!(sim.approximation().is_some());
    }

    #[test]
    fn switching_to_the_same_method_resets() {
        let mut sim = seeded();
        sim.run(100);
        sim.set_playing(true);
        sim.switch_method(Method::Mcmc);
        assert_eq!(sim.step_count(), 0);
        assert!(sim.sample_trace().is_empty());
        assert!(!sim.is_playing());
    }

    #[test]
    fn step_results_carry_the_active_method() {
        let mut sim = seeded();
        assert!(matches!(sim.step(), StepResult::Mcmc { .. }));
        sim.switch_method(Method::Vi);
        assert!(matches!(sim.step(), StepResult::Vi { .. }));
    }
}
