//! Runs the Metropolis-Hastings walk over the reference target, prints run
//! diagnostics, and saves an interactive scatter plot of the retained
//! samples.

use mini_inference::density::GaussianMixture;
use mini_inference::diagnostics::ChainTracker;
use mini_inference::session::{Simulation, StepResult};
use plotly::common::{color::Rgba, Marker, Mode};
use plotly::{Layout, Plot, Scatter};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const STEPS: usize = 5_000;
    const SEED: u64 = 42;

    let mut sim = Simulation::<f64>::default().set_seed(SEED);
    let mut tracker = ChainTracker::new();

    let results = sim.run_progress(STEPS)?;
    for result in &results {
        if let StepResult::Mcmc {
            walker, accepted, ..
        } = result
        {
            tracker.observe(*walker, *accepted);
        }
    }

    let stats = tracker.stats();
    println!("Steps: {}", stats.n);
    println!("p(accept) over the last 100 steps: {:.2}", stats.p_accept);
    println!("Walker mean: ({:.1}, {:.1})", stats.mean[0], stats.mean[1]);
    println!(
        "Walker variance: ({:.1}, {:.1})",
        stats.var[0], stats.var[1]
    );

    let samples = sim.sample_trace();
    let xs: Vec<f64> = samples.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = samples.iter().map(|p| p.y).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(xs, ys)
            .mode(Mode::Markers)
            .marker(Marker::new().color(Rgba::new(78, 121, 167, 0.7)).size(6))
            .name("Accepted samples"),
    );
    let target = GaussianMixture::<f64>::default();
    let mode_xs: Vec<f64> = target.components().iter().map(|c| c.mean().x).collect();
    let mode_ys: Vec<f64> = target.components().iter().map(|c| c.mean().y).collect();
    plot.add_trace(
        Scatter::new(mode_xs, mode_ys)
            .mode(Mode::Markers)
            .marker(Marker::new().color(Rgba::new(225, 87, 89, 0.9)).size(12))
            .name("Mode centers"),
    );
    plot.set_layout(
        Layout::new()
            .width(800)
            .height(600)
            .title("Metropolis-Hastings samples over the two-bump target"),
    );
    plot.write_html("mh_walk.html");
    println!("Saved scatter plot to mh_walk.html");
    Ok(())
}
