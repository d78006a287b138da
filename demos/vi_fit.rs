//! Fits the variational approximation to the reference target, prints the
//! final state, and saves the evidence curve. The plateau in the curve is
//! the approximation settling on the dominant mode and ignoring the minor
//! one entirely.

use mini_inference::session::{Method, Simulation, StepResult};
use plotly::common::Mode;
use plotly::{Layout, Plot, Scatter};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const STEPS: usize = 300;

    let mut sim = Simulation::<f64>::default();
    sim.switch_method(Method::Vi);
    let results = sim.run_progress(STEPS)?;

    let fit = sim.approximation().expect("Expected an active VI engine.");
    println!("Mean: ({:.1}, {:.1})", fit.mean.x, fit.mean.y);
    println!("Spread: {:.1}", fit.spread);
    println!("Converged: {}", sim.converged());

    let evidence: Vec<f64> = results
        .iter()
        .filter_map(|result| match result {
            StepResult::Vi {
                density_at_mean, ..
            } => Some(*density_at_mean),
            _ => None,
        })
        .collect();
    let steps: Vec<usize> = (1..=evidence.len()).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(steps, evidence)
            .mode(Mode::Lines)
            .name("Density at the mean"),
    );
    plot.set_layout(
        Layout::new()
            .width(800)
            .height(500)
            .title("Variational fit: evidence over the run"),
    );
    plot.write_html("vi_fit.html");
    println!("Saved evidence curve to vi_fit.html");
    Ok(())
}
