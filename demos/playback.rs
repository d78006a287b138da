//! Drives a session in real time for a few seconds, the way a render loop
//! would: poll the clock, run whatever steps are due, sleep a little.

use mini_inference::session::{Method, Simulation};
use std::thread;
use std::time::{Duration, Instant};

fn drive(sim: &mut Simulation<f64>, label: &str, seconds: u64) {
    sim.set_playing(true);
    let start = Instant::now();
    let mut taken = 0;
    while start.elapsed() < Duration::from_secs(seconds) {
        taken += sim.tick(Instant::now()).len();
        thread::sleep(Duration::from_millis(5));
    }
    sim.set_playing(false);
    println!(
        "{label}: {taken} steps in {seconds}s (about {} per second)",
        taken / seconds as usize
    );
}

fn main() {
    let mut sim = Simulation::<f64>::default().set_seed(7);

    drive(&mut sim, "MCMC playback", 2);
    if let Some(walker) = sim.walker() {
        println!("Walker ended at ({:.1}, {:.1})", walker.x, walker.y);
    }
    println!("Retained samples: {}", sim.sample_trace().len());

    // The switch pauses playback on its own.
    sim.switch_method(Method::Vi);
    assert!(!sim.is_playing());

    drive(&mut sim, "VI playback", 2);
    if let Some(fit) = sim.approximation() {
        println!(
            "Approximation ended at ({:.1}, {:.1}) with spread {:.1}",
            fit.mean.x, fit.mean.y, fit.spread
        );
    }
    println!("Converged: {}", sim.converged());
}
