pub mod config;
pub mod density;
pub mod diagnostics;
pub mod metropolis;
pub mod scheduler;
pub mod session;
pub mod trace;
pub mod variational;
