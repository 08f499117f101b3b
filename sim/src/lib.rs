// Driver for Ising Metropolis simulations: configuration, run loop, beta sweep and CSV output

pub mod app;
pub mod config;
pub mod io;
