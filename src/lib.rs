pub mod approximation;
pub mod cli;
pub mod core;
pub mod errors;
