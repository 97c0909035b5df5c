pub mod approximator;
pub mod least_squares;
pub mod precision;
pub mod refinement;
pub mod seed;
