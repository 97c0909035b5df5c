pub mod args;
pub mod evaluate;
pub mod fit_seed;
pub mod render;
