pub mod file_io;
pub mod plot;
pub mod stopwatch;
