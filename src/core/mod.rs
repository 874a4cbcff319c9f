pub mod aggregate;
pub mod delta;
pub mod error;
pub mod monitor;
pub mod reader;
pub mod sample;
pub mod signal;

#[cfg(test)]
pub mod testing;
