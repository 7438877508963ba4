//! Demo dataset generation.

pub mod sample;

pub use sample::*;
