//! # Rendering Module
//!
//! Plain-text views for the terminal: one level of the grid at a time and
//! side-by-side run metrics.

pub mod ascii;

pub use ascii::*;
