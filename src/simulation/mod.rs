//! # Simulation Module
//!
//! Time-stepped consumers of a finished search: replaying its exploration
//! trace onto a grid and driving a vehicle along the path it found.
//!
//! Both are plain state machines advanced by the caller, one step per tick.

pub mod replay;
pub mod vehicle;

pub use replay::*;
pub use vehicle::*;
