//! The event-driven propagation engine.
//!
//! [`WireGroup`] is the single-use transitive-closure-plus-resolution
//! structure the engine builds each time a wire needs re-evaluating;
//! [`Simulator`] is the FIFO-driven fixed-point driver built on top of it.

#![deny(missing_docs)]

mod engine;
mod wire_group;

pub use engine::{Simulator, DEFAULT_ITERATION_BUDGET};
pub use wire_group::WireGroup;
