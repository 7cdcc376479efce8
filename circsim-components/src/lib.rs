//! The static pieces of a circuit: wires, transistors, the store that owns
//! them by ID, and the register abstraction that projects a wire list onto
//! an integer.
//!
//! Nothing in this crate drives propagation. That's `circsim-sim`. This
//! crate only answers "what do I currently hold" and "how do I change what
//! I hold," leaving "what happens next" to the engine.

#![deny(missing_docs)]

mod circuit;
mod level;
mod register;
mod transistor;
mod wire;

pub use circuit::CircuitStore;
pub use level::{float_collapse, LevelAccumulator, Pull, Special, WireLevel};
pub use register::Register;
pub use transistor::{Polarity, Transistor};
pub use wire::Wire;
