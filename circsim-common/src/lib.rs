//! Error taxonomy shared by every crate in this workspace.
//!
//! Everything that can go wrong while building or driving a circuit: a
//! malformed adjacency list, a lookup miss, a register write that overflows
//! its width, a blown iteration budget. All of it surfaces as one
//! [`Error`] variant.
//! Nothing here is swallowed silently; see each variant's doc comment for
//! whether it's recoverable at the call site or fatal to the session.

#![deny(missing_docs)]

mod error;

pub use error::{Error, Id, Result};
