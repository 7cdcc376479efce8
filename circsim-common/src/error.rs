/// A wire or transistor identifier, for error messages.
pub type Id = u64;

/// Every way a circuit operation can fail.
///
/// Each variant maps to a kind from the engine's error taxonomy rather than
/// to a specific type in some other implementation; callers should match on
/// variant, not on the formatted message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed external input: a netlist record or API argument shape
    /// that doesn't match what the operation expects.
    #[error("format error: {0}")]
    FormatError(String),

    /// A lookup by ID or name found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Insert attempted with an ID already present in the store.
    #[error("duplicate id: {0}")]
    DuplicateId(Id),

    /// A second VCC (or GND) wire was registered on the same store.
    #[error("duplicate special wire: {kind} already bound to wire {existing}")]
    DuplicateSpecial {
        /// Which special kind ("VCC" or "GND") was being re-registered.
        kind: &'static str,
        /// The wire ID already holding that role.
        existing: Id,
    },

    /// Transistor adjacency is inconsistent with the wire it's listed
    /// against during wire-group traversal.
    #[error("structural error: {0}")]
    StructuralError(String),

    /// A register read or write does not fit the requested integer width.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// The engine's iteration budget was exhausted before the FIFO drained.
    #[error("iteration limit exceeded: {budget} iterations")]
    IterationLimitExceeded {
        /// The budget that was exhausted.
        budget: usize,
    },

    /// A register operation was attempted with no circuit store bound.
    #[error("uninitialized component: {0}")]
    UninitializedComponent(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// `true` for error kinds considered fatal to the simulation session
    /// (the caller is expected to abort rather than retry).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::StructuralError(_) | Error::IterationLimitExceeded { .. }
        )
    }
}
