use crate::level::WireLevel;

/// A transistor's channel polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Conducts when its gate wire is *high*.
    Nmos,
    /// Conducts when its gate wire is *low*.
    Pmos,
}

/// A three-terminal switch: fixed polarity and fixed gate/source/drain wire
/// IDs, with a current conduction state and a sticky initialized flag used
/// to suppress redundant first-pass work in the drain algorithm.
#[derive(Debug, Clone)]
pub struct Transistor {
    id: u64,
    polarity: Polarity,
    gate: u64,
    source: u64,
    drain: u64,
    conducting: bool,
    initialized: bool,
}

impl Transistor {
    /// Builds a transistor, initially OFF and uninitialized.
    pub fn new(id: u64, polarity: Polarity, gate: u64, source: u64, drain: u64) -> Self {
        Self {
            id,
            polarity,
            gate,
            source,
            drain,
            conducting: false,
            initialized: false,
        }
    }

    /// The transistor's immutable ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The transistor's fixed polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// The gate wire ID.
    pub fn gate(&self) -> u64 {
        self.gate
    }

    /// The source wire ID.
    pub fn source(&self) -> u64 {
        self.source
    }

    /// The drain wire ID.
    pub fn drain(&self) -> u64 {
        self.drain
    }

    /// Returns `id`'s counterpart terminal (source ↔ drain) for wire-group
    /// traversal. `None` if `id` is neither terminal; the caller treats
    /// that as the malformed-adjacency structural error.
    pub fn other_terminal(&self, id: u64) -> Option<u64> {
        if id == self.source {
            Some(self.drain)
        } else if id == self.drain {
            Some(self.source)
        } else {
            None
        }
    }

    /// The transistor's current conduction state.
    pub fn is_conducting(&self) -> bool {
        self.conducting
    }

    /// `true` once the transistor has been evaluated at least once; sticky.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Recomputes conduction from the gate wire's resolved level: ON when
    /// (NMOS ∧ gate is *high*) or (PMOS ∧ gate is *low*). Marks the
    /// transistor initialized and returns whether conduction changed.
    pub fn update_conduction(&mut self, gate_level: WireLevel) -> bool {
        let new_state = match self.polarity {
            Polarity::Nmos => gate_level.is_high(),
            Polarity::Pmos => gate_level.is_low(),
        };
        let changed = new_state != self.conducting;
        self.conducting = new_state;
        self.initialized = true;
        changed
    }
}
