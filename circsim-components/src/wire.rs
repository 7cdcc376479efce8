use crate::level::{Pull, Special, WireLevel};

/// A single electrical net.
///
/// Carries a current level drawn from the seven-valued lattice, a fixed
/// pull bias, a special marker (VCC/GND/ordinary), a primary name plus
/// aliases, and two adjacency lists populated once at ingest and never
/// mutated by the engine afterward: *control* transistors (ones whose
/// source/drain terminals touch this wire, so traversal may cross through
/// them) and *gate* transistors (ones this wire's level drives).
#[derive(Debug, Clone)]
pub struct Wire {
    id: u64,
    level: WireLevel,
    pull: Pull,
    special: Special,
    primary_name: String,
    aliases: Vec<String>,
    ctrl_transistors: Vec<u64>,
    gate_transistors: Vec<u64>,
}

impl Wire {
    /// Builds a new ordinary (non-special) wire at the birth level,
    /// FLOATING. Never driven.
    pub fn new(id: u64, primary_name: impl Into<String>, pull: Pull) -> Self {
        Self {
            id,
            level: WireLevel::Floating,
            pull,
            special: Special::None,
            primary_name: primary_name.into(),
            aliases: Vec::new(),
            ctrl_transistors: Vec::new(),
            gate_transistors: Vec::new(),
        }
    }

    /// Builds the VCC rail: perpetually HIGH.
    pub fn new_vcc(id: u64, primary_name: impl Into<String>) -> Self {
        let mut wire = Self::new(id, primary_name, Pull::None);
        wire.special = Special::Vcc;
        wire.level = WireLevel::High;
        wire
    }

    /// Builds the GND rail: perpetually GROUNDED.
    pub fn new_gnd(id: u64, primary_name: impl Into<String>) -> Self {
        let mut wire = Self::new(id, primary_name, Pull::None);
        wire.special = Special::Gnd;
        wire.level = WireLevel::Grounded;
        wire
    }

    /// The wire's immutable ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The wire's current level.
    pub fn level(&self) -> WireLevel {
        self.level
    }

    /// Overwrites the wire's level. Special (VCC/GND) wires ignore this;
    /// their level is never rewritten by the engine.
    pub fn set_level(&mut self, level: WireLevel) {
        if self.special == Special::None {
            self.level = level;
        }
    }

    /// The wire's fixed pull bias.
    pub fn pull(&self) -> Pull {
        self.pull
    }

    /// Whether, and which, of VCC/GND this wire is.
    pub fn special(&self) -> Special {
        self.special
    }

    /// The wire's primary name.
    pub fn primary_name(&self) -> &str {
        &self.primary_name
    }

    /// The wire's aliases, in insertion order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// `true` if `name` matches the primary name or any alias.
    pub fn matches_name(&self, name: &str) -> bool {
        self.primary_name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Appends an alias. Duplicates are accepted at write time; readers
    /// (`matches_name`) tolerate them without double-counting.
    pub fn add_alias(&mut self, alias: impl Into<String>) {
        self.aliases.push(alias.into());
    }

    /// The control-transistor adjacency list: transistors whose source or
    /// drain terminal touches this wire.
    pub fn ctrl_transistors(&self) -> &[u64] {
        &self.ctrl_transistors
    }

    /// Registers a control transistor against this wire. Ingest-time only.
    pub fn add_ctrl_transistor(&mut self, transistor_id: u64) {
        self.ctrl_transistors.push(transistor_id);
    }

    /// The gate-transistor adjacency list: transistors whose gate this wire
    /// drives.
    pub fn gate_transistors(&self) -> &[u64] {
        &self.gate_transistors
    }

    /// Registers a gate transistor against this wire. Ingest-time only.
    pub fn add_gate_transistor(&mut self, transistor_id: u64) {
        self.gate_transistors.push(transistor_id);
    }
}
