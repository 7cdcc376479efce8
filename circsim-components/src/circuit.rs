use circsim_common::{Error, Result};

use crate::level::Special;
use crate::transistor::Transistor;
use crate::wire::Wire;

/// ID-indexed container holding every wire and every transistor in a
/// circuit. Wires and transistors are owned by value; every cross-reference
/// elsewhere in the workspace is a bare `u64` ID into this store, never a
/// pointer, the arena that replaces the pointer graph a naive port would
/// otherwise reach for.
///
/// Lookup by ID is O(1) (direct indexing into a dense, ID-sized `Vec`).
/// Lookup by name is O(N) (a linear scan checking primary name then
/// aliases), matching the component design's stated complexity.
#[derive(Debug, Default)]
pub struct CircuitStore {
    wires: Vec<Option<Wire>>,
    transistors: Vec<Option<Transistor>>,
    vcc_id: Option<u64>,
    gnd_id: Option<u64>,
}

impl CircuitStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a wire. Fails with `DuplicateId` if the ID is already
    /// occupied, and with `DuplicateSpecial` if the wire is VCC or GND and
    /// that role is already bound to a different wire.
    pub fn insert_wire(&mut self, wire: Wire) -> Result<()> {
        let id = wire.id();
        if self.get_wire(id).is_ok() {
            return Err(Error::DuplicateId(id));
        }
        self.bind_special(&wire)?;
        if id as usize >= self.wires.len() {
            self.wires.resize_with(id as usize + 1, || None);
        }
        self.wires[id as usize] = Some(wire);
        Ok(())
    }

    /// Inserts a wire, replacing any existing wire at that ID. Special-slot
    /// bookkeeping is re-validated exactly as for `insert_wire`.
    pub fn insert_wire_overwrite(&mut self, wire: Wire) -> Result<()> {
        let id = wire.id();
        if let Ok(existing) = self.get_wire(id) {
            let existing_special = existing.special();
            if existing_special != Special::None {
                self.clear_special(existing_special);
            }
        }
        self.bind_special(&wire)?;
        if id as usize >= self.wires.len() {
            self.wires.resize_with(id as usize + 1, || None);
        }
        self.wires[id as usize] = Some(wire);
        Ok(())
    }

    fn bind_special(&mut self, wire: &Wire) -> Result<()> {
        match wire.special() {
            Special::None => {}
            Special::Vcc => match self.vcc_id {
                Some(existing) if existing != wire.id() => {
                    return Err(Error::DuplicateSpecial {
                        kind: "VCC",
                        existing,
                    })
                }
                _ => self.vcc_id = Some(wire.id()),
            },
            Special::Gnd => match self.gnd_id {
                Some(existing) if existing != wire.id() => {
                    return Err(Error::DuplicateSpecial {
                        kind: "GND",
                        existing,
                    })
                }
                _ => self.gnd_id = Some(wire.id()),
            },
        }
        Ok(())
    }

    fn clear_special(&mut self, special: Special) {
        match special {
            Special::Vcc => self.vcc_id = None,
            Special::Gnd => self.gnd_id = None,
            Special::None => {}
        }
    }

    /// Looks up a wire by ID.
    pub fn get_wire(&self, id: u64) -> Result<&Wire> {
        self.wires
            .get(id as usize)
            .and_then(|slot| slot.as_ref())
            .ok_or_else(|| Error::NotFound(format!("wire id {id}")))
    }

    /// Looks up a wire by ID, mutably.
    pub fn get_wire_mut(&mut self, id: u64) -> Result<&mut Wire> {
        self.wires
            .get_mut(id as usize)
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| Error::NotFound(format!("wire id {id}")))
    }

    /// Finds a wire whose primary name or any alias equals `name`.
    pub fn find_wire_by_name(&self, name: &str) -> Result<&Wire> {
        self.wires
            .iter()
            .filter_map(|slot| slot.as_ref())
            .find(|wire| wire.matches_name(name))
            .ok_or_else(|| Error::NotFound(format!("wire name {name}")))
    }

    /// Inserts a transistor. Fails with `DuplicateId` if the ID is already
    /// occupied.
    pub fn insert_transistor(&mut self, transistor: Transistor) -> Result<()> {
        let id = transistor.id();
        if self.get_transistor(id).is_ok() {
            return Err(Error::DuplicateId(id));
        }
        if id as usize >= self.transistors.len() {
            self.transistors.resize_with(id as usize + 1, || None);
        }
        self.transistors[id as usize] = Some(transistor);
        Ok(())
    }

    /// Looks up a transistor by ID.
    pub fn get_transistor(&self, id: u64) -> Result<&Transistor> {
        self.transistors
            .get(id as usize)
            .and_then(|slot| slot.as_ref())
            .ok_or_else(|| Error::NotFound(format!("transistor id {id}")))
    }

    /// Looks up a transistor by ID, mutably.
    pub fn get_transistor_mut(&mut self, id: u64) -> Result<&mut Transistor> {
        self.transistors
            .get_mut(id as usize)
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| Error::NotFound(format!("transistor id {id}")))
    }

    /// Number of wires currently stored.
    pub fn wire_count(&self) -> usize {
        self.wires.iter().filter(|w| w.is_some()).count()
    }

    /// Number of transistors currently stored.
    pub fn transistor_count(&self) -> usize {
        self.transistors.iter().filter(|t| t.is_some()).count()
    }

    /// The circuit's VCC wire ID, if one has been registered.
    pub fn vcc_id(&self) -> Option<u64> {
        self.vcc_id
    }

    /// The circuit's GND wire ID, if one has been registered.
    pub fn gnd_id(&self) -> Option<u64> {
        self.gnd_id
    }

}
