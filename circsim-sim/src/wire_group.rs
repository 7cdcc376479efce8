use std::collections::{BTreeSet, VecDeque};

use circsim_common::{Error, Result};
use circsim_components::{float_collapse, CircuitStore, LevelAccumulator, Special, WireLevel};

/// The transitive closure of wires joined by currently-conducting
/// transistors, together with the single level the group resolves to.
///
/// Ephemeral and single-use by design: built fresh from a seed wire each
/// time the engine needs one, never retained across a mutating call on the
/// store.
#[derive(Debug)]
pub struct WireGroup {
    members: BTreeSet<u64>,
    resolved_level: WireLevel,
}

impl WireGroup {
    /// Builds the wire group transitively reachable from `seed` through
    /// currently-ON control transistors, then resolves it to a single
    /// level per the component design's priority-arbitration rule.
    ///
    /// Fails with `StructuralError` if a transistor listed as control of
    /// some visited wire doesn't actually have that wire as its source or
    /// drain.
    pub fn build(seed: u64, store: &CircuitStore) -> Result<Self> {
        let members = Self::traverse(seed, store)?;
        let resolved_level = Self::resolve(&members, store);
        Ok(Self {
            members,
            resolved_level,
        })
    }

    fn traverse(seed: u64, store: &CircuitStore) -> Result<BTreeSet<u64>> {
        let mut visited = BTreeSet::new();
        visited.insert(seed);
        let mut queue = VecDeque::new();
        queue.push_back(seed);

        while let Some(w) = queue.pop_front() {
            let wire = store.get_wire(w)?;
            for &transistor_id in wire.ctrl_transistors() {
                let transistor = store.get_transistor(transistor_id)?;
                if !transistor.is_conducting() {
                    continue;
                }
                let other = transistor.other_terminal(w).ok_or_else(|| {
                    Error::StructuralError(format!(
                        "transistor {transistor_id} listed as control of wire {w} but neither terminal matches"
                    ))
                })?;
                if visited.insert(other) {
                    queue.push_back(other);
                }
            }
        }
        Ok(visited)
    }

    fn resolve(members: &BTreeSet<u64>, store: &CircuitStore) -> WireLevel {
        for &id in members {
            if let Ok(wire) = store.get_wire(id) {
                if wire.special() == Special::Gnd {
                    return WireLevel::Grounded;
                }
            }
        }

        let mut accumulator = LevelAccumulator::new();
        for &id in members {
            let Ok(wire) = store.get_wire(id) else {
                continue;
            };
            let level = if wire.special() == Special::Vcc {
                WireLevel::High
            } else {
                float_collapse(wire.level(), wire.pull())
            };
            accumulator.accumulate(level);
        }
        accumulator.resolve().unwrap_or(WireLevel::Floating)
    }

    /// The wire IDs belonging to this group.
    pub fn members(&self) -> impl Iterator<Item = u64> + '_ {
        self.members.iter().copied()
    }

    /// The single level this group resolved to.
    pub fn resolved_level(&self) -> WireLevel {
        self.resolved_level
    }

    /// Writes the resolved level back to every member wire (VCC/GND wires
    /// are skipped; their level is never rewritten), applying the
    /// write-back promotion rule: a GROUNDED/HIGH resolution is written as
    /// PULLED_LOW/PULLED_HIGH on any wire that carries a pull, and verbatim
    /// otherwise.
    pub fn write_back(&self, store: &mut CircuitStore) -> Result<()> {
        for &id in &self.members {
            let wire = store.get_wire_mut(id)?;
            if wire.special() != Special::None {
                continue;
            }
            let has_pull = wire.pull() != circsim_components::Pull::None;
            let level = match self.resolved_level {
                WireLevel::Grounded if has_pull => WireLevel::PulledLow,
                WireLevel::High if has_pull => WireLevel::PulledHigh,
                other => other,
            };
            wire.set_level(level);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circsim_components::{Polarity, Pull, Transistor, Wire};

    fn nor_fixture() -> CircuitStore {
        // Two NMOS in parallel: OUT pulled high, pulled low by either input high.
        let mut store = CircuitStore::new();
        store.insert_wire(Wire::new_gnd(0, "gnd")).unwrap();
        store.insert_wire(Wire::new(1, "IN_A", Pull::None)).unwrap();
        store.insert_wire(Wire::new(2, "IN_B", Pull::None)).unwrap();
        let mut out = Wire::new(3, "OUT", Pull::High);
        out.add_ctrl_transistor(0);
        out.add_ctrl_transistor(1);
        store.insert_wire(out).unwrap();
        store
            .insert_transistor(Transistor::new(0, Polarity::Nmos, 1, 3, 0))
            .unwrap();
        store
            .insert_transistor(Transistor::new(1, Polarity::Nmos, 2, 3, 0))
            .unwrap();
        store.get_wire_mut(0).unwrap().add_ctrl_transistor(0);
        store.get_wire_mut(0).unwrap().add_ctrl_transistor(1);
        store
            .get_transistor_mut(0)
            .unwrap()
            .update_conduction(WireLevel::PulledHigh);
        store
            .get_transistor_mut(1)
            .unwrap()
            .update_conduction(WireLevel::PulledLow);
        store
    }

    #[test]
    fn gnd_early_exit_dominates() {
        let store = nor_fixture();
        let group = WireGroup::build(3, &store).unwrap();
        // Only transistor 0 (IN_A high) conducts, joining OUT to GND.
        assert!(group.members().any(|id| id == 0));
        assert_eq!(group.resolved_level(), WireLevel::Grounded);
    }

    #[test]
    fn disconnected_wire_resolves_alone() {
        let mut store = CircuitStore::new();
        store.insert_wire(Wire::new(0, "a", Pull::High)).unwrap();
        let group = WireGroup::build(0, &store).unwrap();
        let mut members: Vec<_> = group.members().collect();
        members.sort();
        assert_eq!(members, vec![0]);
        assert_eq!(group.resolved_level(), WireLevel::PulledHigh);
    }

    #[test]
    fn structural_error_on_bad_adjacency() {
        let mut store = CircuitStore::new();
        store.insert_wire(Wire::new(0, "a", Pull::None)).unwrap();
        let mut a = store.get_wire(0).unwrap().clone();
        a.add_ctrl_transistor(0);
        store.insert_wire_overwrite(a).unwrap();
        // Transistor 0's source/drain point elsewhere, not at wire 0.
        store
            .insert_transistor(Transistor::new(0, Polarity::Nmos, 5, 6, 7))
            .unwrap();
        store
            .get_transistor_mut(0)
            .unwrap()
            .update_conduction(WireLevel::High);
        let err = WireGroup::build(0, &store);
        assert!(matches!(err, Err(Error::StructuralError(_))));
    }

    #[test]
    fn write_back_promotes_to_pulled_variant_when_pull_present() {
        let mut store = nor_fixture();
        let group = WireGroup::build(3, &store).unwrap();
        group.write_back(&mut store).unwrap();
        assert_eq!(store.get_wire(3).unwrap().level(), WireLevel::PulledLow);
    }
}
