use std::collections::VecDeque;

use circsim_common::{Error, Result};
use circsim_components::{CircuitStore, Register, WireLevel};

use crate::wire_group::WireGroup;

/// Default iteration budget, matching the component design's stated
/// default.
pub const DEFAULT_ITERATION_BUDGET: usize = 2500;

/// The event-driven propagation engine: a circuit store, a FIFO of wires
/// awaiting re-evaluation, an iteration counter, and a budget bounding how
/// many wire groups `run_to_convergence` will build before giving up.
#[derive(Debug)]
pub struct Simulator {
    circuit: Option<CircuitStore>,
    fifo: VecDeque<u64>,
    iteration_count: usize,
    iteration_budget: usize,
}

impl Simulator {
    /// A simulator with no circuit bound yet, at the default budget.
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_ITERATION_BUDGET)
    }

    /// A simulator with no circuit bound yet, at a caller-chosen budget.
    pub fn with_budget(budget: usize) -> Self {
        Self {
            circuit: None,
            fifo: VecDeque::new(),
            iteration_count: 0,
            iteration_budget: budget,
        }
    }

    /// A simulator bound to `store` immediately, at the default budget.
    pub fn new_with_circuit(store: CircuitStore) -> Self {
        let mut sim = Self::new();
        sim.circuit = Some(store);
        sim
    }

    /// The bound circuit store, if any.
    pub fn circuit(&self) -> Option<&CircuitStore> {
        self.circuit.as_ref()
    }

    /// Replaces the bound circuit store, discarding any pending FIFO
    /// entries and resetting the iteration counter (they referred to the
    /// previous circuit's wire IDs).
    pub fn set_circuit(&mut self, store: CircuitStore) {
        self.circuit = Some(store);
        self.reset_fifo();
        self.reset_iteration_count();
    }

    /// The current iteration budget.
    pub fn iteration_budget(&self) -> usize {
        self.iteration_budget
    }

    /// Sets the iteration budget used by future `run_to_convergence` calls.
    pub fn set_iteration_budget(&mut self, n: usize) {
        self.iteration_budget = n;
    }

    /// Resets the iteration counter to zero without touching the FIFO.
    pub fn reset_iteration_count(&mut self) {
        self.iteration_count = 0;
    }

    /// Empties the FIFO without touching the iteration counter.
    pub fn reset_fifo(&mut self) {
        self.fifo.clear();
    }

    /// Enqueues one wire for re-evaluation. If `auto_run`, immediately
    /// drains to convergence.
    pub fn mark_updated(&mut self, id: u64, auto_run: bool) -> Result<()> {
        self.fifo.push_back(id);
        if auto_run {
            self.run_to_convergence()?;
        }
        Ok(())
    }

    /// Enqueues many wires, preserving order. If `auto_run`, immediately
    /// drains to convergence.
    pub fn mark_all_updated(&mut self, ids: &[u64], auto_run: bool) -> Result<()> {
        self.fifo.extend(ids.iter().copied());
        if auto_run {
            self.run_to_convergence()?;
        }
        Ok(())
    }

    /// Writes `level` onto wire `id` and enqueues it. If `auto_run`,
    /// immediately drains to convergence.
    pub fn set_wire(&mut self, id: u64, level: WireLevel, auto_run: bool) -> Result<()> {
        let store = self.circuit_mut()?;
        store.get_wire_mut(id)?.set_level(level);
        self.mark_updated(id, auto_run)
    }

    /// Looks `name` up then behaves as `set_wire`.
    pub fn set_wire_by_name(&mut self, name: &str, level: WireLevel, auto_run: bool) -> Result<()> {
        let store = self.circuit()?;
        let id = store.find_wire_by_name(name)?.id();
        self.set_wire(id, level, auto_run)
    }

    /// Sets every wire in `ids` to the corresponding level in `levels`.
    /// Fails `FormatError` if the lengths don't match.
    pub fn set_all_wires(&mut self, ids: &[u64], levels: &[WireLevel], auto_run: bool) -> Result<()> {
        if ids.len() != levels.len() {
            return Err(Error::FormatError(format!(
                "set_all_wires: {} ids but {} levels",
                ids.len(),
                levels.len()
            )));
        }
        for (&id, &level) in ids.iter().zip(levels.iter()) {
            self.set_wire(id, level, false)?;
        }
        if auto_run {
            self.run_to_convergence()?;
        }
        Ok(())
    }

    /// Writes an unsigned integer through `register` and enqueues its
    /// member wires. If `auto_run`, immediately drains to convergence.
    pub fn set_register_unsigned(
        &mut self,
        register: &Register,
        value: u64,
        auto_run: bool,
    ) -> Result<()> {
        let store = self.circuit_mut()?;
        let written = register.write_unsigned(store, value)?;
        self.mark_all_updated(&written, auto_run)
    }

    /// Writes a signed integer through `register` and enqueues its member
    /// wires. If `auto_run`, immediately drains to convergence.
    pub fn set_register_signed(
        &mut self,
        register: &Register,
        value: i64,
        auto_run: bool,
    ) -> Result<()> {
        let store = self.circuit_mut()?;
        let written = register.write_signed(store, value)?;
        self.mark_all_updated(&written, auto_run)
    }

    /// Processes exactly the next wire on the FIFO. Returns whether the
    /// FIFO is now empty. Does not advance the iteration counter; see
    /// `run_to_convergence` for the budgeted driver.
    pub fn step(&mut self) -> Result<bool> {
        let Some(seed) = self.fifo.pop_front() else {
            return Ok(true);
        };
        self.process_seed(seed)?;
        Ok(self.fifo.is_empty())
    }

    /// Drains the FIFO until empty or the iteration budget is exhausted.
    /// Fails with `IterationLimitExceeded` on exhaustion, leaving the
    /// counter at the budget and the FIFO holding the unprocessed
    /// remainder.
    pub fn run_to_convergence(&mut self) -> Result<()> {
        self.reset_iteration_count();
        while let Some(seed) = self.fifo.pop_front() {
            if self.iteration_count >= self.iteration_budget {
                tracing::warn!(budget = self.iteration_budget, "iteration budget exhausted");
                self.fifo.push_front(seed);
                return Err(Error::IterationLimitExceeded {
                    budget: self.iteration_budget,
                });
            }
            self.process_seed(seed)?;
            self.iteration_count += 1;
        }
        Ok(())
    }

    fn process_seed(&mut self, seed: u64) -> Result<()> {
        // Borrow the `circuit` field directly (not through `circuit_mut`) so
        // the borrow checker sees it as disjoint from `self.fifo`, which
        // this function also mutates while `store` is still live.
        let store = self
            .circuit
            .as_mut()
            .ok_or_else(|| Error::UninitializedComponent("no circuit store bound".to_string()))?;
        let group = WireGroup::build(seed, store)?;
        tracing::debug!(
            seed,
            resolved = ?group.resolved_level(),
            members = group.members().count(),
            "wire group resolved"
        );

        for member in group.members() {
            self.fifo.retain(|&queued| queued != member);
        }

        group.write_back(store)?;

        // Members come out of the `BTreeSet` in sorted ID order already;
        // visit each one's gate-transistor list in its own stored order,
        // matching the deterministic visitation order the engine commits to.
        let gate_transistors: Vec<u64> = group
            .members()
            .filter_map(|id| store.get_wire(id).ok())
            .flat_map(|wire| wire.gate_transistors().iter().copied())
            .collect();

        for transistor_id in gate_transistors {
            let gate_id = store.get_transistor(transistor_id)?.gate();
            let gate_level = store.get_wire(gate_id)?.level();
            let transistor = store.get_transistor_mut(transistor_id)?;
            let was_initialized = transistor.is_initialized();
            let changed = transistor.update_conduction(gate_level);
            if !changed && was_initialized {
                continue;
            }
            let now_conducting = transistor.is_conducting();
            let (source, drain) = (transistor.source(), transistor.drain());
            if now_conducting {
                if !self.fifo.contains(&source) && !self.fifo.contains(&drain) {
                    self.fifo.push_back(source);
                }
            } else {
                if !self.fifo.contains(&source) {
                    self.fifo.push_back(source);
                }
                if !self.fifo.contains(&drain) {
                    self.fifo.push_back(drain);
                }
            }
        }
        Ok(())
    }

    fn circuit_mut(&mut self) -> Result<&mut CircuitStore> {
        self.circuit
            .as_mut()
            .ok_or_else(|| Error::UninitializedComponent("no circuit store bound".to_string()))
    }

    fn circuit(&self) -> Result<&CircuitStore> {
        self.circuit
            .as_ref()
            .ok_or_else(|| Error::UninitializedComponent("no circuit store bound".to_string()))
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circsim_components::{Polarity, Pull, Transistor, Wire};

    fn nor_circuit() -> CircuitStore {
        let mut store = CircuitStore::new();
        store.insert_wire(Wire::new_gnd(0, "gnd")).unwrap();
        store.insert_wire(Wire::new(1, "IN_A", Pull::None)).unwrap();
        store.insert_wire(Wire::new(2, "IN_B", Pull::None)).unwrap();
        let mut out = Wire::new(3, "OUT", Pull::High);
        out.add_ctrl_transistor(0);
        out.add_ctrl_transistor(1);
        store.insert_wire(out).unwrap();
        let mut in_a = store.get_wire(1).unwrap().clone();
        in_a.add_gate_transistor(0);
        store.insert_wire_overwrite(in_a).unwrap();
        let mut in_b = store.get_wire(2).unwrap().clone();
        in_b.add_gate_transistor(1);
        store.insert_wire_overwrite(in_b).unwrap();
        let mut gnd = store.get_wire(0).unwrap().clone();
        gnd.add_ctrl_transistor(0);
        gnd.add_ctrl_transistor(1);
        store.insert_wire_overwrite(gnd).unwrap();

        store
            .insert_transistor(Transistor::new(0, Polarity::Nmos, 1, 3, 0))
            .unwrap();
        store
            .insert_transistor(Transistor::new(1, Polarity::Nmos, 2, 3, 0))
            .unwrap();
        store
    }

    #[test]
    fn nor_gate_truth_table() {
        for (a, b, expect_high) in [
            (WireLevel::PulledLow, WireLevel::PulledLow, true),
            (WireLevel::PulledLow, WireLevel::PulledHigh, false),
            (WireLevel::PulledHigh, WireLevel::PulledLow, false),
            (WireLevel::PulledHigh, WireLevel::PulledHigh, false),
        ] {
            let mut sim = Simulator::new_with_circuit(nor_circuit());
            sim.set_wire(1, a, false).unwrap();
            sim.set_wire(2, b, true).unwrap();
            let out = sim.circuit().unwrap().get_wire(3).unwrap().level();
            assert_eq!(out.is_high(), expect_high, "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn uninitialized_component_without_circuit() {
        let mut sim = Simulator::new();
        let err = sim.set_wire(0, WireLevel::High, true);
        assert!(matches!(err, Err(Error::UninitializedComponent(_))));
    }

    #[test]
    fn budget_exhaustion_reports_iteration_limit() {
        // Ring oscillator: three inverters, each driving the next's gate,
        // wired so none of the NMOS/PMOS legs ever reach a VCC/GND
        // special-early-exit; conduction keeps flipping every pass.
        let mut store = CircuitStore::new();
        store.insert_wire(Wire::new_vcc(0, "vcc")).unwrap();
        store.insert_wire(Wire::new_gnd(1, "gnd")).unwrap();
        for i in 0..3u64 {
            store
                .insert_wire(Wire::new(10 + i, format!("n{i}"), Pull::None))
                .unwrap();
        }
        let node = |i: u64| 10 + (i % 3);
        for i in 0..3u64 {
            let gate = node(i);
            let out = node(i + 1);
            let nmos_id = 2 * i;
            let pmos_id = 2 * i + 1;
            store
                .insert_transistor(Transistor::new(nmos_id, Polarity::Nmos, gate, out, 1))
                .unwrap();
            store
                .insert_transistor(Transistor::new(pmos_id, Polarity::Pmos, gate, out, 0))
                .unwrap();
        }
        for i in 0..3u64 {
            let gate = node(i);
            let out = node(i + 1);
            let nmos_id = 2 * i;
            let pmos_id = 2 * i + 1;
            let mut out_wire = store.get_wire(out).unwrap().clone();
            out_wire.add_ctrl_transistor(nmos_id);
            out_wire.add_ctrl_transistor(pmos_id);
            store.insert_wire_overwrite(out_wire).unwrap();
            let mut gate_wire = store.get_wire(gate).unwrap().clone();
            gate_wire.add_gate_transistor(nmos_id);
            gate_wire.add_gate_transistor(pmos_id);
            store.insert_wire_overwrite(gate_wire).unwrap();
            let mut gnd_wire = store.get_wire(1).unwrap().clone();
            gnd_wire.add_ctrl_transistor(nmos_id);
            store.insert_wire_overwrite(gnd_wire).unwrap();
            let mut vcc_wire = store.get_wire(0).unwrap().clone();
            vcc_wire.add_ctrl_transistor(pmos_id);
            store.insert_wire_overwrite(vcc_wire).unwrap();
        }

        let mut sim = Simulator::with_budget(16);
        sim.set_wire(10, WireLevel::PulledHigh, false).unwrap();
        let result = sim.run_to_convergence();
        assert!(matches!(
            result,
            Err(Error::IterationLimitExceeded { budget: 16 })
        ));
    }
}
