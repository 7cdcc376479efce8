use circsim_common::{Error, Result};

use crate::circuit::CircuitStore;
use crate::level::WireLevel;

/// A named, ordered projection of wire IDs onto a bounded integer: bit 0 is
/// the least significant bit, bit `n-1` the most significant (and, for
/// signed reads/writes, the sign bit under two's complement).
#[derive(Debug, Clone)]
pub struct Register {
    id: u64,
    name: String,
    wire_ids: Vec<u64>,
}

impl Register {
    /// Builds a register over `wire_ids`. Fails with `OutOfRange` if the
    /// list is empty or longer than 64 bits.
    pub fn new(id: u64, name: impl Into<String>, wire_ids: Vec<u64>) -> Result<Self> {
        if wire_ids.is_empty() || wire_ids.len() > 64 {
            return Err(Error::OutOfRange(format!(
                "register width {} outside 1..=64",
                wire_ids.len()
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
            wire_ids,
        })
    }

    /// The register's immutable ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The register's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire IDs this register projects onto, bit 0 first.
    pub fn wire_ids(&self) -> &[u64] {
        &self.wire_ids
    }

    /// Number of bits this register spans.
    pub fn width(&self) -> usize {
        self.wire_ids.len()
    }

    /// Reads the register as an unsigned integer: bit *i* is 1 iff its wire
    /// is *high*. Fails `OutOfRange` if the value would not fit a 64-bit
    /// unsigned integer (possible only when width is 64 and the top bit
    /// would otherwise be part of a strictly narrower caller type; callers
    /// needing a narrower guarantee check the returned value themselves).
    pub fn read_unsigned(&self, store: &CircuitStore) -> Result<u64> {
        let mut value: u64 = 0;
        for (i, &wire_id) in self.wire_ids.iter().enumerate() {
            let wire = store.get_wire(wire_id)?;
            if wire.level().is_high() {
                value |= 1u64 << i;
            }
        }
        Ok(value)
    }

    /// Reads the register as a two's-complement signed integer. Bit 0 is
    /// the least significant bit, bit `n-1` the sign bit. Decoded by
    /// accumulating the raw bit pattern and sign-extending it from width
    /// `n` up to 64 via a shift-left-then-arithmetic-shift-right pair,
    /// which stays overflow-free even at `n == 64` (unlike accumulating
    /// `-(1 << (n-1))` directly, which hits `i64::MIN` for a 64-bit
    /// register).
    pub fn read_signed(&self, store: &CircuitStore) -> Result<i64> {
        let n = self.wire_ids.len();
        let mut raw: u64 = 0;
        for (i, &wire_id) in self.wire_ids.iter().enumerate() {
            let wire = store.get_wire(wire_id)?;
            if wire.level().is_high() {
                raw |= 1u64 << i;
            }
        }
        let shift = 64 - n;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Writes `value` to the register's wires as an unsigned integer: each
    /// bit becomes PULLED_HIGH if set, PULLED_LOW otherwise. Fails
    /// `OutOfRange` if `value` doesn't fit the register's width. Returns
    /// the wire IDs written, in register order, so the caller can hand them
    /// to the engine's FIFO.
    pub fn write_unsigned(&self, store: &mut CircuitStore, value: u64) -> Result<Vec<u64>> {
        let n = self.wire_ids.len();
        let max_value: u64 = if n == 64 { u64::MAX } else { (1u64 << n) - 1 };
        if value > max_value {
            return Err(Error::OutOfRange(format!(
                "value {value} does not fit unsigned width {n}"
            )));
        }
        for (i, &wire_id) in self.wire_ids.iter().enumerate() {
            let level = if value & (1u64 << i) != 0 {
                WireLevel::PulledHigh
            } else {
                WireLevel::PulledLow
            };
            store.get_wire_mut(wire_id)?.set_level(level);
        }
        Ok(self.wire_ids.clone())
    }

    /// Writes `value` to the register's wires as a two's-complement signed
    /// integer. Fails `OutOfRange` if `value` is outside
    /// `[-2^(n-1), 2^(n-1)-1]`. Returns the wire IDs written, in register
    /// order.
    pub fn write_signed(&self, store: &mut CircuitStore, value: i64) -> Result<Vec<u64>> {
        let n = self.wire_ids.len();
        if n < 64 {
            let regmax_unsigned: i64 = 1i64 << (n - 1);
            let regmax = regmax_unsigned - 1;
            let regmin = -regmax_unsigned;
            if value < regmin || value > regmax {
                return Err(Error::OutOfRange(format!(
                    "value {value} does not fit signed width {n}"
                )));
            }
        }
        // n == 64: every i64 value fits, no range check needed.

        let negative = value < 0;
        let magnitude: u64 = if negative {
            value.unsigned_abs()
        } else {
            value as u64
        };

        let mut bits = vec![false; n];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = magnitude & (1u64 << i) != 0;
        }

        if negative {
            for bit in bits.iter_mut() {
                *bit = !*bit;
            }
            let mut carry = true;
            for bit in bits.iter_mut() {
                let (sum, next_carry) = (*bit != carry, *bit && carry);
                *bit = sum;
                carry = next_carry;
                if !carry {
                    break;
                }
            }
        }

        for (i, &wire_id) in self.wire_ids.iter().enumerate() {
            let level = if bits[i] {
                WireLevel::PulledHigh
            } else {
                WireLevel::PulledLow
            };
            store.get_wire_mut(wire_id)?.set_level(level);
        }
        Ok(self.wire_ids.clone())
    }
}
