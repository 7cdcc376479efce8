/// One of the seven levels a wire can sit at.
///
/// Ordered by drive strength, strongest first, matching the priority table
/// a wire group's resolution walk arbitrates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireLevel {
    /// Hard-tied to ground. Priority 7, strongest.
    Grounded,
    /// Hard-tied to supply. Priority 6.
    High,
    /// Weak pull-down active. Priority 5.
    PulledLow,
    /// Weak pull-up active. Priority 4.
    PulledHigh,
    /// Last driven low, now floating. Priority 3.
    FloatingLow,
    /// Last driven high, now floating. Priority 2.
    FloatingHigh,
    /// Never driven. Priority 1, weakest.
    Floating,
}

impl WireLevel {
    /// Arbitration priority; higher wins when multiple levels are present
    /// in a resolved wire group.
    pub fn priority(self) -> u8 {
        match self {
            WireLevel::Grounded => 7,
            WireLevel::High => 6,
            WireLevel::PulledLow => 5,
            WireLevel::PulledHigh => 4,
            WireLevel::FloatingLow => 3,
            WireLevel::FloatingHigh => 2,
            WireLevel::Floating => 1,
        }
    }

    /// Membership in the *low* set: {GROUNDED, PULLED_LOW, FLOATING_LOW}.
    pub fn is_low(self) -> bool {
        matches!(
            self,
            WireLevel::Grounded | WireLevel::PulledLow | WireLevel::FloatingLow
        )
    }

    /// Membership in the *high* set: {HIGH, PULLED_HIGH, FLOATING_HIGH}.
    pub fn is_high(self) -> bool {
        matches!(
            self,
            WireLevel::High | WireLevel::PulledHigh | WireLevel::FloatingHigh
        )
    }
}

/// A wire's fixed bias toward HIGH or LOW when no driver holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pull {
    /// No bias; an undriven wire collapses to FLOATING.
    #[default]
    None,
    /// Weak bias toward HIGH.
    High,
    /// Weak bias toward LOW.
    Low,
}

/// Whether a wire is an ordinary net or one of the two circuit-wide rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Special {
    /// An ordinary wire, subject to normal resolution and write-back.
    #[default]
    None,
    /// The supply rail. Perpetually HIGH; never overwritten by the engine.
    Vcc,
    /// The ground rail. Perpetually GROUNDED; never overwritten by the engine.
    Gnd,
}

/// Applies the float-collapse rule (component design, float-collapse table)
/// to a wire's current level given its pull attribute, ahead of
/// OR-accumulation into a wire group's resolved level.
///
/// VCC/GND-special wires are exempt from this rule entirely; callers handle
/// them before reaching here.
pub fn float_collapse(level: WireLevel, pull: Pull) -> WireLevel {
    match pull {
        Pull::High => WireLevel::PulledHigh,
        Pull::Low => WireLevel::PulledLow,
        Pull::None => match level {
            WireLevel::High | WireLevel::PulledHigh | WireLevel::FloatingHigh => {
                WireLevel::FloatingHigh
            }
            WireLevel::Grounded | WireLevel::PulledLow | WireLevel::FloatingLow => {
                WireLevel::FloatingLow
            }
            WireLevel::Floating => WireLevel::Floating,
        },
    }
}

/// Accumulates the levels present across a wire group's members, tracking
/// enough to pick the single resolved level per the priority rule plus the
/// floating-low/floating-high tie-break.
#[derive(Debug, Default, Clone, Copy)]
pub struct LevelAccumulator {
    present: u8,
    floating_low_count: usize,
    floating_high_count: usize,
}

impl LevelAccumulator {
    /// A fresh, empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one more (already float-collapsed, if applicable) level in.
    pub fn accumulate(&mut self, level: WireLevel) {
        self.present |= 1 << (level.priority() - 1);
        match level {
            WireLevel::FloatingLow => self.floating_low_count += 1,
            WireLevel::FloatingHigh => self.floating_high_count += 1,
            _ => {}
        }
    }

    /// The level with the highest priority seen so far, resolving a
    /// floating-low/floating-high tie in favor of LOW as the component
    /// design's traversal rule requires. Returns `None` if nothing was ever
    /// accumulated.
    pub fn resolve(&self) -> Option<WireLevel> {
        const LEVELS_HIGH_TO_LOW: [WireLevel; 7] = [
            WireLevel::Grounded,
            WireLevel::High,
            WireLevel::PulledLow,
            WireLevel::PulledHigh,
            WireLevel::FloatingLow,
            WireLevel::FloatingHigh,
            WireLevel::Floating,
        ];
        for candidate in LEVELS_HIGH_TO_LOW {
            if candidate == WireLevel::FloatingLow || candidate == WireLevel::FloatingHigh {
                continue;
            }
            if self.present & (1 << (candidate.priority() - 1)) != 0 {
                return Some(candidate);
            }
        }
        let has_fl = self.present & (1 << (WireLevel::FloatingLow.priority() - 1)) != 0;
        let has_fh = self.present & (1 << (WireLevel::FloatingHigh.priority() - 1)) != 0;
        match (has_fl, has_fh) {
            (true, true) => {
                if self.floating_low_count >= self.floating_high_count {
                    Some(WireLevel::FloatingLow)
                } else {
                    Some(WireLevel::FloatingHigh)
                }
            }
            (true, false) => Some(WireLevel::FloatingLow),
            (false, true) => Some(WireLevel::FloatingHigh),
            (false, false) => None,
        }
    }
}
