//! # Gate Switching Model
//!
//! A gate does not flip the moment its input changes. Its output is a
//! committed boolean backed by a `charge` in `[0, 1]`; each tick the charge
//! moves toward the target by a random fraction of the rise or fall rate and
//! the committed state only follows once the charge reaches the rail.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{GateId, Point, WireId};

/// Per-tick charge step limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwitchingRates {
    pub rise: f32,
    pub fall: f32,
}

impl Default for SwitchingRates {
    fn default() -> Self {
        SwitchingRates {
            rise: 0.5,
            fall: 0.5,
        }
    }
}

/// One inverter of the netlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    pub input_pixel: Point,
    pub output_pixel: Point,
    pub input_wire: WireId,
    pub output_wire: WireId,
    /// Gates whose output wire is this gate's input wire.
    pub fan_in: Vec<GateId>,
    committed: bool,
    charge: f32,
}

impl Gate {
    pub fn new(
        input_pixel: Point,
        output_pixel: Point,
        input_wire: WireId,
        output_wire: WireId,
    ) -> Self {
        Gate {
            input_pixel,
            output_pixel,
            input_wire,
            output_wire,
            fan_in: Vec::new(),
            committed: false,
            charge: 0.0,
        }
    }

    /// Settled logical output.
    pub fn state(&self) -> bool {
        self.committed
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    /// Jump straight to a settled state, skipping the ramp.
    pub fn hard_set(&mut self, state: bool) {
        self.committed = state;
        self.charge = if state { 1.0 } else { 0.0 };
    }

    /// Advance the charge one tick toward `target`.
    pub fn update_state<R: Rng + ?Sized>(
        &mut self,
        target: bool,
        rates: &SwitchingRates,
        rng: &mut R,
    ) {
        if target {
            if self.committed && self.charge >= 1.0 {
                return;
            }
            self.charge += rates.rise * rng.gen::<f32>();
            if self.charge >= 1.0 {
                self.charge = 1.0;
                self.committed = true;
            }
        } else {
            if !self.committed && self.charge <= 0.0 {
                return;
            }
            self.charge -= rates.fall * rng.gen::<f32>();
            if self.charge <= 0.0 {
                self.charge = 0.0;
                self.committed = false;
            }
        }
    }
}
