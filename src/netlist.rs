//! # Circuit Resolution
//!
//! Turns a pixel grid into a [`Netlist`]: the canonical wire grid, the gate
//! arena with resolved wire ids and fan-in sets, and the evaluation order.
//! A netlist is built once per load and never patched afterwards.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::detect::detect_gates;
use crate::gate::Gate;
use crate::pixel::{ConductivityMask, PixelGrid, Threshold};
use crate::types::{GateId, WireId};
use crate::wire::{ProvisionalWires, WireGrid};

/// How wire states are seeded from the previously loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarryOver {
    /// Every wire starts low.
    Disabled,
    /// A wire starts high when any of its pixels was conductive in the
    /// previous image.
    #[default]
    Conductive,
    /// As `Conductive`, but pixels of the very first horizontal run
    /// (provisional id 0) are never consulted.
    Legacy,
}

#[derive(Debug, Clone)]
pub struct Netlist {
    wires: WireGrid,
    gates: Vec<Gate>,
    order: Vec<GateId>,
}

impl Netlist {
    pub fn empty() -> Self {
        Netlist {
            wires: WireGrid::empty(),
            gates: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Run the full extraction pipeline over `grid` and seed the initial
    /// wire states from `previous` according to `carry_over`.
    ///
    /// Gates are hard-set to the seeded state of their output wire, so a
    /// reload without edits keeps gates and wires consistent.
    pub fn extract<G, R>(
        grid: &G,
        threshold: Threshold,
        previous: Option<&ConductivityMask>,
        carry_over: CarryOver,
        rng: &mut R,
    ) -> (Netlist, Vec<bool>)
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized,
    {
        let mut provisional = ProvisionalWires::scan(grid, threshold);
        let detected = detect_gates(&mut provisional);
        let wires = provisional.resolve();

        let mut gates = Vec::with_capacity(detected.len());
        for found in &detected {
            // Endpoints are orthogonal neighbors checked conductive by the detector.
            if let (Some(input_wire), Some(output_wire)) = (
                wires.wire_at(found.input.x, found.input.y),
                wires.wire_at(found.output.x, found.output.y),
            ) {
                gates.push(Gate::new(found.input, found.output, input_wire, output_wire));
            }
        }
        resolve_fan_in(&mut gates);

        let mut order: Vec<GateId> = (0..gates.len()).map(GateId::new).collect();
        order.shuffle(rng);

        let mut netlist = Netlist {
            wires,
            gates,
            order,
        };

        let states = match previous {
            Some(mask) => netlist.carried_over_states(&provisional, mask, carry_over),
            None => vec![false; netlist.wire_count()],
        };
        netlist.seed_gates_from_wires(&states);

        info!(
            "extracted {}x{} circuit: {} wires, {} gates, {} wires carried high",
            netlist.width(),
            netlist.height(),
            netlist.wire_count(),
            netlist.gate_count(),
            states.iter().filter(|s| **s).count()
        );

        (netlist, states)
    }

    fn carried_over_states(
        &self,
        provisional: &ProvisionalWires,
        previous: &ConductivityMask,
        carry_over: CarryOver,
    ) -> Vec<bool> {
        let mut states = vec![false; self.wire_count()];
        if carry_over == CarryOver::Disabled {
            return states;
        }

        for y in 0..self.height() {
            for x in 0..self.width() {
                if carry_over == CarryOver::Legacy && provisional.provisional(x, y) == Some(0) {
                    continue;
                }
                if let Some(wire) = self.wires.wire_at(x, y) {
                    if previous.is_conductive(x, y) {
                        states[wire.index()] = true;
                    }
                }
            }
        }
        states
    }

    /// Hard-set every gate to the state of its output wire.
    pub fn seed_gates_from_wires(&mut self, states: &[bool]) {
        for gate in &mut self.gates {
            gate.hard_set(states[gate.output_wire.index()]);
        }
    }

    pub fn width(&self) -> usize {
        self.wires.width()
    }

    pub fn height(&self) -> usize {
        self.wires.height()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.wire_count()
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn wires(&self) -> &WireGrid {
        &self.wires
    }

    pub fn wire_at(&self, x: usize, y: usize) -> Option<WireId> {
        self.wires.wire_at(x, y)
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate(&self, id: GateId) -> &Gate {
        &self.gates[id.index()]
    }

    pub(crate) fn gates_mut(&mut self) -> &mut [Gate] {
        &mut self.gates
    }

    /// Load-time permutation of gate indices used by every tick.
    pub fn order(&self) -> &[GateId] {
        &self.order
    }
}

impl Default for Netlist {
    fn default() -> Self {
        Netlist::empty()
    }
}

/// Fill each gate's fan-in with every gate driving its input wire.
pub fn resolve_fan_in(gates: &mut [Gate]) {
    let outputs: Vec<WireId> = gates.iter().map(|g| g.output_wire).collect();
    for (index, gate) in gates.iter_mut().enumerate() {
        gate.fan_in = outputs
            .iter()
            .enumerate()
            .filter(|(_, out)| **out == gate.input_wire)
            .map(|(driver, _)| GateId::new(driver))
            .collect();
        if !gate.fan_in.is_empty() {
            debug!("gate {} fan-in {:?}", index, gate.fan_in);
        }
    }
}
