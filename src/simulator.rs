//! # Simulation Engine
//!
//! Owns the current [`Netlist`] and the wire state array and advances them
//! one tick at a time. A tick:
//!
//! 1. walks the gates in the load-time permutation, computing each gate's
//!    input (OR of its fan-in gates' committed states, or its input wire when
//!    it has no fan-in) and moving the gate toward the inverted input. Reads
//!    see updates already made earlier in the same sweep, so how far a signal
//!    travels within one tick depends on the permutation.
//! 2. rewrites every gate output wire as the OR of the gates driving it.
//!    Wires no gate drives keep whatever [`Simulator::set`] last wrote.
//!
//! All calls are expected to come from one control thread; share a
//! `Simulator` behind a `Mutex` when a host needs to read it elsewhere.

use log::{info, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SimulatorConfig;
use crate::error::{Result, SimError};
use crate::gate::{Gate, SwitchingRates};
use crate::netlist::Netlist;
use crate::pixel::{ConductivityMask, PixelGrid};
use crate::types::{GateId, WireId};

pub struct Simulator {
    config: SimulatorConfig,
    rates: SwitchingRates,
    rng: ChaCha8Rng,
    netlist: Netlist,
    states: Vec<bool>,
    current_mask: Option<ConductivityMask>,
    ticks: u64,
}

impl Simulator {
    /// Create an empty simulator.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidConfig`] when `config` fails
    /// [`SimulatorConfig::validate`].
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            rates: config.rates(),
            config,
            rng,
            netlist: Netlist::empty(),
            states: Vec::new(),
            current_mask: None,
            ticks: 0,
        })
    }

    pub fn with_image<G: PixelGrid + ?Sized>(config: SimulatorConfig, grid: &G) -> Result<Self> {
        let mut simulator = Self::new(config)?;
        simulator.load_image(grid);
        Ok(simulator)
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Replace the whole circuit with the one extracted from `grid`.
    ///
    /// When an image was loaded before, wire states are seeded from it as
    /// configured by [`SimulatorConfig::carry_over`]. Loading does not run a
    /// tick: gates keep their seeded state until the first [`Simulator::simulate`].
    pub fn load_image<G: PixelGrid + ?Sized>(&mut self, grid: &G) {
        let threshold = self.config.conductivity_threshold;
        let (netlist, states) = Netlist::extract(
            grid,
            threshold,
            self.current_mask.as_ref(),
            self.config.carry_over,
            &mut self.rng,
        );
        self.netlist = netlist;
        self.states = states;
        self.current_mask = Some(ConductivityMask::from_grid(grid, threshold));
        self.ticks = 0;
        info!(
            "loaded circuit: {} wires, {} gates",
            self.netlist.wire_count(),
            self.netlist.gate_count()
        );
    }

    /// Advance every gate once, then refresh the gate output wires.
    pub fn simulate(&mut self) {
        for position in 0..self.netlist.order().len() {
            let id = self.netlist.order()[position];
            let target = !self.gate_input(id);
            self.netlist.gates_mut()[id.index()].update_state(target, &self.rates, &mut self.rng);
        }
        self.store_gate_states_to_wires();
        self.ticks += 1;
        trace!("tick {} done", self.ticks);
    }

    pub fn simulate_n(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.simulate();
        }
    }

    /// Logical input of a gate as seen right now.
    pub fn gate_input(&self, id: GateId) -> bool {
        let gate = self.netlist.gate(id);
        if gate.fan_in.is_empty() {
            self.states[gate.input_wire.index()]
        } else {
            gate.fan_in
                .iter()
                .any(|driver| self.netlist.gate(*driver).state())
        }
    }

    fn store_gate_states_to_wires(&mut self) {
        for gate in self.netlist.gates() {
            self.states[gate.output_wire.index()] = false;
        }
        for gate in self.netlist.gates() {
            if gate.state() {
                self.states[gate.output_wire.index()] = true;
            }
        }
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<()> {
        let (width, height) = self.size();
        if x < width && y < height {
            Ok(())
        } else {
            Err(SimError::OutOfRange {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Drive the wire under `(x, y)`. Returns `Ok(false)` for a background
    /// pixel. A gate output wire is overwritten again on the next tick.
    pub fn set(&mut self, x: usize, y: usize, state: bool) -> Result<bool> {
        self.check_bounds(x, y)?;
        match self.netlist.wire_at(x, y) {
            Some(wire) => {
                self.states[wire.index()] = state;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// State of the wire under `(x, y)`; background pixels read `false`.
    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        self.check_bounds(x, y)?;
        Ok(self
            .netlist
            .wire_at(x, y)
            .map_or(false, |wire| self.states[wire.index()]))
    }

    pub fn wire_at(&self, x: usize, y: usize) -> Result<Option<WireId>> {
        self.check_bounds(x, y)?;
        Ok(self.netlist.wire_at(x, y))
    }

    /// `(width, height)` of the loaded circuit, `(0, 0)` before any load.
    pub fn size(&self) -> (usize, usize) {
        (self.netlist.width(), self.netlist.height())
    }

    /// Visit every pixel in row-major order with its resolved state.
    pub fn per_pixel<F: FnMut(usize, usize, bool)>(&self, mut visit: F) {
        for pixel in self.pixels() {
            visit(pixel.x, pixel.y, pixel.state);
        }
    }

    /// Row-major iterator over every pixel. Each call starts from the top.
    pub fn pixels(&self) -> PixelStates<'_> {
        PixelStates {
            simulator: self,
            next: 0,
        }
    }

    pub fn wire_count(&self) -> usize {
        self.netlist.wire_count()
    }

    pub fn gate_count(&self) -> usize {
        self.netlist.gate_count()
    }

    pub fn gates(&self) -> &[Gate] {
        self.netlist.gates()
    }

    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    pub fn wire_state(&self, wire: WireId) -> Option<bool> {
        self.states.get(wire.index()).copied()
    }

    pub fn wire_states(&self) -> &[bool] {
        &self.states
    }

    /// Ticks run since the last load.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// One pixel as reported by [`Simulator::pixels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelState {
    pub x: usize,
    pub y: usize,
    pub wire: Option<WireId>,
    pub state: bool,
}

impl PixelState {
    pub fn is_conductive(&self) -> bool {
        self.wire.is_some()
    }
}

pub struct PixelStates<'a> {
    simulator: &'a Simulator,
    next: usize,
}

impl Iterator for PixelStates<'_> {
    type Item = PixelState;

    fn next(&mut self) -> Option<PixelState> {
        let (width, height) = self.simulator.size();
        if self.next >= width * height {
            return None;
        }
        let (x, y) = (self.next % width, self.next / width);
        self.next += 1;
        let wire = self.simulator.netlist.wire_at(x, y);
        let state = wire.map_or(false, |w| self.simulator.states[w.index()]);
        Some(PixelState { x, y, wire, state })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (width, height) = self.simulator.size();
        let remaining = (width * height).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PixelStates<'_> {}
