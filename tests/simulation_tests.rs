//! Tick behavior, external drive and reload carry-over.

mod common;

use bitmap_logic::{Bitmap, CarryOver, GateId, SimError, Simulator, SimulatorConfig};
use common::*;

const SETTLE: u32 = 500;

#[test]
fn test_straight_wire_set_and_get() {
    let mut sim = simulator(STRAIGHT_WIRE, config(0));
    assert!(sim.set(0, 0, true).unwrap());
    assert!(sim.get(4, 0).unwrap());
    sim.simulate();
    assert!(sim.get(4, 0).unwrap());
    sim.set(2, 0, false).unwrap();
    assert!(!sim.get(0, 0).unwrap());
}

#[test]
fn test_inverter_follows_its_input() {
    let mut sim = simulator(INVERTER, config(5));
    sim.simulate_n(SETTLE);
    assert!(sim.get(1, 2).unwrap(), "low input drives the output high");
    assert!(sim.gates()[0].state());
    assert_eq!(sim.gates()[0].charge(), 1.0);

    sim.set(1, 0, true).unwrap();
    sim.simulate_n(SETTLE);
    assert!(!sim.get(1, 2).unwrap(), "high input drives the output low");
    assert!(!sim.gates()[0].state());
}

#[test]
fn test_gate_output_overrides_external_set() {
    let mut sim = simulator(INVERTER, config(5));
    sim.simulate_n(SETTLE);
    sim.set(1, 2, false).unwrap();
    assert!(!sim.get(1, 2).unwrap());
    sim.simulate();
    assert!(sim.get(1, 2).unwrap());
}

#[test]
fn test_fan_in_is_a_logical_or() {
    let mut sim = simulator(FAN_IN, config(8));
    sim.simulate_n(SETTLE);
    assert!(sim.get(4, 3).unwrap());
    assert!(!sim.get(4, 6).unwrap());

    // A off, B still on: the middle wire stays high.
    sim.set(0, 0, true).unwrap();
    sim.simulate_n(SETTLE);
    assert!(sim.get(4, 3).unwrap());
    assert!(!sim.get(4, 6).unwrap());

    // Both off: C sees a low input and drives its output high.
    sim.set(6, 0, true).unwrap();
    sim.simulate_n(SETTLE);
    assert!(!sim.get(4, 3).unwrap());
    assert!(sim.get(4, 6).unwrap());
}

#[test]
fn test_gate_input_reads_fan_in_states() {
    let mut sim = simulator(CHAIN, config(2));
    assert!(!sim.gate_input(GateId::new(1)));
    sim.simulate_n(SETTLE);
    assert!(sim.gates()[0].state());
    assert!(sim.gate_input(GateId::new(1)));
    assert!(!sim.gate_input(GateId::new(0)));
}

#[test]
fn test_propagation_within_a_tick_depends_on_order() {
    let mut seen_forward = false;
    let mut seen_backward = false;

    for seed in 0..64 {
        let mut sim = simulator(CHAIN, fast_config(seed));
        let forward = sim.netlist().order()[0] == GateId::new(0);
        sim.simulate();

        if forward {
            // g1 already sees g0 high and stays low.
            assert!(!sim.get(5, 1).unwrap(), "seed {}", seed);
            seen_forward = true;
        } else {
            // g1 ran first against g0's old low output.
            assert!(sim.get(5, 1).unwrap(), "seed {}", seed);
            seen_backward = true;
        }
        assert!(sim.get(2, 1).unwrap(), "seed {}", seed);

        sim.simulate_n(2);
        assert!(!sim.get(5, 1).unwrap(), "seed {}", seed);
    }

    assert!(seen_forward && seen_backward);
}

#[test]
fn test_settled_circuit_is_stable() {
    let mut sim = simulator(FAN_IN, config(13));
    sim.simulate_n(SETTLE);
    let states = sim.wire_states().to_vec();
    let gates = sim.gates().to_vec();
    sim.simulate_n(50);
    assert_eq!(sim.wire_states(), states.as_slice());
    assert_eq!(sim.gates(), gates.as_slice());
}

#[test]
fn test_ticks_without_gates_change_nothing() {
    let mut sim = simulator(CROSSING, config(0));
    sim.set(0, 1, true).unwrap();
    let before = sim.wire_states().to_vec();
    sim.simulate_n(10);
    assert_eq!(sim.wire_states(), before.as_slice());
    assert_eq!(sim.ticks(), 10);
}

#[test]
fn test_same_seed_is_reproducible() {
    let mut a = simulator(FAN_IN, config(21));
    let mut b = simulator(FAN_IN, config(21));
    for _ in 0..20 {
        a.simulate();
        b.simulate();
        assert_eq!(a.wire_states(), b.wire_states());
        assert_eq!(a.gates(), b.gates());
    }
}

#[test]
fn test_out_of_range_access() {
    let mut sim = simulator(INVERTER, config(0));
    assert!(matches!(
        sim.set(3, 0, true),
        Err(SimError::OutOfRange { x: 3, y: 0, .. })
    ));
    assert!(matches!(sim.get(0, 3), Err(SimError::OutOfRange { .. })));
    assert!(sim.wire_at(usize::MAX, 0).is_err());
    assert!(sim.get(2, 2).is_ok());
}

#[test]
fn test_per_pixel_visits_row_major() {
    let mut sim = simulator(&["#.", "##"], config(0));
    sim.set(0, 1, true).unwrap();
    let mut visited = Vec::new();
    sim.per_pixel(|x, y, state| visited.push((x, y, state)));
    assert_eq!(
        visited,
        vec![(0, 0, true), (1, 0, false), (0, 1, true), (1, 1, true)]
    );
}

fn carry_config(carry_over: CarryOver) -> SimulatorConfig {
    SimulatorConfig {
        carry_over,
        ..config(4)
    }
}

#[test]
fn test_first_load_starts_low() {
    let sim = simulator(INVERTER, carry_config(CarryOver::Conductive));
    assert!(sim.wire_states().iter().all(|s| !s));
    assert!(!sim.gates()[0].state());
}

#[test]
fn test_reload_carries_conductive_pixels() {
    let mut sim = simulator(INVERTER, carry_config(CarryOver::Conductive));
    sim.simulate_n(3);
    sim.load_image(&Bitmap::from_ascii(INVERTER));
    assert_eq!(sim.ticks(), 0);
    assert!(sim.wire_states().iter().all(|s| *s));

    // Gates are seeded from their output wire.
    let gate = &sim.gates()[0];
    assert!(gate.state());
    assert_eq!(gate.charge(), 1.0);
}

#[test]
fn test_reload_with_different_image() {
    let mut sim = simulator(STRAIGHT_WIRE, carry_config(CarryOver::Conductive));
    sim.load_image(&Bitmap::from_ascii(&["..###", "#...."]));
    assert_eq!(sim.size(), (5, 2));
    assert!(sim.get(3, 0).unwrap());
    // Row 1 lies outside the previous image.
    assert!(!sim.get(0, 1).unwrap());
}

#[test]
fn test_reload_with_carry_over_disabled() {
    let mut sim = simulator(INVERTER, carry_config(CarryOver::Disabled));
    sim.simulate_n(SETTLE);
    sim.load_image(&Bitmap::from_ascii(INVERTER));
    assert!(sim.wire_states().iter().all(|s| !s));
    assert!(!sim.gates()[0].state());
}

#[test]
fn test_reload_is_idempotent() {
    let mut sim = simulator(FAN_IN, carry_config(CarryOver::Disabled));
    let wires = sim.netlist().wires().clone();
    let endpoints: Vec<_> = sim
        .gates()
        .iter()
        .map(|g| (g.input_pixel, g.output_pixel, g.input_wire, g.output_wire))
        .collect();

    sim.simulate_n(SETTLE);
    sim.load_image(&Bitmap::from_ascii(FAN_IN));

    assert_eq!(sim.netlist().wires(), &wires);
    let reloaded: Vec<_> = sim
        .gates()
        .iter()
        .map(|g| (g.input_pixel, g.output_pixel, g.input_wire, g.output_wire))
        .collect();
    assert_eq!(reloaded, endpoints);
    assert!(sim.wire_states().iter().all(|s| !s));
}

#[test]
fn test_legacy_carry_over_skips_first_run() {
    let rows = &["##.##"];

    let mut sim = simulator(rows, carry_config(CarryOver::Legacy));
    sim.load_image(&Bitmap::from_ascii(rows));
    assert!(!sim.get(0, 0).unwrap());
    assert!(sim.get(3, 0).unwrap());

    let mut sim = simulator(rows, carry_config(CarryOver::Conductive));
    sim.load_image(&Bitmap::from_ascii(rows));
    assert!(sim.get(0, 0).unwrap());
    assert!(sim.get(3, 0).unwrap());
}

#[test]
fn test_load_replaces_circuit() {
    let mut sim = Simulator::new(config(0)).unwrap();
    assert_eq!(sim.size(), (0, 0));
    sim.load_image(&Bitmap::from_ascii(FAN_IN));
    assert_eq!((sim.wire_count(), sim.gate_count()), (4, 3));
    sim.load_image(&Bitmap::from_ascii(STRAIGHT_WIRE));
    assert_eq!((sim.wire_count(), sim.gate_count()), (1, 0));
    assert_eq!(sim.size(), (5, 1));
}

#[test]
fn test_charge_stays_in_range_for_valid_rates() {
    let config = SimulatorConfig {
        rise_rate: -0.5,
        ..config(6)
    };
    assert!(matches!(
        Simulator::with_image(config, &Bitmap::from_ascii(INVERTER)),
        Err(SimError::InvalidConfig(_))
    ));

    let mut sim = simulator(INVERTER, fast_config(6));
    for _ in 0..10 {
        sim.simulate();
        sim.set(1, 0, sim.ticks() % 2 == 0).unwrap();
        let charge = sim.gates()[0].charge();
        assert!((0.0..=1.0).contains(&charge), "charge {}", charge);
    }
}
