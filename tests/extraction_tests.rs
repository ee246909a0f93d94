//! Wire extraction, gate detection and netlist resolution on small drawn
//! circuits.

mod common;

use bitmap_logic::detect::{DiagonalMask, Orientation, Structure};
use bitmap_logic::{Bitmap, GateId, Point, Rgb16, Simulator, Threshold, WireId};
use common::*;

fn wire(sim: &Simulator, x: usize, y: usize) -> WireId {
    sim.wire_at(x, y).unwrap().expect("pixel should be conductive")
}

#[test]
fn test_straight_wire_is_one_wire() {
    let sim = simulator(STRAIGHT_WIRE, config(0));
    assert_eq!(sim.size(), (5, 1));
    assert_eq!(sim.wire_count(), 1);
    assert_eq!(sim.gate_count(), 0);
    for x in 0..5 {
        assert_eq!(wire(&sim, x, 0), WireId::new(0));
    }
}

#[test]
fn test_diagonal_pixels_do_not_connect() {
    let sim = simulator(&["#.", ".#"], config(0));
    assert_eq!(sim.wire_count(), 2);
    assert_ne!(wire(&sim, 0, 0), wire(&sim, 1, 1));
}

#[test]
fn test_u_shape_merges_into_one_wire() {
    // Two runs on the top row only meet through the bottom row.
    let sim = simulator(&["#.#", "#.#", "###"], config(0));
    assert_eq!(sim.wire_count(), 1);
}

#[test]
fn test_canonical_ids_follow_first_appearance() {
    let sim = simulator(&["#.#.#", ".....", "#...#"], config(0));
    assert_eq!(sim.wire_count(), 5);
    assert_eq!(wire(&sim, 0, 0), WireId::new(0));
    assert_eq!(wire(&sim, 2, 0), WireId::new(1));
    assert_eq!(wire(&sim, 4, 0), WireId::new(2));
    assert_eq!(wire(&sim, 0, 2), WireId::new(3));
    assert_eq!(wire(&sim, 4, 2), WireId::new(4));
}

#[test]
fn test_threshold_boundary() {
    let mut bitmap = Bitmap::new(3, 1);
    bitmap.set(0, 0, Rgb16::new(57087, 0, 0));
    bitmap.set(1, 0, Rgb16::new(0, 57088, 0));
    bitmap.set(2, 0, Rgb16::new(0, 0, 65535));
    let sim = Simulator::with_image(config(0), &bitmap).unwrap();
    assert_eq!(sim.wire_at(0, 0).unwrap(), None);
    assert!(sim.wire_at(1, 0).unwrap().is_some());
    assert!(sim.wire_at(2, 0).unwrap().is_some());
    assert!(Threshold::default().is_conductive(Rgb16::from_rgb8(223, 0, 0)));
    assert!(!Threshold::default().is_conductive(Rgb16::from_rgb8(222, 222, 222)));
}

#[test]
fn test_single_inverter() {
    let sim = simulator(INVERTER, config(0));
    assert_eq!(sim.wire_count(), 2);
    assert_eq!(sim.gate_count(), 1);

    let gate = &sim.gates()[0];
    assert_eq!(gate.input_pixel, Point::new(1, 0));
    assert_eq!(gate.output_pixel, Point::new(1, 2));
    assert_eq!(gate.input_wire, wire(&sim, 0, 1));
    assert_eq!(gate.output_wire, wire(&sim, 1, 2));
    assert!(gate.fan_in.is_empty());
    assert!(!gate.state());
    assert_eq!(gate.charge(), 0.0);
}

#[test]
fn test_all_four_orientations() {
    let cases: [(&[&str], Point, Point); 4] = [
        (&["###", "#.#", ".#."], Point::new(1, 0), Point::new(1, 2)),
        (&[".##", "#.#", ".##"], Point::new(2, 1), Point::new(0, 1)),
        (&[".#.", "#.#", "###"], Point::new(1, 2), Point::new(1, 0)),
        (&["##.", "#.#", "##."], Point::new(0, 1), Point::new(2, 1)),
    ];
    for (rows, input, output) in cases {
        let sim = simulator(rows, config(0));
        assert_eq!(sim.gate_count(), 1, "{:?}", rows);
        let gate = &sim.gates()[0];
        assert_eq!(gate.input_pixel, input, "{:?}", rows);
        assert_eq!(gate.output_pixel, output, "{:?}", rows);
        assert_ne!(gate.input_wire, gate.output_wire);
    }
}

#[test]
fn test_orientation_endpoints() {
    assert_eq!(
        Orientation::Left.endpoints(5, 5),
        (Point::new(6, 5), Point::new(4, 5))
    );
    assert_eq!(
        Orientation::Up.endpoints(5, 5),
        (Point::new(5, 6), Point::new(5, 4))
    );
}

#[test]
fn test_crossing_keeps_two_independent_wires() {
    let mut sim = simulator(CROSSING, config(0));
    assert_eq!(sim.gate_count(), 0);
    assert_eq!(sim.wire_count(), 2);
    assert_eq!(wire(&sim, 1, 0), wire(&sim, 1, 2));
    assert_eq!(wire(&sim, 0, 1), wire(&sim, 2, 1));
    assert_ne!(wire(&sim, 1, 0), wire(&sim, 0, 1));

    sim.set(1, 0, true).unwrap();
    sim.simulate();
    assert!(sim.get(1, 2).unwrap());
    assert!(!sim.get(0, 1).unwrap());
    assert!(!sim.get(2, 1).unwrap());
}

#[test]
fn test_fully_surrounded_pixel_is_a_ring() {
    assert_eq!(DiagonalMask::new(0b1111).classify(), Structure::Background);
    let sim = simulator(RING, config(0));
    assert_eq!(sim.gate_count(), 0);
    assert_eq!(sim.wire_count(), 1);
    assert_eq!(sim.wire_at(1, 1).unwrap(), None);
}

#[test]
fn test_crossing_chain_merges_across_several_crossings() {
    let rows = [
        ".#.#.", //
        "#.#.#", //
        ".#.#.",
    ];
    let sim = simulator(&rows, config(0));
    assert_eq!(sim.gate_count(), 0);
    // The horizontal wire runs through both crossings.
    assert_eq!(wire(&sim, 0, 1), wire(&sim, 4, 1));
    assert_eq!(wire(&sim, 0, 1), wire(&sim, 2, 1));
    assert_eq!(wire(&sim, 1, 0), wire(&sim, 1, 2));
    assert_eq!(wire(&sim, 3, 0), wire(&sim, 3, 2));
    assert_ne!(wire(&sim, 1, 0), wire(&sim, 3, 0));
    assert_eq!(sim.wire_count(), 3);
}

#[test]
fn test_fan_in_aggregation() {
    let sim = simulator(FAN_IN, config(0));
    assert_eq!(sim.gate_count(), 3);
    assert_eq!(sim.wire_count(), 4);

    let gates = sim.gates();
    let middle = wire(&sim, 4, 3);
    let find = |x: usize, y: usize| {
        gates
            .iter()
            .position(|g| g.output_pixel == Point::new(x, y))
            .map(GateId::new)
            .expect("gate not found")
    };
    let a = find(1, 2);
    let b = find(7, 2);
    let c = find(4, 6);

    assert_eq!(gates[a.index()].output_wire, middle);
    assert_eq!(gates[b.index()].output_wire, middle);
    assert_eq!(gates[c.index()].input_wire, middle);

    let mut fan_in = gates[c.index()].fan_in.clone();
    fan_in.sort();
    assert_eq!(fan_in, vec![a, b]);
    assert!(gates[a.index()].fan_in.is_empty());
    assert!(gates[b.index()].fan_in.is_empty());
}

#[test]
fn test_chain_fan_in() {
    let sim = simulator(CHAIN, config(0));
    assert_eq!(sim.gate_count(), 2);
    assert_eq!(sim.wire_count(), 3);
    let gates = sim.gates();
    assert_eq!(gates[0].output_wire, gates[1].input_wire);
    assert_eq!(gates[1].fan_in, vec![GateId::new(0)]);
    assert!(gates[0].fan_in.is_empty());
}

#[test]
fn test_order_is_a_permutation() {
    let sim = simulator(FAN_IN, config(3));
    let mut order: Vec<usize> = sim.netlist().order().iter().map(|g| g.index()).collect();
    order.sort_unstable();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn test_same_seed_same_order() {
    let a = simulator(FAN_IN, config(11));
    let b = simulator(FAN_IN, config(11));
    assert_eq!(a.netlist().order(), b.netlist().order());
}

#[test]
fn test_empty_and_tiny_images() {
    let sim = simulator(&[], config(0));
    assert_eq!(sim.size(), (0, 0));
    assert_eq!(sim.wire_count(), 0);

    let sim = simulator(&["#", "#"], config(0));
    assert_eq!(sim.size(), (1, 2));
    assert_eq!(sim.wire_count(), 1);
    assert_eq!(sim.gate_count(), 0);
}
