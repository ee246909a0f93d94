//! Shared fixtures for the integration tests.
//!
//! Circuits are drawn as ASCII art: `#` is a conductive (white) pixel,
//! anything else is background.

#![allow(dead_code)]

use bitmap_logic::{Bitmap, CarryOver, Simulator, SimulatorConfig};

/// 1x5 horizontal wire.
pub const STRAIGHT_WIRE: &[&str] = &["#####"];

/// One downward inverter. Input at (1, 0), output at (1, 2).
pub const INVERTER: &[&str] = &[
    "###", //
    "#.#", //
    ".#.",
];

/// Vertical and horizontal wires passing over (1, 1).
pub const CROSSING: &[&str] = &[
    ".#.", //
    "#.#", //
    ".#.",
];

/// All eight neighbors of (1, 1) conduct: one closed ring, no gate.
pub const RING: &[&str] = &[
    "###", //
    "#.#", //
    "###",
];

/// Two downward inverters A (1, 1) and B (7, 1) both drive the middle wire,
/// which feeds inverter C (4, 5). Output of C is (4, 6).
pub const FAN_IN: &[&str] = &[
    "###...###",
    "#.#...#.#",
    ".#.....#.",
    ".#######.",
    "...###...",
    "...#.#...",
    "....#....",
];

/// Two right-facing inverters in series:
/// (0, 1) -> g0 -> (2, 1)..(3, 1) -> g1 -> (5, 1)..(6, 1).
pub const CHAIN: &[&str] = &[
    "##.##..", //
    "#.##.##", //
    "##.##..",
];

pub fn config(seed: u64) -> SimulatorConfig {
    SimulatorConfig {
        seed: Some(seed),
        carry_over: CarryOver::Disabled,
        ..SimulatorConfig::default()
    }
}

/// Rates so large that a single tick practically always reaches the rail.
pub fn fast_config(seed: u64) -> SimulatorConfig {
    SimulatorConfig {
        rise_rate: 1.0e6,
        fall_rate: 1.0e6,
        ..config(seed)
    }
}

pub fn simulator(rows: &[&str], config: SimulatorConfig) -> Simulator {
    Simulator::with_image(config, &Bitmap::from_ascii(rows)).unwrap()
}
