//! # Gate Detection
//!
//! Every interior background pixel whose four orthogonal neighbors all
//! conduct is classified by its four diagonal neighbors:
//!
//! ```text
//!  ###    ##.    .#.    .#.    .#.
//!  #.#    #.#    #.#    #.#    #.#
//!  .#.    ##.    ###    .##    .#.
//!  down   right  up     left   crossing
//! ```
//!
//! The diagonal pair sits on the input side; the output is the opposite
//! orthogonal neighbor. A pixel with no conductive diagonal is a crossing:
//! the vertical and horizontal wires pass through each other. Every other
//! combination is inert background.

use log::debug;

use crate::types::Point;
use crate::wire::ProvisionalWires;

/// Conductive diagonals of a pixel, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagonalMask(u8);

impl DiagonalMask {
    pub const UP_LEFT: u8 = 1 << 0;
    pub const UP_RIGHT: u8 = 1 << 1;
    pub const DOWN_RIGHT: u8 = 1 << 2;
    pub const DOWN_LEFT: u8 = 1 << 3;

    pub fn new(bits: u8) -> Self {
        DiagonalMask(bits & 0x0F)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Read the diagonals around interior pixel `(x, y)`.
    pub fn around(wires: &ProvisionalWires, x: usize, y: usize) -> Self {
        let mut bits = 0;
        if wires.is_conductive(x - 1, y - 1) {
            bits |= Self::UP_LEFT;
        }
        if wires.is_conductive(x + 1, y - 1) {
            bits |= Self::UP_RIGHT;
        }
        if wires.is_conductive(x + 1, y + 1) {
            bits |= Self::DOWN_RIGHT;
        }
        if wires.is_conductive(x - 1, y + 1) {
            bits |= Self::DOWN_LEFT;
        }
        DiagonalMask(bits)
    }

    pub fn classify(&self) -> Structure {
        const DOWN: u8 = DiagonalMask::UP_LEFT | DiagonalMask::UP_RIGHT;
        const LEFT: u8 = DiagonalMask::UP_RIGHT | DiagonalMask::DOWN_RIGHT;
        const UP: u8 = DiagonalMask::DOWN_RIGHT | DiagonalMask::DOWN_LEFT;
        const RIGHT: u8 = DiagonalMask::DOWN_LEFT | DiagonalMask::UP_LEFT;

        match self.0 {
            0 => Structure::Crossing,
            DOWN => Structure::Not(Orientation::Down),
            LEFT => Structure::Not(Orientation::Left),
            UP => Structure::Not(Orientation::Up),
            RIGHT => Structure::Not(Orientation::Right),
            _ => Structure::Background,
        }
    }
}

/// Direction a NOT gate drives, from input to output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Down,
    Left,
    Up,
    Right,
}

impl Orientation {
    /// `(input, output)` pixels for a gate centered on interior pixel `(x, y)`.
    pub fn endpoints(&self, x: usize, y: usize) -> (Point, Point) {
        match self {
            Orientation::Down => (Point::new(x, y - 1), Point::new(x, y + 1)),
            Orientation::Left => (Point::new(x + 1, y), Point::new(x - 1, y)),
            Orientation::Up => (Point::new(x, y + 1), Point::new(x, y - 1)),
            Orientation::Right => (Point::new(x - 1, y), Point::new(x + 1, y)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    Crossing,
    Not(Orientation),
    Background,
}

/// Gate endpoints as found on the grid, before wire resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedGate {
    pub center: Point,
    pub orientation: Orientation,
    pub input: Point,
    pub output: Point,
}

/// Scan all interior pixels once. Crossings are merged into `wires` as they
/// are found; NOT gates are returned in scan order.
pub fn detect_gates(wires: &mut ProvisionalWires) -> Vec<DetectedGate> {
    let (width, height) = (wires.width(), wires.height());
    let mut gates = Vec::new();
    if width < 3 || height < 3 {
        return gates;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if wires.is_conductive(x, y)
                || !wires.is_conductive(x - 1, y)
                || !wires.is_conductive(x + 1, y)
                || !wires.is_conductive(x, y - 1)
                || !wires.is_conductive(x, y + 1)
            {
                continue;
            }

            match DiagonalMask::around(wires, x, y).classify() {
                Structure::Crossing => {
                    debug!("crossing at ({}, {})", x, y);
                    wires.merge_pixels(Point::new(x, y - 1), Point::new(x, y + 1));
                    wires.merge_pixels(Point::new(x - 1, y), Point::new(x + 1, y));
                }
                Structure::Not(orientation) => {
                    let (input, output) = orientation.endpoints(x, y);
                    debug!("{:?} gate at ({}, {}): {} -> {}", orientation, x, y, input, output);
                    gates.push(DetectedGate {
                        center: Point::new(x, y),
                        orientation,
                        input,
                        output,
                    });
                }
                Structure::Background => {}
            }
        }
    }

    gates
}
