use std::fmt;

/// Pixel coordinate on the source grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }

    /// Row-major index into a grid of the given width.
    pub fn index(&self, width: usize) -> usize {
        self.y * width + self.x
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Point {
    fn from((x, y): (usize, usize)) -> Self {
        Point::new(x, y)
    }
}

/// Canonical wire identifier, always in `0..wire_count` of the netlist it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(u32);

impl WireId {
    pub fn new(value: usize) -> Self {
        WireId(value as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Index of a gate in the netlist's gate arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(u32);

impl GateId {
    pub fn new(value: usize) -> Self {
        GateId(value as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_index_is_row_major() {
        assert_eq!(Point::new(0, 0).index(5), 0);
        assert_eq!(Point::new(4, 0).index(5), 4);
        assert_eq!(Point::new(2, 3).index(5), 17);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(WireId::new(7).to_string(), "w7");
        assert_eq!(GateId::new(3).to_string(), "g3");
        assert_eq!(Point::new(1, 2).to_string(), "(1, 2)");
    }
}
