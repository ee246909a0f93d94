//! # Wire Extraction
//!
//! Conductive pixels are grouped into wires in two passes:
//!
//! 1. Each row is scanned left to right. A conductive pixel that does not
//!    continue a run from its left neighbor opens a new provisional id.
//! 2. Every pair of vertically adjacent conductive pixels merges the two
//!    provisional ids in a [`WireRemap`].
//!
//! Crossing merges found by the gate detector are applied to the same remap
//! before [`ProvisionalWires::resolve`] compacts the classes into dense
//! canonical [`WireId`]s.

use crate::pixel::{PixelGrid, Threshold};
use crate::types::{Point, WireId};

/// Provisional id to representative, kept fully flattened: every entry
/// points directly at its class representative at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRemap {
    table: Vec<usize>,
}

impl WireRemap {
    pub fn identity(len: usize) -> Self {
        WireRemap {
            table: (0..len).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn representative(&self, provisional: usize) -> usize {
        self.table[provisional]
    }

    /// Fold the class of `absorbed` into the class of `keep`. Every entry of
    /// the absorbed class is rewritten, so no later compaction is needed.
    /// Returns `false` when both ids were already in the same class.
    pub fn merge(&mut self, keep: usize, absorbed: usize) -> bool {
        let keep = self.table[keep];
        let absorbed = self.table[absorbed];
        if keep == absorbed {
            return false;
        }
        for entry in self.table.iter_mut() {
            if *entry == absorbed {
                *entry = keep;
            }
        }
        true
    }
}

/// Provisional wire ids per pixel plus the remap that joins them.
#[derive(Debug, Clone)]
pub struct ProvisionalWires {
    width: usize,
    height: usize,
    ids: Vec<Option<usize>>,
    remap: WireRemap,
}

impl ProvisionalWires {
    /// Run both extraction passes over `grid`.
    pub fn scan<G: PixelGrid + ?Sized>(grid: &G, threshold: Threshold) -> Self {
        let (width, height) = (grid.width(), grid.height());
        let mut ids = vec![None; width * height];
        let mut next_id = 0usize;

        for y in 0..height {
            let mut run: Option<usize> = None;
            for x in 0..width {
                if threshold.is_conductive(grid.color_at(x, y)) {
                    let id = match run {
                        Some(id) => id,
                        None => {
                            next_id += 1;
                            next_id - 1
                        }
                    };
                    ids[y * width + x] = Some(id);
                    run = Some(id);
                } else {
                    run = None;
                }
            }
        }

        let mut wires = ProvisionalWires {
            width,
            height,
            ids,
            remap: WireRemap::identity(next_id),
        };

        for y in 1..height {
            for x in 0..width {
                wires.merge_pixels(Point::new(x, y - 1), Point::new(x, y));
            }
        }

        wires
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn remap(&self) -> &WireRemap {
        &self.remap
    }

    /// Provisional id of a pixel, `None` for background or outside the grid.
    pub fn provisional(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            self.ids[y * self.width + x]
        } else {
            None
        }
    }

    pub fn is_conductive(&self, x: usize, y: usize) -> bool {
        self.provisional(x, y).is_some()
    }

    /// Join the wires under two pixels, the first one's class surviving.
    /// Does nothing unless both pixels conduct.
    pub fn merge_pixels(&mut self, keep: Point, absorbed: Point) -> bool {
        match (
            self.provisional(keep.x, keep.y),
            self.provisional(absorbed.x, absorbed.y),
        ) {
            (Some(keep), Some(absorbed)) => self.remap.merge(keep, absorbed),
            _ => false,
        }
    }

    /// Compact the merged classes into dense canonical ids, numbered in the
    /// order their representatives' provisional ids appear.
    pub fn resolve(&self) -> WireGrid {
        let mut dense: Vec<Option<WireId>> = vec![None; self.remap.len()];
        let mut wire_count = 0usize;
        for provisional in 0..self.remap.len() {
            let rep = self.remap.representative(provisional);
            if dense[rep].is_none() {
                dense[rep] = Some(WireId::new(wire_count));
                wire_count += 1;
            }
        }

        let cells = self
            .ids
            .iter()
            .map(|id| id.and_then(|p| dense[self.remap.representative(p)]))
            .collect();

        WireGrid {
            width: self.width,
            height: self.height,
            cells,
            wire_count,
        }
    }
}

/// Canonical wire id per pixel. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<WireId>>,
    wire_count: usize,
}

impl WireGrid {
    pub fn empty() -> Self {
        WireGrid {
            width: 0,
            height: 0,
            cells: Vec::new(),
            wire_count: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn wire_count(&self) -> usize {
        self.wire_count
    }

    /// `None` for background pixels and for coordinates outside the grid.
    pub fn wire_at(&self, x: usize, y: usize) -> Option<WireId> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn cells(&self) -> &[Option<WireId>] {
        &self.cells
    }
}
