//! Edge-shape planning across the puzzle grid.
//!
//! Cells are visited in row-major order. The top and left edges of a cell are always fixed by
//! neighbours that were already planned; the bottom and right edges are chosen at random unless
//! they lie on the perimeter.
use rand::Rng;
use tracing::debug;

use crate::edge::{EdgeShape, PieceEdges};
use crate::error::{Error, Result};

/// Planned edge shapes for every cell of a `cols x rows` grid, row-major.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgePlan {
    pub cols: u32,
    pub rows: u32,
    pub cells: Vec<PieceEdges>,
}

impl EdgePlan {
    /// Row-major index of cell `(col, row)`.
    #[inline]
    pub fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    pub fn get(&self, col: u32, row: u32) -> Option<&PieceEdges> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(self.index(col, row))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates `(col, row, edges)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &PieceEdges)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, e)| ((i as u32) % cols, (i as u32) / cols, e))
    }

    /// Checks that perimeter edges are flat and that shared edges interlock.
    pub fn verify(&self) -> Result<()> {
        if self.cells.len() != self.cols as usize * self.rows as usize {
            return Err(Error::InvalidPlan(format!(
                "expected {} cells for {}x{}, got {}",
                self.cols as usize * self.rows as usize,
                self.cols,
                self.rows,
                self.cells.len()
            )));
        }
        for (col, row, e) in self.iter() {
            let perimeter = [
                (row == 0, e.top, "top"),
                (col == 0, e.left, "left"),
                (row + 1 == self.rows, e.bottom, "bottom"),
                (col + 1 == self.cols, e.right, "right"),
            ];
            for (on_perimeter, shape, name) in perimeter {
                if on_perimeter && !shape.is_flat() {
                    return Err(Error::InvalidPlan(format!(
                        "perimeter {name} edge of ({col}, {row}) is {shape:?}"
                    )));
                }
                if !on_perimeter && shape.is_flat() {
                    return Err(Error::InvalidPlan(format!(
                        "internal {name} edge of ({col}, {row}) is flat"
                    )));
                }
            }
            if col + 1 < self.cols {
                let east = &self.cells[self.index(col + 1, row)];
                if east.left != -e.right {
                    return Err(Error::InvalidPlan(format!(
                        "right edge of ({col}, {row}) is {:?} but its neighbour has {:?}",
                        e.right, east.left
                    )));
                }
            }
            if row + 1 < self.rows {
                let south = &self.cells[self.index(col, row + 1)];
                if south.top != -e.bottom {
                    return Err(Error::InvalidPlan(format!(
                        "bottom edge of ({col}, {row}) is {:?} but its neighbour has {:?}",
                        e.bottom, south.top
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Picks a tab or a socket with equal probability.
#[inline]
fn random_tab(rng: &mut dyn Rng) -> EdgeShape {
    if rng.next_u32() >> 31 == 0 {
        EdgeShape::Convex
    } else {
        EdgeShape::Concave
    }
}

/// Plans interlocking edges for a `cols x rows` grid.
///
/// Consumes one random value per internal bottom edge and one per internal right edge,
/// in row-major order with the bottom edge first, so a seeded generator reproduces the plan.
pub fn plan_edges(cols: u32, rows: u32, rng: &mut dyn Rng) -> EdgePlan {
    let mut cells: Vec<PieceEdges> = Vec::with_capacity(cols as usize * rows as usize);

    for row in 0..rows {
        for col in 0..cols {
            let top = if row > 0 {
                -cells[(row as usize - 1) * cols as usize + col as usize].bottom
            } else {
                EdgeShape::Flat
            };
            let left = if col > 0 {
                -cells[row as usize * cols as usize + col as usize - 1].right
            } else {
                EdgeShape::Flat
            };
            let bottom = if row + 1 < rows {
                random_tab(rng)
            } else {
                EdgeShape::Flat
            };
            let right = if col + 1 < cols {
                random_tab(rng)
            } else {
                EdgeShape::Flat
            };
            cells.push(PieceEdges::new(top, left, bottom, right));
        }
    }

    debug!("Planned edges for a {}x{} grid.", cols, rows);
    EdgePlan { cols, rows, cells }
}
