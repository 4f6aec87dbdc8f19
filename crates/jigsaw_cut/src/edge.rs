//! Edge shapes of puzzle pieces.
//!
//! A piece has four [`Side`]s, each with an [`EdgeShape`]. Two pieces sharing an edge
//! interlock when their codes are exact negations: a convex tab meets a concave socket.
use std::ops::Neg;

use crate::error::{Error, Result};

/// Shape of one piece edge.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EdgeShape {
    /// Straight edge, used on the puzzle perimeter.
    #[default]
    Flat,
    /// Tab protruding out of the piece.
    Convex,
    /// Socket carved into the piece.
    Concave,
}

impl EdgeShape {
    /// Numeric code: `0` flat, `1` convex, `-1` concave.
    pub fn code(self) -> i8 {
        match self {
            EdgeShape::Flat => 0,
            EdgeShape::Convex => 1,
            EdgeShape::Concave => -1,
        }
    }

    pub fn from_code(code: i8) -> Result<Self> {
        match code {
            0 => Ok(EdgeShape::Flat),
            1 => Ok(EdgeShape::Convex),
            -1 => Ok(EdgeShape::Concave),
            other => Err(Error::InvalidPlan(format!("unknown edge code {other}"))),
        }
    }

    /// Shape the neighbouring piece needs on the shared edge.
    pub fn complement(self) -> Self {
        match self {
            EdgeShape::Flat => EdgeShape::Flat,
            EdgeShape::Convex => EdgeShape::Concave,
            EdgeShape::Concave => EdgeShape::Convex,
        }
    }

    pub fn is_flat(self) -> bool {
        self == EdgeShape::Flat
    }
}

impl Neg for EdgeShape {
    type Output = EdgeShape;

    fn neg(self) -> Self::Output {
        self.complement()
    }
}

/// One of the four sides of a piece.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Left, Side::Bottom, Side::Right];

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Left => Side::Right,
            Side::Bottom => Side::Top,
            Side::Right => Side::Left,
        }
    }
}

/// Edge shapes of all four sides of a piece.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PieceEdges {
    pub top: EdgeShape,
    pub left: EdgeShape,
    pub bottom: EdgeShape,
    pub right: EdgeShape,
}

impl PieceEdges {
    pub fn new(top: EdgeShape, left: EdgeShape, bottom: EdgeShape, right: EdgeShape) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// A plain rectangle.
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> EdgeShape {
        match side {
            Side::Top => self.top,
            Side::Left => self.left,
            Side::Bottom => self.bottom,
            Side::Right => self.right,
        }
    }

    pub fn is_all_flat(&self) -> bool {
        Side::ALL.iter().all(|s| self.get(*s).is_flat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip_and_negate() {
        for shape in [EdgeShape::Flat, EdgeShape::Convex, EdgeShape::Concave] {
            assert_eq!(EdgeShape::from_code(shape.code()).unwrap(), shape);
            assert_eq!((-shape).code(), -shape.code());
        }
        assert!(EdgeShape::from_code(2).is_err());
    }

    #[test]
    fn piece_edges_lookup_by_side() {
        let edges = PieceEdges::new(
            EdgeShape::Convex,
            EdgeShape::Flat,
            EdgeShape::Concave,
            EdgeShape::Flat,
        );
        assert_eq!(edges.get(Side::Top), EdgeShape::Convex);
        assert_eq!(edges.get(Side::Top.opposite()), EdgeShape::Concave);
        assert!(!edges.is_all_flat());
        assert!(PieceEdges::flat().is_all_flat());
    }
}
