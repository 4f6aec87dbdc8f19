//! Piece mask construction.
//!
//! A mask starts as the solid `base_size x base_size` core. Every convex side grows the canvas by
//! the stencil thickness and writes the tab into the new band; every concave side multiplies the
//! core's border band by `1 - tab`, using the variant that the neighbour's convex tab uses.
use crate::edge::{EdgeShape, PieceEdges};
use crate::piece::CanvasOffset;
use crate::raster::AlphaMask;
use crate::stencil::TabStencil;

/// Builds the alpha mask of a piece and the canvas offset of its base square.
pub fn build_mask(
    edges: PieceEdges,
    base_size: u32,
    stencil: &TabStencil,
) -> (AlphaMask, CanvasOffset) {
    let thickness = stencil.thickness();
    let grow = |shape: EdgeShape| if shape == EdgeShape::Convex { thickness } else { 0 };
    let offset = CanvasOffset {
        left: grow(edges.left),
        top: grow(edges.top),
        right: grow(edges.right),
        bottom: grow(edges.bottom),
    };

    let width = base_size + offset.horizontal();
    let height = base_size + offset.vertical();
    let mut mask = AlphaMask::new(width, height);
    mask.fill_rect(offset.left, offset.top, base_size, base_size, 1.0);

    // Centers the tab along its side.
    let along = base_size.saturating_sub(stencil.span()) / 2;
    let band_x = offset.left + along;
    let band_y = offset.top + along;

    match edges.top {
        EdgeShape::Convex => mask.write_block(band_x, 0, stencil.up()),
        EdgeShape::Concave => mask.carve_block(band_x, 0, stencil.down()),
        EdgeShape::Flat => {}
    }

    let bottom_y = height.saturating_sub(thickness);
    match edges.bottom {
        EdgeShape::Convex => mask.write_block(band_x, bottom_y, stencil.down()),
        EdgeShape::Concave => mask.carve_block(band_x, bottom_y, stencil.up()),
        EdgeShape::Flat => {}
    }

    match edges.left {
        EdgeShape::Convex => mask.write_block(0, band_y, stencil.left()),
        EdgeShape::Concave => mask.carve_block(0, band_y, stencil.right()),
        EdgeShape::Flat => {}
    }

    let right_x = width.saturating_sub(thickness);
    match edges.right {
        EdgeShape::Convex => mask.write_block(right_x, band_y, stencil.right()),
        EdgeShape::Concave => mask.carve_block(right_x, band_y, stencil.left()),
        EdgeShape::Flat => {}
    }

    (mask, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Side;

    const SHAPES: [EdgeShape; 3] = [EdgeShape::Flat, EdgeShape::Convex, EdgeShape::Concave];

    fn stencil() -> TabStencil {
        TabStencil::classic(40, 20).unwrap()
    }

    fn with_side(side: Side, shape: EdgeShape) -> PieceEdges {
        let mut edges = PieceEdges::flat();
        match side {
            Side::Top => edges.top = shape,
            Side::Left => edges.left = shape,
            Side::Bottom => edges.bottom = shape,
            Side::Right => edges.right = shape,
        }
        edges
    }

    fn assert_block(mask: &AlphaMask, x0: u32, y0: u32, block: &AlphaMask, side: Side) {
        for y in 0..block.height() {
            for x in 0..block.width() {
                assert_eq!(
                    mask.get(x0 + x, y0 + y),
                    block.get(x, y),
                    "{side:?} tab differs at ({}, {})",
                    x0 + x,
                    y0 + y
                );
            }
        }
    }

    #[test]
    fn flat_piece_is_solid_square() {
        let (mask, offset) = build_mask(PieceEdges::flat(), 100, &stencil());
        assert_eq!(offset, CanvasOffset::default());
        assert_eq!(mask.size(), (100, 100));
        assert!(mask.as_slice().iter().all(|v| *v == 1.0));
    }

    #[test]
    fn values_stay_in_unit_range_for_every_shape_combination() {
        let stencil = stencil();
        for top in SHAPES {
            for left in SHAPES {
                for bottom in SHAPES {
                    for right in SHAPES {
                        let edges = PieceEdges::new(top, left, bottom, right);
                        let (mask, _) = build_mask(edges, 64, &stencil);
                        assert!(mask
                            .as_slice()
                            .iter()
                            .all(|v| (0.0..=1.0).contains(v)));
                    }
                }
            }
        }
    }

    #[test]
    fn right_edge_grows_width_only_when_convex() {
        let stencil = stencil();
        for (right, expected) in [
            (EdgeShape::Convex, 120),
            (EdgeShape::Concave, 100),
            (EdgeShape::Flat, 100),
        ] {
            let (mask, offset) = build_mask(with_side(Side::Right, right), 100, &stencil);
            assert_eq!(mask.width(), expected);
            assert_eq!(mask.height(), 100);
            assert_eq!(offset.left, 0);
            assert_eq!(offset.right, expected - 100);
        }
    }

    #[test]
    fn convex_tab_copies_stencil_outside_the_core() {
        let stencil = stencil();
        let (mask, offset) = build_mask(with_side(Side::Top, EdgeShape::Convex), 100, &stencil);
        assert_eq!(offset.top, 20);
        for y in 0..20 {
            for x in 0..40 {
                assert_eq!(mask.get(30 + x, y), stencil.up().get(x, y));
            }
            assert_eq!(mask.get(0, y), 0.0);
        }
    }

    #[test]
    fn each_convex_side_uses_its_own_variant() {
        let stencil = stencil();
        let cases = [
            (Side::Top, (30, 0), stencil.up()),
            (Side::Bottom, (30, 100), stencil.down()),
            (Side::Left, (0, 30), stencil.left()),
            (Side::Right, (100, 30), stencil.right()),
        ];
        for (side, (x0, y0), variant) in cases {
            let (mask, _) = build_mask(with_side(side, EdgeShape::Convex), 100, &stencil);
            assert_block(&mask, x0, y0, variant, side);
        }
    }

    #[test]
    fn four_tabs_land_on_their_sides() {
        let stencil = stencil();
        let edges = PieceEdges::new(
            EdgeShape::Convex,
            EdgeShape::Convex,
            EdgeShape::Convex,
            EdgeShape::Convex,
        );
        let (mask, offset) = build_mask(edges, 50, &stencil);
        assert_eq!(mask.size(), (90, 90));
        assert_eq!(offset.horizontal(), 40);
        // Tabs start 5 px into the 50 px side, past the 20 px canvas band.
        assert_block(&mask, 25, 0, stencil.up(), Side::Top);
        assert_block(&mask, 25, 70, stencil.down(), Side::Bottom);
        assert_block(&mask, 0, 25, stencil.left(), Side::Left);
        assert_block(&mask, 70, 25, stencil.right(), Side::Right);
        assert_eq!(mask.get(0, 0), 0.0);
        assert_eq!(mask.get(89, 89), 0.0);
    }

    #[test]
    fn concave_socket_removes_coverage_from_the_core() {
        let stencil = stencil();
        let (mask, offset) = build_mask(with_side(Side::Left, EdgeShape::Concave), 100, &stencil);
        assert_eq!(offset, CanvasOffset::default());
        let expected = 100.0 * 100.0 - stencil.right().coverage();
        assert!((mask.coverage() - expected).abs() < 1e-2);
    }

    /// Image-space placement of a mask and the region two masks share.
    struct Shared<'a> {
        a: (&'a AlphaMask, (i64, i64)),
        b: (&'a AlphaMask, (i64, i64)),
        band: (i64, i64, i64, i64),
    }

    fn assert_band_sums_to_one(shared: Shared<'_>) {
        let (a, a_origin) = shared.a;
        let (b, b_origin) = shared.b;
        let (x0, y0, x1, y1) = shared.band;
        for y in y0..y1 {
            for x in x0..x1 {
                let va = a.get((x - a_origin.0) as u32, (y - a_origin.1) as u32);
                let vb = b.get((x - b_origin.0) as u32, (y - b_origin.1) as u32);
                assert!(
                    (va + vb - 1.0).abs() < 1e-5,
                    "gap or overlap at ({x}, {y}): {va} + {vb}"
                );
            }
        }
    }

    #[test]
    fn horizontal_neighbours_fit_pixel_for_pixel() {
        let stencil = stencil();
        let base = 100;
        for shape in [EdgeShape::Convex, EdgeShape::Concave] {
            let (west, west_off) = build_mask(with_side(Side::Right, shape), base, &stencil);
            let (east, east_off) = build_mask(with_side(Side::Left, -shape), base, &stencil);
            // Image-space origin of each mask: cell corner minus canvas offset.
            let west_origin = (-(west_off.left as i64), -(west_off.top as i64));
            let east_origin = (base as i64 - east_off.left as i64, -(east_off.top as i64));
            let t = stencil.thickness() as i64;
            let base = base as i64;
            let band = match shape {
                EdgeShape::Convex => (base, 0, base + t, base),
                _ => (base - t, 0, base, base),
            };
            assert_band_sums_to_one(Shared {
                a: (&west, west_origin),
                b: (&east, east_origin),
                band,
            });
        }
    }

    #[test]
    fn vertical_neighbours_fit_pixel_for_pixel() {
        let stencil = stencil();
        let base = 100;
        for shape in [EdgeShape::Convex, EdgeShape::Concave] {
            let (north, north_off) = build_mask(with_side(Side::Bottom, shape), base, &stencil);
            let (south, south_off) = build_mask(with_side(Side::Top, -shape), base, &stencil);
            let north_origin = (-(north_off.left as i64), -(north_off.top as i64));
            let south_origin = (-(south_off.left as i64), base as i64 - south_off.top as i64);
            let t = stencil.thickness() as i64;
            let base = base as i64;
            let band = match shape {
                EdgeShape::Convex => (0, base, base, base + t),
                _ => (0, base - t, base, base),
            };
            assert_band_sums_to_one(Shared {
                a: (&north, north_origin),
                b: (&south, south_origin),
                band,
            });
        }
    }
}
