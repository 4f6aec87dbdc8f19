//! Cutting piece textures out of the source image.
//!
//! Piece masks live in "base grid" units (`base_size` per cell). The source image may have a
//! different resolution, so crop rectangles are scaled by the image-to-grid ratio and truncated
//! to whole pixels. When the image size is not a multiple of the grid size the truncation makes
//! neighbouring rectangles drift by up to a pixel; this is a known precision limit.
use glam::DVec2;
use image::{imageops, RgbaImage};

use crate::error::{Error, Result};
use crate::piece::Piece;
use crate::raster::{AlphaMask, PixelRect};

/// Image pixels per base-grid pixel on each axis.
pub fn size_ratio(image_size: (u32, u32), cols: u32, rows: u32, base_size: u32) -> DVec2 {
    DVec2::new(
        image_size.0 as f64 / cols as f64 / base_size as f64,
        image_size.1 as f64 / rows as f64 / base_size as f64,
    )
}

/// Source-image rectangle covered by the expanded canvas of `piece`.
///
/// Image rows run top-down, so grid row 0 maps to the topmost strip of the image.
pub fn crop_rect(piece: &Piece, ratio: DVec2) -> PixelRect {
    let off = piece.canvas_offset;
    let base = piece.base_size as f64;
    let x = ((piece.col as f64 * base - off.left as f64) * ratio.x).floor();
    let y = ((piece.row as f64 * base - off.top as f64) * ratio.y).floor();
    let w = (piece.mask_width() as f64 * ratio.x).floor();
    let h = (piece.mask_height() as f64 * ratio.y).floor();
    PixelRect::new(x as i32, y as i32, w as u32, h as u32)
}

/// Multiplies the alpha of every pixel by the nearest mask value. RGB is left untouched.
pub fn apply_mask(texture: &mut RgbaImage, mask: &AlphaMask) {
    let (w, h) = texture.dimensions();
    for (x, y, px) in texture.enumerate_pixels_mut() {
        let m = mask.sample_nearest(x, y, w, h);
        px[3] = (px[3] as f32 * m).round() as u8;
    }
}

/// Crops the piece's region from `image` and masks it.
pub fn extract_piece(image: &RgbaImage, piece: &Piece, ratio: DVec2) -> Result<RgbaImage> {
    let rect = crop_rect(piece, ratio);
    let (iw, ih) = image.dimensions();
    if !rect.fits_within(iw, ih) {
        return Err(Error::ImageBounds {
            col: piece.col,
            row: piece.row,
            rect,
            image_size: (iw, ih),
        });
    }
    let mut texture =
        imageops::crop_imm(image, rect.x as u32, rect.y as u32, rect.width, rect.height)
            .to_image();
    apply_mask(&mut texture, &piece.mask);
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::edge::{EdgeShape, PieceEdges};
    use crate::stencil::TabStencil;

    fn stencil() -> TabStencil {
        TabStencil::classic(20, 10).unwrap()
    }

    fn right_tab() -> PieceEdges {
        PieceEdges::new(
            EdgeShape::Flat,
            EdgeShape::Flat,
            EdgeShape::Flat,
            EdgeShape::Convex,
        )
    }

    fn two_tone(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |_, y| {
            if y < height / 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn size_ratio_divides_image_by_grid() {
        let r = size_ratio((400, 150), 2, 3, 100);
        assert_eq!(r, DVec2::new(2.0, 0.5));
    }

    #[test]
    fn row_zero_is_the_top_strip() {
        let image = two_tone(50, 100);
        let piece = Piece::new(0, 0, PieceEdges::flat(), 50, &stencil());
        let ratio = size_ratio(image.dimensions(), 1, 2, 50);
        let tex = extract_piece(&image, &piece, ratio).unwrap();
        assert_eq!(tex.dimensions(), (50, 50));
        assert_eq!(tex.get_pixel(10, 10).0, [255, 0, 0, 255]);

        let bottom = Piece::new(0, 1, PieceEdges::flat(), 50, &stencil());
        let tex = extract_piece(&image, &bottom, ratio).unwrap();
        assert_eq!(tex.get_pixel(10, 10).0, [0, 0, 255, 255]);
    }

    #[test]
    fn crop_rect_includes_convex_padding() {
        let edges = PieceEdges::new(
            EdgeShape::Convex,
            EdgeShape::Convex,
            EdgeShape::Flat,
            EdgeShape::Flat,
        );
        let piece = Piece::new(1, 1, edges, 50, &stencil());
        let rect = crop_rect(&piece, DVec2::ONE);
        assert_eq!(rect, PixelRect::new(40, 40, 60, 60));

        let scaled = crop_rect(&piece, DVec2::new(2.0, 0.5));
        assert_eq!(scaled, PixelRect::new(80, 20, 120, 30));
    }

    #[test]
    fn masking_only_touches_alpha() {
        let image = RgbaImage::from_fn(100, 50, |x, y| Rgba([x as u8, y as u8, 7, 200]));
        let piece = Piece::new(0, 0, right_tab(), 50, &stencil());
        let tex = extract_piece(&image, &piece, DVec2::ONE).unwrap();
        assert_eq!(tex.dimensions(), (60, 50));
        for (x, y, px) in tex.enumerate_pixels() {
            assert_eq!(&px.0[..3], &[x as u8, y as u8, 7]);
            let m = piece.mask.get(x, y);
            assert_eq!(px[3], (200.0 * m).round() as u8);
            if m == 0.0 {
                assert_eq!(px[3], 0);
            }
        }
    }

    #[test]
    fn mask_is_resampled_to_image_resolution() {
        let image = RgbaImage::from_pixel(200, 100, Rgba([1, 2, 3, 255]));
        let piece = Piece::new(0, 0, right_tab(), 50, &stencil());
        let tex = extract_piece(&image, &piece, DVec2::new(2.0, 2.0)).unwrap();
        assert_eq!(tex.dimensions(), (120, 100));
        for (x, y, px) in tex.enumerate_pixels() {
            let expected = (255.0 * piece.mask.get(x / 2, y / 2)).round() as u8;
            assert_eq!(px[3], expected);
        }
    }

    #[test]
    fn out_of_bounds_crop_is_an_error() {
        let image = RgbaImage::new(50, 50);
        let piece = Piece::new(1, 0, PieceEdges::flat(), 50, &stencil());
        let err = extract_piece(&image, &piece, DVec2::ONE).unwrap_err();
        assert!(matches!(err, Error::ImageBounds { col: 1, row: 0, .. }));
    }
}
