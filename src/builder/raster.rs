use image::RgbImage;
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use crate::common::{
    check_pixel_limit, Base, BlockGeometry, CodecError, CodecResult, ColorName, ColorTable,
    MAX_PIXELS,
};

// Layout
//------------------------------------------------------------------------------

/// Placement of a digit string on the block grid. Digits run left to right, top to
/// bottom, wrapping after `chars_per_row` blocks.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Layout {
    pub chars_per_row: u32,
    pub rows: u32,
    pub width: u32,
    pub height: u32,
}

impl Layout {
    pub fn new(len: usize, geometry: BlockGeometry, max_width: u32) -> CodecResult<Self> {
        if len == 0 {
            return Err(CodecError::EmptyData);
        }
        if max_width == 0 {
            return Err(CodecError::InvalidMaxWidth);
        }

        let (bw, bh) = (geometry.width() as u64, geometry.height() as u64);
        let len = len as u64;
        let chars_per_row = (max_width as u64 / bw).max(1);
        let rows = len.div_ceil(chars_per_row);
        let width = chars_per_row.min(len) * bw;
        let height = rows * bh;

        // Dimensions past u32 can never be allocated, limit or not
        let too_big = || CodecError::PixelLimitExceeded {
            width: width.min(u32::MAX as u64) as u32,
            height: height.min(u32::MAX as u64) as u32,
            pixels: width.saturating_mul(height),
            limit: MAX_PIXELS,
        };
        let rows = u32::try_from(rows).map_err(|_| too_big())?;
        let width = u32::try_from(width).map_err(|_| too_big())?;
        let height = u32::try_from(height).map_err(|_| too_big())?;

        Ok(Self { chars_per_row: chars_per_row as u32, rows, width, height })
    }

    pub fn cell_origin(&self, index: usize, geometry: BlockGeometry) -> (u32, u32) {
        let i = index as u64;
        let cpr = self.chars_per_row as u64;
        let (row, col) = (i / cpr, i % cpr);
        ((col * geometry.width() as u64) as u32, (row * geometry.height() as u64) as u32)
    }
}


// Rasterize
//------------------------------------------------------------------------------

/// Paints a digit string as a grid of solid blocks on a white canvas, one block per digit.
/// Symbols outside the base are painted with the base's highest digit color so that they
/// stand out instead of vanishing into the background.
pub fn rasterize(
    digits: &str,
    base: Base,
    geometry: BlockGeometry,
    max_width: u32,
    ignore_pixel_limit: bool,
) -> CodecResult<(RgbImage, Layout)> {
    let layout = Layout::new(digits.chars().count(), geometry, max_width)?;
    check_pixel_limit(layout.width, layout.height, ignore_pixel_limit)?;

    let table = ColorTable::new(base);
    let mut canvas = RgbImage::from_pixel(layout.width, layout.height, ColorName::BACKGROUND.rgb());
    for (i, d) in digits.chars().enumerate() {
        let color = table.paint_color(d);
        if color.is_background() {
            continue;
        }
        let (x, y) = layout.cell_origin(i, geometry);
        let rect = Rect::at(x as i32, y as i32).of_size(geometry.width(), geometry.height());
        draw_filled_rect_mut(&mut canvas, rect, color.rgb());
    }

    Ok((canvas, layout))
}
