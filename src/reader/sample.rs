use std::collections::BTreeSet;

use image::Rgb;
use tracing::{debug, warn};

use crate::common::{
    check_pixel_limit, classify, consistent_bases, exact_base, infer_base, is_clean_text, Base,
    BlockGeometry, CodecResult, ColorName, ColorTable, Scheme,
};

// Iterator over block centers, row-major
//------------------------------------------------------------------------------

#[derive(Clone)]
pub struct CellIter {
    w: u32,
    h: u32,
    bw: u32,
    bh: u32,
    cols: u32,
    rows: u32,
    idx: u64,
}

impl CellIter {
    pub fn new(w: u32, h: u32, geometry: BlockGeometry) -> Self {
        let (bw, bh) = (geometry.width(), geometry.height());
        // Partial blocks at the right and bottom edges are ignored
        Self { w, h, bw, bh, cols: w / bw, rows: h / bh, idx: 0 }
    }

    pub fn grid(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }
}

impl Iterator for CellIter {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.cols as u64 * self.rows as u64;
        while self.idx < total {
            let (row, col) = (self.idx / self.cols as u64, self.idx % self.cols as u64);
            self.idx += 1;

            let x = col * self.bw as u64 + (self.bw / 2) as u64;
            let y = row * self.bh as u64 + (self.bh / 2) as u64;
            if x < self.w as u64 && y < self.h as u64 {
                return Some((x as u32, y as u32));
            }
        }
        None
    }
}


// Extraction
//------------------------------------------------------------------------------

// Digit string of the sampled colors under one table
fn to_digits(colors: &[ColorName], table: ColorTable, scheme: Scheme) -> String {
    colors
        .iter()
        .filter_map(|&c| match (c.is_background(), scheme) {
            (true, Scheme::Legacy) => None,
            (true, Scheme::Fixed) => Some('0'),
            (false, _) => Some(table.digit_or_zero(c)),
        })
        .collect()
}

// Picks the base of an unlabeled image. Candidates must hold every observed color and read
// as text: the table matching the colors exactly goes first, then the largest base. With no
// readable candidate the choice falls back to the colors alone.
fn resolve_base(colors: &[ColorName], scheme: Scheme) -> Base {
    let observed = colors.iter().copied().collect::<BTreeSet<_>>();
    if scheme == Scheme::Legacy || observed.iter().all(|c| c.is_background()) {
        return infer_base(&observed, scheme);
    }

    let reads_as_text = |b: Base| {
        let digits = to_digits(colors, ColorTable::new(b), scheme);
        is_clean_text(&digits, b, scheme)
    };
    let readable = exact_base(&observed)
        .filter(|&b| reads_as_text(b))
        .or_else(|| consistent_bases(&observed).into_iter().rev().find(|&b| reads_as_text(b)));

    match readable {
        Some(base) => {
            debug!(%base, "Inferred base reads as text");
            base
        }
        None => {
            warn!("No candidate base reads as text, deciding from colors alone");
            infer_base(&observed, scheme)
        }
    }
}

/// Samples the block grid of a `width` x `height` raster through `sample` and rebuilds the
/// digit string. When `base` is `None` it is inferred from the colors found.
pub(crate) fn extract_with<F>(
    (width, height): (u32, u32),
    sample: F,
    geometry: BlockGeometry,
    base: Option<Base>,
    ignore_pixel_limit: bool,
    scheme: Scheme,
) -> CodecResult<(String, Base)>
where
    F: Fn(u32, u32) -> Rgb<u8>,
{
    check_pixel_limit(width, height, ignore_pixel_limit)?;

    let cells = CellIter::new(width, height, geometry);
    let (cols, rows) = cells.grid();
    debug!(width, height, cols, rows, block = %geometry, "Sampling block grid");

    let colors = cells.map(|(x, y)| classify(sample(x, y))).collect::<Vec<ColorName>>();
    let base = base.unwrap_or_else(|| resolve_base(&colors, scheme));
    let digits = to_digits(&colors, ColorTable::new(base), scheme);

    debug!(%base, digits = digits.len(), "Extracted digits");
    Ok((digits, base))
}
