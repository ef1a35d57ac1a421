use tracing::warn;

use super::{CodecError, CodecResult};

// Pixel limit
//------------------------------------------------------------------------------

/// Largest raster, in pixels, built or sampled without an explicit opt-in.
pub const MAX_PIXELS: u64 = 50_000_000;

/// Rejects rasters above [`MAX_PIXELS`] unless `ignore_limit` is set. Runs before any
/// canvas is allocated on the encode side and before any pixel is read on the decode side.
pub fn check_pixel_limit(width: u32, height: u32, ignore_limit: bool) -> CodecResult<()> {
    let pixels = width as u64 * height as u64;
    if pixels <= MAX_PIXELS {
        return Ok(());
    }
    if ignore_limit {
        warn!(width, height, pixels, limit = MAX_PIXELS, "Pixel limit bypassed");
        return Ok(());
    }
    Err(CodecError::PixelLimitExceeded { width, height, pixels, limit: MAX_PIXELS })
}
