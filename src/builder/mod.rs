mod raster;

pub use raster::{rasterize, Layout};

use image::RgbImage;
use tracing::debug;

use crate::common::{encode_digits, Base, BlockGeometry, CodecResult, Scheme};

pub const DEFAULT_MAX_WIDTH: u32 = 800;

// Builder
//------------------------------------------------------------------------------

pub struct ImageBuilder<'a> {
    data: &'a [u8],
    base: Base,
    geometry: BlockGeometry,
    max_width: u32,
    ignore_pixel_limit: bool,
    scheme: Scheme,
}

impl<'a> ImageBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            base: Base::BINARY,
            geometry: BlockGeometry::DEFAULT,
            max_width: DEFAULT_MAX_WIDTH,
            ignore_pixel_limit: false,
            scheme: Scheme::Fixed,
        }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn base(&mut self, base: Base) -> &mut Self {
        self.base = base;
        self
    }

    pub fn geometry(&mut self, geometry: BlockGeometry) -> &mut Self {
        self.geometry = geometry;
        self
    }

    /// Width in pixels after which rows wrap. Always fits at least one block per row.
    pub fn max_width(&mut self, max_width: u32) -> &mut Self {
        self.max_width = max_width;
        self
    }

    pub fn ignore_pixel_limit(&mut self, ignore: bool) -> &mut Self {
        self.ignore_pixel_limit = ignore;
        self
    }

    pub fn scheme(&mut self, scheme: Scheme) -> &mut Self {
        self.scheme = scheme;
        self
    }

    pub fn metadata(&self) -> String {
        format!(
            "{{ Base: {}, Block: {}, Max width: {}, Scheme: {:?} }}",
            self.base, self.geometry, self.max_width, self.scheme
        )
    }
}


// Build
//------------------------------------------------------------------------------

/// Result of an encode: the digit string and the raster painted from it.
#[derive(Debug, Clone)]
pub struct Encoded {
    digits: String,
    image: RgbImage,
    base: Base,
    layout: Layout,
}

impl Encoded {
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn base(&self) -> Base {
        self.base
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }
}

impl ImageBuilder<'_> {
    pub fn build(&self) -> CodecResult<Encoded> {
        debug!("Generating image {}...", self.metadata());

        debug!("Encoding {} bytes to digits...", self.data.len());
        let digits = encode_digits(self.data, self.base, self.scheme);

        debug!("Painting {} blocks...", digits.len());
        let (image, layout) =
            rasterize(&digits, self.base, self.geometry, self.max_width, self.ignore_pixel_limit)?;

        debug!(
            width = layout.width,
            height = layout.height,
            rows = layout.rows,
            "Image generated"
        );

        Ok(Encoded { digits, image, base: self.base, layout })
    }
}
