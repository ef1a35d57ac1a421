mod sample;

pub use sample::CellIter;

use image::{GenericImageView, Rgb};
use tracing::debug;

use crate::common::{decode_digits, decode_text, Base, BlockGeometry, CodecResult, Scheme};
use crate::package::FileRecord;
use sample::extract_with;

// Reader
//------------------------------------------------------------------------------

pub struct ImageReader<'a, I> {
    img: &'a I,
    base: Option<Base>,
    geometry: BlockGeometry,
    ignore_pixel_limit: bool,
    scheme: Scheme,
}

impl<'a, I> ImageReader<'a, I>
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    pub fn new(img: &'a I) -> Self {
        Self {
            img,
            base: None,
            geometry: BlockGeometry::recommended_for_decode(),
            ignore_pixel_limit: false,
            scheme: Scheme::Fixed,
        }
    }

    /// Base the image was built with. Left unset, it is inferred from the colors found.
    pub fn base(&mut self, base: Option<Base>) -> &mut Self {
        self.base = base;
        self
    }

    pub fn geometry(&mut self, geometry: BlockGeometry) -> &mut Self {
        self.geometry = geometry;
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
        let base = self.base.map_or_else(|| "infer".to_string(), |b| b.to_string());
        format!("{{ Base: {}, Block: {}, Scheme: {:?} }}", base, self.geometry, self.scheme)
    }
}


// Read
//------------------------------------------------------------------------------

/// Result of a decode: the text recovered along with the digits and base it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    text: String,
    digits: String,
    base: Base,
}

impl Decoded {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn base(&self) -> Base {
        self.base
    }
}

impl<I> ImageReader<'_, I>
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    /// Samples every block and returns the digit string along with the base used to read it.
    pub fn extract(&self) -> CodecResult<(String, Base)> {
        debug!("Reading image {}...", self.metadata());
        extract_with(
            self.img.dimensions(),
            |x, y| self.img.get_pixel(x, y),
            self.geometry,
            self.base,
            self.ignore_pixel_limit,
            self.scheme,
        )
    }

    /// Payload bytes as they were handed to the builder. Trailing NUL bytes cannot be told
    /// apart from the background padding of the last row and are dropped.
    pub fn read_bytes(&self) -> CodecResult<(Vec<u8>, Base)> {
        let (digits, base) = self.extract()?;
        let bytes = decode_digits(&digits, base, self.scheme);
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Ok((bytes[..end].to_vec(), base))
    }

    pub fn read_text(&self) -> CodecResult<Decoded> {
        let (digits, base) = self.extract()?;

        debug!("Decoding {} digits in base {}...", digits.len(), base);
        let text = decode_text(&digits, base, self.scheme);

        Ok(Decoded { text, digits, base })
    }

    /// Decodes an image built from a [`FileRecord`] and unpacks the record.
    pub fn read_file(&self) -> CodecResult<FileRecord> {
        let decoded = self.read_text()?;

        debug!("Unpacking file record...");
        decoded.text().parse()
    }
}

#[cfg(test)]
mod reader_tests {
    use image::{Rgb, RgbImage};

    use super::ImageReader;
    use crate::builder::ImageBuilder;
    use crate::common::{Base, BlockGeometry, CodecError, Scheme};
    use crate::package::FileRecord;

    #[test]
    fn test_read_hi() {
        let img = ImageBuilder::new(b"Hi").build().unwrap().into_image();
        let decoded = ImageReader::new(&img).base(Some(Base::BINARY)).read_text().unwrap();
        assert_eq!(decoded.text(), "Hi");
        assert_eq!(decoded.digits(), "0100100001101001");
    }

    #[test]
    fn test_read_infers_base() {
        let data = "The quick brown fox jumps over the lazy dog";
        let img = ImageBuilder::new(data.as_bytes()).base(Base::HEX).build().unwrap().into_image();
        let decoded = ImageReader::new(&img).read_text().unwrap();
        assert_eq!(decoded.base(), Base::HEX);
        assert_eq!(decoded.text(), data);
    }

    #[test]
    fn test_read_bytes_drops_row_padding() {
        let data: [u8; 5] = [0xDE, 0xAD, 0xBE, 0xEF, 0x01];
        let g = BlockGeometry::new(4, 4).unwrap();
        let img = ImageBuilder::new(&data)
            .base(Base::new(5).unwrap())
            .geometry(g)
            .max_width(28)
            .build()
            .unwrap()
            .into_image();
        let (bytes, base) = ImageReader::new(&img)
            .base(Some(Base::new(5).unwrap()))
            .geometry(g)
            .read_bytes()
            .unwrap();
        assert_eq!(base, Base::new(5).unwrap());
        assert_eq!(bytes, data);
    }

    #[test]
    fn test_read_legacy_hex() {
        let img = ImageBuilder::new(b"Hi").base(Base::HEX).scheme(Scheme::Legacy).build().unwrap();
        let img = img.into_image();
        let decoded = ImageReader::new(&img).scheme(Scheme::Legacy).read_text().unwrap();
        assert_eq!(decoded.base(), Base::HEX);
        assert_eq!(decoded.text(), "Hi");
    }

    #[test]
    fn test_read_file() {
        let record = FileRecord::new(vec![1, 2, 3], "a.bin", ".bin").unwrap();
        let text = record.to_string();
        let img = ImageBuilder::new(text.as_bytes()).base(Base::new(8).unwrap()).build().unwrap();
        let img = img.into_image();
        let read = ImageReader::new(&img).read_file().unwrap();
        assert_eq!(read, record);
    }

    #[test]
    fn test_read_file_rejects_plain_text() {
        let img = ImageBuilder::new(b"plain text").build().unwrap().into_image();
        let res = ImageReader::new(&img).read_file();
        assert!(matches!(res, Err(CodecError::InvalidFormat(_))));
    }

    #[test]
    fn test_read_blank_image() {
        let img = RgbImage::from_pixel(90, 16, Rgb([255, 255, 255]));
        let decoded = ImageReader::new(&img).read_text().unwrap();
        assert_eq!(decoded.base(), Base::BINARY);
        assert_eq!(decoded.text(), "");
    }
}
