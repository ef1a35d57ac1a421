//! # chromablock
//!
//! A Rust library for encoding text and files into images made of solid colored blocks and
//! reading them back. Every byte is written as digits in a radix between 2 and 16 and every
//! digit is painted as one block, using a fixed color table per radix.
//!
//! ## Features
//!
//! - **Image Generation**: Paint any payload as a grid of blocks with configurable block size, row width and radix
//! - **Image Reading**: Sample the grid back into digits, inferring the radix from the colors when it is unknown
//! - **File Packing**: Carry whole files as a self-describing `FILEINFO` text record
//! - **Pixel Guard**: Refuse to build or sample oversized images unless explicitly allowed
//!
//! ## Quick Start
//!
//! ### Simple Text Encoding
//!
//! ```rust
//! use chromablock::{ImageBuilder, ImageReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults: base 2, 9x16 blocks, rows wrap at 800 pixels
//! let encoded = ImageBuilder::new(b"Hi").build()?;
//! assert_eq!(encoded.digits(), "0100100001101001");
//! assert_eq!(encoded.image().dimensions(), (144, 16));
//!
//! // The base is inferred from the colors when not given
//! let decoded = ImageReader::new(encoded.image()).read_text()?;
//! assert_eq!(decoded.text(), "Hi");
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use chromablock::{Base, BlockGeometry, ImageBuilder, ImageReader, Scheme};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = "Hello, World!";
//! let geometry = BlockGeometry::new(6, 10)?;
//! let encoded = ImageBuilder::new(data.as_bytes())
//!     .base(Base::new(7)?)        // Radix - defaults to 2
//!     .geometry(geometry)         // Block size in pixels - defaults to 9x16
//!     .max_width(120)             // Row wrap width in pixels - defaults to 800
//!     .ignore_pixel_limit(false)  // Allow images past 50M pixels - defaults to false
//!     .scheme(Scheme::Fixed)      // Digit grouping contract - defaults to Scheme::Fixed
//!     .build()?;
//!
//! let decoded = ImageReader::new(encoded.image())
//!     .base(Some(Base::new(7)?))
//!     .geometry(geometry)
//!     .read_text()?;
//! assert_eq!(decoded.text(), data);
//! # Ok(())
//! # }
//! ```
//!
//! ### Files
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use chromablock::{storage, Base, ImageBuilder, ImageReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record = storage::read_payload_file(Path::new("report.pdf"))?;
//! let text = record.to_string(); // FILEINFO:report.pdf:.pdf:<base64>
//! let encoded = ImageBuilder::new(text.as_bytes()).base(Base::HEX).build()?;
//! let path = storage::save_image(encoded.image(), Path::new("report.png"))?;
//!
//! let img = storage::load_image(&path, false)?;
//! let record = ImageReader::new(&img).read_file()?;
//! storage::write_payload_file(&record, Path::new("restored"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Color Tables
//!
//! Digit `0` is always white, the background color, so a `0` block cannot be told apart
//! from empty space. Base 2 paints `1` black. Bases 3 to 11 grow from blue and green through
//! cyan, yellow, magenta, orange, purple, pink and brown, always ending on red. Bases 12 to
//! 15 append darkred, maroon, crimson and firebrick, and base 16 ends on black.
//!
//! ## Schemes
//!
//! [`Scheme::Fixed`] writes every byte as the same number of digits, enough for 255 in the
//! chosen base, so payloads survive a round trip in every base. [`Scheme::Legacy`] reads and
//! writes images in the format of the first generation of encoders.

pub mod builder;
pub(crate) mod common;
pub mod package;
pub mod reader;
pub mod storage;

pub use builder::{Encoded, ImageBuilder, DEFAULT_MAX_WIDTH};
pub use common::{
    bases_with, check_pixel_limit, classify, consistent_bases, decode_digits, decode_text,
    encode_digits, exact_base, infer_base, is_clean_text, Base, BlockGeometry, CodecError,
    CodecResult, ColorName, ColorTable, Scheme, MAX_PIXELS,
};
pub use package::{FileRecord, MAX_FILE_SIZE};
pub use reader::{Decoded, ImageReader};
