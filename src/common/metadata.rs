use std::fmt::{Display, Formatter};
use std::ops::Deref;

use super::{guard::MAX_PIXELS, CodecError, CodecResult};

// Base
//------------------------------------------------------------------------------

/// Radix used to turn bytes into digits. Also selects the color table.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct Base(u32);

impl Base {
    pub const MIN: u32 = 2;
    pub const MAX: u32 = 16;

    pub const BINARY: Base = Base(2);
    pub const HEX: Base = Base(16);

    pub fn new(radix: u32) -> CodecResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&radix) {
            return Err(CodecError::InvalidBase(radix));
        }
        Ok(Self(radix))
    }

    pub fn all() -> impl Iterator<Item = Base> {
        (Self::MIN..=Self::MAX).map(Base)
    }

    // Smallest number of digits able to hold any byte, i.e. ceil(log_base(256))
    pub fn digit_width(self) -> usize {
        let mut width = 1;
        let mut span = self.0;
        while span < 256 {
            span *= self.0;
            width += 1;
        }
        width
    }

    pub fn max_digit(self) -> char {
        digit_char(self.0 - 1)
    }
}

impl Deref for Base {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u32> for Base {
    type Error = CodecError;
    fn try_from(radix: u32) -> Result<Self, Self::Error> {
        Self::new(radix)
    }
}

impl Default for Base {
    fn default() -> Self {
        Self::BINARY
    }
}

impl Display for Base {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) fn digit_char(value: u32) -> char {
    char::from_digit(value, 16).map(|c| c.to_ascii_uppercase()).unwrap_or('?')
}


// Scheme
//------------------------------------------------------------------------------

/// Digit grouping contract shared by the encoder and the reader.
///
/// `Fixed` writes every byte as exactly [`Base::digit_width`] digits and reads background
/// cells back as `'0'`, so any payload survives a round trip in any base.
///
/// `Legacy` matches images made by the first generation of encoders. Groups are padded
/// to at least two digits but never truncated, decoding always consumes two digits per
/// byte, background cells are skipped and base inference picks the largest candidate.
/// Round trips only hold in base 16 for payloads without zero digits.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Scheme {
    #[default]
    Fixed,
    Legacy,
}

impl Scheme {
    pub fn group_width(self, base: Base) -> usize {
        match self {
            Self::Fixed => base.digit_width(),
            Self::Legacy => 2,
        }
    }
}

// Block geometry
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct BlockGeometry {
    width: u32,
    height: u32,
}

impl BlockGeometry {
    pub const DEFAULT: BlockGeometry = BlockGeometry { width: 9, height: 16 };

    pub fn new(width: u32, height: u32) -> CodecResult<Self> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl Default for BlockGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for BlockGeometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// Recommended geometry
//------------------------------------------------------------------------------

impl BlockGeometry {
    /// Block size suggested for a text payload of `text_len` characters. Short texts and
    /// dense bases get smaller blocks, binary gets larger ones to stay legible.
    pub fn recommended_for_text(text_len: usize, base: Base) -> Self {
        let length_factor = match text_len {
            0..=99 => 0.7,
            100..=999 => 1.0,
            _ => 1.3,
        };
        let base_factor = match *base {
            2 => 1.4,
            3 => 1.2,
            4 => 1.0,
            5..=8 => 0.9,
            9..=10 => 0.8,
            _ => 0.7,
        };

        let scale = length_factor * base_factor;
        let mut width = ((Self::DEFAULT.width as f64 * scale) as u32).clamp(5, 20);
        let mut height = ((Self::DEFAULT.height as f64 * scale) as u32).clamp(8, 30);

        let aspect = width as f64 / height as f64;
        if aspect < 0.4 {
            width = (height as f64 * 0.5) as u32;
        } else if aspect > 1.0 {
            height = (width as f64 * 1.2) as u32;
        }

        Self { width, height }
    }

    /// Block size suggested for a file of `file_size` bytes. Picks the smallest block that
    /// keeps the estimated image under the pixel limit, then scales it by base density.
    pub fn recommended_for_file(file_size: u64, base: Base) -> Self {
        let size_factor = if file_size > 0 {
            ((file_size as f64 / 1024.0 + 1.0).log10() / 2.0 + 0.5).clamp(0.5, 2.0)
        } else {
            1.0
        };

        // Base64 inflates by ~1.33, with a 1.5 safety margin on top
        let estimated_chars = (file_size as f64 * 1.33 * 1.5) as u64;
        let (mut width, mut height) = if estimated_chars > 0 {
            let min_block = (MAX_PIXELS as f64 / (estimated_chars as f64 * 1.8)).sqrt().max(5.0);
            let width = ((min_block * size_factor) as u32).clamp(5, 15);
            let height = ((width as f64 * 1.8) as u32).clamp(8, 25);
            (width, height)
        } else {
            (Self::DEFAULT.width, Self::DEFAULT.height)
        };

        let scale = |v: u32, f: f64| (v as f64 * f) as u32;
        match *base {
            2 | 3 | 4 => {
                let f = match *base {
                    2 => 1.4,
                    3 => 1.2,
                    _ => 1.0,
                };
                width = scale(width, f).min(15);
                height = scale(height, f).min(25);
            }
            _ => {
                let f = match *base {
                    5..=8 => 0.9,
                    9..=10 => 0.8,
                    _ => 0.7,
                };
                width = scale(width, f).max(5);
                height = scale(height, f).max(8);
            }
        }

        Self { width, height }
    }

    /// Decoding has no payload to size against, so the default is the recommendation.
    pub fn recommended_for_decode() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod geometry_tests {
    use test_case::test_case;

    use super::{Base, BlockGeometry};

    #[test]
    fn test_zero_sides_rejected() {
        assert!(BlockGeometry::new(0, 16).is_err());
        assert!(BlockGeometry::new(9, 0).is_err());
        assert_eq!(BlockGeometry::new(9, 16).unwrap(), BlockGeometry::default());
    }

    #[test_case(50, 2, (8, 15))]
    #[test_case(50, 16, (5, 8))]
    #[test_case(500, 4, (9, 16))]
    #[test_case(5000, 2, (16, 29))]
    #[test_case(5000, 10, (9, 16))]
    fn test_recommended_for_text(len: usize, radix: u32, exp: (u32, u32)) {
        let g = BlockGeometry::recommended_for_text(len, Base::new(radix).unwrap());
        assert_eq!((g.width(), g.height()), exp);
    }

    #[test_case(0, 2, (12, 22))]
    #[test_case(0, 4, (9, 16))]
    #[test_case(0, 16, (6, 11))]
    fn test_recommended_for_empty_file(size: u64, radix: u32, exp: (u32, u32)) {
        let g = BlockGeometry::recommended_for_file(size, Base::new(radix).unwrap());
        assert_eq!((g.width(), g.height()), exp);
    }

    #[test]
    fn test_recommended_for_file_stays_in_bounds() {
        for size in [1, 1024, 100 * 1024, 1024 * 1024, 10 * 1024 * 1024] {
            for base in Base::all() {
                let g = BlockGeometry::recommended_for_file(size, base);
                assert!((5..=15).contains(&g.width()), "width {} for {size} {base}", g.width());
                assert!((8..=25).contains(&g.height()), "height {} for {size} {base}", g.height());
            }
        }
    }
}
