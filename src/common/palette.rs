use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use image::Rgb;
use tracing::debug;

use super::metadata::{digit_char, Base, Scheme};
use ColorName::*;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub enum ColorName {
    White,
    Black,
    Blue,
    Red,
    Green,
    Yellow,
    Cyan,
    Magenta,
    Orange,
    Purple,
    Pink,
    Brown,
    DarkRed,
    Maroon,
    Crimson,
    Firebrick,
}

impl ColorName {
    pub const ALL: [ColorName; 16] = [
        Self::White,
        Self::Black,
        Self::Blue,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Cyan,
        Self::Magenta,
        Self::Orange,
        Self::Purple,
        Self::Pink,
        Self::Brown,
        Self::DarkRed,
        Self::Maroon,
        Self::Crimson,
        Self::Firebrick,
    ];

    pub const BACKGROUND: ColorName = Self::White;

    /// Color painted into the raster, the usual X11 value for the name.
    pub const fn rgb(self) -> Rgb<u8> {
        let c = match self {
            Self::White => [255, 255, 255],
            Self::Black => [0, 0, 0],
            Self::Blue => [0, 0, 255],
            Self::Red => [255, 0, 0],
            Self::Green => [0, 128, 0],
            Self::Yellow => [255, 255, 0],
            Self::Cyan => [0, 255, 255],
            Self::Magenta => [255, 0, 255],
            Self::Orange => [255, 165, 0],
            Self::Purple => [128, 0, 128],
            Self::Pink => [255, 192, 203],
            Self::Brown => [165, 42, 42],
            Self::DarkRed => [139, 0, 0],
            Self::Maroon => [128, 0, 0],
            Self::Crimson => [220, 20, 60],
            Self::Firebrick => [178, 34, 34],
        };
        Rgb(c)
    }

    // Anchor the sampled pixels are measured against. Primaries sit slightly inside the
    // cube so that dimmed or antialiased blocks still land on them.
    const fn anchor(self) -> [u8; 3] {
        match self {
            Self::White => [245, 245, 245],
            Self::Black => [10, 10, 10],
            Self::Blue => [0, 0, 200],
            Self::Red => [200, 0, 0],
            Self::Green => [0, 200, 0],
            Self::Yellow => [200, 200, 0],
            Self::Cyan => [0, 200, 200],
            Self::Magenta => [200, 0, 200],
            _ => self.rgb().0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Cyan => "cyan",
            Self::Magenta => "magenta",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Brown => "brown",
            Self::DarkRed => "darkred",
            Self::Maroon => "maroon",
            Self::Crimson => "crimson",
            Self::Firebrick => "firebrick",
        }
    }

    pub fn is_background(self) -> bool {
        self == Self::BACKGROUND
    }
}

impl From<ColorName> for Rgb<u8> {
    fn from(c: ColorName) -> Self {
        c.rgb()
    }
}

impl From<Rgb<u8>> for ColorName {
    fn from(px: Rgb<u8>) -> Self {
        classify(px)
    }
}

impl Display for ColorName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Classification
//------------------------------------------------------------------------------

// Squared RGB distance past which a pixel is treated as background
const MAX_DISTANCE_SQ: u32 = 100 * 100;

fn distance_sq(px: Rgb<u8>, anchor: [u8; 3]) -> u32 {
    px.0.iter().zip(anchor).map(|(&a, b)| (a as i32 - b as i32).pow(2) as u32).sum()
}

/// Nearest named color to a sampled pixel. Pixels far from every anchor are background.
pub fn classify(px: Rgb<u8>) -> ColorName {
    let (nearest, dist) = ColorName::ALL
        .iter()
        .map(|&c| (c, distance_sq(px, c.anchor())))
        .fold((ColorName::BACKGROUND, u32::MAX), |best, cur| if cur.1 < best.1 { cur } else { best });

    if dist > MAX_DISTANCE_SQ {
        ColorName::BACKGROUND
    } else {
        nearest
    }
}

#[cfg(test)]
mod classify_tests {
    use image::Rgb;
    use test_case::test_case;

    use super::{classify, ColorName};

    #[test]
    fn test_painted_colors_classify_to_themselves() {
        for c in ColorName::ALL {
            assert_eq!(classify(c.rgb()), c, "{c} painted as {:?}", c.rgb());
        }
    }

    #[test_case([250, 250, 250], ColorName::White)]
    #[test_case([128, 128, 128], ColorName::White; "grey is too far from everything")]
    #[test_case([5, 5, 250], ColorName::Blue)]
    #[test_case([240, 10, 5], ColorName::Red)]
    #[test_case([20, 20, 20], ColorName::Black)]
    #[test_case([10, 140, 10], ColorName::Green)]
    #[test_case([140, 0, 0], ColorName::DarkRed)]
    #[test_case([127, 0, 0], ColorName::Maroon)]
    fn test_classify(px: [u8; 3], exp: ColorName) {
        assert_eq!(classify(Rgb(px)), exp);
    }
}

// Color tables
//------------------------------------------------------------------------------

const TABLES: [&[ColorName]; 15] = [
    &[White, Black],
    &[White, Blue, Red],
    &[White, Blue, Green, Red],
    &[White, Blue, Green, Yellow, Red],
    &[White, Blue, Green, Cyan, Yellow, Red],
    &[White, Blue, Green, Cyan, Yellow, Magenta, Red],
    &[White, Blue, Green, Cyan, Yellow, Magenta, Orange, Red],
    &[White, Blue, Green, Cyan, Yellow, Magenta, Orange, Purple, Red],
    &[White, Blue, Green, Cyan, Yellow, Magenta, Orange, Purple, Pink, Red],
    &[White, Blue, Green, Cyan, Yellow, Magenta, Orange, Purple, Pink, Brown, Red],
    &[White, Blue, Green, Cyan, Yellow, Magenta, Orange, Purple, Pink, Brown, Red, DarkRed],
    &[
        White, Blue, Green, Cyan, Yellow, Magenta, Orange, Purple, Pink, Brown, Red, DarkRed,
        Maroon,
    ],
    &[
        White, Blue, Green, Cyan, Yellow, Magenta, Orange, Purple, Pink, Brown, Red, DarkRed,
        Maroon, Crimson,
    ],
    &[
        White, Blue, Green, Cyan, Yellow, Magenta, Orange, Purple, Pink, Brown, Red, DarkRed,
        Maroon, Crimson, Firebrick,
    ],
    &[
        White, Blue, Green, Cyan, Yellow, Magenta, Orange, Purple, Pink, Brown, Red, DarkRed,
        Maroon, Crimson, Firebrick, Black,
    ],
];

/// Digit to color mapping of one base. Index `i` holds the color of digit `i`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ColorTable {
    base: Base,
    colors: &'static [ColorName],
}

impl ColorTable {
    pub fn new(base: Base) -> Self {
        Self { base, colors: TABLES[(*base - Base::MIN) as usize] }
    }

    pub fn base(&self) -> Base {
        self.base
    }

    pub fn colors(&self) -> &'static [ColorName] {
        self.colors
    }

    pub fn color(&self, digit: char) -> Option<ColorName> {
        let value = digit.to_digit(16)?;
        self.colors.get(value as usize).copied()
    }

    /// Color of the highest digit; also marks symbols the base cannot represent.
    pub fn max_color(&self) -> ColorName {
        self.colors[self.colors.len() - 1]
    }

    pub fn paint_color(&self, digit: char) -> ColorName {
        self.color(digit).unwrap_or_else(|| self.max_color())
    }

    pub fn digit(&self, color: ColorName) -> Option<char> {
        self.colors.iter().position(|&c| c == color).map(|i| digit_char(i as u32))
    }

    pub fn digit_or_zero(&self, color: ColorName) -> char {
        self.digit(color).unwrap_or('0')
    }

    pub fn contains(&self, color: ColorName) -> bool {
        self.colors.contains(&color)
    }
}

/// Every base whose table uses `color`.
pub fn bases_with(color: ColorName) -> impl Iterator<Item = Base> {
    Base::all().filter(move |&b| ColorTable::new(b).contains(color))
}


// Base inference
//------------------------------------------------------------------------------

/// Every base whose table holds all of the observed colors, smallest first.
pub fn consistent_bases(observed: &BTreeSet<ColorName>) -> Vec<Base> {
    Base::all()
        .filter(|&b| {
            let table = ColorTable::new(b);
            observed.iter().all(|&c| table.contains(c))
        })
        .collect()
}

/// The base whose foreground colors are exactly the observed foreground colors, if any.
pub fn exact_base(observed: &BTreeSet<ColorName>) -> Option<Base> {
    let foreground = observed.iter().filter(|c| !c.is_background()).collect::<BTreeSet<_>>();
    Base::all().find(|&b| {
        let colors = ColorTable::new(b).colors().iter().filter(|c| !c.is_background());
        colors.collect::<BTreeSet<_>>() == foreground
    })
}

/// Guesses the base an image was built with from the set of colors seen in it.
///
/// With [`Scheme::Fixed`] a table matching the observed colors exactly wins, otherwise the
/// largest base holding every observed color.
/// [`Scheme::Legacy`] always takes the largest base holding any observed color. Images
/// without foreground colors resolve to base 2.
///
/// This only looks at colors; the reader also checks that the candidates decode to text.
pub fn infer_base(observed: &BTreeSet<ColorName>, scheme: Scheme) -> Base {
    let colors = observed.iter().copied().filter(|c| !c.is_background()).collect::<Vec<_>>();
    if colors.is_empty() {
        debug!("No foreground colors observed, defaulting to base 2");
        return Base::BINARY;
    }

    let base = match scheme {
        // Base 16 holds every color, so some base is always consistent
        Scheme::Fixed => exact_base(observed).or_else(|| consistent_bases(observed).pop()),
        Scheme::Legacy => Base::all()
            .filter(|&b| {
                let table = ColorTable::new(b);
                colors.iter().any(|&c| table.contains(c))
            })
            .last(),
    };

    let base = base.unwrap_or(Base::BINARY);
    debug!(?colors, %base, "Inferred base");
    base
}
