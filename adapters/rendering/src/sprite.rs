//! Pixel-art sprites described as rows of palette symbols.

use crate::{Color, RenderingError};

const PLANE_ROWS: [&str; 16] = [
    "     GG     ",
    "     GG     ",
    "    GGGG    ",
    "    GccG    ",
    "    GccG    ",
    "   GGGGGG   ",
    "  GGGGGGGG  ",
    " GGGGGGGGGG ",
    "GGGGGGGGGGGG",
    "GGGGDDDDGGGG",
    "GGGD    DGGG",
    " GGD    DGG ",
    "  GG    GG  ",
    "   G RR G   ",
    "   G RR G   ",
    "    G  G    ",
];

/// Palette of the player craft; space is transparent.
fn plane_palette(symbol: char) -> Option<Option<Color>> {
    match symbol {
        ' ' => Some(None),
        'G' => Some(Some(Color::from_rgb_u8(34, 139, 34))),
        'D' => Some(Some(Color::from_rgb_u8(0, 100, 0))),
        'c' => Some(Some(Color::from_rgb_u8(100, 200, 255))),
        'R' => Some(Some(Color::from_rgb_u8(255, 0, 0))),
        _ => None,
    }
}

/// Rectangular grid of optional pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelSprite {
    width: usize,
    height: usize,
    pixels: Vec<Option<Color>>,
}

impl PixelSprite {
    /// Parses rows of symbols through `palette`.
    ///
    /// The palette returns `None` for unknown symbols and `Some(None)` for
    /// transparent ones.
    pub fn parse<F>(rows: &[&str], palette: F) -> Result<Self, RenderingError>
    where
        F: Fn(char) -> Option<Option<Color>>,
    {
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(RenderingError::EmptySprite);
        }

        let mut pixels = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(RenderingError::RaggedSprite {
                    row: row_index,
                    expected: width,
                    found,
                });
            }
            for (column, symbol) in row.chars().enumerate() {
                let pixel = palette(symbol).ok_or(RenderingError::UnknownPixel {
                    symbol,
                    column,
                    row: row_index,
                })?;
                pixels.push(pixel);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            pixels,
        })
    }

    /// The 12×16 player craft.
    pub fn plane() -> Result<Self, RenderingError> {
        Self::parse(&PLANE_ROWS, plane_palette)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at the given coordinates, `None` when transparent or out of range.
    #[must_use]
    pub fn pixel(&self, column: usize, row: usize) -> Option<Color> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.pixels[row * self.width + column]
    }

    /// Row-major RGBA bytes with transparent pixels fully cleared.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| pixel.map_or([0; 4], Color::to_rgba8))
            .collect()
    }
}
