//! Custom 5x8 character glyphs
//!
//! HD44780-style displays hold eight user-defined characters. Each bitmap row
//! uses the low five bits, MSB on the left.

use serde::{Deserialize, Serialize};

/// Custom glyphs drawn on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    DinoRun1,
    DinoRun2,
    DinoJump,
    SmallCactus,
    BigCactus,
    Bird,
    Ground,
    DinoDuck1,
    DinoDuck2,
}

impl Glyph {
    pub const ALL: [Glyph; 9] = [
        Glyph::DinoRun1,
        Glyph::DinoRun2,
        Glyph::DinoJump,
        Glyph::SmallCactus,
        Glyph::BigCactus,
        Glyph::Bird,
        Glyph::Ground,
        Glyph::DinoDuck1,
        Glyph::DinoDuck2,
    ];

    /// Pixel rows, top to bottom
    pub fn bitmap(self) -> &'static [u8; 8] {
        &BITMAPS[self as usize]
    }

    /// Character-generator slot, for the glyphs that get uploaded
    pub fn slot(self) -> Option<u8> {
        match self {
            Glyph::DinoRun1 => Some(0),
            Glyph::DinoRun2 => Some(1),
            Glyph::DinoJump => Some(2),
            Glyph::SmallCactus => Some(3),
            Glyph::BigCactus => Some(4),
            Glyph::Bird => Some(5),
            Glyph::Ground => Some(6),
            Glyph::DinoDuck1 => Some(7),
            // Only eight slots; the second duck frame never makes the cut
            Glyph::DinoDuck2 => None,
        }
    }

    /// Plain-text stand-in for displays without custom characters
    pub fn ascii(self) -> char {
        match self {
            Glyph::DinoRun1 => 'R',
            Glyph::DinoRun2 => 'r',
            Glyph::DinoJump => 'J',
            Glyph::SmallCactus => 'i',
            Glyph::BigCactus => 'I',
            Glyph::Bird => 'v',
            Glyph::Ground => '_',
            Glyph::DinoDuck1 | Glyph::DinoDuck2 => 'n',
        }
    }
}

/// Indexed by `Glyph as usize`
const BITMAPS: [[u8; 8]; 9] = [
    // DinoRun1
    [0b00000, 0b00111, 0b00111, 0b00110, 0b10111, 0b11111, 0b01110, 0b01100],
    // DinoRun2
    [0b00000, 0b00111, 0b00111, 0b00110, 0b10111, 0b11111, 0b01110, 0b00100],
    // DinoJump
    [0b00000, 0b00111, 0b00111, 0b00110, 0b10111, 0b11111, 0b01110, 0b01100],
    // SmallCactus
    [0b00100, 0b00100, 0b10101, 0b10101, 0b10101, 0b10101, 0b00100, 0b00100],
    // BigCactus
    [0b00100, 0b00101, 0b10101, 0b10101, 0b10101, 0b10101, 0b10101, 0b00100],
    // Bird
    [0b01100, 0b11110, 0b01100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
    // Ground
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
    // DinoDuck1
    [0b00000, 0b00000, 0b00000, 0b00111, 0b10111, 0b11111, 0b11111, 0b01110],
    // DinoDuck2
    [0b00000, 0b00000, 0b00000, 0b00111, 0b10111, 0b11111, 0b11111, 0b00100],
];

/// Glyphs to upload, in slot order
pub fn uploadable() -> impl Iterator<Item = (u8, Glyph)> {
    Glyph::ALL
        .into_iter()
        .filter_map(|glyph| glyph.slot().map(|slot| (slot, glyph)))
}
