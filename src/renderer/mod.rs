//! Rendering module
//!
//! The session emits one complete `Frame` per tick; a `DisplaySink` replaces
//! whatever it showed before with it. `Frame::to_lines` lays a frame out on the
//! 16x2 character grid the way a character LCD shows it.

pub mod glyphs;
pub mod terminal;

pub use glyphs::Glyph;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Sun/moon drawn in the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyGlyph {
    Sun,
    PartialSun,
    Moon,
}

impl SkyGlyph {
    pub fn for_phase(phase: u8) -> Self {
        match phase {
            0 => SkyGlyph::Sun,
            1..=3 => SkyGlyph::PartialSun,
            _ => SkyGlyph::Moon,
        }
    }

    pub fn ascii(self) -> char {
        match self {
            SkyGlyph::Sun => 'O',
            SkyGlyph::PartialSun => 'D',
            SkyGlyph::Moon => ')',
        }
    }
}

/// An obstacle glyph already clamped onto the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSprite {
    pub glyph: Glyph,
    pub column: u8,
}

/// Title screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleFrame {
    pub dino: Glyph,
}

/// One tick of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayFrame {
    pub sky: SkyGlyph,
    /// 0 = full day, 10 = full night
    pub phase: u8,
    /// Sky columns showing a star
    pub stars: Vec<u8>,
    pub score: u64,
    pub high_score: u64,
    pub player: Glyph,
    pub player_row: u8,
    /// Zero to two obstacles, all on the ground row
    pub obstacles: Vec<ObstacleSprite>,
    /// Custom characters should be re-uploaded before drawing
    pub reload_glyphs: bool,
}

/// Final score card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverFrame {
    pub score: u64,
    pub high_score: u64,
}

/// Full-screen render model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame {
    Title(TitleFrame),
    Play(PlayFrame),
    GameOver(GameOverFrame),
}

/// Something that shows frames
pub trait DisplaySink {
    fn present(&mut self, frame: &Frame);
}

/// Sink that keeps every frame it was handed
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub frames: Vec<Frame>,
}

impl RecordingDisplay {
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl DisplaySink for RecordingDisplay {
    fn present(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// Map an obstacle column onto the board, if visible
pub fn visible_column(column: i32) -> Option<u8> {
    (0..COLS).contains(&column).then_some(column as u8)
}

/// 16x2 character grid
struct Grid {
    cells: [[char; COLS as usize]; ROWS as usize],
}

impl Grid {
    fn blank() -> Self {
        Self {
            cells: [[' '; COLS as usize]; ROWS as usize],
        }
    }

    fn put(&mut self, column: i32, row: u8, c: char) {
        if let (Some(column), Some(cells)) =
            (visible_column(column), self.cells.get_mut(row as usize))
        {
            cells[column as usize] = c;
        }
    }

    /// Text runs off the right edge
    fn print(&mut self, column: i32, row: u8, text: &str) {
        for (i, c) in text.chars().enumerate() {
            self.put(column + i as i32, row, c);
        }
    }

    fn into_lines(self) -> [String; 2] {
        self.cells.map(|row| row.iter().collect())
    }
}

impl Frame {
    /// The two display lines, custom glyphs replaced by ASCII stand-ins
    pub fn to_lines(&self) -> [String; 2] {
        let mut grid = Grid::blank();

        match self {
            Frame::Title(title) => {
                grid.print(3, SKY_ROW, "DINO RUN");
                grid.print(1, GROUND_ROW, "PRESS START");
                grid.put(7, SKY_ROW, title.dino.ascii());
            }
            Frame::Play(play) => {
                grid.put(0, SKY_ROW, play.sky.ascii());
                for &column in &play.stars {
                    grid.put(i32::from(column), SKY_ROW, '.');
                }
                grid.print(10, SKY_ROW, &format!("S:{}", play.score));
                for column in 0..COLS {
                    grid.put(column, GROUND_ROW, Glyph::Ground.ascii());
                }
                grid.put(PLAYER_COLUMN, play.player_row, play.player.ascii());
                for sprite in &play.obstacles {
                    grid.put(i32::from(sprite.column), GROUND_ROW, sprite.glyph.ascii());
                }
            }
            Frame::GameOver(over) => {
                grid.print(4, SKY_ROW, "GAME OVER");
                grid.print(3, GROUND_ROW, &format!("Score: {}", over.score));
            }
        }

        grid.into_lines()
    }
}
