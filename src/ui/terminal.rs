//! Terminal blit backend for the preview binary.
//!
//! Emulates the 320x200 screen as a 40x13 character grid: one character per
//! 8x16 pixel block, so a 16x16 tile covers two characters. Solid blits map
//! their atlas offset back to a glyph; masked blits draw the actor halves.
//!
//! Frames are double-buffered and diffed: only cells that changed since the
//! previous frame are written, batched with `queue!` and flushed once.
//!
//! The glyph mapping assumes the demo atlas layout: foreground tile codes
//! stay below [`BACKDROP_SRC_START`], backdrops live at or above it.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use tracing::debug;

use super::blit::{BlitBackend, ScreenAddr, WriteMode};
use super::map::{BACKDROP_B_DELTA, BACKDROP_SRC_START, MAP_DRAW_END, MAP_DRAW_START};
use super::sprite::MASKED_TILE_BYTES;
use crate::domain::tile::{TileClass, TileCode};

/// Character columns: one per address byte.
pub const SCREEN_COLS: usize = 40;
/// Character rows: one per 16 pixel rows.
pub const SCREEN_ROWS: usize = 13;
/// Lines below the screen for status text.
const STATUS_ROWS: usize = 3;

const PIXELS_PER_ROW: i32 = 16;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White };
    /// Differs from any real cell so the first frame repaints everything.
    const INVALID: Cell = Cell { ch: '\0', fg: Color::Magenta };
    const BORDER: Cell = Cell { ch: '%', fg: Color::DarkGrey };
}

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(width: usize, height: usize) -> Self {
        FrameBuffer { width, height, cells: vec![Cell::BLANK; width * height] }
    }

    fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set((x + i) as i32, y as i32, Cell { ch, fg });
        }
    }
}

/// Glyph and colour for a solid blit source.
pub fn glyph_for(src: u16) -> (char, Color) {
    if src >= BACKDROP_SRC_START + BACKDROP_B_DELTA {
        return ('.', Color::DarkBlue);
    }
    if src >= BACKDROP_SRC_START {
        return (' ', Color::Black);
    }
    let code = TileCode(src);
    match code.class() {
        TileClass::BackgroundA | TileClass::BackgroundB | TileClass::Blank => (' ', Color::Black),
        TileClass::Animated => {
            let frame = (src >> 5) & 3;
            (if frame < 2 { '~' } else { '-' }, Color::Cyan)
        }
        TileClass::Static => (':', Color::Green),
        TileClass::Solid if code.is_ladder_marker() => ('H', Color::Yellow),
        TileClass::Solid if code.is_hook_anchor() => ('^', Color::Magenta),
        TileClass::Solid => ('#', Color::Red),
    }
}

pub struct TerminalBackend {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    mode: WriteMode,
}

impl TerminalBackend {
    pub fn new() -> Self {
        let height = SCREEN_ROWS + STATUS_ROWS;
        TerminalBackend {
            writer: BufWriter::with_capacity(8192, io::stdout()),
            front: FrameBuffer::new(SCREEN_COLS, height),
            back: FrameBuffer::new(SCREEN_COLS, height),
            mode: WriteMode::Normal,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.writer, terminal::EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn begin_frame(&mut self) {
        self.front.cells.fill(Cell::BLANK);
    }

    /// HUD border around the viewport. Drawn after the tile pass, it hides
    /// the half-tile strip the odd-camera shift leaves left of the viewport
    /// and the 14th column right of it.
    pub fn draw_border(&mut self) {
        let left = i32::from(MAP_DRAW_START.byte_x());
        let right = i32::from(MAP_DRAW_END.byte_x());
        let top = i32::from(MAP_DRAW_START.pixel_y()) / PIXELS_PER_ROW;
        // the end address sits on the top line of the last tile row
        let bottom = i32::from(MAP_DRAW_END.pixel_y()) / PIXELS_PER_ROW + 1;

        for y in 0..SCREEN_ROWS as i32 {
            for x in 0..SCREEN_COLS as i32 {
                let inside = x >= left && x < right && y >= top && y < bottom;
                if !inside {
                    self.front.set(x, y, Cell::BORDER);
                }
            }
        }
    }

    pub fn status(&mut self, line: usize, text: &str) {
        if line < STATUS_ROWS {
            self.front.put_str(0, SCREEN_ROWS + line, text, Color::Grey);
        }
    }

    /// Write changed cells and swap buffers.
    pub fn present(&mut self) -> io::Result<()> {
        let mut last_fg = None;
        let mut cursor_at = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn put_tile(&mut self, x: i32, y: i32, cell: Cell) {
        self.front.set(x, y, cell);
        self.front.set(x + 1, y, cell);
    }
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BlitBackend for TerminalBackend {
    fn set_write_mode(&mut self, mode: WriteMode) {
        self.mode = mode;
    }

    fn blit_solid_tile(&mut self, src: u16, dest: ScreenAddr) {
        if self.mode != WriteMode::LatchCopy {
            debug!(src, dest = dest.0, "solid blit outside latch-copy mode");
        }
        let (ch, fg) = glyph_for(src);
        let x = i32::from(dest.byte_x());
        let y = i32::from(dest.pixel_y()) / PIXELS_PER_ROW;
        self.put_tile(x, y, Cell { ch, fg });
    }

    fn blit_masked_tile(&mut self, src: u32, screen_x: i32, screen_y: i32) {
        let upper = (src / MASKED_TILE_BYTES) % 2 == 0;
        let ch = if upper { 'O' } else { 'A' };
        self.put_tile(screen_x, screen_y.div_euclid(PIXELS_PER_ROW), Cell { ch, fg: Color::White });
    }
}
