//! ASCII level decoding.
//!
//! ## Format
//!   Line 1 (optional): `# Level Name`
//!   Lines: map rows, at most 128 glyphs each. Short rows are padded with
//!   solid wall so every row fills the 128-cell stride.
//!
//! ## Glyph legend
//!   ' ' = background A           ',' = background B
//!   '~' = water (animated)        ':' = vines (static, passable)
//!   '#' = brick (solid)           '=' = girder (solid)
//!   'H' = ladder marker           '^' = ceiling hook anchor
//!   'P' = player spawn (feet)     'A' = actor spawn (feet)

use tracing::debug;

use crate::domain::grid::{TileGrid, ROW_STRIDE, ROW_UNITS};
use crate::domain::tile::TileCode;
use crate::error::LevelError;

pub const WATER: TileCode = TileCode(0x0100);
pub const VINES: TileCode = TileCode(0x0640);
pub const BRICK: TileCode = TileCode(0x1800);
pub const GIRDER: TileCode = TileCode(0x1A00);
pub const LADDER: TileCode = TileCode(0x1B80);
pub const HOOKS: TileCode = TileCode(0x2EE0);

/// A decoded level: the grid plus spawn points in world units.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    /// Player spawn `(x, y)`: half-tiles, vertical units.
    pub spawn: (i32, i32),
    pub actors: Vec<(i32, i32)>,
}

fn glyph_code(glyph: char) -> Option<TileCode> {
    let code = match glyph {
        ' ' | 'P' | 'A' => TileCode::BACKGROUND_A,
        ',' => TileCode::BACKGROUND_B,
        '~' => WATER,
        ':' => VINES,
        '#' => BRICK,
        '=' => GIRDER,
        'H' => LADDER,
        '^' => HOOKS,
        _ => return None,
    };
    Some(code)
}

/// World position whose feet row is `row`, standing at column `col`.
fn spawn_point(row: usize, col: usize) -> (i32, i32) {
    (col as i32 * 2, row as i32 * ROW_UNITS)
}

pub fn parse_level(text: &str) -> Result<Level, LevelError> {
    let mut lines = text.lines().peekable();
    let name = match lines.peek() {
        Some(first) if first.starts_with('#') && first[1..].starts_with(' ') => {
            let name = first[1..].trim().to_string();
            lines.next();
            name
        }
        _ => String::from("Untitled"),
    };

    let rows: Vec<&str> = lines.collect();
    if rows.is_empty() {
        return Err(LevelError::NoRows);
    }

    let mut cells = vec![TileCode::WALL.raw(); rows.len() * ROW_STRIDE];
    let mut spawn = None;
    let mut actors = Vec::new();

    for (row, line) in rows.iter().enumerate() {
        let width = line.chars().count();
        if width > ROW_STRIDE {
            return Err(LevelError::RowTooWide { row, width, max: ROW_STRIDE });
        }
        for (col, glyph) in line.chars().enumerate() {
            let code = glyph_code(glyph).ok_or(LevelError::UnknownGlyph { glyph, row, col })?;
            cells[row * ROW_STRIDE + col] = code.raw();
            match glyph {
                'P' => spawn = Some(spawn_point(row, col)),
                'A' => actors.push(spawn_point(row, col)),
                _ => {}
            }
        }
    }

    let spawn = spawn.ok_or(LevelError::NoSpawn)?;
    let grid = TileGrid::new(cells)?;
    debug!(name = %name, rows = grid.height(), actors = actors.len(), "level decoded");

    Ok(Level { name, grid, spawn, actors })
}

/// Built-in level used by the preview binary.
pub const DEMO_LEVEL: &str = "\
# Sewer Run
========================================
=                                      =
=  ^^^^^^                    ,,,,,,    =
=                            ,,,,,,    =
=        :::        A        ,,,,,,    =
=       #####     #####      ,,,,,,    =
=  P                    H         A    =
=####     ####          H       #####  =
=         #  #          H              =
=        ##  ##    ######        :     =
=   A               :::         ###    =
=#######~~~~~~#####################~~~~=
========================================
";
