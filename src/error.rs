//! Error types for the fallible edges of the crate.
//!
//! Per-frame queries never fail; only grid construction, level decoding and
//! configuration loading can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("tile grid is empty")]
    Empty,
    #[error("tile grid has {len} cells, not a multiple of the {stride}-cell row stride")]
    RaggedRows { len: usize, stride: usize },
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no rows")]
    NoRows,
    #[error("row {row} is {width} tiles wide, at most {max} fit in a level row")]
    RowTooWide { row: usize, width: usize, max: usize },
    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("level has no player spawn ('P')")]
    NoSpawn,
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
