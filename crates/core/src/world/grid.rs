use crate::world::{coords::TILES_PER_GRID, tile::TileType};
use std::fmt;

/// Anything that can answer "what tile is at `(row, col)`?". The autotiling
/// code reads neighbors through this, so it works the same against a full
/// [TileGrid] or a stitched view across several grids.
pub trait TileSource {
    /// Get the tile at a position, or `None` if the position is outside the
    /// source.
    fn tile_at(&self, row: i32, col: i32) -> Option<TileType>;
}

/// A single grid's terrain: a fixed 64×64 matrix of tile types, stored
/// row-major.
///
/// Grids are immutable once built. They come from one of two places: a live
/// payload of char codes ([TileGrid::parse_rows]) or a compressed snapshot
/// ([TileGrid::from_snapshot]).
#[derive(Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Box<[TileType; Self::AREA]>,
}

impl TileGrid {
    /// Tiles per side
    pub const SIZE: usize = TILES_PER_GRID as usize;
    /// Tiles in the whole grid
    pub const AREA: usize = Self::SIZE * Self::SIZE;

    /// Create a grid where every tile is the same type
    pub fn filled(tile_type: TileType) -> Self {
        Self {
            tiles: Box::new([tile_type; Self::AREA]),
        }
    }

    /// Build a grid from row-major tiles. Missing tiles at the end are
    /// filled with grass, extra tiles are ignored.
    pub fn from_tiles(tiles: impl IntoIterator<Item = TileType>) -> Self {
        let mut grid = Self::filled(TileType::Grass);
        for (slot, tile_type) in grid.tiles.iter_mut().zip(tiles) {
            *slot = tile_type;
        }
        grid
    }

    /// Build a grid from rows of single-char tile codes, the format live
    /// grids arrive in. Short or missing rows are padded with grass. Codes we
    /// don't recognize become [TileType::Unknown] so they show up in the
    /// debug color instead of silently disappearing.
    pub fn parse_rows<'a>(rows: impl IntoIterator<Item = &'a str>) -> Self {
        let mut grid = Self::filled(TileType::Grass);
        for (row, line) in rows.into_iter().take(Self::SIZE).enumerate() {
            for (col, code) in line.chars().take(Self::SIZE).enumerate() {
                grid.tiles[row * Self::SIZE + col] =
                    TileType::from_code(code).unwrap_or(TileType::Unknown);
            }
        }
        grid
    }

    /// Get the tile at a position. `None` if out of bounds.
    pub fn get(&self, row: i32, col: i32) -> Option<TileType> {
        Self::index(row, col).map(|i| self.tiles[i])
    }

    /// Replace one tile, returning the modified grid. Grids are otherwise
    /// immutable, this exists to build fixtures and server-side
    /// regenerations. Out-of-bounds positions are ignored.
    pub fn with_tile(
        mut self,
        row: i32,
        col: i32,
        tile_type: TileType,
    ) -> Self {
        if let Some(i) = Self::index(row, col) {
            self.tiles[i] = tile_type;
        }
        self
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> &[TileType] {
        self.tiles.as_slice()
    }

    /// Iterate over `(row, col, tile_type)` for every tile
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, TileType)> + '_ {
        self.tiles.iter().enumerate().map(|(i, tile_type)| {
            (
                (i / Self::SIZE) as i32,
                (i % Self::SIZE) as i32,
                *tile_type,
            )
        })
    }

    /// Render back to rows of char codes, the inverse of
    /// [Self::parse_rows]
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(Self::SIZE)
            .map(|row| row.iter().map(|tile_type| tile_type.code()).collect())
            .collect()
    }

    fn index(row: i32, col: i32) -> Option<usize> {
        let size = Self::SIZE as i32;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(row as usize * Self::SIZE + col as usize)
        } else {
            None
        }
    }
}

impl TileSource for TileGrid {
    fn tile_at(&self, row: i32, col: i32) -> Option<TileType> {
        self.get(row, col)
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::filled(TileType::Grass)
    }
}

impl fmt::Debug for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
