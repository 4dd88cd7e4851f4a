//! World coordinate spaces. There are three levels of nesting:
//!
//! - A **grid** is 64×64 tiles
//! - A **settlement** is 8×8 grids (512×512 tiles)
//! - A **frontier** is 8×8 settlements
//!
//! The frontier is then padded with 4 settlements of empty space on every
//! side, so the camera never runs out of background near the edge of the
//! world. That gives a 16×16-settlement world, 8192 tiles per side.
//!
//! Every position in the world maps onto exactly one [WorldPos] via
//! [world_position]. Everything else (screen positions, scroll offsets,
//! pixel sizes) is a linear function of that, see
//! [ScreenTransform](crate::ScreenTransform).

use crate::world::visited::VisitedGrids;
use derive_more::{Add, Display, Sub};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const TILES_PER_GRID: i32 = 64;
pub const GRIDS_PER_SETTLEMENT: i32 = 8;
pub const TILES_PER_SETTLEMENT: i32 = TILES_PER_GRID * GRIDS_PER_SETTLEMENT;
pub const SETTLEMENTS_PER_FRONTIER: i32 = 8;
/// Settlements of empty space added on each side of the frontier
pub const WORLD_PADDING_SETTLEMENTS: i32 = 4;
/// Settlements per side of the padded world
pub const WORLD_SETTLEMENTS: i32 =
    SETTLEMENTS_PER_FRONTIER + 2 * WORLD_PADDING_SETTLEMENTS;
/// Tiles per side of the padded world
pub const WORLD_TILES: i32 = WORLD_SETTLEMENTS * TILES_PER_SETTLEMENT;

/// A position inside one level of the hierarchy: a tile within its grid, a
/// grid within its settlement, or a settlement within the frontier. `x` is
/// the column and `y` the row.
///
/// Components are signed and unchecked. Out-of-range values are allowed and
/// just produce out-of-range world positions.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    Add,
    Sub,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct LocalPos {
    pub x: i32,
    pub y: i32,
}

impl LocalPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build from a `(row, col)` pair, which is how grids address things
    pub const fn from_row_col(row: i32, col: i32) -> Self {
        Self { x: col, y: row }
    }

    pub const fn row(self) -> i32 {
        self.y
    }

    pub const fn col(self) -> i32 {
        self.x
    }
}

/// A tile position in the padded world. These are derived from nested
/// positions with [world_position] and never stored.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Add,
    Sub,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
}

impl WorldPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Split this position back into `(settlement, grid, tile)`. Returns
    /// `None` if the position is in the padding or outside the world.
    pub fn to_local(self) -> Option<(LocalPos, LocalPos, LocalPos)> {
        let origin = WORLD_PADDING_SETTLEMENTS * TILES_PER_SETTLEMENT;
        let frontier_tiles = SETTLEMENTS_PER_FRONTIER * TILES_PER_SETTLEMENT;
        let split = |v: i32| -> Option<(i32, i32, i32)> {
            let v = v - origin;
            if !(0..frontier_tiles).contains(&v) {
                return None;
            }
            let settlement = v / TILES_PER_SETTLEMENT;
            let within = v % TILES_PER_SETTLEMENT;
            Some((settlement, within / TILES_PER_GRID, within % TILES_PER_GRID))
        };
        let (sx, gx, tx) = split(self.x)?;
        let (sy, gy, ty) = split(self.y)?;
        Some((
            LocalPos::new(sx, sy),
            LocalPos::new(gx, gy),
            LocalPos::new(tx, ty),
        ))
    }
}

/// Map a tile within a grid within a settlement onto the padded world. This
/// is the only place the nesting math lives:
///
/// `padding*512 + settlement*512 + grid*64 + tile`, independently per axis.
pub fn world_position(
    tile: LocalPos,
    grid: LocalPos,
    settlement: LocalPos,
) -> WorldPos {
    let axis = |tile: i32, grid: i32, settlement: i32| {
        WORLD_PADDING_SETTLEMENTS * TILES_PER_SETTLEMENT
            + settlement * TILES_PER_SETTLEMENT
            + grid * TILES_PER_GRID
            + tile
    };
    WorldPos {
        x: axis(tile.x, grid.x, settlement.x),
        y: axis(tile.y, grid.y, settlement.y),
    }
}

/// A decoded `gridCoord`, the canonical 8-digit grid identifier used across
/// the game's systems. The digits are `TTIISSGG`:
///
/// - `TT` tier
/// - `II` frontier index within the tier
/// - `S` settlement row, `S` settlement column
/// - `G` grid row, `G` grid column
///
/// Serializes as the encoded integer, which is how every other system passes
/// it around.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
#[display(
    fmt = "{:02}{:02}{}{}{}{}",
    tier,
    index,
    settlement_row,
    settlement_col,
    grid_row,
    grid_col
)]
pub struct GridCoord {
    pub tier: u8,
    pub index: u8,
    pub settlement_row: u8,
    pub settlement_col: u8,
    pub grid_row: u8,
    pub grid_col: u8,
}

impl GridCoord {
    /// Largest value that fits in 8 decimal digits
    const MAX_ENCODED: i64 = 99_999_999;

    /// Decode an encoded grid coordinate. The value is zero-padded to 8
    /// digits, then each field is read off its digit position. Returns
    /// `None` for negative values or values with more than 8 digits.
    pub fn parse(encoded: i64) -> Option<Self> {
        if !(0..=Self::MAX_ENCODED).contains(&encoded) {
            return None;
        }
        let padded = format!("{encoded:08}");
        let digits: Vec<u8> = padded.bytes().map(|b| b - b'0').collect();
        Some(Self {
            tier: digits[0] * 10 + digits[1],
            index: digits[2] * 10 + digits[3],
            settlement_row: digits[4],
            settlement_col: digits[5],
            grid_row: digits[6],
            grid_col: digits[7],
        })
    }

    /// Encode back into the 8-digit form. Fields are assumed to fit their
    /// digit widths; oversized fields bleed into their neighbors, same as
    /// the wire format would.
    pub fn encode(self) -> i64 {
        i64::from(self.tier) * 1_000_000
            + i64::from(self.index) * 10_000
            + i64::from(self.settlement_row) * 1000
            + i64::from(self.settlement_col) * 100
            + i64::from(self.grid_row) * 10
            + i64::from(self.grid_col)
    }

    /// Position of this grid's settlement within the frontier
    pub fn settlement(self) -> LocalPos {
        LocalPos::from_row_col(
            self.settlement_row.into(),
            self.settlement_col.into(),
        )
    }

    /// Position of this grid within its settlement
    pub fn grid(self) -> LocalPos {
        LocalPos::from_row_col(self.grid_row.into(), self.grid_col.into())
    }

    /// World position of a tile within this grid
    pub fn tile_world_position(self, tile: LocalPos) -> WorldPos {
        world_position(tile, self.grid(), self.settlement())
    }

    /// This grid's bit in a [VisitedGrids] set. `None` if any row/column
    /// digit is outside `0..8`.
    pub fn visited_bit(self) -> Option<usize> {
        VisitedGrids::bit_index(
            self.settlement_row.into(),
            self.settlement_col.into(),
            self.grid_row.into(),
            self.grid_col.into(),
        )
    }
}

/// [GridCoord::parse] for callers holding a possibly-missing value
pub fn parse_grid_coord(encoded: Option<i64>) -> Option<GridCoord> {
    encoded.and_then(GridCoord::parse)
}

impl Serialize for GridCoord {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.encode())
    }
}

impl<'de> Deserialize<'de> for GridCoord {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let encoded = i64::deserialize(deserializer)?;
        Self::parse(encoded).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid grid coord: {encoded}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_de_tokens_error, assert_tokens, Token};

    #[test]
    fn test_world_size() {
        assert_eq!(TILES_PER_SETTLEMENT, 512);
        assert_eq!(WORLD_SETTLEMENTS, 16);
        assert_eq!(WORLD_TILES, 8192);
    }

    #[test]
    fn test_world_position_origin() {
        let pos = world_position(
            LocalPos::default(),
            LocalPos::default(),
            LocalPos::default(),
        );
        assert_eq!(pos, WorldPos::new(2048, 2048));
    }

    #[test]
    fn test_world_position_axes_independent() {
        let pos = world_position(
            LocalPos::new(5, 63),
            LocalPos::new(1, 7),
            LocalPos::new(2, 0),
        );
        assert_eq!(pos.x, 2048 + 2 * 512 + 64 + 5);
        assert_eq!(pos.y, 2048 + 7 * 64 + 63);
    }

    #[test]
    fn test_world_position_out_of_range() {
        // No errors, just out-of-range output
        let pos = world_position(
            LocalPos::new(-1, 64),
            LocalPos::default(),
            LocalPos::default(),
        );
        assert_eq!(pos, WorldPos::new(2047, 2112));
    }

    #[test]
    fn test_to_local() {
        let settlement = LocalPos::new(3, 6);
        let grid = LocalPos::new(7, 0);
        let tile = LocalPos::new(12, 63);
        let pos = world_position(tile, grid, settlement);
        assert_eq!(pos.to_local(), Some((settlement, grid, tile)));

        // Padding has no local position
        assert_eq!(WorldPos::new(0, 0).to_local(), None);
        assert_eq!(WorldPos::new(2048, 6144).to_local(), None);
    }

    #[test]
    fn test_parse_grid_coord() {
        let coord = GridCoord::parse(1_023_456).unwrap();
        assert_eq!(
            coord,
            GridCoord {
                tier: 1,
                index: 2,
                settlement_row: 3,
                settlement_col: 4,
                grid_row: 5,
                grid_col: 6,
            }
        );
        assert_eq!(coord.to_string(), "01023456");
        assert_eq!(coord.encode(), 1_023_456);
    }

    #[test]
    fn test_parse_grid_coord_invalid() {
        assert_eq!(GridCoord::parse(-1), None);
        assert_eq!(GridCoord::parse(100_000_000), None);
        assert_eq!(parse_grid_coord(None), None);
        assert_eq!(parse_grid_coord(Some(0)), GridCoord::parse(0));
    }

    #[test]
    fn test_visited_bit() {
        let coord = GridCoord::parse(1_000_177).unwrap();
        // settlement (0, 1), grid (7, 7)
        assert_eq!(coord.visited_bit(), Some(64 + 63));
        let bad = GridCoord::parse(99).unwrap();
        // grid (9, 9) is off the settlement
        assert_eq!(bad.visited_bit(), None);
    }

    #[test]
    fn test_grid_coord_serde() {
        let coord = GridCoord::parse(2_031_234).unwrap();
        assert_tokens(&coord, &[Token::I64(2_031_234)]);
        assert_de_tokens_error::<GridCoord>(
            &[Token::I64(-5)],
            "invalid grid coord: -5",
        );
    }
}
