//! Corner rounding between tile types.
//!
//! Each tile's 4 corners are decided independently from the 3 neighbors that
//! touch that corner: the two cardinal neighbors and the diagonal between
//! them. A rounded corner is painted in the neighbor's color outside a
//! quarter circle, so the tile looks like it curves into its neighbor.
//!
//! The rules, in order, for center `c`, cardinals `a` and `b`, diagonal `d`:
//!
//! 1. If `c` doesn't autotile (pavement, cobblestone, dungeon, reserved
//!    types), never round.
//! 2. If `a == b == c`, the corner is solid.
//! 3. If `a == b != c`:
//!    - If `d == a` too and `a` is organic, round into `a`. The neighbor
//!      wraps the whole corner, so priority doesn't matter.
//!    - Otherwise round into `a` only if it strictly outranks `c`.
//! 4. If `a != b`, there's no single color to round into, so don't.
//!
//! Note the asymmetry in rule 3: equal priorities never round, except when
//! surrounded. That's what lets a lone grass tile in a dirt field soften into
//! the dirt even though grass normally wins.

use crate::{
    render::unit::Color3,
    world::{grid::TileSource, tile::TileType},
};
use strum::{EnumIter, IntoEnumIterator};

/// One of the 4 corners of a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Offsets `(d_row, d_col)` of the neighbors that touch this corner:
    /// `[vertical cardinal, horizontal cardinal, diagonal]`
    pub fn neighbor_offsets(self) -> [(i32, i32); 3] {
        let (dr, dc) = self.direction();
        [(dr, 0), (0, dc), (dr, dc)]
    }

    /// Unit direction from the tile center towards this corner
    pub fn direction(self) -> (i32, i32) {
        match self {
            Self::TopLeft => (-1, -1),
            Self::TopRight => (-1, 1),
            Self::BottomLeft => (1, -1),
            Self::BottomRight => (1, 1),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A tile and its 8 neighbors. Lookups that fall outside the source resolve
/// to the center tile's own type, so the edge of a grid never rounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    /// `cells[1 + d_row][1 + d_col]`; the center is `cells[1][1]`
    cells: [[TileType; 3]; 3],
}

impl Neighborhood {
    /// Read the neighborhood around `(row, col)`. Returns `None` if the
    /// center itself is outside the source.
    pub fn read(source: &impl TileSource, row: i32, col: i32) -> Option<Self> {
        let center = source.tile_at(row, col)?;
        let mut cells = [[center; 3]; 3];
        for (d_row, line) in (-1..=1).zip(cells.iter_mut()) {
            for (d_col, cell) in (-1..=1).zip(line.iter_mut()) {
                *cell = source
                    .tile_at(row + d_row, col + d_col)
                    .unwrap_or(center);
            }
        }
        Some(Self::from_cells(cells))
    }

    /// Build a neighborhood directly from a 3×3 array of types
    pub fn from_cells(cells: [[TileType; 3]; 3]) -> Self {
        Self { cells }
    }

    pub fn center(&self) -> TileType {
        self.cells[1][1]
    }

    /// Neighbor at an offset in `-1..=1` on each axis
    pub fn at(&self, d_row: i32, d_col: i32) -> TileType {
        self.cells[(1 + d_row) as usize][(1 + d_col) as usize]
    }
}

/// Decide a single corner. Returns the tile type whose color should fill
/// the corner, or `None` if the corner stays square.
pub fn decide_corner(
    center: TileType,
    cardinal_a: TileType,
    cardinal_b: TileType,
    diagonal: TileType,
) -> Option<TileType> {
    if !center.autotiles() {
        return None;
    }
    if cardinal_a != cardinal_b || cardinal_a == center {
        // Mixed neighbors, or both match us
        return None;
    }
    let neighbor = cardinal_a;
    // Unknown codes are never a fill source, surrounded or not
    if neighbor == TileType::Unknown {
        return None;
    }
    if diagonal == neighbor && neighbor.is_organic() {
        return Some(neighbor);
    }
    if neighbor.autotiles() && neighbor.priority() > center.priority() {
        Some(neighbor)
    } else {
        None
    }
}

/// The fill for one rounded corner: paint `color` outside a quarter circle
/// of `radius` pixels anchored in the corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CornerFill {
    pub color: Color3,
    pub radius: f64,
}

/// The rounding decision for all 4 corners of a tile. Recomputed every
/// render; it's cheap.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CornerDecision {
    corners: [Option<TileType>; 4],
}

impl CornerDecision {
    /// No rounded corners
    pub const SQUARE: Self = Self { corners: [None; 4] };

    /// Decide every corner of the center tile
    pub fn decide(neighborhood: &Neighborhood) -> Self {
        let center = neighborhood.center();
        let mut decision = Self::SQUARE;
        for corner in Corner::iter() {
            let [a, b, d] = corner
                .neighbor_offsets()
                .map(|(d_row, d_col)| neighborhood.at(d_row, d_col));
            decision.corners[corner.index()] = decide_corner(center, a, b, d);
        }
        decision
    }

    /// Shortcut to read a neighborhood from a source and decide it. Positions
    /// outside the source are square.
    pub fn for_tile(source: &impl TileSource, row: i32, col: i32) -> Self {
        Neighborhood::read(source, row, col)
            .map(|neighborhood| Self::decide(&neighborhood))
            .unwrap_or(Self::SQUARE)
    }

    /// Which type (if any) fills a corner
    pub fn get(&self, corner: Corner) -> Option<TileType> {
        self.corners[corner.index()]
    }

    /// All 4 corners, in [Corner] order
    pub fn corners(&self) -> [Option<TileType>; 4] {
        self.corners
    }

    pub fn is_square(&self) -> bool {
        self.corners.iter().all(Option::is_none)
    }

    /// Resolve to paintable fills, with the radius in pixels
    pub fn fill(&self, corner: Corner, radius: f64) -> Option<CornerFill> {
        self.get(corner).map(|tile_type| CornerFill {
            color: tile_type.color(),
            radius,
        })
    }

    /// Every rounded corner with its fill
    pub fn fills(
        &self,
        radius: f64,
    ) -> impl Iterator<Item = (Corner, CornerFill)> + '_ {
        Corner::iter().filter_map(move |corner| {
            Some((corner, self.fill(corner, radius)?))
        })
    }
}
