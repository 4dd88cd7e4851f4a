//! Frontier is the tile rendering and coordinate engine for a tile-based
//! world. Terrain comes in 64×64 grids, grids are grouped 8×8 into
//! settlements, and settlements 8×8 into a frontier. This crate contains:
//!
//! - The nested coordinate system and the world → screen transform
//! - Autotiling: deciding which tile corners get rounded into their
//!   neighbors
//! - Procedurally decorated tile textures, and a cache for them
//! - Settlement/frontier minimaps built from compressed grid snapshots
//!
//! Presentation (windows, input, fonts) lives elsewhere.
//!
//! ```
//! use frontier::{GridCoord, LocalPos, RenderConfig, TileGrid, TileRenderer};
//!
//! let mut renderer = TileRenderer::new(RenderConfig::default()).unwrap();
//! let grid = TileGrid::parse_rows(["ggww", "gwww"]);
//! let coord = GridCoord::parse(1_000_034).unwrap();
//! let player = LocalPos::new(1, 1);
//! let frame = renderer.render_view(&grid, coord, player, 800, 600);
//! assert_eq!(frame.dimensions(), (800, 600));
//! ```
//!
//! See [RenderConfig] for details on how rendering can be customized.

mod render;
mod util;
mod world;

pub use crate::{
    render::{
        autotile::{
            decide_corner, Corner, CornerDecision, CornerFill, Neighborhood,
        },
        camera::ScreenTransform,
        canvas::Canvas,
        config::RenderConfig,
        minimap::{
            preview_image, GridPreview, MinimapCompositor, OwnerLabel,
            SettlementMap,
        },
        texture::{
            seed, variation, DetailLevel, TextureCache, TextureKey, TileTexture,
        },
        unit::{Color3, Point2},
        TileRenderer,
    },
    util::range::NumRange,
    world::{
        coords::{
            parse_grid_coord, world_position, GridCoord, LocalPos, WorldPos,
            GRIDS_PER_SETTLEMENT, SETTLEMENTS_PER_FRONTIER, TILES_PER_GRID,
            TILES_PER_SETTLEMENT, WORLD_PADDING_SETTLEMENTS, WORLD_SETTLEMENTS,
            WORLD_TILES,
        },
        grid::{TileGrid, TileSource},
        snapshot::SNAPSHOT_BYTES,
        tile::{EdgeStyle, TileType, DEBUG_COLOR},
        visited::VisitedGrids,
        GridKind, GridSummary,
    },
};
#[cfg(feature = "svg")]
pub use crate::render::svg::grid_to_svg;
