use crate::render::unit::Point2;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration for a [TileRenderer](crate::TileRenderer). None of these
/// options affect world data, only how it's drawn.
///
/// Changing the zoom at runtime goes through
/// [TileRenderer::set_zoom](crate::TileRenderer::set_zoom) rather than a new
/// config, so the texture cache can be cleared at the right time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RenderConfig {
    /// Size of one tile in pixels at zoom 1.0
    #[validate(range(min = 1.0, max = 512.0))]
    pub base_tile_size: f64,

    /// Multiplier on [Self::base_tile_size]. Every coordinate formula is
    /// linear in this, there are no zoom-dependent special cases.
    #[validate(range(min = 0.05, max = 16.0))]
    pub zoom_scale: f64,

    /// Where the player's tile is pinned on screen, in pixels. The world
    /// scrolls underneath so this point never moves.
    pub fixed_screen_x: f64,
    pub fixed_screen_y: f64,

    /// Tiles rendered smaller than this (in pixels) use
    /// [DetailLevel::Far](crate::DetailLevel::Far): one texture variation and
    /// no decoration.
    #[validate(range(min = 1))]
    pub close_detail_min_px: u32,

    /// Number of decoration variations per tile type at close detail
    #[validate(range(min = 1, max = 16))]
    pub close_variations: u32,

    /// Radius of a rounded corner, as a fraction of the tile size
    #[validate(range(min = 0.0, max = 0.5))]
    pub corner_radius: f64,

    /// Draw procedural decoration (grass tufts, cracks...) at all? With this
    /// off, close detail tiles look like far detail tiles.
    pub decorations: bool,

    /// Pixels per grid when compositing a whole frontier into one minimap
    #[validate(range(min = 1, max = 64))]
    pub frontier_grid_px: u32,
}

impl RenderConfig {
    /// The fixed player position as a point
    pub fn fixed_screen_pos(&self) -> Point2 {
        Point2::new(self.fixed_screen_x, self.fixed_screen_y)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_tile_size: 40.0,
            zoom_scale: 1.0,
            fixed_screen_x: 400.0,
            fixed_screen_y: 300.0,
            close_detail_min_px: 24,
            close_variations: 4,
            corner_radius: 0.35,
            decorations: true,
            frontier_grid_px: 8,
        }
    }
}
