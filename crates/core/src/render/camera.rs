//! Mapping from world tiles to screen pixels.
//!
//! The camera model is "fixed player, moving world": the player's tile is
//! always drawn at the same screen position, and the whole world container
//! is scrolled so that works out. Every formula here is linear in
//! `zoom_scale` and uses the same origin at every zoom level. There is
//! deliberately no switching between coordinate systems at zoom thresholds,
//! since that is exactly where jitter comes from.

use crate::{
    render::{config::RenderConfig, unit::Point2},
    world::coords::{
        LocalPos, WorldPos, TILES_PER_GRID, TILES_PER_SETTLEMENT,
        WORLD_PADDING_SETTLEMENTS, WORLD_TILES,
    },
};

/// A stateless world → screen transform. Cheap to copy; build a new one
/// whenever the zoom changes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenTransform {
    pub zoom_scale: f64,
    pub base_tile_size: f64,
    /// Screen pixel where the player's tile is pinned
    pub fixed_screen_pos: Point2,
}

impl ScreenTransform {
    pub fn new(
        zoom_scale: f64,
        base_tile_size: f64,
        fixed_screen_pos: Point2,
    ) -> Self {
        Self {
            zoom_scale,
            base_tile_size,
            fixed_screen_pos,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.zoom_scale,
            config.base_tile_size,
            config.fixed_screen_pos(),
        )
    }

    /// On-screen size of one tile
    pub fn tile_pixel_size(&self) -> f64 {
        self.base_tile_size * self.zoom_scale
    }

    /// On-screen size of one grid
    pub fn grid_pixel_size(&self) -> f64 {
        f64::from(TILES_PER_GRID) * self.tile_pixel_size()
    }

    /// On-screen size of one settlement
    pub fn settlement_pixel_size(&self) -> f64 {
        f64::from(TILES_PER_SETTLEMENT) * self.tile_pixel_size()
    }

    /// On-screen size of the whole padded world
    pub fn world_pixel_size(&self) -> f64 {
        f64::from(WORLD_TILES) * self.tile_pixel_size()
    }

    /// Position of a world tile's top-left corner within the world
    /// container (before scrolling)
    pub fn world_pixel_position(&self, pos: WorldPos) -> Point2 {
        Point2::new(f64::from(pos.x), f64::from(pos.y)) * self.tile_pixel_size()
    }

    /// Position of a settlement's top-left corner within the world container
    pub fn settlement_pixel_position(&self, settlement: LocalPos) -> Point2 {
        let padding = f64::from(WORLD_PADDING_SETTLEMENTS);
        Point2::new(
            padding + f64::from(settlement.x),
            padding + f64::from(settlement.y),
        ) * self.settlement_pixel_size()
    }

    /// Position of a grid's top-left corner within the world container
    pub fn grid_pixel_position(
        &self,
        settlement: LocalPos,
        grid: LocalPos,
    ) -> Point2 {
        self.settlement_pixel_position(settlement)
            + Point2::new(f64::from(grid.x), f64::from(grid.y))
                * self.grid_pixel_size()
    }

    /// How far the world container must be scrolled so that `player` lands
    /// on [Self::fixed_screen_pos]:
    ///
    /// `world * base_tile_size * zoom_scale - fixed_screen_pos`
    pub fn scroll_position(&self, player: WorldPos) -> Point2 {
        self.world_pixel_position(player) - self.fixed_screen_pos
    }

    /// Where a world tile's top-left corner lands on screen, given the scroll
    /// computed for the player
    pub fn screen_position(&self, pos: WorldPos, scroll: Point2) -> Point2 {
        self.world_pixel_position(pos) - scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::coords::world_position;
    use assert_approx_eq::assert_approx_eq;

    fn transform(zoom: f64) -> ScreenTransform {
        ScreenTransform::new(zoom, 32.0, Point2::new(400.0, 300.0))
    }

    #[test]
    fn test_sizes() {
        let t = transform(2.0);
        assert_approx_eq!(t.tile_pixel_size(), 64.0);
        assert_approx_eq!(t.grid_pixel_size(), 64.0 * 64.0);
        assert_approx_eq!(t.settlement_pixel_size(), 512.0 * 64.0);
        assert_approx_eq!(t.world_pixel_size(), 8192.0 * 64.0);
    }

    #[test]
    fn test_player_is_pinned() {
        let player = WorldPos::new(3000, 2500);
        for zoom in [0.5, 1.0, 1.5, 2.0, 4.0] {
            let t = transform(zoom);
            let scroll = t.scroll_position(player);
            let on_screen = t.screen_position(player, scroll);
            assert_approx_eq!(on_screen.x, 400.0);
            assert_approx_eq!(on_screen.y, 300.0);
        }
    }

    #[test]
    fn test_grid_pixel_position_matches_tiles() {
        let t = transform(1.5);
        let settlement = LocalPos::new(2, 5);
        let grid = LocalPos::new(7, 1);
        let corner = world_position(LocalPos::default(), grid, settlement);
        let expected = t.world_pixel_position(corner);
        let actual = t.grid_pixel_position(settlement, grid);
        assert_approx_eq!(actual.x, expected.x);
        assert_approx_eq!(actual.y, expected.y);
    }
}
