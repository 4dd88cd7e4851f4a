pub mod autotile;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod minimap;
#[cfg(feature = "svg")]
pub mod svg;
pub mod texture;
pub mod unit;

use crate::{
    render::{
        autotile::CornerDecision,
        camera::ScreenTransform,
        config::RenderConfig,
        texture::{DetailLevel, TextureCache, TextureKey, TileTexture},
    },
    world::{
        coords::{GridCoord, LocalPos, WorldPos},
        grid::{TileGrid, TileSource},
        tile::TileType,
    },
};
use image::{
    imageops::{self, FilterType},
    RgbaImage,
};
use log::debug;
use validator::Validate;

/// A tile renderer turns grids into pixels. A renderer is created with a
/// [RenderConfig] and owns the texture cache for everything it draws, so
/// keep one around for as long as the view lives.
///
/// Zoom is the only setting that changes after creation (see
/// [Self::set_zoom]). For anything else, create a new renderer.
#[derive(Debug)]
pub struct TileRenderer {
    config: RenderConfig,
    transform: ScreenTransform,
    detail: DetailLevel,
    textures: TextureCache,
}

impl TileRenderer {
    /// Initialize a new renderer with the given options. Returns an error if
    /// the render config is invalid.
    pub fn new(config: RenderConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let mut renderer = Self {
            config,
            transform: ScreenTransform::from_config(&config),
            detail: DetailLevel::Far,
            textures: TextureCache::new(),
        };
        renderer.update_detail();
        Ok(renderer)
    }

    /// Get a reference to the config that this renderer uses
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The current world → screen transform
    pub fn transform(&self) -> ScreenTransform {
        self.transform
    }

    /// The current detail level, derived from the tile pixel size
    pub fn detail(&self) -> DetailLevel {
        self.detail
    }

    /// Textures are drawn at a whole number of pixels, at least 1
    pub fn tile_px(&self) -> u32 {
        self.transform.tile_pixel_size().round().max(1.0) as u32
    }

    /// Change the zoom level. This changes the tile size, so every cached
    /// texture is thrown away. Returns an error (and changes nothing) if the
    /// zoom is out of range.
    pub fn set_zoom(&mut self, zoom_scale: f64) -> anyhow::Result<()> {
        let config = RenderConfig {
            zoom_scale,
            ..self.config
        };
        config.validate()?;
        debug!("Zoom {} -> {}", self.config.zoom_scale, zoom_scale);
        self.config = config;
        self.transform = ScreenTransform::from_config(&config);
        self.update_detail();
        Ok(())
    }

    /// Get the texture for the tile at `(row, col)` of a grid, building it if
    /// it isn't cached. The tile's corners are decided from its neighbors in
    /// the same source. Returns `None` if the position is outside the source.
    pub fn texture(
        &mut self,
        source: &impl TileSource,
        row: i32,
        col: i32,
    ) -> Option<&TileTexture> {
        let tile_type = source.tile_at(row, col)?;
        let corners = CornerDecision::for_tile(source, row, col);
        Some(self.get_or_build_texture(tile_type, row, col, corners))
    }

    /// Get the texture for a tile when the caller already knows its corners
    pub fn get_or_build_texture(
        &mut self,
        tile_type: TileType,
        row: i32,
        col: i32,
        corners: CornerDecision,
    ) -> &TileTexture {
        let config = self.config;
        let key = TextureKey::new(
            tile_type,
            row,
            col,
            corners,
            self.tile_px(),
            self.detail,
            &config,
        );
        self.textures
            .get_or_build(key, |key| TileTexture::build(key, &config))
    }

    /// The texture cache, for inspection
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// Drop every cached texture
    pub fn clear_cache(&mut self) {
        self.textures.clear();
    }

    /// Draw the part of a grid that's visible in a `width × height` view,
    /// with the player standing on `player_tile`. The player's tile lands on
    /// the configured fixed screen position. Pixels outside the grid are left
    /// transparent.
    ///
    /// Tile edges are snapped to whole pixels, and each tile covers exactly
    /// the span between its own edges and its neighbors'. When the zoomed
    /// tile size isn't a whole number, some tiles are a pixel wider or taller
    /// than the cached texture, and the texture is stretched to fit.
    pub fn render_view(
        &mut self,
        grid: &TileGrid,
        coord: GridCoord,
        player_tile: LocalPos,
        width: u32,
        height: u32,
    ) -> RgbaImage {
        let mut frame = RgbaImage::new(width, height);
        let transform = self.transform;
        let scroll =
            transform.scroll_position(coord.tile_world_position(player_tile));

        for (row, col, _) in grid.iter() {
            let world =
                coord.tile_world_position(LocalPos::from_row_col(row, col));
            // Both corners come from the same lattice, so a tile's far edge
            // is exactly its neighbor's near edge
            let top_left = transform.screen_position(world, scroll);
            let far_corner = WorldPos::new(world.x + 1, world.y + 1);
            let bottom_right = transform.screen_position(far_corner, scroll);
            let x = top_left.x.round() as i64;
            let y = top_left.y.round() as i64;
            let span_x = bottom_right.x.round() as i64 - x;
            let span_y = bottom_right.y.round() as i64 - y;
            if span_x <= 0
                || span_y <= 0
                || x + span_x <= 0
                || y + span_y <= 0
                || x >= i64::from(width)
                || y >= i64::from(height)
            {
                continue;
            }

            let span = (span_x as u32, span_y as u32);
            if let Some(texture) = self.texture(grid, row, col) {
                if texture.image().dimensions() == span {
                    imageops::replace(&mut frame, texture.image(), x, y);
                } else {
                    let stretched = imageops::resize(
                        texture.image(),
                        span.0,
                        span.1,
                        FilterType::Nearest,
                    );
                    imageops::replace(&mut frame, &stretched, x, y);
                }
            }
        }
        frame
    }

    /// Render a grid as a flat SVG. Returns the SVG in a string.
    #[cfg(feature = "svg")]
    pub fn render_as_svg(&self, grid: &TileGrid) -> String {
        svg::grid_to_svg(grid, &self.config).to_string()
    }

    /// Recompute the detail level from the current tile size and point the
    /// cache at it
    fn update_detail(&mut self) {
        let tile_px = self.tile_px();
        self.detail = DetailLevel::for_tile_px(tile_px, &self.config);
        self.textures.configure(tile_px, self.detail);
    }
}
