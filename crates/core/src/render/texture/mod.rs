//! Tile bitmaps and the cache that holds them.
//!
//! Every visible tile gets a small RGBA bitmap: the base color, procedural
//! decoration (see [decoration]), and any rounded corners painted on top.
//! Building one is fairly expensive compared to blitting it, so bitmaps are
//! cached by [TextureKey]. A key fully determines the pixels, so the same
//! key always produces the same texture, before or after a cache clear.

pub mod decoration;

use crate::{
    render::{autotile::CornerDecision, canvas::Canvas, config::RenderConfig},
    util::modulo,
    world::tile::TileType,
};
use fnv::FnvHashMap;
use image::RgbaImage;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use strum::{Display, EnumIter, EnumString};

/// Upper bound (exclusive) of [seed]
pub const SEED_MODULUS: i64 = 10_000;

/// Deterministic per-position seed for decoration, in `[0, 10000)`. Also
/// used to pick which tiles get optional features (cracks, clumps...).
pub fn seed(row: i32, col: i32) -> u32 {
    modulo(i64::from(row) * 127 + i64::from(col) * 53, SEED_MODULUS) as u32
}

/// Which of `count` decoration variations a position uses. A `count` of 0 is
/// treated as 1.
pub fn variation(row: i32, col: i32, count: u32) -> u32 {
    let count = i64::from(count.max(1));
    modulo(i64::from(row) * 73 + i64::from(col) * 37, count) as u32
}

/// How much detail to draw. Chosen from the on-screen tile size: at small
/// sizes decoration is invisible noise, so we skip it.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DetailLevel {
    /// Base color, stones and corners only. One variation per type.
    Far,
    /// Everything
    Close,
}

impl DetailLevel {
    /// Pick the detail level for tiles drawn at a given pixel size
    pub fn for_tile_px(tile_px: u32, config: &RenderConfig) -> Self {
        if tile_px < config.close_detail_min_px {
            Self::Far
        } else {
            Self::Close
        }
    }

    /// Number of decoration variations at this detail level
    pub fn variations(self, config: &RenderConfig) -> u32 {
        match self {
            Self::Far => 1,
            Self::Close => config.close_variations,
        }
    }
}

/// Everything that determines a tile texture's pixels
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub tile_type: TileType,
    pub tile_px: u32,
    pub detail: DetailLevel,
    pub variation: u32,
    pub row: i32,
    pub col: i32,
    /// Rounded corners are painted into the bitmap, so they're part of the
    /// identity
    pub corners: CornerDecision,
}

impl TextureKey {
    pub fn new(
        tile_type: TileType,
        row: i32,
        col: i32,
        corners: CornerDecision,
        tile_px: u32,
        detail: DetailLevel,
        config: &RenderConfig,
    ) -> Self {
        // Far textures don't depend on position, so let them all share
        let (row, col) = match detail {
            DetailLevel::Far => (0, 0),
            DetailLevel::Close => (row, col),
        };
        Self {
            tile_type,
            tile_px,
            detail,
            variation: variation(row, col, detail.variations(config)),
            row,
            col,
            corners,
        }
    }

    /// Decoration seed for this key's position
    pub fn seed(&self) -> u32 {
        seed(self.row, self.col)
    }
}

/// A finished, square tile bitmap
#[derive(Clone, Debug, PartialEq)]
pub struct TileTexture {
    image: RgbaImage,
}

impl TileTexture {
    /// Draw the texture for a key from scratch
    pub fn build(key: &TextureKey, config: &RenderConfig) -> Self {
        let size = key.tile_px.max(1);
        let mut canvas =
            Canvas::filled(size, size, decoration::base_color(key.tile_type));
        decoration::decorate(&mut canvas, key, config.decorations);

        let radius = config.corner_radius * f64::from(size);
        for (corner, fill) in key.corners.fills(radius) {
            canvas.fill_corner(corner, fill);
        }
        Self {
            image: canvas.into_image(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Width (and height) in pixels
    pub fn size(&self) -> u32 {
        self.image.width()
    }
}

/// Cache of built textures. Owned by a renderer; there is no global cache.
///
/// The cache is only valid for a single tile size and detail level, so
/// [Self::configure] throws everything away when either changes.
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: FnvHashMap<TextureKey, TileTexture>,
    settings: Option<(u32, DetailLevel)>,
    hits: u64,
    misses: u64,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile size and detail level that upcoming textures will be
    /// built at. If either changed, the cache is cleared. Returns whether it
    /// was cleared.
    pub fn configure(&mut self, tile_px: u32, detail: DetailLevel) -> bool {
        let settings = Some((tile_px, detail));
        if self.settings == settings {
            return false;
        }
        debug!(
            "Texture settings changed to {}px/{}, clearing cache",
            tile_px, detail
        );
        self.settings = settings;
        self.clear();
        true
    }

    /// Get a texture from the cache, building it with `build` on a miss
    pub fn get_or_build(
        &mut self,
        key: TextureKey,
        build: impl FnOnce(&TextureKey) -> TileTexture,
    ) -> &TileTexture {
        match self.textures.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                trace!("Building texture {:?}", key);
                let texture = build(&key);
                entry.insert(texture)
            }
        }
    }

    /// Drop every cached texture. Hit/miss counters are kept.
    pub fn clear(&mut self) {
        if !self.textures.is_empty() {
            debug!("Clearing {} cached textures", self.textures.len());
        }
        self.textures.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(
        tile_type: TileType,
        row: i32,
        col: i32,
        detail: DetailLevel,
    ) -> TextureKey {
        TextureKey::new(
            tile_type,
            row,
            col,
            CornerDecision::SQUARE,
            32,
            detail,
            &RenderConfig::default(),
        )
    }

    #[test]
    fn test_seed() {
        assert_eq!(seed(0, 0), 0);
        assert_eq!(seed(1, 1), 180);
        assert_eq!(seed(100, 0), 2700);
        // Always in range, even for negative positions
        assert!(seed(-5, -9) < 10_000);
    }

    #[test]
    fn test_variation() {
        assert_eq!(variation(1, 1, 4), 2);
        assert_eq!(variation(5, 9, 1), 0);
        assert_eq!(variation(5, 9, 0), 0);
    }

    #[test]
    fn test_detail_level() {
        let config = RenderConfig::default();
        assert_eq!(DetailLevel::for_tile_px(8, &config), DetailLevel::Far);
        assert_eq!(DetailLevel::for_tile_px(23, &config), DetailLevel::Far);
        assert_eq!(DetailLevel::for_tile_px(24, &config), DetailLevel::Close);
        assert_eq!(DetailLevel::Far.variations(&config), 1);
        assert_eq!(DetailLevel::Close.variations(&config), 4);
    }

    #[test]
    fn test_far_keys_shared() {
        assert_eq!(
            key(TileType::Dirt, 3, 4, DetailLevel::Far),
            key(TileType::Dirt, 10, 20, DetailLevel::Far)
        );
        assert_ne!(
            key(TileType::Dirt, 3, 4, DetailLevel::Close),
            key(TileType::Dirt, 10, 20, DetailLevel::Close)
        );
    }

    #[test]
    fn test_cache() {
        let config = RenderConfig::default();
        let mut cache = TextureCache::new();
        assert!(cache.configure(32, DetailLevel::Close));
        assert!(!cache.configure(32, DetailLevel::Close));

        let key = key(TileType::Grass, 5, 9, DetailLevel::Close);
        let first = cache
            .get_or_build(key, |k| TileTexture::build(k, &config))
            .clone();
        let second = cache
            .get_or_build(key, |_| panic!("should be cached"))
            .clone();
        assert_eq!(first, second);
        assert_eq!(first.size(), 32);
        assert_eq!((cache.hits(), cache.misses(), cache.len()), (1, 1, 1));

        // Changing the size throws everything out
        assert!(cache.configure(16, DetailLevel::Far));
        assert!(cache.is_empty());
    }
}
