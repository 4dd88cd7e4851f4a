//! Procedural decoration drawn on top of a tile's base color.
//!
//! All shapes are laid out in unit space (`[0, 1]` on both axes) and scaled
//! to the tile size, so a texture looks the same at every zoom, just
//! sharper. Each tile type draws from its own RNG stream, seeded from the
//! tile's position seed plus a per-type salt, so neighbors of different
//! types don't produce correlated patterns.

use crate::{
    render::{
        canvas::Canvas,
        texture::{DetailLevel, TextureKey},
        unit::{Color3, Point2},
    },
    util::range::NumRange,
    world::tile::TileType,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f64::consts::{FRAC_PI_2, PI};

/// Grass tuft anchors for each variation. A tile draws the first 2-5 of its
/// variation's anchors.
const TUFT_ANCHORS: [[(f64, f64); 5]; 4] = [
    [(0.22, 0.30), (0.70, 0.22), (0.45, 0.62), (0.15, 0.82), (0.80, 0.75)],
    [(0.30, 0.20), (0.78, 0.45), (0.20, 0.58), (0.58, 0.85), (0.50, 0.40)],
    [(0.65, 0.28), (0.25, 0.45), (0.80, 0.80), (0.40, 0.85), (0.12, 0.18)],
    [(0.45, 0.25), (0.15, 0.68), (0.72, 0.58), (0.85, 0.15), (0.35, 0.90)],
];
/// Spots where a bright grass clump can go
const CLUMP_SPOTS: [(f64, f64); 4] =
    [(0.30, 0.35), (0.68, 0.32), (0.35, 0.70), (0.70, 0.72)];
/// Sets of snow shadow positions, one per variation
const SNOW_SETS: [[(f64, f64); 4]; 4] = [
    [(0.20, 0.25), (0.65, 0.20), (0.40, 0.60), (0.80, 0.78)],
    [(0.30, 0.15), (0.75, 0.45), (0.15, 0.70), (0.55, 0.85)],
    [(0.50, 0.30), (0.20, 0.50), (0.82, 0.65), (0.35, 0.85)],
    [(0.15, 0.20), (0.55, 0.50), (0.85, 0.25), (0.25, 0.80)],
];

const TUFT_HEIGHT: NumRange<f64> = NumRange::new(0.12, 0.18);
const TUFT_JITTER: NumRange<f64> = NumRange::new(-0.06, 0.06);
const MOSS_SCALE: NumRange<f64> = NumRange::new(1.5, 2.0);
const SPECK_RADIUS: NumRange<f64> = NumRange::new(0.025, 0.045);
const PEBBLE_RADIUS: NumRange<f64> = NumRange::new(0.06, 0.09);
const CRACK_SEGMENT: NumRange<f64> = NumRange::new(0.08, 0.14);
const CRACK_WIGGLE: NumRange<f64> = NumRange::new(-0.45, 0.45);
const RIPPLE_LENGTH: NumRange<f64> = NumRange::new(0.15, 0.25);
const UNIT: NumRange<f64> = NumRange::new(0.1, 0.9);
const BLADE_LEAN_JITTER: NumRange<f64> = NumRange::new(-0.15, 0.15);
const BLADE_HEIGHT: NumRange<f64> = NumRange::new(0.75, 1.0);
const CRACK_START_X: NumRange<f64> = NumRange::new(0.3, 0.7);
const CRACK_START_Y: NumRange<f64> = NumRange::new(0.15, 0.35);
const CRACK_HEADING_JITTER: NumRange<f64> = NumRange::new(-0.5, 0.5);
const CRACK_FORK_ANGLE: NumRange<f64> = NumRange::new(0.4, 0.9);
const SNOW_SHADOW_RADIUS: NumRange<f64> = NumRange::new(0.07, 0.11);
const DRIFT_X: NumRange<f64> = NumRange::new(0.3, 0.7);
const LUMP_TWIST: NumRange<f64> = NumRange::new(0.0, 1.0);
const EMBER_RADIUS: NumRange<f64> = NumRange::new(0.03, 0.06);

const BRIGHT_GRASS: Color3 = Color3::new_int(168, 206, 86);
const MOSS_ACCENT: Color3 = Color3::new_int(150, 196, 92);
const SNOW_SHADOW: Color3 = Color3::new_int(196, 210, 228);
const SPARKLE: Color3 = Color3::new_int(255, 255, 255);
const LAVA_GLOW: Color3 = Color3::new_int(255, 196, 64);

/// The color a tile is filled with before decoration. Stone types are laid
/// over grass.
pub fn base_color(tile_type: TileType) -> Color3 {
    match tile_type {
        TileType::Pavement | TileType::Cobblestone => TileType::Grass.color(),
        other => other.color(),
    }
}

/// Draw all decoration for a key onto a canvas that's already been filled
/// with [base_color]. With `enabled` off, or at [DetailLevel::Far], only
/// stones are drawn.
pub fn decorate(canvas: &mut Canvas, key: &TextureKey, enabled: bool) {
    let close = enabled && key.detail == DetailLevel::Close;
    let mut painter = Painter::new(canvas, key);
    match key.tile_type {
        TileType::Pavement => painter.stones(1, close),
        TileType::Cobblestone => painter.stones(2, close),
        _ if !close => {}
        TileType::Grass => painter.grass(),
        TileType::Dirt | TileType::Sand | TileType::Clay => painter.specks(),
        TileType::Slate | TileType::Dungeon => painter.cracks(),
        TileType::Snow => painter.snow(),
        TileType::Moss => painter.moss(),
        TileType::Water => painter.ripples(),
        TileType::Lava => painter.glow(),
        TileType::ReservedA | TileType::ReservedB | TileType::Unknown => {}
    }
}

struct Painter<'a> {
    canvas: &'a mut Canvas,
    rng: Pcg32,
    tile_type: TileType,
    seed: u32,
    variation: usize,
    size: f64,
}

impl<'a> Painter<'a> {
    fn new(canvas: &'a mut Canvas, key: &TextureKey) -> Self {
        let seed = key.seed();
        // The type's char code is the salt
        let salt = u64::from(u32::from(key.tile_type.code()));
        Self {
            size: f64::from(canvas.width()),
            canvas,
            rng: Pcg32::seed_from_u64((u64::from(seed) << 8) ^ salt),
            tile_type: key.tile_type,
            seed,
            variation: key.variation as usize,
        }
    }

    /// Convert unit coordinates to pixels
    fn at(&self, x: f64, y: f64) -> Point2 {
        Point2::new(x, y) * self.size
    }

    /// A uniformly random point, away from the tile edges
    fn random_point(&mut self) -> Point2 {
        let x = self.rng.gen_range(UNIT);
        let y = self.rng.gen_range(UNIT);
        self.at(x, y)
    }

    /// A fixed anchor nudged by a little noise
    fn jittered(&mut self, (x, y): (f64, f64)) -> Point2 {
        let dx = self.rng.gen_range(TUFT_JITTER);
        let dy = self.rng.gen_range(TUFT_JITTER);
        self.at(x + dx, y + dy)
    }

    fn color(&self) -> Color3 {
        self.tile_type.color()
    }

    /// A few blades of grass fanning up from `base`
    fn tuft(&mut self, base: Point2, height: f64, color: Color3) {
        let width = (height * 0.16).max(1.5);
        for lean in [-0.45_f64, 0.0, 0.45] {
            let angle = lean + self.rng.gen_range(BLADE_LEAN_JITTER);
            let blade_height = height * self.rng.gen_range(BLADE_HEIGHT);
            let tip = base
                + Point2::new(angle.sin(), -angle.cos()) * blade_height;
            let left = base + Point2::new(-width / 2.0 + lean * width, 0.0);
            let right = base + Point2::new(width / 2.0 + lean * width, 0.0);
            self.canvas.fill_polygon(&[left, tip, right], color, 1.0);
        }
    }

    fn grass(&mut self) {
        let dark = self.color().darken(0.25);
        let light = self.color().lighten(0.12);
        let count = self.rng.gen_range(2..=5);
        let anchors = TUFT_ANCHORS[self.variation % TUFT_ANCHORS.len()];
        for (i, anchor) in anchors.into_iter().take(count).enumerate() {
            let base = self.jittered(anchor);
            let height = self.rng.gen_range(TUFT_HEIGHT) * self.size;
            let color = if i % 2 == 0 { dark } else { light };
            self.tuft(base, height, color);
        }

        if self.rng.gen_bool(0.2) {
            let (x, y) = CLUMP_SPOTS[self.seed as usize % CLUMP_SPOTS.len()];
            let base = self.at(x, y);
            let height = TUFT_HEIGHT.max * self.size;
            self.tuft(base, height, BRIGHT_GRASS);
            let beside = base + Point2::new(height * 0.4, 0.0);
            self.tuft(beside, height * 0.8, BRIGHT_GRASS);
        }
    }

    /// Dirt, sand and clay
    fn specks(&mut self) {
        let dark = self.color().darken(0.2);
        let light = self.color().lighten(0.2);
        let count = self.rng.gen_range(4..=8);
        for _ in 0..count {
            let center = self.random_point();
            let radius =
                (self.rng.gen_range(SPECK_RADIUS) * self.size).max(0.5);
            let color = if self.rng.gen_bool(0.5) { dark } else { light };
            self.canvas.fill_circle(center, radius, color, 0.8);
        }

        if self.rng.gen_bool(0.25) {
            let center = self.random_point();
            let radius = self.rng.gen_range(PEBBLE_RADIUS) * self.size;
            let (pebble, shine_color) =
                (self.color().darken(0.35), self.color().lighten(0.25));
            self.canvas.fill_circle(center, radius, pebble, 1.0);
            // Highlight towards the top-left
            let shine = center - Point2::new(radius, radius) * 0.3;
            self.canvas.fill_circle(shine, radius * 0.4, shine_color, 0.8);
        }
    }

    /// Slate and dungeon. Only every third tile cracks.
    fn cracks(&mut self) {
        if self.seed % 3 != 0 {
            return;
        }
        let color = self.color().darken(0.35);
        let thickness = (self.size * 0.025).max(1.0);
        let x = self.rng.gen_range(CRACK_START_X);
        let y = self.rng.gen_range(CRACK_START_Y);
        let start = self.at(x, y);
        // Trunk heads roughly downwards
        let heading = FRAC_PI_2 + self.rng.gen_range(CRACK_HEADING_JITTER);
        let segments = self.rng.gen_range(3..=4);
        let (fork, heading) =
            self.crack(start, heading, segments, thickness, color);

        let forks = self.rng.gen_range(1..=2);
        for i in 0..forks {
            let side = if i == 0 { 1.0 } else { -1.0_f64 };
            let branch_heading =
                heading + side * self.rng.gen_range(CRACK_FORK_ANGLE);
            let segments = self.rng.gen_range(2..=3);
            self.crack(fork, branch_heading, segments, thickness, color);
        }
    }

    /// Draw one wiggly crack line. Returns where it ended and its final
    /// heading.
    fn crack(
        &mut self,
        mut position: Point2,
        mut heading: f64,
        segments: usize,
        thickness: f64,
        color: Color3,
    ) -> (Point2, f64) {
        for _ in 0..segments {
            heading += self.rng.gen_range(CRACK_WIGGLE);
            let length = self.rng.gen_range(CRACK_SEGMENT) * self.size;
            let next =
                position + Point2::new(heading.cos(), heading.sin()) * length;
            self.canvas
                .stroke_line(position, next, thickness, color, 0.9);
            position = next;
        }
        (position, heading)
    }

    fn snow(&mut self) {
        let set = SNOW_SETS[self.variation % SNOW_SETS.len()];
        for (x, y) in set {
            let center = self.at(x, y);
            let radius = self.rng.gen_range(SNOW_SHADOW_RADIUS) * self.size;
            self.canvas.fill_circle(center, radius, SNOW_SHADOW, 0.5);
            // Sparkle just off the shadow
            let sparkle = center + Point2::new(radius, -radius) * 1.2;
            let sparkle_radius = (self.size * 0.02).max(0.5);
            self.canvas.fill_circle(sparkle, sparkle_radius, SPARKLE, 1.0);
        }

        if self.rng.gen_bool(0.1) {
            let x = self.rng.gen_range(DRIFT_X);
            let center = self.at(x, 0.8);
            self.canvas
                .fill_circle(center, self.size * 0.25, SNOW_SHADOW, 0.35);
        }
    }

    fn moss(&mut self) {
        let dark = self.color().darken(0.2);
        let count = self.rng.gen_range(2..=4);
        let anchors = TUFT_ANCHORS[self.variation % TUFT_ANCHORS.len()];
        for anchor in anchors.into_iter().take(count) {
            let center = self.jittered(anchor);
            let radius = self.rng.gen_range(TUFT_HEIGHT)
                * self.rng.gen_range(MOSS_SCALE)
                * self.size
                / 2.0;
            self.clump(center, radius, dark);
        }

        if self.rng.gen_bool(0.4) {
            let center = self.random_point();
            let radius = self.size * 0.1;
            let highlight = self.color().lighten(0.18);
            self.clump(center, radius, highlight);
        }

        for _ in 0..self.rng.gen_range(2..=4) {
            let center = self.random_point();
            self.canvas.fill_circle(
                center,
                (self.size * 0.025).max(0.5),
                MOSS_ACCENT,
                1.0,
            );
        }
    }

    /// A lumpy blob of overlapping circles
    fn clump(&mut self, center: Point2, radius: f64, color: Color3) {
        self.canvas.fill_circle(center, radius, color, 1.0);
        for i in 0..3 {
            let angle =
                f64::from(i) * 2.0 * PI / 3.0 + self.rng.gen_range(LUMP_TWIST);
            let offset = Point2::new(angle.cos(), angle.sin()) * radius * 0.6;
            self.canvas
                .fill_circle(center + offset, radius * 0.65, color, 1.0);
        }
    }

    fn ripples(&mut self) {
        let color = self.color().lighten(0.3);
        let thickness = (self.size * 0.03).max(1.0);
        for _ in 0..self.rng.gen_range(2..=3) {
            let start = self.random_point();
            let length = self.rng.gen_range(RIPPLE_LENGTH) * self.size;
            let end = start + Point2::new(length, 0.0);
            self.canvas.stroke_line(start, end, thickness, color, 0.6);
        }
    }

    fn glow(&mut self) {
        for _ in 0..self.rng.gen_range(3..=6) {
            let center = self.random_point();
            let radius =
                (self.rng.gen_range(EMBER_RADIUS) * self.size).max(0.5);
            self.canvas
                .fill_circle(center, radius * 2.0, LAVA_GLOW, 0.35);
            self.canvas.fill_circle(center, radius, LAVA_GLOW, 1.0);
        }
    }

    /// Beveled stones in an `n × n` layout over the grass underlay. Tufts
    /// poking through the seams are close-detail only.
    fn stones(&mut self, per_side: u32, close: bool) {
        let cell = self.size / f64::from(per_side);
        let min_margin = if self.size >= 4.0 { 1.0 } else { 0.0 };
        let margin = (cell * 0.06).max(min_margin);
        let bevel = (cell * 0.08).max(1.0);
        let color = self.color();
        for row in 0..per_side {
            for col in 0..per_side {
                let top_left = Point2::new(f64::from(col), f64::from(row))
                    * cell
                    + Point2::new(margin, margin);
                let side = cell - 2.0 * margin;
                self.canvas.fill_rect(top_left, side, side, color, 1.0);
                if side > 3.0 * bevel {
                    // Light from the top-left
                    let light = color.lighten(0.2);
                    let dark = color.darken(0.25);
                    self.canvas.fill_rect(top_left, side, bevel, light, 1.0);
                    self.canvas.fill_rect(top_left, bevel, side, light, 1.0);
                    let bottom = top_left + Point2::new(0.0, side - bevel);
                    let right = top_left + Point2::new(side - bevel, 0.0);
                    self.canvas.fill_rect(bottom, side, bevel, dark, 1.0);
                    self.canvas.fill_rect(right, bevel, side, dark, 1.0);
                }
            }
        }

        if close && self.rng.gen_bool(0.6) {
            let grass = TileType::Grass.color().darken(0.2);
            let height = self.size * 0.12;
            let seams: &[(f64, f64)] = if per_side == 1 {
                &[(0.5, 1.0), (1.0, 0.5)]
            } else {
                &[(0.5, 0.5), (0.25, 0.5), (0.5, 0.75)]
            };
            let count = self.rng.gen_range(1..=seams.len());
            for &(x, y) in &seams[..count] {
                let base = self.at(x, y);
                self.tuft(base, height, grass);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{autotile::CornerDecision, config::RenderConfig};

    fn draw(
        tile_type: TileType,
        row: i32,
        col: i32,
        detail: DetailLevel,
    ) -> Canvas {
        let key = TextureKey::new(
            tile_type,
            row,
            col,
            CornerDecision::SQUARE,
            32,
            detail,
            &RenderConfig::default(),
        );
        let mut canvas = Canvas::filled(32, 32, base_color(tile_type));
        decorate(&mut canvas, &key, true);
        canvas
    }

    fn is_plain(canvas: &Canvas, color: Color3) -> bool {
        canvas.image().pixels().all(|p| *p == color.to_rgba())
    }

    #[test]
    fn test_deterministic() {
        for tile_type in [TileType::Grass, TileType::Moss, TileType::Slate] {
            let a = draw(tile_type, 12, 30, DetailLevel::Close);
            let b = draw(tile_type, 12, 30, DetailLevel::Close);
            assert_eq!(a.image(), b.image());
        }
    }

    #[test]
    fn test_far_is_plain() {
        let canvas = draw(TileType::Grass, 4, 4, DetailLevel::Far);
        assert!(is_plain(&canvas, TileType::Grass.color()));
    }

    #[test]
    fn test_grass_decorated() {
        let canvas = draw(TileType::Grass, 4, 4, DetailLevel::Close);
        assert!(!is_plain(&canvas, TileType::Grass.color()));
    }

    #[test]
    fn test_stones_always_drawn() {
        let canvas = draw(TileType::Pavement, 0, 0, DetailLevel::Far);
        // Grass underlay in the margin, stone in the middle
        assert_eq!(
            *canvas.image().get_pixel(0, 0),
            TileType::Grass.color().to_rgba()
        );
        assert_eq!(
            *canvas.image().get_pixel(16, 16),
            TileType::Pavement.color().to_rgba()
        );
    }

    #[test]
    fn test_snow_follows_variation() {
        // (1, 0) is variation 1 but its seed (127) is 3 mod 4
        let key = TextureKey::new(
            TileType::Snow,
            1,
            0,
            CornerDecision::SQUARE,
            32,
            DetailLevel::Close,
            &RenderConfig::default(),
        );
        assert_eq!(key.variation, 1);
        let canvas = draw(TileType::Snow, 1, 0, DetailLevel::Close);
        // First shadow of the second set sits at (0.3, 0.15)
        assert_ne!(
            *canvas.image().get_pixel(9, 4),
            TileType::Snow.color().to_rgba()
        );
    }

    #[test]
    fn test_cracks_every_third_tile() {
        // seed(0, 1) = 53, not a multiple of 3
        let canvas = draw(TileType::Slate, 0, 1, DetailLevel::Close);
        assert!(is_plain(&canvas, TileType::Slate.color()));
        // seed(0, 3) = 159
        let canvas = draw(TileType::Slate, 0, 3, DetailLevel::Close);
        assert!(!is_plain(&canvas, TileType::Slate.color()));
    }
}
