//! Settlement and frontier overview maps.
//!
//! Grids the player has visited are drawn from their terrain snapshots at 1
//! pixel per tile. Everything else is fogged: a flat placeholder color, or an
//! owner label for claimed homesteads. Decoded previews are cached per grid,
//! since the same snapshot is shown every time the map is opened.

use crate::{
    render::{
        canvas::Canvas,
        config::RenderConfig,
        unit::{Color3, Point2},
    },
    timed,
    world::{
        coords::{LocalPos, GRIDS_PER_SETTLEMENT, SETTLEMENTS_PER_FRONTIER},
        grid::TileGrid,
        tile::TileType,
        visited::VisitedGrids,
        GridKind, GridSummary,
    },
};
use fnv::FnvHashMap;
use image::{
    imageops::{self, FilterType},
    RgbaImage,
};
use log::{trace, warn};
use serde::Serialize;
use std::rc::Rc;

/// Pixels per grid side in a settlement map: one per tile
pub const PREVIEW_PX: u32 = TileGrid::SIZE as u32;
/// Pixels per side of a full settlement map
pub const SETTLEMENT_PX: u32 = PREVIEW_PX * GRIDS_PER_SETTLEMENT as u32;

/// What to show for one grid on the map
#[derive(Clone, Debug, PartialEq)]
pub enum GridPreview {
    /// Visited, with terrain. The bitmap is shared with the cache.
    Tiles(Rc<RgbaImage>),
    /// A claimed homestead. Drawn as a plain cell with the owner's name on
    /// top.
    Owner(String),
    /// Not visited, or no terrain data. Drawn as a flat color.
    Placeholder(Color3),
}

impl GridPreview {
    /// Flat fill color for a grid with no terrain to show
    pub fn placeholder_color(kind: GridKind) -> Color3 {
        match kind {
            GridKind::Valley => TileType::Grass.color(),
            GridKind::Homestead | GridKind::Town => TileType::Dirt.color(),
        }
    }
}

/// An owner's name, to be drawn by the caller centered on `center`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OwnerLabel {
    pub grid: LocalPos,
    pub owner: String,
    /// Center of the grid's cell, in map pixels
    pub center: Point2,
}

/// A composited settlement map. Text is left to the caller, who has fonts.
#[derive(Clone, Debug)]
pub struct SettlementMap {
    pub image: RgbaImage,
    pub labels: Vec<OwnerLabel>,
}

/// Builds minimaps and holds the preview cache. Owned by whoever shows the
/// map; there is no global cache.
#[derive(Debug)]
pub struct MinimapCompositor {
    /// Decoded previews, keyed by visited-grid bit index
    previews: FnvHashMap<usize, Rc<RgbaImage>>,
    frontier_grid_px: u32,
}

impl MinimapCompositor {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            previews: FnvHashMap::default(),
            frontier_grid_px: config.frontier_grid_px,
        }
    }

    /// Decide how a grid should be shown, decoding (and caching) its
    /// snapshot if it's been visited
    pub fn preview(
        &mut self,
        summary: &GridSummary,
        visited: &VisitedGrids,
    ) -> GridPreview {
        if let (GridKind::Homestead, Some(owner)) =
            (summary.kind, &summary.owner)
        {
            return GridPreview::Owner(owner.clone());
        }

        let bit = summary.coord.visited_bit();
        match (bit, &summary.snapshot) {
            (Some(bit), Some(snapshot)) if visited.is_visited(bit) => {
                let image = self.previews.entry(bit).or_insert_with(|| {
                    trace!("Decoding preview for grid {}", summary.coord);
                    Rc::new(preview_image(&TileGrid::from_snapshot(snapshot)))
                });
                GridPreview::Tiles(Rc::clone(image))
            }
            _ => GridPreview::Placeholder(GridPreview::placeholder_color(
                summary.kind,
            )),
        }
    }

    /// Forget one grid's preview, e.g. after the server sends a new snapshot
    pub fn invalidate(&mut self, bit: usize) {
        self.previews.remove(&bit);
    }

    pub fn clear(&mut self) {
        self.previews.clear();
    }

    /// Number of cached previews
    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    /// Draw one settlement at 1 pixel per tile. Grids belonging to other
    /// settlements are ignored. The grid the player is standing in
    /// (`current`) is left transparent, since the live view covers it.
    pub fn compose_settlement(
        &mut self,
        settlement: LocalPos,
        grids: &[GridSummary],
        visited: &VisitedGrids,
        current: Option<LocalPos>,
    ) -> SettlementMap {
        timed!("Settlement map", log::Level::Info, {
            let mut image = RgbaImage::new(SETTLEMENT_PX, SETTLEMENT_PX);
            let mut labels = Vec::new();
            for summary in grids
                .iter()
                .filter(|summary| summary.coord.settlement() == settlement)
            {
                let grid = summary.coord.grid();
                if !in_settlement(grid) {
                    warn!("Grid {} is outside its settlement", summary.coord);
                    continue;
                }
                if current == Some(grid) {
                    continue;
                }
                let x = i64::from(grid.x) * i64::from(PREVIEW_PX);
                let y = i64::from(grid.y) * i64::from(PREVIEW_PX);
                let cell = match self.preview(summary, visited) {
                    GridPreview::Tiles(preview) => (*preview).clone(),
                    GridPreview::Owner(owner) => {
                        let half = f64::from(PREVIEW_PX) / 2.0;
                        let center =
                            Point2::new(x as f64 + half, y as f64 + half);
                        labels.push(OwnerLabel {
                            grid,
                            owner,
                            center,
                        });
                        owner_cell()
                    }
                    GridPreview::Placeholder(color) => {
                        Canvas::filled(PREVIEW_PX, PREVIEW_PX, color)
                            .into_image()
                    }
                };
                imageops::replace(&mut image, &cell, x, y);
            }
            SettlementMap { image, labels }
        })
    }

    /// Draw the whole frontier, each settlement shrunk to
    /// `frontier_grid_px` pixels per grid. Owner labels are dropped at this
    /// scale.
    pub fn compose_frontier(
        &mut self,
        grids: &[GridSummary],
        visited: &VisitedGrids,
        current: Option<(LocalPos, LocalPos)>,
    ) -> RgbaImage {
        timed!("Frontier map", log::Level::Info, {
            let cell_px = self.frontier_grid_px * GRIDS_PER_SETTLEMENT as u32;
            let side = cell_px * SETTLEMENTS_PER_FRONTIER as u32;
            let mut image = RgbaImage::new(side, side);

            let mut settlements: Vec<LocalPos> = grids
                .iter()
                .map(|summary| summary.coord.settlement())
                .collect();
            settlements.sort_by_key(|pos| (pos.y, pos.x));
            settlements.dedup();

            for settlement in settlements {
                if !in_frontier(settlement) {
                    warn!("Settlement {} is outside the frontier", settlement);
                    continue;
                }
                let current_grid = current
                    .filter(|(s, _)| *s == settlement)
                    .map(|(_, grid)| grid);
                let map = self.compose_settlement(
                    settlement,
                    grids,
                    visited,
                    current_grid,
                );
                let small = imageops::resize(
                    &map.image,
                    cell_px,
                    cell_px,
                    FilterType::Nearest,
                );
                imageops::replace(
                    &mut image,
                    &small,
                    i64::from(settlement.x) * i64::from(cell_px),
                    i64::from(settlement.y) * i64::from(cell_px),
                );
            }
            image
        })
    }
}

/// 1 pixel per tile rendering of a grid's base colors
pub fn preview_image(grid: &TileGrid) -> RgbaImage {
    RgbaImage::from_fn(PREVIEW_PX, PREVIEW_PX, |x, y| {
        grid.get(y as i32, x as i32)
            .unwrap_or_default()
            .color()
            .to_rgba()
    })
}

/// A claimed homestead: dirt with a dark border so the label stands out
fn owner_cell() -> RgbaImage {
    let color = GridPreview::placeholder_color(GridKind::Homestead);
    let mut canvas = Canvas::filled(PREVIEW_PX, PREVIEW_PX, color.darken(0.4));
    let border = 2.0;
    let inner = f64::from(PREVIEW_PX) - 2.0 * border;
    canvas.fill_rect(Point2::new(border, border), inner, inner, color, 1.0);
    canvas.into_image()
}

fn in_settlement(grid: LocalPos) -> bool {
    (0..GRIDS_PER_SETTLEMENT).contains(&grid.x)
        && (0..GRIDS_PER_SETTLEMENT).contains(&grid.y)
}

fn in_frontier(settlement: LocalPos) -> bool {
    (0..SETTLEMENTS_PER_FRONTIER).contains(&settlement.x)
        && (0..SETTLEMENTS_PER_FRONTIER).contains(&settlement.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::coords::GridCoord;

    fn summary(
        encoded: i64,
        kind: GridKind,
        owner: Option<&str>,
        snapshot: Option<String>,
    ) -> GridSummary {
        GridSummary {
            coord: GridCoord::parse(encoded).unwrap(),
            kind,
            owner: owner.map(String::from),
            snapshot,
        }
    }

    fn water_snapshot() -> String {
        TileGrid::filled(TileType::Water).to_snapshot()
    }

    #[test]
    fn test_preview() {
        let mut compositor = MinimapCompositor::new(&RenderConfig::default());
        let mut visited = VisitedGrids::new();
        let valley =
            summary(1_000_012, GridKind::Valley, None, Some(water_snapshot()));

        // Not visited yet
        assert_eq!(
            compositor.preview(&valley, &visited),
            GridPreview::Placeholder(TileType::Grass.color())
        );
        assert!(compositor.is_empty());

        visited.mark_visited(valley.coord.visited_bit().unwrap());
        match compositor.preview(&valley, &visited) {
            GridPreview::Tiles(image) => {
                assert_eq!(
                    *image.get_pixel(10, 10),
                    TileType::Water.color().to_rgba()
                );
            }
            other => panic!("Expected tiles, got {other:?}"),
        }
        compositor.preview(&valley, &visited);
        assert_eq!(compositor.len(), 1);

        let homestead =
            summary(1_000_013, GridKind::Homestead, Some("ana"), None);
        assert_eq!(
            compositor.preview(&homestead, &visited),
            GridPreview::Owner("ana".into())
        );
    }

    #[test]
    fn test_invalidate() {
        let mut compositor = MinimapCompositor::new(&RenderConfig::default());
        let mut visited = VisitedGrids::new();
        let mut valley =
            summary(1_000_012, GridKind::Valley, None, Some(water_snapshot()));
        let bit = valley.coord.visited_bit().unwrap();
        visited.mark_visited(bit);
        let corner_color = |preview: GridPreview| match preview {
            GridPreview::Tiles(image) => *image.get_pixel(0, 0),
            other => panic!("Expected tiles, got {other:?}"),
        };

        compositor.preview(&valley, &visited);
        // A new snapshot isn't picked up until the old preview is dropped
        valley.snapshot = Some(TileGrid::filled(TileType::Lava).to_snapshot());
        assert_eq!(
            corner_color(compositor.preview(&valley, &visited)),
            TileType::Water.color().to_rgba()
        );
        compositor.invalidate(bit);
        assert!(compositor.is_empty());
        assert_eq!(
            corner_color(compositor.preview(&valley, &visited)),
            TileType::Lava.color().to_rgba()
        );
        assert_eq!(compositor.len(), 1);
    }

    #[test]
    fn test_compose_settlement() {
        let mut compositor = MinimapCompositor::new(&RenderConfig::default());
        let mut visited = VisitedGrids::new();
        let grids = vec![
            summary(1_000_000, GridKind::Valley, None, Some(water_snapshot())),
            summary(1_000_001, GridKind::Town, None, None),
            summary(1_000_002, GridKind::Homestead, Some("bo"), None),
            summary(1_000_003, GridKind::Valley, None, None),
            // Different settlement
            summary(1_000_100, GridKind::Town, None, None),
        ];
        visited.mark_visited(grids[0].coord.visited_bit().unwrap());

        let map = compositor.compose_settlement(
            LocalPos::new(0, 0),
            &grids,
            &visited,
            Some(LocalPos::new(3, 0)),
        );
        let pixel = |x, y| *map.image.get_pixel(x, y);
        assert_eq!(map.image.dimensions(), (512, 512));
        assert_eq!(pixel(5, 5), TileType::Water.color().to_rgba());
        assert_eq!(pixel(70, 5), TileType::Dirt.color().to_rgba());
        // Current grid stays transparent
        assert_eq!(pixel(200, 5)[3], 0);
        // No data at all
        assert_eq!(pixel(300, 300)[3], 0);

        assert_eq!(map.labels.len(), 1);
        assert_eq!(map.labels[0].owner, "bo");
        assert_eq!(map.labels[0].center, Point2::new(160.0, 32.0));
    }

    #[test]
    fn test_compose_frontier() {
        let mut compositor = MinimapCompositor::new(&RenderConfig::default());
        let grids = vec![summary(1_001_100, GridKind::Valley, None, None)];
        let image =
            compositor.compose_frontier(&grids, &VisitedGrids::new(), None);
        // 8 settlements × 8 grids × 8 px
        assert_eq!(image.dimensions(), (512, 512));
        // Settlement (1, 1), grid (0, 0)
        assert_eq!(*image.get_pixel(66, 66), TileType::Grass.color().to_rgba());
        assert_eq!(image.get_pixel(0, 0)[3], 0);
    }
}
