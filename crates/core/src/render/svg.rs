use crate::{
    render::{
        autotile::{Corner, CornerDecision},
        config::RenderConfig,
    },
    world::grid::TileGrid,
};
use svg::{
    node::{
        element::{Group, Path, Rectangle},
        Comment,
    },
    Document,
};

/// Render a grid as a flat SVG: one square per tile in its base color, with
/// rounded corners cut in. No decoration, this is meant for inspecting
/// terrain and autotiling rather than for looking nice.
pub fn grid_to_svg(grid: &TileGrid, config: &RenderConfig) -> Document {
    let tile_size = config.base_tile_size;
    let side = tile_size * TileGrid::SIZE as f64;
    let radius = config.corner_radius * tile_size;

    let mut document = Document::new()
        .set("viewBox", (0.0, 0.0, side, side))
        .set("shape-rendering", "crispEdges")
        .add(Comment::new(format!("\n{config:#?}\n")));

    for (row, col, tile_type) in grid.iter() {
        let x = f64::from(col) * tile_size;
        let y = f64::from(row) * tile_size;
        let mut group = Group::new()
            .set("transform", format!("translate({x} {y})"))
            .add(
                Rectangle::new()
                    .set("width", tile_size)
                    .set("height", tile_size)
                    .set("fill", tile_type.color().to_html()),
            );

        let corners = CornerDecision::for_tile(grid, row, col);
        for (corner, fill) in corners.fills(radius) {
            group = group.add(
                Path::new()
                    .set("d", corner_path(corner, tile_size, fill.radius))
                    .set("fill", fill.color.to_html()),
            );
        }
        document = document.add(group);
    }

    document
}

/// Path data for the sliver between a tile's corner and a quarter circle of
/// `radius` inset from it, relative to the tile's top-left
fn corner_path(corner: Corner, tile_size: f64, radius: f64) -> String {
    let (d_row, d_col) = corner.direction();
    let corner_x = if d_col < 0 { 0.0 } else { tile_size };
    let corner_y = if d_row < 0 { 0.0 } else { tile_size };
    // Where the arc meets the horizontal and vertical edges
    let edge_x = corner_x - f64::from(d_col) * radius;
    let edge_y = corner_y - f64::from(d_row) * radius;
    // Mirroring the corner flips the arc direction
    let sweep = if d_row * d_col > 0 { 0 } else { 1 };
    format!(
        "M {corner_x} {corner_y} L {edge_x} {corner_y} \
         A {radius} {radius} 0 0 {sweep} {corner_x} {edge_y} Z"
    )
}
