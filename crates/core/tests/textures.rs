use frontier::{
    CornerDecision, DetailLevel, RenderConfig, TileGrid, TileRenderer,
    TileType,
};

fn renderer() -> TileRenderer {
    TileRenderer::new(RenderConfig {
        base_tile_size: 32.0,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_texture_deterministic_across_clear() {
    let mut renderer = renderer();
    assert_eq!(renderer.detail(), DetailLevel::Close);

    let first = renderer
        .get_or_build_texture(TileType::Grass, 5, 9, CornerDecision::SQUARE)
        .clone();
    let second = renderer
        .get_or_build_texture(TileType::Grass, 5, 9, CornerDecision::SQUARE)
        .clone();
    assert_eq!(first, second);
    assert_eq!(renderer.textures().hits(), 1);

    renderer.clear_cache();
    assert!(renderer.textures().is_empty());
    let rebuilt = renderer
        .get_or_build_texture(TileType::Grass, 5, 9, CornerDecision::SQUARE)
        .clone();
    assert_eq!(first, rebuilt);
    assert_eq!(renderer.textures().misses(), 2);
}

#[test]
fn test_corners_are_part_of_the_texture() {
    let mut renderer = renderer();
    let grid =
        TileGrid::filled(TileType::Grass).with_tile(10, 10, TileType::Water);
    let rounded = renderer.texture(&grid, 10, 10).unwrap().clone();
    let square = renderer
        .get_or_build_texture(TileType::Water, 10, 10, CornerDecision::SQUARE)
        .clone();
    assert_ne!(rounded, square);
    assert_eq!(renderer.textures().len(), 2);

    // Top-left pixel is filled with the neighbor
    assert_eq!(
        *rounded.image().get_pixel(0, 0),
        TileType::Grass.color().to_rgba()
    );
}

#[test]
fn test_far_detail_shares_textures() {
    let mut renderer = renderer();
    renderer.set_zoom(0.25).unwrap();
    assert_eq!(renderer.detail(), DetailLevel::Far);
    let grid = TileGrid::filled(TileType::Dirt);
    for (row, col) in [(20, 20), (30, 40), (50, 2)] {
        renderer.texture(&grid, row, col).unwrap();
    }
    assert_eq!(renderer.textures().len(), 1);
}
