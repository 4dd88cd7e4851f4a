use frontier::{Corner, CornerDecision, TileGrid, TileType};

/// A grid of `fill` with a single different tile at (10, 10)
fn island(fill: TileType, center: TileType) -> TileGrid {
    TileGrid::filled(fill).with_tile(10, 10, center)
}

#[test]
fn test_water_rounds_into_grass() {
    let grid = island(TileType::Grass, TileType::Water);
    let decision = CornerDecision::for_tile(&grid, 10, 10);
    assert_eq!(decision.corners(), [Some(TileType::Grass); 4]);
}

#[test]
fn test_pavement_stays_square() {
    let grid = island(TileType::Grass, TileType::Pavement);
    assert!(CornerDecision::for_tile(&grid, 10, 10).is_square());
}

#[test]
fn test_dirt_rounds_in_moss() {
    let grid = island(TileType::Moss, TileType::Dirt);
    let decision = CornerDecision::for_tile(&grid, 10, 10);
    for corner in [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ] {
        assert_eq!(decision.get(corner), Some(TileType::Moss));
    }
}

#[test]
fn test_grass_surrounded_by_dirt() {
    // Grass outranks dirt, but dirt on the top, left, and top-left wraps
    // that corner completely
    let grid = TileGrid::filled(TileType::Grass)
        .with_tile(9, 10, TileType::Dirt)
        .with_tile(10, 9, TileType::Dirt)
        .with_tile(9, 9, TileType::Dirt);
    let decision = CornerDecision::for_tile(&grid, 10, 10);
    assert_eq!(decision.get(Corner::TopLeft), Some(TileType::Dirt));
    assert_eq!(decision.get(Corner::TopRight), None);
    assert_eq!(decision.get(Corner::BottomLeft), None);
    assert_eq!(decision.get(Corner::BottomRight), None);

    // Without the diagonal, priority wins and grass stays square
    let grid = grid.with_tile(9, 9, TileType::Grass);
    assert!(CornerDecision::for_tile(&grid, 10, 10).is_square());
}

#[test]
fn test_unknown_tiles() {
    // An unknown code never rounds, and isn't a rounding source either
    let grid = TileGrid::parse_rows(["ggg", "g?g", "ggg"]);
    assert_eq!(grid.get(1, 1), Some(TileType::Unknown));
    assert!(CornerDecision::for_tile(&grid, 1, 1).is_square());
    assert!(CornerDecision::for_tile(&grid, 0, 0).is_square());
}

#[test]
fn test_grass_surrounded_by_unknown() {
    // A full ring of unknown codes is still not a rounding source
    let grid = island(TileType::Unknown, TileType::Grass);
    assert_eq!(grid.get(10, 10), Some(TileType::Grass));
    assert!(CornerDecision::for_tile(&grid, 10, 10).is_square());
}
