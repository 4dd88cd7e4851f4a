//! Compressed grid snapshots. A snapshot is the server's compact encoding of
//! a grid's terrain, used for grids the player isn't standing in:
//!
//! - 4 bits per tile (see [TileType::SNAPSHOT_ORDER] for the values)
//! - 4096 tiles, row-major, packed two per byte, high nibble first
//! - Base64 on the wire
//!
//! Decoding never fails. Truncated data is padded with grass and garbage
//! decodes as grass, so a bad snapshot shows up as a mostly-grass preview
//! instead of taking the frame down.

use crate::world::{grid::TileGrid, tile::TileType};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::warn;

/// Bytes in a complete snapshot
pub const SNAPSHOT_BYTES: usize = TileGrid::AREA / 2;

/// Unpack raw snapshot bytes into tiles. Nibbles without a tile type (14,
/// 15) and anything past the end of the data become grass.
pub fn unpack(bytes: &[u8]) -> TileGrid {
    if bytes.len() < SNAPSHOT_BYTES {
        warn!(
            "Snapshot is {} bytes, expected {}; padding with grass",
            bytes.len(),
            SNAPSHOT_BYTES
        );
    }
    let tiles = bytes
        .iter()
        .flat_map(|byte| [byte >> 4, byte & 0x0f])
        .map(|nibble| TileType::from_nibble(nibble).unwrap_or_default());
    TileGrid::from_tiles(tiles)
}

/// Pack a grid into raw snapshot bytes
pub fn pack(grid: &TileGrid) -> Vec<u8> {
    grid.tiles()
        .chunks(2)
        .map(|pair| (pair[0].nibble() << 4) | pair[1].nibble())
        .collect()
}

impl TileGrid {
    /// Decode a Base64 snapshot. Never fails, see the module docs for how bad
    /// input degrades.
    pub fn from_snapshot(encoded: &str) -> Self {
        match STANDARD.decode(encoded.trim()) {
            Ok(bytes) => unpack(&bytes),
            Err(err) => {
                warn!("Invalid grid snapshot ({err}), rendering as grass");
                Self::filled(TileType::Grass)
            }
        }
    }

    /// Encode this grid as a Base64 snapshot
    pub fn to_snapshot(&self) -> String {
        STANDARD.encode(pack(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_order() {
        // High nibble is the first tile
        let grid = unpack(&[0x23, 0x4a]);
        assert_eq!(grid.get(0, 0), Some(TileType::Dirt));
        assert_eq!(grid.get(0, 1), Some(TileType::Water));
        assert_eq!(grid.get(0, 2), Some(TileType::Pavement));
        assert_eq!(grid.get(0, 3), Some(TileType::Moss));
        assert_eq!(grid.get(0, 4), Some(TileType::Grass));
    }

    #[test]
    fn test_pack() {
        let grid = TileGrid::filled(TileType::Grass)
            .with_tile(0, 0, TileType::Snow)
            .with_tile(0, 1, TileType::Clay);
        let bytes = pack(&grid);
        assert_eq!(bytes.len(), SNAPSHOT_BYTES);
        assert_eq!(bytes[0], 0x7b);
        assert!(bytes[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let grid = TileGrid::parse_rows(["gsdwplnoxyzcuv", "zzzz", "", "w"]);
        let decoded = TileGrid::from_snapshot(&grid.to_snapshot());
        assert_eq!(decoded, grid);
    }

    #[test]
    fn test_unknown_nibbles_are_grass() {
        let grid = unpack(&[0xef, 0x3f]);
        assert_eq!(grid.get(0, 0), Some(TileType::Grass));
        assert_eq!(grid.get(0, 1), Some(TileType::Grass));
        assert_eq!(grid.get(0, 2), Some(TileType::Water));
        assert_eq!(grid.get(0, 3), Some(TileType::Grass));
    }

    #[test]
    fn test_short_snapshot() {
        // One byte of water, the rest should be padded
        let grid = TileGrid::from_snapshot(&STANDARD.encode([0x33]));
        assert_eq!(grid.get(0, 0), Some(TileType::Water));
        assert_eq!(grid.get(0, 1), Some(TileType::Water));
        assert_eq!(grid.get(0, 2), Some(TileType::Grass));
        assert_eq!(grid.get(63, 63), Some(TileType::Grass));
    }

    #[test]
    fn test_invalid_snapshot() {
        assert_eq!(
            TileGrid::from_snapshot("!!! not a snapshot !!!"),
            TileGrid::filled(TileType::Grass)
        );
        assert_eq!(TileGrid::from_snapshot(""), TileGrid::default());
    }
}
