use crate::world::coords::{GRIDS_PER_SETTLEMENT, SETTLEMENTS_PER_FRONTIER};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The set of grids a player has visited within one frontier. One bit per
/// grid: 64 settlements × 64 grids = 4096 bits = 512 bytes.
///
/// Bit `i` lives in byte `i >> 3` under mask `1 << (i & 7)`. Indexes come
/// from [VisitedGrids::bit_index].
///
/// Serializes as a Base64 string, which is how the server hands it out.
#[derive(Clone, PartialEq, Eq)]
pub struct VisitedGrids {
    bits: Box<[u8; Self::BYTES]>,
}

impl VisitedGrids {
    /// Number of bits (= grids in a frontier)
    pub const BITS: usize = (SETTLEMENTS_PER_FRONTIER
        * SETTLEMENTS_PER_FRONTIER
        * GRIDS_PER_SETTLEMENT
        * GRIDS_PER_SETTLEMENT) as usize;
    pub const BYTES: usize = Self::BITS / 8;

    /// An empty set, nothing visited
    pub fn new() -> Self {
        Self {
            bits: Box::new([0; Self::BYTES]),
        }
    }

    /// Load from raw bytes. Short input is zero-padded and extra bytes are
    /// dropped, so a bad payload just loses (or never had) some visits.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut visited = Self::new();
        let len = bytes.len().min(Self::BYTES);
        visited.bits[..len].copy_from_slice(&bytes[..len]);
        visited
    }

    /// Load from a Base64 string. Errors only if the string isn't Base64.
    pub fn from_base64(encoded: &str) -> anyhow::Result<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_slice()
    }

    /// Compute the bit for a grid:
    /// `(settlementRow*8 + settlementCol)*64 + (gridRow*8 + gridCol)`.
    ///
    /// Returns `None` if any component is outside `0..8`.
    pub fn bit_index(
        settlement_row: i32,
        settlement_col: i32,
        grid_row: i32,
        grid_col: i32,
    ) -> Option<usize> {
        let in_frontier = 0..SETTLEMENTS_PER_FRONTIER;
        let in_settlement = 0..GRIDS_PER_SETTLEMENT;
        if !(in_frontier.contains(&settlement_row)
            && in_frontier.contains(&settlement_col)
            && in_settlement.contains(&grid_row)
            && in_settlement.contains(&grid_col))
        {
            return None;
        }
        let settlement =
            settlement_row * SETTLEMENTS_PER_FRONTIER + settlement_col;
        let grid = grid_row * GRIDS_PER_SETTLEMENT + grid_col;
        let grids_per_settlement = GRIDS_PER_SETTLEMENT * GRIDS_PER_SETTLEMENT;
        Some((settlement * grids_per_settlement + grid) as usize)
    }

    /// Mark a grid as visited. Returns `false` (and does nothing) if the
    /// index is out of range. Marking twice is the same as marking once.
    pub fn mark_visited(&mut self, bit: usize) -> bool {
        match self.bits.get_mut(bit >> 3) {
            Some(byte) => {
                *byte |= 1 << (bit & 7);
                true
            }
            None => false,
        }
    }

    /// Has this grid been visited? Out-of-range indexes never have been.
    pub fn is_visited(&self, bit: usize) -> bool {
        self.bits
            .get(bit >> 3)
            .map_or(false, |byte| byte & (1 << (bit & 7)) != 0)
    }

    /// Total number of visited grids
    pub fn count(&self) -> usize {
        self.bits.iter().map(|byte| byte.count_ones() as usize).sum()
    }
}

impl Default for VisitedGrids {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VisitedGrids {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 512 raw bytes is useless in a log line
        f.debug_struct("VisitedGrids")
            .field("count", &self.count())
            .finish()
    }
}

impl Serialize for VisitedGrids {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for VisitedGrids {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        deserializer.deserialize_str(VisitedGridsVisitor)
    }
}

struct VisitedGridsVisitor;

impl<'de> Visitor<'de> for VisitedGridsVisitor {
    type Value = VisitedGrids;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a base64 string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        VisitedGrids::from_base64(value).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_bit_index() {
        assert_eq!(VisitedGrids::bit_index(0, 0, 0, 0), Some(0));
        assert_eq!(VisitedGrids::bit_index(0, 0, 0, 7), Some(7));
        assert_eq!(VisitedGrids::bit_index(0, 0, 1, 0), Some(8));
        assert_eq!(VisitedGrids::bit_index(0, 1, 0, 0), Some(64));
        assert_eq!(VisitedGrids::bit_index(7, 7, 7, 7), Some(4095));

        assert_eq!(VisitedGrids::bit_index(-1, 0, 0, 0), None);
        assert_eq!(VisitedGrids::bit_index(0, 8, 0, 0), None);
        assert_eq!(VisitedGrids::bit_index(0, 0, 0, 8), None);
    }

    #[test]
    fn test_mark_visited() {
        let mut visited = VisitedGrids::new();
        assert!(visited.mark_visited(9));
        assert_eq!(visited.as_bytes()[1], 0b0000_0010);
        assert!(visited.is_visited(9));
        assert!(!visited.is_visited(8));
        assert!(!visited.is_visited(10));
        assert_eq!(visited.count(), 1);
    }

    #[test]
    fn test_mark_visited_idempotent() {
        let mut once = VisitedGrids::new();
        once.mark_visited(1234);
        let mut twice = VisitedGrids::new();
        twice.mark_visited(1234);
        twice.mark_visited(1234);
        assert_eq!(once, twice);

        for i in 0..VisitedGrids::BITS {
            assert_eq!(twice.is_visited(i), i == 1234, "bit {i}");
        }
    }

    #[test]
    fn test_out_of_range() {
        let mut visited = VisitedGrids::new();
        assert!(!visited.mark_visited(VisitedGrids::BITS));
        assert!(!visited.is_visited(VisitedGrids::BITS));
        assert_eq!(visited, VisitedGrids::new());
    }

    #[test]
    fn test_from_bytes_pads_and_truncates() {
        let short = VisitedGrids::from_bytes(&[0xff]);
        assert_eq!(short.count(), 8);
        assert_eq!(short.as_bytes().len(), VisitedGrids::BYTES);

        let long = VisitedGrids::from_bytes(&[0x01; VisitedGrids::BYTES + 10]);
        assert_eq!(long.count(), VisitedGrids::BYTES);
    }

    #[test]
    fn test_serde() {
        let mut visited = VisitedGrids::new();
        visited.mark_visited(0);
        let encoded = visited.to_base64();
        assert!(encoded.starts_with("AQAA"));
        // Leaked to get a 'static str for the token
        let encoded: &'static str = Box::leak(encoded.into_boxed_str());
        assert_tokens(&visited, &[Token::Str(encoded)]);

        let parsed = serde_json::from_str::<VisitedGrids>(r#""not base64!""#);
        assert!(parsed.is_err());
    }
}
