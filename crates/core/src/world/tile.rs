use crate::render::unit::Color3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Color used for any tile we can't identify. Loud on purpose so a bad grid
/// is easy to spot on screen.
pub const DEBUG_COLOR: Color3 = Color3::new_int(255, 0, 255);

/// How a tile's edges look where it meets a different tile type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EdgeStyle {
    /// Soft terrain (grass, dirt, water...) that can round into its
    /// neighbors
    Organic,
    /// Built surfaces (pavement, cobblestone, dungeon floor). Always square.
    Straight,
}

/// The kind of terrain in a single tile. Every tile has a one-character code
/// (used in live grid payloads) and a 4-bit index (used in compressed grid
/// snapshots).
///
/// Visual properties (color, corner priority, edge style) are all derived
/// from [TileType::properties], so adding a variant means adding one row
/// there and the compiler will point out everything else.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TileType {
    Grass,
    Slate,
    Dirt,
    Water,
    Pavement,
    Lava,
    Sand,
    Snow,
    Cobblestone,
    Dungeon,
    Moss,
    Clay,
    ReservedA,
    ReservedB,
    /// A tile code we couldn't decode. Never produced by snapshots (those
    /// pad with grass), only by live grids containing unknown characters.
    Unknown,
}

/// Static per-type rendering data
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileProperties {
    /// Single-char code used by live grid payloads
    pub code: char,
    /// Flat fill color, drawn before any decoration
    pub color: Color3,
    /// Corner-rounding priority. Higher rounds over lower.
    pub priority: u8,
    pub edge: EdgeStyle,
    /// Whether this type's own corners get rounded at all
    pub autotiles: bool,
}

impl TileProperties {
    const fn organic(code: char, color: Color3, priority: u8) -> Self {
        Self {
            code,
            color,
            priority,
            edge: EdgeStyle::Organic,
            autotiles: true,
        }
    }

    const fn straight(code: char, color: Color3) -> Self {
        Self {
            code,
            color,
            priority: 0,
            edge: EdgeStyle::Straight,
            autotiles: false,
        }
    }

    const fn reserved(code: char, color: Color3) -> Self {
        Self {
            code,
            color,
            priority: 10,
            edge: EdgeStyle::Organic,
            autotiles: false,
        }
    }
}

impl TileType {
    /// Every type that can appear in a snapshot, in nibble order. The index
    /// of a type in this list is its snapshot value.
    pub const SNAPSHOT_ORDER: [TileType; 14] = [
        Self::Grass,
        Self::Slate,
        Self::Dirt,
        Self::Water,
        Self::Pavement,
        Self::Lava,
        Self::Sand,
        Self::Snow,
        Self::Cobblestone,
        Self::Dungeon,
        Self::Moss,
        Self::Clay,
        Self::ReservedA,
        Self::ReservedB,
    ];

    /// Get the static rendering properties for this type
    pub const fn properties(self) -> TileProperties {
        match self {
            Self::Grass => {
                TileProperties::organic('g', Color3::new_int(103, 163, 70), 100)
            }
            Self::Snow => {
                TileProperties::organic('o', Color3::new_int(232, 240, 245), 90)
            }
            Self::Moss => {
                TileProperties::organic('z', Color3::new_int(78, 122, 52), 85)
            }
            Self::Sand => {
                TileProperties::organic('n', Color3::new_int(222, 200, 140), 80)
            }
            Self::Dirt => {
                TileProperties::organic('d', Color3::new_int(140, 102, 66), 70)
            }
            Self::Clay => {
                TileProperties::organic('c', Color3::new_int(176, 110, 78), 60)
            }
            Self::Slate => {
                TileProperties::organic('s', Color3::new_int(112, 118, 128), 50)
            }
            Self::Lava => {
                TileProperties::organic('l', Color3::new_int(214, 72, 28), 40)
            }
            Self::Water => {
                TileProperties::organic('w', Color3::new_int(64, 134, 196), 30)
            }
            Self::ReservedA => {
                TileProperties::reserved('u', Color3::new_int(150, 150, 150))
            }
            Self::ReservedB => {
                TileProperties::reserved('v', Color3::new_int(120, 120, 120))
            }
            Self::Pavement => {
                TileProperties::straight('p', Color3::new_int(150, 146, 138))
            }
            Self::Cobblestone => {
                TileProperties::straight('x', Color3::new_int(128, 122, 116))
            }
            Self::Dungeon => {
                TileProperties::straight('y', Color3::new_int(58, 54, 62))
            }
            Self::Unknown => TileProperties {
                code: '?',
                color: DEBUG_COLOR,
                priority: 0,
                edge: EdgeStyle::Organic,
                autotiles: false,
            },
        }
    }

    pub const fn code(self) -> char {
        self.properties().code
    }

    pub const fn color(self) -> Color3 {
        self.properties().color
    }

    pub const fn priority(self) -> u8 {
        self.properties().priority
    }

    pub const fn edge_style(self) -> EdgeStyle {
        self.properties().edge
    }

    pub const fn is_organic(self) -> bool {
        matches!(self.edge_style(), EdgeStyle::Organic)
    }

    pub const fn autotiles(self) -> bool {
        self.properties().autotiles
    }

    /// Look up a type by its single-char code. `None` for codes we don't
    /// know; callers decide how to degrade.
    pub fn from_code(code: char) -> Option<Self> {
        Self::iter()
            .filter(|tile_type| *tile_type != Self::Unknown)
            .find(|tile_type| tile_type.code() == code)
    }

    /// Look up a type by its 4-bit snapshot value
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        Self::SNAPSHOT_ORDER.get(nibble as usize).copied()
    }

    /// The 4-bit snapshot value for this type. [TileType::Unknown] has no
    /// snapshot encoding and is written as grass.
    pub fn nibble(self) -> u8 {
        Self::SNAPSHOT_ORDER
            .iter()
            .position(|tile_type| *tile_type == self)
            .unwrap_or(0) as u8
    }
}

impl Default for TileType {
    fn default() -> Self {
        Self::Grass
    }
}
