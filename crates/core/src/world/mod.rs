//! World data: tile types, grids and their snapshot encoding, the nested
//! coordinate system, and the per-player visited-grid set. Nothing in here
//! knows about pixels; see [crate::render] for that.

pub mod coords;
pub mod grid;
pub mod snapshot;
pub mod tile;
pub mod visited;

use crate::world::coords::GridCoord;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What a grid is used for. This only matters for the minimap, which picks
/// a placeholder color (or an owner label) for grids the player hasn't seen.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GridKind {
    /// Open wilderness
    Valley,
    /// A player's home grid
    Homestead,
    Town,
}

/// Everything the minimap needs to know about one grid in a settlement. This
/// mirrors the per-grid summary the server sends alongside a settlement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSummary {
    pub coord: GridCoord,
    pub kind: GridKind,
    /// Username of the homestead's owner, if it has one
    #[serde(default)]
    pub owner: Option<String>,
    /// Base64 terrain snapshot, if the server has one for this grid. See
    /// [snapshot] for the format.
    #[serde(default)]
    pub snapshot: Option<String>,
}

#[cfg(feature = "json")]
impl GridSummary {
    /// Parse a JSON array of grid summaries, the shape a settlement payload
    /// arrives in
    pub fn list_from_json(json: &str) -> anyhow::Result<Vec<Self>> {
        use anyhow::Context;
        serde_json::from_str(json).context("error parsing grid summaries")
    }
}
