//! Small closed-world enums shared by state, commands, and the card catalog.

use serde::{Deserialize, Serialize};

/// The three essence/terrain elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Neutral,
    Fire,
    Water,
}

impl Element {
    pub const ALL: [Element; 3] = [Element::Neutral, Element::Fire, Element::Water];
}

/// A tile's terrain type. `Neutral` tiles grant no essence; elemental tiles
/// grant their element via an owned Empire/Structure/Builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    Neutral,
    Fire,
    Water,
}

impl TerrainType {
    /// The essence element an owned piece on this tile contributes, or
    /// `None` for a neutral tile (it contributes nothing).
    pub fn essence_element(self) -> Option<Element> {
        match self {
            TerrainType::Neutral => None,
            TerrainType::Fire => Some(Element::Fire),
            TerrainType::Water => Some(Element::Water),
        }
    }

    /// Whether a builder may be placed here: the tile must be elemental,
    /// i.e. `tile.type != neutral`.
    pub fn is_elemental(self) -> bool {
        !matches!(self, TerrainType::Neutral)
    }
}

/// Unit size class; governs tile-sharing in move validation. A tiny unit
/// may share a tile with any other unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSize {
    Tiny,
    Normal,
    Large,
    ExtraLarge,
}

/// Blitz card timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlitzTiming {
    Slow,
    Reaction,
    Instant,
}

/// Which deck a `draw_card` command pulls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckKind {
    Unit,
    Blitz,
}

/// Melee vs ranged attack, used by `request_valid_targets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Melee,
    Ranged,
}

/// The match phase machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    SetupTiles,
    SetupEmpire,
    Standby,
    Draw,
    Main,
    End,
}

/// Terminal game-over reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    EmpireDestroyed,
    Siege,
    Forfeit,
    Timeout,
    Concede,
}
