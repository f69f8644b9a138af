//! Client-visible state — the filtered view sent to a specific seat.
//!
//! These types mirror `MatchState` but hide private information: the
//! opponent's hand (count only), deck/discard contents (count only), and
//! unrevealed tiles (terrain hidden until `revealed`). A seat always sees
//! its own hand in full. Populating these is the fan-out layer's job
//! (`hx-engine`); this module only defines the shapes.

use serde::{Deserialize, Serialize};

use crate::enums::{Phase, TerrainType, WinReason};
use crate::hex::HexCoord;
use crate::ids::{BuilderInstanceId, CardId, Seat, StructureInstanceId, TileId, UnitInstanceId};
use crate::state::{GameResult, TurnBonuses, UnitFlags};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMatchState {
    pub viewer: Seat,
    pub phase: Phase,
    pub active_seat: Seat,
    pub round_number: u32,
    pub result: Option<GameResult>,
    pub reaction_window: Option<ClientReactionWindow>,
    pub tiles: Vec<ClientTile>,
    pub units: Vec<ClientUnit>,
    pub structures: Vec<ClientStructure>,
    pub builders: Vec<ClientBuilder>,
    pub players: [ClientPlayer; 2],
}

/// A tile's terrain is hidden until revealed; occupancy (who/what is on it)
/// is always public once there's something there to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientTile {
    pub tile_id: TileId,
    pub coord: HexCoord,
    pub revealed: bool,
    /// `None` when `revealed` is false.
    pub terrain: Option<TerrainType>,
    pub units: Vec<UnitInstanceId>,
    pub structure: Option<StructureInstanceId>,
    pub builder: Option<BuilderInstanceId>,
    pub empire: Option<Seat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientUnit {
    pub id: UnitInstanceId,
    pub card_id: CardId,
    pub owner: Seat,
    pub tile_id: TileId,
    pub hp: i32,
    pub flags: UnitFlags,
    pub bonuses: TurnBonuses,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientStructure {
    pub id: StructureInstanceId,
    pub card_id: CardId,
    pub owner: Seat,
    pub tile_id: TileId,
    pub hp: i32,
    pub capture_progress: u32,
    pub capture_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientBuilder {
    pub id: BuilderInstanceId,
    pub owner: Seat,
    pub tile_id: TileId,
}

/// A reaction window is public in outline (who must respond, to what card)
/// even though the pending blitz's effect is not yet applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientReactionWindow {
    pub reacting_seat: Seat,
    pub pending_card_id: CardId,
    pub played_by: Seat,
}

/// Filtered player view. Own hand/decks are full card lists; the
/// opponent's are counts only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPlayer {
    pub seat: Seat,
    pub display_name: String,
    pub essence_neutral: u32,
    pub essence_fire: u32,
    pub essence_water: u32,
    pub empire_hp: i32,
    pub empire_tile: Option<TileId>,
    pub tiles_remaining: u32,
    pub ended_tile_placement: bool,

    /// Full card ids for the viewer's own seat, empty for the opponent.
    pub hand: Vec<CardId>,
    pub hand_count: usize,
    pub unit_deck_count: usize,
    pub blitz_deck_count: usize,
    pub structure_deck_count: usize,
    pub discard_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub winner: Seat,
    pub reason: WinReason,
}
