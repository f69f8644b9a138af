//! The authoritative match state — board, instances, players, phase.
//!
//! Everything here is data; no rule validation or mutation logic lives in
//! this module (that belongs to `hx-engine`). `MatchState` is a snapshot
//! value: the dispatcher is the only site that re-orders or mutates it.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::hex::HexCoord;
use crate::ids::*;
use crate::rng::MatchRng;

/// A newly deployed unit is exempt from development rest through this many
/// rounds inclusive.
pub const FIRST_PLAYER_NO_DEV_REST_ROUNDS: u32 = 2;

/// Progress required (and the reset point) for a capture to transfer
/// ownership.
pub const DEFAULT_CAPTURE_THRESHOLD: u32 = 2;

/// Enemy units on (empire tile ∪ its six neighbors) required to trigger a
/// siege win.
pub const SIEGE_UNIT_THRESHOLD: usize = 5;

pub const MAX_EMPIRE_HP: i32 = 20;
pub const MAX_STRUCTURE_HP: i32 = 10;

bitflags! {
    /// Per-unit boolean state packed into a u32.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UnitFlags: u32 {
        /// Set on deploy in rounds > FIRST_PLAYER_NO_DEV_REST_ROUNDS; clears
        /// at the owner's next Standby.
        const DEVELOPMENT_REST          = 1 << 0;
        /// Cleared at the owner's Standby.
        const HAS_MOVED                 = 1 << 1;
        /// Cleared at the owner's Standby.
        const HAS_ATTACKED              = 1 << 2;
        /// Persistent: excludes this unit from ranged-target enumeration.
        const CANNOT_BE_RANGED_TARGETED = 1 << 3;
        /// Once-per-game flag; never cleared automatically.
        const TERRAFORM_USED            = 1 << 4;
    }
}

impl Serialize for UnitFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UnitFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(UnitFlags::from_bits_truncate(bits))
    }
}

/// Per-turn combat bonuses a unit may carry (e.g. from a blitz), cleared at
/// the owner's Standby.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnBonuses {
    pub speed: i32,
    pub defense: i32,
    pub melee: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInstance {
    pub id: UnitInstanceId,
    pub card_id: CardId,
    pub owner: Seat,
    pub tile: HexCoord,
    pub hp: i32,
    pub flags: UnitFlags,
    pub bonuses: TurnBonuses,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureInstance {
    pub id: StructureInstanceId,
    pub card_id: CardId,
    pub owner: Seat,
    pub tile: HexCoord,
    pub hp: i32,
    pub capture_progress: u32,
    pub capture_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderInstance {
    pub id: BuilderInstanceId,
    pub owner: Seat,
    pub tile: HexCoord,
}

/// A seat's empire marker. `tile` is `None` until `place_empire` resolves;
/// `hp` is only meaningful once placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empire {
    pub owner: Seat,
    pub tile: Option<HexCoord>,
    pub hp: i32,
}

impl Empire {
    pub fn new(owner: Seat) -> Self {
        Self {
            owner,
            tile: None,
            hp: MAX_EMPIRE_HP,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.tile.is_some()
    }
}

/// Essence pool: three non-negative buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssencePool {
    pub neutral: u32,
    pub fire: u32,
    pub water: u32,
}

impl EssencePool {
    pub fn bucket(&self, element: Element) -> u32 {
        match element {
            Element::Neutral => self.neutral,
            Element::Fire => self.fire,
            Element::Water => self.water,
        }
    }

    pub fn bucket_mut(&mut self, element: Element) -> &mut u32 {
        match element {
            Element::Neutral => &mut self.neutral,
            Element::Fire => &mut self.fire,
            Element::Water => &mut self.water,
        }
    }

    pub fn total(&self) -> u32 {
        self.neutral + self.fire + self.water
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileState {
    pub coord: HexCoord,
    pub terrain: TerrainType,
    pub revealed: bool,
    /// 0, 1, or (when one of them is tiny) 2 live units.
    pub units: Vec<UnitInstanceId>,
    pub structure: Option<StructureInstanceId>,
    pub builder: Option<BuilderInstanceId>,
    pub empire: Option<Seat>,
}

impl TileState {
    pub fn new(coord: HexCoord, terrain: TerrainType) -> Self {
        Self {
            coord,
            terrain,
            revealed: false,
            units: Vec::new(),
            structure: None,
            builder: None,
            empire: None,
        }
    }

    /// Any occupant at all — units, a structure, a builder, or an empire.
    pub fn is_occupied(&self) -> bool {
        !self.units.is_empty()
            || self.structure.is_some()
            || self.builder.is_some()
            || self.empire.is_some()
    }
}

/// One seat's hand, decks, discard pile, and setup progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub display_name: String,
    pub unit_deck: Vec<CardId>,
    pub blitz_deck: Vec<CardId>,
    pub structure_deck: Vec<CardId>,
    pub discard: Vec<CardId>,
    pub hand: Vec<CardId>,
    pub essence: EssencePool,
    pub empire: Empire,
    /// Tiles this seat may still place during SETUP_TILES.
    pub tiles_remaining: u32,
    pub ended_tile_placement: bool,
}

impl Player {
    pub fn new(seat: Seat, display_name: String, tiles_remaining: u32) -> Self {
        Self {
            seat,
            display_name,
            unit_deck: Vec::new(),
            blitz_deck: Vec::new(),
            structure_deck: Vec::new(),
            discard: Vec::new(),
            hand: Vec::new(),
            essence: EssencePool::default(),
            empire: Empire::new(seat),
            tiles_remaining,
            ended_tile_placement: false,
        }
    }
}

/// A pending blitz awaiting resolution once the reaction window closes.
/// The effect is computed and applied only after the window closes, never
/// before (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBlitz {
    pub card_id: CardId,
    pub played_by: Seat,
    pub target: Option<TargetToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionWindow {
    pub reacting_seat: Seat,
    pub pending: PendingBlitz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Seat,
    pub reason: WinReason,
}

/// One append-only log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub seat: Option<Seat>,
    pub message: String,
}

/// The full authoritative snapshot for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub players: [Player; 2],
    pub tiles: BTreeMap<TileId, TileState>,
    pub units: BTreeMap<UnitInstanceId, UnitInstance>,
    pub structures: BTreeMap<StructureInstanceId, StructureInstance>,
    pub builders: BTreeMap<BuilderInstanceId, BuilderInstance>,
    pub phase: Phase,
    pub active_seat: Seat,
    pub round_number: u32,
    pub result: Option<GameResult>,
    pub reaction_window: Option<ReactionWindow>,
    pub log: Vec<LogEntry>,
    pub rng: MatchRng,
    next_instance_seq: u64,
}

impl MatchState {
    /// A fresh, empty match: no tiles, both seats present, SETUP_TILES
    /// phase, p1 active.
    pub fn new(p1_name: String, p2_name: String, seed: u32, tiles_per_seat: u32) -> Self {
        Self {
            players: [
                Player::new(Seat::P1, p1_name, tiles_per_seat),
                Player::new(Seat::P2, p2_name, tiles_per_seat),
            ],
            tiles: BTreeMap::new(),
            units: BTreeMap::new(),
            structures: BTreeMap::new(),
            builders: BTreeMap::new(),
            phase: Phase::SetupTiles,
            active_seat: Seat::P1,
            round_number: 1,
            result: None,
            reaction_window: None,
            log: Vec::new(),
            rng: MatchRng::new(seed),
            next_instance_seq: 0,
        }
    }

    pub fn player(&self, seat: Seat) -> &Player {
        match seat {
            Seat::P1 => &self.players[0],
            Seat::P2 => &self.players[1],
        }
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        match seat {
            Seat::P1 => &mut self.players[0],
            Seat::P2 => &mut self.players[1],
        }
    }

    pub fn tile(&self, coord: HexCoord) -> Option<&TileState> {
        self.tiles.get(&coord.tile_id())
    }

    pub fn tile_mut(&mut self, coord: HexCoord) -> Option<&mut TileState> {
        self.tiles.get_mut(&coord.tile_id())
    }

    fn next_seq(&mut self) -> u64 {
        self.next_instance_seq += 1;
        self.next_instance_seq
    }

    /// Mint a fresh, match-unique unit instance id. Monotonic within the
    /// match is sufficient; ids are never reused across matches.
    pub fn mint_unit_id(&mut self) -> UnitInstanceId {
        UnitInstanceId::from(format!("u{}", self.next_seq()))
    }

    pub fn mint_structure_id(&mut self) -> StructureInstanceId {
        StructureInstanceId::from(format!("s{}", self.next_seq()))
    }

    pub fn mint_builder_id(&mut self) -> BuilderInstanceId {
        BuilderInstanceId::from(format!("b{}", self.next_seq()))
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }
}
