//! Server → client event envelope.
//!
//! Events are emitted against the full authoritative state and narrowed per
//! recipient seat by the fan-out layer (`hx-engine`, see `client_state`).
//! Fields whose visibility depends on the recipient are `Option`-typed here;
//! the fan-out layer clears them (to `None`) before sending to a seat that
//! should not see the value — e.g. `draw_result.card_id` is `Some` only for
//! the drawing seat.

use serde::{Deserialize, Serialize};

use crate::client_state::ClientMatchState;
use crate::enums::{DeckKind, Phase, WinReason};
use crate::ids::{CardId, Seat, StructureInstanceId, TargetToken, TileId, UnitInstanceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    GameStart {
        seat: Seat,
        state: ClientMatchState,
    },
    StateUpdate {
        state: ClientMatchState,
    },
    ValidMoves {
        unit_id: UnitInstanceId,
        tile_ids: Vec<TileId>,
    },
    ValidTargets {
        unit_id: UnitInstanceId,
        target_ids: Vec<TargetToken>,
    },
    CombatResult {
        attacker_id: UnitInstanceId,
        target_id: TargetToken,
        roll: u32,
        defense: i32,
        hit: bool,
        damage: i32,
        killed: bool,
    },
    BlitzPlayed {
        card_id: Option<CardId>,
        played_by: Seat,
        target_id: Option<TargetToken>,
    },
    StormUpdate {
        tile_ids: Vec<TileId>,
    },
    FogReveal {
        tile_id: TileId,
    },
    DrawResult {
        seat: Seat,
        deck: DeckKind,
        card_id: Option<CardId>,
    },
    PhaseChange {
        phase: Phase,
        active_seat: Seat,
        round_number: u32,
    },
    EssenceUpdate {
        seat: Seat,
        neutral: u32,
        fire: u32,
        water: u32,
    },
    CaptureUpdate {
        structure_id: StructureInstanceId,
        owner: Seat,
        capture_progress: u32,
        capture_threshold: u32,
    },
    SiegeUpdate {
        seat: Seat,
        enemy_unit_count: usize,
    },
    ChatMessage {
        from: Seat,
        text: String,
    },
    PlayerLeft {
        seat: Seat,
        reconnect_deadline_secs: u64,
    },
    Error {
        code: String,
        message: String,
    },
    GameOver {
        winner: Seat,
        reason: WinReason,
    },
}
