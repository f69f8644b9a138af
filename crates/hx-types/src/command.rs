//! Client → server command envelope.
//!
//! Every command arrives tagged with its originating seat by the transport
//! layer (`hx-server`); this type only carries the payload the dispatcher
//! matches on.

use serde::{Deserialize, Serialize};

use crate::enums::{AttackKind, DeckKind};
use crate::ids::{CardId, TargetToken, TileId, UnitInstanceId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    PlaceTile {
        tile_id: TileId,
        tile_type: crate::enums::TerrainType,
    },
    EndTilePlacement,
    PlaceEmpire {
        tile_id: TileId,
    },
    DrawCard {
        deck: DeckKind,
    },
    MoveUnit {
        unit_id: UnitInstanceId,
        target_tile_id: TileId,
    },
    RequestValidMoves {
        unit_id: UnitInstanceId,
    },
    MeleeAttack {
        attacker_unit_id: UnitInstanceId,
        target_id: TargetToken,
    },
    RangedAttack {
        attacker_unit_id: UnitInstanceId,
        target_id: TargetToken,
    },
    RequestValidTargets {
        unit_id: UnitInstanceId,
        attack_type: AttackKind,
    },
    PlayUnit {
        card_id: CardId,
        spawn_tile_id: TileId,
    },
    PlayBlitz {
        card_id: CardId,
        target_id: Option<TargetToken>,
    },
    PlayStructure {
        card_id: CardId,
        tile_id: TileId,
    },
    PlaceBuilder {
        tile_id: TileId,
    },
    UseTerraform {
        unit_id: UnitInstanceId,
    },
    ReactBlitz {
        card_id: CardId,
    },
    PassReaction,
    EndTurn,
    Concede,
}

impl Command {
    /// Info commands are always accepted and never mutate state.
    pub fn is_info_request(&self) -> bool {
        matches!(
            self,
            Command::RequestValidMoves { .. } | Command::RequestValidTargets { .. }
        )
    }

    /// Only these two commands are accepted while a reaction window is open,
    /// and only from the reacting seat.
    pub fn is_reaction_response(&self) -> bool {
        matches!(self, Command::ReactBlitz { .. } | Command::PassReaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_envelope_uses_snake_case_type_tag() {
        let cmd = Command::EndTurn;
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"type":"end_turn"}"#);
    }

    #[test]
    fn move_unit_round_trips() {
        let cmd = Command::MoveUnit {
            unit_id: UnitInstanceId::from("u1"),
            target_tile_id: TileId::from("r0c0"),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn info_requests_are_flagged() {
        let cmd = Command::RequestValidMoves {
            unit_id: UnitInstanceId::from("u1"),
        };
        assert!(cmd.is_info_request());
        assert!(!Command::EndTurn.is_info_request());
    }

    #[test]
    fn reaction_responses_are_flagged() {
        assert!(Command::PassReaction.is_reaction_response());
        assert!(Command::ReactBlitz {
            card_id: CardId::from("c1")
        }
        .is_reaction_response());
        assert!(!Command::EndTurn.is_reaction_response());
    }
}
