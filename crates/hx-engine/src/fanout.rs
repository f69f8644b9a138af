//! Per-seat event targeting and the hidden-information client projection
//!.

use hx_types::client_state::{
    ClientBuilder, ClientMatchState, ClientPlayer, ClientReactionWindow, ClientStructure,
    ClientTile, ClientUnit,
};
use hx_types::event::Event;
use hx_types::state::{BuilderInstance, MatchState, StructureInstance, TileState, UnitInstance};
use hx_types::Seat;

/// Which seat(s) an event is destined for. A `Both`-targeted event still
/// reaches each seat as a separately serialized message; it only means the
/// payload itself carries no hidden fields that differ per recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Seat(Seat),
    Both,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetedEvent {
    pub target: EventTarget,
    pub event: Event,
}

impl TargetedEvent {
    pub fn to(seat: Seat, event: Event) -> Self {
        Self {
            target: EventTarget::Seat(seat),
            event,
        }
    }

    pub fn both(event: Event) -> Self {
        Self {
            target: EventTarget::Both,
            event,
        }
    }
}

/// Build both seats' `state_update` events from one authoritative state
///.
pub fn state_update_events(state: &MatchState) -> Vec<TargetedEvent> {
    vec![
        TargetedEvent::to(
            Seat::P1,
            Event::StateUpdate {
                state: client_view(state, Seat::P1),
            },
        ),
        TargetedEvent::to(
            Seat::P2,
            Event::StateUpdate {
                state: client_view(state, Seat::P2),
            },
        ),
    ]
}

/// Project the authoritative state into `viewer`'s filtered view: unrevealed
/// tile terrain and the opponent's hand contents are hidden.
pub fn client_view(state: &MatchState, viewer: Seat) -> ClientMatchState {
    ClientMatchState {
        viewer,
        phase: state.phase,
        active_seat: state.active_seat,
        round_number: state.round_number,
        result: state.result,
        reaction_window: state.reaction_window.as_ref().map(|window| ClientReactionWindow {
            reacting_seat: window.reacting_seat,
            pending_card_id: window.pending.card_id.clone(),
            played_by: window.pending.played_by,
        }),
        tiles: state.tiles.values().map(client_tile).collect(),
        units: state.units.values().map(client_unit).collect(),
        structures: state.structures.values().map(client_structure).collect(),
        builders: state.builders.values().map(client_builder).collect(),
        players: [
            client_player(state, Seat::P1, viewer),
            client_player(state, Seat::P2, viewer),
        ],
    }
}

fn client_tile(tile: &TileState) -> ClientTile {
    ClientTile {
        tile_id: tile.coord.tile_id(),
        coord: tile.coord,
        revealed: tile.revealed,
        terrain: tile.revealed.then_some(tile.terrain),
        units: tile.units.clone(),
        structure: tile.structure.clone(),
        builder: tile.builder.clone(),
        empire: tile.empire,
    }
}

fn client_unit(unit: &UnitInstance) -> ClientUnit {
    ClientUnit {
        id: unit.id.clone(),
        card_id: unit.card_id.clone(),
        owner: unit.owner,
        tile_id: unit.tile.tile_id(),
        hp: unit.hp,
        flags: unit.flags,
        bonuses: unit.bonuses,
    }
}

fn client_structure(structure: &StructureInstance) -> ClientStructure {
    ClientStructure {
        id: structure.id.clone(),
        card_id: structure.card_id.clone(),
        owner: structure.owner,
        tile_id: structure.tile.tile_id(),
        hp: structure.hp,
        capture_progress: structure.capture_progress,
        capture_threshold: structure.capture_threshold,
    }
}

fn client_builder(builder: &BuilderInstance) -> ClientBuilder {
    ClientBuilder {
        id: builder.id.clone(),
        owner: builder.owner,
        tile_id: builder.tile.tile_id(),
    }
}

fn client_player(state: &MatchState, seat: Seat, viewer: Seat) -> ClientPlayer {
    let player = state.player(seat);
    let own = seat == viewer;
    ClientPlayer {
        seat,
        display_name: player.display_name.clone(),
        essence_neutral: player.essence.neutral,
        essence_fire: player.essence.fire,
        essence_water: player.essence.water,
        empire_hp: player.empire.hp,
        empire_tile: player.empire.tile.map(|c| c.tile_id()),
        tiles_remaining: player.tiles_remaining,
        ended_tile_placement: player.ended_tile_placement,
        hand: if own { player.hand.clone() } else { Vec::new() },
        hand_count: player.hand.len(),
        unit_deck_count: player.unit_deck.len(),
        blitz_deck_count: player.blitz_deck.len(),
        structure_deck_count: player.structure_deck.len(),
        discard_count: player.discard.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_types::hex::HexCoord;
    use hx_types::{CardId, TerrainType};

    #[test]
    fn opponent_view_hides_hand_but_keeps_count() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        state.player_mut(Seat::P1).hand.push(CardId::from("scout"));

        let own = client_view(&state, Seat::P1);
        let opponent = client_view(&state, Seat::P2);

        assert_eq!(own.players[0].hand, vec![CardId::from("scout")]);
        assert_eq!(own.players[0].hand_count, 1);
        assert!(opponent.players[0].hand.is_empty());
        assert_eq!(opponent.players[0].hand_count, 1);
    }

    #[test]
    fn unrevealed_tile_terrain_is_hidden_from_every_viewer() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let coord = HexCoord::new(0, 0);
        state
            .tiles
            .insert(coord.tile_id(), TileState::new(coord, TerrainType::Fire));

        let view = client_view(&state, Seat::P1);
        assert_eq!(view.tiles[0].terrain, None);

        state.tile_mut(coord).unwrap().revealed = true;
        let view = client_view(&state, Seat::P1);
        assert_eq!(view.tiles[0].terrain, Some(TerrainType::Fire));
    }

    #[test]
    fn state_update_events_target_each_seat_separately() {
        let state = MatchState::new("A".into(), "B".into(), 1, 0);
        let events = state_update_events(&state);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].target, EventTarget::Seat(Seat::P1));
        assert_eq!(events[1].target, EventTarget::Seat(Seat::P2));
    }
}
