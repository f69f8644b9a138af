//! Deploy (spawn) tile validity for units.

use hx_types::hex::HexCoord;
use hx_types::state::MatchState;
use hx_types::Seat;

/// Whether `seat` may deploy a unit onto `coord`: the tile must exist, be
/// unoccupied, and be at-or-adjacent to the seat's empire tile or at-or-
/// adjacent to any tile one of the seat's structures occupies.
pub fn is_valid_spawn_tile(state: &MatchState, seat: Seat, coord: HexCoord) -> bool {
    let Some(tile) = state.tile(coord) else {
        return false;
    };
    if tile.is_occupied() {
        return false;
    }

    if let Some(empire_tile) = state.player(seat).empire.tile {
        if empire_tile == coord || empire_tile.distance(coord) == 1 {
            return true;
        }
    }

    state
        .structures
        .values()
        .filter(|s| s.owner == seat)
        .any(|s| s.tile == coord || s.tile.distance(coord) == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_types::state::{StructureInstance, TileState};
    use hx_types::{CardId, TerrainType};

    fn place_tile(state: &mut MatchState, coord: HexCoord) {
        state
            .tiles
            .insert(coord.tile_id(), TileState::new(coord, TerrainType::Neutral));
    }

    #[test]
    fn empire_tile_and_its_neighbors_are_valid() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let empire = HexCoord::new(0, 0);
        place_tile(&mut state, empire);
        state.player_mut(Seat::P1).empire.tile = Some(empire);
        for n in empire.adjacent() {
            place_tile(&mut state, n);
        }

        assert!(is_valid_spawn_tile(&state, Seat::P1, empire));
        for n in empire.adjacent() {
            assert!(is_valid_spawn_tile(&state, Seat::P1, n));
        }
    }

    #[test]
    fn tile_two_away_from_empire_with_no_structure_is_invalid() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let empire = HexCoord::new(0, 0);
        place_tile(&mut state, empire);
        state.player_mut(Seat::P1).empire.tile = Some(empire);
        let far = HexCoord::new(5, 5);
        place_tile(&mut state, far);

        assert!(!is_valid_spawn_tile(&state, Seat::P1, far));
    }

    #[test]
    fn structure_extends_the_spawn_zone() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let empire = HexCoord::new(0, 0);
        place_tile(&mut state, empire);
        state.player_mut(Seat::P1).empire.tile = Some(empire);

        let outpost = HexCoord::new(10, 10);
        place_tile(&mut state, outpost);
        let structure_id = state.mint_structure_id();
        state.structures.insert(
            structure_id.clone(),
            StructureInstance {
                id: structure_id.clone(),
                card_id: CardId::from("watchtower"),
                owner: Seat::P1,
                tile: outpost,
                hp: 8,
                capture_progress: 0,
                capture_threshold: 2,
            },
        );
        let beside_outpost = outpost.adjacent()[0];
        place_tile(&mut state, beside_outpost);

        assert!(is_valid_spawn_tile(&state, Seat::P1, beside_outpost));
    }

    #[test]
    fn occupied_tile_is_never_a_valid_spawn() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let empire = HexCoord::new(0, 0);
        place_tile(&mut state, empire);
        state.player_mut(Seat::P1).empire.tile = Some(empire);
        state.tile_mut(empire).unwrap().empire = Some(Seat::P1);

        assert!(!is_valid_spawn_tile(&state, Seat::P1, empire));
    }
}
