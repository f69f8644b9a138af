//! Valid-move computation.

use hx_types::hex::HexCoord;
use hx_types::state::{MatchState, UnitFlags, UnitInstance};
use hx_types::{Seat, TileId, UnitInstanceId, UnitSize};

use crate::error::RuleError;

/// Tiles a unit may move to this turn. Empty if the unit has already
/// attacked or is under development rest — not an error, just no moves.
pub fn valid_moves(state: &MatchState, unit_id: &UnitInstanceId) -> Result<Vec<TileId>, RuleError> {
    let unit = state.units.get(unit_id).ok_or(RuleError::UnknownUnit)?;

    if unit.flags.intersects(UnitFlags::HAS_ATTACKED | UnitFlags::DEVELOPMENT_REST) {
        return Ok(Vec::new());
    }

    let card = hx_data::get_card(unit.card_id.as_str())
        .and_then(|c| c.as_unit())
        .ok_or(RuleError::UnknownCard)?;

    let range = (card.speed as i64 + unit.bonuses.speed as i64).max(0) as u32;
    let candidates = unit.tile.neighbors(range);

    let mut out: Vec<TileId> = candidates
        .into_iter()
        .filter(|&coord| is_valid_destination(state, unit, coord))
        .map(HexCoord::tile_id)
        .collect();
    out.sort();
    Ok(out)
}

fn is_valid_destination(state: &MatchState, mover: &UnitInstance, coord: HexCoord) -> bool {
    let Some(tile) = state.tile(coord) else {
        return false;
    };
    if tile.structure.is_some() || tile.builder.is_some() || tile.empire.is_some() {
        return false;
    }
    match tile.units.len() {
        0 => true,
        1 => is_tiny(state, mover) || is_tiny_occupant(state, &tile.units[0]),
        _ => false,
    }
}

fn is_tiny(state: &MatchState, unit: &UnitInstance) -> bool {
    hx_data::get_card(unit.card_id.as_str())
        .and_then(|c| c.as_unit())
        .map(|c| c.size == UnitSize::Tiny)
        .unwrap_or(false)
}

fn is_tiny_occupant(state: &MatchState, occupant: &UnitInstanceId) -> bool {
    state
        .units
        .get(occupant)
        .map(|u| is_tiny(state, u))
        .unwrap_or(false)
}

/// Whether `seat` owns the unit named by `unit_id`.
pub fn seat_owns_unit(state: &MatchState, seat: Seat, unit_id: &UnitInstanceId) -> bool {
    state
        .units
        .get(unit_id)
        .map(|u| u.owner == seat)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_types::state::{TileState, TurnBonuses};
    use hx_types::{CardId, TerrainType};

    fn place_tile(state: &mut MatchState, coord: HexCoord) {
        state
            .tiles
            .insert(coord.tile_id(), TileState::new(coord, TerrainType::Neutral));
    }

    fn spawn_unit(state: &mut MatchState, card_id: &str, owner: Seat, coord: HexCoord) -> UnitInstanceId {
        let id = state.mint_unit_id();
        state.units.insert(
            id.clone(),
            UnitInstance {
                id: id.clone(),
                card_id: CardId::from(card_id),
                owner,
                tile: coord,
                hp: 5,
                flags: UnitFlags::empty(),
                bonuses: TurnBonuses::default(),
            },
        );
        state.tile_mut(coord).unwrap().units.push(id.clone());
        id
    }

    #[test]
    fn speed_two_unit_reaches_range_two() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        for row in -2..=2 {
            for col in -2..=2 {
                place_tile(&mut state, HexCoord::new(row, col));
            }
        }
        let origin = HexCoord::new(0, 0);
        let unit_id = spawn_unit(&mut state, "swordsman", Seat::P1, origin);

        let moves = valid_moves(&state, &unit_id).unwrap();
        assert!(moves.iter().all(|t| {
            let coord = HexCoord::parse(t.as_str()).unwrap();
            origin.distance(coord) <= 2 && origin.distance(coord) > 0
        }));
        assert!(!moves.is_empty());
    }

    #[test]
    fn unit_that_attacked_has_no_moves() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        place_tile(&mut state, HexCoord::new(0, 0));
        let unit_id = spawn_unit(&mut state, "swordsman", Seat::P1, HexCoord::new(0, 0));
        state.units.get_mut(&unit_id).unwrap().flags |= UnitFlags::HAS_ATTACKED;

        assert!(valid_moves(&state, &unit_id).unwrap().is_empty());
    }

    #[test]
    fn tiny_unit_may_share_an_occupied_tile() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let origin = HexCoord::new(0, 0);
        let neighbor = origin.adjacent()[0];
        place_tile(&mut state, origin);
        place_tile(&mut state, neighbor);
        spawn_unit(&mut state, "swordsman", Seat::P2, neighbor);
        let scout = spawn_unit(&mut state, "scout", Seat::P1, origin);

        let moves = valid_moves(&state, &scout).unwrap();
        assert!(moves.contains(&neighbor.tile_id()));
    }

    #[test]
    fn non_tiny_unit_cannot_share_an_occupied_tile() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let origin = HexCoord::new(0, 0);
        let neighbor = origin.adjacent()[0];
        place_tile(&mut state, origin);
        place_tile(&mut state, neighbor);
        spawn_unit(&mut state, "swordsman", Seat::P2, neighbor);
        let mover = spawn_unit(&mut state, "swordsman", Seat::P1, origin);

        let moves = valid_moves(&state, &mover).unwrap();
        assert!(!moves.contains(&neighbor.tile_id()));
    }
}
