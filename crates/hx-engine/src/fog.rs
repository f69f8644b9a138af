//! Fog-of-war reveal.

use hx_types::hex::HexCoord;
use hx_types::state::MatchState;

/// Mark `coord` revealed if it wasn't already. Returns `true` on a fresh
/// reveal (the caller should emit a `fog_reveal` event); `false` if the tile
/// was already revealed, doesn't exist, or stays revealed forever once set.
/// A revealed tile stays revealed for the rest of the match.
pub fn reveal(state: &mut MatchState, coord: HexCoord) -> bool {
    match state.tile_mut(coord) {
        Some(tile) if !tile.revealed => {
            tile.revealed = true;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_types::state::TileState;
    use hx_types::TerrainType;

    #[test]
    fn reveal_is_one_shot() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let coord = HexCoord::new(0, 0);
        state
            .tiles
            .insert(coord.tile_id(), TileState::new(coord, TerrainType::Neutral));

        assert!(reveal(&mut state, coord));
        assert!(state.tile(coord).unwrap().revealed);
        assert!(!reveal(&mut state, coord));
    }

    #[test]
    fn reveal_of_unknown_tile_is_a_no_op() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        assert!(!reveal(&mut state, HexCoord::new(9, 9)));
    }
}
