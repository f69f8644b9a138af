//! Match construction — building a fresh `MatchState` with shuffled decks.
//!
//! Tile placement and empire placement happen through ordinary dispatched
//! commands (`place_tile`, `place_empire`); this module only handles what
//! happens before either seat has sent a command: the catalog roster is
//! split into each seat's three decks and shuffled with the match's own
//! RNG, so a replay from the same seed reproduces the same draw order.

use hx_data::{CardDefinition, ALL_CARDS};
use hx_types::state::MatchState;
use hx_types::Seat;

/// Tile placements each seat gets during SETUP_TILES, absent any other
/// configuration (the room/lobby layer may pass a different count).
pub const DEFAULT_TILES_PER_SEAT: u32 = 3;

/// Build a fresh match: both seats present, decks built from the full
/// catalog and shuffled independently, `SETUP_TILES` phase, p1 active.
/// Both seats draw from an identically-composed deck; only the shuffle
/// order (derived from `seed`) differs between them.
pub fn new_match(p1_name: String, p2_name: String, seed: u32) -> MatchState {
    let mut state = MatchState::new(p1_name, p2_name, seed, DEFAULT_TILES_PER_SEAT);
    for seat in [Seat::P1, Seat::P2] {
        deal_decks(&mut state, seat);
    }
    state
}

fn deal_decks(state: &mut MatchState, seat: Seat) {
    let mut unit_deck: Vec<_> = ALL_CARDS
        .iter()
        .filter(|c| matches!(c, CardDefinition::Unit(_)))
        .map(|c| hx_types::CardId::from(c.id()))
        .collect();
    let mut blitz_deck: Vec<_> = ALL_CARDS
        .iter()
        .filter(|c| matches!(c, CardDefinition::Blitz(_)))
        .map(|c| hx_types::CardId::from(c.id()))
        .collect();
    let mut structure_deck: Vec<_> = ALL_CARDS
        .iter()
        .filter(|c| matches!(c, CardDefinition::Structure(_)))
        .map(|c| hx_types::CardId::from(c.id()))
        .collect();

    state.rng.shuffle(&mut unit_deck);
    state.rng.shuffle(&mut blitz_deck);
    state.rng.shuffle(&mut structure_deck);

    let player = state.player_mut(seat);
    player.unit_deck = unit_deck;
    player.blitz_deck = blitz_deck;
    player.structure_deck = structure_deck;
}
