//! Siege threat counting and win-condition checks.

use hx_types::state::{GameResult, MatchState, SIEGE_UNIT_THRESHOLD};
use hx_types::{Seat, WinReason};

/// Enemy units present on `seat`'s empire tile or its six neighbors. `0` if
/// the empire has not been placed yet.
pub fn enemy_units_near_empire(state: &MatchState, seat: Seat) -> usize {
    let Some(empire_tile) = state.player(seat).empire.tile else {
        return 0;
    };
    let mut zone = empire_tile.neighbors(1);
    zone.insert(empire_tile);

    state
        .units
        .values()
        .filter(|unit| unit.owner != seat && zone.contains(&unit.tile))
        .count()
}

/// Check every win condition in a fixed order: empire destruction first,
/// then siege. Mutates `state.result` and returns it if the match just ended.
/// Idempotent: does nothing if the match already has a result.
pub fn check_win(state: &mut MatchState) -> Option<GameResult> {
    if state.result.is_some() {
        return None;
    }

    for seat in [Seat::P1, Seat::P2] {
        if state.player(seat).empire.hp <= 0 {
            let result = GameResult {
                winner: seat.opponent(),
                reason: WinReason::EmpireDestroyed,
            };
            state.result = Some(result);
            return Some(result);
        }
    }

    for seat in [Seat::P1, Seat::P2] {
        if enemy_units_near_empire(state, seat) >= SIEGE_UNIT_THRESHOLD {
            let result = GameResult {
                winner: seat.opponent(),
                reason: WinReason::Siege,
            };
            state.result = Some(result);
            return Some(result);
        }
    }

    None
}
