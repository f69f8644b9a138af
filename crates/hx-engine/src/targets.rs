//! Valid melee/ranged target computation.

use hx_types::state::{MatchState, UnitFlags};
use hx_types::{AttackKind, Seat, TargetToken, UnitInstanceId};

use crate::error::RuleError;

/// Targets reachable by a melee attack: adjacent tiles holding an enemy
/// unit, structure, or empire marker.
pub fn valid_melee_targets(
    state: &MatchState,
    unit_id: &UnitInstanceId,
) -> Result<Vec<TargetToken>, RuleError> {
    let unit = state.units.get(unit_id).ok_or(RuleError::UnknownUnit)?;
    if unit.flags.intersects(UnitFlags::DEVELOPMENT_REST | UnitFlags::HAS_ATTACKED) {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for coord in unit.tile.adjacent() {
        collect_enemy_targets(state, unit.owner, coord, None, &mut out);
    }
    out.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    Ok(out)
}

/// Targets reachable by a ranged attack: tiles within the card's
/// `ranged_range` holding an enemy unit (unless flagged
/// `cannot_be_ranged_targeted`), structure, or empire marker. Units with
/// `ranged_range == 0` have no ranged targets.
pub fn valid_ranged_targets(
    state: &MatchState,
    unit_id: &UnitInstanceId,
) -> Result<Vec<TargetToken>, RuleError> {
    let unit = state.units.get(unit_id).ok_or(RuleError::UnknownUnit)?;
    if unit.flags.intersects(UnitFlags::DEVELOPMENT_REST | UnitFlags::HAS_ATTACKED) {
        return Ok(Vec::new());
    }

    let card = hx_data::get_card(unit.card_id.as_str())
        .and_then(|c| c.as_unit())
        .ok_or(RuleError::UnknownCard)?;

    if card.ranged_range == 0 {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for coord in unit.tile.neighbors(card.ranged_range) {
        collect_enemy_targets(
            state,
            unit.owner,
            coord,
            Some(UnitFlags::CANNOT_BE_RANGED_TARGETED),
            &mut out,
        );
    }
    out.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    Ok(out)
}

fn collect_enemy_targets(
    state: &MatchState,
    attacker_seat: Seat,
    coord: hx_types::hex::HexCoord,
    exclude_flag: Option<UnitFlags>,
    out: &mut Vec<TargetToken>,
) {
    let Some(tile) = state.tile(coord) else {
        return;
    };
    for unit_id in &tile.units {
        let Some(unit) = state.units.get(unit_id) else {
            continue;
        };
        if unit.owner == attacker_seat {
            continue;
        }
        if let Some(flag) = exclude_flag {
            if unit.flags.contains(flag) {
                continue;
            }
        }
        out.push(TargetToken::unit(unit_id));
    }
    if let Some(structure_id) = &tile.structure {
        if let Some(structure) = state.structures.get(structure_id) {
            if structure.owner != attacker_seat {
                out.push(TargetToken::structure(structure_id));
            }
        }
    }
    if let Some(empire_seat) = tile.empire {
        if empire_seat != attacker_seat {
            out.push(TargetToken::empire(empire_seat));
        }
    }
}

/// Which target set a `request_valid_targets` command asks for.
pub fn valid_targets_for(
    state: &MatchState,
    unit_id: &UnitInstanceId,
    kind: AttackKind,
) -> Result<Vec<TargetToken>, RuleError> {
    match kind {
        AttackKind::Melee => valid_melee_targets(state, unit_id),
        AttackKind::Ranged => valid_ranged_targets(state, unit_id),
    }
}
