//! Fixed ability-id behaviors for blitz cards and structure passives
//!.
//!
//! Unit/blitz/structure card text beyond these ids is informational only;
//! everything the rules engine can actually execute is named here.

use hx_data::AbilityId;
use hx_types::state::MatchState;
use hx_types::{CombatTarget, Element, Seat, TargetToken};

use crate::combat::kill_unit;
use crate::error::RuleError;

/// Flat damage an `instant_bolt` blitz deals. Meaningful against the
/// catalog's low-hp units without guaranteeing a kill outright.
pub const INSTANT_BOLT_DAMAGE: i32 = 2;

/// Melee bonus a `slow_rally` blitz grants its target for the rest of the
/// turn (cleared at the owner's next Standby along with all per-turn
/// bonuses).
pub const SLOW_RALLY_MELEE_BONUS: i32 = 2;

/// Defense bonus `structure_garrison` grants owned units standing on or
/// adjacent to the structure's tile. Units and structures never share a
/// tile (spawn and move both reject an occupied destination), so the
/// defended zone is the structure's tile plus its six neighbors rather
/// than the tile alone.
pub const GARRISON_DEFENSE_BONUS: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityOutcome {
    /// `instant_bolt` resolved: damage applied (0 if the target died to
    /// another cause first and no longer resolves).
    Bolt {
        target_id: TargetToken,
        damage: i32,
        killed: bool,
    },
    /// `slow_rally` resolved: melee bonus applied to the target unit.
    Rally { target_id: TargetToken },
    /// The pending blitz was negated by a `reaction_ward` response.
    Negated,
}

/// Apply a resolved (non-reaction) blitz's effect. Called once the reaction
/// window closes without a negation — applied only after the window
/// closes, never before.
pub fn apply_blitz_effect(
    state: &mut MatchState,
    caster: Seat,
    ability: AbilityId,
    target: Option<&TargetToken>,
) -> Result<AbilityOutcome, RuleError> {
    match ability {
        AbilityId::InstantBolt => apply_bolt(state, caster, target),
        AbilityId::SlowRally => apply_rally(state, caster, target),
        _ => Err(RuleError::NoValidTarget),
    }
}

fn apply_bolt(
    state: &mut MatchState,
    caster: Seat,
    target: Option<&TargetToken>,
) -> Result<AbilityOutcome, RuleError> {
    let target_id = target.ok_or(RuleError::NoValidTarget)?;
    let resolved = target_id
        .resolve(
            |s| state.units.contains_key(&hx_types::UnitInstanceId::from(s)),
            |s| {
                state
                    .structures
                    .contains_key(&hx_types::StructureInstanceId::from(s))
            },
        )
        .ok_or(RuleError::UnknownTarget)?;

    let mut killed = false;
    match resolved {
        CombatTarget::Unit(unit_id) => {
            let unit = state.units.get_mut(&unit_id).ok_or(RuleError::UnknownTarget)?;
            unit.hp -= INSTANT_BOLT_DAMAGE;
            if unit.hp <= 0 {
                killed = true;
                kill_unit(state, &unit_id, caster);
            }
        }
        CombatTarget::Structure(structure_id) => {
            if let Some(structure) = state.structures.get_mut(&structure_id) {
                structure.hp -= INSTANT_BOLT_DAMAGE;
            }
        }
        CombatTarget::Empire(seat) => {
            state.player_mut(seat).empire.hp -= INSTANT_BOLT_DAMAGE;
        }
    }

    Ok(AbilityOutcome::Bolt {
        target_id: target_id.clone(),
        damage: INSTANT_BOLT_DAMAGE,
        killed,
    })
}

fn apply_rally(
    state: &mut MatchState,
    caster: Seat,
    target: Option<&TargetToken>,
) -> Result<AbilityOutcome, RuleError> {
    let target_id = target.ok_or(RuleError::NoValidTarget)?;
    let unit_id = hx_types::UnitInstanceId::from(target_id.as_str());
    let unit = state.units.get_mut(&unit_id).ok_or(RuleError::UnknownTarget)?;
    if unit.owner != caster {
        return Err(RuleError::NotOwner);
    }
    unit.bonuses.melee += SLOW_RALLY_MELEE_BONUS;

    Ok(AbilityOutcome::Rally {
        target_id: target_id.clone(),
    })
}

/// The defense bonus a unit on `tile` receives from an owned
/// `structure_garrison` structure standing on or adjacent to `tile`, or 0
/// if none applies.
pub fn garrison_defense_bonus(state: &MatchState, defender_owner: Seat, tile: hx_types::hex::HexCoord) -> i32 {
    let garrisons = state.structures.values().any(|structure| {
        structure.owner == defender_owner
            && tile.distance(structure.tile) <= 1
            && hx_data::get_card(structure.card_id.as_str())
                .and_then(|c| c.as_structure())
                .is_some_and(|def| matches!(def.effect, AbilityId::StructureGarrison))
    });
    if garrisons {
        GARRISON_DEFENSE_BONUS
    } else {
        0
    }
}

/// Whether `element` is affordable and `cost` can be paid from `caster`'s
/// pool, deducting on success (shared by play_blitz and react_blitz).
pub fn pay_cost(state: &mut MatchState, caster: Seat, cost: u32, element: Element) -> Result<(), RuleError> {
    let pool = state.player(caster).essence;
    if !crate::essence::can_afford(&pool, cost, element) {
        return Err(RuleError::InsufficientEssence);
    }
    crate::essence::spend(&mut state.player_mut(caster).essence, cost, element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_types::hex::HexCoord;
    use hx_types::state::{StructureInstance, TileState, TurnBonuses, UnitFlags, UnitInstance};
    use hx_types::{CardId, TerrainType};

    fn place_tile(state: &mut MatchState, coord: HexCoord) {
        state
            .tiles
            .insert(coord.tile_id(), TileState::new(coord, TerrainType::Neutral));
    }

    fn spawn_unit(state: &mut MatchState, owner: Seat, coord: HexCoord, hp: i32) -> hx_types::UnitInstanceId {
        let id = state.mint_unit_id();
        state.units.insert(
            id.clone(),
            UnitInstance {
                id: id.clone(),
                card_id: CardId::from("scout"),
                owner,
                tile: coord,
                hp,
                flags: UnitFlags::empty(),
                bonuses: TurnBonuses::default(),
            },
        );
        state.tile_mut(coord).unwrap().units.push(id.clone());
        id
    }

    #[test]
    fn bolt_damages_and_can_kill() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let coord = HexCoord::new(0, 0);
        place_tile(&mut state, coord);
        let target = spawn_unit(&mut state, Seat::P2, coord, 1);

        let outcome = apply_blitz_effect(
            &mut state,
            Seat::P1,
            AbilityId::InstantBolt,
            Some(&TargetToken::unit(&target)),
        )
        .unwrap();

        assert_eq!(
            outcome,
            AbilityOutcome::Bolt {
                target_id: TargetToken::unit(&target),
                damage: INSTANT_BOLT_DAMAGE,
                killed: true,
            }
        );
        assert!(!state.units.contains_key(&target));
    }

    #[test]
    fn rally_adds_melee_bonus_to_owned_unit_only() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let coord = HexCoord::new(0, 0);
        place_tile(&mut state, coord);
        let mine = spawn_unit(&mut state, Seat::P1, coord, 5);
        let theirs = spawn_unit(&mut state, Seat::P2, coord, 5);

        apply_blitz_effect(
            &mut state,
            Seat::P1,
            AbilityId::SlowRally,
            Some(&TargetToken::unit(&mine)),
        )
        .unwrap();
        assert_eq!(state.units.get(&mine).unwrap().bonuses.melee, SLOW_RALLY_MELEE_BONUS);

        let err = apply_blitz_effect(
            &mut state,
            Seat::P1,
            AbilityId::SlowRally,
            Some(&TargetToken::unit(&theirs)),
        )
        .unwrap_err();
        assert_eq!(err, RuleError::NotOwner);
    }

    #[test]
    fn garrison_bonus_only_applies_to_the_structure_owner() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let coord = HexCoord::new(0, 0);
        place_tile(&mut state, coord);
        let structure_id = state.mint_structure_id();
        state.structures.insert(
            structure_id.clone(),
            StructureInstance {
                id: structure_id.clone(),
                card_id: CardId::from("watchtower"),
                owner: Seat::P1,
                tile: coord,
                hp: 8,
                capture_progress: 0,
                capture_threshold: 2,
            },
        );
        state.tile_mut(coord).unwrap().structure = Some(structure_id);

        assert_eq!(garrison_defense_bonus(&state, Seat::P1, coord), GARRISON_DEFENSE_BONUS);
        assert_eq!(garrison_defense_bonus(&state, Seat::P2, coord), 0);
    }
}
