//! Attack resolution.

use hx_types::state::{MatchState, UnitFlags};
use hx_types::{AttackKind, CombatTarget, Element, TargetToken, UnitInstanceId};

use crate::error::RuleError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatOutcome {
    pub attacker_id: UnitInstanceId,
    pub target_id: TargetToken,
    pub roll: u32,
    pub defense: i32,
    pub hit: bool,
    pub damage: i32,
    pub killed: bool,
}

/// Resolve one attack. Mutates `state`: applies damage, removes a
/// destroyed unit/structure, credits +1 neutral essence to the attacker's
/// owner on a unit kill, and flags the attacker `HAS_ATTACKED`.
pub fn resolve_attack(
    state: &mut MatchState,
    attacker_id: &UnitInstanceId,
    target_id: &TargetToken,
    kind: AttackKind,
) -> Result<CombatOutcome, RuleError> {
    let attacker = state.units.get(attacker_id).ok_or(RuleError::UnknownUnit)?;
    if attacker.flags.intersects(UnitFlags::DEVELOPMENT_REST | UnitFlags::HAS_ATTACKED) {
        return Err(RuleError::UnitInDevelopmentRest);
    }
    let attacker_owner = attacker.owner;
    let attacker_card = hx_data::get_card(attacker.card_id.as_str())
        .and_then(|c| c.as_unit())
        .ok_or(RuleError::UnknownCard)?;

    let raw_damage = match kind {
        AttackKind::Melee => attacker_card.melee_attack + attacker.bonuses.melee,
        AttackKind::Ranged => attacker_card.ranged_attack,
    };

    let target = target_id
        .resolve(
            |s| state.units.contains_key(&UnitInstanceId::from(s)),
            |s| state.structures.contains_key(&hx_types::StructureInstanceId::from(s)),
        )
        .ok_or(RuleError::UnknownTarget)?;

    let (roll, defense, hit) = match &target {
        CombatTarget::Unit(unit_id) => {
            let defender = state.units.get(unit_id).ok_or(RuleError::UnknownTarget)?;
            let defense = hx_data::get_card(defender.card_id.as_str())
                .and_then(|c| c.as_unit())
                .map(|c| c.defense)
                .unwrap_or(0)
                + defender.bonuses.defense
                + crate::abilities::garrison_defense_bonus(state, defender.owner, defender.tile);
            let roll = state.rng.roll_d10();
            (roll, defense, roll > defense as u32)
        }
        CombatTarget::Structure(_) | CombatTarget::Empire(_) => (10, 0, true),
    };

    let damage = if hit { raw_damage } else { 0 };
    let mut killed = false;

    if hit {
        match &target {
            CombatTarget::Unit(unit_id) => {
                let unit = state.units.get_mut(unit_id).expect("resolved above");
                unit.hp -= damage;
                if unit.hp <= 0 {
                    killed = true;
                    kill_unit(state, unit_id, attacker_owner);
                }
            }
            CombatTarget::Structure(structure_id) => {
                let structure = state.structures.get_mut(structure_id).expect("resolved above");
                structure.hp -= damage;
                if structure.hp <= 0 {
                    killed = true;
                    remove_structure(state, structure_id);
                }
            }
            CombatTarget::Empire(seat) => {
                state.player_mut(*seat).empire.hp -= damage;
            }
        }
    }

    let attacker_mut = state.units.get_mut(attacker_id).expect("checked above");
    attacker_mut.flags |= UnitFlags::HAS_ATTACKED;

    Ok(CombatOutcome {
        attacker_id: attacker_id.clone(),
        target_id: target_id.clone(),
        roll,
        defense,
        hit,
        damage,
        killed,
    })
}

fn remove_unit(state: &mut MatchState, unit_id: &hx_types::UnitInstanceId) {
    if let Some(unit) = state.units.remove(unit_id) {
        if let Some(tile) = state.tile_mut(unit.tile) {
            tile.units.retain(|u| u != unit_id);
        }
    }
}

/// Remove a dead unit and credit its owner's opponent +1 neutral essence.
/// Any unit death pays out this way, not only a combat kill. Shared by
/// combat and blitz-effect resolution.
pub(crate) fn kill_unit(state: &mut MatchState, unit_id: &hx_types::UnitInstanceId, beneficiary: hx_types::Seat) {
    remove_unit(state, unit_id);
    *state.player_mut(beneficiary).essence.bucket_mut(Element::Neutral) += 1;
}

fn remove_structure(state: &mut MatchState, structure_id: &hx_types::StructureInstanceId) {
    if let Some(structure) = state.structures.remove(structure_id) {
        if let Some(tile) = state.tile_mut(structure.tile) {
            if tile.structure.as_ref() == Some(structure_id) {
                tile.structure = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_types::hex::HexCoord;
    use hx_types::state::{TileState, TurnBonuses, UnitInstance};
    use hx_types::{CardId, Seat, TerrainType};

    fn place_tile(state: &mut MatchState, coord: HexCoord) {
        state
            .tiles
            .insert(coord.tile_id(), TileState::new(coord, TerrainType::Neutral));
    }

    fn spawn_unit(
        state: &mut MatchState,
        card_id: &str,
        owner: Seat,
        coord: HexCoord,
        hp: i32,
    ) -> UnitInstanceId {
        let id = state.mint_unit_id();
        state.units.insert(
            id.clone(),
            UnitInstance {
                id: id.clone(),
                card_id: CardId::from(card_id),
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

    /// Scenario S2: melee=3 attacker vs defense=5 target,
    /// hp=4. A guaranteed hit (defense forced to 0) deals exactly 3
    /// damage, leaving hp=1; a unit that already attacked cannot land a
    /// second hit this turn.
    #[test]
    fn scenario_s2_melee_hit_leaves_target_at_one_hp() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let origin = HexCoord::new(0, 0);
        place_tile(&mut state, origin);
        let attacker = spawn_unit(&mut state, "fire_golem", Seat::P1, origin, 8);
        state.units.get_mut(&attacker).unwrap().bonuses.melee = 3 - 4; // card melee=4 -> total 3
        let defender_coord = origin.adjacent()[0];
        place_tile(&mut state, defender_coord);
        let defender = spawn_unit(&mut state, "swordsman", Seat::P2, defender_coord, 4);
        state.units.get_mut(&defender).unwrap().bonuses.defense = -4; // card defense=4 -> total 0: guaranteed hit

        let outcome = resolve_attack(
            &mut state,
            &attacker,
            &TargetToken::unit(&defender),
            AttackKind::Melee,
        )
        .unwrap();

        assert!(outcome.hit);
        assert_eq!(outcome.damage, 3);
        assert_eq!(state.units.get(&defender).unwrap().hp, 1);
        assert!(!outcome.killed);

        let second = resolve_attack(
            &mut state,
            &attacker,
            &TargetToken::unit(&defender),
            AttackKind::Melee,
        );
        assert_eq!(second, Err(RuleError::UnitInDevelopmentRest));
    }

    /// Scenario S3: a killing hit removes the unit and grants
    /// the attacker's owner +1 neutral essence.
    #[test]
    fn scenario_s3_kill_grants_essence() {
        let mut state = MatchState::new("A".into(), "B".into(), 7, 0);
        let origin = HexCoord::new(0, 0);
        place_tile(&mut state, origin);
        let attacker = spawn_unit(&mut state, "fire_golem", Seat::P1, origin, 8);
        let defender_coord = origin.adjacent()[0];
        place_tile(&mut state, defender_coord);
        // hp low enough that any hit kills, regardless of the roll.
        let defender = spawn_unit(&mut state, "scout", Seat::P2, defender_coord, 1);
        state.units.get_mut(&defender).unwrap().bonuses.defense = -2; // defense=0: always a hit

        let before_essence = state.player(Seat::P1).essence.neutral;
        let outcome = resolve_attack(
            &mut state,
            &attacker,
            &TargetToken::unit(&defender),
            AttackKind::Melee,
        )
        .unwrap();

        assert!(outcome.hit);
        assert!(outcome.killed);
        assert!(!state.units.contains_key(&defender));
        assert_eq!(state.player(Seat::P1).essence.neutral, before_essence + 1);
    }

    #[test]
    fn structure_and_empire_targets_always_hit() {
        let mut state = MatchState::new("A".into(), "B".into(), 3, 0);
        let origin = HexCoord::new(0, 0);
        place_tile(&mut state, origin);
        let attacker = spawn_unit(&mut state, "swordsman", Seat::P1, origin, 5);
        state.player_mut(Seat::P2).empire.tile = Some(origin.adjacent()[0]);
        state.player_mut(Seat::P2).empire.hp = 10;
        place_tile(&mut state, origin.adjacent()[0]);
        state.tile_mut(origin.adjacent()[0]).unwrap().empire = Some(Seat::P2);

        let outcome = resolve_attack(
            &mut state,
            &attacker,
            &TargetToken::empire(Seat::P2),
            AttackKind::Melee,
        )
        .unwrap();

        assert!(outcome.hit);
        assert_eq!(state.player(Seat::P2).empire.hp, 10 - outcome.damage);
    }

    #[test]
    fn attacking_sets_has_attacked_flag() {
        let mut state = MatchState::new("A".into(), "B".into(), 4, 0);
        let origin = HexCoord::new(0, 0);
        place_tile(&mut state, origin);
        let attacker = spawn_unit(&mut state, "swordsman", Seat::P1, origin, 5);
        state.player_mut(Seat::P2).empire.tile = Some(origin.adjacent()[0]);
        place_tile(&mut state, origin.adjacent()[0]);
        state.tile_mut(origin.adjacent()[0]).unwrap().empire = Some(Seat::P2);

        resolve_attack(
            &mut state,
            &attacker,
            &TargetToken::empire(Seat::P2),
            AttackKind::Melee,
        )
        .unwrap();

        assert!(state
            .units
            .get(&attacker)
            .unwrap()
            .flags
            .contains(UnitFlags::HAS_ATTACKED));
    }

    #[test]
    fn attacking_twice_is_rejected() {
        let mut state = MatchState::new("A".into(), "B".into(), 4, 0);
        let origin = HexCoord::new(0, 0);
        place_tile(&mut state, origin);
        let attacker = spawn_unit(&mut state, "swordsman", Seat::P1, origin, 5);
        state.units.get_mut(&attacker).unwrap().flags |= UnitFlags::HAS_ATTACKED;

        let result = resolve_attack(
            &mut state,
            &attacker,
            &TargetToken::empire(Seat::P2),
            AttackKind::Melee,
        );
        assert_eq!(result, Err(RuleError::UnitInDevelopmentRest));
    }
}
