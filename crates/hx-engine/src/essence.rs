//! Essence affordability, spending, and recalculation.

use hx_types::state::{EssencePool, MatchState};
use hx_types::{Element, Seat};

/// Whether `pool` can pay `cost` of `element`. A neutral cost may be paid
/// from any combination of buckets; an elemental cost must come from its
/// own bucket.
pub fn can_afford(pool: &EssencePool, cost: u32, element: Element) -> bool {
    match element {
        Element::Neutral => pool.total() >= cost,
        _ => pool.bucket(element) >= cost,
    }
}

/// Deduct `cost` of `element` from `pool`. For a neutral cost, deducts from
/// neutral first, then fire, then water. Caller must have already checked
/// `can_afford`; this never goes negative (it saturates, which should never
/// trigger in a correctly gated dispatcher).
pub fn spend(pool: &mut EssencePool, cost: u32, element: Element) {
    match element {
        Element::Neutral => {
            let mut remaining = cost;
            for bucket_element in [Element::Neutral, Element::Fire, Element::Water] {
                let bucket = pool.bucket_mut(bucket_element);
                let take = remaining.min(*bucket);
                *bucket -= take;
                remaining -= take;
                if remaining == 0 {
                    break;
                }
            }
        }
        _ => {
            let bucket = pool.bucket_mut(element);
            *bucket = bucket.saturating_sub(cost);
        }
    }
}

/// Recompute `seat`'s essence pool from scratch: an empire contributes +2 of
/// its tile's element, each owned structure and builder contributes +1 of
/// its tile's element. Neutral tiles
/// contribute nothing.
pub fn recalculate(state: &mut MatchState, seat: Seat) {
    let mut pool = EssencePool::default();

    let empire_tile = state.player(seat).empire.tile;
    if let Some(coord) = empire_tile {
        if let Some(tile) = state.tile(coord) {
            if let Some(element) = tile.terrain.essence_element() {
                *pool.bucket_mut(element) += 2;
            }
        }
    }

    for structure in state.structures.values() {
        if structure.owner != seat {
            continue;
        }
        if let Some(tile) = state.tile(structure.tile) {
            if let Some(element) = tile.terrain.essence_element() {
                *pool.bucket_mut(element) += 1;
            }
        }
    }

    for builder in state.builders.values() {
        if builder.owner != seat {
            continue;
        }
        if let Some(tile) = state.tile(builder.tile) {
            if let Some(element) = tile.terrain.essence_element() {
                *pool.bucket_mut(element) += 1;
            }
        }
    }

    state.player_mut(seat).essence = pool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_types::hex::HexCoord;
    use hx_types::state::TileState;
    use hx_types::TerrainType;

    #[test]
    fn can_afford_neutral_from_any_combination() {
        let pool = EssencePool {
            neutral: 0,
            fire: 1,
            water: 1,
        };
        assert!(can_afford(&pool, 2, Element::Neutral));
        assert!(!can_afford(&pool, 3, Element::Neutral));
    }

    #[test]
    fn can_afford_elemental_requires_its_own_bucket() {
        let pool = EssencePool {
            neutral: 5,
            fire: 0,
            water: 1,
        };
        assert!(!can_afford(&pool, 1, Element::Fire));
        assert!(can_afford(&pool, 1, Element::Water));
    }

    #[test]
    fn spend_neutral_drains_neutral_then_fire_then_water() {
        let mut pool = EssencePool {
            neutral: 1,
            fire: 1,
            water: 1,
        };
        spend(&mut pool, 2, Element::Neutral);
        assert_eq!(pool.neutral, 0);
        assert_eq!(pool.fire, 0);
        assert_eq!(pool.water, 1);
    }

    #[test]
    fn spend_elemental_only_touches_its_bucket() {
        let mut pool = EssencePool {
            neutral: 5,
            fire: 3,
            water: 0,
        };
        spend(&mut pool, 2, Element::Fire);
        assert_eq!(pool.fire, 1);
        assert_eq!(pool.neutral, 5);
    }

    /// Scenario S1: two neutral tiles and one fire tile
    /// adjacent, empire on the fire tile, no structures.
    #[test]
    fn scenario_s1_essence_income() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let fire_coord = HexCoord::new(0, 0);
        let neutral_a = HexCoord::new(0, 1);
        let neutral_b = HexCoord::new(1, 0);
        state.tiles.insert(
            fire_coord.tile_id(),
            TileState::new(fire_coord, TerrainType::Fire),
        );
        state.tiles.insert(
            neutral_a.tile_id(),
            TileState::new(neutral_a, TerrainType::Neutral),
        );
        state.tiles.insert(
            neutral_b.tile_id(),
            TileState::new(neutral_b, TerrainType::Neutral),
        );
        state.player_mut(Seat::P1).empire.tile = Some(fire_coord);

        recalculate(&mut state, Seat::P1);

        let pool = state.player(Seat::P1).essence;
        assert_eq!(pool.neutral, 0);
        assert_eq!(pool.fire, 2);
        assert_eq!(pool.water, 0);
    }

    /// Testable property 6: recalculate is idempotent.
    #[test]
    fn recalculate_is_idempotent() {
        let mut state = MatchState::new("A".into(), "B".into(), 1, 0);
        let fire_coord = HexCoord::new(0, 0);
        state.tiles.insert(
            fire_coord.tile_id(),
            TileState::new(fire_coord, TerrainType::Fire),
        );
        state.player_mut(Seat::P1).empire.tile = Some(fire_coord);

        recalculate(&mut state, Seat::P1);
        let first = state.player(Seat::P1).essence;
        recalculate(&mut state, Seat::P1);
        let second = state.player(Seat::P1).essence;
        assert_eq!(first, second);
    }
}
