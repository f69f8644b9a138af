//! Structure capture progress.

use hx_types::state::{MatchState, DEFAULT_CAPTURE_THRESHOLD};
use hx_types::{Seat, StructureInstanceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureUpdate {
    pub structure_id: StructureInstanceId,
    pub new_owner: Seat,
    pub progress: u32,
    pub threshold: u32,
    pub transferred: bool,
}

/// Re-evaluate capture progress for every enemy structure against `mover`,
/// the seat that just moved a unit. Must run after every move.
pub fn update_capture_progress(state: &mut MatchState, mover: Seat) -> Vec<CaptureUpdate> {
    let structure_ids: Vec<StructureInstanceId> = state
        .structures
        .iter()
        .filter(|(_, s)| s.owner != mover)
        .map(|(id, _)| id.clone())
        .collect();

    let mut updates = Vec::new();
    for structure_id in structure_ids {
        if let Some(update) = update_one(state, &structure_id, mover) {
            updates.push(update);
        }
    }
    updates
}

fn update_one(state: &mut MatchState, structure_id: &StructureInstanceId, mover: Seat) -> Option<CaptureUpdate> {
    let structure = state.structures.get(structure_id)?;
    let owner = structure.owner;
    let tile_coord = structure.tile;

    let mut nearby_enemies = 0usize;
    let mut nearby_defenders = 0usize;
    for neighbor in tile_coord.adjacent() {
        let Some(tile) = state.tile(neighbor) else {
            continue;
        };
        for unit_id in &tile.units {
            let Some(unit) = state.units.get(unit_id) else {
                continue;
            };
            if unit.owner == mover {
                nearby_enemies += 1;
            } else if unit.owner == owner {
                nearby_defenders += 1;
            }
        }
    }

    let structure = state.structures.get_mut(structure_id)?;
    if nearby_defenders > 0 {
        structure.capture_progress = 0;
    } else if nearby_enemies >= 2 {
        structure.capture_progress = (structure.capture_progress + 2).min(structure.capture_threshold.max(2));
    } else if nearby_enemies == 1 {
        structure.capture_progress = (structure.capture_progress + 1).min(structure.capture_threshold.max(2));
    }

    let threshold = structure.capture_threshold.max(DEFAULT_CAPTURE_THRESHOLD);
    let mut transferred = false;
    if structure.capture_progress >= threshold {
        structure.owner = mover;
        structure.capture_progress = 0;
        transferred = true;
    }

    let structure = state.structures.get(structure_id)?;
    Some(CaptureUpdate {
        structure_id: structure_id.clone(),
        new_owner: structure.owner,
        progress: structure.capture_progress,
        threshold,
        transferred,
    })
}
