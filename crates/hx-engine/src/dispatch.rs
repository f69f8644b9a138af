//! The command dispatcher: the sole writer of `MatchState`.
//!
//! `dispatch` runs a fixed gate order — reaction window, info requests,
//! phase — then delegates to the rules engine and assembles the events the
//! fan-out layer hands to each seat.

use hx_data::AbilityId;
use hx_types::command::Command;
use hx_types::event::Event;
use hx_types::hex::HexCoord;
use hx_types::state::{
    BuilderInstance, LogEntry, MatchState, PendingBlitz, ReactionWindow, StructureInstance,
    TileState, TurnBonuses, UnitFlags, UnitInstance, FIRST_PLAYER_NO_DEV_REST_ROUNDS,
};
use hx_types::{BlitzTiming, CardId, DeckKind, Phase, Seat, TargetToken, TerrainType, TileId,
    UnitInstanceId, WinReason};

use crate::error::RuleError;
use crate::fanout::{state_update_events, TargetedEvent};
use crate::{abilities, capture, combat, essence, fog, movement, siege, spawn, targets};

/// Dispatch one command from `seat` against `state`. Mutates `state` on
/// success; on rejection (rule violation) returns a private `error` event
/// to `seat` and leaves `state` untouched. Seat/phase mismatches and
/// reaction-window violations are dropped silently, never surfaced as an
/// error event.
pub fn dispatch(state: &mut MatchState, seat: Seat, command: Command) -> Vec<TargetedEvent> {
    if state.is_over() {
        return Vec::new();
    }

    if matches!(command, Command::Concede) {
        tracing::info!(?seat, "concede");
        return run(state, seat, command);
    }

    if let Some(window) = &state.reaction_window {
        let reactor = window.reacting_seat;
        if seat != reactor || !command.is_reaction_response() {
            return Vec::new();
        }
        return run(state, seat, command);
    }

    if command.is_reaction_response() {
        return Vec::new();
    }

    if command.is_info_request() {
        return handle_info_request(state, seat, command);
    }

    if !phase_allows(state, seat, &command) {
        return Vec::new();
    }

    run(state, seat, command)
}

fn run(state: &mut MatchState, seat: Seat, command: Command) -> Vec<TargetedEvent> {
    match apply(state, seat, command) {
        Ok(mut events) => {
            events.extend(advance_phase_machine(state));
            events
        }
        Err(err) => {
            tracing::debug!(?seat, code = err.code(), "command rejected");
            vec![TargetedEvent::to(seat, error_event(err))]
        }
    }
}

fn error_event(err: RuleError) -> Event {
    Event::Error {
        code: err.code().into(),
        message: err.message().into(),
    }
}

fn handle_info_request(state: &MatchState, seat: Seat, command: Command) -> Vec<TargetedEvent> {
    match command {
        Command::RequestValidMoves { unit_id } => {
            if !movement::seat_owns_unit(state, seat, &unit_id) {
                return vec![TargetedEvent::to(seat, error_event(RuleError::NotOwner))];
            }
            match movement::valid_moves(state, &unit_id) {
                Ok(tile_ids) => vec![TargetedEvent::to(seat, Event::ValidMoves { unit_id, tile_ids })],
                Err(err) => vec![TargetedEvent::to(seat, error_event(err))],
            }
        }
        Command::RequestValidTargets { unit_id, attack_type } => {
            if !movement::seat_owns_unit(state, seat, &unit_id) {
                return vec![TargetedEvent::to(seat, error_event(RuleError::NotOwner))];
            }
            match targets::valid_targets_for(state, &unit_id, attack_type) {
                Ok(target_ids) => vec![TargetedEvent::to(seat, Event::ValidTargets { unit_id, target_ids })],
                Err(err) => vec![TargetedEvent::to(seat, error_event(err))],
            }
        }
        _ => Vec::new(),
    }
}

/// The phase gate. `Concede` and reaction responses
/// are handled earlier in `dispatch` and never reach this function.
fn phase_allows(state: &MatchState, seat: Seat, command: &Command) -> bool {
    match state.phase {
        Phase::SetupTiles => {
            seat == state.active_seat
                && matches!(command, Command::PlaceTile { .. } | Command::EndTilePlacement)
        }
        Phase::SetupEmpire => matches!(command, Command::PlaceEmpire { .. }),
        Phase::Standby => false,
        Phase::Draw => seat == state.active_seat && matches!(command, Command::DrawCard { .. }),
        Phase::Main => {
            seat == state.active_seat
                && matches!(
                    command,
                    Command::MoveUnit { .. }
                        | Command::MeleeAttack { .. }
                        | Command::RangedAttack { .. }
                        | Command::PlayUnit { .. }
                        | Command::PlayBlitz { .. }
                        | Command::PlayStructure { .. }
                        | Command::PlaceBuilder { .. }
                        | Command::UseTerraform { .. }
                        | Command::EndTurn
                )
        }
        Phase::End => false,
    }
}

fn log(state: &mut MatchState, seat: Option<Seat>, message: impl Into<String>) {
    let round = state.round_number;
    state.log.push(LogEntry {
        round,
        seat,
        message: message.into(),
    });
}

fn apply(state: &mut MatchState, seat: Seat, command: Command) -> Result<Vec<TargetedEvent>, RuleError> {
    match command {
        Command::PlaceTile { tile_id, tile_type } => apply_place_tile(state, seat, tile_id, tile_type),
        Command::EndTilePlacement => apply_end_tile_placement(state, seat),
        Command::PlaceEmpire { tile_id } => apply_place_empire(state, seat, tile_id),
        Command::DrawCard { deck } => apply_draw_card(state, seat, deck),
        Command::MoveUnit { unit_id, target_tile_id } => apply_move_unit(state, seat, unit_id, target_tile_id),
        Command::MeleeAttack { attacker_unit_id, target_id } => {
            apply_attack(state, seat, attacker_unit_id, target_id, hx_types::AttackKind::Melee)
        }
        Command::RangedAttack { attacker_unit_id, target_id } => {
            apply_attack(state, seat, attacker_unit_id, target_id, hx_types::AttackKind::Ranged)
        }
        Command::PlayUnit { card_id, spawn_tile_id } => apply_play_unit(state, seat, card_id, spawn_tile_id),
        Command::PlayBlitz { card_id, target_id } => apply_play_blitz(state, seat, card_id, target_id),
        Command::PlayStructure { card_id, tile_id } => apply_play_structure(state, seat, card_id, tile_id),
        Command::PlaceBuilder { tile_id } => apply_place_builder(state, seat, tile_id),
        Command::UseTerraform { unit_id } => apply_use_terraform(state, seat, unit_id),
        Command::ReactBlitz { card_id } => apply_react_blitz(state, seat, card_id),
        Command::PassReaction => apply_pass_reaction(state, seat),
        Command::EndTurn => apply_end_turn(state, seat),
        Command::Concede => apply_concede(state, seat),
        Command::RequestValidMoves { .. } | Command::RequestValidTargets { .. } => {
            unreachable!("info requests never reach apply")
        }
    }
}

fn apply_place_tile(
    state: &mut MatchState,
    seat: Seat,
    tile_id: TileId,
    tile_type: TerrainType,
) -> Result<Vec<TargetedEvent>, RuleError> {
    if state.tiles.contains_key(&tile_id) {
        return Err(RuleError::TileAlreadyExists);
    }
    let player = state.player(seat);
    if player.ended_tile_placement {
        return Err(RuleError::TilePlacementAlreadyEnded);
    }
    if player.tiles_remaining == 0 {
        return Err(RuleError::NoTilesRemaining);
    }
    let coord = HexCoord::parse(tile_id.as_str()).ok_or(RuleError::UnknownTarget)?;

    state.tiles.insert(coord.tile_id(), TileState::new(coord, tile_type));
    state.player_mut(seat).tiles_remaining -= 1;
    log(state, Some(seat), format!("placed tile {tile_id}"));

    Ok(state_update_events(state))
}

fn apply_end_tile_placement(state: &mut MatchState, seat: Seat) -> Result<Vec<TargetedEvent>, RuleError> {
    if state.player(seat).ended_tile_placement {
        return Err(RuleError::TilePlacementAlreadyEnded);
    }
    state.player_mut(seat).ended_tile_placement = true;
    log(state, Some(seat), "ended tile placement");

    let mut events = Vec::new();
    if state.player(seat.opponent()).ended_tile_placement {
        state.phase = Phase::SetupEmpire;
        events.push(phase_change_event(state));
    } else {
        state.active_seat = seat.opponent();
    }
    events.extend(state_update_events(state));
    Ok(events)
}

fn apply_place_empire(state: &mut MatchState, seat: Seat, tile_id: TileId) -> Result<Vec<TargetedEvent>, RuleError> {
    if state.player(seat).empire.is_placed() {
        return Err(RuleError::EmpireAlreadyPlaced);
    }
    let coord = HexCoord::parse(tile_id.as_str()).ok_or(RuleError::UnknownTarget)?;
    let tile = state.tile(coord).ok_or(RuleError::UnknownTarget)?;
    if tile.is_occupied() {
        return Err(RuleError::TileOccupied);
    }

    state.tile_mut(coord).unwrap().empire = Some(seat);
    state.player_mut(seat).empire.tile = Some(coord);
    let revealed = fog::reveal(state, coord);
    essence::recalculate(state, seat);
    log(state, Some(seat), format!("placed empire at {tile_id}"));

    let mut events = Vec::new();
    if revealed {
        events.push(TargetedEvent::both(Event::FogReveal { tile_id: coord.tile_id() }));
    }
    if state.player(Seat::P1).empire.is_placed() && state.player(Seat::P2).empire.is_placed() {
        state.phase = Phase::Standby;
        state.active_seat = Seat::P1;
        events.push(phase_change_event(state));
    }
    events.extend(state_update_events(state));
    Ok(events)
}

fn apply_draw_card(state: &mut MatchState, seat: Seat, deck: DeckKind) -> Result<Vec<TargetedEvent>, RuleError> {
    let card_id = {
        let player = state.player_mut(seat);
        match deck {
            DeckKind::Unit => player.unit_deck.pop(),
            DeckKind::Blitz => player.blitz_deck.pop(),
        }
        .ok_or(RuleError::DeckEmpty)?
    };
    state.player_mut(seat).hand.push(card_id.clone());
    state.phase = Phase::Main;
    log(state, Some(seat), format!("drew {card_id} from {deck:?}"));

    let mut events = vec![
        TargetedEvent::to(
            seat,
            Event::DrawResult {
                seat,
                deck,
                card_id: Some(card_id),
            },
        ),
        TargetedEvent::to(
            seat.opponent(),
            Event::DrawResult {
                seat,
                deck,
                card_id: None,
            },
        ),
        phase_change_event(state),
    ];
    events.extend(state_update_events(state));
    Ok(events)
}

fn apply_move_unit(
    state: &mut MatchState,
    seat: Seat,
    unit_id: UnitInstanceId,
    target_tile_id: TileId,
) -> Result<Vec<TargetedEvent>, RuleError> {
    if !movement::seat_owns_unit(state, seat, &unit_id) {
        return Err(RuleError::NotOwner);
    }
    let valid = movement::valid_moves(state, &unit_id)?;
    if !valid.contains(&target_tile_id) {
        return Err(RuleError::InvalidMoveDestination);
    }
    let target_coord = HexCoord::parse(target_tile_id.as_str()).ok_or(RuleError::UnknownTarget)?;

    let old_coord = state.units.get(&unit_id).expect("owned above").tile;
    if let Some(old_tile) = state.tile_mut(old_coord) {
        old_tile.units.retain(|u| u != &unit_id);
    }
    if let Some(new_tile) = state.tile_mut(target_coord) {
        new_tile.units.push(unit_id.clone());
    }
    let unit = state.units.get_mut(&unit_id).expect("owned above");
    unit.tile = target_coord;
    unit.flags |= UnitFlags::HAS_MOVED;
    log(state, Some(seat), format!("moved {unit_id} to {target_tile_id}"));

    let mut events = Vec::new();
    if fog::reveal(state, target_coord) {
        events.push(TargetedEvent::both(Event::FogReveal {
            tile_id: target_tile_id,
        }));
    }
    events.extend(state_update_events(state));

    for update in capture::update_capture_progress(state, seat) {
        events.push(TargetedEvent::both(Event::CaptureUpdate {
            structure_id: update.structure_id,
            owner: update.new_owner,
            capture_progress: update.progress,
            capture_threshold: update.threshold,
        }));
    }

    for watched in [Seat::P1, Seat::P2] {
        events.push(TargetedEvent::both(Event::SiegeUpdate {
            seat: watched,
            enemy_unit_count: siege::enemy_units_near_empire(state, watched),
        }));
    }

    if let Some(result) = siege::check_win(state) {
        events.push(game_over_event(result));
    }
    Ok(events)
}

fn apply_attack(
    state: &mut MatchState,
    seat: Seat,
    attacker_unit_id: UnitInstanceId,
    target_id: TargetToken,
    kind: hx_types::AttackKind,
) -> Result<Vec<TargetedEvent>, RuleError> {
    if !movement::seat_owns_unit(state, seat, &attacker_unit_id) {
        return Err(RuleError::NotOwner);
    }
    let valid = targets::valid_targets_for(state, &attacker_unit_id, kind)?;
    if !valid.contains(&target_id) {
        return Err(RuleError::NoValidTarget);
    }
    let outcome = combat::resolve_attack(state, &attacker_unit_id, &target_id, kind)?;
    log(state, Some(seat), format!("{attacker_unit_id} attacked {target_id}"));

    let mut events = vec![TargetedEvent::both(Event::CombatResult {
        attacker_id: outcome.attacker_id,
        target_id: outcome.target_id,
        roll: outcome.roll,
        defense: outcome.defense,
        hit: outcome.hit,
        damage: outcome.damage,
        killed: outcome.killed,
    })];
    events.extend(state_update_events(state));

    if let Some(result) = siege::check_win(state) {
        events.push(game_over_event(result));
    }
    Ok(events)
}

fn apply_play_unit(
    state: &mut MatchState,
    seat: Seat,
    card_id: CardId,
    spawn_tile_id: TileId,
) -> Result<Vec<TargetedEvent>, RuleError> {
    if !state.player(seat).hand.contains(&card_id) {
        return Err(RuleError::CardNotInHand);
    }
    let def = hx_data::get_card(card_id.as_str()).ok_or(RuleError::UnknownCard)?;
    let unit_card = def.as_unit().ok_or(RuleError::UnknownCard)?;
    let coord = HexCoord::parse(spawn_tile_id.as_str()).ok_or(RuleError::UnknownTarget)?;
    if !spawn::is_valid_spawn_tile(state, seat, coord) {
        return Err(RuleError::SpawnOutOfRange);
    }
    let (cost, element) = def.cost();
    if !essence::can_afford(&state.player(seat).essence, cost, element) {
        return Err(RuleError::InsufficientEssence);
    }
    essence::spend(&mut state.player_mut(seat).essence, cost, element);
    state.player_mut(seat).hand.retain(|c| c != &card_id);

    let flags = if state.round_number > FIRST_PLAYER_NO_DEV_REST_ROUNDS {
        UnitFlags::DEVELOPMENT_REST
    } else {
        UnitFlags::empty()
    };
    let id = state.mint_unit_id();
    state.units.insert(
        id.clone(),
        UnitInstance {
            id: id.clone(),
            card_id: card_id.clone(),
            owner: seat,
            tile: coord,
            hp: unit_card.hp,
            flags,
            bonuses: TurnBonuses::default(),
        },
    );
    state.tile_mut(coord).unwrap().units.push(id);
    log(state, Some(seat), format!("deployed {card_id} at {spawn_tile_id}"));

    let mut events = Vec::new();
    if fog::reveal(state, coord) {
        events.push(TargetedEvent::both(Event::FogReveal { tile_id: spawn_tile_id }));
    }
    events.extend(state_update_events(state));
    Ok(events)
}

fn apply_play_structure(
    state: &mut MatchState,
    seat: Seat,
    card_id: CardId,
    tile_id: TileId,
) -> Result<Vec<TargetedEvent>, RuleError> {
    if !state.player(seat).hand.contains(&card_id) {
        return Err(RuleError::CardNotInHand);
    }
    let def = hx_data::get_card(card_id.as_str()).ok_or(RuleError::UnknownCard)?;
    let structure_card = def.as_structure().ok_or(RuleError::UnknownCard)?;
    let coord = HexCoord::parse(tile_id.as_str()).ok_or(RuleError::UnknownTarget)?;
    let tile = state.tile(coord).ok_or(RuleError::UnknownTarget)?;
    if tile.is_occupied() {
        return Err(RuleError::TileOccupied);
    }
    if let Some(required) = structure_card.placement_element {
        if tile.terrain.essence_element() != Some(required) {
            return Err(RuleError::TileNotElemental);
        }
    }
    let (cost, element) = def.cost();
    if !essence::can_afford(&state.player(seat).essence, cost, element) {
        return Err(RuleError::InsufficientEssence);
    }
    essence::spend(&mut state.player_mut(seat).essence, cost, element);
    state.player_mut(seat).hand.retain(|c| c != &card_id);

    let id = state.mint_structure_id();
    state.structures.insert(
        id.clone(),
        StructureInstance {
            id: id.clone(),
            card_id: card_id.clone(),
            owner: seat,
            tile: coord,
            hp: structure_card.hp,
            capture_progress: 0,
            capture_threshold: structure_card.capture_threshold,
        },
    );
    state.tile_mut(coord).unwrap().structure = Some(id);
    log(state, Some(seat), format!("built {card_id} at {tile_id}"));

    let mut events = Vec::new();
    if fog::reveal(state, coord) {
        events.push(TargetedEvent::both(Event::FogReveal { tile_id }));
    }
    events.extend(state_update_events(state));
    Ok(events)
}

fn apply_place_builder(state: &mut MatchState, seat: Seat, tile_id: TileId) -> Result<Vec<TargetedEvent>, RuleError> {
    let coord = HexCoord::parse(tile_id.as_str()).ok_or(RuleError::UnknownTarget)?;
    let tile = state.tile(coord).ok_or(RuleError::UnknownTarget)?;
    if !tile.terrain.is_elemental() {
        return Err(RuleError::TileNotElemental);
    }
    if tile.is_occupied() {
        return Err(RuleError::TileOccupied);
    }

    let id = state.mint_builder_id();
    state.builders.insert(
        id.clone(),
        BuilderInstance {
            id: id.clone(),
            owner: seat,
            tile: coord,
        },
    );
    state.tile_mut(coord).unwrap().builder = Some(id);
    essence::recalculate(state, seat);
    log(state, Some(seat), format!("placed builder at {tile_id}"));

    let mut events = Vec::new();
    if fog::reveal(state, coord) {
        events.push(TargetedEvent::both(Event::FogReveal { tile_id }));
    }
    events.extend(state_update_events(state));
    Ok(events)
}

fn apply_use_terraform(state: &mut MatchState, seat: Seat, unit_id: UnitInstanceId) -> Result<Vec<TargetedEvent>, RuleError> {
    if !movement::seat_owns_unit(state, seat, &unit_id) {
        return Err(RuleError::NotOwner);
    }
    let unit = state.units.get(&unit_id).ok_or(RuleError::UnknownUnit)?;
    if unit.flags.contains(UnitFlags::TERRAFORM_USED) {
        return Err(RuleError::NoValidTarget);
    }
    let card = hx_data::get_card(unit.card_id.as_str())
        .and_then(|c| c.as_unit())
        .ok_or(RuleError::UnknownCard)?;
    if !matches!(card.ability, AbilityId::Terraform) {
        return Err(RuleError::NoValidTarget);
    }
    let coord = unit.tile;
    if !state.tile(coord).ok_or(RuleError::UnknownTarget)?.terrain.is_elemental() {
        return Err(RuleError::TileAlreadyNeutral);
    }

    state.tile_mut(coord).unwrap().terrain = TerrainType::Neutral;
    state.units.get_mut(&unit_id).unwrap().flags |= UnitFlags::TERRAFORM_USED;
    essence::recalculate(state, seat);
    essence::recalculate(state, seat.opponent());
    log(state, Some(seat), format!("terraformed under {unit_id}"));

    Ok(state_update_events(state))
}

fn apply_play_blitz(
    state: &mut MatchState,
    seat: Seat,
    card_id: CardId,
    target_id: Option<TargetToken>,
) -> Result<Vec<TargetedEvent>, RuleError> {
    if !state.player(seat).hand.contains(&card_id) {
        return Err(RuleError::CardNotInHand);
    }
    let def = hx_data::get_card(card_id.as_str()).ok_or(RuleError::UnknownCard)?;
    let blitz_card = def.as_blitz().ok_or(RuleError::UnknownCard)?;
    if matches!(blitz_card.timing, BlitzTiming::Reaction) {
        return Err(RuleError::NoValidTarget);
    }
    let (cost, element) = def.cost();
    abilities::pay_cost(state, seat, cost, element)?;
    state.player_mut(seat).hand.retain(|c| c != &card_id);
    log(state, Some(seat), format!("played blitz {card_id}"));

    let mut events = vec![TargetedEvent::both(Event::BlitzPlayed {
        card_id: Some(card_id.clone()),
        played_by: seat,
        target_id: target_id.clone(),
    })];

    match blitz_card.timing {
        BlitzTiming::Instant | BlitzTiming::Slow => {
            state.reaction_window = Some(ReactionWindow {
                reacting_seat: seat.opponent(),
                pending: PendingBlitz {
                    card_id,
                    played_by: seat,
                    target: target_id,
                },
            });
            events.extend(state_update_events(state));
        }
        BlitzTiming::Reaction => unreachable!("rejected above"),
    }

    Ok(events)
}

fn apply_react_blitz(state: &mut MatchState, seat: Seat, card_id: CardId) -> Result<Vec<TargetedEvent>, RuleError> {
    let window = state.reaction_window.clone().ok_or(RuleError::NoValidTarget)?;
    if !state.player(seat).hand.contains(&card_id) {
        return Err(RuleError::CardNotInHand);
    }
    let def = hx_data::get_card(card_id.as_str()).ok_or(RuleError::UnknownCard)?;
    let blitz_card = def.as_blitz().ok_or(RuleError::UnknownCard)?;
    if !matches!(blitz_card.timing, BlitzTiming::Reaction) {
        return Err(RuleError::NoValidTarget);
    }
    let (cost, element) = def.cost();
    abilities::pay_cost(state, seat, cost, element)?;
    state.player_mut(seat).hand.retain(|c| c != &card_id);
    log(state, Some(seat), format!("reacted with {card_id}"));

    let mut events = vec![TargetedEvent::both(Event::BlitzPlayed {
        card_id: Some(card_id.clone()),
        played_by: seat,
        target_id: None,
    })];

    state.reaction_window = None;
    if matches!(blitz_card.behavior, AbilityId::ReactionWard) {
        log(
            state,
            None,
            format!("{} negated by {card_id}", window.pending.card_id),
        );
    } else {
        let behavior = pending_behavior(&window.pending.card_id);
        abilities::apply_blitz_effect(state, window.pending.played_by, behavior, window.pending.target.as_ref())?;
    }

    events.extend(state_update_events(state));
    if let Some(result) = siege::check_win(state) {
        events.push(game_over_event(result));
    }
    Ok(events)
}

fn apply_pass_reaction(state: &mut MatchState, _seat: Seat) -> Result<Vec<TargetedEvent>, RuleError> {
    let window = state.reaction_window.take().ok_or(RuleError::NoValidTarget)?;
    log(state, Some(window.reacting_seat), "passed reaction");

    let behavior = pending_behavior(&window.pending.card_id);
    abilities::apply_blitz_effect(state, window.pending.played_by, behavior, window.pending.target.as_ref())?;

    let mut events = state_update_events(state);
    if let Some(result) = siege::check_win(state) {
        events.push(game_over_event(result));
    }
    Ok(events)
}

fn pending_behavior(card_id: &CardId) -> AbilityId {
    hx_data::get_card(card_id.as_str())
        .and_then(|c| c.as_blitz())
        .map(|c| c.behavior)
        .unwrap_or(AbilityId::None)
}

fn apply_end_turn(state: &mut MatchState, seat: Seat) -> Result<Vec<TargetedEvent>, RuleError> {
    state.phase = Phase::End;
    log(state, Some(seat), "ended turn");
    Ok(vec![phase_change_event(state)])
}

fn apply_concede(state: &mut MatchState, seat: Seat) -> Result<Vec<TargetedEvent>, RuleError> {
    let winner = seat.opponent();
    state.result = Some(hx_types::state::GameResult {
        winner,
        reason: WinReason::Concede,
    });
    log(state, Some(seat), "conceded");
    Ok(vec![game_over_event(hx_types::state::GameResult {
        winner,
        reason: WinReason::Concede,
    })])
}

fn phase_change_event(state: &MatchState) -> TargetedEvent {
    TargetedEvent::both(Event::PhaseChange {
        phase: state.phase,
        active_seat: state.active_seat,
        round_number: state.round_number,
    })
}

fn game_over_event(result: hx_types::state::GameResult) -> TargetedEvent {
    TargetedEvent::both(Event::GameOver {
        winner: result.winner,
        reason: result.reason,
    })
}

/// Run the engine-immediate phase transitions to a fixed point: `Standby`
/// always cascades into `Draw`, and `End` always cascades into the other
/// seat's `Standby`. Both are driven here rather
/// than by a client command.
fn advance_phase_machine(state: &mut MatchState) -> Vec<TargetedEvent> {
    let mut events = Vec::new();
    let mut advanced = false;

    loop {
        match state.phase {
            Phase::Standby => {
                advanced = true;
                let acting = state.active_seat;
                essence::recalculate(state, acting);
                for unit in state.units.values_mut() {
                    if unit.owner == acting {
                        unit.flags.remove(
                            UnitFlags::HAS_MOVED | UnitFlags::HAS_ATTACKED | UnitFlags::DEVELOPMENT_REST,
                        );
                        unit.bonuses = TurnBonuses::default();
                    }
                }
                state.phase = Phase::Draw;

                let pool = state.player(acting).essence;
                events.push(TargetedEvent::both(Event::EssenceUpdate {
                    seat: acting,
                    neutral: pool.neutral,
                    fire: pool.fire,
                    water: pool.water,
                }));
                events.push(phase_change_event(state));
            }
            Phase::End => {
                advanced = true;
                let next_seat = state.active_seat.opponent();
                if next_seat == Seat::P1 {
                    state.round_number += 1;
                }
                state.active_seat = next_seat;
                state.phase = Phase::Standby;
            }
            _ => break,
        }
    }

    if advanced {
        events.extend(state_update_events(state));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_types::hex::HexCoord;
    use hx_types::state::TileState;

    fn setup_match() -> MatchState {
        MatchState::new("Alice".into(), "Bob".into(), 1, 1)
    }

    fn place_ring(state: &mut MatchState, center: HexCoord) {
        state.tiles.insert(center.tile_id(), TileState::new(center, TerrainType::Neutral));
        for n in center.adjacent() {
            state.tiles.insert(n.tile_id(), TileState::new(n, TerrainType::Neutral));
        }
    }

    #[test]
    fn place_tile_in_wrong_phase_is_silently_dropped() {
        let mut state = setup_match();
        state.phase = Phase::Main;
        let events = dispatch(
            &mut state,
            Seat::P1,
            Command::PlaceTile {
                tile_id: TileId::from("r0c0"),
                tile_type: TerrainType::Neutral,
            },
        );
        assert!(events.is_empty());
        assert!(state.tiles.is_empty());
    }

    #[test]
    fn place_tile_then_end_placement_both_seats_advances_to_setup_empire() {
        let mut state = setup_match();
        let events = dispatch(
            &mut state,
            Seat::P1,
            Command::PlaceTile {
                tile_id: TileId::from("r0c0"),
                tile_type: TerrainType::Fire,
            },
        );
        assert!(!events.is_empty());
        assert_eq!(state.player(Seat::P1).tiles_remaining, 0);

        dispatch(&mut state, Seat::P1, Command::EndTilePlacement);
        assert_eq!(state.phase, Phase::SetupTiles);
        assert_eq!(state.active_seat, Seat::P2);

        dispatch(&mut state, Seat::P2, Command::EndTilePlacement);
        assert_eq!(state.phase, Phase::SetupEmpire);
    }

    #[test]
    fn placing_both_empires_cascades_through_standby_into_draw() {
        let mut state = setup_match();
        state.phase = Phase::SetupEmpire;
        let empire_a = HexCoord::new(0, 0);
        let empire_b = HexCoord::new(5, 5);
        place_ring(&mut state, empire_a);
        place_ring(&mut state, empire_b);

        dispatch(&mut state, Seat::P1, Command::PlaceEmpire { tile_id: empire_a.tile_id() });
        assert_eq!(state.phase, Phase::SetupEmpire);

        dispatch(&mut state, Seat::P2, Command::PlaceEmpire { tile_id: empire_b.tile_id() });
        assert_eq!(state.phase, Phase::Draw);
        assert_eq!(state.active_seat, Seat::P1);
    }

    #[test]
    fn draw_card_moves_to_main_and_reveals_only_to_the_drawer() {
        let mut state = setup_match();
        state.phase = Phase::Draw;
        state.player_mut(Seat::P1).unit_deck.push(CardId::from("scout"));

        let events = dispatch(&mut state, Seat::P1, Command::DrawCard { deck: DeckKind::Unit });
        assert_eq!(state.phase, Phase::Main);
        assert_eq!(state.player(Seat::P1).hand, vec![CardId::from("scout")]);

        let mut saw_hidden = false;
        let mut saw_visible = false;
        for e in &events {
            if let Event::DrawResult { card_id, .. } = &e.event {
                if card_id.is_none() {
                    saw_hidden = true;
                } else {
                    saw_visible = true;
                }
            }
        }
        assert!(saw_hidden && saw_visible);
    }

    #[test]
    fn draw_card_from_empty_deck_is_a_rule_error() {
        let mut state = setup_match();
        state.phase = Phase::Draw;
        let events = dispatch(&mut state, Seat::P1, Command::DrawCard { deck: DeckKind::Unit });
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0].event, Event::Error { code, .. } if code == "deck_empty"));
    }

    #[test]
    fn end_turn_cascades_to_the_other_seats_draw_and_bumps_round_on_p2_start() {
        let mut state = setup_match();
        state.phase = Phase::Main;
        state.active_seat = Seat::P1;

        dispatch(&mut state, Seat::P1, Command::EndTurn);
        assert_eq!(state.phase, Phase::Draw);
        assert_eq!(state.active_seat, Seat::P2);
        assert_eq!(state.round_number, 1);

        state.phase = Phase::Main;
        dispatch(&mut state, Seat::P2, Command::EndTurn);
        assert_eq!(state.phase, Phase::Draw);
        assert_eq!(state.active_seat, Seat::P1);
        assert_eq!(state.round_number, 2);
    }

    #[test]
    fn concede_ends_the_match_with_opponent_as_winner() {
        let mut state = setup_match();
        let events = dispatch(&mut state, Seat::P1, Command::Concede);
        assert!(state.is_over());
        assert_eq!(state.result.unwrap().winner, Seat::P2);
        assert!(matches!(
            &events[0].event,
            Event::GameOver { winner: Seat::P2, reason: WinReason::Concede }
        ));
    }

    #[test]
    fn dispatch_after_game_over_is_a_no_op() {
        let mut state = setup_match();
        dispatch(&mut state, Seat::P1, Command::Concede);
        let events = dispatch(&mut state, Seat::P2, Command::EndTurn);
        assert!(events.is_empty());
    }

    #[test]
    fn slow_blitz_opens_a_reaction_window_for_the_opponent() {
        let mut state = setup_match();
        state.phase = Phase::Main;
        state.active_seat = Seat::P1;
        state.player_mut(Seat::P1).hand.push(CardId::from("rallying_cry"));
        state.player_mut(Seat::P1).essence.neutral = 5;

        dispatch(
            &mut state,
            Seat::P1,
            Command::PlayBlitz {
                card_id: CardId::from("rallying_cry"),
                target_id: None,
            },
        );
        let window = state.reaction_window.clone().expect("window opens");
        assert_eq!(window.reacting_seat, Seat::P2);

        // Only the reacting seat's react/pass commands are accepted while open.
        let dropped = dispatch(&mut state, Seat::P1, Command::EndTurn);
        assert!(dropped.is_empty());
        assert!(state.reaction_window.is_some());

        dispatch(&mut state, Seat::P2, Command::PassReaction);
        assert!(state.reaction_window.is_none());
    }

    #[test]
    fn move_then_capture_then_siege_follow_scenario_s6_ordering() {
        let mut state = setup_match();
        state.phase = Phase::Main;
        state.active_seat = Seat::P1;
        let structure_coord = HexCoord::new(0, 0);
        let approach = structure_coord.adjacent()[0];
        let mover_start = approach.adjacent()[0];
        state
            .tiles
            .insert(structure_coord.tile_id(), TileState::new(structure_coord, TerrainType::Neutral));
        state
            .tiles
            .insert(approach.tile_id(), TileState::new(approach, TerrainType::Neutral));
        state
            .tiles
            .insert(mover_start.tile_id(), TileState::new(mover_start, TerrainType::Neutral));
        state.tiles.get_mut(&approach.tile_id()).unwrap().revealed = false;

        let mover_id = state.mint_unit_id();
        state.units.insert(
            mover_id.clone(),
            UnitInstance {
                id: mover_id.clone(),
                card_id: CardId::from("swordsman"),
                owner: Seat::P1,
                tile: mover_start,
                hp: 5,
                flags: UnitFlags::empty(),
                bonuses: TurnBonuses::default(),
            },
        );
        state.tile_mut(mover_start).unwrap().units.push(mover_id.clone());

        let events = dispatch(
            &mut state,
            Seat::P1,
            Command::MoveUnit {
                unit_id: mover_id,
                target_tile_id: approach.tile_id(),
            },
        );

        let kinds: Vec<&'static str> = events
            .iter()
            .map(|e| match &e.event {
                Event::FogReveal { .. } => "fog_reveal",
                Event::StateUpdate { .. } => "state_update",
                Event::CaptureUpdate { .. } => "capture_update",
                Event::SiegeUpdate { .. } => "siege_update",
                Event::GameOver { .. } => "game_over",
                _ => "other",
            })
            .collect();
        let fog_pos = kinds.iter().position(|k| *k == "fog_reveal");
        let state_pos = kinds.iter().position(|k| *k == "state_update");
        assert!(fog_pos.unwrap() < state_pos.unwrap());
    }
}
