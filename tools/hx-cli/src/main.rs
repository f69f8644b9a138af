use std::env;
use std::io::{self, IsTerminal};

use dialoguer::{theme::ColorfulTheme, Input, Select};

use hx_data::{get_card, CardDefinition};
use hx_engine::dispatch;
use hx_types::command::Command;
use hx_types::enums::{DeckKind, TerrainType};
use hx_types::event::Event;
use hx_types::ids::{CardId, TargetToken, TileId, UnitInstanceId};
use hx_types::state::MatchState;
use hx_types::{Phase, Seat};

fn parse_args() -> u32 {
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--seed" || args[i] == "-s" {
            i += 1;
            if let Some(v) = args.get(i) {
                if let Ok(seed) = v.parse() {
                    return seed;
                }
            }
        }
        i += 1;
    }
    42
}

fn main() {
    println!("\n  =========================");
    println!("     H E X   E M P I R E S");
    println!("  =========================\n");

    let is_tty = io::stdout().is_terminal();

    let seed = if is_tty {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Match seed (blank for 42)")
            .allow_empty(true)
            .interact_text()
            .unwrap_or_default();
        input.trim().parse().unwrap_or(42)
    } else {
        parse_args()
    };

    let mut state = hx_engine::new_match("p1".into(), "p2".into(), seed);
    println!("\n  Seed {}\n", seed);

    loop {
        if let Some(result) = state.result {
            println!("\n  === GAME OVER ===");
            println!("  Winner: {} ({:?})", result.winner, result.reason);
            break;
        }

        let acting = state
            .reaction_window
            .as_ref()
            .map(|w| w.reacting_seat)
            .unwrap_or(state.active_seat);

        display_state(&state, acting);

        let commands = available_commands(&state, acting);
        if commands.is_empty() {
            println!("  No commands available; ending turn.");
            break;
        }

        let labels: Vec<&str> = commands.iter().map(|(label, _)| *label).collect();
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} to act", acting))
            .items(&labels)
            .default(0)
            .interact_opt()
            .unwrap_or(None);

        let Some(idx) = choice else {
            println!("\n  Goodbye!");
            break;
        };

        let Some(command) = build_command(commands[idx].1, acting) else {
            continue;
        };

        let events = dispatch(&mut state, acting, command);
        for event in &events {
            print_event(event);
        }
    }
}

/// A command kind paired with the label shown in the menu. Field values are
/// gathered interactively once a kind is chosen (`build_command`), rather
/// than listing every legal parameterization up front — there is no
/// enumerator for those in the engine, only validation at dispatch time.
#[derive(Clone, Copy)]
enum CommandKind {
    PlaceTile,
    EndTilePlacement,
    PlaceEmpire,
    DrawCard,
    MoveUnit,
    MeleeAttack,
    RangedAttack,
    PlayUnit,
    PlayBlitz,
    PlayStructure,
    PlaceBuilder,
    UseTerraform,
    ReactBlitz,
    PassReaction,
    EndTurn,
    Concede,
}

fn available_commands(state: &MatchState, seat: Seat) -> Vec<(&'static str, CommandKind)> {
    use CommandKind::*;

    if state.reaction_window.is_some() {
        return vec![
            ("React with a blitz card", ReactBlitz),
            ("Pass the reaction window", PassReaction),
        ];
    }

    let mut out = match state.phase {
        Phase::SetupTiles => vec![
            ("Place a tile", PlaceTile),
            ("End tile placement", EndTilePlacement),
        ],
        Phase::SetupEmpire => vec![("Place empire", PlaceEmpire)],
        Phase::Draw => vec![("Draw a card", DrawCard)],
        Phase::Main => vec![
            ("Move a unit", MoveUnit),
            ("Melee attack", MeleeAttack),
            ("Ranged attack", RangedAttack),
            ("Play a unit card", PlayUnit),
            ("Play a blitz card", PlayBlitz),
            ("Play a structure card", PlayStructure),
            ("Place a builder", PlaceBuilder),
            ("Use terraform", UseTerraform),
            ("End turn", EndTurn),
        ],
        Phase::Standby | Phase::End => Vec::new(),
    };
    if state.active_seat == seat {
        out.push(("Concede", Concede));
    }
    out
}

fn build_command(kind: CommandKind, seat: Seat) -> Option<Command> {
    match kind {
        CommandKind::PlaceTile => {
            let tile_id = prompt_tile_id("Tile id (e.g. r0c1)")?;
            let tile_type = prompt_terrain()?;
            Some(Command::PlaceTile { tile_id, tile_type })
        }
        CommandKind::EndTilePlacement => Some(Command::EndTilePlacement),
        CommandKind::PlaceEmpire => {
            let tile_id = prompt_tile_id("Empire tile id")?;
            Some(Command::PlaceEmpire { tile_id })
        }
        CommandKind::DrawCard => {
            let deck = prompt_deck()?;
            Some(Command::DrawCard { deck })
        }
        CommandKind::MoveUnit => {
            let unit_id = prompt_unit_id("Unit id to move")?;
            let target_tile_id = prompt_tile_id("Destination tile id")?;
            Some(Command::MoveUnit { unit_id, target_tile_id })
        }
        CommandKind::MeleeAttack => {
            let attacker_unit_id = prompt_unit_id("Attacking unit id")?;
            let target_id = prompt_target("Target (unit/structure id, or empire:p1/empire:p2)")?;
            Some(Command::MeleeAttack { attacker_unit_id, target_id })
        }
        CommandKind::RangedAttack => {
            let attacker_unit_id = prompt_unit_id("Attacking unit id")?;
            let target_id = prompt_target("Target (unit/structure id, or empire:p1/empire:p2)")?;
            Some(Command::RangedAttack { attacker_unit_id, target_id })
        }
        CommandKind::PlayUnit => {
            let card_id = prompt_card_id(seat)?;
            let spawn_tile_id = prompt_tile_id("Spawn tile id")?;
            Some(Command::PlayUnit { card_id, spawn_tile_id })
        }
        CommandKind::PlayBlitz => {
            let card_id = prompt_card_id(seat)?;
            let target_id = prompt_target("Target (blank for none)");
            Some(Command::PlayBlitz { card_id, target_id })
        }
        CommandKind::PlayStructure => {
            let card_id = prompt_card_id(seat)?;
            let tile_id = prompt_tile_id("Structure tile id")?;
            Some(Command::PlayStructure { card_id, tile_id })
        }
        CommandKind::PlaceBuilder => {
            let tile_id = prompt_tile_id("Builder tile id")?;
            Some(Command::PlaceBuilder { tile_id })
        }
        CommandKind::UseTerraform => {
            let unit_id = prompt_unit_id("Terraformer unit id")?;
            Some(Command::UseTerraform { unit_id })
        }
        CommandKind::ReactBlitz => {
            let card_id = prompt_card_id(seat)?;
            Some(Command::ReactBlitz { card_id })
        }
        CommandKind::PassReaction => Some(Command::PassReaction),
        CommandKind::EndTurn => Some(Command::EndTurn),
        CommandKind::Concede => Some(Command::Concede),
    }
}

fn prompt(label: &str) -> Option<String> {
    let text: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .interact_text()
        .ok()?;
    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn prompt_tile_id(label: &str) -> Option<TileId> {
    prompt(label).map(TileId::from)
}

fn prompt_unit_id(label: &str) -> Option<UnitInstanceId> {
    prompt(label).map(UnitInstanceId::from)
}

fn prompt_card_id(seat: Seat) -> Option<CardId> {
    println!("  ({seat}'s turn — enter a card id from the hand shown above)");
    prompt("Card id").map(CardId::from)
}

fn prompt_target(label: &str) -> Option<TargetToken> {
    prompt(label).map(|s| TargetToken::from(s.as_str()))
}

fn prompt_terrain() -> Option<TerrainType> {
    let items = ["neutral", "fire", "water"];
    let idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Terrain type")
        .items(&items)
        .default(0)
        .interact_opt()
        .ok()??;
    Some(match idx {
        1 => TerrainType::Fire,
        2 => TerrainType::Water,
        _ => TerrainType::Neutral,
    })
}

fn prompt_deck() -> Option<DeckKind> {
    let items = ["unit", "blitz"];
    let idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Deck")
        .items(&items)
        .default(0)
        .interact_opt()
        .ok()??;
    Some(if idx == 1 { DeckKind::Blitz } else { DeckKind::Unit })
}

fn display_state(state: &MatchState, seat: Seat) {
    println!("  ─────────────────────────────────────────");
    println!(
        "  Round {} | Phase {:?} | Active {}",
        state.round_number, state.phase, state.active_seat
    );

    for s in [Seat::P1, Seat::P2] {
        let player = state.player(s);
        println!(
            "  {} — essence N:{} F:{} W:{} | empire hp:{}",
            s,
            player.essence.neutral,
            player.essence.fire,
            player.essence.water,
            player.empire.hp
        );
    }

    let hand = &state.player(seat).hand;
    println!("  ── {}'s hand ({}) ──", seat, hand.len());
    for card_id in hand {
        let label = get_card(card_id.as_str())
            .map(card_display_name)
            .unwrap_or("?");
        println!("    {} ({})", label, card_id);
    }

    if !state.units.is_empty() {
        println!("  ── Units ──");
        for unit in state.units.values() {
            let name = get_card(unit.card_id.as_str())
                .map(card_display_name)
                .unwrap_or("?");
            println!(
                "    {} [{}] owner:{} hp:{} @ {}",
                unit.id, name, unit.owner, unit.hp, unit.tile.tile_id()
            );
        }
    }

    if !state.structures.is_empty() {
        println!("  ── Structures ──");
        for structure in state.structures.values() {
            println!(
                "    {} owner:{} hp:{} @ {} (capture {}/{})",
                structure.id,
                structure.owner,
                structure.hp,
                structure.tile.tile_id(),
                structure.capture_progress,
                structure.capture_threshold
            );
        }
    }
    println!();
}

fn card_display_name(card: &CardDefinition) -> &'static str {
    card.name()
}

fn print_event(event: &Event) {
    match event {
        Event::Error { code, message } => println!("  ! [{}] {}", code, message),
        Event::CombatResult {
            attacker_id,
            target_id,
            roll,
            defense,
            hit,
            damage,
            killed,
        } => println!(
            "  {} -> {} roll:{} def:{} hit:{} dmg:{} killed:{}",
            attacker_id, target_id, roll, defense, hit, damage, killed
        ),
        Event::PhaseChange { phase, active_seat, round_number } => {
            println!("  phase -> {:?} ({} active, round {})", phase, active_seat, round_number)
        }
        Event::DrawResult { seat, deck, card_id } => match card_id {
            Some(id) => println!("  {} drew {:?}: {}", seat, deck, id),
            None => println!("  {} drew from an empty {:?} deck", seat, deck),
        },
        Event::GameOver { winner, reason } => println!("  game over: {} wins ({:?})", winner, reason),
        _ => {}
    }
}
