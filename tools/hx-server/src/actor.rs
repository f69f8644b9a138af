//! The per-match actor: the single task that owns a `MatchState` and is the
//! only thing that ever calls `hx_engine::dispatch` against it.
//!
//! One standalone tokio task per match, with a per-seat mailbox
//! (`mpsc::UnboundedSender<Event>` per seat rather than a shared broadcast
//! channel) since events are filtered per recipient and a shared broadcast
//! would leak hidden information.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use hx_engine::{dispatch, EventTarget, TargetedEvent};
use hx_types::command::Command;
use hx_types::event::Event;
use hx_types::state::{GameResult, MatchState};
use hx_types::{Phase, Seat, WinReason};

use crate::config::ServerConfig;

/// A message sent into a running match actor.
pub enum ActorMessage {
    /// A seat's WebSocket task registers its outbox. Sent on first join and
    /// again on every reconnect.
    Connect {
        seat: Seat,
        outbox: mpsc::UnboundedSender<Event>,
    },
    /// A seat's WebSocket task observed its connection drop.
    Disconnect { seat: Seat },
    /// A command arrived from a seat's connection.
    Command { seat: Seat, command: Command },
}

struct SeatLine {
    outbox: Option<mpsc::UnboundedSender<Event>>,
    ever_connected: bool,
}

impl SeatLine {
    fn new() -> Self {
        Self {
            outbox: None,
            ever_connected: false,
        }
    }
}

/// Run one match to completion. Returns when the game resolves, every seat
/// has permanently left, or the idle timeout elapses.
pub async fn run_match(
    mut state: MatchState,
    mut inbox: mpsc::UnboundedReceiver<ActorMessage>,
    config: ServerConfig,
) {
    let mut seats = [SeatLine::new(), SeatLine::new()];
    let mut reconnect_deadline: Option<(Seat, Instant)> = None;
    let mut idle_deadline = Instant::now() + config.idle_timeout;
    let mut turn_deadline = turn_deadline_for(&state, Instant::now(), config.per_turn_timeout);

    loop {
        if state.is_over() {
            break;
        }

        tokio::select! {
            msg = inbox.recv() => {
                match msg {
                    None => break,
                    Some(ActorMessage::Connect { seat, outbox }) => {
                        handle_connect(&mut state, &mut seats, &mut reconnect_deadline, seat, outbox);
                    }
                    Some(ActorMessage::Disconnect { seat }) => {
                        handle_disconnect(&mut seats, &mut reconnect_deadline, seat, config.reconnect_window);
                    }
                    Some(ActorMessage::Command { seat, command }) => {
                        idle_deadline = Instant::now() + config.idle_timeout;
                        let events = dispatch(&mut state, seat, command);
                        route(&seats, events);
                        turn_deadline = turn_deadline_for(&state, Instant::now(), config.per_turn_timeout);
                    }
                }
            }
            _ = sleep_until_or_pending(reconnect_deadline.map(|(_, d)| d)) => {
                let (absent, _) = reconnect_deadline.take().expect("select armed only when Some");
                forfeit(&mut state, &seats, absent);
            }
            _ = sleep_until_or_pending(turn_deadline) => {
                let acting = state.active_seat;
                let events = dispatch(&mut state, acting, Command::EndTurn);
                route(&seats, events);
                turn_deadline = turn_deadline_for(&state, Instant::now(), config.per_turn_timeout);
            }
            _ = tokio::time::sleep_until(idle_deadline) => {
                tracing::info!("match idle timeout");
                state.result = Some(GameResult { winner: state.active_seat, reason: WinReason::Timeout });
                route(&seats, vec![TargetedEvent::both(Event::GameOver {
                    winner: state.active_seat,
                    reason: WinReason::Timeout,
                })]);
            }
        }
    }
}

/// `tokio::select!` needs every branch to resolve to something; this turns
/// an absent deadline into a future that never completes so the branch is
/// effectively disabled.
async fn sleep_until_or_pending(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending().await,
    }
}

/// A per-turn auto `end_turn` only makes sense while a seat is actively in
/// `Main`; every other phase either resolves itself or is gated to a
/// specific client action with no useful timeout.
fn turn_deadline_for(state: &MatchState, now: Instant, timeout: Duration) -> Option<Instant> {
    matches!(state.phase, Phase::Main).then(|| now + timeout)
}

fn handle_connect(
    state: &mut MatchState,
    seats: &mut [SeatLine; 2],
    reconnect_deadline: &mut Option<(Seat, Instant)>,
    seat: Seat,
    outbox: mpsc::UnboundedSender<Event>,
) {
    let line = seat_line_mut(seats, seat);
    let is_reconnect = line.ever_connected;
    line.ever_connected = true;

    if matches!(reconnect_deadline, Some((s, _)) if *s == seat) {
        *reconnect_deadline = None;
        tracing::info!(?seat, "seat reconnected within the window");
    }

    let greeting = if is_reconnect {
        Event::StateUpdate {
            state: hx_engine::client_view(state, seat),
        }
    } else {
        Event::GameStart {
            seat,
            state: hx_engine::client_view(state, seat),
        }
    };
    let _ = outbox.send(greeting);
    line.outbox = Some(outbox);
}

fn handle_disconnect(
    seats: &mut [SeatLine; 2],
    reconnect_deadline: &mut Option<(Seat, Instant)>,
    seat: Seat,
    window: Duration,
) {
    seat_line_mut(seats, seat).outbox = None;
    *reconnect_deadline = Some((seat, Instant::now() + window));
    tracing::info!(?seat, "seat disconnected; reconnection window opened");

    send_to(seats, seat.opponent(), Event::PlayerLeft {
        seat,
        reconnect_deadline_secs: window.as_secs(),
    });
}

fn forfeit(state: &mut MatchState, seats: &[SeatLine; 2], absent: Seat) {
    let winner = absent.opponent();
    tracing::info!(?winner, reason = "forfeit", "reconnection window elapsed");
    state.result = Some(GameResult {
        winner,
        reason: WinReason::Forfeit,
    });
    route(
        seats,
        vec![TargetedEvent::both(Event::GameOver {
            winner,
            reason: WinReason::Forfeit,
        })],
    );
}

fn seat_line_mut(seats: &mut [SeatLine; 2], seat: Seat) -> &mut SeatLine {
    match seat {
        Seat::P1 => &mut seats[0],
        Seat::P2 => &mut seats[1],
    }
}

fn send_to(seats: &[SeatLine; 2], seat: Seat, event: Event) {
    let line = match seat {
        Seat::P1 => &seats[0],
        Seat::P2 => &seats[1],
    };
    if let Some(outbox) = &line.outbox {
        let _ = outbox.send(event);
    }
}

fn route(seats: &[SeatLine; 2], events: Vec<TargetedEvent>) {
    for targeted in events {
        match targeted.target {
            EventTarget::Seat(seat) => send_to(seats, seat, targeted.event),
            EventTarget::Both => {
                send_to(seats, Seat::P1, targeted.event.clone());
                send_to(seats, Seat::P2, targeted.event);
            }
        }
    }
}
