//! Core types for the match engine — zero game logic, just data definitions.
//!
//! This crate defines every type shared across the engine and server: ids,
//! enums, the hex geometry, the authoritative `MatchState`, the client →
//! server command envelope, and the server → client event envelope.

pub mod client_state;
pub mod command;
pub mod enums;
pub mod event;
pub mod hex;
pub mod ids;
pub mod rng;
pub mod state;

pub use enums::*;
pub use hex::HexCoord;
pub use ids::*;
pub use rng::MatchRng;
