//! Rules engine, command dispatcher, and event fan-out for the match runtime
//!. `hx-types` defines the data; everything here is pure
//! functions over it plus the dispatcher, the single site that mutates a
//! live `MatchState`.

pub mod abilities;
pub mod capture;
pub mod combat;
pub mod dispatch;
pub mod error;
pub mod essence;
pub mod fanout;
pub mod fog;
pub mod movement;
pub mod setup;
pub mod siege;
pub mod spawn;
pub mod targets;

pub use dispatch::dispatch;
pub use error::RuleError;
pub use fanout::{client_view, state_update_events, EventTarget, TargetedEvent};
pub use setup::new_match;
