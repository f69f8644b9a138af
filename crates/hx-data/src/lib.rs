//! The card catalog: a static, process-wide registry of every card
//! definition the engine knows about.

pub mod cards;

pub use cards::{
    get_card, AbilityId, BlitzCard, CardDefinition, StructureCard, UnitCard, ALL_CARDS,
};
