//! Rule-violation errors.
//!
//! Seat/phase mismatches and unreadable protocol frames are not represented
//! here — those are silently dropped and never reach the rules engine as a
//! typed error.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    UnknownUnit,
    UnknownStructure,
    UnknownTarget,
    UnknownCard,
    NotOwner,
    InsufficientEssence,
    InvalidMoveDestination,
    UnitHasAlreadyActed,
    UnitInDevelopmentRest,
    NoValidTarget,
    CardNotInHand,
    TileOccupied,
    TileNotElemental,
    TileAlreadyExists,
    SpawnOutOfRange,
    EmpireAlreadyPlaced,
    EmpireNotPlaced,
    TilePlacementAlreadyEnded,
    DeckEmpty,
    NoTilesRemaining,
    TileAlreadyNeutral,
}

impl RuleError {
    /// The private `error` event's `code` field.
    pub fn code(self) -> &'static str {
        match self {
            RuleError::UnknownUnit => "unknown_unit",
            RuleError::UnknownStructure => "unknown_structure",
            RuleError::UnknownTarget => "unknown_target",
            RuleError::UnknownCard => "unknown_card",
            RuleError::NotOwner => "not_owner",
            RuleError::InsufficientEssence => "insufficient_essence",
            RuleError::InvalidMoveDestination => "invalid_move_destination",
            RuleError::UnitHasAlreadyActed => "unit_has_already_acted",
            RuleError::UnitInDevelopmentRest => "unit_in_development_rest",
            RuleError::NoValidTarget => "no_valid_target",
            RuleError::CardNotInHand => "card_not_in_hand",
            RuleError::TileOccupied => "tile_occupied",
            RuleError::TileNotElemental => "tile_not_elemental",
            RuleError::TileAlreadyExists => "tile_already_exists",
            RuleError::SpawnOutOfRange => "spawn_out_of_range",
            RuleError::EmpireAlreadyPlaced => "empire_already_placed",
            RuleError::EmpireNotPlaced => "empire_not_placed",
            RuleError::TilePlacementAlreadyEnded => "tile_placement_already_ended",
            RuleError::DeckEmpty => "deck_empty",
            RuleError::NoTilesRemaining => "no_tiles_remaining",
            RuleError::TileAlreadyNeutral => "tile_already_neutral",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RuleError::UnknownUnit => "no such unit instance",
            RuleError::UnknownStructure => "no such structure instance",
            RuleError::UnknownTarget => "target does not resolve to a live unit, structure, or empire",
            RuleError::UnknownCard => "no such card in the catalog",
            RuleError::NotOwner => "seat does not own this instance",
            RuleError::InsufficientEssence => "essence pool cannot afford this cost",
            RuleError::InvalidMoveDestination => "destination is not a legal move target",
            RuleError::UnitHasAlreadyActed => "unit has already moved or attacked this turn",
            RuleError::UnitInDevelopmentRest => "unit is still resting after deployment",
            RuleError::NoValidTarget => "no valid target in range",
            RuleError::CardNotInHand => "card is not in the seat's hand",
            RuleError::TileOccupied => "tile is already occupied",
            RuleError::TileNotElemental => "a builder requires an elemental tile",
            RuleError::TileAlreadyExists => "a tile already exists at this id",
            RuleError::SpawnOutOfRange => "spawn tile is not adjacent to an owned empire or structure",
            RuleError::EmpireAlreadyPlaced => "this seat's empire is already placed",
            RuleError::EmpireNotPlaced => "this seat's empire has not been placed yet",
            RuleError::TilePlacementAlreadyEnded => "this seat already ended tile placement",
            RuleError::DeckEmpty => "deck is empty",
            RuleError::NoTilesRemaining => "no tile placements remaining for this seat",
            RuleError::TileAlreadyNeutral => "tile is already neutral",
        }
    }
}
