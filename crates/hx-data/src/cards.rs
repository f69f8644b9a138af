//! Static card definitions.
//!
//! Each card is a `&'static CardDefinition` reachable through `get_card`.
//! The catalog here is a representative roster, not an exhaustive card
//! list: it exercises every ability id the rules engine implements (melee,
//! ranged, terraform, all three blitz timings, a capturable structure, an
//! elemental-placement structure) rather than enumerating every card a full
//! game would ship.

use hx_types::{BlitzTiming, Element, UnitSize};

/// A fixed ability/effect id the rules engine knows how to execute. Unit
/// card text beyond stats is free-form in the source and only
/// informational; only these ids carry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityId {
    /// No special behavior beyond the card's stats.
    None,
    /// Grants access to the `use_terraform` command on this unit.
    Terraform,
    /// Instant blitz: direct damage to the target.
    InstantBolt,
    /// Slow blitz: buffs the caster's active unit's melee for the turn.
    SlowRally,
    /// Reaction blitz: negates the pending blitz it responds to.
    ReactionWard,
    /// Structure effect: grants a defense bonus to owned units on its tile.
    StructureGarrison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitCard {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
    pub cost_element: Element,
    pub hp: i32,
    pub defense: i32,
    pub melee_attack: i32,
    pub ranged_attack: i32,
    pub ranged_range: u32,
    pub size: UnitSize,
    pub speed: u32,
    pub element: Element,
    pub ability: AbilityId,
    pub ability_text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitzCard {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
    pub cost_element: Element,
    pub timing: BlitzTiming,
    pub behavior: AbilityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureCard {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
    pub cost_element: Element,
    pub hp: i32,
    pub capture_threshold: u32,
    pub effect: AbilityId,
    /// Restricts placement to tiles of this element; `None` means any tile.
    pub placement_element: Option<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardDefinition {
    Unit(UnitCard),
    Blitz(BlitzCard),
    Structure(StructureCard),
}

impl CardDefinition {
    pub fn id(&self) -> &'static str {
        match self {
            CardDefinition::Unit(c) => c.id,
            CardDefinition::Blitz(c) => c.id,
            CardDefinition::Structure(c) => c.id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CardDefinition::Unit(c) => c.name,
            CardDefinition::Blitz(c) => c.name,
            CardDefinition::Structure(c) => c.name,
        }
    }

    pub fn cost(&self) -> (u32, Element) {
        match self {
            CardDefinition::Unit(c) => (c.cost, c.cost_element),
            CardDefinition::Blitz(c) => (c.cost, c.cost_element),
            CardDefinition::Structure(c) => (c.cost, c.cost_element),
        }
    }

    pub fn as_unit(&self) -> Option<&UnitCard> {
        match self {
            CardDefinition::Unit(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_blitz(&self) -> Option<&BlitzCard> {
        match self {
            CardDefinition::Blitz(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&StructureCard> {
        match self {
            CardDefinition::Structure(c) => Some(c),
            _ => None,
        }
    }
}

const fn unit(
    id: &'static str,
    name: &'static str,
    cost: u32,
    cost_element: Element,
    hp: i32,
    defense: i32,
    melee_attack: i32,
    ranged_attack: i32,
    ranged_range: u32,
    size: UnitSize,
    speed: u32,
    element: Element,
    ability: AbilityId,
    ability_text: &'static str,
) -> UnitCard {
    UnitCard {
        id,
        name,
        cost,
        cost_element,
        hp,
        defense,
        melee_attack,
        ranged_attack,
        ranged_range,
        size,
        speed,
        element,
        ability,
        ability_text,
    }
}

const fn blitz(
    id: &'static str,
    name: &'static str,
    cost: u32,
    cost_element: Element,
    timing: BlitzTiming,
    behavior: AbilityId,
) -> BlitzCard {
    BlitzCard {
        id,
        name,
        cost,
        cost_element,
        timing,
        behavior,
    }
}

const fn structure(
    id: &'static str,
    name: &'static str,
    cost: u32,
    cost_element: Element,
    hp: i32,
    capture_threshold: u32,
    effect: AbilityId,
    placement_element: Option<Element>,
) -> StructureCard {
    StructureCard {
        id,
        name,
        cost,
        cost_element,
        hp,
        capture_threshold,
        effect,
        placement_element,
    }
}

static SCOUT: UnitCard = unit(
    "scout",
    "Scout",
    1,
    Element::Neutral,
    2,
    2,
    1,
    0,
    0,
    UnitSize::Tiny,
    3,
    Element::Neutral,
    AbilityId::None,
    "A fast, fragile skirmisher that may share a tile with another unit.",
);

static SWORDSMAN: UnitCard = unit(
    "swordsman",
    "Swordsman",
    2,
    Element::Neutral,
    5,
    4,
    3,
    0,
    0,
    UnitSize::Normal,
    2,
    Element::Neutral,
    AbilityId::None,
    "A sturdy melee line unit.",
);

static ARCHER: UnitCard = unit(
    "archer",
    "Archer",
    2,
    Element::Neutral,
    4,
    3,
    1,
    2,
    3,
    UnitSize::Normal,
    2,
    Element::Neutral,
    AbilityId::None,
    "Strikes from three tiles away.",
);

static TERRAFORMER: UnitCard = unit(
    "terraformer",
    "Terraformer",
    3,
    Element::Water,
    4,
    3,
    1,
    0,
    0,
    UnitSize::Normal,
    2,
    Element::Water,
    AbilityId::Terraform,
    "May convert an elemental tile back to neutral.",
);

static FIRE_GOLEM: UnitCard = unit(
    "fire_golem",
    "Fire Golem",
    4,
    Element::Fire,
    8,
    5,
    4,
    0,
    0,
    UnitSize::Large,
    1,
    Element::Fire,
    AbilityId::None,
    "Slow, heavily armored.",
);

static SPARK_BOLT: BlitzCard = blitz(
    "spark_bolt",
    "Spark Bolt",
    2,
    Element::Fire,
    BlitzTiming::Instant,
    AbilityId::InstantBolt,
);

static RALLYING_CRY: BlitzCard = blitz(
    "rallying_cry",
    "Rallying Cry",
    1,
    Element::Neutral,
    BlitzTiming::Slow,
    AbilityId::SlowRally,
);

static WARDING_COUNTER: BlitzCard = blitz(
    "warding_counter",
    "Warding Counter",
    1,
    Element::Water,
    BlitzTiming::Reaction,
    AbilityId::ReactionWard,
);

static WATCHTOWER: StructureCard = structure(
    "watchtower",
    "Watchtower",
    3,
    Element::Neutral,
    8,
    2,
    AbilityId::StructureGarrison,
    None,
);

static SHRINE_OF_EMBERS: StructureCard = structure(
    "shrine_of_embers",
    "Shrine of Embers",
    3,
    Element::Fire,
    6,
    2,
    AbilityId::None,
    Some(Element::Fire),
);

static ALL_UNITS: &[&UnitCard] = &[&SCOUT, &SWORDSMAN, &ARCHER, &TERRAFORMER, &FIRE_GOLEM];
static ALL_BLITZ: &[&BlitzCard] = &[&SPARK_BOLT, &RALLYING_CRY, &WARDING_COUNTER];
static ALL_STRUCTURES: &[&StructureCard] = &[&WATCHTOWER, &SHRINE_OF_EMBERS];

/// Every card definition in the catalog, as owned discriminated-union
/// values built from the `&'static` per-kind statics above.
pub static ALL_CARDS: &[CardDefinition] = &[
    CardDefinition::Unit(SCOUT),
    CardDefinition::Unit(SWORDSMAN),
    CardDefinition::Unit(ARCHER),
    CardDefinition::Unit(TERRAFORMER),
    CardDefinition::Unit(FIRE_GOLEM),
    CardDefinition::Blitz(SPARK_BOLT),
    CardDefinition::Blitz(RALLYING_CRY),
    CardDefinition::Blitz(WARDING_COUNTER),
    CardDefinition::Structure(WATCHTOWER),
    CardDefinition::Structure(SHRINE_OF_EMBERS),
];

/// Look up a card by id. Catalogs this size don't warrant a hash map.
pub fn get_card(id: &str) -> Option<&'static CardDefinition> {
    ALL_CARDS.iter().find(|c| c.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_card_id_is_unique() {
        let mut ids: Vec<_> = ALL_CARDS.iter().map(|c| c.id()).collect();
        ids.sort_unstable();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
    }

    #[test]
    fn get_card_finds_known_ids() {
        assert!(get_card("scout").is_some());
        assert!(get_card("spark_bolt").is_some());
        assert!(get_card("watchtower").is_some());
        assert!(get_card("does_not_exist").is_none());
    }

    #[test]
    fn scout_is_tiny() {
        let card = get_card("scout").unwrap();
        assert_eq!(card.as_unit().unwrap().size, UnitSize::Tiny);
    }

    #[test]
    fn ranged_zero_units_have_no_ranged_range() {
        let swordsman = get_card("swordsman").unwrap().as_unit().unwrap();
        assert_eq!(swordsman.ranged_range, 0);
        assert_eq!(swordsman.ranged_attack, 0);
    }

    #[test]
    fn shrine_requires_fire_tile() {
        let shrine = get_card("shrine_of_embers").unwrap().as_structure().unwrap();
        assert_eq!(shrine.placement_element, Some(Element::Fire));
    }

    #[test]
    fn all_costs_are_non_negative() {
        for card in ALL_CARDS {
            let (cost, _) = card.cost();
            assert!(cost < u32::MAX);
        }
    }
}
