//! Branded/newtype ID types for type safety.
//!
//! Each ID wraps a `Box<str>` for cheap cloning and a small struct size.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Box<str>);

        impl $name {
            pub fn new(s: impl Into<Box<str>>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into_boxed_str())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Tile identifier, canonically `"r{row}c{col}"`.
    TileId
);

define_id!(
    /// Card catalog identifier (unit, blitz, or structure definition).
    CardId
);

define_id!(
    /// Live unit instance identifier, minted by the match.
    UnitInstanceId
);

define_id!(
    /// Live structure instance identifier, minted by the match.
    StructureInstanceId
);

define_id!(
    /// Live builder instance identifier, minted by the match.
    BuilderInstanceId
);

/// A seat identifier: always `p1` or `p2`. Kept as a small copyable enum
/// rather than a string id since the game is strictly two human seats
///.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    P1,
    P2,
}

impl Seat {
    pub fn opponent(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "p1",
            Self::P2 => "p2",
        }
    }

    /// The `"empire:{seat}"` target token used to address a seat's empire.
    pub fn empire_token(self) -> String {
        format!("empire:{}", self.as_str())
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A combat/blitz target: a unit, a structure, or an empire marker.
///
/// Empire targets use the wire token `"empire:{seat}"`; unit and
/// structure targets use their opaque instance id. This type lets the
/// dispatcher accept either shape in one field without a separate
/// discriminator, matching the wire format exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetToken(Box<str>);

/// The parsed form of a `TargetToken`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatTarget {
    Unit(UnitInstanceId),
    Structure(StructureInstanceId),
    Empire(Seat),
}

impl TargetToken {
    pub fn unit(id: &UnitInstanceId) -> Self {
        Self(id.as_str().into())
    }

    pub fn structure(id: &StructureInstanceId) -> Self {
        Self(id.as_str().into())
    }

    pub fn empire(seat: Seat) -> Self {
        Self(seat.empire_token().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve this token against the live instance maps to find out which
    /// kind of target it names. Returns `None` if it names neither a live
    /// unit/structure instance nor a valid empire token.
    pub fn resolve(
        &self,
        is_unit: impl Fn(&str) -> bool,
        is_structure: impl Fn(&str) -> bool,
    ) -> Option<CombatTarget> {
        if let Some(rest) = self.0.strip_prefix("empire:") {
            return match rest {
                "p1" => Some(CombatTarget::Empire(Seat::P1)),
                "p2" => Some(CombatTarget::Empire(Seat::P2)),
                _ => None,
            };
        }
        if is_unit(&self.0) {
            return Some(CombatTarget::Unit(UnitInstanceId::from(&*self.0)));
        }
        if is_structure(&self.0) {
            return Some(CombatTarget::Structure(StructureInstanceId::from(&*self.0)));
        }
        None
    }
}

impl From<&str> for TargetToken {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for TargetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
