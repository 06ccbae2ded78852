//! Upcast lattice
//!
//! Built-in kinds are grouped into disjoint families. Each family is a chain
//! running from its most general representation (rank 0) to its most specific
//! one. Two kinds of the same family are compared at the more general of the
//! two; kinds of different families, and kinds outside every family, meet at
//! the root position and are ordered by type name.

use crate::Kind;

/// Family index of the root position
pub const ROOT_FAMILY: u8 = 0;

/// Family chains, most general member first
///
/// Index `i` in this table is family `i + 1`.
pub const CHAINS: [&[Kind]; 5] = [
    &[Kind::Complex, Kind::Float, Kind::Int, Kind::Bool],
    &[Kind::Sequence, Kind::Tuple],
    &[Kind::ByteArray, Kind::Bytes, Kind::Text],
    &[Kind::Set, Kind::FrozenSet],
    &[Kind::ComplexArray, Kind::FloatArray, Kind::IntArray],
];

/// Position of a kind in the lattice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub family: u8,
    pub rank: u8,
}

impl Position {
    /// Shared by `Null`, `Mapping`, opaque values and anything unfamilied
    pub const ROOT: Position = Position {
        family: ROOT_FAMILY,
        rank: 0,
    };

    #[inline]
    pub fn is_root(self) -> bool {
        self.family == ROOT_FAMILY
    }

    /// Least common ancestor of two positions
    pub fn common_ancestor(self, other: Position) -> Position {
        if self.family == other.family && !self.is_root() {
            Position {
                family: self.family,
                rank: self.rank.min(other.rank),
            }
        } else {
            Position::ROOT
        }
    }

    /// Kind that represents this position, `None` for the root
    pub fn kind(self) -> Option<Kind> {
        if self.is_root() {
            return None;
        }
        CHAINS
            .get(usize::from(self.family) - 1)
            .and_then(|chain| chain.get(usize::from(self.rank)))
            .copied()
    }
}

/// Locate a kind in the lattice
pub fn position(kind: Kind) -> Position {
    for (i, chain) in CHAINS.iter().enumerate() {
        if let Some(rank) = chain.iter().position(|&k| k == kind) {
            return Position {
                family: i as u8 + 1,
                rank: rank as u8,
            };
        }
    }
    Position::ROOT
}

/// Kind at which two kinds are compared, `None` when they only meet at the root
pub fn common_kind(a: Kind, b: Kind) -> Option<Kind> {
    if a == b {
        return Some(a);
    }
    position(a).common_ancestor(position(b)).kind()
}

/// Name a kind is ordered by when it meets another family at the root
///
/// Every member of a family answers with the name of the family's most
/// general kind, so a family occupies one contiguous run of the order.
pub fn family_name(kind: Kind) -> &'static str {
    let pos = position(kind);
    if pos.is_root() {
        return kind.name();
    }
    Position { rank: 0, ..pos }.kind().unwrap_or(kind).name()
}
