//! Cell classification for the lattice grid
//!
//! Every lattice cell carries exactly one [`CellType`] tag. Device placement
//! mutates these tags during setup; the solver reads them every step to decide
//! which boundary treatment applies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag describing the role of a single lattice cell
///
/// Source cells (inlets and active devices) have their velocity pinned to a
/// device-assigned value during collision. Wall cells skip collision entirely
/// and only take part in bounce-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellType {
    /// Open air, evolved purely by the lattice
    #[default]
    Empty = 0,
    /// No-slip obstacle (room boundary or interior wall)
    Wall = 1,
    /// Fresh-air opening with a prescribed velocity
    Inlet = 2,
    /// Passive exhaust opening (extra concentration decay)
    Outlet = 3,
    /// Air conditioner discharge ray cell
    Ac = 4,
    /// Directional ventilator jet cell
    Ventilator = 5,
    /// Air purifier swirl cell
    Purifier = 6,
    /// Air sterilizer core cell
    Sterilizer = 7,
}

impl CellType {
    /// All cell types in discriminant order
    pub const ALL: [CellType; 8] = [
        CellType::Empty,
        CellType::Wall,
        CellType::Inlet,
        CellType::Outlet,
        CellType::Ac,
        CellType::Ventilator,
        CellType::Purifier,
        CellType::Sterilizer,
    ];

    /// Whether the collision step pins this cell's velocity (Dirichlet forcing)
    #[inline]
    #[must_use]
    pub const fn is_source(self) -> bool {
        matches!(
            self,
            CellType::Inlet
                | CellType::Ac
                | CellType::Ventilator
                | CellType::Purifier
                | CellType::Sterilizer
        )
    }

    /// Whether this cell is a solid wall
    #[inline]
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, CellType::Wall)
    }

    /// Whether this cell is open air with no device attached
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, CellType::Empty)
    }

    /// Compact numeric code used by the C ABI and visualization maps
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellType::Empty => "empty",
            CellType::Wall => "wall",
            CellType::Inlet => "inlet",
            CellType::Outlet => "outlet",
            CellType::Ac => "ac",
            CellType::Ventilator => "ventilator",
            CellType::Purifier => "purifier",
            CellType::Sterilizer => "sterilizer",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_classification() {
        let sources: Vec<CellType> = CellType::ALL
            .iter()
            .copied()
            .filter(|t| t.is_source())
            .collect();
        assert_eq!(
            sources,
            vec![
                CellType::Inlet,
                CellType::Ac,
                CellType::Ventilator,
                CellType::Purifier,
                CellType::Sterilizer
            ]
        );
        assert!(!CellType::Outlet.is_source());
        assert!(!CellType::Wall.is_source());
    }

    #[test]
    fn test_codes_are_stable() {
        for (i, t) in CellType::ALL.iter().enumerate() {
            assert_eq!(t.code() as usize, i);
        }
        assert_eq!(CellType::default(), CellType::Empty);
    }
}
