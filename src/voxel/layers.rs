//! Typed views of the two overloaded layer bytes.
//!
//! Layer 2 holds either a decoration id (`< 128`) or the bottom of a building
//! column (`128 + y`); layer 3 holds a building top, `y` for a wall block or
//! `128 + y` when the topmost block is a roof. Only `to_byte`/`from_byte`
//! know about the threshold.

use crate::error::{MapGenError, Result};

/// Values at or above this byte mark the second meaning of a layer.
pub const SENTINEL: u8 = 128;

/// Highest `y` a building bottom or top can encode.
pub const MAX_ENCODED_Y: u8 = SENTINEL - 1;

/// Layer 2: what sits on top of the ground block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occupant {
    #[default]
    Empty,
    /// Decoration id in `1..128`, placed at `height + 1` and above.
    Decoration(u8),
    /// Minimum y of a building column.
    BuildingBottom(u8),
}

impl Occupant {
    #[inline]
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => Occupant::Empty,
            b if b < SENTINEL => Occupant::Decoration(b),
            b => Occupant::BuildingBottom(b - SENTINEL),
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        match self {
            Occupant::Empty => 0,
            Occupant::Decoration(id) => id,
            Occupant::BuildingBottom(y) => SENTINEL + y,
        }
    }

    /// Building bottom at world height `y`, checked against the encodable range.
    pub fn building_bottom(y: i64) -> Result<Self> {
        Ok(Occupant::BuildingBottom(encodable_y("building bottom", y)?))
    }

    #[inline]
    pub fn is_building(self) -> bool {
        matches!(self, Occupant::BuildingBottom(_))
    }
}

/// Layer 3: top of the building column standing on this cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingTop {
    /// Topmost block at `y` is a wall block. `Wall(0)` means no building.
    Wall(u8),
    /// Topmost block at `y` is a roof block.
    Roof(u8),
}

impl Default for BuildingTop {
    fn default() -> Self {
        BuildingTop::NONE
    }
}

impl BuildingTop {
    pub const NONE: BuildingTop = BuildingTop::Wall(0);

    #[inline]
    pub fn from_byte(b: u8) -> Self {
        if b < SENTINEL {
            BuildingTop::Wall(b)
        } else {
            BuildingTop::Roof(b - SENTINEL)
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        match self {
            BuildingTop::Wall(y) => y,
            BuildingTop::Roof(y) => SENTINEL + y,
        }
    }

    pub fn wall(y: i64) -> Result<Self> {
        Ok(BuildingTop::Wall(encodable_y("building top", y)?))
    }

    pub fn roof(y: i64) -> Result<Self> {
        Ok(BuildingTop::Roof(encodable_y("roof top", y)?))
    }

    /// Merge of two tops as stored: any roof outranks any wall, then higher wins.
    #[inline]
    pub fn max(self, other: BuildingTop) -> BuildingTop {
        BuildingTop::from_byte(self.to_byte().max(other.to_byte()))
    }
}

/// Whether `y` fits a building bottom or top byte.
#[inline]
pub fn is_encodable_y(y: i64) -> bool {
    (0..=MAX_ENCODED_Y as i64).contains(&y)
}

fn encodable_y(what: &'static str, y: i64) -> Result<u8> {
    MapGenError::check_range(what, y as f64, 0.0, MAX_ENCODED_Y as f64)?;
    Ok(y as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupant_bytes() {
        assert_eq!(Occupant::from_byte(0), Occupant::Empty);
        assert_eq!(Occupant::from_byte(12), Occupant::Decoration(12));
        assert_eq!(Occupant::from_byte(127), Occupant::Decoration(127));
        assert_eq!(Occupant::from_byte(128), Occupant::BuildingBottom(0));
        assert_eq!(Occupant::from_byte(200), Occupant::BuildingBottom(72));
        for b in 0..=255u8 {
            assert_eq!(Occupant::from_byte(b).to_byte(), b);
        }
    }

    #[test]
    fn test_building_top_bytes() {
        assert_eq!(BuildingTop::from_byte(0), BuildingTop::NONE);
        assert_eq!(BuildingTop::from_byte(60), BuildingTop::Wall(60));
        assert_eq!(BuildingTop::from_byte(210), BuildingTop::Roof(82));
        for b in 0..=255u8 {
            assert_eq!(BuildingTop::from_byte(b).to_byte(), b);
        }
    }

    #[test]
    fn test_checked_constructors() {
        assert_eq!(Occupant::building_bottom(127).unwrap(), Occupant::BuildingBottom(127));
        assert!(Occupant::building_bottom(128).is_err());
        assert!(Occupant::building_bottom(-1).is_err());
        assert_eq!(BuildingTop::roof(5).unwrap().to_byte(), 133);
        assert!(BuildingTop::wall(300).is_err());
    }

    #[test]
    fn test_encodable_range() {
        assert!(is_encodable_y(0));
        assert!(is_encodable_y(127));
        assert!(!is_encodable_y(128));
        assert!(!is_encodable_y(-1));
    }

    #[test]
    fn test_top_merge_prefers_roof() {
        let wall = BuildingTop::Wall(90);
        let roof = BuildingTop::Roof(10);
        assert_eq!(wall.max(roof), roof);
        assert_eq!(BuildingTop::Wall(3).max(BuildingTop::Wall(7)), BuildingTop::Wall(7));
        assert_eq!(BuildingTop::NONE.max(wall), wall);
    }
}
