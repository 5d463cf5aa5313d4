// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sides, alignments, and the twelve placements they combine into.

use core::fmt;
use core::str::FromStr;

/// Side of the anchor the floating element sits on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above the anchor.
    Top,
    /// Below the anchor.
    #[default]
    Bottom,
    /// Left of the anchor.
    Left,
    /// Right of the anchor.
    Right,
}

/// Alignment along the side's cross axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Floating start edge lines up with the anchor's start edge.
    Start,
    /// Centers line up.
    #[default]
    Center,
    /// Floating end edge lines up with the anchor's end edge.
    End,
}

/// A screen axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Side {
    /// All sides.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// The mirrored side.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Axis along which the floating element moves away from the anchor.
    pub const fn main_axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Axis along which alignment and shifting apply.
    pub const fn cross_axis(self) -> Axis {
        match self.main_axis() {
            Axis::Vertical => Axis::Horizontal,
            Axis::Horizontal => Axis::Vertical,
        }
    }

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl Alignment {
    /// All alignments.
    pub const ALL: [Self; 3] = [Self::Start, Self::Center, Self::End];
}

/// Where a floating element sits relative to its anchor.
///
/// Always one of the twelve side × alignment combinations. Its string form is
/// `"<side>"` for centered placements and `"<side>-start"` / `"<side>-end"`
/// otherwise.
///
/// ```
/// use understory_floating::{Alignment, Placement, Side};
///
/// let p: Placement = "bottom-start".parse().unwrap();
/// assert_eq!(p, Placement::new(Side::Bottom, Alignment::Start));
/// assert_eq!(Placement::default().to_string(), "bottom");
/// assert_eq!(p.flipped().to_string(), "top-start");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Side of the anchor.
    pub side: Side,
    /// Cross-axis alignment.
    pub alignment: Alignment,
}

impl Placement {
    /// `top`.
    pub const TOP: Self = Self::new(Side::Top, Alignment::Center);
    /// `bottom`.
    pub const BOTTOM: Self = Self::new(Side::Bottom, Alignment::Center);
    /// `left`.
    pub const LEFT: Self = Self::new(Side::Left, Alignment::Center);
    /// `right`.
    pub const RIGHT: Self = Self::new(Side::Right, Alignment::Center);
    /// `bottom-start`, the usual placement for dropdown menus.
    pub const BOTTOM_START: Self = Self::new(Side::Bottom, Alignment::Start);

    /// Combine a side and an alignment.
    pub const fn new(side: Side, alignment: Alignment) -> Self {
        Self { side, alignment }
    }

    /// Same alignment on the opposite side.
    pub const fn flipped(self) -> Self {
        Self::new(self.side.opposite(), self.alignment)
    }

    /// Iterate all twelve placements.
    pub fn all() -> impl Iterator<Item = Self> {
        Side::ALL
            .into_iter()
            .flat_map(|side| Alignment::ALL.into_iter().map(move |a| Self::new(side, a)))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.side.as_str())?;
        match self.alignment {
            Alignment::Start => f.write_str("-start"),
            Alignment::Center => Ok(()),
            Alignment::End => f.write_str("-end"),
        }
    }
}

/// Error returned when a string is not one of the twelve placements.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParsePlacementError;

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a placement such as `bottom` or `top-start`")
    }
}

impl core::error::Error for ParsePlacementError {}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, alignment) = match s.split_once('-') {
            Some((side, "start")) => (side, Alignment::Start),
            Some((side, "end")) => (side, Alignment::End),
            Some(_) => return Err(ParsePlacementError),
            None => (s, Alignment::Center),
        };
        let side = match side {
            "top" => Side::Top,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            "right" => Side::Right,
            _ => return Err(ParsePlacementError),
        };
        Ok(Self::new(side, alignment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn all_twelve_round_trip_through_strings() {
        let mut count = 0;
        for p in Placement::all() {
            let parsed: Placement = p.to_string().parse().unwrap();
            assert_eq!(parsed, p);
            count += 1;
        }
        assert_eq!(count, 12);
    }

    #[test]
    fn rejects_unknown_strings() {
        assert!("middle".parse::<Placement>().is_err());
        assert!("bottom-center".parse::<Placement>().is_err());
        assert!("top-".parse::<Placement>().is_err());
        assert!("".parse::<Placement>().is_err());
    }

    #[test]
    fn axes_and_opposites() {
        assert_eq!(Side::Bottom.opposite(), Side::Top);
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Top.main_axis(), Axis::Vertical);
        assert_eq!(Side::Top.cross_axis(), Axis::Horizontal);
        assert_eq!(Side::Right.cross_axis(), Axis::Vertical);
        assert_eq!(Placement::BOTTOM_START.flipped().side, Side::Top);
    }
}
