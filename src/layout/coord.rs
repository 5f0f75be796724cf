//! The ten logical coordinates of a control
//!
//! Each axis carries five coordinate kinds. Near edges and far edges are
//! measured from the matching edge of the parent, so `x2 = 0` pins a control
//! flush against the parent's right edge.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// One of the two independent layout dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn size(self) -> Coord {
        Coord::new(self, CoordKind::Size)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// Geometric role of a coordinate on its axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordKind {
    /// Near edge from the parent's near edge (`x`, `y`)
    Near,
    /// Extent along the axis (`w`, `h`)
    Size,
    /// Far edge from the parent's far edge (`x2`, `y2`)
    Far,
    /// Far edge from the parent's near edge (`xw`, `yh`), i.e. near + size
    NearExtent,
    /// Near edge from the parent's far edge (`x2w`, `y2h`), i.e. far + size
    FarExtent,
}

impl CoordKind {
    pub const ALL: [CoordKind; 5] = [
        CoordKind::Near,
        CoordKind::Size,
        CoordKind::Far,
        CoordKind::NearExtent,
        CoordKind::FarExtent,
    ];
}

/// A named coordinate: an axis and a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coord {
    X,
    W,
    X2,
    XW,
    X2W,
    Y,
    H,
    Y2,
    YH,
    Y2H,
}

impl Coord {
    pub const ALL: [Coord; 10] = [
        Coord::X,
        Coord::W,
        Coord::X2,
        Coord::XW,
        Coord::X2W,
        Coord::Y,
        Coord::H,
        Coord::Y2,
        Coord::YH,
        Coord::Y2H,
    ];

    pub fn new(axis: Axis, kind: CoordKind) -> Self {
        match (axis, kind) {
            (Axis::Horizontal, CoordKind::Near) => Coord::X,
            (Axis::Horizontal, CoordKind::Size) => Coord::W,
            (Axis::Horizontal, CoordKind::Far) => Coord::X2,
            (Axis::Horizontal, CoordKind::NearExtent) => Coord::XW,
            (Axis::Horizontal, CoordKind::FarExtent) => Coord::X2W,
            (Axis::Vertical, CoordKind::Near) => Coord::Y,
            (Axis::Vertical, CoordKind::Size) => Coord::H,
            (Axis::Vertical, CoordKind::Far) => Coord::Y2,
            (Axis::Vertical, CoordKind::NearExtent) => Coord::YH,
            (Axis::Vertical, CoordKind::FarExtent) => Coord::Y2H,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Coord::X | Coord::W | Coord::X2 | Coord::XW | Coord::X2W => Axis::Horizontal,
            Coord::Y | Coord::H | Coord::Y2 | Coord::YH | Coord::Y2H => Axis::Vertical,
        }
    }

    pub fn kind(self) -> CoordKind {
        match self {
            Coord::X | Coord::Y => CoordKind::Near,
            Coord::W | Coord::H => CoordKind::Size,
            Coord::X2 | Coord::Y2 => CoordKind::Far,
            Coord::XW | Coord::YH => CoordKind::NearExtent,
            Coord::X2W | Coord::Y2H => CoordKind::FarExtent,
        }
    }

    /// Whether this coordinate is a width or height
    pub fn is_size(self) -> bool {
        self.kind() == CoordKind::Size
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Coord::X => "x",
            Coord::W => "w",
            Coord::X2 => "x2",
            Coord::XW => "xw",
            Coord::X2W => "x2w",
            Coord::Y => "y",
            Coord::H => "h",
            Coord::Y2 => "y2",
            Coord::YH => "yh",
            Coord::Y2H => "y2h",
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coordinate name that is not one of the ten known ones
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown coordinate '{0}' (expected one of x, w, x2, xw, x2w, y, h, y2, yh, y2h)")]
pub struct UnknownCoord(pub String);

impl FromStr for Coord {
    type Err = UnknownCoord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coord::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCoord(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_and_kind_round_trip() {
        for coord in Coord::ALL {
            assert_eq!(Coord::new(coord.axis(), coord.kind()), coord);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("x2w".parse::<Coord>().unwrap(), Coord::X2W);
        assert_eq!("yh".parse::<Coord>().unwrap(), Coord::YH);
        assert!("left".parse::<Coord>().is_err());
    }

    #[test]
    fn test_size_coords() {
        assert!(Coord::W.is_size());
        assert!(Coord::H.is_size());
        assert!(!Coord::XW.is_size());
        assert_eq!(Axis::Vertical.size(), Coord::H);
    }
}
