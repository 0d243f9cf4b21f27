//! Growth axes and cross-axis alignment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis along which a container stacks its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Cells stacked left to right
    Horizontal,
    /// Cells stacked top to bottom
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Tag used in manifests and log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(ParseTagError::new(TagKind::Axis, other)),
        }
    }
}

/// Placement of a payload along a cell's cross axis.
///
/// Only the component perpendicular to the owning container's growth axis is
/// consulted. `Expand` stretches the payload to the full cross length; the other
/// variants keep the payload at its minimum and offset it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Start edge (left or top)
    Min,
    /// End edge (right or bottom)
    Max,
    /// Centered, rounding toward the start edge
    Center,
    /// Fill the cross length
    #[default]
    Expand,
}

impl Alignment {
    /// Offset of a payload of length `used` inside `available` pixels.
    ///
    /// `Expand` and `Min` both start at the edge. A payload larger than the
    /// available space yields a negative offset for `Max` and `Center`.
    #[must_use]
    pub const fn offset(self, available: i32, used: i32) -> i32 {
        let free = available - used;
        match self {
            Self::Min | Self::Expand => 0,
            Self::Max => free,
            Self::Center => free.div_euclid(2),
        }
    }

    /// Tag used in manifests and log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Center => "center",
            Self::Expand => "expand",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = ParseTagError;

    /// Accepts the canonical tags plus the edge names of either axis.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" | "left" | "top" => Ok(Self::Min),
            "max" | "right" | "bottom" => Ok(Self::Max),
            "center" | "center_h" | "center_v" => Ok(Self::Center),
            "expand" => Ok(Self::Expand),
            other => Err(ParseTagError::new(TagKind::Alignment, other)),
        }
    }
}

/// Horizontal and vertical alignment of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Alignments {
    /// Used when the owning container grows vertically
    pub horizontal: Alignment,
    /// Used when the owning container grows horizontally
    pub vertical: Alignment,
}

impl Alignments {
    /// Both components expand.
    pub const EXPAND: Self = Self::new(Alignment::Expand, Alignment::Expand);

    /// Create a new alignment pair.
    #[must_use]
    pub const fn new(horizontal: Alignment, vertical: Alignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Component that applies along `axis`.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> Alignment {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

impl From<(Alignment, Alignment)> for Alignments {
    fn from((horizontal, vertical): (Alignment, Alignment)) -> Self {
        Self::new(horizontal, vertical)
    }
}

/// What kind of tag failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// An [`Axis`] tag
    Axis,
    /// An [`Alignment`] tag
    Alignment,
}

/// Error type for tag parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError {
    /// Kind of value being parsed
    pub kind: TagKind,
    /// The rejected input
    pub tag: String,
}

impl ParseTagError {
    fn new(kind: TagKind, tag: &str) -> Self {
        Self {
            kind,
            tag: tag.to_string(),
        }
    }
}

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TagKind::Axis => write!(
                f,
                "unknown axis '{}' (expected horizontal or vertical)",
                self.tag
            ),
            TagKind::Alignment => write!(
                f,
                "unknown alignment '{}' (expected min, max, center or expand)",
                self.tag
            ),
        }
    }
}

impl std::error::Error for ParseTagError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_cross() {
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Axis::Vertical.cross(), Axis::Horizontal);
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("horizontal".parse::<Axis>(), Ok(Axis::Horizontal));
        assert_eq!("vertical".parse::<Axis>(), Ok(Axis::Vertical));
        let err = "diagonal".parse::<Axis>().unwrap_err();
        assert_eq!(err.kind, TagKind::Axis);
        assert!(err.to_string().contains("diagonal"));
    }

    #[test]
    fn test_alignment_default_is_expand() {
        assert_eq!(Alignment::default(), Alignment::Expand);
        assert_eq!(Alignments::default(), Alignments::EXPAND);
    }

    #[test]
    fn test_alignment_aliases() {
        assert_eq!("left".parse::<Alignment>(), Ok(Alignment::Min));
        assert_eq!("top".parse::<Alignment>(), Ok(Alignment::Min));
        assert_eq!("right".parse::<Alignment>(), Ok(Alignment::Max));
        assert_eq!("bottom".parse::<Alignment>(), Ok(Alignment::Max));
        assert_eq!("center_h".parse::<Alignment>(), Ok(Alignment::Center));
        assert_eq!("center_v".parse::<Alignment>(), Ok(Alignment::Center));
        assert_eq!("expand".parse::<Alignment>(), Ok(Alignment::Expand));
    }

    #[test]
    fn test_alignment_unknown_tag_rejected() {
        let err = "middle".parse::<Alignment>().unwrap_err();
        assert_eq!(err.kind, TagKind::Alignment);
        assert_eq!(err.tag, "middle");
    }

    #[test]
    fn test_alignment_offset() {
        assert_eq!(Alignment::Min.offset(100, 30), 0);
        assert_eq!(Alignment::Max.offset(100, 30), 70);
        assert_eq!(Alignment::Center.offset(100, 30), 35);
        assert_eq!(Alignment::Center.offset(100, 31), 34);
        assert_eq!(Alignment::Expand.offset(100, 100), 0);
    }

    #[test]
    fn test_alignment_display_round_trips_canonical_tag() {
        for a in [
            Alignment::Min,
            Alignment::Max,
            Alignment::Center,
            Alignment::Expand,
        ] {
            assert_eq!(a.to_string().parse::<Alignment>(), Ok(a));
        }
    }

    #[test]
    fn test_alignments_along() {
        let a = Alignments::new(Alignment::Center, Alignment::Max);
        assert_eq!(a.along(Axis::Horizontal), Alignment::Center);
        assert_eq!(a.along(Axis::Vertical), Alignment::Max);
    }
}
