use crate::align::Axis;
use serde::{Deserialize, Serialize};

/// Growth weights of one cell along each axis.
///
/// A weight of zero keeps the cell at its minimum along that axis. Only the
/// component on the owning container's growth axis takes part in distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Proportions {
    /// Weight along the horizontal axis
    pub horizontal: f32,
    /// Weight along the vertical axis
    pub vertical: f32,
}

impl Proportions {
    /// No growth on either axis
    pub const ZERO: Self = Self {
        horizontal: 0.0,
        vertical: 0.0,
    };

    /// Create a new proportion pair.
    #[must_use]
    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Weight along `axis`.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Copy with the weight along `axis` replaced.
    #[must_use]
    pub const fn with_along(&self, axis: Axis, weight: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(weight, self.vertical),
            Axis::Vertical => Self::new(self.horizontal, weight),
        }
    }

    /// Both weights are finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_weight(self.horizontal) && is_valid_weight(self.vertical)
    }
}

impl From<(f32, f32)> for Proportions {
    fn from((horizontal, vertical): (f32, f32)) -> Self {
        Self::new(horizontal, vertical)
    }
}

/// A weight is usable when it is finite and not negative.
#[must_use]
pub fn is_valid_weight(weight: f32) -> bool {
    weight.is_finite() && weight >= 0.0
}
